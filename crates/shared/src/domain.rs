use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationTag(pub String);

impl OperationTag {
    pub const SET_NUMBER: &'static str = "setNumber";
    pub const ADD_NUMBER: &'static str = "addNumber";
    pub const MUL_NUMBER: &'static str = "mulNumber";
    pub const INCREMENT: &'static str = "increment";

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OperationTag {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for OperationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxState {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

impl TxState {
    pub fn is_pending(self) -> bool {
        self == Self::Pending
    }

    pub fn is_settled(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

// `operation` is set exactly while `state` is `Pending`; only the
// constructors below build one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionStatus {
    state: TxState,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    operation: Option<OperationTag>,
}

impl TransactionStatus {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn pending(message: impl Into<String>, operation: OperationTag) -> Self {
        Self {
            state: TxState::Pending,
            message: message.into(),
            operation: Some(operation),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            state: TxState::Success,
            message: message.into(),
            operation: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            state: TxState::Error,
            message: message.into(),
            operation: None,
        }
    }

    pub fn state(&self) -> TxState {
        self.state
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn operation(&self) -> Option<&OperationTag> {
        self.operation.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    pub fn is_operation_disabled(&self, tag: &str) -> bool {
        self.is_pending()
            && self
                .operation
                .as_ref()
                .map_or(true, |current| current.as_str() == tag)
    }

    pub fn is_pending_for(&self, tag: &str) -> bool {
        self.is_pending()
            && self
                .operation
                .as_ref()
                .is_some_and(|current| current.as_str() == tag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterValue {
    #[default]
    Unknown,
    Known(i64),
}
