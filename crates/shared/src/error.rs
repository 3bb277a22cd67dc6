use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const FALLBACK_FAILURE_MESSAGE: &str = "Transaction failed";
pub const INVALID_NUMBER_MESSAGE: &str = "Please enter a valid number";

pub trait UserFacing {
    fn reason(&self) -> Option<&str> {
        None
    }

    fn message(&self) -> Option<&str> {
        None
    }

    // Blank strings count as absent.
    fn user_facing_description(&self) -> String {
        non_blank(self.reason())
            .or_else(|| non_blank(self.message()))
            .unwrap_or(FALLBACK_FAILURE_MESSAGE)
            .to_string()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid number")]
    InvalidNumber { input: String },
}

impl UserFacing for ValidationError {
    fn message(&self) -> Option<&str> {
        match self {
            Self::InvalidNumber { .. } => Some(INVALID_NUMBER_MESSAGE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RemoteCallError {
    #[error("{message}")]
    Reverted {
        reason: Option<String>,
        message: String,
    },
    #[error("rpc error: {message}")]
    Rpc { message: String },
    // Never left the client.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
    #[error("Transaction failed")]
    Opaque,
}

impl RemoteCallError {
    pub fn reverted(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self::Reverted {
            message: format!("execution reverted: \"{reason}\""),
            reason: Some(reason),
        }
    }

    pub fn rpc(message: impl Into<String>) -> Self {
        Self::Rpc {
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

impl UserFacing for RemoteCallError {
    fn reason(&self) -> Option<&str> {
        match self {
            Self::Reverted { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }

    fn message(&self) -> Option<&str> {
        match self {
            Self::Reverted { message, .. }
            | Self::Rpc { message }
            | Self::InvalidArgument { message } => Some(message),
            Self::Opaque => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("failed to read counter value: {0}")]
    Remote(#[from] RemoteCallError),
    #[error("counter value {raw} does not fit the local integer range")]
    OutOfRange { raw: i128 },
}
