use serde::{Deserialize, Serialize};

use crate::domain::OperationTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CounterOperation {
    Set(i64),
    Add(i64),
    Multiply(i64),
    Increment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Set,
    Add,
    Multiply,
    Increment,
}

impl OperationKind {
    pub const ALL: [OperationKind; 4] = [Self::Set, Self::Add, Self::Multiply, Self::Increment];

    pub fn tag_str(self) -> &'static str {
        match self {
            Self::Set => OperationTag::SET_NUMBER,
            Self::Add => OperationTag::ADD_NUMBER,
            Self::Multiply => OperationTag::MUL_NUMBER,
            Self::Increment => OperationTag::INCREMENT,
        }
    }

    pub fn tag(self) -> OperationTag {
        OperationTag::from(self.tag_str())
    }

    pub fn takes_argument(self) -> bool {
        !matches!(self, Self::Increment)
    }

    pub fn pending_message(self) -> &'static str {
        match self {
            Self::Set => "Setting number...",
            Self::Add => "Adding number...",
            Self::Multiply => "Multiplying number...",
            Self::Increment => "Incrementing number...",
        }
    }

    pub fn success_message(self, input: &str) -> String {
        match self {
            Self::Set => format!("Number set to {input} successfully!"),
            Self::Add => format!("Added {input} successfully!"),
            Self::Multiply => format!("Multiplied by {input} successfully!"),
            Self::Increment => "Number incremented successfully!".to_string(),
        }
    }

    pub fn idle_label(self) -> &'static str {
        match self {
            Self::Set => "Set Number",
            Self::Add => "Add Number",
            Self::Multiply => "Multiply",
            Self::Increment => "Increment",
        }
    }

    pub fn busy_label(self) -> &'static str {
        match self {
            Self::Set => "Setting...",
            Self::Add => "Adding...",
            Self::Multiply => "Multiplying...",
            Self::Increment => "Incrementing...",
        }
    }

    pub fn with_argument(self, value: i64) -> CounterOperation {
        match self {
            Self::Set => CounterOperation::Set(value),
            Self::Add => CounterOperation::Add(value),
            Self::Multiply => CounterOperation::Multiply(value),
            Self::Increment => CounterOperation::Increment,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "set" | "setnumber" => Some(Self::Set),
            "add" | "addnumber" => Some(Self::Add),
            "mul" | "multiply" | "mulnumber" => Some(Self::Multiply),
            "inc" | "increment" => Some(Self::Increment),
            _ => None,
        }
    }
}

impl CounterOperation {
    pub fn argument(&self) -> Option<i64> {
        match *self {
            Self::Set(v) | Self::Add(v) | Self::Multiply(v) => Some(v),
            Self::Increment => None,
        }
    }
}
