use serde::Serialize;
use shared::{
    domain::{CounterValue, TransactionStatus, TxState},
    protocol::OperationKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum ValueDisplay {
    Loading,
    Value(i64),
}

impl From<CounterValue> for ValueDisplay {
    fn from(value: CounterValue) -> Self {
        match value {
            CounterValue::Unknown => Self::Loading,
            CounterValue::Known(v) => Self::Value(v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertTone {
    Info,
    Success,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub tone: AlertTone,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlView {
    pub kind: OperationKind,
    pub label: &'static str,
    pub disabled: bool,
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub value: ValueDisplay,
    pub alert: Option<Alert>,
    pub input_disabled: bool,
    pub controls: Vec<ControlView>,
}

impl SessionView {
    pub fn project(status: &TransactionStatus, value: CounterValue) -> Self {
        let tone = match status.state() {
            TxState::Idle => None,
            TxState::Pending => Some(AlertTone::Info),
            TxState::Success => Some(AlertTone::Success),
            TxState::Error => Some(AlertTone::Danger),
        };

        let controls = OperationKind::ALL
            .into_iter()
            .map(|kind| {
                let busy = status.is_pending_for(kind.tag_str());
                ControlView {
                    kind,
                    label: if busy { kind.busy_label() } else { kind.idle_label() },
                    disabled: status.is_operation_disabled(kind.tag_str()),
                    busy,
                }
            })
            .collect();

        Self {
            value: value.into(),
            alert: tone.map(|tone| Alert {
                tone,
                message: status.message().to_string(),
            }),
            input_disabled: status.is_pending(),
            controls,
        }
    }

    pub fn control(&self, kind: OperationKind) -> Option<&ControlView> {
        self.controls.iter().find(|c| c.kind == kind)
    }
}
