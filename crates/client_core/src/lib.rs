use async_trait::async_trait;
use shared::{error::RemoteCallError, protocol::CounterOperation};

pub mod controller;
pub mod in_memory;
pub mod observable;
pub mod reader;
pub mod session;
pub mod validation;
pub mod view;

pub use controller::{ControllerConfig, Submission, TransactionController, DEFAULT_RESET_DELAY};
pub use in_memory::{InMemoryCounter, MAX_COUNTER_VALUE};
pub use observable::Observable;
pub use reader::ValueReader;
pub use session::CounterSession;
pub use view::{Alert, AlertTone, ControlView, SessionView, ValueDisplay};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_id: String,
    pub block_number: u64,
}

#[async_trait]
pub trait PendingOperation: Send {
    fn transaction_id(&self) -> &str;

    /// Suspends until the service confirms or rejects the operation.
    async fn await_confirmation(self: Box<Self>) -> Result<Receipt, RemoteCallError>;
}

/// Remote counter service capability. Implementations own their transport
/// and signing; the session only sees this narrow surface.
#[async_trait]
pub trait CounterClient: Send + Sync {
    async fn read_value(&self) -> Result<i128, RemoteCallError>;

    async fn submit_set_value(
        &self,
        value: i64,
    ) -> Result<Box<dyn PendingOperation>, RemoteCallError>;

    async fn submit_add_value(
        &self,
        value: i64,
    ) -> Result<Box<dyn PendingOperation>, RemoteCallError>;

    async fn submit_multiply_value(
        &self,
        value: i64,
    ) -> Result<Box<dyn PendingOperation>, RemoteCallError>;

    async fn submit_increment(&self) -> Result<Box<dyn PendingOperation>, RemoteCallError>;
}

pub async fn submit_operation(
    client: &dyn CounterClient,
    operation: CounterOperation,
) -> Result<Box<dyn PendingOperation>, RemoteCallError> {
    match operation {
        CounterOperation::Set(value) => client.submit_set_value(value).await,
        CounterOperation::Add(value) => client.submit_add_value(value).await,
        CounterOperation::Multiply(value) => client.submit_multiply_value(value).await,
        CounterOperation::Increment => client.submit_increment().await,
    }
}
