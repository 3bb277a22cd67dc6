use std::sync::Arc;

use shared::{
    error::RemoteCallError,
    protocol::{CounterOperation, OperationKind},
};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::{
    controller::{ControllerConfig, Submission, TransactionController},
    reader::ValueReader,
    submit_operation,
    validation::{parse_numeric_input, to_integral_argument},
    view::SessionView,
    CounterClient,
};

#[derive(Clone)]
pub struct CounterSession {
    client: Arc<dyn CounterClient>,
    reader: ValueReader,
    controller: TransactionController,
}

impl CounterSession {
    pub fn new(client: Arc<dyn CounterClient>, config: ControllerConfig) -> Self {
        Self {
            reader: ValueReader::new(Arc::clone(&client)),
            controller: TransactionController::new(config),
            client,
        }
    }

    pub fn reader(&self) -> &ValueReader {
        &self.reader
    }

    pub fn controller(&self) -> &TransactionController {
        &self.controller
    }

    /// Initial read. A failure leaves the value unknown.
    pub async fn start(&self) {
        if self.reader.refresh().await.is_ok() {
            info!("counter session started");
        }
    }

    pub async fn set_number(&self, input: &str) -> Submission {
        self.run(OperationKind::Set, input).await
    }

    pub async fn add_number(&self, input: &str) -> Submission {
        self.run(OperationKind::Add, input).await
    }

    pub async fn mul_number(&self, input: &str) -> Submission {
        self.run(OperationKind::Multiply, input).await
    }

    pub async fn increment(&self) -> Submission {
        self.run(OperationKind::Increment, "").await
    }

    /// Runs `kind` on the current runtime without waiting for it, the way a
    /// button handler fires an action.
    pub fn dispatch(
        &self,
        kind: OperationKind,
        input: impl Into<String>,
    ) -> JoinHandle<Submission> {
        let session = self.clone();
        let input = input.into();
        tokio::spawn(async move { session.run(kind, &input).await })
    }

    pub async fn run(&self, kind: OperationKind, input: &str) -> Submission {
        let (argument, shown) = if kind.takes_argument() {
            match parse_numeric_input(input) {
                Ok(parsed) => (Some(parsed.value), parsed.raw),
                Err(err) => {
                    return if self.controller.fail_validation(&err) {
                        Submission::Invalid(err.to_string())
                    } else {
                        Submission::Dropped
                    };
                }
            }
        } else {
            (None, String::new())
        };

        let client = Arc::clone(&self.client);
        let reader = self.reader.clone();
        let work = move || async move {
            let operation = match argument {
                Some(value) => kind.with_argument(to_integral_argument(value)?),
                None => CounterOperation::Increment,
            };
            let pending = submit_operation(client.as_ref(), operation).await?;
            debug!(transaction_id = %pending.transaction_id(), "waiting for confirmation");

            let receipt = pending.await_confirmation().await?;
            info!(
                transaction_id = %receipt.transaction_id,
                block_number = receipt.block_number,
                "operation confirmed"
            );

            // Refresh before reporting success. Read failures are only logged.
            reader.refresh().await.ok();
            Ok::<(), RemoteCallError>(())
        };

        self.controller
            .submit(
                work,
                kind.pending_message(),
                kind.success_message(&shown),
                kind.tag(),
            )
            .await
    }

    pub fn view(&self) -> SessionView {
        SessionView::project(&self.controller.status(), self.reader.current())
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
