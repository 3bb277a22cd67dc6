use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use shared::{error::RemoteCallError, protocol::CounterOperation};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{CounterClient, PendingOperation, Receipt};

// Larger results revert so every confirmed value fits a `CounterValue`.
pub const MAX_COUNTER_VALUE: u64 = i64::MAX as u64;

#[derive(Debug, Default)]
struct CounterState {
    value: u64,
    block_number: u64,
    next_transaction: u64,
    fail_next_submit: Option<RemoteCallError>,
    fail_next_confirmation: Option<RemoteCallError>,
    fail_reads: Option<RemoteCallError>,
    applied: Vec<CounterOperation>,
}

#[derive(Clone)]
pub struct InMemoryCounter {
    state: Arc<Mutex<CounterState>>,
    confirmation_latency: Duration,
}

impl Default for InMemoryCounter {
    fn default() -> Self {
        Self::new(0)
    }
}

impl InMemoryCounter {
    pub fn new(initial: u64) -> Self {
        Self {
            state: Arc::new(Mutex::new(CounterState {
                value: initial.min(MAX_COUNTER_VALUE),
                ..CounterState::default()
            })),
            confirmation_latency: Duration::ZERO,
        }
    }

    pub fn with_confirmation_latency(mut self, latency: Duration) -> Self {
        self.confirmation_latency = latency;
        self
    }

    pub async fn value(&self) -> u64 {
        self.state.lock().await.value
    }

    pub async fn applied_operations(&self) -> Vec<CounterOperation> {
        self.state.lock().await.applied.clone()
    }

    pub async fn fail_next_submit(&self, err: RemoteCallError) {
        self.state.lock().await.fail_next_submit = Some(err);
    }

    pub async fn fail_next_confirmation(&self, err: RemoteCallError) {
        self.state.lock().await.fail_next_confirmation = Some(err);
    }

    /// Makes every read fail until cleared with `None`.
    pub async fn fail_reads(&self, err: Option<RemoteCallError>) {
        self.state.lock().await.fail_reads = err;
    }

    async fn submit(
        &self,
        operation: CounterOperation,
    ) -> Result<Box<dyn PendingOperation>, RemoteCallError> {
        let mut state = self.state.lock().await;
        if let Some(err) = state.fail_next_submit.take() {
            return Err(err);
        }
        // Dry run, the way gas estimation rejects a call that would revert.
        apply(state.value, operation)?;

        state.next_transaction += 1;
        let transaction_id = format!("0x{:064x}", state.next_transaction);
        debug!(transaction_id = %transaction_id, ?operation, "operation broadcast");

        Ok(Box::new(InMemoryPending {
            transaction_id,
            operation,
            state: Arc::clone(&self.state),
            latency: self.confirmation_latency,
        }))
    }
}

fn apply(current: u64, operation: CounterOperation) -> Result<u64, RemoteCallError> {
    if let Some(argument) = operation.argument() {
        if argument < 0 {
            return Err(RemoteCallError::invalid_argument(format!(
                "value out-of-bounds (argument=\"_number\", value={argument})"
            )));
        }
    }
    let argument = operation.argument().map_or(0, |v| v.unsigned_abs());
    let next = match operation {
        CounterOperation::Set(_) => Some(argument),
        CounterOperation::Add(_) => current.checked_add(argument),
        CounterOperation::Multiply(_) => current.checked_mul(argument),
        CounterOperation::Increment => current.checked_add(1),
    };
    next.filter(|v| *v <= MAX_COUNTER_VALUE)
        .ok_or_else(|| RemoteCallError::reverted("Panic due to OVERFLOW(17)"))
}

struct InMemoryPending {
    transaction_id: String,
    operation: CounterOperation,
    state: Arc<Mutex<CounterState>>,
    latency: Duration,
}

#[async_trait]
impl PendingOperation for InMemoryPending {
    fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    async fn await_confirmation(self: Box<Self>) -> Result<Receipt, RemoteCallError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut state = self.state.lock().await;
        if let Some(err) = state.fail_next_confirmation.take() {
            return Err(err);
        }
        // State may have moved since broadcast.
        let next = apply(state.value, self.operation)?;
        state.value = next;
        state.block_number += 1;
        state.applied.push(self.operation);

        Ok(Receipt {
            transaction_id: self.transaction_id,
            block_number: state.block_number,
        })
    }
}

#[async_trait]
impl CounterClient for InMemoryCounter {
    async fn read_value(&self) -> Result<i128, RemoteCallError> {
        let state = self.state.lock().await;
        match &state.fail_reads {
            Some(err) => Err(err.clone()),
            None => Ok(i128::from(state.value)),
        }
    }

    async fn submit_set_value(
        &self,
        value: i64,
    ) -> Result<Box<dyn PendingOperation>, RemoteCallError> {
        self.submit(CounterOperation::Set(value)).await
    }

    async fn submit_add_value(
        &self,
        value: i64,
    ) -> Result<Box<dyn PendingOperation>, RemoteCallError> {
        self.submit(CounterOperation::Add(value)).await
    }

    async fn submit_multiply_value(
        &self,
        value: i64,
    ) -> Result<Box<dyn PendingOperation>, RemoteCallError> {
        self.submit(CounterOperation::Multiply(value)).await
    }

    async fn submit_increment(&self) -> Result<Box<dyn PendingOperation>, RemoteCallError> {
        self.submit(CounterOperation::Increment).await
    }
}
