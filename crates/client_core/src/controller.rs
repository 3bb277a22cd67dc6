use std::{
    fmt,
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, PoisonError,
    },
    time::Duration,
};

use shared::{
    domain::{OperationTag, TransactionStatus},
    error::{UserFacing, ValidationError},
};
use tokio::{sync::watch, task::AbortHandle, time::Instant};
use tracing::{debug, info, warn};

use crate::observable::Observable;

pub const DEFAULT_RESET_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// How long a success or error stays visible before returning to idle.
    pub reset_delay: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            reset_delay: DEFAULT_RESET_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Another operation held the slot; nothing ran.
    Dropped,
    Succeeded,
    Failed(String),
    Invalid(String),
}

/// Owns the session's `TransactionStatus`. Cloning yields another handle to
/// the same slot.
#[derive(Clone)]
pub struct TransactionController {
    inner: Arc<Inner>,
}

struct Inner {
    config: ControllerConfig,
    status: Observable<TransactionStatus>,
    // Bumped on every transition into Pending, Success or Error, always
    // while `reset_task` is locked.
    generation: AtomicU64,
    reset_task: Mutex<Option<AbortHandle>>,
}

impl Default for TransactionController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

impl TransactionController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                status: Observable::default(),
                generation: AtomicU64::new(0),
                reset_task: Mutex::new(None),
            }),
        }
    }

    pub fn status(&self) -> TransactionStatus {
        self.inner.status.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<TransactionStatus> {
        self.inner.status.subscribe()
    }

    pub fn is_disabled(&self, tag: &str) -> bool {
        self.inner.status.with(|status| status.is_operation_disabled(tag))
    }

    pub fn is_pending(&self) -> bool {
        self.inner.status.with(TransactionStatus::is_pending)
    }

    /// Runs `work` in the slot unless another operation already occupies it,
    /// in which case the request is dropped. Failures are contained here and
    /// surface only through the status.
    pub async fn submit<F, Fut, E>(
        &self,
        work: F,
        pending_message: impl Into<String>,
        success_message: impl Into<String>,
        tag: impl Into<OperationTag>,
    ) -> Submission
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: UserFacing + fmt::Display,
    {
        let tag = tag.into();
        let pending = TransactionStatus::pending(pending_message, tag.clone());

        // Check and claim before the first await.
        if !self.transition(|status| !status.is_pending(), pending, false) {
            debug!(operation = %tag, "operation dropped; another operation is pending");
            return Submission::Dropped;
        }
        info!(operation = %tag, "operation pending");

        match work().await {
            Ok(()) => {
                info!(operation = %tag, "operation succeeded");
                self.settle(TransactionStatus::success(success_message));
                Submission::Succeeded
            }
            Err(err) => {
                let description = err.user_facing_description();
                warn!(operation = %tag, error = %err, "operation failed");
                self.settle(TransactionStatus::error(description.clone()));
                Submission::Failed(description)
            }
        }
    }

    /// Reports rejected user input without entering Pending. Ignored while an
    /// operation holds the slot.
    pub fn fail_validation(&self, err: &ValidationError) -> bool {
        let applied = self.transition(
            |status| !status.is_pending(),
            TransactionStatus::error(err.user_facing_description()),
            true,
        );
        if applied {
            debug!(error = %err, "input rejected before submission");
        }
        applied
    }

    fn settle(&self, status: TransactionStatus) {
        self.transition(|_| true, status, true);
    }

    // `reset_task` stays locked from the status change until the new reset
    // is stored, so the stored task always belongs to the latest transition.
    fn transition(
        &self,
        allowed: impl FnOnce(&TransactionStatus) -> bool,
        next: TransactionStatus,
        schedule_reset: bool,
    ) -> bool {
        let mut reset_task = self
            .inner
            .reset_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let generation = &self.inner.generation;
        let applied = self.inner.status.update_if(|status| {
            if !allowed(&*status) {
                return false;
            }
            *status = next;
            generation.fetch_add(1, Ordering::SeqCst);
            true
        });
        if !applied {
            return false;
        }

        let next_task = schedule_reset.then(|| self.spawn_reset());
        if let Some(previous) = std::mem::replace(&mut *reset_task, next_task) {
            previous.abort();
        }
        true
    }

    fn spawn_reset(&self) -> AbortHandle {
        let generation = self.inner.generation.load(Ordering::SeqCst);
        let deadline = Instant::now() + self.inner.config.reset_delay;
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            inner.reset_if_current(generation);
        })
        .abort_handle()
    }
}

impl Inner {
    fn reset_if_current(&self, scheduled_at: u64) {
        let reset = self.status.update_if(|status| {
            // A newer transition owns the slot now.
            if self.generation.load(Ordering::SeqCst) != scheduled_at
                || !status.state().is_settled()
            {
                return false;
            }
            *status = TransactionStatus::idle();
            true
        });
        if reset {
            debug!("transaction status reset to idle");
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
