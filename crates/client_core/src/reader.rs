use std::sync::Arc;

use shared::{domain::CounterValue, error::ReadError};
use tokio::sync::watch;
use tracing::{debug, error};

use crate::{observable::Observable, CounterClient};

/// Fetches the counter and publishes the latest value. Failures are logged
/// and leave the previous value in place.
#[derive(Clone)]
pub struct ValueReader {
    client: Arc<dyn CounterClient>,
    value: Observable<CounterValue>,
}

impl ValueReader {
    pub fn new(client: Arc<dyn CounterClient>) -> Self {
        Self {
            client,
            value: Observable::default(),
        }
    }

    pub fn current(&self) -> CounterValue {
        self.value.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<CounterValue> {
        self.value.subscribe()
    }

    pub async fn refresh(&self) -> Result<i64, ReadError> {
        match self.fetch().await {
            Ok(value) => {
                debug!(value, "counter value refreshed");
                self.value.set(CounterValue::Known(value));
                Ok(value)
            }
            Err(err) => {
                error!(error = %err, "error fetching counter value");
                Err(err)
            }
        }
    }

    async fn fetch(&self) -> Result<i64, ReadError> {
        let raw = self.client.read_value().await?;
        i64::try_from(raw).map_err(|_| ReadError::OutOfRange { raw })
    }
}
