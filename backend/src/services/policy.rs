use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::{
    constants::{DEFAULT_STORE_RETRIES, DEFAULT_STORE_TIMEOUT_MS},
    error::StoreError,
    utils::Config,
};

/// Bound applied to every store round-trip.
#[derive(Debug, Clone, Copy)]
pub struct StorePolicy {
    pub timeout: Duration,
    /// Extra attempts after an `Unavailable` failure or a timeout.
    pub retries: u32,
}

impl Default for StorePolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_STORE_TIMEOUT_MS),
            retries: DEFAULT_STORE_RETRIES,
        }
    }
}

impl From<&Config> for StorePolicy {
    fn from(config: &Config) -> Self {
        Self {
            timeout: config.store_timeout,
            retries: config.store_retries,
        }
    }
}

impl StorePolicy {
    /// Run one store operation under the timeout, retrying only `Unavailable`.
    pub async fn call<T, F, Fut>(&self, backend: &str, op: &'static str, mut f: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            let result = match tokio::time::timeout(self.timeout, f()).await {
                Ok(result) => result,
                Err(_) => Err(StoreError::Unavailable(format!(
                    "{} timed out after {}ms",
                    op,
                    self.timeout.as_millis()
                ))),
            };

            match result {
                Err(StoreError::Unavailable(reason)) if attempt < self.retries => {
                    attempt += 1;
                    warn!(
                        "{} store call {} failed ({}), retry {}/{}",
                        backend, op, reason, attempt, self.retries
                    );
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy() -> StorePolicy {
        StorePolicy {
            timeout: Duration::from_millis(100),
            retries: 1,
        }
    }

    #[tokio::test]
    async fn test_rejected_is_not_retried() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let result: Result<(), StoreError> = policy()
            .call("test", "insert", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(StoreError::Rejected("check".to_string()))
            })
            .await;

        assert_eq!(result, Err(StoreError::Rejected("check".to_string())));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unavailable_retried_up_to_limit() {
        let calls = AtomicU32::new(0);
        let calls = &calls;
        let result: Result<(), StoreError> = policy()
            .call("test", "select", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(StoreError::Unavailable("down".to_string()))
            })
            .await;

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
