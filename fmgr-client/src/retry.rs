//! Fixed-count retry of client calls

use std::future::Future;

use crate::client::ClientResult;

/// Run `op` up to `attempts` times, repeating only retryable errors
///
/// `attempts` below 1 is treated as 1.
pub async fn retry<T, F, Fut>(attempts: u32, mut op: F) -> ClientResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ClientResult<T>>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Err(e) if e.is_retryable() && attempt < attempts => {
                log::debug!("attempt {}/{} failed: {}, retrying", attempt, attempts, e);
                attempt += 1;
            }
            result => return result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn single_attempt_returns_first_error() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: ClientResult<()> = retry(1, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ClientError::Transport("timeout".into()))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transport_errors_are_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = retry(3, move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(ClientError::Transport("timeout".into()))
            } else {
                Ok(n)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn other_errors_are_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: ClientResult<()> = retry(5, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ClientError::Conflict("lan".into()))
        })
        .await;

        assert!(matches!(result, Err(ClientError::Conflict(_))));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
