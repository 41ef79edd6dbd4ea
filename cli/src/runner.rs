//! Timeout boundary around blocking retrieval work

use std::time::Duration;

use crate::error::{CliError, CliResult};

/// Run `work` on the blocking pool, giving up after `timeout`
///
/// The blocking task cannot be interrupted; on timeout it is detached and
/// its result discarded.
pub async fn run_blocking<T, F>(timeout: Duration, work: F) -> CliResult<T>
where
    F: FnOnce() -> CliResult<T> + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::task::spawn_blocking(work);

    match tokio::time::timeout(timeout, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(CliError::Task(join_err.to_string())),
        Err(_) => {
            tracing::warn!("Request exceeded {}s, abandoning it", timeout.as_secs());
            Err(CliError::Timeout(timeout.as_secs()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_result_passed_through() {
        let value = assert_ok!(run_blocking(Duration::from_secs(5), || Ok(42)).await);
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_error_passed_through() {
        let err = assert_err!(
            run_blocking::<(), _>(Duration::from_secs(5), || {
                Err(CliError::Rag(ui_rag_core::RagError::store("bad")))
            })
            .await
        );
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_timeout() {
        let err = assert_err!(
            run_blocking(Duration::from_millis(50), || {
                std::thread::sleep(Duration::from_millis(500));
                Ok(())
            })
            .await
        );
        assert!(matches!(err, CliError::Timeout(_)));
        assert_eq!(err.exit_code(), 4);
    }

    #[tokio::test]
    async fn test_panic_becomes_task_error() {
        let err = assert_err!(
            run_blocking::<(), _>(Duration::from_secs(5), || panic!("boom")).await
        );
        assert!(matches!(err, CliError::Task(_)));
    }
}
