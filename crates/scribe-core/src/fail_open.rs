//! Fail-open utilities for best-effort probes
//!
//! Some checks only refine a decision that already has a safe default, such
//! as asking git whether a file is tracked before deciding to back it up.
//! Those checks run through [`fail_open`]: an error is logged and turned into
//! `None`, and the caller picks the safe default.
//!
//! DO NOT use fail-open for:
//! - Model requests
//! - Backup creation
//! - Writing target files

use std::future::Future;
use tracing::warn;

use crate::Result;

/// Execute an operation that should fail open
///
/// Logs the error via `tracing::warn!` on failure and returns `None`.
///
/// # Usage
///
/// ```no_run
/// use scribe_core::fail_open;
/// use scribe_core::Result;
///
/// async fn is_tracked() -> Result<bool> {
///     Ok(true)
/// }
///
/// async fn example() {
///     // Unknown tracking state means "take a backup"
///     let tracked = fail_open("git ls-files", || is_tracked()).await.unwrap_or(false);
/// }
/// ```
pub async fn fail_open<F, Fut, T>(operation_name: &str, f: F) -> Option<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match f().await {
        Ok(val) => Some(val),
        Err(e) => {
            warn!("{} failed (fail-open): {}", operation_name, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScribeError;

    #[tokio::test]
    async fn test_fail_open_success() {
        let result = fail_open("test_op", || async { Ok::<_, ScribeError>(42) }).await;
        assert_eq!(result, Some(42));
    }

    #[tokio::test]
    async fn test_fail_open_failure() {
        let result = fail_open("test_op", || async {
            Err::<i32, _>(ScribeError::Vcs("git: command not found".to_string()))
        })
        .await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_fail_open_runs_once() {
        let mut attempts = 0;
        let result = fail_open("test_op", || {
            attempts += 1;
            async { Err::<bool, _>(ScribeError::Vcs("not a repository".to_string())) }
        })
        .await;
        assert_eq!(result, None);
        assert_eq!(attempts, 1);
    }
}
