//! Per-request options passed through to the transport.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::domain::errors::{MemberError, TransportError};

/// Timeout, cancellation and audit-log settings for a single remote call.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    timeout: Option<Duration>,
    cancellation: Option<CancellationToken>,
    audit_log_reason: Option<String>,
}

impl RequestOptions {
    /// Creates options with no timeout, no cancellation and no reason.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the request with [`TransportError::TimedOut`] after `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Fails the request with [`TransportError::Cancelled`] once `token` fires.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Sets the reason recorded in the guild audit log.
    #[must_use]
    pub fn with_audit_log_reason(mut self, reason: impl Into<String>) -> Self {
        self.audit_log_reason = Some(reason.into());
        self
    }

    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    #[must_use]
    pub const fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }

    #[must_use]
    pub fn audit_log_reason(&self) -> Option<&str> {
        self.audit_log_reason.as_deref()
    }

    /// Drives `request` under the configured timeout and cancellation token.
    ///
    /// Cancellation is checked first, so an already-cancelled token never
    /// lets the request run.
    ///
    /// # Errors
    /// Returns the request's own error, or a transport error if it timed out
    /// or was cancelled.
    pub async fn guard<T, F>(&self, request: F) -> Result<T, MemberError>
    where
        F: Future<Output = Result<T, MemberError>>,
    {
        let bounded = async {
            match self.timeout {
                Some(limit) => match tokio::time::timeout(limit, request).await {
                    Ok(result) => result,
                    Err(_) => Err(MemberError::from(TransportError::TimedOut)),
                },
                None => request.await,
            }
        };

        match &self.cancellation {
            Some(token) => {
                tokio::select! {
                    biased;
                    () = token.cancelled() => Err(MemberError::from(TransportError::Cancelled)),
                    result = bounded => result,
                }
            }
            None => bounded.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future;
    use tokio_test::{assert_pending, assert_ready_err, task};

    #[tokio::test]
    async fn test_guard_passes_result_through() {
        let options = RequestOptions::new();

        let ok = options.guard(async { Ok::<_, MemberError>(7) }).await;
        assert_eq!(ok, Ok(7));

        let err = options
            .guard(async { Err::<(), _>(MemberError::invalid_state("boom")) })
            .await;
        assert_eq!(err, Err(MemberError::invalid_state("boom")));
    }

    #[test]
    fn test_guard_cancels_pending_request() {
        let token = CancellationToken::new();
        let options = RequestOptions::new().with_cancellation(token.clone());

        let mut request = task::spawn(options.guard(future::pending::<Result<(), MemberError>>()));
        assert_pending!(request.poll());

        token.cancel();
        assert!(request.is_woken());

        let error = assert_ready_err!(request.poll());
        assert_eq!(error, MemberError::Transport(TransportError::Cancelled));
    }

    #[tokio::test]
    async fn test_already_cancelled_token_wins() {
        let token = CancellationToken::new();
        token.cancel();
        let options = RequestOptions::new().with_cancellation(token);

        let result = options.guard(async { Ok::<_, MemberError>(()) }).await;

        assert_eq!(result, Err(MemberError::from(TransportError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_guard_times_out() {
        let options = RequestOptions::new().with_timeout(Duration::from_secs(5));

        let result = options
            .guard(future::pending::<Result<(), MemberError>>())
            .await;

        assert_eq!(result, Err(MemberError::from(TransportError::TimedOut)));
    }

    #[test]
    fn test_audit_log_reason() {
        let options = RequestOptions::new().with_audit_log_reason("spam");
        assert_eq!(options.audit_log_reason(), Some("spam"));
        assert!(options.timeout().is_none());
    }
}
