//! Guild member error types.

use thiserror::Error;

use crate::domain::entities::{GuildId, UserId};

/// Failures reported by the REST transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum TransportError {
    #[error("network error: {message}")]
    Network { message: String },

    #[error("request rejected as unauthorized")]
    Unauthorized,

    #[error("access denied: {message}")]
    Forbidden { message: String },

    #[error("rate limited by Discord, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("request timed out")]
    TimedOut,

    #[error("request cancelled")]
    Cancelled,

    #[error("unexpected response: {message}")]
    Unexpected { message: String },
}

impl TransportError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns whether a caller could reasonably retry the request.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::RateLimited { .. } | Self::TimedOut
        )
    }
}

/// Guild member operation error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum MemberError {
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },

    #[error("member {user_id} not found in guild {guild_id}")]
    NotFound { guild_id: GuildId, user_id: UserId },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl MemberError {
    /// Creates invalid state error.
    #[must_use]
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }

    /// Creates not found error.
    #[must_use]
    pub const fn not_found(guild_id: GuildId, user_id: UserId) -> Self {
        Self::NotFound { guild_id, user_id }
    }

    /// Returns whether the remote member no longer exists.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns whether error came from the transport.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(TransportError::network("reset"), true ; "network")]
    #[test_case(TransportError::RateLimited { retry_after_ms: 100 }, true ; "rate_limited")]
    #[test_case(TransportError::TimedOut, true ; "timed_out")]
    #[test_case(TransportError::Cancelled, false ; "cancelled")]
    #[test_case(TransportError::Unauthorized, false ; "unauthorized")]
    #[test_case(TransportError::forbidden("missing access"), false ; "forbidden")]
    fn test_is_retryable(error: TransportError, expected: bool) {
        assert_eq!(error.is_retryable(), expected);
    }

    #[test]
    fn test_transport_error_converts() {
        let error: MemberError = TransportError::Cancelled.into();

        assert!(error.is_transport());
        assert!(!error.is_not_found());
        assert_eq!(error.to_string(), "request cancelled");
    }

    #[test]
    fn test_not_found_message() {
        let error = MemberError::not_found(GuildId(1), UserId(2));
        assert_eq!(error.to_string(), "member 2 not found in guild 1");
    }
}
