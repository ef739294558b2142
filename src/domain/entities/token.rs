//! Discord bot token value object.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Discord bot token with validation and masking.
///
/// The secret is wiped from memory when the token is dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct AuthToken {
    value: String,
}

impl AuthToken {
    const MIN_TOKEN_LENGTH: usize = 50;
    const BOT_PREFIX: &'static str = "Bot ";

    /// Creates new token with format validation.
    ///
    /// A leading `Bot ` prefix is accepted and stripped.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let raw = value.into();
        let trimmed = raw.trim();
        let value = trimmed.strip_prefix(Self::BOT_PREFIX).unwrap_or(trimmed);

        if value.len() < Self::MIN_TOKEN_LENGTH {
            return None;
        }

        if value.split('.').count() != 3 {
            return None;
        }

        Some(Self {
            value: value.to_string(),
        })
    }

    /// Creates token without validation.
    #[must_use]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns token as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the value for the `Authorization` header.
    #[must_use]
    pub fn authorization(&self) -> String {
        format!("{}{}", Self::BOT_PREFIX, self.value)
    }

    /// Returns masked token for display.
    #[must_use]
    pub fn masked(&self) -> String {
        if self.value.len() <= 10 {
            return "*".repeat(self.value.len());
        }

        let visible_prefix = &self.value[..4];
        let visible_suffix = &self.value[self.value.len() - 4..];
        format!("{visible_prefix}...{visible_suffix}")
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("value", &self.masked())
            .finish()
    }
}

impl fmt::Display for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bot_token() -> String {
        "MTIzNDU2Nzg5MDEyMzQ1Njc4OQ.XXXXXX.YYYYYYYYYYYYYYYYYYYYYYYYYYYY".to_string()
    }

    #[test]
    fn test_accepts_well_formed_token() {
        let token = AuthToken::new(bot_token());
        assert!(token.is_some());
    }

    #[test]
    fn test_bot_prefix_is_stripped() {
        let token = AuthToken::new(format!("Bot {}", bot_token())).unwrap();

        assert_eq!(token.as_str(), bot_token());
        assert_eq!(token.authorization(), format!("Bot {}", bot_token()));
    }

    #[test]
    fn test_rejects_short_token() {
        assert!(AuthToken::new("short").is_none());
    }

    #[test]
    fn test_rejects_token_without_three_segments() {
        assert!(AuthToken::new("a".repeat(60)).is_none());
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let token = AuthToken::new_unchecked(bot_token());
        let debug_output = format!("{token:?} {token}");

        assert!(debug_output.contains("..."));
        assert!(!debug_output.contains(&bot_token()));
    }
}
