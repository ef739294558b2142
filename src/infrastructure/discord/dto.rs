use serde::Deserialize;

/// Discord API error response structure.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    /// Error message from Discord.
    #[serde(default)]
    pub message: String,
    /// Discord JSON error code (10007 is "Unknown Member").
    #[serde(default)]
    pub code: u32,
    /// Seconds to wait before retrying, sent with 429 responses.
    #[serde(default)]
    pub retry_after: Option<f64>,
}

impl ErrorResponse {
    /// Returns `retry_after` in whole milliseconds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn retry_after_ms(&self) -> Option<u64> {
        self.retry_after
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map(|secs| (secs * 1000.0).ceil() as u64)
    }
}
