//! Voice state observations.

use super::ChannelId;

/// Read-only view of a user's voice connection.
pub trait VoiceState {
    /// Whether the user deafened themselves.
    fn is_self_deafened(&self) -> bool;

    /// Whether the user muted themselves.
    fn is_self_muted(&self) -> bool;

    /// Whether the server suppressed the user (stage channels).
    fn is_suppressed(&self) -> bool;

    /// The voice channel the user is connected to.
    fn voice_channel_id(&self) -> Option<ChannelId>;

    /// The voice session ID.
    fn voice_session_id(&self) -> Option<&str>;
}
