//! Discord permission bit set.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags::bitflags! {
    /// Permission bits granted by roles and overwrites.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Permissions: u64 {
        const CREATE_INSTANT_INVITE = 1 << 0;
        const KICK_MEMBERS = 1 << 1;
        const BAN_MEMBERS = 1 << 2;
        const ADMINISTRATOR = 1 << 3;
        const MANAGE_CHANNELS = 1 << 4;
        const MANAGE_GUILD = 1 << 5;
        const ADD_REACTIONS = 1 << 6;
        const VIEW_AUDIT_LOG = 1 << 7;
        const PRIORITY_SPEAKER = 1 << 8;
        const STREAM = 1 << 9;
        const VIEW_CHANNEL = 1 << 10;
        const SEND_MESSAGES = 1 << 11;
        const SEND_TTS_MESSAGES = 1 << 12;
        const MANAGE_MESSAGES = 1 << 13;
        const EMBED_LINKS = 1 << 14;
        const ATTACH_FILES = 1 << 15;
        const READ_MESSAGE_HISTORY = 1 << 16;
        const MENTION_EVERYONE = 1 << 17;
        const USE_EXTERNAL_EMOJIS = 1 << 18;
        const VIEW_GUILD_INSIGHTS = 1 << 19;
        const CONNECT = 1 << 20;
        const SPEAK = 1 << 21;
        const MUTE_MEMBERS = 1 << 22;
        const DEAFEN_MEMBERS = 1 << 23;
        const MOVE_MEMBERS = 1 << 24;
        const USE_VAD = 1 << 25;
        const CHANGE_NICKNAME = 1 << 26;
        const MANAGE_NICKNAMES = 1 << 27;
        const MANAGE_ROLES = 1 << 28;
        const MANAGE_WEBHOOKS = 1 << 29;
        const MANAGE_GUILD_EXPRESSIONS = 1 << 30;
        const USE_APPLICATION_COMMANDS = 1 << 31;
        const REQUEST_TO_SPEAK = 1 << 32;
        const MANAGE_EVENTS = 1 << 33;
        const MANAGE_THREADS = 1 << 34;
        const CREATE_PUBLIC_THREADS = 1 << 35;
        const CREATE_PRIVATE_THREADS = 1 << 36;
        const USE_EXTERNAL_STICKERS = 1 << 37;
        const SEND_MESSAGES_IN_THREADS = 1 << 38;
        const USE_EMBEDDED_ACTIVITIES = 1 << 39;
        const MODERATE_MEMBERS = 1 << 40;
        const VIEW_CREATOR_MONETIZATION_ANALYTICS = 1 << 41;
        const USE_SOUNDBOARD = 1 << 42;
        const CREATE_GUILD_EXPRESSIONS = 1 << 43;
        const CREATE_EVENTS = 1 << 44;
        const USE_EXTERNAL_SOUNDS = 1 << 45;
        const SEND_VOICE_MESSAGES = 1 << 46;
        const SEND_POLLS = 1 << 49;
        const USE_EXTERNAL_APPS = 1 << 50;
    }
}

impl Permissions {
    /// Bits that only make sense when the member may send messages.
    pub const SEND_DEPENDENT: Self = Self::SEND_TTS_MESSAGES
        .union(Self::MENTION_EVERYONE)
        .union(Self::EMBED_LINKS)
        .union(Self::ATTACH_FILES);

    /// Bits that only make sense when the member may connect to voice.
    pub const VOICE: Self = Self::SPEAK
        .union(Self::MUTE_MEMBERS)
        .union(Self::DEAFEN_MEMBERS)
        .union(Self::MOVE_MEMBERS)
        .union(Self::USE_VAD)
        .union(Self::PRIORITY_SPEAKER)
        .union(Self::STREAM)
        .union(Self::REQUEST_TO_SPEAK)
        .union(Self::USE_SOUNDBOARD)
        .union(Self::USE_EXTERNAL_SOUNDS);

    /// Applies an overwrite: denied bits are removed before allowed bits are added.
    #[must_use]
    pub const fn overwrite(self, allow: Self, deny: Self) -> Self {
        self.difference(deny).union(allow)
    }
}

impl std::fmt::Display for Permissions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

impl Serialize for Permissions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        crate::domain::serde_utils::string_to_u64::serialize(&self.bits(), serializer)
    }
}

/// Bits this crate has no name for are kept so they survive resolution.
impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        crate::domain::serde_utils::string_to_u64::deserialize(deserializer)
            .map(Self::from_bits_retain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_string() {
        let perms: Permissions = serde_json::from_str(r#""3072""#).unwrap();
        assert_eq!(perms, Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES);
    }

    #[test]
    fn test_high_bits_round_trip() {
        let raw = (1_u64 << 10) | (1_u64 << 46) | (1_u64 << 49);
        let perms: Permissions = serde_json::from_str(&format!("\"{raw}\"")).unwrap();

        assert!(perms.contains(Permissions::SEND_VOICE_MESSAGES | Permissions::SEND_POLLS));
        assert_eq!(serde_json::to_string(&perms).unwrap(), format!("\"{raw}\""));
    }

    #[test]
    fn test_unnamed_bits_are_retained() {
        let perms: Permissions = serde_json::from_str(&format!("\"{}\"", 1_u64 << 62)).unwrap();

        assert_eq!(perms.bits(), 1 << 62);
        let with_view = perms | Permissions::VIEW_CHANNEL;
        assert_eq!(
            with_view.overwrite(Permissions::empty(), Permissions::VIEW_CHANNEL),
            perms
        );
    }

    #[test]
    fn test_overwrite_allow_wins_over_deny() {
        let base = Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES;
        let result = base.overwrite(Permissions::SEND_MESSAGES, Permissions::SEND_MESSAGES);
        assert_eq!(result, base);

        let result = base.overwrite(Permissions::empty(), Permissions::SEND_MESSAGES);
        assert_eq!(result, Permissions::VIEW_CHANNEL);
    }
}
