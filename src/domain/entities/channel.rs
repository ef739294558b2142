//! Discord channel entity.

use serde::{Deserialize, Serialize};

use super::{GuildId, Permissions, RoleId, UserId};

/// Unique identifier for a Discord channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(#[serde(with = "crate::domain::serde_utils::string_to_u64")] pub u64);

impl ChannelId {
    /// Returns the underlying u64 value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ChannelId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::str::FromStr for ChannelId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Discord channel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ChannelKind {
    /// Text channel.
    #[default]
    Text,
    /// Direct message channel.
    Dm,
    /// Voice channel.
    Voice,
    /// Group direct message channel.
    GroupDm,
    /// Category channel.
    Category,
    /// Announcement channel.
    Announcement,
    /// Announcement thread channel.
    AnnouncementThread,
    /// Public thread channel.
    PublicThread,
    /// Private thread channel.
    PrivateThread,
    /// Stage voice channel.
    StageVoice,
    /// Directory channel.
    Directory,
    /// Forum channel.
    Forum,
    /// Media channel.
    Media,
    /// Type this crate does not know; no kind-specific rules apply.
    Unknown(u8),
}

impl ChannelKind {
    /// Returns true if this channel type supports text messages.
    #[must_use]
    pub const fn is_text_based(self) -> bool {
        matches!(
            self,
            Self::Text
                | Self::Dm
                | Self::GroupDm
                | Self::Announcement
                | Self::AnnouncementThread
                | Self::PublicThread
                | Self::PrivateThread
                | Self::Forum
                | Self::Media
        )
    }

    /// Returns true if this is a voice channel.
    #[must_use]
    pub const fn is_voice(self) -> bool {
        matches!(self, Self::Voice | Self::StageVoice)
    }
}

impl From<u8> for ChannelKind {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Text,
            1 => Self::Dm,
            2 => Self::Voice,
            3 => Self::GroupDm,
            4 => Self::Category,
            5 => Self::Announcement,
            10 => Self::AnnouncementThread,
            11 => Self::PublicThread,
            12 => Self::PrivateThread,
            13 => Self::StageVoice,
            14 => Self::Directory,
            15 => Self::Forum,
            16 => Self::Media,
            other => Self::Unknown(other),
        }
    }
}

impl From<ChannelKind> for u8 {
    fn from(kind: ChannelKind) -> Self {
        match kind {
            ChannelKind::Text => 0,
            ChannelKind::Dm => 1,
            ChannelKind::Voice => 2,
            ChannelKind::GroupDm => 3,
            ChannelKind::Category => 4,
            ChannelKind::Announcement => 5,
            ChannelKind::AnnouncementThread => 10,
            ChannelKind::PublicThread => 11,
            ChannelKind::PrivateThread => 12,
            ChannelKind::StageVoice => 13,
            ChannelKind::Directory => 14,
            ChannelKind::Forum => 15,
            ChannelKind::Media => 16,
            ChannelKind::Unknown(value) => value,
        }
    }
}

/// Target of a permission overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum OverwriteType {
    /// Applies to every member holding the role.
    Role,
    /// Applies to a single member.
    Member,
}

impl From<u8> for OverwriteType {
    fn from(value: u8) -> Self {
        if value == 1 { Self::Member } else { Self::Role }
    }
}

impl From<OverwriteType> for u8 {
    fn from(kind: OverwriteType) -> Self {
        match kind {
            OverwriteType::Role => 0,
            OverwriteType::Member => 1,
        }
    }
}

/// Per-channel allow/deny adjustment for a role or a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverwrite {
    /// Role or user ID, depending on `kind`.
    #[serde(with = "crate::domain::serde_utils::string_to_u64")]
    pub id: u64,
    /// Whether `id` names a role or a member.
    #[serde(rename = "type")]
    pub kind: OverwriteType,
    /// Bits granted.
    #[serde(default)]
    pub allow: Permissions,
    /// Bits revoked.
    #[serde(default)]
    pub deny: Permissions,
}

impl PermissionOverwrite {
    /// Creates a role overwrite.
    #[must_use]
    pub const fn role(id: RoleId, allow: Permissions, deny: Permissions) -> Self {
        Self {
            id: id.as_u64(),
            kind: OverwriteType::Role,
            allow,
            deny,
        }
    }

    /// Creates a member overwrite.
    #[must_use]
    pub const fn member(id: UserId, allow: Permissions, deny: Permissions) -> Self {
        Self {
            id: id.as_u64(),
            kind: OverwriteType::Member,
            allow,
            deny,
        }
    }
}

/// Discord guild channel with its permission overwrites.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Channel {
    id: ChannelId,
    #[serde(default)]
    guild_id: Option<GuildId>,
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    kind: ChannelKind,
    #[serde(default)]
    permission_overwrites: Vec<PermissionOverwrite>,
}

impl Channel {
    /// Creates a new channel with the given ID, name, and type.
    #[must_use]
    pub fn new(id: impl Into<ChannelId>, name: impl Into<String>, kind: ChannelKind) -> Self {
        Self {
            id: id.into(),
            guild_id: None,
            name: name.into(),
            kind,
            permission_overwrites: Vec::new(),
        }
    }

    /// Sets the guild ID for this channel.
    #[must_use]
    pub fn with_guild(mut self, guild_id: impl Into<GuildId>) -> Self {
        self.guild_id = Some(guild_id.into());
        self
    }

    /// Adds a permission overwrite.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: PermissionOverwrite) -> Self {
        self.permission_overwrites.push(overwrite);
        self
    }

    /// Returns the channel ID.
    #[must_use]
    pub const fn id(&self) -> ChannelId {
        self.id
    }

    /// Returns the owning guild, if any.
    #[must_use]
    pub const fn guild_id(&self) -> Option<GuildId> {
        self.guild_id
    }

    /// Returns the channel name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the channel type.
    #[must_use]
    pub const fn kind(&self) -> ChannelKind {
        self.kind
    }

    /// Returns the permission overwrites.
    #[must_use]
    pub fn permission_overwrites(&self) -> &[PermissionOverwrite] {
        &self.permission_overwrites
    }

    /// Finds the overwrite for a role.
    #[must_use]
    pub fn role_overwrite(&self, role_id: RoleId) -> Option<&PermissionOverwrite> {
        self.permission_overwrites
            .iter()
            .find(|o| o.kind == OverwriteType::Role && o.id == role_id.as_u64())
    }

    /// Finds the overwrite for a member.
    #[must_use]
    pub fn member_overwrite(&self, user_id: UserId) -> Option<&PermissionOverwrite> {
        self.permission_overwrites
            .iter()
            .find(|o| o.kind == OverwriteType::Member && o.id == user_id.as_u64())
    }
}
