//! Discord guild entity.

use serde::{Deserialize, Serialize};

use super::{Role, RoleId, UserId};

/// Unique identifier for a Discord guild (server).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuildId(#[serde(with = "crate::domain::serde_utils::string_to_u64")] pub u64);

impl GuildId {
    /// Returns the underlying u64 value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for GuildId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for GuildId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::str::FromStr for GuildId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Discord guild (server) information with its role table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Guild {
    id: GuildId,
    name: String,
    #[serde(default)]
    owner_id: Option<UserId>,
    #[serde(default)]
    roles: Vec<Role>,
    #[serde(default)]
    unavailable: bool,
}

impl Guild {
    /// Creates a new, available guild with no roles.
    #[must_use]
    pub fn new(id: impl Into<GuildId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            owner_id: None,
            roles: Vec::new(),
            unavailable: false,
        }
    }

    /// Sets the guild owner.
    #[must_use]
    pub fn with_owner(mut self, owner_id: impl Into<UserId>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    /// Sets the role table.
    #[must_use]
    pub fn with_roles(mut self, roles: Vec<Role>) -> Self {
        self.roles = roles;
        self
    }

    /// Sets whether the guild data has been downloaded.
    #[must_use]
    pub const fn with_available(mut self, available: bool) -> Self {
        self.unavailable = !available;
        self
    }

    /// Returns the guild ID.
    #[must_use]
    pub const fn id(&self) -> GuildId {
        self.id
    }

    /// Returns the guild name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the owner's user ID, if known.
    #[must_use]
    pub const fn owner_id(&self) -> Option<UserId> {
        self.owner_id
    }

    /// Returns whether the guild data is available locally.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        !self.unavailable
    }

    /// Sets whether the guild data is available locally.
    pub const fn set_available(&mut self, available: bool) {
        self.unavailable = !available;
    }

    /// Returns the role table.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Looks up a role by ID.
    #[must_use]
    pub fn role(&self, id: RoleId) -> Option<&Role> {
        self.roles.iter().find(|r| r.id == id)
    }

    /// Returns the base role every member holds.
    #[must_use]
    pub fn everyone_role(&self) -> Option<&Role> {
        self.role(RoleId::everyone(self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Permissions;

    #[test]
    fn test_guild_creation() {
        let guild = Guild::new(123_u64, "Test Server");

        assert_eq!(guild.id().as_u64(), 123);
        assert_eq!(guild.name(), "Test Server");
        assert!(guild.is_available());
        assert!(guild.everyone_role().is_none());
    }

    #[test]
    fn test_guild_from_api_json_defaults_to_available() {
        let json = r#"{
            "id": "197038439483310086",
            "name": "Discord Testers",
            "owner_id": "73193882359173120",
            "roles": [
                {"id": "197038439483310086", "name": "@everyone", "permissions": "104324161", "position": 0}
            ]
        }"#;

        let guild: Guild = serde_json::from_str(json).unwrap();

        assert!(guild.is_available());
        assert_eq!(guild.owner_id(), Some(UserId(73_193_882_359_173_120)));
        let everyone = guild.everyone_role().unwrap();
        assert!(everyone.permissions().contains(Permissions::VIEW_CHANNEL));
    }

    #[test]
    fn test_unavailable_guild() {
        let json = r#"{"id": "1", "name": "", "unavailable": true}"#;
        let mut guild: Guild = serde_json::from_str(json).unwrap();

        assert!(!guild.is_available());
        guild.set_available(true);
        assert!(guild.is_available());
    }

    #[test]
    fn test_guild_id_display() {
        let id = GuildId(123_456_789);
        assert_eq!(format!("{id}"), "123456789");
    }
}
