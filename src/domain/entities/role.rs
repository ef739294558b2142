use serde::{Deserialize, Serialize};

use super::{GuildId, Permissions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(#[serde(with = "crate::domain::serde_utils::string_to_u64")] pub u64);

impl RoleId {
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// The base role every member of `guild_id` implicitly holds.
    #[must_use]
    pub const fn everyone(guild_id: GuildId) -> Self {
        Self(guild_id.as_u64())
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RoleId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::str::FromStr for RoleId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub color: u32,
    #[serde(default)]
    pub hoist: bool,
    #[serde(default)]
    pub position: i32,
    pub permissions: Permissions,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub mentionable: bool,
}

impl Role {
    #[must_use]
    pub fn new(id: impl Into<RoleId>, name: impl Into<String>, permissions: Permissions) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: 0,
            hoist: false,
            position: 0,
            permissions,
            managed: false,
            mentionable: false,
        }
    }

    #[must_use]
    pub const fn with_position(mut self, position: i32) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub const fn id(&self) -> RoleId {
        self.id
    }

    #[must_use]
    pub const fn position(&self) -> i32 {
        self.position
    }

    #[must_use]
    pub const fn permissions(&self) -> Permissions {
        self.permissions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_api_json() {
        let json = r#"{
            "id": "41771983423143936",
            "name": "WE DEM BOYZZ!!!!!!",
            "color": 3447003,
            "hoist": true,
            "position": 1,
            "permissions": "66321471",
            "managed": false,
            "mentionable": false
        }"#;

        let role: Role = serde_json::from_str(json).unwrap();

        assert_eq!(role.id(), RoleId(41_771_983_423_143_936));
        assert_eq!(role.position(), 1);
        assert!(role.permissions().contains(Permissions::KICK_MEMBERS));
    }

    #[test]
    fn test_everyone_role_shares_guild_id() {
        assert_eq!(RoleId::everyone(GuildId(81_384_788_765_712_384)).as_u64(), 81_384_788_765_712_384);
    }
}
