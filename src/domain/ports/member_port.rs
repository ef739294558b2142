//! Guild member transport port and its wire payloads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RequestOptions;
use crate::domain::entities::{ChannelId, GuildId, RoleId, User, UserId};
use crate::domain::errors::MemberError;
use crate::domain::optional::Optional;

/// Full guild member object as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberPayload {
    pub user: User,
    #[serde(default, skip_serializing_if = "Optional::is_unspecified")]
    pub nick: Optional<Option<String>>,
    /// Explicit roles; never contains the base role.
    #[serde(default)]
    pub roles: Vec<RoleId>,
    pub joined_at: DateTime<Utc>,
    #[serde(default)]
    pub premium_since: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deaf: bool,
    #[serde(default)]
    pub mute: bool,
}

impl MemberPayload {
    #[must_use]
    pub const fn new(user: User, joined_at: DateTime<Utc>) -> Self {
        Self {
            user,
            nick: Optional::Unspecified,
            roles: Vec::new(),
            joined_at,
            premium_since: None,
            deaf: false,
            mute: false,
        }
    }

    #[must_use]
    pub fn with_nick(mut self, nick: Option<&str>) -> Self {
        self.nick = Optional::Specified(nick.map(str::to_string));
        self
    }

    #[must_use]
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = impl Into<RoleId>>) -> Self {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn with_voice(mut self, deaf: bool, mute: bool) -> Self {
        self.deaf = deaf;
        self.mute = mute;
        self
    }

    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user.id()
    }
}

/// Change set for `PATCH /guilds/{guild}/members/{user}`.
///
/// Every field is independently optional; only specified fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyMemberParams {
    #[serde(default, skip_serializing_if = "Optional::is_unspecified")]
    pub nick: Optional<Option<String>>,
    #[serde(default, skip_serializing_if = "Optional::is_unspecified")]
    pub roles: Optional<Vec<RoleId>>,
    #[serde(default, skip_serializing_if = "Optional::is_unspecified")]
    pub mute: Optional<bool>,
    #[serde(default, skip_serializing_if = "Optional::is_unspecified")]
    pub deaf: Optional<bool>,
    /// Voice channel to move the member to; `None` disconnects.
    #[serde(default, skip_serializing_if = "Optional::is_unspecified")]
    pub channel_id: Optional<Option<ChannelId>>,
}

impl ModifyMemberParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_nick(mut self, nick: impl Into<String>) -> Self {
        self.nick = Optional::Specified(Some(nick.into()));
        self
    }

    /// Resets the nickname so the global name is shown.
    #[must_use]
    pub fn clear_nick(mut self) -> Self {
        self.nick = Optional::Specified(None);
        self
    }

    /// Replaces the explicit role list.
    #[must_use]
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = impl Into<RoleId>>) -> Self {
        self.roles = Optional::Specified(roles.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_mute(mut self, mute: bool) -> Self {
        self.mute = Optional::Specified(mute);
        self
    }

    #[must_use]
    pub fn with_deaf(mut self, deaf: bool) -> Self {
        self.deaf = Optional::Specified(deaf);
        self
    }

    #[must_use]
    pub fn move_to(mut self, channel_id: Option<ChannelId>) -> Self {
        self.channel_id = Optional::Specified(channel_id);
        self
    }

    /// Returns true if no field is specified.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nick.is_unspecified()
            && self.roles.is_unspecified()
            && self.mute.is_unspecified()
            && self.deaf.is_unspecified()
            && self.channel_id.is_unspecified()
    }
}

/// Port for guild member REST operations.
#[async_trait]
pub trait MemberPort: Send + Sync {
    /// Fetches the current member object.
    async fn fetch_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        options: &RequestOptions,
    ) -> Result<MemberPayload, MemberError>;

    /// Applies a change set and returns the change set the server accepted.
    async fn patch_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        params: &ModifyMemberParams,
        options: &RequestOptions,
    ) -> Result<ModifyMemberParams, MemberError>;

    /// Removes the member from the guild.
    async fn remove_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        options: &RequestOptions,
    ) -> Result<(), MemberError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// In-memory member port for testing.
    #[derive(Default)]
    pub struct MockMemberPort {
        members: Mutex<HashMap<(GuildId, UserId), MemberPayload>>,
        failure: Mutex<Option<MemberError>>,
        patches: Mutex<Vec<ModifyMemberParams>>,
        removed: Mutex<Vec<(GuildId, UserId)>>,
    }

    impl MockMemberPort {
        /// Creates empty mock.
        pub fn new() -> Self {
            Self::default()
        }

        /// Stores a member the port will serve.
        pub fn with_member(self, guild_id: GuildId, payload: MemberPayload) -> Self {
            self.put_member(guild_id, payload);
            self
        }

        /// Replaces the stored member.
        pub fn put_member(&self, guild_id: GuildId, payload: MemberPayload) {
            self.members
                .lock()
                .insert((guild_id, payload.user_id()), payload);
        }

        /// Makes every following call fail with `error`.
        pub fn fail_with(&self, error: MemberError) {
            *self.failure.lock() = Some(error);
        }

        /// Change sets received so far.
        pub fn patches(&self) -> Vec<ModifyMemberParams> {
            self.patches.lock().clone()
        }

        /// Members removed so far.
        pub fn removed(&self) -> Vec<(GuildId, UserId)> {
            self.removed.lock().clone()
        }

        fn check_failure(&self) -> Result<(), MemberError> {
            self.failure.lock().clone().map_or(Ok(()), Err)
        }
    }

    #[async_trait]
    impl MemberPort for MockMemberPort {
        async fn fetch_member(
            &self,
            guild_id: GuildId,
            user_id: UserId,
            _options: &RequestOptions,
        ) -> Result<MemberPayload, MemberError> {
            self.check_failure()?;
            self.members
                .lock()
                .get(&(guild_id, user_id))
                .cloned()
                .ok_or(MemberError::not_found(guild_id, user_id))
        }

        async fn patch_member(
            &self,
            guild_id: GuildId,
            user_id: UserId,
            params: &ModifyMemberParams,
            _options: &RequestOptions,
        ) -> Result<ModifyMemberParams, MemberError> {
            self.check_failure()?;
            let mut members = self.members.lock();
            let stored = members
                .get_mut(&(guild_id, user_id))
                .ok_or(MemberError::not_found(guild_id, user_id))?;

            if let Optional::Specified(nick) = &params.nick {
                stored.nick = Optional::Specified(nick.clone());
            }
            params.roles.clone().assign_to(&mut stored.roles);
            params.mute.assign_to(&mut stored.mute);
            params.deaf.assign_to(&mut stored.deaf);

            self.patches.lock().push(params.clone());
            Ok(params.clone())
        }

        async fn remove_member(
            &self,
            guild_id: GuildId,
            user_id: UserId,
            _options: &RequestOptions,
        ) -> Result<(), MemberError> {
            self.check_failure()?;
            self.members
                .lock()
                .remove(&(guild_id, user_id))
                .ok_or(MemberError::not_found(guild_id, user_id))?;
            self.removed.lock().push((guild_id, user_id));
            Ok(())
        }
    }
}
