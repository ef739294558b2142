//! Guild member entity.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{Channel, ChannelId, Guild, GuildId, Permissions, RoleId, User, UserId, VoiceState};
use crate::domain::errors::MemberError;
use crate::domain::optional::Optional;
use crate::domain::ports::{GuildHandle, MemberPayload, MemberPort, ModifyMemberParams, RequestOptions};
use crate::domain::services::PermissionCalculator;

/// Fields to merge into a member; unspecified fields are left untouched.
#[derive(Debug, Default)]
struct MemberUpdate {
    user: Optional<User>,
    nick: Optional<Option<String>>,
    joined_at: Optional<DateTime<Utc>>,
    premium_since: Optional<Option<DateTime<Utc>>>,
    deaf: Optional<bool>,
    mute: Optional<bool>,
    roles: Optional<Vec<RoleId>>,
}

impl MemberUpdate {
    fn from_payload(payload: &MemberPayload) -> Self {
        Self {
            user: Optional::Specified(payload.user.clone()),
            nick: payload.nick.clone(),
            joined_at: Optional::Specified(payload.joined_at),
            premium_since: Optional::Specified(payload.premium_since),
            deaf: Optional::Specified(payload.deaf),
            mute: Optional::Specified(payload.mute),
            roles: Optional::Specified(payload.roles.clone()),
        }
    }

    /// Keeps only the fields `sent` specified, preferring the echoed values.
    fn from_echo(sent: &ModifyMemberParams, echoed: ModifyMemberParams) -> Self {
        fn pick<T: Clone>(sent: &Optional<T>, echoed: Optional<T>) -> Optional<T> {
            if sent.is_specified() {
                echoed.or(sent.clone())
            } else {
                Optional::Unspecified
            }
        }

        Self {
            nick: pick(&sent.nick, echoed.nick),
            deaf: pick(&sent.deaf, echoed.deaf),
            mute: pick(&sent.mute, echoed.mute),
            roles: pick(&sent.roles, echoed.roles),
            ..Self::default()
        }
    }
}

/// Locally cached projection of a guild member.
///
/// The role list always starts with the guild's base role. Permissions are
/// resolved against the guild on every call and never cached.
pub struct GuildMember {
    id: UserId,
    guild: GuildHandle,
    client: Arc<dyn MemberPort>,
    user: User,
    nickname: Option<String>,
    joined_at: DateTime<Utc>,
    premium_since: Option<DateTime<Utc>>,
    is_deafened: bool,
    is_muted: bool,
    role_ids: Vec<RoleId>,
}

impl GuildMember {
    /// Builds a member from a full payload.
    #[must_use]
    pub fn from_payload(
        guild: GuildHandle,
        client: Arc<dyn MemberPort>,
        payload: &MemberPayload,
    ) -> Self {
        let mut member = Self {
            id: payload.user_id(),
            role_ids: vec![guild.everyone_role_id()],
            guild,
            client,
            user: payload.user.clone(),
            nickname: None,
            joined_at: payload.joined_at,
            premium_since: None,
            is_deafened: false,
            is_muted: false,
        };
        member.reconcile(payload);
        member
    }

    /// Merges a full payload. An omitted nickname leaves the current one.
    pub fn reconcile(&mut self, payload: &MemberPayload) {
        self.apply(MemberUpdate::from_payload(payload));
    }

    fn apply(&mut self, update: MemberUpdate) {
        update.user.assign_to(&mut self.user);
        update.joined_at.assign_to(&mut self.joined_at);
        update.nick.assign_to(&mut self.nickname);
        update.premium_since.assign_to(&mut self.premium_since);
        update.deaf.assign_to(&mut self.is_deafened);
        update.mute.assign_to(&mut self.is_muted);
        if let Optional::Specified(roles) = update.roles {
            self.update_roles(&roles);
        }
    }

    fn update_roles(&mut self, roles: &[RoleId]) {
        let everyone = self.guild.everyone_role_id();
        let mut role_ids = Vec::with_capacity(roles.len() + 1);
        role_ids.push(everyone);
        role_ids.extend(roles.iter().copied().filter(|id| *id != everyone));
        self.role_ids = role_ids;
    }

    /// Re-fetches the member and merges the result.
    ///
    /// # Errors
    /// Returns `NotFound` if the member left the guild, or a transport error.
    /// Local state is untouched on failure.
    pub async fn refresh(&mut self, options: &RequestOptions) -> Result<(), MemberError> {
        debug!(guild_id = %self.guild_id(), user_id = %self.id, "Refreshing guild member");

        let payload = self
            .client
            .fetch_member(self.guild_id(), self.id, options)
            .await?;
        self.reconcile(&payload);
        Ok(())
    }

    /// Sends `params` to the server and merges the fields it specified.
    ///
    /// # Errors
    /// Returns `NotFound` or a transport error. Local state is untouched on
    /// failure.
    pub async fn modify(
        &mut self,
        mut params: ModifyMemberParams,
        options: &RequestOptions,
    ) -> Result<(), MemberError> {
        let everyone = self.guild.everyone_role_id();
        params.roles = params
            .roles
            .map(|roles| roles.into_iter().filter(|id| *id != everyone).collect());

        debug!(guild_id = %self.guild_id(), user_id = %self.id, ?params, "Modifying guild member");

        let echoed = self
            .client
            .patch_member(self.guild_id(), self.id, &params, options)
            .await?;
        self.apply(MemberUpdate::from_echo(&params, echoed));
        Ok(())
    }

    /// Adds roles, keeping the ones already held.
    ///
    /// # Errors
    /// See [`GuildMember::modify`].
    pub async fn add_roles(
        &mut self,
        roles: &[RoleId],
        options: &RequestOptions,
    ) -> Result<(), MemberError> {
        let mut explicit = self.explicit_role_ids().to_vec();
        for role in roles {
            if !explicit.contains(role) {
                explicit.push(*role);
            }
        }
        self.modify(ModifyMemberParams::new().with_roles(explicit), options)
            .await
    }

    /// Removes roles. The base role cannot be removed.
    ///
    /// # Errors
    /// See [`GuildMember::modify`].
    pub async fn remove_roles(
        &mut self,
        roles: &[RoleId],
        options: &RequestOptions,
    ) -> Result<(), MemberError> {
        let explicit: Vec<RoleId> = self
            .explicit_role_ids()
            .iter()
            .copied()
            .filter(|id| !roles.contains(id))
            .collect();
        self.modify(ModifyMemberParams::new().with_roles(explicit), options)
            .await
    }

    /// Sets the guild nickname.
    ///
    /// # Errors
    /// See [`GuildMember::modify`].
    pub async fn set_nickname(
        &mut self,
        nickname: impl Into<String>,
        options: &RequestOptions,
    ) -> Result<(), MemberError> {
        self.modify(ModifyMemberParams::new().with_nick(nickname), options)
            .await
    }

    /// Resets the nickname so the global name is shown again.
    ///
    /// # Errors
    /// See [`GuildMember::modify`].
    pub async fn clear_nickname(&mut self, options: &RequestOptions) -> Result<(), MemberError> {
        self.modify(ModifyMemberParams::new().clear_nick(), options)
            .await
    }

    /// Removes the member from the guild. Local state is not changed.
    ///
    /// # Errors
    /// Returns `NotFound` or a transport error.
    pub async fn kick(&self, options: &RequestOptions) -> Result<(), MemberError> {
        debug!(
            guild_id = %self.guild_id(),
            user_id = %self.id,
            reason = options.audit_log_reason(),
            "Kicking guild member"
        );
        self.client
            .remove_member(self.guild_id(), self.id, options)
            .await
    }

    fn available_guild(&self) -> Result<Arc<Guild>, MemberError> {
        let guild = self.guild.resolve().ok_or_else(|| {
            MemberError::invalid_state(format!("guild {} is not loaded", self.guild_id()))
        })?;

        if !guild.is_available() {
            return Err(MemberError::invalid_state(
                "resolving permissions requires the parent guild to be downloaded",
            ));
        }

        Ok(guild)
    }

    /// Resolves guild-level permissions from the current roles.
    ///
    /// # Errors
    /// Returns `InvalidState` if the guild is not loaded or unavailable.
    pub fn guild_permissions(&self) -> Result<Permissions, MemberError> {
        let guild = self.available_guild()?;
        Ok(PermissionCalculator::resolve_guild(
            &guild,
            self.id,
            &self.role_ids,
        ))
    }

    /// Resolves effective permissions in `channel`.
    ///
    /// # Errors
    /// Returns `InvalidState` if the guild is not loaded or unavailable, or
    /// if the channel belongs to another guild.
    pub fn channel_permissions(&self, channel: &Channel) -> Result<Permissions, MemberError> {
        let guild = self.available_guild()?;

        if let Some(channel_guild) = channel.guild_id()
            && channel_guild != guild.id()
        {
            return Err(MemberError::invalid_state(format!(
                "channel {} belongs to guild {channel_guild}, not {}",
                channel.id(),
                guild.id()
            )));
        }

        let guild_permissions = PermissionCalculator::resolve_guild(&guild, self.id, &self.role_ids);
        Ok(PermissionCalculator::resolve_channel(
            &guild,
            self.id,
            &self.role_ids,
            channel,
            guild_permissions,
        ))
    }

    /// Position of the member's highest role; the owner outranks everyone.
    ///
    /// # Errors
    /// Returns `InvalidState` if the guild is not loaded or unavailable.
    pub fn hierarchy(&self) -> Result<i32, MemberError> {
        let guild = self.available_guild()?;

        if guild.owner_id() == Some(self.id) {
            return Ok(i32::MAX);
        }

        Ok(self
            .role_ids
            .iter()
            .filter_map(|id| guild.role(*id))
            .map(|role| role.position)
            .max()
            .unwrap_or(0))
    }

    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub const fn guild_id(&self) -> GuildId {
        self.guild.id()
    }

    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    #[must_use]
    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    /// Nickname if set and non-empty, otherwise the user's display name.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self.nickname.as_deref() {
            Some(nick) if !nick.is_empty() => nick.to_string(),
            _ => self.user.display_name(),
        }
    }

    #[must_use]
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }

    #[must_use]
    pub const fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }

    #[must_use]
    pub const fn premium_since(&self) -> Option<DateTime<Utc>> {
        self.premium_since
    }

    #[must_use]
    pub const fn is_deafened(&self) -> bool {
        self.is_deafened
    }

    #[must_use]
    pub const fn is_muted(&self) -> bool {
        self.is_muted
    }

    /// All roles, base role first.
    #[must_use]
    pub fn role_ids(&self) -> &[RoleId] {
        &self.role_ids
    }

    /// Roles assigned explicitly, without the base role.
    #[must_use]
    pub fn explicit_role_ids(&self) -> &[RoleId] {
        &self.role_ids[1..]
    }

    #[must_use]
    pub fn has_role(&self, role_id: RoleId) -> bool {
        self.role_ids.contains(&role_id)
    }
}

impl VoiceState for GuildMember {
    fn is_self_deafened(&self) -> bool {
        false
    }

    fn is_self_muted(&self) -> bool {
        false
    }

    fn is_suppressed(&self) -> bool {
        false
    }

    fn voice_channel_id(&self) -> Option<ChannelId> {
        None
    }

    fn voice_session_id(&self) -> Option<&str> {
        None
    }
}

impl fmt::Debug for GuildMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuildMember")
            .field("id", &self.id)
            .field("guild_id", &self.guild_id())
            .field("username", &self.user.username())
            .field("nickname", &self.nickname)
            .field("role_ids", &self.role_ids)
            .finish_non_exhaustive()
    }
}
