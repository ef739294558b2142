//! Owning collection of the members of one guild.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::{GuildId, GuildMember, UserId};
use crate::domain::errors::MemberError;
use crate::domain::ports::{GuildHandle, MemberPayload, MemberPort, RequestOptions};

/// Materializes, reconciles and evicts the members of a single guild.
pub struct GuildMemberRoster {
    guild: GuildHandle,
    client: Arc<dyn MemberPort>,
    members: HashMap<UserId, GuildMember>,
}

impl GuildMemberRoster {
    #[must_use]
    pub fn new(guild: GuildHandle, client: Arc<dyn MemberPort>) -> Self {
        Self {
            guild,
            client,
            members: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn guild_id(&self) -> GuildId {
        self.guild.id()
    }

    /// Creates the member if absent, otherwise reconciles it in place.
    pub fn upsert(&mut self, payload: &MemberPayload) -> &mut GuildMember {
        match self.members.entry(payload.user_id()) {
            Entry::Occupied(entry) => {
                let member = entry.into_mut();
                member.reconcile(payload);
                member
            }
            Entry::Vacant(entry) => entry.insert(GuildMember::from_payload(
                self.guild.clone(),
                Arc::clone(&self.client),
                payload,
            )),
        }
    }

    /// Applies a batch of payloads, e.g. from a member list sync.
    pub fn extend<'a>(&mut self, payloads: impl IntoIterator<Item = &'a MemberPayload>) {
        let mut count = 0_usize;
        for payload in payloads {
            self.upsert(payload);
            count += 1;
        }
        debug!(guild_id = %self.guild_id(), count, total = self.members.len(), "Synced members");
    }

    #[must_use]
    pub fn get(&self, user_id: UserId) -> Option<&GuildMember> {
        self.members.get(&user_id)
    }

    pub fn get_mut(&mut self, user_id: UserId) -> Option<&mut GuildMember> {
        self.members.get_mut(&user_id)
    }

    /// Returns the cached member, fetching it on first reference.
    ///
    /// # Errors
    /// Returns `NotFound` or a transport error from the fetch. Nothing is
    /// cached on failure.
    pub async fn get_or_fetch(
        &mut self,
        user_id: UserId,
        options: &RequestOptions,
    ) -> Result<&mut GuildMember, MemberError> {
        if !self.members.contains_key(&user_id) {
            debug!(guild_id = %self.guild_id(), %user_id, "Member not cached, fetching");
            let payload = self
                .client
                .fetch_member(self.guild_id(), user_id, options)
                .await?;
            return Ok(self.upsert(&payload));
        }

        self.members
            .get_mut(&user_id)
            .ok_or_else(|| MemberError::not_found(self.guild.id(), user_id))
    }

    /// Drops a member that left the guild.
    pub fn evict(&mut self, user_id: UserId) -> Option<GuildMember> {
        let removed = self.members.remove(&user_id);
        if removed.is_some() {
            debug!(guild_id = %self.guild_id(), %user_id, "Evicted member");
        }
        removed
    }

    /// Kicks a cached member and evicts it once the server confirms.
    ///
    /// # Errors
    /// Returns `NotFound` if the member is not cached, or the kick error. The
    /// member stays cached on failure.
    pub async fn kick(
        &mut self,
        user_id: UserId,
        options: &RequestOptions,
    ) -> Result<GuildMember, MemberError> {
        let guild_id = self.guild_id();
        let member = self
            .members
            .get(&user_id)
            .ok_or_else(|| MemberError::not_found(guild_id, user_id))?;

        member.kick(options).await?;
        info!(%guild_id, %user_id, "Member kicked");

        self.members
            .remove(&user_id)
            .ok_or_else(|| MemberError::not_found(guild_id, user_id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GuildMember> {
        self.members.values()
    }
}
