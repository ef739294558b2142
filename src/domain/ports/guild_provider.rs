//! Guild lookup port.

use std::fmt;
use std::sync::Arc;

use crate::domain::entities::{Guild, GuildId, RoleId};

/// Read-only access to guilds owned elsewhere.
#[cfg_attr(test, mockall::automock)]
pub trait GuildProvider: Send + Sync {
    /// Returns the current snapshot of a guild, if it is known.
    fn guild(&self, id: GuildId) -> Option<Arc<Guild>>;
}

/// Lookup handle from a member to its owning guild.
///
/// Holds only the guild ID and the registry accessor, so the member never
/// keeps a guild snapshot alive past its registry entry.
#[derive(Clone)]
pub struct GuildHandle {
    id: GuildId,
    provider: Arc<dyn GuildProvider>,
}

impl GuildHandle {
    /// Creates a handle for `id` resolved through `provider`.
    #[must_use]
    pub fn new(id: GuildId, provider: Arc<dyn GuildProvider>) -> Self {
        Self { id, provider }
    }

    /// Returns the guild ID.
    #[must_use]
    pub const fn id(&self) -> GuildId {
        self.id
    }

    /// Returns the base role ID, which is known without a lookup.
    #[must_use]
    pub const fn everyone_role_id(&self) -> RoleId {
        RoleId::everyone(self.id)
    }

    /// Resolves the current guild snapshot.
    #[must_use]
    pub fn resolve(&self) -> Option<Arc<Guild>> {
        self.provider.guild(self.id)
    }
}

impl fmt::Debug for GuildHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuildHandle").field("id", &self.id).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    #[test]
    fn test_handle_resolves_through_provider_each_time() {
        let mut provider = MockGuildProvider::new();
        provider
            .expect_guild()
            .with(eq(GuildId(10)))
            .times(2)
            .returning(|id| Some(Arc::new(Guild::new(id, "Lookup"))));

        let handle = GuildHandle::new(GuildId(10), Arc::new(provider));

        assert_eq!(handle.resolve().unwrap().name(), "Lookup");
        assert_eq!(handle.resolve().unwrap().id(), GuildId(10));
    }

    #[test]
    fn test_everyone_role_needs_no_lookup() {
        let mut provider = MockGuildProvider::new();
        provider.expect_guild().never();

        let handle = GuildHandle::new(GuildId(10), Arc::new(provider));

        assert_eq!(handle.everyone_role_id(), RoleId(10));
    }
}
