//! In-memory guild registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::domain::entities::{Guild, GuildId};
use crate::domain::ports::{GuildHandle, GuildProvider};

/// Owns guild snapshots and hands out lookup handles to members.
///
/// Replacing a guild swaps the snapshot atomically; members observe the new
/// snapshot on their next permission read.
#[derive(Default)]
pub struct InMemoryGuildRegistry {
    guilds: RwLock<HashMap<GuildId, Arc<Guild>>>,
}

impl InMemoryGuildRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a guild.
    pub fn insert(&self, guild: Guild) {
        debug!(guild_id = %guild.id(), roles = guild.roles().len(), "Storing guild");
        self.guilds.write().insert(guild.id(), Arc::new(guild));
    }

    /// Removes a guild, returning its last snapshot.
    pub fn remove(&self, id: GuildId) -> Option<Arc<Guild>> {
        self.guilds.write().remove(&id)
    }

    /// Marks a stored guild as available or not. Returns false if unknown.
    pub fn set_available(&self, id: GuildId, available: bool) -> bool {
        let mut guilds = self.guilds.write();
        let Some(current) = guilds.get_mut(&id) else {
            return false;
        };

        Arc::make_mut(current).set_available(available);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.guilds.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guilds.read().is_empty()
    }

    /// Creates a lookup handle for `id` backed by this registry.
    #[must_use]
    pub fn handle(self: &Arc<Self>, id: GuildId) -> GuildHandle {
        GuildHandle::new(id, Arc::clone(self) as Arc<dyn GuildProvider>)
    }
}

impl GuildProvider for InMemoryGuildRegistry {
    fn guild(&self, id: GuildId) -> Option<Arc<Guild>> {
        self.guilds.read().get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let registry = Arc::new(InMemoryGuildRegistry::new());
        registry.insert(Guild::new(1_u64, "One"));

        let handle = registry.handle(GuildId(1));

        assert_eq!(handle.resolve().unwrap().name(), "One");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_handle_sees_replacement() {
        let registry = Arc::new(InMemoryGuildRegistry::new());
        registry.insert(Guild::new(1_u64, "Old"));
        let handle = registry.handle(GuildId(1));

        registry.insert(Guild::new(1_u64, "New"));

        assert_eq!(handle.resolve().unwrap().name(), "New");
    }

    #[test]
    fn test_set_available_does_not_touch_outstanding_snapshots() {
        let registry = Arc::new(InMemoryGuildRegistry::new());
        registry.insert(Guild::new(1_u64, "One"));
        let snapshot = registry.guild(GuildId(1)).unwrap();

        assert!(registry.set_available(GuildId(1), false));

        assert!(snapshot.is_available());
        assert!(!registry.guild(GuildId(1)).unwrap().is_available());
        assert!(!registry.set_available(GuildId(2), false));
    }

    #[test]
    fn test_removed_guild_no_longer_resolves() {
        let registry = Arc::new(InMemoryGuildRegistry::new());
        registry.insert(Guild::new(1_u64, "One"));
        let handle = registry.handle(GuildId(1));

        registry.remove(GuildId(1));

        assert!(handle.resolve().is_none());
        assert!(registry.is_empty());
    }
}
