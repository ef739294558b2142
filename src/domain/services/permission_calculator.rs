use crate::domain::entities::{Channel, Guild, Permissions, PermissionOverwrite, RoleId, UserId};

pub struct PermissionCalculator;

impl PermissionCalculator {
    /// Union of the permissions of every role in `role_ids`.
    ///
    /// Role IDs missing from the guild's role table contribute nothing.
    #[must_use]
    pub fn resolve_guild(guild: &Guild, member_id: UserId, role_ids: &[RoleId]) -> Permissions {
        if guild.owner_id() == Some(member_id) {
            return Permissions::all();
        }

        let mut permissions = guild
            .everyone_role()
            .map_or_else(Permissions::empty, |r| r.permissions);

        for role_id in role_ids {
            if let Some(role) = guild.role(*role_id) {
                permissions |= role.permissions;
            }
        }

        if permissions.contains(Permissions::ADMINISTRATOR) {
            return Permissions::all();
        }

        permissions
    }

    /// Layers `channel` overwrites over `guild_permissions`.
    ///
    /// Order: everyone overwrite, then role overwrites from the lowest to the
    /// highest role position, then the member overwrite.
    #[must_use]
    pub fn resolve_channel(
        guild: &Guild,
        member_id: UserId,
        role_ids: &[RoleId],
        channel: &Channel,
        guild_permissions: Permissions,
    ) -> Permissions {
        if guild.owner_id() == Some(member_id)
            || guild_permissions.contains(Permissions::ADMINISTRATOR)
        {
            return Permissions::all();
        }

        let everyone_id = RoleId::everyone(guild.id());
        let mut permissions = guild_permissions;

        if let Some(overwrite) = channel.role_overwrite(everyone_id) {
            permissions = permissions.overwrite(overwrite.allow, overwrite.deny);
        }

        let mut role_overwrites: Vec<(i32, RoleId, &PermissionOverwrite)> = role_ids
            .iter()
            .filter(|id| **id != everyone_id)
            .filter_map(|id| {
                let overwrite = channel.role_overwrite(*id)?;
                let position = guild.role(*id).map_or(0, |r| r.position);
                Some((position, *id, overwrite))
            })
            .collect();
        role_overwrites.sort_by_key(|(position, id, _)| (*position, *id));

        for (_, _, overwrite) in role_overwrites {
            permissions = permissions.overwrite(overwrite.allow, overwrite.deny);
        }

        if let Some(overwrite) = channel.member_overwrite(member_id) {
            permissions = permissions.overwrite(overwrite.allow, overwrite.deny);
        }

        Self::apply_implicit(permissions, channel)
    }

    fn apply_implicit(permissions: Permissions, channel: &Channel) -> Permissions {
        if !permissions.contains(Permissions::VIEW_CHANNEL) {
            return Permissions::empty();
        }

        let mut permissions = permissions;
        let kind = channel.kind();

        if kind.is_text_based() && !permissions.contains(Permissions::SEND_MESSAGES) {
            permissions -= Permissions::SEND_DEPENDENT;
        }

        if kind.is_voice() && !permissions.contains(Permissions::CONNECT) {
            permissions -= Permissions::VOICE;
        }

        permissions
    }
}
