//! Application layer coordinating members of a guild.

/// Member collection per guild.
pub mod member_roster;

pub use member_roster::GuildMemberRoster;
