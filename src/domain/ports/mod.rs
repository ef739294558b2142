mod guild_provider;
mod member_port;
mod request_options;

pub use guild_provider::{GuildHandle, GuildProvider};
pub use member_port::{MemberPayload, MemberPort, ModifyMemberParams};
pub use request_options::RequestOptions;

#[cfg(test)]
pub use guild_provider::MockGuildProvider;
