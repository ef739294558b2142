//! Domain entity definitions.

mod channel;
mod guild;
mod member;
mod permissions;
mod role;
mod token;
mod user;
mod voice_state;

pub use channel::{Channel, ChannelId, ChannelKind, OverwriteType, PermissionOverwrite};
pub use guild::{Guild, GuildId};
pub use member::GuildMember;
pub use permissions::Permissions;
pub use role::{Role, RoleId};
pub use token::AuthToken;
pub use user::{User, UserId};
pub use voice_state::VoiceState;
