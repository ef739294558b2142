//! Domain layer with core entities, ports and services.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Present-or-omitted wire values.
pub mod optional;
/// Port definitions.
pub mod ports;
/// Serde utilities.
pub mod serde_utils;
/// Pure domain services.
pub mod services;

pub use entities::{Guild, GuildId, GuildMember, Permissions, RoleId, UserId};
pub use errors::{MemberError, TransportError};
pub use optional::Optional;
pub use ports::{GuildProvider, MemberPort, RequestOptions};
