//! Domain error types.

mod member_error;

pub use member_error::{MemberError, TransportError};
