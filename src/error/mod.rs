//! Error types for processing failures.
//!
//! Two failure classes exist. Soft failures are [`Message`]s accumulated in the
//! [`Context`](crate::Context) and reported together as [`ValidationErrors`].
//! Hard failures are [`CastingError`]s, which abort a processing run at once.

mod failure;
mod message;
mod validation_errors;

pub use failure::{CastingError, ProcessError, ReflectionError};
pub(crate) use message::{format_value, params};
pub use message::{ErrorKind, Message, Param, Params};
pub use validation_errors::ValidationErrors;
