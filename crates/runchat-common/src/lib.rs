pub mod errors;
pub mod id;

pub use errors::{ConfigError, RunchatError};
pub use id::{short_id, SessionId};
