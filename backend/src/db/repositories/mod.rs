//! Repository implementations module.
//!
//! - `local`: In-memory implementation for the server and for tests
pub mod local;

pub use local::{LocalRepository, SessionLimits};
