//! Session storage.
//!
//! The upload step hands its records (and an optional AI insight) to the
//! results view through a stored session. Storage sits behind the
//! [`SessionRepository`] trait so backends can be swapped.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers                                           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                             │
//! │  - Checksum deduplication                                │
//! │  - Results-view guard                                    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/mod.rs)                    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────▼──────────────────────────────┐
//!     │             Local Repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```

pub mod checksum;
pub mod models;
pub mod repositories;
pub mod repository;
pub mod services;


pub use checksum::{calculate_checksum, dataset_checksum};
pub use models::StoredSession;
pub use repositories::{LocalRepository, SessionLimits};
pub use repository::{ErrorContext, RepositoryError, RepositoryResult, SessionRepository};
pub use services::{
    attach_insight, delete_session, get_session_data, health_check, load_results_view,
    store_session,
};
