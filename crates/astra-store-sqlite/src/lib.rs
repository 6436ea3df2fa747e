//! SQLite backend for Astra: accounts, sessions, profiles and progress.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod credentials;
mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{DEFAULT_SESSION_TTL_HOURS, SqliteStore};
