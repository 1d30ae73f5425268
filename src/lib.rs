//! In-memory song catalogue served over HTTP.
//!
//! A single process holds every song in memory and exposes create, read,
//! update and delete over a small JSON API:
//!
//! ```text
//! GET    /songs        list all songs
//! POST   /songs        create a song, id assigned by the store
//! GET    /songs/{id}   fetch one song
//! PUT    /songs/{id}   replace one song, id kept from the path
//! DELETE /songs/{id}   remove one song
//! ```
//!
//! Ids start at 1 and are never reused, even after a delete. Nothing is
//! persisted across restarts.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`store`]: Song records and the lock-guarded store
//! - [`api`]: HTTP routes and handlers
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{ApiError, AppError, Result};
