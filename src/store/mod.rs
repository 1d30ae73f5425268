//! Song record store.
//!
//! This module handles:
//! - Song record types
//! - The in-memory, lock-guarded store that assigns ids

pub mod memory;
pub mod types;

pub use memory::SongStore;
pub use types::{DeleteResponse, Song, SongId};
