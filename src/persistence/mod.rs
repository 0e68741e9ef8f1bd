//! Player data persistence
//!
//! A flat `key=value` text file holds everything that survives a restart:
//! settings, key bindings and the leaderboard. Writes are best effort; a
//! failed save is logged and the game keeps running.

pub mod kv_file;
pub mod player_data;

pub use kv_file::{KeyValueFile, PersistError};
pub use player_data::PlayerData;
