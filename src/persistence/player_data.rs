//! Typed access to the player data file
//!
//! Getters fall back to the supplied default when a key is missing or does
//! not parse. I/O failures are logged and otherwise ignored.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use super::kv_file::KeyValueFile;

#[derive(Debug, Clone)]
pub struct PlayerData {
    file: KeyValueFile,
}

impl PlayerData {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        log::info!("Player data at {}", path.display());
        Self {
            file: KeyValueFile::new(path),
        }
    }

    /// Not backed by a file (tests, throwaway runs)
    pub fn in_memory() -> Self {
        Self {
            file: KeyValueFile::in_memory(),
        }
    }

    pub fn has_key(&mut self, key: &str) -> bool {
        self.file.has_key(key)
    }

    /// Forget a key so its default applies again
    pub fn reset(&mut self, key: &str) {
        self.file.remove(key);
    }

    pub fn get_string(&mut self, key: &str) -> Option<String> {
        self.file.get(key).map(str::to_string)
    }

    pub fn set_string(&mut self, key: &str, value: &str) {
        self.file.set(key, value);
    }

    /// Parse a stored value, falling back to `default`
    pub fn get<T: FromStr>(&mut self, key: &str, default: T) -> T {
        self.file
            .get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    pub fn set<T: Display>(&mut self, key: &str, value: T) {
        self.file.set(key, value.to_string());
    }

    pub fn get_int(&mut self, key: &str, default: i32) -> i32 {
        self.get(key, default)
    }

    pub fn set_int(&mut self, key: &str, value: i32) {
        self.set(key, value);
    }

    pub fn get_float(&mut self, key: &str, default: f32) -> f32 {
        self.get(key, default)
    }

    pub fn set_float(&mut self, key: &str, value: f32) {
        self.set(key, value);
    }

    pub fn reload(&mut self) {
        if let Err(e) = self.file.reload() {
            log::error!("{}", e);
        }
    }

    pub fn save(&mut self) {
        match self.file.save() {
            Ok(()) => log::debug!("Player data saved"),
            Err(e) => log::error!("{}", e),
        }
    }
}
