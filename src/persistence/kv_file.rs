//! Lazily loaded `key=value` file

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// String map backed by a text file, one `key=value` pair per line.
///
/// The file is read on first access. Keys are kept sorted so saves are
/// stable across runs.
#[derive(Debug, Clone)]
pub struct KeyValueFile {
    path: Option<PathBuf>,
    content: Option<BTreeMap<String, String>>,
}

impl KeyValueFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            content: None,
        }
    }

    /// A map that is never read from or written to disk
    pub fn in_memory() -> Self {
        Self {
            path: None,
            content: Some(BTreeMap::new()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Discard in-memory changes and read the file again. A missing file
    /// yields an empty map.
    pub fn reload(&mut self) -> Result<(), PersistError> {
        let content = self.content.insert(BTreeMap::new());
        let Some(path) = &self.path else {
            return Ok(());
        };
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(source) => {
                return Err(PersistError::Read {
                    path: path.clone(),
                    source,
                });
            }
        };
        *content = parse(&text);
        Ok(())
    }

    pub fn save(&mut self) -> Result<(), PersistError> {
        let text = render(self.content());
        let Some(path) = &self.path else {
            return Ok(());
        };
        fs::write(path, text).map_err(|source| PersistError::Write {
            path: path.clone(),
            source,
        })
    }

    pub fn has_key(&mut self, key: &str) -> bool {
        self.content().contains_key(key)
    }

    pub fn get(&mut self, key: &str) -> Option<&str> {
        self.content().get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.content_mut().insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.content_mut().remove(key)
    }

    fn content(&mut self) -> &BTreeMap<String, String> {
        self.content_mut()
    }

    fn content_mut(&mut self) -> &mut BTreeMap<String, String> {
        if self.content.is_none() {
            if let Err(e) = self.reload() {
                log::error!("{}", e);
            }
        }
        self.content.get_or_insert_with(BTreeMap::new)
    }
}

/// Split each line on its first `=`; both sides are trimmed and lines
/// without a separator are skipped.
pub fn parse(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

pub fn render(content: &BTreeMap<String, String>) -> String {
    content
        .iter()
        .map(|(key, value)| format!("{}={}\n", key.trim(), value.trim()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("orb-arena-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_parse_splits_on_first_separator() {
        let map = parse("  a = 1 \nnot a pair\nurl=http://x?y=z\n=empty key\n");
        assert_eq!(map.get("a").map(String::as_str), Some("1"));
        assert_eq!(map.get("url").map(String::as_str), Some("http://x?y=z"));
        assert_eq!(map.get("").map(String::as_str), Some("empty key"));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let mut file = KeyValueFile::new(temp_path("missing"));
        assert!(file.reload().is_ok());
        assert!(!file.has_key("anything"));
    }

    #[test]
    fn test_save_and_reload() {
        let path = temp_path("roundtrip");
        let mut file = KeyValueFile::new(&path);
        file.set("Sound_Music", "40");
        file.set("LeaderBoard", "1|2;3|4");
        file.save().unwrap();

        let mut reloaded = KeyValueFile::new(&path);
        assert_eq!(reloaded.get("Sound_Music"), Some("40"));
        assert_eq!(reloaded.get("LeaderBoard"), Some("1|2;3|4"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_reload_discards_unsaved_changes() {
        let path = temp_path("discard");
        let mut file = KeyValueFile::new(&path);
        file.set("kept", "yes");
        file.save().unwrap();
        file.set("dropped", "yes");
        file.reload().unwrap();
        assert!(file.has_key("kept"));
        assert!(!file.has_key("dropped"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_write_error_carries_path() {
        let path = temp_path("no-such-dir").join("player.config");
        let mut file = KeyValueFile::new(&path);
        file.set("a", "b");
        let err = file.save().unwrap_err();
        assert!(err.to_string().contains("player.config"));
    }
}
