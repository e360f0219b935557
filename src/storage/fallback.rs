//! Secondary tier: a flat JSON object file mapping keys to string values.
//!
//! The whole map is kept in memory and rewritten on every `set`. Without a
//! path the map lives only for the lifetime of the process.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use treetracker_common::{Error, Result};

use super::backend::KvBackend;

pub struct FileBackend {
    path: Option<PathBuf>,
    entries: Mutex<BTreeMap<String, String>>,
    /// False when an unreadable file could not be moved out of the way.
    writable: bool,
}

impl FileBackend {
    /// Open the fallback file, starting empty if it is missing.
    ///
    /// An unreadable file is renamed to `<name>.corrupt` before anything is
    /// written. If that rename fails the backend refuses all writes.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (entries, writable) = match load_entries(&path) {
            Ok(entries) => (entries, true),
            Err(e) => match set_aside(&path) {
                Ok(moved) => {
                    tracing::warn!(
                        path = %path.display(),
                        moved_to = %moved.display(),
                        "Unreadable fallback file moved aside: {}",
                        e
                    );
                    (BTreeMap::new(), true)
                }
                Err(rename_err) => {
                    tracing::error!(
                        path = %path.display(),
                        "Unreadable fallback file could not be moved aside, writes disabled: {} ({})",
                        e,
                        rename_err
                    );
                    (BTreeMap::new(), false)
                }
            },
        };

        Self {
            path: Some(path),
            entries: Mutex::new(entries),
            writable,
        }
    }

    /// A fallback that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Mutex::new(BTreeMap::new()),
            writable: true,
        }
    }
}

fn set_aside(path: &Path) -> std::io::Result<PathBuf> {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".corrupt");
    let target = path.with_file_name(name);
    std::fs::rename(path, &target)?;
    Ok(target)
}

fn load_entries(path: &Path) -> Result<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    Ok(serde_json::from_str(&content)?)
}

/// Write through a sibling temp file so a crash never leaves a torn file.
fn save_entries(path: &Path, entries: &BTreeMap<String, String>) -> Result<()> {
    let json = serde_json::to_string(entries)?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

impl KvBackend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if !self.writable {
            return Err(Error::internal(
                "fallback file is unreadable and was not moved aside",
            ));
        }

        let mut entries = self.entries.lock();
        let previous = entries.insert(key.to_string(), value.to_string());

        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Err(e) = save_entries(path, &entries) {
            match previous {
                Some(prev) => entries.insert(key.to_string(), prev),
                None => entries.remove(key),
            };
            return Err(Error::internal(format!(
                "Failed to write fallback file {}: {}",
                path.display(),
                e
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_round_trip() {
        let backend = FileBackend::in_memory();
        assert_eq!(backend.get("plots").unwrap(), None);

        backend.set("plots", "[]").unwrap();
        assert_eq!(backend.get("plots").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fallback.json");

        {
            let backend = FileBackend::open(&path);
            backend.set("trees", r#"[{"id":"1"}]"#).unwrap();
            backend.set("plots", "[]").unwrap();
        }

        let backend = FileBackend::open(&path);
        assert_eq!(backend.get("trees").unwrap().as_deref(), Some(r#"[{"id":"1"}]"#));
        assert_eq!(backend.get("plots").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_is_a_plain_json_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fallback.json");

        let backend = FileBackend::open(&path);
        backend.set("productions", "[]").unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({ "productions": "[]" }));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fallback.json");
        std::fs::write(&path, "{not json").unwrap();

        let backend = FileBackend::open(&path);
        assert_eq!(backend.get("trees").unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_survives_next_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fallback.json");
        let original = r#"{"trees":"[{\"id\":\"1\"}]","productions":"[]",}"#;
        std::fs::write(&path, original).unwrap();

        let backend = FileBackend::open(&path);
        backend.set("plots", "[]").unwrap();

        let moved = dir.path().join("fallback.json.corrupt");
        assert_eq!(std::fs::read_to_string(&moved).unwrap(), original);

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({ "plots": "[]" }));
    }

    #[test]
    fn test_unmovable_corrupt_file_refuses_writes() {
        let dir = tempfile::tempdir().unwrap();
        // A directory at the file path can be neither parsed nor renamed over
        let path = dir.path().join("fallback.json");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(dir.path().join("fallback.json.corrupt"), "").unwrap();

        let backend = FileBackend::open(&path);
        assert!(backend.set("plots", "[]").is_err());
        assert!(path.is_dir());
    }

    #[test]
    fn test_failed_write_keeps_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        // Parent directory does not exist, so every write fails
        let path = dir.path().join("missing").join("fallback.json");

        let backend = FileBackend::open(&path);
        assert!(backend.set("trees", "[]").is_err());
        assert_eq!(backend.get("trees").unwrap(), None);
    }
}
