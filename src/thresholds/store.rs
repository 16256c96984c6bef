use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{ThresholdConfig, ThresholdStore};
use crate::error::{FeeError, Result};

/// Keeps the threshold settings in a small JSON file on disk:
/// ```json
/// { "highThreshold": 0.2, "lowThreshold": 0.2 }
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ThresholdStore for JsonFileStore {
    fn load(&self) -> Result<Option<ThresholdConfig>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, config: &ThresholdConfig) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)
                    .map_err(|e| FeeError::Persistence(format!("{}: {e}", dir.display())))?;
            }
        }
        let content = serde_json::to_string_pretty(config)?;
        atomic_write(&self.path, &content)
            .map_err(|e| FeeError::Persistence(format!("{}: {e}", self.path.display())))
    }
}

/// Writes `contents` to a sibling temp file and renames it over `path`, so a
/// reader sees either the old settings or the new ones.
fn atomic_write(path: &Path, contents: &str) -> std::io::Result<()> {
    let temp_path = path.with_extension("json.tmp");

    let mut file = fs::File::create(&temp_path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("settings.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("settings.json"));
        let config = ThresholdConfig::from_percent(10, 25);

        store.save(&config).unwrap();
        assert_eq!(store.load().unwrap(), Some(config));
    }

    #[test]
    fn test_save_replaces_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = JsonFileStore::new(&path);

        store.save(&ThresholdConfig::from_percent(10, 10)).unwrap();
        store.save(&ThresholdConfig::from_percent(30, 5)).unwrap();

        assert_eq!(store.load().unwrap(), Some(ThresholdConfig::from_percent(30, 5)));
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, ["settings.json"]);
    }

    #[test]
    fn test_save_leaves_previous_file_when_temp_is_blocked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = JsonFileStore::new(&path);
        store.save(&ThresholdConfig::from_percent(10, 10)).unwrap();

        // A directory where the temp file would go makes the write fail.
        fs::create_dir(dir.path().join("settings.json.tmp")).unwrap();
        let err = store.save(&ThresholdConfig::from_percent(30, 5)).unwrap_err();

        assert!(matches!(err, FeeError::Persistence(_)));
        assert_eq!(store.load().unwrap(), Some(ThresholdConfig::from_percent(10, 10)));
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        assert!(JsonFileStore::new(path).load().is_err());
    }
}
