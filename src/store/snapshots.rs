use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::Venue;
use crate::errors::PersistError;

/// Substring that marks files the purge and listing must leave alone
const TOKEN_MARKER: &str = "token";
const TOKEN_FILE: &str = "token.txt";

/// Outcome of a best-effort purge
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PurgeReport {
    pub removed: usize,
    pub kept: usize,
    pub failed: usize,
}

/// Flat directory of per-court JSON snapshots
pub struct SnapshotStore {
    data_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn exists(&self) -> bool {
        self.data_dir.is_dir()
    }

    /// Delete everything except token files. Each entry is independent:
    /// a failure is logged and the rest still go.
    pub fn purge(&self) -> PurgeReport {
        let mut report = PurgeReport::default();

        if !self.exists() {
            if let Err(e) = fs::create_dir_all(&self.data_dir) {
                warn!("Failed to create {}: {}", self.data_dir.display(), e);
            }
            return report;
        }

        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to list {}: {}", self.data_dir.display(), e);
                report.failed += 1;
                return report;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to read entry in {}: {}", self.data_dir.display(), e);
                    report.failed += 1;
                    continue;
                }
            };

            match Self::remove_entry(&entry) {
                Ok(true) => report.removed += 1,
                Ok(false) => report.kept += 1,
                Err(e) => {
                    warn!("Failed to delete {}. Reason: {}", entry.path().display(), e);
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Write a venue as pretty JSON, replacing any previous snapshot of that name
    pub fn save(&self, venue: &Venue, filename: &str) -> Result<PathBuf, PersistError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| PersistError::io(&self.data_dir, e))?;

        let path = self.data_dir.join(filename);
        let json = serde_json::to_string_pretty(venue).map_err(|source| PersistError::Encode {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|e| PersistError::io(&path, e))?;

        info!("    Saved {}", filename);
        Ok(path)
    }

    /// Snapshot file names, sorted. A missing area has none.
    pub fn list_snapshots(&self) -> Result<Vec<String>, PersistError> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.data_dir).map_err(|e| PersistError::io(&self.data_dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PersistError::io(&self.data_dir, e))?;
            let is_file = entry.file_type().map(|t| !t.is_dir()).unwrap_or(false);
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_file && Self::is_snapshot_name(&name) {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }

    pub fn load(&self, filename: &str) -> Result<Venue, PersistError> {
        let path = self.data_dir.join(filename);
        let json = fs::read_to_string(&path).map_err(|e| PersistError::io(&path, e))?;
        serde_json::from_str(&json).map_err(|source| PersistError::Decode { path, source })
    }

    /// Leave the current token next to the snapshots; purge keeps it
    pub fn save_token_marker(&self, token: &str) -> Result<(), PersistError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| PersistError::io(&self.data_dir, e))?;
        let path = self.data_dir.join(TOKEN_FILE);
        fs::write(&path, token).map_err(|e| PersistError::io(&path, e))
    }

    // --- Helper Methods ---

    fn is_snapshot_name(name: &str) -> bool {
        name.ends_with(".json") && !name.contains(TOKEN_MARKER)
    }

    /// Ok(false) when the entry is a protected token file
    fn remove_entry(entry: &fs::DirEntry) -> std::io::Result<bool> {
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            fs::remove_dir_all(&path)?;
            return Ok(true);
        }

        if entry.file_name().to_string_lossy().contains(TOKEN_MARKER) {
            return Ok(false);
        }

        fs::remove_file(&path)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn venue(name: &str, slots: usize) -> Venue {
        let slot = json!({"start_time_value": "08:00", "end_time_value": "09:00", "price": "20", "slot_available": true});
        serde_json::from_value(json!({
            "venue_name": name,
            "location_name": "Arena A",
            "search_date": "2025-06-06",
            "location_facility_times": vec![slot; slots],
        }))
        .unwrap()
    }

    #[test]
    fn test_purge_keeps_token_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        for name in ["token.txt", "my_token", "token.json", "arena_court_1_2025-06-06.json", "notes.txt"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        fs::create_dir_all(dir.path().join("old_run/nested")).unwrap();
        fs::write(dir.path().join("old_run/nested/a.json"), "{}").unwrap();

        let report = store.purge();

        let mut left: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        left.sort();
        assert_eq!(left, vec!["my_token", "token.json", "token.txt"]);
        assert_eq!(report, PurgeReport { removed: 3, kept: 3, failed: 0 });
    }

    #[cfg(unix)]
    #[test]
    fn test_purge_unlinks_symlinks_without_following() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("keep.json"), "{}").unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();

        SnapshotStore::new(dir.path()).purge();

        assert!(!dir.path().join("link").exists());
        assert!(outside.path().join("keep.json").exists());
    }

    #[test]
    fn test_purge_creates_missing_area() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("data"));

        assert_eq!(store.purge(), PurgeReport::default());
        assert!(store.exists());
    }

    #[test]
    fn test_save_overwrites_same_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let name = "arena_a_court_1_2025-06-06.json";

        store.save(&venue("COURT 1", 1), name).unwrap();
        store.save(&venue("COURT 1", 3), name).unwrap();

        assert_eq!(store.list_snapshots().unwrap(), vec![name.to_string()]);
        assert_eq!(store.load(name).unwrap().time_slots.len(), 3);
    }

    #[test]
    fn test_list_skips_token_and_non_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        store.save_token_marker("abc").unwrap();
        fs::write(dir.path().join("token_backup.json"), "{}").unwrap();
        fs::write(dir.path().join("readme.md"), "#").unwrap();
        store.save(&venue("COURT 2", 1), "b_court_2_2025-06-06.json").unwrap();
        store.save(&venue("COURT 1", 1), "a_court_1_2025-06-06.json").unwrap();

        assert_eq!(
            store.list_snapshots().unwrap(),
            vec!["a_court_1_2025-06-06.json", "b_court_2_2025-06-06.json"]
        );
    }

    #[test]
    fn test_list_missing_area_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("nope"));
        assert!(store.list_snapshots().unwrap().is_empty());
    }

    #[test]
    fn test_load_rejects_malformed_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        fs::write(dir.path().join("bad.json"), json!({"venue_name": "COURT 1"}).to_string()).unwrap();

        assert!(matches!(store.load("bad.json"), Err(PersistError::Decode { .. })));
    }
}
