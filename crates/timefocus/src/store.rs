//! Session history storage
//!
//! The whole history lives in one JSON file:
//! `{"sessions": [...], "settings": {...}}`. It is read in full on every
//! access and rewritten in full on every append, via a temp file that is
//! renamed over the original so a crash never truncates committed records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::session::SessionRecord;

/// History store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read history file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write history file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("History file {path} is corrupt; fix or reset it")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid session record: {0}")]
    InvalidRecord(String),
}

/// On-disk layout. `settings` is carried along untouched.
#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryFile {
    #[serde(default)]
    sessions: Vec<SessionRecord>,
    #[serde(default)]
    settings: Map<String, Value>,
}

/// Append-only session history backed by a single file
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Create a store for `path`. Nothing touches the disk until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records in insertion order, or none if the store doesn't exist yet
    pub fn load(&self) -> Result<Vec<SessionRecord>, StoreError> {
        Ok(self.read()?.sessions)
    }

    /// Add one record to the end of the history
    pub fn append(&self, record: SessionRecord) -> Result<(), StoreError> {
        if record.duration_minutes == 0 {
            return Err(StoreError::InvalidRecord(
                "duration must be at least 1 minute".to_string(),
            ));
        }

        let mut file = self.read()?;
        file.sessions.push(record);
        self.write(&file)?;

        tracing::debug!(
            path = %self.path.display(),
            sessions = file.sessions.len(),
            "appended session record"
        );
        Ok(())
    }

    /// Delete the history. Returns how many records were removed.
    pub fn reset(&self) -> Result<usize, StoreError> {
        let removed = match self.load() {
            Ok(records) => records.len(),
            Err(StoreError::Corrupt { .. }) => 0,
            Err(e) => return Err(e),
        };

        for path in [self.path.clone(), self.temp_path()] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => return Err(StoreError::Write { path, source }),
            }
        }

        tracing::info!(path = %self.path.display(), removed, "history reset");
        Ok(removed)
    }

    fn read(&self) -> Result<HistoryFile, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HistoryFile::default()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(HistoryFile::default());
        }

        let corrupt = |source: serde_json::Error| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        };

        let value: Value = serde_json::from_str(&content).map_err(corrupt)?;
        // Older files may hold a bare array of records
        if value.is_array() {
            let sessions = serde_json::from_value(value).map_err(corrupt)?;
            return Ok(HistoryFile {
                sessions,
                settings: Map::new(),
            });
        }
        serde_json::from_value(value).map_err(corrupt)
    }

    fn write(&self, file: &HistoryFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(file)?;
        let tmp = self.temp_path();
        let written = fs::File::create(&tmp).and_then(|mut f| {
            f.write_all(content.as_bytes())?;
            f.sync_all()
        });
        written.map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionKind, SessionPlan};
    use chrono::{Duration, Local, TimeZone};
    use tempfile::TempDir;

    fn temp_store() -> (HistoryStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("nested").join("timefocus.json"));
        (store, dir)
    }

    fn record(plan: SessionPlan, minute: i64) -> SessionRecord {
        let start = Local.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap() + Duration::minutes(minute);
        SessionRecord::completed(&plan, start)
    }

    #[test]
    fn test_missing_store_loads_empty() {
        let (store, _dir) = temp_store();
        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_blank_file_loads_empty() {
        let (store, _dir) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "\n  \n").unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_append_creates_store_lazily() {
        let (store, _dir) = temp_store();
        store
            .append(record(SessionPlan::work(25, Some("Test task".to_string())), 0))
            .unwrap();

        assert!(store.path().exists());
        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].task_label.as_deref(), Some("Test task"));
    }

    #[test]
    fn test_append_preserves_order() {
        let (store, _dir) = temp_store();
        let records: Vec<_> = (0..5)
            .map(|i| {
                // Later minutes first, so any re-sorting would show
                record(SessionPlan::work(10 + i, None), 100 - i as i64)
            })
            .collect();

        for r in &records {
            store.append(r.clone()).unwrap();
        }

        assert_eq!(store.load().unwrap(), records);
        // A second handle on the same file sees the same history
        assert_eq!(HistoryStore::new(store.path()).load().unwrap(), records);
    }

    #[test]
    fn test_zero_duration_rejected() {
        let (store, _dir) = temp_store();
        let mut bad = record(SessionPlan::short_break(5), 0);
        bad.duration_minutes = 0;

        assert!(matches!(store.append(bad), Err(StoreError::InvalidRecord(_))));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_corrupt_store_is_an_error() {
        let (store, _dir) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{\"sessions\": [").unwrap();

        assert!(matches!(store.load(), Err(StoreError::Corrupt { .. })));
        assert!(matches!(
            store.append(record(SessionPlan::work(25, None), 0)),
            Err(StoreError::Corrupt { .. })
        ));
        // Left untouched for the operator to inspect
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{\"sessions\": [");
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let (store, _dir) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"sessions": [{"type": "work"}]}"#).unwrap();

        assert!(matches!(store.load(), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_reset_then_load_is_empty() {
        let (store, _dir) = temp_store();
        store.append(record(SessionPlan::work(25, None), 0)).unwrap();
        store.append(record(SessionPlan::short_break(5), 25)).unwrap();

        assert_eq!(store.reset().unwrap(), 2);
        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());

        // Resetting nothing is fine too
        assert_eq!(store.reset().unwrap(), 0);
    }

    #[test]
    fn test_reset_removes_corrupt_store() {
        let (store, _dir) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "not json").unwrap();

        assert_eq!(store.reset().unwrap(), 0);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_reads_legacy_format() {
        let (store, _dir) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(
            store.path(),
            r#"{
  "sessions": [
    {"type": "work", "duration": 25, "task": "Write docs", "completed": true, "timestamp": "2026-03-10T09:00:00.000001"},
    {"type": "break", "duration": 5, "task": null, "completed": false, "timestamp": "2026-03-10T09:25:00"}
  ],
  "settings": {"theme": "dark"}
}"#,
        )
        .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].kind, SessionKind::Break);
        assert!(!loaded[1].completed);

        // Settings survive a rewrite
        store.append(record(SessionPlan::work(25, None), 60)).unwrap();
        let raw: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["settings"]["theme"], "dark");
        assert_eq!(raw["sessions"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_reads_bare_array() {
        let (store, _dir) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(
            store.path(),
            r#"[{"type": "work", "duration": 30, "task": null, "completed": true, "timestamp": "2026-03-10T09:00:00+00:00"}]"#,
        )
        .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].duration_minutes, 30);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let (store, _dir) = temp_store();
        store.append(record(SessionPlan::work(25, None), 0)).unwrap();
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_stale_temp_file_is_replaced() {
        let (store, _dir) = temp_store();
        store.append(record(SessionPlan::work(25, None), 0)).unwrap();
        // Leftover from a write that died before its rename
        fs::write(store.temp_path(), "{\"sessions\": [garbage").unwrap();

        store.append(record(SessionPlan::short_break(5), 25)).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].kind, SessionKind::ShortBreak);
        assert!(!store.temp_path().exists());
    }
}
