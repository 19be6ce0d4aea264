// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! File-per-record annotation storage.
//!
//! Every annotation lives in `<timestamp>.json` inside the video's
//! annotation directory, next to a single `meta.json`. The timestamp inside
//! the record is authoritative; the file name is a key derived from it and
//! is checked against the record whenever one is read.

use crate::error::{StoreError, StoreResult};
use crate::models::{annotation::AnnotationRecord, meta::MetaRecord};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Fixed file name of the metadata record.
pub const META_FILE_NAME: &str = "meta.json";

const RECORD_EXTENSION: &str = ".json";

/// A stored record as shown in the timestamp picklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEntry {
    pub name: String,
    pub timestamp: u64,
}

impl RecordEntry {
    /// Picklist label: seconds with two decimals, e.g. `1.50s`.
    pub fn label(&self) -> String {
        format!("{:.2}s", self.timestamp as f64 / 1000.0)
    }
}

/// Annotation records for one video, backed by a directory.
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    dir: PathBuf,
}

impl AnnotationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a record to `<timestamp>.json`, replacing any existing file.
    ///
    /// Returns the name the record was stored under.
    pub fn put(&self, record: &AnnotationRecord) -> StoreResult<String> {
        let name = record.file_name();
        let json = serde_json::to_string_pretty(record)?;
        self.write_file(&name, &json)?;
        log::info!(
            "Saved annotation {} ({} strokes) to {}",
            name,
            record.strokes.len(),
            self.dir.display()
        );
        Ok(name)
    }

    /// Save an annotation and then the current metadata.
    ///
    /// Both effects happen on every annotation save so `meta.json` follows
    /// the title and weld type shown in the UI. If the record write fails
    /// the metadata is left untouched.
    pub fn commit_annotation(
        &self,
        record: &AnnotationRecord,
        meta: &MetaRecord,
    ) -> StoreResult<String> {
        let name = self.put(record)?;
        self.put_meta(meta)?;
        Ok(name)
    }

    /// Read and decode the named record.
    pub fn get(&self, name: &str) -> StoreResult<AnnotationRecord> {
        let content = self
            .read_file(name)?
            .ok_or_else(|| StoreError::RecordNotFound(name.to_string()))?;
        let record: AnnotationRecord =
            serde_json::from_str(&content).map_err(|source| StoreError::RecordParse {
                name: name.to_string(),
                source,
            })?;

        if let Some(key) = timestamp_from_name(name) {
            if key != record.timestamp {
                log::warn!(
                    "Annotation {} holds timestamp {}, using the stored timestamp",
                    name,
                    record.timestamp
                );
            }
        }
        Ok(record)
    }

    /// All stored annotations, ascending by timestamp.
    ///
    /// A missing directory means no annotations yet. Files whose name is not
    /// a timestamp, or whose content does not decode, are skipped.
    pub fn list(&self) -> StoreResult<Vec<RecordEntry>> {
        self.ensure_selected()?;
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Read {
                path: self.dir.clone(),
                source,
            })?;
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if name == META_FILE_NAME || !name.ends_with(RECORD_EXTENSION) {
                continue;
            }
            if timestamp_from_name(&name).is_none() {
                log::debug!("Skipping {}: not a timestamp name", name);
                continue;
            }

            match self.get(&name) {
                Ok(record) => records.push(RecordEntry {
                    name,
                    timestamp: record.timestamp,
                }),
                Err(e) => log::warn!("Skipping unreadable annotation: {}", e),
            }
        }

        records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.name.cmp(&b.name)));
        Ok(records)
    }

    /// Remove the named record. Deleting a missing record is an error.
    pub fn delete(&self, name: &str) -> StoreResult<()> {
        self.ensure_selected()?;
        let path = self.dir.join(name);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                log::info!("Deleted annotation {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::RecordNotFound(name.to_string()))
            }
            Err(source) => Err(StoreError::Delete {
                name: name.to_string(),
                source,
            }),
        }
    }

    /// Overwrite the metadata record.
    pub fn put_meta(&self, meta: &MetaRecord) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(meta)?;
        self.write_file(META_FILE_NAME, &json)?;
        log::debug!("Saved metadata to {}", self.dir.display());
        Ok(())
    }

    /// Read the metadata record, or the default if none was ever written.
    pub fn get_meta(&self) -> StoreResult<MetaRecord> {
        match self.read_file(META_FILE_NAME)? {
            Some(content) => {
                serde_json::from_str(&content).map_err(|source| StoreError::RecordParse {
                    name: META_FILE_NAME.to_string(),
                    source,
                })
            }
            None => {
                log::debug!("No metadata in {}, using defaults", self.dir.display());
                Ok(MetaRecord::default())
            }
        }
    }

    fn ensure_selected(&self) -> StoreResult<()> {
        if self.dir.as_os_str().is_empty() {
            return Err(StoreError::NoDirectorySelected);
        }
        Ok(())
    }

    fn write_file(&self, name: &str, content: &str) -> StoreResult<()> {
        self.ensure_selected()?;
        std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::DirectoryCreate {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.dir.join(name);
        std::fs::write(&path, content).map_err(|source| StoreError::Write { path, source })
    }

    /// `Ok(None)` when the file does not exist.
    fn read_file(&self, name: &str) -> StoreResult<Option<String>> {
        self.ensure_selected()?;
        let path = self.dir.join(name);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }
}

/// Parse `<digits>.json` into its timestamp.
fn timestamp_from_name(name: &str) -> Option<u64> {
    let stem = name.strip_suffix(RECORD_EXTENSION)?;
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::{Point, Stroke};

    fn sample_record(timestamp: u64) -> AnnotationRecord {
        let mut red = Stroke::begin("#ff0000", Point::new(10.0, 10.0));
        red.push(Point::new(20.5, 15.25));
        red.push(Point::new(30.0, 40.0));
        let blue = Stroke::begin("blue", Point::new(5.0, 5.0));
        AnnotationRecord::new(timestamp, "undercut on left side", vec![red, blue])
    }

    fn store_in(tmp: &tempfile::TempDir) -> AnnotationStore {
        AnnotationStore::new(tmp.path().join("weld1_annotations"))
    }

    #[test]
    fn test_put_get_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);
        let record = sample_record(1234);

        let name = store.put(&record).unwrap();
        assert_eq!(name, "1234.json");
        assert_eq!(store.get(&name).unwrap(), record);
    }

    #[test]
    fn test_put_creates_directory_lazily() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);
        assert!(!store.dir().exists());

        assert!(store.list().unwrap().is_empty());
        assert!(!store.dir().exists());

        store.put(&sample_record(1)).unwrap();
        assert!(store.dir().is_dir());
    }

    #[test]
    fn test_put_same_timestamp_replaces() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);

        store.put(&sample_record(700)).unwrap();
        let replacement = AnnotationRecord::new(700, "second pass", Vec::new());
        store.put(&replacement).unwrap();

        assert_eq!(store.get("700.json").unwrap(), replacement);
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_list_orders_by_timestamp() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);
        for ts in [500, 10, 2000] {
            store.put(&sample_record(ts)).unwrap();
        }

        let timestamps: Vec<u64> = store.list().unwrap().iter().map(|e| e.timestamp).collect();
        assert_eq!(timestamps, vec![10, 500, 2000]);
    }

    #[test]
    fn test_list_excludes_meta_and_malformed_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);
        store.put(&sample_record(300)).unwrap();
        store.put_meta(&MetaRecord::new("Plate", "Butt")).unwrap();

        std::fs::write(store.dir().join("notes.json"), "{}").unwrap();
        std::fs::write(store.dir().join("900.json"), "not json").unwrap();
        std::fs::write(store.dir().join("950.json"), r#"{"timestamp": "late"}"#).unwrap();
        std::fs::write(store.dir().join("readme.txt"), "hello").unwrap();

        let entries = store.list().unwrap();
        assert_eq!(
            entries,
            vec![RecordEntry {
                name: "300.json".to_string(),
                timestamp: 300
            }]
        );
    }

    #[test]
    fn test_header_timestamp_wins_over_file_name() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);
        std::fs::create_dir_all(store.dir()).unwrap();
        let record = sample_record(42);
        std::fs::write(
            store.dir().join("9000.json"),
            serde_json::to_string(&record).unwrap(),
        )
        .unwrap();
        store.put(&sample_record(100)).unwrap();

        let entries = store.list().unwrap();
        assert_eq!(entries[0].name, "9000.json");
        assert_eq!(entries[0].timestamp, 42);
        assert_eq!(store.get("9000.json").unwrap().timestamp, 42);
    }

    #[test]
    fn test_get_missing_and_malformed() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);

        let missing = store.get("5.json").unwrap_err();
        assert!(missing.is_not_found());

        std::fs::create_dir_all(store.dir()).unwrap();
        std::fs::write(store.dir().join("5.json"), "[1, 2").unwrap();
        let parse = store.get("5.json").unwrap_err();
        assert!(matches!(parse, StoreError::RecordParse { .. }));
    }

    #[test]
    fn test_delete_then_list() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);
        let name = store.put(&sample_record(250)).unwrap();
        store.put(&sample_record(260)).unwrap();

        store.delete(&name).unwrap();

        let names: Vec<String> = store.list().unwrap().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["260.json".to_string()]);
        assert!(store.get(&name).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_is_not_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);
        let name = store.put(&sample_record(1)).unwrap();

        store.delete(&name).unwrap();
        assert!(store.delete(&name).unwrap_err().is_not_found());
    }

    #[test]
    fn test_meta_defaults_and_last_write_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);
        assert_eq!(store.get_meta().unwrap(), MetaRecord::default());

        store.put_meta(&MetaRecord::new("A", "Fillet")).unwrap();
        store.put_meta(&MetaRecord::new("B", "Fillet")).unwrap();

        let meta = store.get_meta().unwrap();
        assert_eq!(meta.title, "B");
        assert_eq!(meta.weld_type, "Fillet");
        let on_disk = std::fs::read_to_string(store.dir().join(META_FILE_NAME)).unwrap();
        assert!(!on_disk.contains("\"A\""));
    }

    #[test]
    fn test_commit_writes_record_and_meta() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);
        let record = sample_record(88);

        let name = store
            .commit_annotation(&record, &MetaRecord::new("Joint 7", "Lap"))
            .unwrap();

        assert_eq!(store.get(&name).unwrap(), record);
        assert_eq!(store.get_meta().unwrap(), MetaRecord::new("Joint 7", "Lap"));
    }

    #[test]
    fn test_empty_directory_path_is_not_selected() {
        let store = AnnotationStore::new("");
        assert!(matches!(
            store.list().unwrap_err(),
            StoreError::NoDirectorySelected
        ));
        assert!(matches!(
            store.put(&sample_record(1)).unwrap_err(),
            StoreError::NoDirectorySelected
        ));
    }

    #[test]
    fn test_timestamp_from_name() {
        assert_eq!(timestamp_from_name("1500.json"), Some(1500));
        assert_eq!(timestamp_from_name("meta.json"), None);
        assert_eq!(timestamp_from_name("-3.json"), None);
        assert_eq!(timestamp_from_name(".json"), None);
        assert_eq!(timestamp_from_name("15"), None);
    }

    #[test]
    fn test_entry_label() {
        let entry = RecordEntry {
            name: "1500.json".to_string(),
            timestamp: 1500,
        };
        assert_eq!(entry.label(), "1.50s");
    }
}
