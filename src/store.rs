use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use uuid::Uuid;

use crate::model::{attendance::AttendanceRecord, campus::Campus};

/// Name of the single blob holding every stored record.
pub const RECORDS_BLOB: &str = "attendanceData.json";

/// The only mutable shared state: every stored attendance record.
///
/// Readers take whole snapshots. Writers replace whole campuses.
pub trait RecordStore: Send + Sync {
    /// Missing or unreadable data degrades to an empty set.
    fn load(&self) -> Vec<AttendanceRecord>;

    /// Drop every record of `campus` and append `records`.
    fn replace_campus(&self, campus: Campus, records: Vec<AttendanceRecord>) -> Result<()>;

    /// Remove all stored records.
    fn clear(&self) -> Result<()>;
}

/// Record store backed by one JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)
            .with_context(|| format!("creating data dir {}", data_dir.display()))?;

        Ok(Self {
            path: data_dir.join(RECORDS_BLOB),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_blob(&self) -> Vec<AttendanceRecord> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                log::warn!("Record store unreadable, using empty set: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Record store corrupt, using empty set: {}", e);
                Vec::new()
            }
        }
    }

    /// Write to a sibling temp file then rename over the blob.
    fn write_blob(&self, records: &[AttendanceRecord]) -> Result<()> {
        let json = serde_json::to_vec(records).context("serializing records")?;
        let tmp = self
            .path
            .with_extension(format!("{}.tmp", Uuid::new_v4().to_simple()));

        fs::write(&tmp, json).with_context(|| format!("writing {}", tmp.display()))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e).with_context(|| format!("replacing {}", self.path.display()));
        }
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> Vec<AttendanceRecord> {
        self.read_blob()
    }

    fn replace_campus(&self, campus: Campus, records: Vec<AttendanceRecord>) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow!("record store lock poisoned"))?;

        let mut merged: Vec<AttendanceRecord> = self
            .read_blob()
            .into_iter()
            .filter(|r| r.campus != campus)
            .collect();
        let retained = merged.len();
        merged.extend(records);

        self.write_blob(&merged)?;

        log::info!(
            "Record store updated for {}: {} retained, {} total",
            campus,
            retained,
            merged.len()
        );
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow!("record store lock poisoned"))?;

        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", self.path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::sample;

    #[test]
    fn load_on_fresh_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("nested")).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn replace_campus_keeps_other_campuses() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();

        store
            .replace_campus(
                Campus::Pune,
                vec![
                    sample("P1", "Old Pune", "Present", Campus::Pune),
                    sample("P2", "Old Pune 2", "Absent", Campus::Pune),
                ],
            )
            .unwrap();
        store
            .replace_campus(
                Campus::Nashik,
                vec![sample("N1", "Nashik", "Present", Campus::Nashik)],
            )
            .unwrap();
        store
            .replace_campus(
                Campus::Pune,
                vec![sample("P9", "New Pune", "Present", Campus::Pune)],
            )
            .unwrap();

        let codes: Vec<String> = store.load().into_iter().map(|r| r.ecode).collect();
        assert_eq!(codes, vec!["N1", "P9"]);
    }

    #[test]
    fn corrupt_blob_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        fs::write(store.path(), b"{not json").unwrap();

        assert!(store.load().is_empty());

        store
            .replace_campus(
                Campus::Vadgaon,
                vec![sample("V1", "V", "Present", Campus::Vadgaon)],
            )
            .unwrap();
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn clear_wipes_everything_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store
            .replace_campus(
                Campus::Lonavala,
                vec![sample("L1", "L", "Present", Campus::Lonavala)],
            )
            .unwrap();

        store.clear().unwrap();
        assert!(store.load().is_empty());
        store.clear().unwrap();
    }

    #[test]
    fn writes_leave_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store
            .replace_campus(Campus::Pune, vec![sample("P1", "P", "Present", Campus::Pune)])
            .unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec![RECORDS_BLOB.to_string()]);
    }
}
