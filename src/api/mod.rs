use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::web;
use tracing::error;

use crate::error::ApiError;
use crate::model::attendance::AttendanceRecord;
use crate::store::RecordStore;

pub mod attendance;
pub mod campus;
pub mod muster;
pub mod reports;

/// `Content-Disposition: attachment` naming the download.
pub fn attachment(filename: impl Into<String>) -> ContentDisposition {
    ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(filename.into())],
    }
}

/// Snapshot of the store, read on the blocking pool.
pub async fn load_records(
    store: &web::Data<dyn RecordStore>,
) -> Result<Vec<AttendanceRecord>, ApiError> {
    let store = store.clone().into_inner();
    web::block(move || store.load()).await.map_err(|e| {
        error!(error = %e, "Record store read task failed");
        ApiError::Internal
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::model::attendance::AttendanceRecord;
    use crate::store::{JsonFileStore, RecordStore};

    pub fn temp_store() -> (TempDir, Arc<dyn RecordStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        (dir, Arc::new(store))
    }

    /// Store holding `records`, in the given order, one batch per campus.
    pub fn seeded_store(records: Vec<AttendanceRecord>) -> (TempDir, Arc<dyn RecordStore>) {
        let (dir, store) = temp_store();
        let mut campuses = Vec::new();
        for record in &records {
            if !campuses.contains(&record.campus) {
                campuses.push(record.campus);
            }
        }
        for campus in campuses {
            let batch = records.iter().filter(|r| r.campus == campus).cloned().collect();
            store.replace_campus(campus, batch).unwrap();
        }
        (dir, store)
    }
}
