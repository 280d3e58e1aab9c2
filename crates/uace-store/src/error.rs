use thiserror::Error;
use uace_core::RecordId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("records file not found: {0}")]
    RecordsFileNotFound(std::path::PathBuf),

    #[error("record {0} already stored")]
    DuplicateId(RecordId),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
