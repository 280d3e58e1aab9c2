//! Storage layer: in-memory verification lookup and the generated records file.

mod error;
pub use error::StoreError;

mod file;
pub use file::{RecordFile, StoredRecord};

mod memory;
pub use memory::{RecordStore, Verification};
