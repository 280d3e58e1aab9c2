//! The generated records file handed to the document renderer.
//!
//! JSON envelope `{ "generatedAt": ..., "records": [{ "id", "record" }] }`,
//! records in batch input order.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;
use uace_core::{BuiltRecord, CandidateRecord, RecordId};

use crate::{RecordStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: RecordId,
    pub record: CandidateRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFile {
    /// RFC 3339 timestamp of the generation run.
    pub generated_at: String,
    pub records: Vec<StoredRecord>,
}

impl RecordFile {
    pub fn from_batch(generated_at: String, built: &[BuiltRecord]) -> Self {
        Self {
            generated_at,
            records: built
                .iter()
                .map(|b| StoredRecord {
                    id: b.id,
                    record: b.record.clone(),
                })
                .collect(),
        }
    }

    pub fn write(&self, path: &Path) -> Result<(), StoreError> {
        let mut out = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut out, self)?;
        out.write_all(b"\n")?;
        out.flush()?;
        info!(path = %path.display(), records = self.records.len(), "wrote records file");
        Ok(())
    }

    /// Read a records file. Subject entries are validated on decode and every
    /// summary is recomputed from its subjects.
    pub fn read(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Err(StoreError::RecordsFileNotFound(path.to_path_buf()));
        }
        let reader = BufReader::new(File::open(path)?);
        let mut file: Self = serde_json::from_reader(reader)?;
        for stored in &mut file.records {
            stored.record.rescore();
        }
        info!(path = %path.display(), records = file.records.len(), "read records file");
        Ok(file)
    }

    /// Load every record into a fresh lookup store.
    pub fn into_store(self) -> Result<RecordStore, StoreError> {
        let store = RecordStore::new();
        for mut stored in self.records {
            stored.record.rescore();
            store.insert(stored.id, stored.record)?;
        }
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uace_core::{RawRow, SchoolSettings, generate_batch};

    fn batch() -> Vec<BuiltRecord> {
        let rows = vec![
            RawRow {
                name: "NAKATO SARAH".into(),
                sex: "F".into(),
                subjects: "GEP-5 [1-5] ENT-O [1-9,2-8,3-5] CRE-O [1-4,2-5,4-9]".into(),
                ..Default::default()
            },
            RawRow {
                name: "OKELLO JAMES".into(),
                sex: "M".into(),
                subjects: "MAT-A [1-1,2-2] PHY-C [1-3,2-4,3-3]".into(),
                ..Default::default()
            },
        ];
        generate_batch(&rows, &SchoolSettings::default())
    }

    #[test]
    fn write_then_read() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("records.json");
        let built = batch();
        let file = RecordFile::from_batch("2025-11-01T08:00:00+00:00".into(), &built);
        file.write(&path).unwrap();

        let back = RecordFile::read(&path).unwrap();
        assert_eq!(back, file);
        assert_eq!(back.records[0].record.name, "NAKATO SARAH");
        assert_eq!(back.records[1].record.summary.total_points, 10);
    }

    #[test]
    fn json_envelope_keys() {
        let file = RecordFile::from_batch("2025-11-01T08:00:00+00:00".into(), &batch());
        let json = serde_json::to_value(&file).unwrap();
        assert!(json["generatedAt"].is_string());
        let first = &json["records"][0];
        assert!(first["id"].is_string());
        assert_eq!(first["record"]["serialNumber"], "UNEB/UACE/F/001/2025");
        assert_eq!(first["record"]["subsidiaryPasses"], 3);
    }

    #[test]
    fn missing_file_errors() {
        let result = RecordFile::read(Path::new("/nonexistent/records.json"));
        assert!(matches!(result, Err(StoreError::RecordsFileNotFound(_))));
    }

    #[test]
    fn malformed_file_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("records.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(matches!(RecordFile::read(&path), Err(StoreError::Json(_))));
    }

    fn tampered_file(subject: &str, summary: &str) -> String {
        format!(
            r#"{{"generatedAt":"","records":[{{"id":"{}","record":{{
                "school":"","name":"X","indexNo":"","sex":"MALE","dob":"","year":"2025",
                "serialNumber":"UNEB/UACE/M/001/2025","resCode":"",
                "subjects":[{subject}],{summary}}}}}]}}"#,
            uace_core::RecordId::new()
        )
    }

    #[test]
    fn tampered_grade_rejected_on_read() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("records.json");
        std::fs::write(
            &path,
            tampered_file(
                r#"{"code":"ENG","category":"Principal","grade":200,"papers":[],"points":99}"#,
                r#""principalPasses":7,"subsidiaryPasses":0,"totalPoints":500"#,
            ),
        )
        .unwrap();
        assert!(matches!(RecordFile::read(&path), Err(StoreError::Json(_))));
    }

    #[test]
    fn tampered_points_and_summary_recomputed() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("records.json");
        std::fs::write(
            &path,
            tampered_file(
                r#"{"code":"ENG","category":"Principal","grade":"A","papers":[],"points":99}"#,
                r#""principalPasses":7,"subsidiaryPasses":4,"totalPoints":500"#,
            ),
        )
        .unwrap();

        let file = RecordFile::read(&path).unwrap();
        let record = &file.records[0].record;
        assert_eq!(record.subjects[0].points(), 6);
        assert_eq!(record.summary.total_points, 6);
        assert_eq!(record.summary.principal_passes, 1);
        assert_eq!(record.summary.subsidiary_passes, 0);

        let id = file.records[0].id.to_string();
        let payload = file.into_store().unwrap().verify(&id).payload().unwrap();
        assert_eq!(payload.total_points, 6);
        assert_eq!(payload.principal_passes, 1);
    }

    #[test]
    fn into_store_verifies_every_record() {
        let built = batch();
        let store = RecordFile::from_batch(String::new(), &built)
            .into_store()
            .unwrap();
        assert_eq!(store.len(), 2);
        for b in &built {
            let payload = store.verify(&b.id.to_string()).payload().unwrap();
            assert_eq!(payload, b.payload);
        }
    }
}
