//! Process-lifetime record store keyed by opaque record identifiers.

use std::collections::HashSet;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info};
use uace_core::{BuiltRecord, CandidateRecord, RecordId, VerificationPayload};

use crate::StoreError;

/// Outcome of a verification lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Valid(CandidateRecord),
    /// Unknown or unparsable identifier.
    Invalid,
}

impl Verification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verification::Valid(_))
    }

    pub fn payload(&self) -> Option<VerificationPayload> {
        match self {
            Verification::Valid(record) => Some(record.payload()),
            Verification::Invalid => None,
        }
    }
}

/// Identifier → record mapping with no eviction.
///
/// Backed by `DashMap`, so concurrent batches may insert while lookups run.
/// Lookups never mutate.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: DashMap<RecordId, CandidateRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record under a new identifier.
    pub fn insert(&self, id: RecordId, record: CandidateRecord) -> Result<(), StoreError> {
        match self.records.entry(id) {
            Entry::Occupied(_) => Err(StoreError::DuplicateId(id)),
            Entry::Vacant(slot) => {
                debug!(%id, serial = %record.serial_number, "stored record");
                slot.insert(record);
                Ok(())
            }
        }
    }

    /// Store every record of a batch. Returns how many were inserted.
    ///
    /// Identifiers are checked against the store and each other before
    /// anything is inserted, so a duplicate leaves the store unchanged. A
    /// concurrent writer inserting one of the same identifiers in between can
    /// still make the batch stop partway.
    pub fn extend<'a, I>(&self, built: I) -> Result<usize, StoreError>
    where
        I: IntoIterator<Item = &'a BuiltRecord>,
    {
        let built: Vec<&BuiltRecord> = built.into_iter().collect();
        let mut seen = HashSet::with_capacity(built.len());
        if let Some(b) = built
            .iter()
            .find(|b| self.contains(&b.id) || !seen.insert(b.id))
        {
            return Err(StoreError::DuplicateId(b.id));
        }

        let mut count = 0;
        for b in built {
            self.insert(b.id, b.record.clone())?;
            count += 1;
        }
        info!(count, total = self.len(), "stored batch records");
        Ok(count)
    }

    pub fn get(&self, id: &RecordId) -> Option<CandidateRecord> {
        self.records.get(id).map(|r| r.clone())
    }

    /// Look up an identifier as presented by a verifier.
    pub fn verify(&self, id: &str) -> Verification {
        match id.parse::<RecordId>() {
            Ok(id) => self
                .get(&id)
                .map(Verification::Valid)
                .unwrap_or(Verification::Invalid),
            Err(_) => Verification::Invalid,
        }
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use uace_core::{RawRow, SchoolSettings, build, generate_batch};

    fn row(name: &str, subjects: &str) -> RawRow {
        RawRow {
            name: name.into(),
            sex: "M".into(),
            subjects: subjects.into(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_store() {
        let store = RecordStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn verify_fresh_record() {
        let store = RecordStore::new();
        let built = build(
            &row("OKELLO", "HIS-B [1-2,2-3] GEP-4 [1-4]"),
            1,
            &SchoolSettings::default(),
        );
        store.insert(built.id, built.record.clone()).unwrap();

        let result = store.verify(&built.id.to_string());
        assert!(result.is_valid());
        let payload = result.payload().unwrap();
        assert_eq!(payload.total_points, built.record.summary.total_points);
        assert_eq!(payload.total_points, 6);
        assert_eq!(payload, built.payload);
    }

    #[test]
    fn unknown_id_is_invalid() {
        let store = RecordStore::new();
        let built = build(&row("A", ""), 1, &SchoolSettings::default());
        store.insert(built.id, built.record).unwrap();

        assert_eq!(store.verify(&RecordId::new().to_string()), Verification::Invalid);
        assert_eq!(store.verify("definitely-not-an-id"), Verification::Invalid);
        assert_eq!(store.verify(""), Verification::Invalid);
        assert!(store.verify("").payload().is_none());
    }

    #[test]
    fn duplicate_id_rejected() {
        let store = RecordStore::new();
        let built = build(&row("A", ""), 1, &SchoolSettings::default());
        store.insert(built.id, built.record.clone()).unwrap();
        let result = store.insert(built.id, built.record);
        assert!(matches!(result, Err(StoreError::DuplicateId(id)) if id == built.id));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn extend_with_batch() {
        let store = RecordStore::new();
        let rows = vec![row("A", "ENG-A [1-1]"), row("B", ""), row("C", "GEP-7 [1-7]")];
        let built = generate_batch(&rows, &SchoolSettings::default());
        assert_eq!(store.extend(&built).unwrap(), 3);
        for b in &built {
            assert!(store.contains(&b.id));
            assert_eq!(store.get(&b.id).unwrap(), b.record);
        }
    }

    #[test]
    fn extend_with_duplicate_inserts_nothing() {
        let store = RecordStore::new();
        let settings = SchoolSettings::default();
        let existing = build(&row("A", ""), 1, &settings);
        store.insert(existing.id, existing.record.clone()).unwrap();

        let mut batch = generate_batch(&[row("B", ""), row("C", "")], &settings);
        batch.push(existing.clone());
        let result = store.extend(&batch);
        assert!(matches!(result, Err(StoreError::DuplicateId(id)) if id == existing.id));
        assert_eq!(store.len(), 1);
        assert!(!store.contains(&batch[0].id));
    }

    #[test]
    fn extend_with_repeated_id_in_batch_inserts_nothing() {
        let store = RecordStore::new();
        let batch = generate_batch(&[row("A", "")], &SchoolSettings::default());
        let repeated = vec![batch[0].clone(), batch[0].clone()];
        assert!(matches!(store.extend(&repeated), Err(StoreError::DuplicateId(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn concurrent_inserts_and_lookups() {
        let store = Arc::new(RecordStore::new());
        let settings = SchoolSettings::default();
        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let store = Arc::clone(&store);
                let settings = settings.clone();
                std::thread::spawn(move || {
                    let rows: Vec<RawRow> = (0..25)
                        .map(|i| row(&format!("W{worker}-{i}"), "ENT-O [1-6]"))
                        .collect();
                    let built = generate_batch(&rows, &settings);
                    store.extend(&built).unwrap();
                    built
                        .iter()
                        .all(|b| store.verify(&b.id.to_string()).is_valid())
                })
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap());
        }
        assert_eq!(store.len(), 100);
    }
}
