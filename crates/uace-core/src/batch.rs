//! Batch generation: one record per row, serials restarting at 1.

use tracing::{debug, info};

use crate::config::SchoolSettings;
use crate::record::{BuiltRecord, SerialCounter, build};
use crate::row::RawRow;

/// Build records for a whole batch in input order.
///
/// Each call owns a fresh [`SerialCounter`], so every batch numbers its
/// candidates 1, 2, 3, ... whether or not their subjects parse.
pub fn generate_batch(rows: &[RawRow], settings: &SchoolSettings) -> Vec<BuiltRecord> {
    let counter = SerialCounter::new();
    info!(rows = rows.len(), year = %settings.year, "generating batch");
    let built = generate_with_counter(rows, &counter, settings);

    let without_subjects = built
        .iter()
        .filter(|b| b.record.subjects.is_empty())
        .count();
    info!(records = built.len(), without_subjects, "batch complete");
    built
}

/// Build records drawing serials from a caller-owned counter.
pub fn generate_with_counter(
    rows: &[RawRow],
    counter: &SerialCounter,
    settings: &SchoolSettings,
) -> Vec<BuiltRecord> {
    rows.iter()
        .map(|row| {
            let built = build(row, counter.next_serial(), settings);
            debug!(
                serial = %built.record.serial_number,
                subjects = built.record.subjects.len(),
                points = built.record.summary.total_points,
                "built record"
            );
            built
        })
        .collect()
}
