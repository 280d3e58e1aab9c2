//! Generation pipeline: read candidate rows → build records → write outputs.

use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;
use uace_core::{
    BuiltRecord, RawRow, RecordId, SchoolSettings, VerificationPayload, generate_batch,
};
use uace_store::RecordFile;

use crate::display;

pub struct GenerateStats {
    pub total_rows: usize,
    pub skipped_rows: usize,
    pub records: usize,
    pub elapsed_secs: f64,
}

/// What the document renderer embeds in the QR code for one candidate.
#[derive(Serialize)]
struct PayloadArtifact<'a> {
    id: RecordId,
    payload: &'a VerificationPayload,
}

/// Run a full batch: read rows, build records, write the records file and
/// optional per-candidate payload files.
pub fn run_generate(
    input: &Path,
    out: &Path,
    payload_dir: Option<&Path>,
    settings: &SchoolSettings,
) -> anyhow::Result<GenerateStats> {
    let start = Instant::now();

    // 1. Read rows.
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("reading candidate rows from {}", input.display()))?;
    let (rows, skipped_rows) = parse_rows(&text)
        .with_context(|| format!("decoding candidate rows in {}", input.display()))?;
    let total_rows = rows.len() + skipped_rows;
    eprintln!("  Read {total_rows} rows from {}", input.display());

    // 2. Build records.
    let built = generate_batch(&rows, settings);
    for b in &built {
        println!("{}", display::summary_line(&b.record));
    }

    // 3. Write records file.
    let generated_at = chrono::Utc::now().to_rfc3339();
    RecordFile::from_batch(generated_at, &built)
        .write(out)
        .with_context(|| format!("writing records to {}", out.display()))?;

    // 4. Per-candidate payloads.
    if let Some(dir) = payload_dir {
        write_payloads(dir, &built)?;
    }

    Ok(GenerateStats {
        total_rows,
        skipped_rows,
        records: built.len(),
        elapsed_secs: start.elapsed().as_secs_f64(),
    })
}

/// Decode a JSON array of spreadsheet rows.
///
/// Elements that are not objects are skipped and counted; anything other
/// than a top-level array is an error.
fn parse_rows(text: &str) -> anyhow::Result<(Vec<RawRow>, usize)> {
    let values: Vec<Value> = serde_json::from_str(text).context("expected a JSON array of rows")?;
    let mut rows = Vec::with_capacity(values.len());
    let mut skipped = 0;

    for (i, value) in values.into_iter().enumerate() {
        if !value.is_object() {
            warn!(row = i + 1, "skipping row that is not an object");
            skipped += 1;
            continue;
        }
        match serde_json::from_value::<RawRow>(value) {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!(row = i + 1, error = %e, "skipping undecodable row");
                skipped += 1;
            }
        }
    }
    Ok((rows, skipped))
}

fn write_payloads(dir: &Path, built: &[BuiltRecord]) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating payload directory {}", dir.display()))?;

    let mut written = HashSet::new();
    for b in built {
        let stem = b.record.file_stem();
        if !written.insert(stem.clone()) {
            warn!(
                file = %stem,
                serial = %b.record.serial_number,
                "payload file name reused; overwriting"
            );
        }
        let path = dir.join(format!("{stem}.json"));
        let artifact = PayloadArtifact {
            id: b.id,
            payload: &b.payload,
        };
        let json = serde_json::to_string_pretty(&artifact)?;
        std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    }
    eprintln!("  Wrote {} payload files to {}", built.len(), dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: &str = r#"[
        {"Candidate_Name": "NAKATO SARAH", "IndexNo": 501, "Sex": "F",
         "Res. Code": "1", "DATE OF BIRTH": "01/02/2006",
         "Subjects": "GEP-5 [1-5] ENT-O [1-9,2-8,3-5] CRE-O [1-4,2-5,4-9]"},
        "not a row",
        {"Candidate_Name": "OKELLO JAMES", "Sex": "M", "Subjects": ""}
    ]"#;

    #[test]
    fn parse_rows_skips_non_objects() {
        let (rows, skipped) = parse_rows(ROWS).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(skipped, 1);
        assert_eq!(rows[0].index_no, "501");
        assert_eq!(rows[1].name, "OKELLO JAMES");
    }

    #[test]
    fn parse_rows_requires_array() {
        assert!(parse_rows(r#"{"Candidate_Name": "X"}"#).is_err());
        assert!(parse_rows("not json").is_err());
    }

    #[test]
    fn full_pipeline() {
        let tmp = tempfile::TempDir::new().unwrap();
        let input = tmp.path().join("rows.json");
        let out = tmp.path().join("records.json");
        let payloads = tmp.path().join("payloads");
        std::fs::write(&input, ROWS).unwrap();

        let stats =
            run_generate(&input, &out, Some(&payloads), &SchoolSettings::default()).unwrap();
        assert_eq!(stats.total_rows, 3);
        assert_eq!(stats.skipped_rows, 1);
        assert_eq!(stats.records, 2);

        let file = RecordFile::read(&out).unwrap();
        assert_eq!(file.records.len(), 2);
        assert_eq!(file.records[0].record.serial_number, "UNEB/UACE/F/001/2025");
        assert_eq!(file.records[1].record.serial_number, "UNEB/UACE/M/002/2025");
        assert_eq!(file.records[0].record.summary.subsidiary_passes, 3);

        let artifact: Value = serde_json::from_str(
            &std::fs::read_to_string(payloads.join("NAKATO_SARAH.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(artifact["id"], file.records[0].id.to_string());
        assert_eq!(artifact["payload"]["totalPoints"], 3);
        assert!(payloads.join("OKELLO_JAMES.json").exists());
    }

    #[test]
    fn unreadable_input_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = run_generate(
            &tmp.path().join("missing.json"),
            &tmp.path().join("out.json"),
            None,
            &SchoolSettings::default(),
        );
        assert!(result.is_err());
    }
}
