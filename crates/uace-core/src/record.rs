//! Candidate records, serial numbers and the verification payload.
//!
//! A [`CandidateRecord`] is built once per input row. Its
//! [`VerificationPayload`] is the reduced projection embedded in the
//! document's QR code; the [`RecordId`] is the only key a verifier ever
//! presents, so it is a random v4 UUID rather than anything derived from
//! the record.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clause::{PaperGrade, SubjectEntry, parse_clause};
use crate::config::SchoolSettings;
use crate::grade::OverallGrade;
use crate::row::RawRow;
use crate::score::{ScoreSummary, score};
use crate::tokenize::clauses;

const FILE_STEM_MAX: usize = 50;

/// Opaque identifier of a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Sex column as printed on the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    /// Anything other than exactly `M` or `F`, kept verbatim.
    Other(String),
}

impl Gender {
    pub fn from_sex(sex: &str) -> Self {
        match sex {
            "M" => Gender::Male,
            "F" => Gender::Female,
            other => Gender::Other(other.to_string()),
        }
    }

    pub fn display(&self) -> &str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Other(raw) => raw,
        }
    }

    /// Single-letter code used in the serial number.
    pub fn code(&self) -> char {
        match self {
            Gender::Male => 'M',
            Gender::Female => 'F',
            Gender::Other(_) => 'X',
        }
    }
}

/// Batch-scoped serial allocator.
///
/// Starts at 1. `next_serial` is a single atomic increment-and-read, so
/// workers sharing one counter never see the same value twice.
#[derive(Debug)]
pub struct SerialCounter {
    next: AtomicU32,
}

impl SerialCounter {
    pub fn new() -> Self {
        Self {
            next: AtomicU32::new(1),
        }
    }

    pub fn next_serial(&self) -> u32 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for SerialCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Document serial number: `UNEB/UACE/{M|F|X}/{serial:03}/{year}`.
pub fn serial_number(gender: &Gender, serial: u32, year: &str) -> String {
    format!("UNEB/UACE/{}/{:03}/{}", gender.code(), serial, year)
}

/// Canonical result record for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecord {
    pub school: String,
    pub name: String,
    pub index_no: String,
    /// Display gender (`MALE`, `FEMALE` or the raw cell).
    pub sex: String,
    pub dob: String,
    pub year: String,
    pub serial_number: String,
    pub res_code: String,
    pub subjects: Vec<SubjectEntry>,
    #[serde(flatten)]
    pub summary: ScoreSummary,
}

impl CandidateRecord {
    /// Recompute the summary from the subjects, discarding any stored value.
    pub fn rescore(&mut self) {
        self.summary = score(&self.subjects);
    }

    /// Largest paper count of any subject; the width of the paper columns.
    pub fn max_papers(&self) -> usize {
        self.subjects
            .iter()
            .map(|s| s.papers().len())
            .max()
            .unwrap_or(0)
    }

    /// File-system-safe stem derived from the candidate's name.
    pub fn file_stem(&self) -> String {
        self.name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .take(FILE_STEM_MAX)
            .collect()
    }

    /// Project the record into its public verification payload.
    pub fn payload(&self) -> VerificationPayload {
        VerificationPayload {
            school: self.school.clone(),
            name: self.name.clone(),
            index_no: self.index_no.clone(),
            sex: self.sex.clone(),
            dob: self.dob.clone(),
            year: self.year.clone(),
            serial_number: self.serial_number.clone(),
            res_code: self.res_code.clone(),
            principal_passes: self.summary.principal_passes,
            subsidiary_passes: self.summary.subsidiary_passes,
            total_points: self.summary.total_points,
            subjects: self
                .subjects
                .iter()
                .map(|s| PayloadSubject {
                    code: s.code().to_string(),
                    name: s.name().to_string(),
                    grade: s.grade(),
                    points: s.points(),
                    papers: s.papers().to_vec(),
                })
                .collect(),
        }
    }
}

/// Verification payload. Field names and nesting are read by an external
/// scanner and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationPayload {
    pub school: String,
    pub name: String,
    pub index_no: String,
    pub sex: String,
    pub dob: String,
    pub year: String,
    pub serial_number: String,
    pub res_code: String,
    pub principal_passes: u32,
    pub subsidiary_passes: u32,
    pub total_points: u32,
    pub subjects: Vec<PayloadSubject>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadSubject {
    pub code: String,
    pub name: String,
    pub grade: OverallGrade,
    pub points: u32,
    pub papers: Vec<PaperGrade>,
}

/// Output of [`build`]: the record, its payload and its store key.
#[derive(Debug, Clone)]
pub struct BuiltRecord {
    pub id: RecordId,
    pub record: CandidateRecord,
    pub payload: VerificationPayload,
}

/// Parse every clause of a result line, dropping the ones that do not parse.
pub fn parse_subjects(line: &str) -> Vec<SubjectEntry> {
    clauses(line).filter_map(|c| parse_clause(&c)).collect()
}

/// Build the record for one row with an externally assigned serial.
pub fn build(row: &RawRow, serial: u32, settings: &SchoolSettings) -> BuiltRecord {
    let gender = Gender::from_sex(&row.sex);
    let subjects = parse_subjects(&row.subjects);
    let summary = score(&subjects);

    let record = CandidateRecord {
        school: settings.school_name.clone(),
        name: row.name.clone(),
        index_no: row.index_no.clone(),
        sex: gender.display().to_string(),
        dob: row.dob.clone(),
        year: settings.year.clone(),
        serial_number: serial_number(&gender, serial, &settings.year),
        res_code: row.res_code.clone(),
        subjects,
        summary,
    };
    let payload = record.payload();

    BuiltRecord {
        id: RecordId::new(),
        record,
        payload,
    }
}
