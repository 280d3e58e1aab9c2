//! UACE result-string parsing, scoring and record building.
//!
//! A result line such as `GEP-5 [1-5] ENT-O [1-9,2-8,3-5]` flows through
//! [`tokenize`] → [`clause`] (using [`grade`]) → [`score`] → [`record`].

pub mod batch;
pub mod clause;
pub mod config;
pub mod grade;
pub mod record;
pub mod row;
pub mod score;
pub mod subject;
pub mod tokenize;

pub use batch::{generate_batch, generate_with_counter};
pub use clause::{EntryError, PaperGrade, SubjectEntry, parse_clause};
pub use config::{ConfigError, SchoolSettings};
pub use grade::{LetterGrade, OverallGrade, normalize};
pub use record::{
    BuiltRecord, CandidateRecord, Gender, PayloadSubject, RecordId, SerialCounter,
    VerificationPayload, build, parse_subjects, serial_number,
};
pub use row::RawRow;
pub use score::{ScoreSummary, score};
pub use subject::{SubjectCategory, subject_name};
pub use tokenize::{Clauses, clauses, tokenize};
