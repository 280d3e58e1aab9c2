//! Subject catalogue: code → display name and principal/subsidiary split.

use serde::{Deserialize, Serialize};

/// Whether a subject is graded on the letter scale or the raw 1–9 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectCategory {
    Principal,
    Subsidiary,
}

/// Codes graded as subsidiaries. Everything else is a principal subject.
pub const SUBSIDIARY_CODES: &[&str] = &["GEP", "CST", "SMA"];

const SUBJECT_NAMES: &[(&str, &str)] = &[
    ("ENG", "ENGLISH"),
    ("HIS", "HISTORY"),
    ("GEO", "GEOGRAPHY"),
    ("MAT", "MATHEMATICS"),
    ("PHY", "PHYSICS"),
    ("CHE", "CHEMISTRY"),
    ("BIO", "BIOLOGY"),
    ("IPS", "IPS"),
    ("CRE", "CRE"),
    ("COM", "COMMERCE"),
    ("IRE", "IRE"),
    ("AGR", "AGRICULTURE"),
    ("DHP", "DHOPADHOLA"),
    ("LIT", "LITERATURE IN ENGLISH"),
    ("ENT", "ENTREPRENEURSHIP"),
    ("KIS", "KISWAHILI"),
    ("LAN", "LANGO"),
    ("PE", "PHYSICAL EDUCATION"),
    ("PA", "PERFORMING ARTS"),
    ("FRE", "FRENCH"),
    ("ECO", "ECONOMICS"),
    // Subsidiaries
    ("GEP", "GENERAL PAPER"),
    ("CST", "ICT (SUBSIDIARY)"),
    ("SMA", "SUB-MATHEMATICS (SUBSIDIARY)"),
];

impl SubjectCategory {
    /// Classify a subject code. Lookup is exact, so `gep` is a principal code.
    pub fn of(code: &str) -> Self {
        if SUBSIDIARY_CODES.contains(&code) {
            SubjectCategory::Subsidiary
        } else {
            SubjectCategory::Principal
        }
    }

    pub fn is_subsidiary(self) -> bool {
        self == SubjectCategory::Subsidiary
    }
}

/// Human-readable name for a subject code, falling back to the code itself.
pub fn subject_name(code: &str) -> &str {
    SUBJECT_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}
