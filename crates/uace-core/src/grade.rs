//! Overall-grade normalisation.
//!
//! Raw grade tokens arrive as letters (`A`, `o`), digits (`1`–`9`) or junk.
//! Normalisation never fails: anything unrecognised degrades to the worst
//! grade for the subject's category (`F` for principals, `9` for
//! subsidiaries) so a bad cell cannot abort a batch.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::subject::SubjectCategory;

/// Letter grade awarded for a principal subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    A,
    B,
    C,
    D,
    E,
    O,
    F,
}

impl LetterGrade {
    /// Parse a single letter, case-insensitively.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(LetterGrade::A),
            'B' => Some(LetterGrade::B),
            'C' => Some(LetterGrade::C),
            'D' => Some(LetterGrade::D),
            'E' => Some(LetterGrade::E),
            'O' => Some(LetterGrade::O),
            'F' => Some(LetterGrade::F),
            _ => None,
        }
    }

    /// Fixed numeric-to-letter table: 1..=5 → A..E, 6 → O, 7..=9 → F.
    pub fn from_numeric(n: i64) -> Option<Self> {
        match n {
            1 => Some(LetterGrade::A),
            2 => Some(LetterGrade::B),
            3 => Some(LetterGrade::C),
            4 => Some(LetterGrade::D),
            5 => Some(LetterGrade::E),
            6 => Some(LetterGrade::O),
            7..=9 => Some(LetterGrade::F),
            _ => None,
        }
    }

    /// Points table: A=6, B=5, C=4, D=3, E=2, O=1, F=0.
    pub fn points(self) -> u32 {
        match self {
            LetterGrade::A => 6,
            LetterGrade::B => 5,
            LetterGrade::C => 4,
            LetterGrade::D => 3,
            LetterGrade::E => 2,
            LetterGrade::O => 1,
            LetterGrade::F => 0,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            LetterGrade::A => 'A',
            LetterGrade::B => 'B',
            LetterGrade::C => 'C',
            LetterGrade::D => 'D',
            LetterGrade::E => 'E',
            LetterGrade::O => 'O',
            LetterGrade::F => 'F',
        }
    }
}

/// Canonical overall grade of one subject.
///
/// Principal subjects always hold a [`LetterGrade`]; subsidiary subjects
/// always hold an integer in `1..=9`. Serialises as `"A"` or `5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OverallGrade {
    Letter(LetterGrade),
    Numeric(u8),
}

impl OverallGrade {
    /// Worst grade for a category, used for empty and unrecognised tokens.
    pub fn worst(category: SubjectCategory) -> Self {
        match category {
            SubjectCategory::Principal => OverallGrade::Letter(LetterGrade::F),
            SubjectCategory::Subsidiary => OverallGrade::Numeric(9),
        }
    }
}

impl fmt::Display for OverallGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverallGrade::Letter(l) => write!(f, "{}", l.as_char()),
            OverallGrade::Numeric(n) => write!(f, "{n}"),
        }
    }
}

/// Normalise a raw overall-grade token for a subject of the given category.
///
/// - Principal: a leading letter in `A B C D E F O` wins (anything after it is
///   ignored); otherwise an integer `1..=9` is mapped through
///   [`LetterGrade::from_numeric`]; otherwise `F`.
/// - Subsidiary: an integer `1..=9` is kept as-is; otherwise `9`.
pub fn normalize(token: &str, category: SubjectCategory) -> OverallGrade {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return OverallGrade::worst(category);
    }

    match category {
        SubjectCategory::Subsidiary => match leading_int(trimmed) {
            Some(n @ 1..=9) => OverallGrade::Numeric(n as u8),
            _ => OverallGrade::worst(category),
        },
        SubjectCategory::Principal => {
            if let Some(letter) = trimmed.chars().next().and_then(LetterGrade::from_char) {
                return OverallGrade::Letter(letter);
            }
            leading_int(trimmed)
                .and_then(LetterGrade::from_numeric)
                .map(OverallGrade::Letter)
                .unwrap_or_else(|| OverallGrade::worst(category))
        }
    }
}

/// Parse the integer prefix of a token: optional sign, then ASCII digits.
///
/// `"5"` and `"5x"` both yield 5; `"x5"` and `""` yield `None`. Trailing
/// junk is tolerated the same way spreadsheet exports tolerate it.
pub(crate) fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digit_end = rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    if digit_end == 0 {
        return None;
    }
    let value: i64 = rest[..digit_end].parse().ok()?;
    Some(if negative { -value } else { value })
}
