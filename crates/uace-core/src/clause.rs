//! Subject clause parsing: `CODE-GRADE [paper-grade,paper-grade,...]`.
//!
//! Parsing is lenient. A clause that does not fit the grammar yields `None`
//! and is treated as noise; a malformed paper pair is dropped on its own
//! while the rest of the clause is kept.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::grade::{OverallGrade, leading_int, normalize};
use crate::score;
use crate::subject::{SubjectCategory, subject_name};

/// Grade for one paper of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperGrade {
    pub paper: u32,
    pub grade: u8,
}

/// One parsed subject result.
///
/// Built by [`parse_clause`] or by deserialising a stored record, which is
/// validated the same way: the category follows the code, the grade
/// representation matches the category and `points` is recomputed from the
/// grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredEntry")]
pub struct SubjectEntry {
    code: String,
    category: SubjectCategory,
    grade: OverallGrade,
    papers: Vec<PaperGrade>,
    points: u32,
}

impl SubjectEntry {
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Display name from the subject catalogue, or the code if unknown.
    pub fn name(&self) -> &str {
        subject_name(&self.code)
    }

    pub fn category(&self) -> SubjectCategory {
        self.category
    }

    pub fn grade(&self) -> OverallGrade {
        self.grade
    }

    /// Papers in input order. Duplicate paper numbers are preserved.
    pub fn papers(&self) -> &[PaperGrade] {
        &self.papers
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    /// Grade of the first paper numbered `paper`, if any.
    pub fn paper(&self, paper: u32) -> Option<u8> {
        self.papers.iter().find(|p| p.paper == paper).map(|p| p.grade)
    }
}

/// A stored subject entry that violates the grading invariants.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("subject {code}: category {category:?} does not match the code")]
    CategoryMismatch {
        code: String,
        category: SubjectCategory,
    },

    #[error("subject {code}: grade {grade} is not valid for a {category:?} subject")]
    GradeMismatch {
        code: String,
        category: SubjectCategory,
        grade: OverallGrade,
    },

    #[error("subject {code}: paper {paper} has grade {grade} outside 1..=9")]
    PaperGradeOutOfRange { code: String, paper: u32, grade: u8 },
}

/// Wire form of [`SubjectEntry`]. Stored `points` are ignored.
#[derive(Deserialize)]
struct StoredEntry {
    code: String,
    category: SubjectCategory,
    grade: OverallGrade,
    #[serde(default)]
    papers: Vec<PaperGrade>,
}

impl TryFrom<StoredEntry> for SubjectEntry {
    type Error = EntryError;

    fn try_from(stored: StoredEntry) -> Result<Self, EntryError> {
        let StoredEntry {
            code,
            category,
            grade,
            papers,
        } = stored;

        if SubjectCategory::of(&code) != category {
            return Err(EntryError::CategoryMismatch { code, category });
        }
        let grade_ok = match grade {
            OverallGrade::Letter(_) => !category.is_subsidiary(),
            OverallGrade::Numeric(n) => category.is_subsidiary() && (1..=9).contains(&n),
        };
        if !grade_ok {
            return Err(EntryError::GradeMismatch {
                code,
                category,
                grade,
            });
        }
        if let Some(p) = papers.iter().find(|p| !(1..=9).contains(&p.grade)) {
            return Err(EntryError::PaperGradeOutOfRange {
                paper: p.paper,
                grade: p.grade,
                code,
            });
        }

        Ok(SubjectEntry {
            code,
            category,
            grade,
            papers,
            points: score::points(grade),
        })
    }
}

impl fmt::Display for SubjectEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} [", self.code, self.grade)?;
        for (i, p) in self.papers.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}-{}", p.paper, p.grade)?;
        }
        f.write_str("]")
    }
}

/// Parse one clause such as `ENT-O [1-9,2-8,3-5]`.
///
/// Returns `None` when the clause lacks a `-` or a `[`, or otherwise does
/// not match `LETTERS-ALNUM [WS] [papers]`.
pub fn parse_clause(clause: &str) -> Option<SubjectEntry> {
    let clause = clause.trim();
    if !clause.contains('-') || !clause.contains('[') {
        debug!(clause, "dropping clause without grade or paper list");
        return None;
    }

    let Some((code, grade_token, paper_list)) = split_clause(clause) else {
        debug!(clause, "dropping malformed clause");
        return None;
    };

    let category = SubjectCategory::of(code);
    let grade = normalize(grade_token, category);
    Some(SubjectEntry {
        code: code.to_string(),
        category,
        grade,
        papers: parse_papers(paper_list),
        points: score::points(grade),
    })
}

/// Split a clause into `(code, grade token, paper list body)`.
fn split_clause(clause: &str) -> Option<(&str, &str, &str)> {
    let code_end = clause
        .bytes()
        .position(|b| !b.is_ascii_alphabetic())
        .unwrap_or(clause.len());
    if code_end == 0 {
        return None;
    }
    let code = &clause[..code_end];

    let rest = clause[code_end..].strip_prefix('-')?;
    let grade_end = rest
        .bytes()
        .position(|b| !b.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    if grade_end == 0 {
        return None;
    }
    let grade = &rest[..grade_end];

    let body = rest[grade_end..]
        .trim_start()
        .strip_prefix('[')?
        .strip_suffix(']')?;
    Some((code, grade, body))
}

/// Parse `1-6,2-7,3-7`. Pairs that are not `int-int` with a grade in
/// `1..=9` are dropped individually.
fn parse_papers(list: &str) -> Vec<PaperGrade> {
    if list.trim().is_empty() {
        return Vec::new();
    }

    list.split(',')
        .filter_map(|pair| {
            let paper = parse_paper_pair(pair);
            if paper.is_none() {
                debug!(pair, "dropping malformed paper grade");
            }
            paper
        })
        .collect()
}

fn parse_paper_pair(pair: &str) -> Option<PaperGrade> {
    let mut parts = pair.split('-');
    let (Some(paper), Some(grade), None) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };
    let paper = u32::try_from(leading_int(paper)?).ok()?;
    let grade = match leading_int(grade)? {
        g @ 1..=9 => g as u8,
        _ => return None,
    };
    Some(PaperGrade { paper, grade })
}
