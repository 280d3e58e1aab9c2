//! Text rendering of candidate records.
//!
//! Subjects are rows and papers 1..=max are columns, matching the layout of
//! the printed testimonial.

use std::fmt;

use uace_core::{CandidateRecord, ScoreSummary, SubjectEntry};

const SUBJECT_COL: usize = 30;
const PAPER_COL: usize = 4;

// ── Public API ──

/// Print a full record card: identity, subject table, statistics.
pub fn print_record_card(id: &str, record: &CandidateRecord) {
    print!("{}", RecordCard { id, record });
}

/// Print the subject table and statistics for an ad-hoc result line.
pub fn print_parsed_line(subjects: &[SubjectEntry], summary: &ScoreSummary) {
    let max_papers = subjects.iter().map(|s| s.papers().len()).max().unwrap_or(0);
    println!("{}", SubjectTable { subjects, max_papers });
    print!(
        "{}",
        Statistics {
            res_code: None,
            summary
        }
    );
}

/// One line per generated candidate.
pub fn summary_line(record: &CandidateRecord) -> String {
    format!(
        "{:<22} {:<30} {:>2} subj  P={} S={} pts={}",
        record.serial_number,
        record.name,
        record.subjects.len(),
        record.summary.principal_passes,
        record.summary.subsidiary_passes,
        record.summary.total_points,
    )
}

// ── Sections ──

/// Identity block, subject table and statistics for one record.
pub struct RecordCard<'a> {
    pub id: &'a str,
    pub record: &'a CandidateRecord,
}

impl fmt::Display for RecordCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record;
        writeln!(f, "=== {} ===", record.serial_number)?;
        if !record.school.is_empty() {
            writeln!(f, "{}", record.school)?;
        }
        writeln!(f)?;

        writeln!(f, "Candidate")?;
        for (label, value) in [
            ("id", self.id),
            ("name", record.name.as_str()),
            ("index_no", record.index_no.as_str()),
            ("sex", record.sex.as_str()),
            ("dob", record.dob.as_str()),
            ("year", record.year.as_str()),
        ] {
            if !value.is_empty() {
                writeln!(f, "  {:<26} {}", label, value)?;
            }
        }
        writeln!(f)?;

        if !record.subjects.is_empty() {
            let table = SubjectTable {
                subjects: &record.subjects,
                max_papers: record.max_papers(),
            };
            writeln!(f, "{table}")?;
        }
        write!(
            f,
            "{}",
            Statistics {
                res_code: Some(&record.res_code),
                summary: &record.summary,
            }
        )
    }
}

/// Subjects as rows, papers `1..=max_papers` as columns, overall grade last.
pub struct SubjectTable<'a> {
    pub subjects: &'a [SubjectEntry],
    pub max_papers: usize,
}

impl fmt::Display for SubjectTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {:<SUBJECT_COL$}", "SUBJECT")?;
        for paper in 1..=self.max_papers {
            write!(f, "{:>PAPER_COL$}", format!("P{paper}"))?;
        }
        writeln!(f, "  OVERALL")?;

        for subject in self.subjects {
            write!(f, "  {:<SUBJECT_COL$}", truncate(subject.name(), SUBJECT_COL))?;
            for paper in 1..=self.max_papers {
                let cell = subject
                    .paper(paper as u32)
                    .map(|g| g.to_string())
                    .unwrap_or_default();
                write!(f, "{:>PAPER_COL$}", cell)?;
            }
            writeln!(f, "  {}", subject.grade())?;
        }
        Ok(())
    }
}

/// Result code and pass counts.
pub struct Statistics<'a> {
    pub res_code: Option<&'a str>,
    pub summary: &'a ScoreSummary,
}

impl fmt::Display for Statistics<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary;
        writeln!(f, "Result")?;
        if let Some(code) = self.res_code
            && !code.is_empty()
        {
            writeln!(f, "  {:<26} {}", "res_code", code)?;
        }
        writeln!(f, "  {:<26} {}", "principal_passes", summary.principal_passes)?;
        writeln!(f, "  {:<26} {}", "subsidiary_passes", summary.subsidiary_passes)?;
        writeln!(f, "  {:<26} {}", "total_points", summary.total_points)
    }
}

// ── Helpers ──

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max - 3).collect();
        format!("{head}...")
    } else {
        s.to_string()
    }
}
