//! UACE scoring: principal passes, subsidiary passes and total points.

use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::clause::SubjectEntry;
use crate::grade::{LetterGrade, OverallGrade};

/// Pass counts and points for one candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub principal_passes: u32,
    pub subsidiary_passes: u32,
    pub total_points: u32,
}

impl Add for ScoreSummary {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            principal_passes: self.principal_passes + rhs.principal_passes,
            subsidiary_passes: self.subsidiary_passes + rhs.subsidiary_passes,
            total_points: self.total_points + rhs.total_points,
        }
    }
}

impl Sum for ScoreSummary {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// What a single subject adds to the candidate's summary.
///
/// A principal `O` is a subsidiary-equivalent pass: it adds to
/// `subsidiary_passes`, never to `principal_passes`.
pub fn contribution(grade: OverallGrade) -> ScoreSummary {
    match grade {
        OverallGrade::Numeric(1..=6) => ScoreSummary {
            principal_passes: 0,
            subsidiary_passes: 1,
            total_points: 1,
        },
        OverallGrade::Numeric(_) => ScoreSummary::default(),
        OverallGrade::Letter(LetterGrade::O) => ScoreSummary {
            principal_passes: 0,
            subsidiary_passes: 1,
            total_points: LetterGrade::O.points(),
        },
        OverallGrade::Letter(LetterGrade::F) => ScoreSummary::default(),
        OverallGrade::Letter(letter) => ScoreSummary {
            principal_passes: 1,
            subsidiary_passes: 0,
            total_points: letter.points(),
        },
    }
}

/// Points one subject earns.
pub fn points(grade: OverallGrade) -> u32 {
    contribution(grade).total_points
}

/// Fold every subject's contribution. Order does not matter.
pub fn score(subjects: &[SubjectEntry]) -> ScoreSummary {
    subjects.iter().map(|s| contribution(s.grade())).sum()
}
