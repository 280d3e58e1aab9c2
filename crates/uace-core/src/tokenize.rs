//! Result-line tokenisation.
//!
//! A result line is whitespace-separated clauses, but the paper list is
//! usually detached from its grade (`CRE-O [1-4,2-5]`). Any whitespace token
//! that starts with `[` is glued back onto the clause before it with a
//! single space.

use std::iter::Peekable;
use std::str::SplitWhitespace;

/// Lazy iterator over the clauses of a result line.
///
/// Single left-to-right pass. Cloning restarts from the current position;
/// calling [`clauses`] again restarts from the beginning.
#[derive(Debug, Clone)]
pub struct Clauses<'a> {
    tokens: Peekable<SplitWhitespace<'a>>,
}

/// Iterate the clauses of `line` in source order.
pub fn clauses(line: &str) -> Clauses<'_> {
    Clauses {
        tokens: line.split_whitespace().peekable(),
    }
}

/// Collect the clauses of `line`.
pub fn tokenize(line: &str) -> Vec<String> {
    clauses(line).collect()
}

impl Iterator for Clauses<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        // A bracket token with nothing before it has no clause to join.
        let head = self.tokens.find(|t| !t.starts_with('['))?;

        let mut clause = head.to_string();
        while let Some(cont) = self.tokens.next_if(|t| t.starts_with('[')) {
            clause.push(' ');
            clause.push_str(cont);
        }
        Some(clause)
    }
}
