// Chunk: docs/chunks/fold_state - Per-line expanded flags and their persisted form

//! Per-line fold (expanded/collapsed) flags.
//!
//! Flags are addressed by line number and stored beside the line index rather
//! than inside its records. [`EditPlan::apply_to_folds`] inserts and removes
//! flags in step with the index so a collapsed line stays collapsed when lines
//! above it come and go.
//!
//! The persisted form is the ascending list of collapsed line numbers joined
//! by a caller-chosen separator, e.g. `"1;3"`.
//!
//! [`EditPlan::apply_to_folds`]: crate::EditPlan::apply_to_folds

use crate::gap_buffer::GapBuffer;

/// Outcome of restoring a persisted fold string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FoldRestore {
    /// Tokens that toggled a line.
    pub applied: usize,
    /// Tokens that were out of range or not a line number.
    pub skipped: usize,
}

/// One expanded flag per line.
#[derive(Debug, Clone)]
pub struct FoldState {
    expanded: GapBuffer<bool>,
}

impl FoldState {
    /// Creates fold state for `line_count` lines, all expanded.
    pub fn new(line_count: usize) -> Self {
        Self {
            expanded: GapBuffer::from_slice(&vec![true; line_count]),
        }
    }

    /// Resets to `line_count` expanded lines (after a full rebuild).
    pub fn reset(&mut self, line_count: usize) {
        self.expanded.reset(&vec![true; line_count]);
    }

    pub fn line_count(&self) -> usize {
        self.expanded.len()
    }

    /// Returns whether `line` is expanded. Lines past the end read as expanded.
    pub fn is_expanded(&self, line: usize) -> bool {
        self.expanded.get(line).unwrap_or(true)
    }

    /// Sets the flag for `line`. Returns false if the line does not exist.
    pub fn set_expanded(&mut self, line: usize, expanded: bool) -> bool {
        match self.expanded.get_mut(line) {
            Some(flag) => {
                *flag = expanded;
                true
            }
            None => false,
        }
    }

    /// Flips the flag for `line`. Returns false if the line does not exist.
    pub fn toggle(&mut self, line: usize) -> bool {
        match self.expanded.get_mut(line) {
            Some(flag) => {
                *flag = !*flag;
                true
            }
            None => false,
        }
    }

    pub fn expand_all(&mut self) {
        let len = self.expanded.len();
        self.expanded.for_each_mut(0..len, |flag| *flag = true);
    }

    /// Returns the collapsed lines in ascending order.
    pub fn collapsed_lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.expanded
            .iter()
            .enumerate()
            .filter(|(_, expanded)| !expanded)
            .map(|(line, _)| line)
    }

    /// Adds `count` expanded lines starting at `at`.
    pub fn insert_lines(&mut self, at: usize, count: usize) {
        self.expanded.insert_slice(at, &vec![true; count]);
    }

    /// Drops the flags of `count` lines starting at `at`.
    pub fn remove_lines(&mut self, at: usize, count: usize) {
        self.expanded.remove_range(at..at.saturating_add(count));
    }

    /// Serializes the collapsed lines, ascending, joined by `separator`.
    pub fn to_folding_string(&self, separator: &str) -> String {
        self.collapsed_lines()
            .map(|line| line.to_string())
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Restores a string produced by [`to_folding_string`](Self::to_folding_string).
    ///
    /// Expands every line, then toggles each listed line. Tokens that are not
    /// a line number of this document are skipped. An empty separator treats
    /// the whole string as one token.
    pub fn restore(&mut self, text: &str, separator: &str) -> FoldRestore {
        self.expand_all();

        let tokens: Box<dyn Iterator<Item = &str>> = if separator.is_empty() {
            Box::new(std::iter::once(text))
        } else {
            Box::new(text.split(separator))
        };

        let mut outcome = FoldRestore::default();
        for token in tokens.map(str::trim).filter(|t| !t.is_empty()) {
            let toggled = token.parse::<usize>().is_ok_and(|line| self.toggle(line));
            if toggled {
                outcome.applied += 1;
            } else {
                outcome.skipped += 1;
            }
        }

        if outcome.skipped > 0 {
            tracing::warn!(
                skipped = outcome.skipped,
                line_count = self.line_count(),
                "fold state referenced lines that do not exist"
            );
        }
        outcome
    }
}
