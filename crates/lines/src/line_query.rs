// Chunk: docs/chunks/line_query - Read facade over the line index

//! The query surface UI code talks to: margin painting, fold toggling, and
//! per-line collection indexers.
//!
//! Every lookup saturates instead of failing: an index past the last line
//! reads the last line, because hover and scroll code routinely asks about
//! positions at or beyond the document edge.
//!
//! [`LineQuery`] borrows the index read-only. [`LineQueryMut`] additionally
//! writes fold flags, which are the only state a consumer may change; the
//! line index itself is only ever mutated by edit notifications.

use crate::fold_state::{FoldRestore, FoldState};
use crate::line_index::LineIndex;
use crate::types::LineView;

/// Read-only view over a document's lines.
#[derive(Debug, Clone, Copy)]
pub struct LineQuery<'a> {
    index: &'a LineIndex,
    folds: &'a FoldState,
}

impl<'a> LineQuery<'a> {
    pub fn new(index: &'a LineIndex, folds: &'a FoldState) -> Self {
        Self { index, folds }
    }

    /// Number of lines. Always at least 1.
    pub fn count(&self) -> usize {
        self.index.line_count()
    }

    /// Returns the line at `index`, clamped to the last line.
    pub fn line(&self, index: usize) -> LineView {
        let index = self.index.clamp_line(index);
        LineView {
            index,
            start: self.index.position_from_line(index),
            length: self.index.line_length(index),
            expanded: self.folds.is_expanded(index),
            multi_byte: self.index.multi_byte(index),
        }
    }

    /// Iterates over every line in document order.
    pub fn iter(&self) -> impl Iterator<Item = LineView> + 'a {
        let query = *self;
        (0..self.count()).map(move |i| query.line(i))
    }

    pub fn line_from_position(&self, offset: usize) -> usize {
        self.index.line_from_position(offset)
    }

    pub fn position_from_line(&self, line: usize) -> usize {
        self.index.position_from_line(line)
    }

    pub fn line_length(&self, line: usize) -> usize {
        self.index.line_length(line)
    }

    pub fn document_length(&self) -> usize {
        self.index.document_length()
    }

    pub fn is_expanded(&self, line: usize) -> bool {
        self.folds.is_expanded(self.index.clamp_line(line))
    }

    /// Collapsed line numbers, ascending, joined by `separator`.
    pub fn folding_state(&self, separator: &str) -> String {
        self.folds.to_folding_string(separator)
    }
}

/// [`LineQuery`] plus fold-state writes.
#[derive(Debug)]
pub struct LineQueryMut<'a> {
    index: &'a LineIndex,
    folds: &'a mut FoldState,
}

impl<'a> LineQueryMut<'a> {
    pub fn new(index: &'a LineIndex, folds: &'a mut FoldState) -> Self {
        Self { index, folds }
    }

    /// Reborrows as a read-only query.
    pub fn as_query(&self) -> LineQuery<'_> {
        LineQuery::new(self.index, self.folds)
    }

    pub fn count(&self) -> usize {
        self.index.line_count()
    }

    pub fn line(&self, index: usize) -> LineView {
        self.as_query().line(index)
    }

    pub fn folding_state(&self, separator: &str) -> String {
        self.folds.to_folding_string(separator)
    }

    /// Expands every line, then toggles each line listed in `text`.
    ///
    /// Line numbers this document does not have are skipped silently.
    pub fn set_folding_state(&mut self, text: &str, separator: &str) -> FoldRestore {
        self.folds.restore(text, separator)
    }

    /// Sets the fold flag of `line`, clamped to the last line.
    pub fn set_expanded(&mut self, line: usize, expanded: bool) {
        let line = self.index.clamp_line(line);
        self.folds.set_expanded(line, expanded);
    }

    /// Toggles the fold flag of `line`, clamped to the last line, and returns
    /// the new state.
    pub fn toggle_fold(&mut self, line: usize) -> bool {
        let line = self.index.clamp_line(line);
        self.folds.toggle(line);
        self.folds.is_expanded(line)
    }

    pub fn expand_all(&mut self) {
        self.folds.expand_all();
    }
}
