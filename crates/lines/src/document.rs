// Chunk: docs/chunks/document_session - Editing session owning text, index, and folds

//! A `Document` is one editing session's view of the text: a mirrored copy of
//! the engine's bytes, the line index over them, and the per-line fold flags.
//!
//! Edit notifications are the only way in. Each one is planned against the
//! pre-edit text and then applied to all three structures together, so any
//! query issued after [`Document::apply`] returns sees a consistent state.

use std::ops::Range;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::columns;
use crate::config::DocumentConfig;
use crate::error::PreconditionViolation;
use crate::fold_state::FoldState;
use crate::gap_buffer::GapBuffer;
use crate::line_index::LineIndex;
use crate::line_query::{LineQuery, LineQueryMut};
use crate::notification::{EditNotification, EditNotificationProcessor};
use crate::types::{DirtyLines, MultiByteState};

/// An editing session.
#[derive(Debug)]
pub struct Document {
    text: GapBuffer<u8>,
    index: LineIndex,
    folds: FoldState,
    processor: EditNotificationProcessor,
    config: DocumentConfig,
    /// Edits applied since the last consistency check.
    edits_since_check: u64,
}

impl Document {
    /// Creates an empty document: one empty line.
    pub fn new(config: DocumentConfig) -> Self {
        Self::from_text(config, b"")
    }

    /// Creates a document holding `text`.
    pub fn from_text(config: DocumentConfig, text: &[u8]) -> Self {
        let index = LineIndex::from_text(text, config.line_ending);
        let folds = FoldState::new(index.line_count());
        Self {
            text: GapBuffer::from_slice(text),
            index,
            folds,
            processor: EditNotificationProcessor::new(config.line_ending),
            config,
            edits_since_check: 0,
        }
    }

    // ==================== Accessors ====================

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Total length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.index.line_count()
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.index
    }

    /// Returns the whole text, with invalid UTF-8 replaced.
    pub fn content(&self) -> String {
        String::from_utf8_lossy(&self.text.to_vec()).into_owned()
    }

    /// Read-only line queries.
    pub fn lines(&self) -> LineQuery<'_> {
        LineQuery::new(&self.index, &self.folds)
    }

    /// Line queries plus fold-state writes.
    pub fn lines_mut(&mut self) -> LineQueryMut<'_> {
        LineQueryMut::new(&self.index, &mut self.folds)
    }

    /// Collapsed lines joined by the configured separator.
    pub fn folding_state(&self) -> String {
        self.folds.to_folding_string(&self.config.fold_separator)
    }

    /// Restores fold flags from a string using the configured separator.
    pub fn set_folding_state(&mut self, text: &str) -> crate::FoldRestore {
        self.folds.restore(text, &self.config.fold_separator)
    }

    /// Byte range of `line`'s content, line break excluded. `line` is clamped.
    fn content_range(&self, line: usize) -> Range<usize> {
        let range = self.index.line_range(line);
        let mut bytes = Vec::with_capacity(range.len());
        self.text.copy_range_into(range.clone(), &mut bytes);
        let break_len = self.config.line_ending.trailing_break_len(&bytes);
        range.start..range.end - break_len
    }

    /// Returns the bytes of `line` without its line break.
    pub fn line_bytes(&self, line: usize) -> Vec<u8> {
        let mut bytes = Vec::new();
        self.text.copy_range_into(self.content_range(line), &mut bytes);
        bytes
    }

    /// Returns the content of `line` without its line break, lossily decoded.
    pub fn line_content(&self, line: usize) -> String {
        String::from_utf8_lossy(&self.line_bytes(line)).into_owned()
    }

    /// Offset just before `line`'s line break.
    pub fn line_end_position(&self, line: usize) -> usize {
        self.content_range(line).end
    }

    /// Returns whether `line` contains non-ASCII bytes, scanning and caching
    /// the answer if the line was edited since it was last asked.
    pub fn contains_multi_byte(&mut self, line: usize) -> bool {
        let line = self.index.clamp_line(line);
        if let Some(known) = self.index.multi_byte(line).known() {
            return known;
        }
        let mut bytes = Vec::new();
        self.text.copy_range_into(self.index.line_range(line), &mut bytes);
        let state = MultiByteState::scan(&bytes);
        self.index.set_multi_byte(line, state);
        state == MultiByteState::ContainsMultiByte
    }

    // ==================== Columns ====================

    /// Grapheme column of `position` within its line.
    pub fn column(&mut self, position: usize) -> usize {
        let line = self.index.line_from_position(position);
        let ascii = !self.contains_multi_byte(line);
        let start = self.index.position_from_line(line);
        columns::column_of(
            &self.line_bytes(line),
            position.saturating_sub(start),
            ascii,
        )
    }

    /// Offset of grapheme `column` on `line`, saturating at the line end.
    pub fn find_column(&mut self, line: usize, column: usize) -> usize {
        let line = self.index.clamp_line(line);
        let ascii = !self.contains_multi_byte(line);
        let start = self.index.position_from_line(line);
        start + columns::byte_of_column(&self.line_bytes(line), column, ascii)
    }

    /// Display width of `position`'s line up to `position`, in cells.
    pub fn display_column(&mut self, position: usize) -> usize {
        let line = self.index.line_from_position(position);
        let ascii = !self.contains_multi_byte(line);
        let start = self.index.position_from_line(line);
        columns::display_column_of(
            &self.line_bytes(line),
            position.saturating_sub(start),
            ascii,
        )
    }

    // ==================== Mutations ====================

    /// Applies one edit notification.
    ///
    /// # Errors
    ///
    /// A [`PreconditionViolation`] leaves the document untouched. The index
    /// and the engine have diverged at that point; call [`rebuild`] or
    /// [`set_text`] with the engine's text to recover.
    ///
    /// [`rebuild`]: Self::rebuild
    /// [`set_text`]: Self::set_text
    pub fn apply(
        &mut self,
        notification: &EditNotification<'_>,
    ) -> Result<DirtyLines, PreconditionViolation> {
        let plan = self
            .processor
            .plan(&self.index, &self.text, notification)
            .inspect_err(|err| tracing::error!(%err, "rejected edit notification"))?;

        let deleted = notification.position..notification.position + notification.deleted_length;
        self.text.replace_range(deleted, notification.inserted);
        plan.apply_to_index(&mut self.index);
        plan.apply_to_folds(&mut self.folds);
        tracing::debug!(
            first_line = plan.first_line(),
            line_delta = plan.line_delta(),
            line_count = self.index.line_count(),
            "applied edit"
        );

        self.check_consistency();
        Ok(plan.dirty_lines())
    }

    /// Inserts `text` at `position`.
    ///
    /// # Errors
    ///
    /// See [`apply`](Self::apply).
    pub fn insert(
        &mut self,
        position: usize,
        text: &str,
    ) -> Result<DirtyLines, PreconditionViolation> {
        self.apply(&EditNotification::insert(position, text.as_bytes()))
    }

    /// Deletes `length` bytes at `position`.
    ///
    /// # Errors
    ///
    /// See [`apply`](Self::apply).
    pub fn delete(
        &mut self,
        position: usize,
        length: usize,
    ) -> Result<DirtyLines, PreconditionViolation> {
        self.apply(&EditNotification::delete(position, length))
    }

    /// Replaces `length` bytes at `position` with `text`.
    ///
    /// # Errors
    ///
    /// See [`apply`](Self::apply).
    pub fn replace(
        &mut self,
        position: usize,
        length: usize,
        text: &str,
    ) -> Result<DirtyLines, PreconditionViolation> {
        let notification = EditNotification::replace(position, length, text.as_bytes());
        self.apply(&notification)
    }

    /// Replaces the whole text and rebuilds everything. All lines end up expanded.
    pub fn set_text(&mut self, text: &[u8]) -> DirtyLines {
        self.text.reset(text);
        self.rebuild();
        self.folds.reset(self.index.line_count());
        DirtyLines::FromLineToEnd(0)
    }

    /// Rebuilds the line index from the mirrored text.
    ///
    /// Fold flags survive if the line count did not change; otherwise they
    /// are reset to expanded.
    pub fn rebuild(&mut self) {
        self.index.rebuild(&self.text.to_vec(), self.config.line_ending);
        if self.folds.line_count() != self.index.line_count() {
            self.folds.reset(self.index.line_count());
        }
        self.edits_since_check = 0;
        tracing::debug!(line_count = self.index.line_count(), "rebuilt line index");
    }

    /// Every `consistency_check_interval` edits, compares the incremental
    /// index with a fresh scan and rebuilds on drift.
    fn check_consistency(&mut self) {
        let interval = self.config.consistency_check_interval;
        if interval == 0 {
            return;
        }
        self.edits_since_check += 1;
        if self.edits_since_check < interval {
            return;
        }
        self.edits_since_check = 0;

        let expected = LineIndex::from_text(&self.text.to_vec(), self.config.line_ending);
        if expected.line_starts() != self.index.line_starts() {
            tracing::error!(
                indexed_lines = self.index.line_count(),
                expected_lines = expected.line_count(),
                "line index drift detected; rebuilding"
            );
            self.rebuild();
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DocumentConfig::default())
    }
}

/// A [`Document`] behind the single exclusive lock hosts need when
/// notifications and queries arrive on different threads.
#[derive(Debug, Clone, Default)]
pub struct SharedDocument {
    inner: Arc<Mutex<Document>>,
}

impl SharedDocument {
    pub fn new(document: Document) -> Self {
        Self {
            inner: Arc::new(Mutex::new(document)),
        }
    }

    /// Locks the document.
    ///
    /// A poisoned lock is recovered: edits are applied infallibly once
    /// planned, so a panic elsewhere cannot leave the document half-edited.
    pub fn lock(&self) -> MutexGuard<'_, Document> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with the document locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        f(&mut self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_breaks::LineEnding;
    use pretty_assertions::assert_eq;

    fn doc(text: &str) -> Document {
        Document::from_text(DocumentConfig::default(), text.as_bytes())
    }

    #[test]
    fn test_new_document_has_one_line() {
        let d = Document::default();
        assert_eq!(d.line_count(), 1);
        assert!(d.is_empty());
        assert_eq!(d.line_content(0), "");
    }

    #[test]
    fn test_edits_keep_text_and_index_in_sync() {
        let mut d = doc("hello\nworld");
        d.insert(5, ",\nbig").unwrap();
        assert_eq!(d.content(), "hello,\nbig\nworld");
        assert_eq!(d.line_count(), 3);
        assert_eq!(d.line_content(1), "big");

        d.delete(6, 5).unwrap();
        assert_eq!(d.content(), "hello,world");
        assert_eq!(d.line_count(), 1);
    }

    #[test]
    fn test_rejected_edit_leaves_document_untouched() {
        let mut d = doc("abc");
        assert!(d.delete(2, 5).is_err());
        assert_eq!(d.content(), "abc");
        assert_eq!(d.line_index().line_starts(), vec![0, 3]);
    }

    #[test]
    fn test_line_end_position_excludes_break() {
        let d = doc("ab\r\ncd\ne");
        assert_eq!(d.line_end_position(0), 2);
        assert_eq!(d.line_end_position(1), 6);
        assert_eq!(d.line_end_position(2), 8);
        assert_eq!(d.line_content(0), "ab");
    }

    #[test]
    fn test_multi_byte_is_lazy_and_cached() {
        let mut d = doc("plain\ncaf\u{e9}");
        assert_eq!(d.line_index().multi_byte(1), MultiByteState::Unknown);
        assert!(d.contains_multi_byte(1));
        assert_eq!(
            d.line_index().multi_byte(1),
            MultiByteState::ContainsMultiByte
        );
        assert!(!d.contains_multi_byte(0));

        // Editing line 1 forgets the answer; line 0 keeps it.
        d.delete(9, 2).unwrap();
        assert_eq!(d.line_index().multi_byte(1), MultiByteState::Unknown);
        assert_eq!(d.line_index().multi_byte(0), MultiByteState::SingleByteOnly);
        assert!(!d.contains_multi_byte(1));
    }

    #[test]
    fn test_empty_replace_reports_no_dirty_lines() {
        let mut d = Document::default();
        d.insert(0, "ab\ncd").unwrap();
        assert!(!d.contains_multi_byte(0));

        assert_eq!(d.replace(1, 0, "").unwrap(), DirtyLines::None);
        assert_eq!(d.content(), "ab\ncd");
        assert_eq!(d.line_index().multi_byte(0), MultiByteState::SingleByteOnly);
    }

    #[test]
    fn test_fold_flags_follow_edits() {
        let mut d = doc("a\nb\nc\nd");
        d.set_folding_state("2");
        d.insert(0, "x\ny\n").unwrap();
        assert_eq!(d.folding_state(), "4");

        d.delete(0, 4).unwrap();
        assert_eq!(d.folding_state(), "2");
    }

    #[test]
    fn test_set_text_resets_folds() {
        let mut d = doc("a\nb");
        d.set_folding_state("1");
        assert_eq!(d.set_text(b"one\ntwo\nthree"), DirtyLines::FromLineToEnd(0));
        assert_eq!(d.line_count(), 3);
        assert_eq!(d.folding_state(), "");
    }

    #[test]
    fn test_columns() {
        let mut d = doc("abc\nx\u{e9}y");
        assert_eq!(d.column(2), 2);
        // Line 1 starts at 4: 'x' 4, 'é' 5..7, 'y' 7
        assert_eq!(d.column(7), 2);
        assert_eq!(d.find_column(1, 2), 7);
        assert_eq!(d.find_column(1, 99), 8);
        assert_eq!(d.display_column(8), 3);
    }

    #[test]
    fn test_consistency_check_runs_without_drift() {
        let config = DocumentConfig {
            consistency_check_interval: 1,
            line_ending: LineEnding::CrLf,
            ..DocumentConfig::default()
        };
        let mut d = Document::new(config);
        d.insert(0, "a\r\nb").unwrap();
        d.insert(2, "\r\n").unwrap();
        assert_eq!(d.line_index().line_starts(), vec![0, 4, 6]);
    }

    #[test]
    fn test_shared_document_across_threads() {
        let shared = SharedDocument::default();
        let writer = shared.clone();
        std::thread::spawn(move || {
            writer.with(|d| d.insert(0, "one\ntwo").unwrap());
        })
        .join()
        .unwrap();

        assert_eq!(shared.lock().line_count(), 2);
    }

    #[test]
    fn test_shared_document_recovers_from_poisoned_lock() {
        let shared = SharedDocument::new(doc("a\nb"));
        let writer = shared.clone();
        let result = std::thread::spawn(move || {
            writer.with(|d| {
                d.insert(0, "x").unwrap();
                panic!("host callback failed while holding the lock");
            })
        })
        .join();
        assert!(result.is_err());

        assert_eq!(shared.lock().content(), "xa\nb");
        shared.with(|d| d.insert(3, "\n").unwrap());
        assert_eq!(shared.lock().line_count(), 3);
        assert_eq!(shared.lock().line_content(2), "b");
    }
}
