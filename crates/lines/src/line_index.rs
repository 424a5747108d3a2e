// Chunk: docs/chunks/line_index - Gap-buffered per-line records

//! Line index for tracking line boundaries in a document.
//!
//! Holds one [`LineRecord`] per line plus a trailing sentinel whose start is
//! the document length, so the length of every line (the last included) is
//! `start(i + 1) - start(i)`.
//!
//! Records live in a [`GapBuffer`], so inserting or removing records near the
//! previous structural edit is cheap. Offset shifts are deferred: the index
//! remembers a *step* (`step_from`, `step_delta`) meaning "every record at or
//! after `step_from` is really `step_delta` further along than stored". A new
//! shift only materializes the records between the old and new step
//! positions, so a stream of edits in one neighborhood never walks the whole
//! document.

use std::ops::Range;

use crate::gap_buffer::GapBuffer;
use crate::line_breaks::LineEnding;
use crate::types::{LineRecord, MultiByteState};

/// Saturates `index` into `[lower, upper]`.
///
/// Every consumer-facing indexer goes through this instead of failing on an
/// out-of-range line. If `upper < lower`, `lower` wins.
pub fn clamp(index: usize, lower: usize, upper: usize) -> usize {
    index.min(upper).max(lower)
}

fn offset_by(value: usize, delta: isize) -> usize {
    value.saturating_add_signed(delta)
}

fn shift_starts(records: &mut GapBuffer<LineRecord>, range: Range<usize>, delta: isize) {
    records.for_each_mut(range, |r| r.start = offset_by(r.start, delta));
}

/// Tracks line boundaries in a document.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Line records followed by the sentinel. Never fewer than two entries.
    records: GapBuffer<LineRecord>,
    /// First record index whose stored start lacks `step_delta`.
    step_from: usize,
    step_delta: isize,
}

impl LineIndex {
    /// Creates an index for an empty document: one empty line plus the sentinel.
    pub fn new() -> Self {
        Self {
            records: GapBuffer::from_slice(&[LineRecord::new(0), LineRecord::new(0)]),
            step_from: 2,
            step_delta: 0,
        }
    }

    /// Builds an index by scanning `text`.
    pub fn from_text(text: &[u8], line_ending: LineEnding) -> Self {
        let mut index = Self::new();
        index.rebuild(text, line_ending);
        index
    }

    /// Rebuilds the index from scratch.
    ///
    /// This is O(n) in the document length and is the recovery path when the
    /// incremental index and the engine disagree.
    pub fn rebuild(&mut self, text: &[u8], line_ending: LineEnding) {
        let mut starts = vec![0];
        line_ending.scan_break_ends(text, 0, &mut starts);
        starts.push(text.len());

        let records: Vec<LineRecord> = starts.into_iter().map(LineRecord::new).collect();
        self.records.reset(&records);
        self.step_from = self.records.len();
        self.step_delta = 0;
    }

    // ==================== Accessors ====================

    /// Returns the number of lines. Always at least 1.
    pub fn line_count(&self) -> usize {
        self.records.len() - 1
    }

    /// Returns the total document length (the sentinel's start).
    pub fn document_length(&self) -> usize {
        self.start_at(self.line_count())
    }

    /// Start of record `i` with any pending step applied. `i` must be in range.
    fn start_at(&self, i: usize) -> usize {
        let stored = self.records.get(i).map_or(0, |r| r.start);
        if i >= self.step_from {
            offset_by(stored, self.step_delta)
        } else {
            stored
        }
    }

    /// Returns the start offset of record `i`, the sentinel included.
    ///
    /// Returns `None` past the sentinel.
    pub fn start(&self, i: usize) -> Option<usize> {
        (i < self.records.len()).then(|| self.start_at(i))
    }

    /// Clamps a line number into `[0, line_count - 1]`.
    pub fn clamp_line(&self, line: usize) -> usize {
        clamp(line, 0, self.line_count() - 1)
    }

    /// Returns the start offset of `line`, clamped to a real line.
    pub fn position_from_line(&self, line: usize) -> usize {
        self.start_at(self.clamp_line(line))
    }

    /// Returns the length of `line` in bytes, line break included.
    pub fn line_length(&self, line: usize) -> usize {
        let line = self.clamp_line(line);
        self.start_at(line + 1) - self.start_at(line)
    }

    /// Returns the byte range `line` covers, line break included.
    pub fn line_range(&self, line: usize) -> Range<usize> {
        let line = self.clamp_line(line);
        self.start_at(line)..self.start_at(line + 1)
    }

    /// Returns the line containing `offset`.
    ///
    /// Offsets at or beyond the end saturate to the last line. O(log n).
    pub fn line_from_position(&self, offset: usize) -> usize {
        // First real line whose start is past `offset`.
        let (mut lo, mut hi) = (0, self.line_count());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.start_at(mid) <= offset {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo.saturating_sub(1)
    }

    /// Returns the cached multi-byte state of `line` (clamped).
    pub fn multi_byte(&self, line: usize) -> MultiByteState {
        self.records
            .get(self.clamp_line(line))
            .map_or(MultiByteState::Unknown, |r| r.multi_byte)
    }

    /// Caches the multi-byte state of `line`. Out-of-range lines are ignored.
    pub fn set_multi_byte(&mut self, line: usize, state: MultiByteState) {
        if line < self.line_count() {
            if let Some(record) = self.records.get_mut(line) {
                record.multi_byte = state;
            }
        }
    }

    /// Marks every line in `lines` as needing a rescan.
    pub fn invalidate_multi_byte(&mut self, lines: Range<usize>) {
        let end = lines.end.min(self.line_count());
        self.records
            .for_each_mut(lines.start..end, |r| r.multi_byte = MultiByteState::Unknown);
    }

    /// Returns every record start, sentinel last.
    pub fn line_starts(&self) -> Vec<usize> {
        (0..self.records.len()).map(|i| self.start_at(i)).collect()
    }

    // ==================== Structural updates ====================

    /// Applies the pending step to records `[step_from, upto)`.
    fn settle(&mut self, upto: usize) {
        let upto = upto.min(self.records.len());
        if self.step_from >= upto {
            return;
        }
        if self.step_delta != 0 {
            shift_starts(&mut self.records, self.step_from..upto, self.step_delta);
        }
        self.step_from = upto;
        if self.step_from == self.records.len() {
            self.step_delta = 0;
        }
    }

    /// Adds `delta` to the start of every record at or after `from`, the
    /// sentinel included.
    pub fn shift_offsets(&mut self, from: usize, delta: isize) {
        let len = self.records.len();
        if delta == 0 || from >= len {
            return;
        }
        if self.step_delta == 0 {
            self.step_from = from;
            self.step_delta = delta;
            return;
        }

        if from >= self.step_from {
            // Bring the records between the old and new step up to date.
            self.settle(from);
        } else {
            // Records in [from, step_from) are current; give them the new delta directly.
            shift_starts(&mut self.records, from..self.step_from, delta);
        }
        self.step_delta += delta;

        if self.step_delta == 0 {
            self.step_from = len;
        }
    }

    /// Overwrites the start of a real line other than line 0.
    pub fn set_start(&mut self, line: usize, start: usize) {
        if line == 0 || line >= self.line_count() {
            return;
        }
        self.settle(line + 1);
        if let Some(record) = self.records.get_mut(line) {
            record.start = start;
            record.multi_byte = MultiByteState::Unknown;
        }
    }

    /// Inserts one new line per entry of `starts`, the first landing at `at`.
    ///
    /// `at` is clamped to `[1, line_count]`: line 0 always starts at 0 and
    /// nothing may follow the sentinel. `starts` must be ascending and fit
    /// between the neighbouring records.
    pub fn insert_lines(&mut self, at: usize, starts: &[usize]) {
        if starts.is_empty() {
            return;
        }
        let at = clamp(at, 1, self.line_count());
        self.settle(at);

        let records: Vec<LineRecord> = starts.iter().copied().map(LineRecord::new).collect();
        self.records.insert_slice(at, &records);

        if self.step_delta == 0 {
            self.step_from = self.records.len();
        } else {
            self.step_from += records.len();
        }
        let neighbourhood = at.saturating_sub(1)..at + records.len() + 1;
        debug_assert!(self.is_ordered(neighbourhood));
    }

    /// Removes `count` lines starting at `at`, merging them into line `at - 1`.
    ///
    /// Line 0 and the sentinel are never removed; the range is clamped to
    /// `[1, line_count)`.
    pub fn remove_lines(&mut self, at: usize, count: usize) {
        let at = at.max(1);
        let end = at.saturating_add(count).min(self.line_count());
        if at >= end {
            return;
        }
        let count = end - at;
        self.records.remove_range(at..end);

        if self.step_delta == 0 {
            self.step_from = self.records.len();
        } else if self.step_from >= end {
            self.step_from -= count;
        } else if self.step_from > at {
            self.step_from = at;
        }
    }

    fn is_ordered(&self, range: Range<usize>) -> bool {
        let end = range.end.min(self.records.len());
        (range.start..end)
            .zip(range.start + 1..end)
            .all(|(a, b)| self.start_at(a) <= self.start_at(b))
    }

    /// Checks the structural invariants: line 0 starts at 0, starts never
    /// decrease, and only the final real line may share its start with the
    /// sentinel.
    pub fn check_invariants(&self) -> bool {
        let starts = self.line_starts();
        let count = self.line_count();
        starts.first() == Some(&0)
            && starts.len() >= 2
            && starts[..count].windows(2).all(|w| w[0] < w[1])
            && starts[count - 1] <= starts[count]
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(text: &str) -> LineIndex {
        LineIndex::from_text(text.as_bytes(), LineEnding::Any)
    }

    #[test]
    fn test_new() {
        let index = LineIndex::new();
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_starts(), vec![0, 0]);
        assert!(index.check_invariants());
    }

    #[test]
    fn test_rebuild_multiple_lines() {
        let index = index_of("hello\nworld\n");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_starts(), vec![0, 6, 12, 12]);
        assert!(index.check_invariants());
    }

    #[test]
    fn test_line_length_includes_break() {
        let index = index_of("hello\r\nworld");
        assert_eq!(index.line_length(0), 7);
        assert_eq!(index.line_length(1), 5);
        // Clamped to the last line
        assert_eq!(index.line_length(9), 5);
    }

    #[test]
    fn test_line_from_position() {
        let index = index_of("hello\nworld\nfoo");
        assert_eq!(index.line_from_position(0), 0);
        assert_eq!(index.line_from_position(5), 0); // '\n'
        assert_eq!(index.line_from_position(6), 1);
        assert_eq!(index.line_from_position(12), 2);
        assert_eq!(index.line_from_position(15), 2);
        assert_eq!(index.line_from_position(1000), 2);
    }

    #[test]
    fn test_line_from_position_trailing_empty_line() {
        let index = index_of("a\n");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.line_from_position(2), 1);
    }

    #[test]
    fn test_position_from_line_clamps() {
        let index = index_of("a\nb\nc");
        assert_eq!(index.position_from_line(1), 2);
        assert_eq!(index.position_from_line(99), 4);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5, 0, 3), 3);
        assert_eq!(clamp(0, 1, 3), 1);
        assert_eq!(clamp(2, 1, 3), 2);
    }

    #[test]
    fn test_shift_offsets() {
        let mut index = index_of("a\nb\nc");
        index.shift_offsets(1, 1);
        assert_eq!(index.line_starts(), vec![0, 3, 5, 6]);
    }

    #[test]
    fn test_shift_offsets_accumulates_forward() {
        let mut index = index_of("aa\nbb\ncc\ndd");
        // starts [0, 3, 6, 9, 11]
        index.shift_offsets(1, 2);
        index.shift_offsets(3, -1);
        assert_eq!(index.line_starts(), vec![0, 5, 8, 10, 12]);
    }

    #[test]
    fn test_shift_offsets_accumulates_backward() {
        let mut index = index_of("aa\nbb\ncc\ndd");
        index.shift_offsets(3, 4);
        index.shift_offsets(1, 1);
        assert_eq!(index.line_starts(), vec![0, 4, 7, 14, 16]);
    }

    #[test]
    fn test_shift_offsets_cancel_out() {
        let mut index = index_of("aa\nbb");
        index.shift_offsets(1, 3);
        index.shift_offsets(1, -3);
        assert_eq!(index.line_starts(), vec![0, 3, 5]);
    }

    #[test]
    fn test_insert_lines_with_pending_step() {
        let mut index = index_of("ab\ncd");
        // Insert "x\ny\n" at offset 3 (start of line 1): tail moves by 4.
        index.shift_offsets(1, 4);
        index.insert_lines(1, &[3, 5]);
        assert_eq!(index.line_starts(), vec![0, 3, 5, 7, 9]);
        assert!(index.check_invariants());
    }

    #[test]
    fn test_insert_lines_clamps_position() {
        let mut index = index_of("ab");
        index.shift_offsets(1, 2);
        index.insert_lines(0, &[3]);
        assert_eq!(index.line_starts(), vec![0, 3, 4]);
    }

    #[test]
    fn test_remove_lines_with_pending_step() {
        let mut index = index_of("a\nb\nc\nd");
        // starts [0, 2, 4, 6, 7]; delete "\nb\nc" (4 bytes at 1)
        index.shift_offsets(3, -4);
        index.remove_lines(1, 2);
        assert_eq!(index.line_starts(), vec![0, 2, 3]);
    }

    #[test]
    fn test_remove_lines_never_removes_sentinel() {
        let mut index = index_of("a\nb");
        index.remove_lines(1, 10);
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_starts(), vec![0, 3]);
    }

    #[test]
    fn test_set_start_inside_step() {
        let mut index = index_of("a\nb\nc");
        index.shift_offsets(1, 1);
        index.set_start(1, 2);
        assert_eq!(index.line_starts(), vec![0, 2, 5, 6]);
    }

    #[test]
    fn test_multi_byte_cache() {
        let mut index = index_of("a\nb\nc");
        index.set_multi_byte(1, MultiByteState::ContainsMultiByte);
        index.set_multi_byte(2, MultiByteState::SingleByteOnly);
        assert_eq!(index.multi_byte(1), MultiByteState::ContainsMultiByte);

        index.invalidate_multi_byte(1..2);
        assert_eq!(index.multi_byte(1), MultiByteState::Unknown);
        assert_eq!(index.multi_byte(2), MultiByteState::SingleByteOnly);

        // Sentinel is not a line
        index.set_multi_byte(3, MultiByteState::ContainsMultiByte);
        assert_eq!(index.multi_byte(3), MultiByteState::SingleByteOnly);
    }
}
