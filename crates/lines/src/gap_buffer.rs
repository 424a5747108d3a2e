// Chunk: docs/chunks/line_index - Gap-buffered per-line records

//! Gap buffer implementation for localized sequence editing.
//!
//! A gap buffer is an array with a movable gap at the last edit point.
//! Insertions and deletions at the gap are O(1) per element; moving the gap is
//! O(gap_distance) but amortizes well for typical editing patterns (locality of
//! edits). The same structure backs the document bytes, the per-line records,
//! and the per-line fold flags.

use std::ops::Range;

const INITIAL_GAP_SIZE: usize = 64;
const GAP_GROWTH_FACTOR: usize = 2;

/// A gap buffer over `Copy` elements.
///
/// The storage looks like `[pre-gap | gap | post-gap]`. Logical index `i`
/// maps to physical `i` before the gap and `i + gap_len` after it.
#[derive(Debug, Clone)]
pub struct GapBuffer<T> {
    /// The underlying storage. Contains [pre-gap content | gap | post-gap content].
    data: Vec<T>,
    /// Index where the gap starts (first unused position).
    gap_start: usize,
    /// Index where the gap ends (first used position after gap).
    gap_end: usize,
}

impl<T: Copy + Default> GapBuffer<T> {
    /// Creates a new empty gap buffer.
    pub fn new() -> Self {
        Self {
            data: vec![T::default(); INITIAL_GAP_SIZE],
            gap_start: 0,
            gap_end: INITIAL_GAP_SIZE,
        }
    }

    /// Creates a gap buffer initialized with the given elements, gap at the end.
    pub fn from_slice(items: &[T]) -> Self {
        let len = items.len();
        let capacity = len + INITIAL_GAP_SIZE;

        let mut data = Vec::with_capacity(capacity);
        data.extend_from_slice(items);
        data.resize(capacity, T::default());

        Self {
            data,
            gap_start: len,
            gap_end: capacity,
        }
    }

    /// Returns the logical length of the buffer (excluding the gap).
    pub fn len(&self) -> usize {
        self.data.len() - self.gap_len()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the current gap size.
    fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// Returns the current gap position in logical coordinates.
    pub fn gap_position(&self) -> usize {
        self.gap_start
    }

    fn physical(&self, pos: usize) -> usize {
        if pos < self.gap_start {
            pos
        } else {
            pos + self.gap_len()
        }
    }

    /// Moves the gap to the specified logical position.
    ///
    /// This is O(distance) where distance is the absolute difference between
    /// the current gap position and the target position.
    pub fn move_gap_to(&mut self, pos: usize) {
        let pos = pos.min(self.len());

        if pos < self.gap_start {
            // Move gap left: shift content from [pos..gap_start] to [gap_end - shift..gap_end]
            let shift = self.gap_start - pos;
            self.data.copy_within(pos..self.gap_start, self.gap_end - shift);
            self.gap_start = pos;
            self.gap_end -= shift;
        } else if pos > self.gap_start {
            // Move gap right: shift content from [gap_end..gap_end + shift] to [gap_start..]
            let shift = pos - self.gap_start;
            self.data.copy_within(self.gap_end..self.gap_end + shift, self.gap_start);
            self.gap_start += shift;
            self.gap_end += shift;
        }
    }

    /// Ensures the gap is at least the specified size.
    ///
    /// Grows the gap in place so that the gap position is preserved; callers
    /// rely on the gap staying where `move_gap_to` left it.
    fn ensure_gap(&mut self, min_size: usize) {
        if self.gap_len() >= min_size {
            return;
        }

        let needed = min_size - self.gap_len();
        let growth = needed.max(self.data.len() * GAP_GROWTH_FACTOR);

        let old_gap_end = self.gap_end;
        let old_len = self.data.len();
        let post_gap_len = old_len - old_gap_end;

        let new_size = old_len + growth;
        self.data.resize(new_size, T::default());

        if post_gap_len > 0 {
            let new_post_gap_start = new_size - post_gap_len;
            self.data.copy_within(old_gap_end..old_len, new_post_gap_start);
        }

        self.gap_end = new_size - post_gap_len;
    }

    /// Inserts `items` so that the first of them lands at logical index `at`.
    ///
    /// `at` is clamped to the buffer length.
    pub fn insert_slice(&mut self, at: usize, items: &[T]) {
        if items.is_empty() {
            return;
        }
        self.move_gap_to(at);
        self.ensure_gap(items.len());
        let end = self.gap_start + items.len();
        self.data[self.gap_start..end].copy_from_slice(items);
        self.gap_start = end;
    }

    /// Removes the elements in `range` (logical coordinates, clamped).
    pub fn remove_range(&mut self, range: Range<usize>) {
        let start = range.start.min(self.len());
        let end = range.end.clamp(start, self.len());
        if start == end {
            return;
        }
        self.move_gap_to(start);
        // Swallow the removed elements into the gap.
        self.gap_end += end - start;
    }

    /// Replaces the elements in `range` with `items`.
    pub fn replace_range(&mut self, range: Range<usize>, items: &[T]) {
        let start = range.start.min(self.len());
        self.remove_range(start..range.end);
        self.insert_slice(start, items);
    }

    /// Replaces the whole content, leaving the gap at the end.
    pub fn reset(&mut self, items: &[T]) {
        *self = Self::from_slice(items);
    }

    /// Returns the element at the given logical position.
    pub fn get(&self, pos: usize) -> Option<T> {
        if pos >= self.len() {
            return None;
        }
        Some(self.data[self.physical(pos)])
    }

    /// Returns a mutable reference to the element at the given logical position.
    pub fn get_mut(&mut self, pos: usize) -> Option<&mut T> {
        if pos >= self.len() {
            return None;
        }
        let physical = self.physical(pos);
        Some(&mut self.data[physical])
    }

    /// Returns the (pre-gap, post-gap) physical slices covering a logical range.
    fn split_range(&self, range: Range<usize>) -> (Range<usize>, Range<usize>) {
        let start = range.start.min(self.len());
        let end = range.end.clamp(start, self.len());
        let before = start.min(self.gap_start)..end.min(self.gap_start);
        let after = (start.max(self.gap_start) + self.gap_len())
            ..(end.max(self.gap_start) + self.gap_len());
        (before, after)
    }

    /// Applies `f` to every element in `range` without moving the gap.
    pub fn for_each_mut<F>(&mut self, range: Range<usize>, mut f: F)
    where
        F: FnMut(&mut T),
    {
        let (before, after) = self.split_range(range);
        self.data[before].iter_mut().for_each(&mut f);
        self.data[after].iter_mut().for_each(f);
    }

    /// Appends the elements in `range` to `out`.
    pub fn copy_range_into(&self, range: Range<usize>, out: &mut Vec<T>) {
        let (before, after) = self.split_range(range);
        out.extend_from_slice(&self.data[before]);
        out.extend_from_slice(&self.data[after]);
    }

    /// Returns an iterator over all elements in the buffer.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.data[..self.gap_start]
            .iter()
            .chain(self.data[self.gap_end..].iter())
            .copied()
    }

    /// Collects the logical content into a `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len());
        self.copy_range_into(0..self.len(), &mut out);
        out
    }
}

impl<T: Copy + Default> Default for GapBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}
