// Chunk: docs/chunks/edit_notifications - Incremental line index maintenance

//! Translates buffer-modification notifications into line index updates.
//!
//! Processing is split in two so that a bad notification can never leave the
//! index half-updated:
//!
//! 1. [`EditNotificationProcessor::plan`] validates the notification against
//!    the current index and the pre-edit text, rescans only the lines the edit
//!    touches, and records the structural change in an [`EditPlan`]. Nothing
//!    is mutated.
//! 2. [`EditPlan::apply_to_index`] / [`EditPlan::apply_to_folds`] carry out
//!    the plan. They cannot fail.

use std::ops::Range;

use crate::error::PreconditionViolation;
use crate::fold_state::FoldState;
use crate::line_breaks::LineEnding;
use crate::line_index::LineIndex;
use crate::text_source::TextSource;
use crate::types::DirtyLines;

/// A single contiguous replace-range edit reported by the text engine.
///
/// A pure insert has `deleted_length == 0`; a pure delete has no inserted bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditNotification<'a> {
    pub position: usize,
    pub deleted_length: usize,
    pub inserted: &'a [u8],
}

impl<'a> EditNotification<'a> {
    pub fn insert(position: usize, inserted: &'a [u8]) -> Self {
        Self {
            position,
            deleted_length: 0,
            inserted,
        }
    }

    pub fn delete(position: usize, deleted_length: usize) -> Self {
        Self {
            position,
            deleted_length,
            inserted: &[],
        }
    }

    pub fn replace(position: usize, deleted_length: usize, inserted: &'a [u8]) -> Self {
        Self {
            position,
            deleted_length,
            inserted,
        }
    }

    /// Builds a notification from the signed values a native engine reports.
    ///
    /// # Errors
    ///
    /// Negative values and an `inserted_length` that disagrees with the
    /// carried text are rejected.
    pub fn from_raw(
        position: i64,
        deleted_length: i64,
        inserted_length: i64,
        inserted: &'a [u8],
    ) -> Result<Self, PreconditionViolation> {
        let position = non_negative("position", position)?;
        let deleted_length = non_negative("deleted length", deleted_length)?;
        let declared = non_negative("inserted length", inserted_length)?;
        if declared != inserted.len() {
            return Err(PreconditionViolation::InsertedLengthMismatch {
                declared,
                actual: inserted.len(),
            });
        }
        Ok(Self::replace(position, deleted_length, inserted))
    }

    /// Net change in document length.
    pub fn delta(&self) -> isize {
        self.inserted.len() as isize - self.deleted_length as isize
    }

    /// True if the notification neither deletes nor inserts anything.
    pub fn is_empty(&self) -> bool {
        self.deleted_length == 0 && self.inserted.is_empty()
    }

    fn deleted_end(&self) -> Option<usize> {
        self.position.checked_add(self.deleted_length)
    }
}

fn non_negative(field: &'static str, value: i64) -> Result<usize, PreconditionViolation> {
    usize::try_from(value)
        .map_err(|_| PreconditionViolation::NegativeValue { field, value })
}

/// The structural change one notification makes to the line index.
///
/// Lines `first_line + 1 ..= first_line + old_interior` are replaced by
/// `new_starts`; every record after them moves by `delta`. An empty
/// notification yields a plan that touches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPlan {
    first_line: usize,
    old_interior: usize,
    new_starts: Vec<usize>,
    delta: isize,
    empty: bool,
}

impl EditPlan {
    /// First line whose content the edit changed.
    pub fn first_line(&self) -> usize {
        self.first_line
    }

    /// Lines added (positive) or removed (negative) by the edit.
    pub fn line_delta(&self) -> isize {
        self.new_starts.len() as isize - self.old_interior as isize
    }

    /// Lines whose content changed, in post-edit numbering.
    pub fn touched_lines(&self) -> Range<usize> {
        if self.empty {
            return self.first_line..self.first_line;
        }
        self.first_line..self.first_line + self.new_starts.len() + 1
    }

    /// Which lines a host should repaint.
    pub fn dirty_lines(&self) -> DirtyLines {
        if self.empty {
            DirtyLines::None
        } else if self.line_delta() != 0 {
            DirtyLines::FromLineToEnd(self.first_line)
        } else if self.new_starts.is_empty() {
            DirtyLines::Single(self.first_line)
        } else {
            let touched = self.touched_lines();
            DirtyLines::Range {
                from: touched.start,
                to: touched.end,
            }
        }
    }

    /// Applies the plan to the index it was computed against.
    pub fn apply_to_index(&self, index: &mut LineIndex) {
        if self.empty {
            return;
        }
        let interior = self.first_line + 1;
        let tail = interior + self.old_interior;
        let common = self.old_interior.min(self.new_starts.len());

        index.shift_offsets(tail, self.delta);
        for (i, start) in self.new_starts[..common].iter().enumerate() {
            index.set_start(interior + i, *start);
        }
        if self.new_starts.len() > common {
            index.insert_lines(tail, &self.new_starts[common..]);
        } else if self.old_interior > common {
            index.remove_lines(interior + common, self.old_interior - common);
        }
        index.invalidate_multi_byte(self.touched_lines());
    }

    /// Keeps per-line fold flags aligned with the index.
    ///
    /// New lines start expanded; removed lines drop their flag.
    pub fn apply_to_folds(&self, folds: &mut FoldState) {
        let interior = self.first_line + 1;
        let common = self.old_interior.min(self.new_starts.len());
        if self.new_starts.len() > common {
            folds.insert_lines(interior + self.old_interior, self.new_starts.len() - common);
        } else if self.old_interior > common {
            folds.remove_lines(interior + common, self.old_interior - common);
        }
    }
}

/// Turns edit notifications into [`EditPlan`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditNotificationProcessor {
    line_ending: LineEnding,
}

impl EditNotificationProcessor {
    pub fn new(line_ending: LineEnding) -> Self {
        Self { line_ending }
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Computes the index update for `notification`.
    ///
    /// `before` must be the document text as it was before the edit.
    ///
    /// # Errors
    ///
    /// Returns a [`PreconditionViolation`] if the edit does not fit the
    /// document or the text source does not match the index.
    pub fn plan<S>(
        &self,
        index: &LineIndex,
        before: &S,
        notification: &EditNotification<'_>,
    ) -> Result<EditPlan, PreconditionViolation>
    where
        S: TextSource + ?Sized,
    {
        let document_length = index.document_length();
        if before.len() != document_length {
            return Err(PreconditionViolation::SourceLengthMismatch {
                source_length: before.len(),
                indexed_length: document_length,
            });
        }
        if notification.position > document_length {
            return Err(PreconditionViolation::PositionOutOfBounds {
                position: notification.position,
                document_length,
            });
        }
        let deleted_end = notification
            .deleted_end()
            .filter(|end| *end <= document_length)
            .ok_or(PreconditionViolation::DeletionOutOfBounds {
                position: notification.position,
                deleted_length: notification.deleted_length,
                document_length,
            })?;

        if notification.is_empty() {
            return Ok(EditPlan {
                first_line: index.line_from_position(notification.position),
                old_interior: 0,
                new_starts: Vec::new(),
                delta: 0,
                empty: true,
            });
        }

        let line_count = index.line_count();
        let mut first_line = index.line_from_position(notification.position);
        let mut region_start = index.position_from_line(first_line);
        if self.line_ending.joins_across_line_start()
            && first_line > 0
            && notification.position == region_start
            && before.byte_at(region_start - 1) == Some(b'\r')
        {
            first_line -= 1;
            region_start = index.position_from_line(first_line);
        }

        let mut last_line = index.line_from_position(deleted_end);
        let fragile = self.line_ending.fragile_tail();
        if fragile > 0 && last_line + 1 < line_count {
            let line_end = index.position_from_line(last_line + 1);
            if deleted_end + fragile >= line_end {
                last_line += 1;
            }
        }
        let region_end = index.start(last_line + 1).unwrap_or(document_length);
        let ends_at_sentinel = last_line + 1 == line_count;

        // The affected lines as they read after the edit.
        let mut region =
            Vec::with_capacity(region_end - region_start + notification.inserted.len());
        before.copy_range(region_start..notification.position, &mut region);
        region.extend_from_slice(notification.inserted);
        before.copy_range(deleted_end..region_end, &mut region);

        let mut new_starts = Vec::new();
        self.line_ending.scan_break_ends(&region, region_start, &mut new_starts);
        if !ends_at_sentinel {
            // The break that ends the region starts the first untouched line,
            // which keeps its record.
            let new_region_end = region_start + region.len();
            debug_assert_eq!(new_starts.last(), Some(&new_region_end));
            if new_starts.last() == Some(&new_region_end) {
                new_starts.pop();
            }
        }

        Ok(EditPlan {
            first_line,
            old_interior: last_line - first_line,
            new_starts,
            delta: notification.delta(),
            empty: false,
        })
    }

    /// Plans and applies `notification` to `index`.
    ///
    /// # Errors
    ///
    /// See [`plan`](Self::plan); the index is untouched on error.
    pub fn process<S>(
        &self,
        index: &mut LineIndex,
        before: &S,
        notification: &EditNotification<'_>,
    ) -> Result<EditPlan, PreconditionViolation>
    where
        S: TextSource + ?Sized,
    {
        let plan = self.plan(index, before, notification)?;
        plan.apply_to_index(index);
        tracing::debug!(
            first_line = plan.first_line,
            line_delta = plan.line_delta(),
            delta = plan.delta,
            "applied edit to line index"
        );
        Ok(plan)
    }
}
