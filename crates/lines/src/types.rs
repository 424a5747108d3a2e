// Chunk: docs/chunks/line_index - Gap-buffered per-line records
// Chunk: docs/chunks/edit_notifications - Dirty line reporting for applied edits

/// Whether a line's bytes include anything outside 7-bit ASCII.
///
/// Computed lazily: edits reset touched lines to `Unknown` and the next query
/// that needs the answer scans the line and caches the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MultiByteState {
    #[default]
    Unknown,
    ContainsMultiByte,
    SingleByteOnly,
}

impl MultiByteState {
    /// Classifies a line's bytes.
    pub fn scan(bytes: &[u8]) -> Self {
        if bytes.is_ascii() {
            MultiByteState::SingleByteOnly
        } else {
            MultiByteState::ContainsMultiByte
        }
    }

    /// Returns the known answer, or `None` if the line must be rescanned.
    pub fn known(self) -> Option<bool> {
        match self {
            MultiByteState::Unknown => None,
            MultiByteState::ContainsMultiByte => Some(true),
            MultiByteState::SingleByteOnly => Some(false),
        }
    }
}

/// One entry of the line index: where a line starts plus its cached metadata.
///
/// The last record of an index is the sentinel; its `start` is the document
/// length and its `multi_byte` is unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineRecord {
    /// Byte offset of the first byte of the line.
    pub start: usize,
    pub multi_byte: MultiByteState,
}

impl LineRecord {
    pub fn new(start: usize) -> Self {
        Self {
            start,
            multi_byte: MultiByteState::Unknown,
        }
    }
}

/// A read-only snapshot of one line, as handed to margin painting and
/// per-line collection indexers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineView {
    pub index: usize,
    /// Byte offset where the line starts.
    pub start: usize,
    /// Length in bytes, line break included.
    pub length: usize,
    pub expanded: bool,
    pub multi_byte: MultiByteState,
}

/// Margin and fold rows a host must repaint after an edit notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirtyLines {
    /// The notification deleted and inserted nothing. No record was touched,
    /// cached multi-byte state included.
    None,
    /// One line's content changed and no break moved.
    Single(usize),
    /// Lines `[from, to)` were rescanned and the line count is unchanged.
    Range { from: usize, to: usize },
    /// The line count changed, so every line number from here on refers to
    /// a different line than before.
    FromLineToEnd(usize),
}

impl DirtyLines {
    /// Returns true if no lines were dirtied.
    pub fn is_none(&self) -> bool {
        matches!(self, DirtyLines::None)
    }

    /// Returns the starting line of the dirty region, if any.
    pub fn start_line(&self) -> Option<usize> {
        match self {
            DirtyLines::None => None,
            DirtyLines::Single(line) => Some(*line),
            DirtyLines::Range { from, .. } => Some(*from),
            DirtyLines::FromLineToEnd(line) => Some(*line),
        }
    }

    /// Merges another dirty region into this one, producing the smallest
    /// region that covers both.
    ///
    /// Hosts that batch several notifications before repainting merge the
    /// per-edit results and repaint once.
    pub fn merge(&mut self, other: DirtyLines) {
        *self = match (&*self, &other) {
            (DirtyLines::None, _) => other,
            (_, DirtyLines::None) => return,

            // FromLineToEnd absorbs everything; take the earlier start
            (DirtyLines::FromLineToEnd(a), DirtyLines::FromLineToEnd(b)) => {
                DirtyLines::FromLineToEnd((*a).min(*b))
            }
            (DirtyLines::FromLineToEnd(a), other) | (other, DirtyLines::FromLineToEnd(a)) => {
                let b = other.start_line().unwrap_or(*a);
                DirtyLines::FromLineToEnd((*a).min(b))
            }

            (DirtyLines::Single(a), DirtyLines::Single(b)) => {
                if a == b {
                    DirtyLines::Single(*a)
                } else {
                    DirtyLines::Range {
                        from: (*a).min(*b),
                        to: (*a).max(*b) + 1,
                    }
                }
            }

            (DirtyLines::Single(a), DirtyLines::Range { from, to })
            | (DirtyLines::Range { from, to }, DirtyLines::Single(a)) => DirtyLines::Range {
                from: (*from).min(*a),
                to: (*to).max(*a + 1),
            },

            (DirtyLines::Range { from: a, to: b }, DirtyLines::Range { from: c, to: d }) => {
                DirtyLines::Range {
                    from: (*a).min(*c),
                    to: (*b).max(*d),
                }
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== MultiByteState ====================

    #[test]
    fn scan_ascii_line() {
        assert_eq!(
            MultiByteState::scan(b"hello\r\n"),
            MultiByteState::SingleByteOnly
        );
        assert_eq!(MultiByteState::scan(b""), MultiByteState::SingleByteOnly);
    }

    #[test]
    fn scan_utf8_line() {
        assert_eq!(
            MultiByteState::scan("caf\u{e9}\n".as_bytes()),
            MultiByteState::ContainsMultiByte
        );
    }

    #[test]
    fn unknown_has_no_answer() {
        assert_eq!(MultiByteState::Unknown.known(), None);
        assert_eq!(MultiByteState::ContainsMultiByte.known(), Some(true));
        assert_eq!(MultiByteState::SingleByteOnly.known(), Some(false));
    }

    // ==================== Merge: identity ====================

    #[test]
    fn merge_none_with_single() {
        let mut d = DirtyLines::None;
        d.merge(DirtyLines::Single(5));
        assert_eq!(d, DirtyLines::Single(5));
    }

    #[test]
    fn merge_single_with_none() {
        let mut d = DirtyLines::Single(5);
        d.merge(DirtyLines::None);
        assert_eq!(d, DirtyLines::Single(5));
    }

    // ==================== Merge: singles and ranges ====================

    #[test]
    fn merge_distant_singles() {
        let mut d = DirtyLines::Single(10);
        d.merge(DirtyLines::Single(3));
        assert_eq!(d, DirtyLines::Range { from: 3, to: 11 });
    }

    #[test]
    fn merge_single_extends_range_above() {
        let mut d = DirtyLines::Range { from: 5, to: 10 };
        d.merge(DirtyLines::Single(15));
        assert_eq!(d, DirtyLines::Range { from: 5, to: 16 });
    }

    #[test]
    fn merge_disjoint_ranges() {
        let mut d = DirtyLines::Range { from: 3, to: 5 };
        d.merge(DirtyLines::Range { from: 8, to: 12 });
        assert_eq!(d, DirtyLines::Range { from: 3, to: 12 });
    }

    // ==================== Merge: FromLineToEnd ====================

    #[test]
    fn merge_from_line_to_end_takes_earlier() {
        let mut d = DirtyLines::FromLineToEnd(5);
        d.merge(DirtyLines::FromLineToEnd(3));
        assert_eq!(d, DirtyLines::FromLineToEnd(3));
    }

    #[test]
    fn merge_from_line_to_end_absorbs_range() {
        let mut d = DirtyLines::Range { from: 3, to: 7 };
        d.merge(DirtyLines::FromLineToEnd(5));
        assert_eq!(d, DirtyLines::FromLineToEnd(3));
    }

    #[test]
    fn merge_typing_then_newline() {
        // Typing on line 3, then Enter splits it
        let mut d = DirtyLines::None;
        d.merge(DirtyLines::Single(3));
        d.merge(DirtyLines::Single(3));
        d.merge(DirtyLines::FromLineToEnd(3));
        assert_eq!(d, DirtyLines::FromLineToEnd(3));
    }
}
