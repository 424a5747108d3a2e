// Chunk: docs/chunks/edit_notifications - Pre-edit text access

//! Read access to document bytes as they were *before* an edit.
//!
//! The notification processor needs the bytes around an edit to find which
//! line breaks it removed. A [`Document`](crate::Document) answers from its
//! own mirrored copy; a host that keeps the text only inside the native
//! engine implements this trait over the engine's character access calls.

use std::ops::Range;

use crate::gap_buffer::GapBuffer;

/// Byte-level view of a document.
pub trait TextSource {
    /// Total length in bytes.
    fn len(&self) -> usize;

    /// Returns the byte at `pos`, or `None` past the end.
    fn byte_at(&self, pos: usize) -> Option<u8>;

    /// Appends the bytes in `range` (clamped to the document) to `out`.
    fn copy_range(&self, range: Range<usize>, out: &mut Vec<u8>);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TextSource for GapBuffer<u8> {
    fn len(&self) -> usize {
        GapBuffer::len(self)
    }

    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.get(pos)
    }

    fn copy_range(&self, range: Range<usize>, out: &mut Vec<u8>) {
        self.copy_range_into(range, out);
    }
}

impl TextSource for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.get(pos).copied()
    }

    fn copy_range(&self, range: Range<usize>, out: &mut Vec<u8>) {
        let start = range.start.min(self.len());
        let end = range.end.clamp(start, self.len());
        out.extend_from_slice(&self[start..end]);
    }
}

impl TextSource for str {
    fn len(&self) -> usize {
        str::len(self)
    }

    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.as_bytes().byte_at(pos)
    }

    fn copy_range(&self, range: Range<usize>, out: &mut Vec<u8>) {
        self.as_bytes().copy_range(range, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_source() {
        let text: &[u8] = b"hello";
        assert_eq!(TextSource::len(text), 5);
        assert_eq!(text.byte_at(1), Some(b'e'));
        assert_eq!(text.byte_at(5), None);

        let mut out = Vec::new();
        text.copy_range(3..99, &mut out);
        assert_eq!(out, b"lo");
    }

    #[test]
    fn test_gap_buffer_source_matches_str() {
        let mut buf = GapBuffer::from_slice(b"one\ntwo");
        buf.move_gap_to(2);
        let s = "one\ntwo";

        let (mut a, mut b) = (Vec::new(), Vec::new());
        TextSource::copy_range(&buf, 1..6, &mut a);
        s.copy_range(1..6, &mut b);
        assert_eq!(a, b);
        assert_eq!(TextSource::byte_at(&buf, 3), s.byte_at(3));
        assert!(!TextSource::is_empty(&buf));
    }
}
