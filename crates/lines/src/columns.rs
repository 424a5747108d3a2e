// Chunk: docs/chunks/grapheme_columns - Grapheme-aware column conversion

//! Byte offset ↔ column conversion within a single line.
//!
//! A column counts grapheme clusters, which is what users perceive as a
//! single "character":
//!
//! - ZWJ emoji sequences: 👨‍👩‍👧‍👦 (7 scalar values, 25 bytes, 1 column)
//! - Combining character sequences: é as e + U+0301 (3 bytes, 1 column)
//! - Regional indicator pairs: 🇺🇸
//!
//! Every function takes the line's content *without* its line break plus
//! whether the line is known to be pure ASCII. ASCII lines take a fast path
//! where a column is a byte. Lines that are not valid UTF-8 fall back to one
//! column per byte.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Iterates `(start, end)` byte spans of each grapheme in `line`.
fn grapheme_spans(line: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    line.grapheme_indices(true)
        .map(|(start, grapheme)| (start, start + grapheme.len()))
}

/// Returns the number of whole graphemes that end at or before `byte`.
///
/// A byte offset in the middle of a grapheme rounds down to that grapheme's
/// column.
pub fn column_of(line: &[u8], byte: usize, ascii_only: bool) -> usize {
    let byte = byte.min(line.len());
    if ascii_only {
        return byte;
    }
    match std::str::from_utf8(line) {
        Ok(text) => grapheme_spans(text)
            .take_while(|(_, end)| *end <= byte)
            .count(),
        Err(_) => byte,
    }
}

/// Returns the byte offset where grapheme `column` starts.
///
/// Columns past the end of the line return the line length.
pub fn byte_of_column(line: &[u8], column: usize, ascii_only: bool) -> usize {
    if ascii_only {
        return column.min(line.len());
    }
    match std::str::from_utf8(line) {
        Ok(text) => grapheme_spans(text)
            .nth(column)
            .map_or(line.len(), |(start, _)| start),
        Err(_) => column.min(line.len()),
    }
}

/// Returns the display width, in terminal cells, of the graphemes that end
/// at or before `byte`. Wide East Asian characters take two cells.
///
/// Tabs and other control characters count as zero cells, as they do in
/// `unicode-width`. Hosts that render tab stops must expand them themselves.
pub fn display_column_of(line: &[u8], byte: usize, ascii_only: bool) -> usize {
    let byte = byte.min(line.len());
    if ascii_only {
        return line[..byte]
            .iter()
            .filter(|b| !b.is_ascii_control())
            .count();
    }
    match std::str::from_utf8(line) {
        Ok(text) => text
            .grapheme_indices(true)
            .take_while(|(start, grapheme)| start + grapheme.len() <= byte)
            .map(|(_, grapheme)| grapheme.width())
            .sum(),
        Err(_) => byte,
    }
}
