// Chunk: docs/chunks/edit_notifications - Line break recognition

//! Line break recognition shared by full rebuilds and incremental updates.
//!
//! Offsets reported here are *break ends*: the offset just past the break,
//! which is the start offset of the following line.

use serde::{Deserialize, Serialize};

/// Which byte sequences end a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// CR, LF, and CRLF all end a line; CRLF counts as one break.
    #[default]
    Any,
    Lf,
    Cr,
    CrLf,
}

impl LineEnding {
    /// Appends `base + end` for every line break ending inside `bytes`.
    ///
    /// In `Any` mode a trailing `\r` counts as a complete break; callers that
    /// scan a sub-range must make sure the range does not split a CRLF.
    pub fn scan_break_ends(self, bytes: &[u8], base: usize, out: &mut Vec<usize>) {
        match self {
            LineEnding::Lf => push_matches(bytes, b'\n', base, out),
            LineEnding::Cr => push_matches(bytes, b'\r', base, out),
            LineEnding::CrLf => {
                for (i, pair) in bytes.windows(2).enumerate() {
                    if pair == b"\r\n" {
                        out.push(base + i + 2);
                    }
                }
            }
            LineEnding::Any => {
                let mut i = 0;
                while i < bytes.len() {
                    match bytes[i] {
                        b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                            out.push(base + i + 2);
                            i += 2;
                            continue;
                        }
                        b'\r' | b'\n' => out.push(base + i + 1),
                        _ => {}
                    }
                    i += 1;
                }
            }
        }
    }

    /// Returns the number of bytes of line break at the end of `line`.
    pub fn trailing_break_len(self, line: &[u8]) -> usize {
        let ends_crlf = line.ends_with(b"\r\n");
        match self {
            LineEnding::Any if ends_crlf => 2,
            LineEnding::Any if line.ends_with(b"\r") || line.ends_with(b"\n") => 1,
            LineEnding::Lf if line.ends_with(b"\n") => 1,
            LineEnding::Cr if line.ends_with(b"\r") => 1,
            LineEnding::CrLf if ends_crlf => 2,
            _ => 0,
        }
    }

    /// True when a `\r` ending one line can fuse with a `\n` inserted at the
    /// start of the next, turning two breaks into one.
    pub(crate) fn joins_across_line_start(self) -> bool {
        self == LineEnding::Any
    }

    /// Bytes at the end of a line whose modification can dissolve its break.
    ///
    /// For CRLF-only input, touching the `\r` of the final `\r\n` removes the
    /// break even though the `\n` survives.
    pub(crate) fn fragile_tail(self) -> usize {
        match self {
            LineEnding::CrLf => 1,
            _ => 0,
        }
    }
}

fn push_matches(bytes: &[u8], needle: u8, base: usize, out: &mut Vec<usize>) {
    out.extend(
        bytes
            .iter()
            .enumerate()
            .filter(|(_, b)| **b == needle)
            .map(|(i, _)| base + i + 1),
    );
}
