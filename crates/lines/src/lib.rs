// Chunk: docs/chunks/line_index - Gap-buffered per-line records
// Chunk: docs/chunks/edit_notifications - Incremental line index maintenance
// Chunk: docs/chunks/line_query - Read facade over the line index

//! perline-lines: incremental per-line metadata for an embedded editing engine.
//!
//! A native editing component owns the text and reports every modification as
//! a replace-range notification. This crate keeps a line index in step with
//! those notifications so line ↔ offset conversions never need a round trip to
//! the engine or a rescan of the document.
//!
//! # Overview
//!
//! - [`LineIndex`] holds one record per line (start offset + cached
//!   multi-byte flag) plus a sentinel at the document end.
//! - [`EditNotificationProcessor`] turns an [`EditNotification`] into an
//!   [`EditPlan`] and applies it.
//! - [`LineQuery`] / [`LineQueryMut`] are the read facade, including fold
//!   state persistence.
//! - [`Document`] ties them together for one editing session, mirroring the
//!   engine's bytes so the processor can see the text around each edit.
//!
//! Offsets are byte offsets.
//!
//! # Example
//!
//! ```
//! use perline_lines::{DirtyLines, Document, DocumentConfig};
//!
//! let mut doc = Document::new(DocumentConfig::default());
//! assert_eq!(doc.lines().count(), 1);
//!
//! let dirty = doc.insert(0, "a\nb\nc").unwrap();
//! assert_eq!(dirty, DirtyLines::FromLineToEnd(0));
//! assert_eq!(doc.lines().count(), 3);
//! assert_eq!(doc.lines().position_from_line(2), 4);
//!
//! // Join lines 1 and 2
//! doc.delete(3, 1).unwrap();
//! assert_eq!(doc.lines().count(), 2);
//! assert_eq!(doc.line_content(1), "bc");
//! ```
//!
//! # Fold State
//!
//! ```
//! use perline_lines::Document;
//!
//! let mut doc = Document::default();
//! doc.insert(0, "1\n2\n3\n4\n5").unwrap();
//!
//! let mut lines = doc.lines_mut();
//! lines.set_folding_state("3;1", ";");
//! assert_eq!(lines.folding_state(";"), "1;3");
//! ```

mod columns;
mod config;
mod document;
mod error;
mod fold_state;
mod gap_buffer;
mod line_breaks;
mod line_index;
mod line_query;
mod notification;
mod text_source;
mod types;

pub use config::{config_file_path, DocumentConfig};
pub use document::{Document, SharedDocument};
pub use error::{ConfigError, PreconditionViolation};
pub use fold_state::{FoldRestore, FoldState};
pub use gap_buffer::GapBuffer;
pub use line_breaks::LineEnding;
pub use line_index::{clamp, LineIndex};
pub use line_query::{LineQuery, LineQueryMut};
pub use notification::{EditNotification, EditNotificationProcessor, EditPlan};
pub use text_source::TextSource;
pub use types::{DirtyLines, LineRecord, LineView, MultiByteState};
