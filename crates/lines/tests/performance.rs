// Chunk: docs/chunks/line_index - Gap-buffered per-line records

//! Performance sanity checks for the line index.
//!
//! These tests verify that localized edit streams stay cheap on large
//! documents. They are not formal benchmarks but guard against obvious
//! regressions such as shifting every line start on every keystroke.

use std::time::{Duration, Instant};

use perline_lines::{
    Document, DocumentConfig, EditNotification, EditNotificationProcessor, LineIndex,
};

fn config() -> DocumentConfig {
    DocumentConfig {
        consistency_check_interval: 0,
        ..DocumentConfig::default()
    }
}

fn large_text(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("fn line_{i}() {{}}\n"))
        .collect()
}

#[test]
fn typing_near_top_of_100k_lines_under_200ms() {
    let mut doc = Document::from_text(config(), large_text(100_000).as_bytes());
    let start = Instant::now();

    for i in 0..5_000 {
        doc.insert(10 + i, "x").unwrap();
    }

    let elapsed = start.elapsed();
    assert!(
        elapsed < Duration::from_millis(200),
        "5K keystrokes on a 100K-line document took {:?}, expected < 200ms",
        elapsed
    );
    assert_eq!(doc.lines().count(), 100_001);
}

#[test]
fn inserting_newlines_near_cursor_under_300ms() {
    let mut doc = Document::from_text(config(), large_text(100_000).as_bytes());
    let start = Instant::now();

    let mut cursor = 500;
    for _ in 0..2_000 {
        doc.insert(cursor, "\n").unwrap();
        cursor += 1;
    }

    let elapsed = start.elapsed();
    assert!(
        elapsed < Duration::from_millis(300),
        "2K line splits took {:?}, expected < 300ms",
        elapsed
    );
    assert_eq!(doc.lines().count(), 102_001);
}

#[test]
fn line_from_position_lookups_under_100ms() {
    let text = large_text(100_000);
    let index = LineIndex::from_text(text.as_bytes(), Default::default());
    let start = Instant::now();

    let mut total = 0;
    for offset in (0..text.len()).step_by(97) {
        total += index.line_from_position(offset);
    }

    let elapsed = start.elapsed();
    assert!(total > 0);
    assert!(
        elapsed < Duration::from_millis(100),
        "lookups took {:?}, expected < 100ms",
        elapsed
    );
}

#[test]
fn index_only_processing_against_external_text() {
    let text = large_text(50_000);
    let processor = EditNotificationProcessor::default();
    let mut index = LineIndex::from_text(text.as_bytes(), Default::default());
    let start = Instant::now();

    // Repeatedly replace a word in line 10 with one of the same length.
    for _ in 0..10_000 {
        let at = index.position_from_line(10) + 3;
        let edit = EditNotification::replace(at, 4, b"LINE");
        processor
            .process(&mut index, text.as_str(), &edit)
            .unwrap();
    }

    let elapsed = start.elapsed();
    assert!(
        elapsed < Duration::from_millis(200),
        "10K same-length replaces took {:?}, expected < 200ms",
        elapsed
    );
    assert_eq!(index.line_count(), 50_001);
}
