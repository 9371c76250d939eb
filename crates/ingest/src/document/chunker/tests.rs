//! Tests for the chunking engine.

use super::helpers::find_break;
use super::strategies::{chunk_document, chunk_text};
use super::types::ChunkConfig;
use crate::document::{ExtractedDocument, FileKind, PageContent};

fn config(max: usize, overlap: usize) -> ChunkConfig {
    ChunkConfig::new(max, overlap)
}

/// Undo the overlap: first chunk whole, then each later chunk minus its prefix.
fn reassemble(chunks: &[String], overlap: usize) -> String {
    let mut out = String::new();
    for (i, c) in chunks.iter().enumerate() {
        if i == 0 {
            out.push_str(c);
        } else {
            out.extend(c.chars().skip(overlap));
        }
    }
    out
}

fn prose(sentences: usize) -> String {
    (0..sentences)
        .map(|i| format!("Sentence number {i} describes the fuel system in detail."))
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Basics ──────────────────────────────────────────────────────────

#[test]
fn short_text_is_single_chunk() {
    let chunks = chunk_text("  Maximum gross weight is 3400 lbs.  ", &ChunkConfig::default());
    assert_eq!(chunks, vec!["Maximum gross weight is 3400 lbs.".to_string()]);
}

#[test]
fn exactly_max_is_single_chunk() {
    let text = "a".repeat(1000);
    assert_eq!(chunk_text(&text, &ChunkConfig::default()).len(), 1);
}

#[test]
fn empty_text_yields_nothing() {
    assert!(chunk_text("", &ChunkConfig::default()).is_empty());
    assert!(chunk_text(" \n\t ", &ChunkConfig::default()).is_empty());
}

#[test]
fn deterministic() {
    let text = prose(80);
    let cfg = ChunkConfig::default();
    assert_eq!(chunk_text(&text, &cfg), chunk_text(&text, &cfg));
}

// ── Size and overlap ───────────────────────────────────────────────

#[test]
fn no_chunk_exceeds_max() {
    let text = prose(120);
    let chunks = chunk_text(&text, &config(300, 60));
    assert!(chunks.len() > 1);
    for c in &chunks {
        assert!(c.chars().count() <= 300, "chunk too long: {}", c.chars().count());
        assert!(!c.trim().is_empty());
    }
}

#[test]
fn consecutive_chunks_share_exact_overlap() {
    let text = prose(60);
    let chunks = chunk_text(&text, &config(250, 50));
    for pair in chunks.windows(2) {
        let prev: Vec<char> = pair[0].chars().collect();
        let tail: String = prev[prev.len() - 50..].iter().collect();
        let head: String = pair[1].chars().take(50).collect();
        assert_eq!(tail, head);
    }
}

#[test]
fn reassembly_reproduces_trimmed_text() {
    let text = format!("\n\n{}\n\nSecond part.\n{}  ", prose(40), prose(25));
    let chunks = chunk_text(&text, &config(400, 100));
    assert_eq!(reassemble(&chunks, 100), text.trim());
}

#[test]
fn reassembly_without_boundaries() {
    let text: String = (0..3000).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
    let chunks = chunk_text(&text, &ChunkConfig::default());
    assert_eq!(chunks[0].chars().count(), 1000);
    assert_eq!(reassemble(&chunks, 200), text);
}

#[test]
fn whitespace_runs_keep_overlap_and_text() {
    let text = format!("alpha{}omega", " ".repeat(3000));
    let chunks = chunk_text(&text, &ChunkConfig::default());
    assert!(chunks.len() > 2);
    assert!(chunks.iter().all(|c| !c.is_empty()));
    for pair in chunks.windows(2) {
        let tail: String = pair[0].chars().rev().take(200).collect::<Vec<_>>().into_iter().rev().collect();
        let head: String = pair[1].chars().take(200).collect();
        assert_eq!(tail, head);
    }
    assert_eq!(reassemble(&chunks, 200), text);
}

#[test]
fn multibyte_text_is_split_on_chars() {
    let text = "é".repeat(2500);
    let chunks = chunk_text(&text, &ChunkConfig::default());
    assert!(chunks.iter().all(|c| c.chars().count() <= 1000));
    assert_eq!(reassemble(&chunks, 200), text);
}

#[test]
fn overlap_larger_than_max_still_advances() {
    let text = prose(20);
    let chunks = chunk_text(&text, &config(50, 500));
    assert!(chunks.len() > 1);
    assert_eq!(reassemble(&chunks, 49), text);
}

// ── Boundary preference ────────────────────────────────────────────

#[test]
fn prefers_paragraph_break() {
    let first = "Engine start procedure. Mixture rich. Throttle open.";
    let text = format!("{first}\n\n{}", prose(10));
    let chunks = chunk_text(&text, &config(120, 10));
    assert_eq!(chunks[0], format!("{first}\n\n"));
}

#[test]
fn prefers_sentence_end_over_whitespace() {
    let text = "Alpha beta gamma. Delta epsilon zeta eta theta iota kappa lambda";
    let chunks = chunk_text(text, &config(40, 5));
    assert_eq!(chunks[0], "Alpha beta gamma.");
}

#[test]
fn falls_back_to_whitespace() {
    let text = "one two three four five six seven eight nine ten";
    let chunks = chunk_text(text, &config(20, 0));
    assert_eq!(chunks[0], "one two three four");
    assert!(chunks.iter().all(|c| c.chars().count() <= 20));
}

#[test]
fn find_break_hard_cut() {
    let chars: Vec<char> = "abcdefghij".chars().collect();
    assert_eq!(find_break(&chars, 3, 7), 7);
}

// ── Documents ──────────────────────────────────────────────────────

#[test]
fn chunk_document_uses_page_text() {
    let doc = ExtractedDocument {
        filename: "poh.pdf".into(),
        kind: FileKind::Pdf,
        pages: vec![
            PageContent { page_number: 1, text: "Page one.".into() },
            PageContent { page_number: 2, text: "Page two.".into() },
        ],
    };
    let chunks = chunk_document(&doc, &ChunkConfig::default());
    assert_eq!(chunks, vec!["Page one.\nPage two.".to_string()]);
}
