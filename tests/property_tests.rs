//! Property-based tests using proptest
//!
//! These tests use property-based testing to verify tokenizer behavior across
//! a wide range of wikitext-like inputs.

use proptest::prelude::*;
use wikitext_lexer::wikitext::{
    highlight_document, highlight_line, Engine, IncrementalHighlighter, LanguageConfig, LineCursor,
    LineEdit,
};

fn engine() -> Engine {
    Engine::new(LanguageConfig::default()).unwrap()
}

/// A line made of markup-heavy characters
fn wikitext_line() -> impl Strategy<Value = String> {
    "[a-zé '\\[\\]{}|=<>/!&#;:*~_.\\-]{0,40}"
}

/// Lines mixing random text with complete constructs
fn markup_line() -> impl Strategy<Value = String> {
    prop_oneof![
        wikitext_line(),
        Just("{{Infobox|name=Foo".to_string()),
        Just("}}".to_string()),
        Just("<ref>''note".to_string()),
        Just("</ref>".to_string()),
        Just("<!-- open".to_string()),
        Just("close -->".to_string()),
        Just("{|".to_string()),
        Just("| a || b".to_string()),
        Just("|}".to_string()),
        Just("l'''x''".to_string()),
        Just(String::new()),
    ]
}

fn document() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(markup_line(), 1..12)
}

// =============================================================================
// Token Contract
// =============================================================================

proptest! {
    /// Tokens are contiguous, non-empty and cover the whole line
    #[test]
    fn test_tokens_cover_line(lines in document()) {
        let engine = engine();
        let mut state = engine.start_state();
        for line in &lines {
            let mut cursor = LineCursor::new(line);
            let mut covered = 0;
            while !cursor.eol() {
                let start = cursor.pos();
                engine.token(&mut cursor, &mut state);
                prop_assert_eq!(start, covered);
                prop_assert!(cursor.pos() > start);
                covered = cursor.pos();
            }
            prop_assert_eq!(covered, line.len());
            if line.is_empty() {
                engine.blank_line(&mut state);
            }
        }
    }

    /// Spans never overlap and never merge equal neighbours
    #[test]
    fn test_spans_are_well_formed(lines in document()) {
        let engine = engine();
        let text = lines.join("\n");
        for (line, spans) in lines.iter().zip(highlight_document(&engine, &text)) {
            for pair in spans.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
                prop_assert_ne!(&pair[0].style, &pair[1].style);
            }
            prop_assert_eq!(spans.last().map_or(0, |s| s.end), line.len());
        }
    }
}

// =============================================================================
// State Copies
// =============================================================================

proptest! {
    /// Resuming from a copy taken at a line start gives the same spans
    #[test]
    fn test_copy_resumes_identically(lines in document(), split in 0usize..12) {
        let engine = engine();
        let split = split.min(lines.len());

        let mut state = engine.start_state();
        let mut expected = Vec::new();
        let mut checkpoint = None;
        for (i, line) in lines.iter().enumerate() {
            if i == split {
                checkpoint = Some(engine.copy_state(&state));
            }
            expected.push(highlight_line(&engine, line, &mut state));
        }

        if let Some(mut copy) = checkpoint {
            for (i, line) in lines.iter().enumerate().skip(split) {
                let spans = highlight_line(&engine, line, &mut copy);
                prop_assert_eq!(&spans, &expected[i]);
            }
            prop_assert_eq!(copy, state);
        }
    }

    /// States survive a JSON round trip unchanged
    #[test]
    fn test_state_serializes(lines in document()) {
        let engine = engine();
        let mut state = engine.start_state();
        for line in &lines {
            highlight_line(&engine, line, &mut state);
        }
        let json = serde_json::to_string(&state).unwrap();
        let back: wikitext_lexer::State = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, state);
    }
}

// =============================================================================
// Incremental Re-highlighting
// =============================================================================

proptest! {
    /// An incremental update matches highlighting the edited text from scratch
    #[test]
    fn test_incremental_matches_fresh(
        lines in document(),
        first in 0usize..12,
        removed in 0usize..4,
        inserted in prop::collection::vec(markup_line(), 0..4),
    ) {
        let engine = engine();
        let text = lines.join("\n");
        let mut doc = IncrementalHighlighter::new(&engine, &text);

        let first = first.min(doc.line_count());
        let removed = removed.min(doc.line_count() - first);
        doc.apply_edit(LineEdit::new(first, removed, inserted)).unwrap();
        // an empty document has no line to compare against
        prop_assume!(doc.line_count() > 0);

        let fresh = highlight_document(&engine, &doc.text());
        prop_assert_eq!(fresh.len(), doc.line_count());
        for (i, spans) in fresh.iter().enumerate() {
            prop_assert_eq!(doc.spans(i), Some(spans.as_slice()));
        }
    }
}
