//! Integration tests for bold and italic resolution
//!
//! These tests cover:
//! - Plain bold / italic toggles
//! - Rolling back a `'''` run when a line ends with both open
//! - Candidate priority (single-letter word before longer word before space)
//! - Emphasis never leaking into the next line

use wikitext_lexer::wikitext::{highlight_document, highlight_line, Engine, LanguageConfig, LineCursor};

fn engine() -> Engine {
    Engine::new(LanguageConfig::default()).unwrap()
}

fn line(engine: &Engine, text: &str) -> Vec<(String, String)> {
    highlight_document(engine, text)
        .remove(0)
        .iter()
        .map(|span| (text[span.range()].to_string(), engine.style_name(&span.style)))
        .collect()
}

fn expect(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(text, class)| (text.to_string(), class.to_string()))
        .collect()
}

// ============================================================================
// Toggles
// ============================================================================

#[test]
fn test_bold_and_italic() {
    let engine = engine();
    assert_eq!(
        line(&engine, "'''bold''' and ''italic''"),
        expect(&[
            ("'''", "mw-apostrophes-bold"),
            ("bold", "mw-strong"),
            ("'''", "mw-apostrophes-bold"),
            (" and ", ""),
            ("''", "mw-apostrophes-italic"),
            ("italic", "mw-em"),
            ("''", "mw-apostrophes-italic"),
        ])
    );
}

#[test]
fn test_bold_italic_run() {
    let engine = engine();
    assert_eq!(
        line(&engine, "'''''both'''''"),
        expect(&[
            ("'''", "mw-apostrophes-bold"),
            ("''", "mw-apostrophes-italic"),
            ("both", "mw-strong mw-em"),
            ("'''", "mw-apostrophes-bold"),
            ("''", "mw-apostrophes-italic"),
        ])
    );
}

#[test]
fn test_unclosed_bold_does_not_leak() {
    let engine = engine();
    let lines = highlight_document(&engine, "'''open\nnext");
    assert_eq!(lines[1].len(), 1);
    assert!(lines[1][0].style.is_empty());
}

// ============================================================================
// Rollback
// ============================================================================

#[test]
fn test_rollback_of_first_token() {
    let engine = engine();
    assert_eq!(
        line(&engine, "l'''x''"),
        expect(&[
            ("l'", ""),
            ("''", "mw-apostrophes-italic"),
            ("x", "mw-em"),
            ("''", "mw-apostrophes-italic"),
        ])
    );
}

#[test]
fn test_single_letter_word_rollback_after_buffering() {
    let engine = engine();
    assert_eq!(
        line(&engine, "'''a''' l'''x''"),
        expect(&[
            ("'''", "mw-apostrophes-bold"),
            ("a", "mw-strong"),
            ("'''", "mw-apostrophes-bold"),
            (" l'", ""),
            ("''", "mw-apostrophes-italic"),
            ("x", "mw-em"),
            ("''", "mw-apostrophes-italic"),
        ])
    );
}

#[test]
fn test_no_rollback_when_line_balances() {
    let engine = engine();
    let spans = line(&engine, "l'''x'''");
    assert_eq!(
        spans,
        expect(&[
            ("l", ""),
            ("'''", "mw-apostrophes-bold"),
            ("x", "mw-strong"),
            ("'''", "mw-apostrophes-bold"),
        ])
    );
}

#[test]
fn test_line_start_letter_is_a_longer_word() {
    let engine = engine();
    // `x` opens the line, so the later `l'''` is the single-letter candidate
    assert_eq!(
        line(&engine, "x'''y'''z and l'''q''"),
        expect(&[
            ("x", ""),
            ("'''", "mw-apostrophes-bold"),
            ("y", "mw-strong"),
            ("'''", "mw-apostrophes-bold"),
            ("z and l'", ""),
            ("''", "mw-apostrophes-italic"),
            ("q", "mw-em"),
            ("''", "mw-apostrophes-italic"),
        ])
    );
}

#[test]
fn test_longer_word_beats_space() {
    let engine = engine();
    // `x '''` follows a space, `a'''` follows a word: the word wins
    assert_eq!(
        line(&engine, "x '''a''' bb'''c''"),
        expect(&[
            ("x ", ""),
            ("'''", "mw-apostrophes-bold"),
            ("a'", "mw-strong"),
            ("''", "mw-apostrophes-italic"),
            (" bb", "mw-strong mw-em"),
            ("'''", "mw-apostrophes-bold"),
            ("c", "mw-em"),
            ("''", "mw-apostrophes-italic"),
        ])
    );
}

#[test]
fn test_five_quotes_after_single_letter() {
    let engine = engine();
    // the five-quote run opens both; only bold is left open at the end
    assert_eq!(
        line(&engine, "l'''''italic''plain"),
        expect(&[
            ("l", ""),
            ("'''", "mw-apostrophes-bold"),
            ("''", "mw-apostrophes-italic"),
            ("italic", "mw-strong mw-em"),
            ("''", "mw-apostrophes-italic"),
            ("plain", "mw-strong"),
        ])
    );
}

#[test]
fn test_demoted_apostrophe_is_plain_text() {
    let engine = engine();
    let spans = line(&engine, "{{a}}'''x''");
    assert_eq!(
        spans[spans.len() - 4..].to_vec(),
        expect(&[
            ("'", ""),
            ("''", "mw-apostrophes-italic"),
            ("x", "mw-em"),
            ("''", "mw-apostrophes-italic"),
        ])
    );
}

#[test]
fn test_state_is_clean_after_rollback() {
    let engine = engine();
    let mut state = engine.start_state();
    highlight_line(&engine, "l'''x''", &mut state);
    assert!(!state.emphasis().bold);
    assert!(!state.emphasis().italic);
    assert_eq!(state.emphasis().rollback_point(), None);
}

// ============================================================================
// Token Contract
// ============================================================================

#[test]
fn test_every_call_makes_progress() {
    let engine = engine();
    for text in ["l'''x''", "'''a''' l'''x''", "''''four''''", "'''''''seven"] {
        let mut state = engine.start_state();
        let mut cursor = LineCursor::new(text);
        let mut covered = 0;
        while !cursor.eol() {
            let start = cursor.pos();
            engine.token(&mut cursor, &mut state);
            assert_eq!(start, covered, "gap in {:?}", text);
            assert!(cursor.pos() > start, "no progress in {:?}", text);
            covered = cursor.pos();
        }
        assert_eq!(covered, text.len());
    }
}

#[test]
fn test_state_copy_resumes_mid_line() {
    let engine = engine();
    let text = "'''a''' l'''x''";

    let mut state = engine.start_state();
    let mut cursor = LineCursor::new(text);
    engine.token(&mut cursor, &mut state);
    let snapshot = engine.copy_state(&state);
    let resume_at = cursor.pos();

    let mut rest_original = Vec::new();
    while !cursor.eol() {
        let style = engine.token(&mut cursor, &mut state);
        rest_original.push((cursor.pos(), style));
    }

    let mut copy = snapshot;
    let mut cursor = LineCursor::new(text);
    cursor.set_pos(resume_at);
    let mut rest_copy = Vec::new();
    while !cursor.eol() {
        let style = engine.token(&mut cursor, &mut copy);
        rest_copy.push((cursor.pos(), style));
    }

    assert_eq!(rest_original, rest_copy);
}
