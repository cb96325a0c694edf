//! Line highlighting helpers
//!
//! Drives [`Engine::token`] across whole lines the way an editor host does
//! and collects the result as byte-range spans. Adjacent tokens with equal
//! styles are merged into one span.
//!
//! ```rust
//! use wikitext_lexer::wikitext::{highlight_document, Engine, LanguageConfig};
//!
//! let engine = Engine::new(LanguageConfig::default()).unwrap();
//! let lines = highlight_document(&engine, "[[Main Page]]\nplain");
//! assert_eq!(lines.len(), 2);
//! assert_eq!(lines[0][0].end, 2); // `[[`
//! ```

use super::cursor::LineCursor;
use super::engine::Engine;
use super::state::State;
use super::style::Style;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Styled byte range of a line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledSpan {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Style of every byte in the range
    pub style: Style,
}

impl StyledSpan {
    /// Create a new span
    #[inline]
    pub fn new(start: usize, end: usize, style: Style) -> Self {
        Self { start, end, style }
    }

    /// Byte range covered by the span
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Length in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no bytes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Tokenize one line, advancing `state` to the start of the next line
///
/// An empty line produces no spans and is reported through
/// [`Engine::blank_line`].
pub fn highlight_line(engine: &Engine, line: &str, state: &mut State) -> Vec<StyledSpan> {
    let mut spans: Vec<StyledSpan> = Vec::new();
    if line.is_empty() {
        engine.blank_line(state);
        state.finish_line();
        return spans;
    }

    let mut cursor = LineCursor::new(line);
    while !cursor.eol() {
        let start = cursor.pos();
        let style = engine.token(&mut cursor, state);
        let end = cursor.pos();
        if end <= start {
            break;
        }
        match spans.last_mut() {
            Some(last) if last.end == start && last.style == style => last.end = end,
            _ => spans.push(StyledSpan::new(start, end, style)),
        }
    }
    state.finish_line();
    spans
}

/// Tokenize a whole document from the start state
///
/// Lines are split on `\n`; a trailing `\r` stays part of its line.
pub fn highlight_document(engine: &Engine, text: &str) -> Vec<Vec<StyledSpan>> {
    let mut state = engine.start_state();
    text.split('\n')
        .map(|line| highlight_line(engine, line, &mut state))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wikitext::config::LanguageConfig;
    use crate::wikitext::vocabulary::tags;

    fn engine() -> Engine {
        Engine::new(LanguageConfig::default()).unwrap()
    }

    #[test]
    fn test_spans_cover_the_line() {
        let engine = engine();
        let mut state = engine.start_state();
        let line = "Some '''bold''' text with a [[link|label]] and {{tpl|x=1}}.";
        let spans = highlight_line(&engine, line, &mut state);

        assert_eq!(spans.first().map(|s| s.start), Some(0));
        assert_eq!(spans.last().map(|s| s.end), Some(line.len()));
        for pair in spans.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert_ne!(pair[0].style, pair[1].style);
        }
        assert!(state.is_balanced());
    }

    #[test]
    fn test_adjacent_plain_tokens_merge() {
        let engine = engine();
        let mut state = engine.start_state();
        let spans = highlight_line(&engine, "one two three", &mut state);
        assert_eq!(spans, vec![StyledSpan::new(0, 13, Style::new())]);
    }

    #[test]
    fn test_empty_line_resets_emphasis() {
        let engine = engine();
        let mut state = engine.start_state();
        highlight_line(&engine, "''open italic", &mut state);
        assert!(highlight_line(&engine, "", &mut state).is_empty());
        assert!(!state.emphasis().italic);
    }

    #[test]
    fn test_document_carries_state_across_lines() {
        let engine = engine();
        let lines = highlight_document(&engine, "{{Foo\n|a=b\n}}");
        assert_eq!(lines.len(), 3);
        let last = &lines[2];
        assert_eq!(last.len(), 1);
        assert!(last[0].style.contains(tags::TEMPLATE_BRACKET));
    }

    #[test]
    fn test_span_accessors() {
        let span = StyledSpan::new(2, 5, Style::of(tags::LINK_BRACKET));
        assert_eq!(span.range(), 2..5);
        assert_eq!(span.len(), 3);
        assert!(!span.is_empty());
    }
}
