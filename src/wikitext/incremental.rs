//! Incremental Re-highlighting
//!
//! Keeps a highlighted document up to date across line edits without
//! re-tokenizing everything after the edit.
//!
//! # Overview
//!
//! The tokenizer state at the start of every line is kept as a checkpoint.
//! After an edit only the lines from the first edited one are re-tokenized,
//! and only until the state at the start of an unedited line matches its
//! checkpoint again. From there on every cached result is still valid.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Document V1                          checkpoints (line start)   │
//! │   0  {{Infobox                         S0  default               │
//! │   1  |name = Foo                       S1  template name         │
//! │   2  }}                                S2  template argument     │
//! │   3  Plain text                        S3  default               │
//! └─────────────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ Edit: replace line 1 with "|name = Bar"
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Re-highlight from line 1 using S1                               │
//! │   line 1 -> end state == S2 ?  yes -> stop                       │
//! │  Rehighlighted: 1   Reused: 2                                    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use wikitext_lexer::wikitext::{Engine, IncrementalHighlighter, LanguageConfig, LineEdit};
//!
//! let engine = Engine::new(LanguageConfig::default()).unwrap();
//! let mut doc = IncrementalHighlighter::new(&engine, "{{Infobox\n|name = Foo\n}}\nPlain text");
//!
//! let result = doc.apply_edit(LineEdit::replace(1, "|name = Bar")).unwrap();
//! assert_eq!(result.lines_rehighlighted, 1);
//! assert_eq!(result.lines_reused, 2);
//! ```

use super::engine::Engine;
use super::error::EditError;
use super::highlight::{highlight_line, StyledSpan};
use super::state::State;

/// Represents a change to the document's lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEdit {
    /// First line the edit touches
    pub first_line: usize,
    /// Number of lines removed from `first_line` on
    pub removed: usize,
    /// Lines inserted at `first_line`, without line breaks
    pub inserted: Vec<String>,
}

impl LineEdit {
    /// Create a new edit
    #[inline]
    pub fn new(first_line: usize, removed: usize, inserted: Vec<String>) -> Self {
        Self {
            first_line,
            removed,
            inserted,
        }
    }

    /// Create an insertion edit
    pub fn insert<I, S>(first_line: usize, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(first_line, 0, lines.into_iter().map(Into::into).collect())
    }

    /// Create a deletion edit
    #[inline]
    pub fn delete(first_line: usize, count: usize) -> Self {
        Self::new(first_line, count, Vec::new())
    }

    /// Create an edit replacing a single line
    #[inline]
    pub fn replace(line: usize, text: impl Into<String>) -> Self {
        Self::new(line, 1, vec![text.into()])
    }

    /// Calculate the delta (change in line count)
    #[inline]
    pub fn delta(&self) -> isize {
        self.inserted.len() as isize - self.removed as isize
    }

    /// Translate a line index from old to new coordinates
    #[inline]
    pub fn translate_line(&self, line: usize) -> usize {
        if line < self.first_line {
            line
        } else if line < self.first_line + self.removed {
            // line removed by the edit -> map to the start of the inserted block
            self.first_line
        } else {
            ((line as isize) + self.delta()) as usize
        }
    }
}

/// Result of an incremental re-highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RehighlightResult {
    /// First line that was re-tokenized
    pub first_line: usize,
    /// Number of lines re-tokenized
    pub lines_rehighlighted: usize,
    /// Number of lines after the edit whose cached spans were kept
    pub lines_reused: usize,
}

/// Highlighted document that re-tokenizes only what an edit affects
#[derive(Debug, Clone)]
pub struct IncrementalHighlighter<'e> {
    engine: &'e Engine,
    lines: Vec<String>,
    /// State at the start of each line, plus one for the end of the document
    checkpoints: Vec<State>,
    spans: Vec<Vec<StyledSpan>>,
}

impl<'e> IncrementalHighlighter<'e> {
    /// Highlight `text` for the first time
    pub fn new(engine: &'e Engine, text: &str) -> Self {
        let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        let mut checkpoints = Vec::with_capacity(lines.len() + 1);
        let mut spans = Vec::with_capacity(lines.len());

        let mut state = engine.start_state();
        checkpoints.push(engine.copy_state(&state));
        for line in &lines {
            spans.push(highlight_line(engine, line, &mut state));
            checkpoints.push(engine.copy_state(&state));
        }

        Self {
            engine,
            lines,
            checkpoints,
            spans,
        }
    }

    /// Replace lines and re-highlight what changed
    pub fn apply_edit(&mut self, edit: LineEdit) -> Result<RehighlightResult, EditError> {
        let LineEdit {
            first_line,
            removed,
            inserted,
        } = edit;

        if first_line + removed > self.lines.len() {
            return Err(EditError::LineOutOfRange {
                first_line,
                removed,
                line_count: self.lines.len(),
            });
        }
        if let Some(index) = inserted.iter().position(|line| line.contains('\n')) {
            return Err(EditError::EmbeddedNewline { index });
        }

        let added = inserted.len();
        self.lines.splice(first_line..first_line + removed, inserted);
        self.spans
            .splice(first_line..first_line + removed, (0..added).map(|_| Vec::new()));

        // The start of the first unedited line keeps its old checkpoint so it
        // can be compared; starts of inserted lines are placeholders.
        let mut old = std::mem::take(&mut self.checkpoints).into_iter();
        let mut checkpoints: Vec<State> = old.by_ref().take(first_line + 1).collect();
        if added > 0 {
            checkpoints.extend((1..added).map(|_| State::new()));
            if removed == 0 {
                checkpoints.push(checkpoints[first_line].clone());
            }
            checkpoints.extend(old.skip(removed.saturating_sub(1)));
        } else {
            checkpoints.extend(old.skip(removed));
        }
        self.checkpoints = checkpoints;

        let edited_end = first_line + added;
        let mut state = self.engine.copy_state(&self.checkpoints[first_line]);
        let mut rehighlighted = 0;
        let mut reused = 0;

        for line in first_line..self.lines.len() {
            self.spans[line] = highlight_line(self.engine, &self.lines[line], &mut state);
            rehighlighted += 1;

            let next = line + 1;
            if next >= edited_end && self.checkpoints[next] == state {
                reused = self.lines.len() - next;
                break;
            }
            self.checkpoints[next] = self.engine.copy_state(&state);
        }

        log_debug!(
            "edit at line {}: {} lines re-highlighted, {} reused",
            first_line,
            rehighlighted,
            reused
        );

        Ok(RehighlightResult {
            first_line,
            lines_rehighlighted: rehighlighted,
            lines_reused: reused,
        })
    }

    /// Cached spans of a line
    #[inline]
    pub fn spans(&self, line: usize) -> Option<&[StyledSpan]> {
        self.spans.get(line).map(Vec::as_slice)
    }

    /// State at the start of a line; `line_count()` gives the end of the document
    #[inline]
    pub fn checkpoint(&self, line: usize) -> Option<&State> {
        self.checkpoints.get(line)
    }

    /// Text of a line
    #[inline]
    pub fn line(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(String::as_str)
    }

    /// Number of lines
    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The whole document, lines joined with `\n`
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// The engine used for highlighting
    #[inline]
    pub fn engine(&self) -> &'e Engine {
        self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wikitext::config::LanguageConfig;
    use crate::wikitext::highlight::highlight_document;

    fn engine() -> Engine {
        Engine::new(LanguageConfig::default()).unwrap()
    }

    #[test]
    fn test_line_edit_delta() {
        assert_eq!(LineEdit::insert(3, ["a", "b"]).delta(), 2);
        assert_eq!(LineEdit::delete(3, 2).delta(), -2);
        assert_eq!(LineEdit::replace(3, "x").delta(), 0);
    }

    #[test]
    fn test_translate_line() {
        let edit = LineEdit::new(2, 2, vec!["x".to_string()]);
        assert_eq!(edit.translate_line(0), 0);
        assert_eq!(edit.translate_line(2), 2);
        assert_eq!(edit.translate_line(3), 2);
        assert_eq!(edit.translate_line(4), 3);
        assert_eq!(edit.translate_line(10), 9);

        let insert = LineEdit::insert(1, ["a"]);
        assert_eq!(insert.translate_line(1), 2);
    }

    #[test]
    fn test_initial_highlight_matches_document() {
        let engine = engine();
        let text = "== Head ==\n{{Foo\n|a=b}}\n''x''";
        let doc = IncrementalHighlighter::new(&engine, text);
        let expected = highlight_document(&engine, text);
        assert_eq!(doc.line_count(), 4);
        for (i, spans) in expected.iter().enumerate() {
            assert_eq!(doc.spans(i), Some(spans.as_slice()));
        }
        assert_eq!(doc.checkpoint(4).map(State::is_balanced), Some(true));
        assert_eq!(doc.text(), text);
    }

    #[test]
    fn test_edit_stops_when_state_converges() {
        let engine = engine();
        let mut doc = IncrementalHighlighter::new(&engine, "a\nb\nc\nd");
        let result = doc.apply_edit(LineEdit::replace(1, "changed")).unwrap();
        assert_eq!(
            result,
            RehighlightResult {
                first_line: 1,
                lines_rehighlighted: 1,
                lines_reused: 2,
            }
        );
        assert_eq!(doc.line(1), Some("changed"));
    }

    #[test]
    fn test_edit_propagates_open_construct() {
        let engine = engine();
        let mut doc = IncrementalHighlighter::new(&engine, "a\nb\nc\nd");
        let result = doc.apply_edit(LineEdit::replace(0, "{{Foo|")).unwrap();
        assert_eq!(result.lines_rehighlighted, 4);
        assert_eq!(result.lines_reused, 0);
        assert_eq!(doc.checkpoint(4).map(|s| s.template_depth()), Some(1));
    }

    #[test]
    fn test_out_of_range_and_newline_are_rejected() {
        let engine = engine();
        let mut doc = IncrementalHighlighter::new(&engine, "a\nb");
        assert_eq!(
            doc.apply_edit(LineEdit::delete(1, 2)),
            Err(EditError::LineOutOfRange {
                first_line: 1,
                removed: 2,
                line_count: 2,
            })
        );
        assert_eq!(
            doc.apply_edit(LineEdit::insert(0, ["ok", "bad\nline"])),
            Err(EditError::EmbeddedNewline { index: 1 })
        );
        assert_eq!(doc.text(), "a\nb");
    }
}
