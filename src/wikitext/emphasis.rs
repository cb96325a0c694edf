//! Bold and italic resolution
//!
//! Wikitext toggles bold with `'''` and italic with `''`. When a line ends
//! with both still open, one of the `'''` runs was really an apostrophe
//! followed by `''`. Which one is decided by looking at what precedes each
//! `'''` run, in priority order:
//!
//! 1. the first run following a single-letter word (` l'''`; a letter opening
//!    the line counts as a longer word)
//! 2. the first run following a longer word
//! 3. the first run following a space
//!
//! Because that decision needs the whole line, the resolver lexes ahead as
//! soon as a candidate run is seen, buffering each token with a copy of the
//! state right after it:
//!
//! ```text
//!   token()                       line: He said '''hello'' world
//!     |
//!     +-- no candidate yet -> return the token directly
//!     +-- candidate seen   -> lex to end of line, buffer tokens
//!            |
//!            +-- bold and italic both open at eol -> roll back:
//!            |     the candidate's first apostrophe becomes plain text
//!            +-- otherwise -> replay buffered tokens as they are
//! ```
//!
//! Buffered tokens live in the state, so the host only ever sees one token
//! per call and a state copy taken between calls resumes exactly.

use super::cursor::LineCursor;
use super::engine::Engine;
use super::state::{BufferedToken, State};
use super::style::{self, Style};
use super::tokenizer::run_length;
use super::vocabulary::tags as t;
use std::collections::VecDeque;

/// Record `pos` (just past a `'''` run) as a rollback candidate
///
/// `before` is the line text preceding the run.
fn record_candidate(state: &mut State, before: &str, pos: usize) {
    let mut chars = before.chars().rev();
    let x1 = chars.next();
    let x2 = chars.next();
    let emphasis = state.emphasis_mut();

    if x1 == Some(' ') {
        if emphasis.first_multi_letter_word.is_some() || emphasis.first_space.is_some() {
            return;
        }
        emphasis.first_space = Some(pos);
    } else if x1.is_some() && x2 == Some(' ') {
        emphasis.first_single_letter_word = Some(pos);
    } else if emphasis.first_multi_letter_word.is_some() {
        return;
    } else {
        emphasis.first_multi_letter_word = Some(pos);
    }

    emphasis.was_bold = emphasis.bold;
    emphasis.was_italic = emphasis.italic;
}

impl Engine {
    /// `'` was consumed: a bold or italic toggle, or `None` for plain text
    pub(crate) fn eat_apostrophes(&self, c: &mut LineCursor<'_>, s: &mut State) -> Option<Style> {
        let run = run_length(c.rest(), '\'');

        // six or more: the extras are plain text, the last five are bold italic
        if run >= 5 {
            c.advance(run - 5);
            return None;
        }
        // four: the first is plain text
        if run == 3 {
            return None;
        }

        if run >= 2 {
            c.advance(2);
            let rest = c.rest();
            if s.emphasis().first_single_letter_word.is_none() && !rest.starts_with("''") {
                let end = c.pos();
                record_candidate(s, &c.line()[..end - 3], end);
            }
            let emphasis = s.emphasis_mut();
            emphasis.bold = !emphasis.bold;
            return Some(style::local(s, Style::of(t::APOSTROPHES_BOLD)));
        }
        if run == 1 {
            c.advance(1);
            let emphasis = s.emphasis_mut();
            emphasis.italic = !emphasis.italic;
            return Some(style::local(s, Style::of(t::APOSTROPHES_ITALIC)));
        }
        None
    }

    /// One token, with bold / italic ambiguities of the line resolved
    pub(crate) fn resolve_token(&self, c: &mut LineCursor<'_>, s: &mut State) -> Style {
        if let Some(ready) = self.replay(c, s) {
            return ready;
        }
        if c.sol() {
            s.emphasis_mut().reset();
        }

        let mut ready: Vec<BufferedToken> = Vec::new();
        let mut pending: Vec<BufferedToken> = Vec::new();
        let mut point = None;

        loop {
            let style = self.raw_token(c, s);
            let Some(current) = s.emphasis().rollback_point() else {
                return style;
            };
            if point != Some(current) {
                point = Some(current);
                ready.append(&mut pending);
            }
            pending.push(BufferedToken {
                pos: c.pos(),
                style,
                state: s.clone(),
            });
            if c.eol() {
                break;
            }
        }

        let emphasis = s.emphasis();
        let mut queue: VecDeque<BufferedToken> = if emphasis.bold && emphasis.italic {
            let (was_bold, was_italic) = (emphasis.was_bold, emphasis.was_italic);
            match ready.last_mut() {
                Some(last) => {
                    log_debug!("emphasis rollback: apostrophe at {} becomes text", last.pos);
                    if c.line()[last.pos..].starts_with('\'') {
                        last.pos += 1;
                    }
                    let emphasis = last.state.emphasis_mut();
                    emphasis.bold = was_bold;
                    emphasis.italic = was_italic;
                    emphasis.clear_points();
                    ready.into()
                }
                None => {
                    // the candidate run is the first token of this call: its
                    // first apostrophe becomes plain text
                    let Some(first) = pending.into_iter().next() else {
                        return Style::new();
                    };
                    log_debug!("emphasis rollback: apostrophe at {} becomes text", first.pos.saturating_sub(3));
                    *s = first.state;
                    let emphasis = s.emphasis_mut();
                    emphasis.bold = was_bold;
                    emphasis.italic = was_italic;
                    emphasis.clear_points();
                    c.set_pos(first.pos.saturating_sub(2));
                    return style::styled(s, Style::new());
                }
            }
        } else {
            ready.append(&mut pending);
            ready.into()
        };

        let Some(first) = queue.pop_front() else {
            return Style::new();
        };
        c.set_pos(first.pos);
        *s = first.state;
        s.emphasis_mut().pending = queue;
        first.style
    }

    /// Hand out the next buffered token, if any
    fn replay(&self, c: &mut LineCursor<'_>, s: &mut State) -> Option<Style> {
        // buffered tokens never start a line; a fresh line drops leftovers
        if c.sol() {
            s.emphasis_mut().pending.clear();
            return None;
        }
        let token = s.emphasis_mut().pending.pop_front()?;
        let rest = std::mem::take(&mut s.emphasis_mut().pending);
        c.set_pos(token.pos);
        *s = token.state;
        s.emphasis_mut().pending = rest;
        Some(token.style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(before: &str) -> (Option<usize>, Option<usize>, Option<usize>) {
        let mut state = State::new();
        record_candidate(&mut state, before, 10);
        let e = state.emphasis();
        (
            e.first_single_letter_word,
            e.first_multi_letter_word,
            e.first_space,
        )
    }

    #[test]
    fn test_candidate_classification() {
        assert_eq!(candidates("a l"), (Some(10), None, None));
        assert_eq!(candidates("l"), (None, Some(10), None));
        assert_eq!(candidates("'l"), (None, Some(10), None));
        assert_eq!(candidates("word"), (None, Some(10), None));
        assert_eq!(candidates("word "), (None, None, Some(10)));
        assert_eq!(candidates(""), (None, Some(10), None));
    }

    #[test]
    fn test_space_candidate_yields_to_earlier_multi_letter() {
        let mut state = State::new();
        record_candidate(&mut state, "word", 4);
        record_candidate(&mut state, "word x ", 10);
        assert_eq!(state.emphasis().first_multi_letter_word, Some(4));
        assert_eq!(state.emphasis().first_space, None);
    }

    #[test]
    fn test_candidate_snapshots_flags() {
        let mut state = State::new();
        state.emphasis_mut().italic = true;
        record_candidate(&mut state, "x", 4);
        assert!(state.emphasis().was_italic);
        assert!(!state.emphasis().was_bold);
    }
}
