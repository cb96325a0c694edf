//! Line cursor
//!
//! A read head over a single line of text. The tokenizer never sees more than
//! one line at a time: every lookahead is bounded by the end of the line, or
//! by a narrower window end when an extension tag body is being lexed.
//!
//! Positions are byte offsets into the line and always sit on a UTF-8
//! character boundary.

use memchr::memmem;

/// Whitespace as understood by wikitext, including the no-break space.
#[inline]
pub fn is_space(c: char) -> bool {
    c.is_whitespace()
}

/// Read head over one line of text
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    /// The full line (no trailing newline)
    line: &'a str,
    /// Current byte offset
    pos: usize,
    /// Exclusive end of the readable window
    end: usize,
}

impl<'a> LineCursor<'a> {
    /// Create a cursor at the start of `line`
    #[inline]
    pub fn new(line: &'a str) -> Self {
        Self {
            line,
            pos: 0,
            end: line.len(),
        }
    }

    /// The full line, ignoring any window narrowing
    #[inline]
    pub fn line(&self) -> &'a str {
        self.line
    }

    /// Current byte offset
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move to an absolute byte offset, clamped to the window end
    #[inline]
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.end);
    }

    /// Whether the cursor sits at the start of the line
    #[inline]
    pub fn sol(&self) -> bool {
        self.pos == 0
    }

    /// Whether the cursor reached the end of the readable window
    #[inline]
    pub fn eol(&self) -> bool {
        self.pos >= self.end
    }

    /// Unread text up to the window end
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.line[self.pos..self.end]
    }

    /// Text of the line before the cursor
    #[inline]
    pub fn before(&self) -> &'a str {
        &self.line[..self.pos]
    }

    /// Next character without consuming it
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consume and return the next character
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Advance by `len` bytes (clamped to the window end)
    #[inline]
    pub fn advance(&mut self, len: usize) {
        self.pos = (self.pos + len).min(self.end);
    }

    /// Consume `c` if it is the next character
    #[inline]
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consume the next character if it satisfies `pred`
    #[inline]
    pub fn eat_if<F: Fn(char) -> bool>(&mut self, pred: F) -> Option<char> {
        match self.peek() {
            Some(c) if pred(c) => {
                self.pos += c.len_utf8();
                Some(c)
            }
            _ => None,
        }
    }

    /// Consume characters while `pred` holds; true if anything was consumed
    pub fn eat_while<F: Fn(char) -> bool>(&mut self, pred: F) -> bool {
        let start = self.pos;
        let len = self
            .rest()
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map_or(self.end - self.pos, |(i, _)| i);
        self.pos += len;
        self.pos > start
    }

    /// Consume whitespace; true if anything was consumed
    #[inline]
    pub fn eat_space(&mut self) -> bool {
        self.eat_while(is_space)
    }

    /// Test (and optionally consume) a literal
    #[inline]
    pub fn match_str(&mut self, s: &str, consume: bool) -> bool {
        if self.rest().starts_with(s) {
            if consume {
                self.pos += s.len();
            }
            true
        } else {
            false
        }
    }

    /// Test (and optionally consume) a literal, ASCII case-insensitively
    pub fn match_str_ci(&mut self, s: &str, consume: bool) -> bool {
        let rest = self.rest().as_bytes();
        let ok = rest.len() >= s.len() && rest[..s.len()].eq_ignore_ascii_case(s.as_bytes());
        if ok && consume {
            self.pos += s.len();
        }
        ok
    }

    /// Move to the next occurrence of `s` without consuming it
    pub fn skip_to(&mut self, s: &str) -> bool {
        match memmem::find(self.rest().as_bytes(), s.as_bytes()) {
            Some(offset) => {
                self.pos += offset;
                true
            }
            None => false,
        }
    }

    /// Consume everything up to the window end
    #[inline]
    pub fn skip_to_end(&mut self) {
        self.pos = self.end;
    }

    /// Step back `n` bytes (never before the start of the line)
    #[inline]
    pub fn back_up(&mut self, n: usize) {
        self.pos = self.pos.saturating_sub(n);
    }

    /// Run `f` with the readable window narrowed to end at `end`
    ///
    /// The previous window end is restored afterwards. `end` never widens
    /// the current window.
    pub fn with_limit<R>(&mut self, end: usize, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.end;
        self.end = end.clamp(self.pos, saved);
        let result = f(self);
        self.end = saved;
        result
    }
}
