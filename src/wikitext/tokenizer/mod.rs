//! Tokenizer function table
//!
//! Every [`Context`] maps to one lexing routine. A routine consumes one
//! token from the cursor, may switch the context (directly, or by pushing
//! the current one onto the resumption stack) and returns the token's style.
//!
//! A routine may also hand control to another context without consuming
//! anything, for example an unterminated link reaching the next line. It
//! then returns `None` and the engine dispatches again in the new context
//! within the same call.
//!
//! The routines live in submodules by construct:
//!
//! - this module: running text, line-start markup, headings, comments,
//!   entities, signatures and behavior switches
//! - [`links`]: internal, external and bare links
//! - [`templates`]: templates, parser functions and template variables
//! - [`tables`]: table structure
//! - [`tags`]: HTML and extension tags

mod links;
mod tables;
mod tags;
mod templates;

use super::cursor::{is_space, LineCursor};
use super::engine::Engine;
use super::entities::is_valid_entity;
use super::state::{BlockKind, Context, State};
use super::style::{self, Counter, Style};
use super::vocabulary::{section_level, tags as t};

/// Result of one lexing routine; `None` asks for another dispatch
pub(crate) type Step = Option<Style>;

/// Characters that are ordinary text in every context
#[inline]
fn is_plain(c: char) -> bool {
    !is_space(c)
        && !matches!(
            c,
            '_' | '>' | '}' | '[' | ']' | '<' | '{' | '\'' | '|' | '&' | ':' | '~' | '='
        )
}

#[inline]
fn is_list_marker(c: char) -> bool {
    matches!(c, '*' | '#' | ';' | ':')
}

/// Number of leading `c` characters of `s`
#[inline]
pub(crate) fn run_length(s: &str, c: char) -> usize {
    s.chars().take_while(|&ch| ch == c).count()
}

/// Whether the text after `<!--` holds no `-->` that is followed by more text
fn comment_runs_to_end(body: &str) -> bool {
    memchr::memmem::find_iter(body.as_bytes(), b"-->")
        .all(|i| body[i + 3..].trim_start().is_empty())
}

/// Heading shape of a line starting with `=`: `(opening run, closing run incl. trailing space)`
///
/// The closing run must repeat the opening run; it may be followed by
/// whitespace and a comment that runs to the end of the line.
fn section_header(line: &str) -> Option<(usize, usize)> {
    let after = line.strip_prefix('=')?;
    let leading = run_length(after, '=').min(5);

    for extra in (0..=leading).rev() {
        let body = &after[extra..];
        let level = extra + 1;
        for (k, _) in body.char_indices().skip(1) {
            let candidate = &body[k..];
            if run_length(candidate, '=') < level {
                continue;
            }
            let tail = &candidate[level..];
            let trimmed = tail.trim_start();
            let ok = trimmed.is_empty()
                || trimmed
                    .strip_prefix("<!--")
                    .is_some_and(comment_runs_to_end);
            if ok {
                return Some((level, level + tail.len() - trimmed.len()));
            }
        }
    }
    None
}

impl Engine {
    /// Produce one token in the current context
    pub(crate) fn dispatch(&self, c: &mut LineCursor<'_>, s: &mut State) -> Step {
        match s.tokenize {
            Context::Default => Some(self.eat_wikitext(c, s, Style::new())),
            // a heading ends with its line, even when a nested construct swallowed its markers
            Context::SectionHeader { .. } | Context::SectionHeaderEnd if c.sol() => {
                s.leave();
                None
            }
            Context::SectionHeader { count } => self.in_section_header(c, s, count),
            Context::SectionHeaderEnd => {
                c.skip_to_end();
                s.leave();
                Some(style::local(s, Style::of(t::SECTION_HEADER)))
            }
            Context::Block(kind) => self.in_block(c, s, kind),
            Context::Link => self.in_link(c, s),
            Context::LinkToSection => self.in_link_to_section(c, s),
            Context::LinkText { bold, italic } => self.in_link_text(c, s, bold, italic),
            Context::ExternalLinkProtocol { len } => self.in_external_link_protocol(c, s, len),
            Context::ExternalLink => self.in_external_link(c, s),
            Context::ExternalLinkText => self.in_external_link_text(c, s),
            Context::FreeExternalLinkProtocol => self.in_free_external_link_protocol(c, s),
            Context::FreeExternalLink => self.in_free_external_link(c, s),
            Context::TemplatePageName { eaten } => self.in_template_page_name(c, s, eaten),
            Context::TemplateArgument { expect_name } => {
                Some(self.in_template_argument(c, s, expect_name))
            }
            Context::ParserFunctionName => Some(self.in_parser_function_name(c, s)),
            Context::ParserFunctionArguments => Some(self.in_parser_function_arguments(c, s)),
            Context::Variable => Some(self.in_variable(c, s)),
            Context::VariableDefault => Some(self.in_variable_default(c, s)),
            Context::StartTable => Some(self.in_start_table(c, s)),
            Context::TableDefinition => Some(self.in_table_definition(c, s)),
            Context::TableCaption => Some(self.in_table_caption(c, s)),
            Context::Table => Some(self.in_table(c, s)),
            Context::TableRow { start, head } => Some(self.in_table_row(c, s, start, head)),
            Context::TagName { len, close, kind } => Some(self.in_tag_name(c, s, len, close, kind)),
            Context::HtmlTagAttribute { ref name } => {
                let name = name.clone();
                Some(self.in_html_tag_attribute(c, s, &name))
            }
            Context::ExtTagAttribute { ext } => Some(self.in_ext_tag_attribute(c, s, ext)),
            Context::ExtTagArea { ext } => Some(self.in_ext_tag_area(c, s, ext)),
            Context::ExtTokens { ext, window_end } => Some(self.in_ext_tokens(c, s, ext, window_end)),
            Context::ExtCloseTag { ext } => Some(self.in_ext_close_tag(c, s, ext)),
            Context::CloseBracket(kind) => Some(self.in_close_bracket(c, s, kind)),
        }
    }

    // ========================================================================
    // Running text
    // ========================================================================

    /// Lex one token of running wikitext; `base` styles ordinary text
    pub(crate) fn eat_wikitext(&self, c: &mut LineCursor<'_>, s: &mut State, base: Style) -> Style {
        if c.sol() {
            if let Some(style) = self.eat_line_start(c, s) {
                return style;
            }
        }

        let Some(ch) = c.next() else {
            return style::styled(s, base);
        };

        match ch {
            '&' => return self.eat_html_entity(c, s, base),
            '\'' => {
                if let Some(style) = self.eat_apostrophes(c, s) {
                    return style;
                }
            }
            '[' => {
                if c.eat('[') {
                    c.eat_space();
                    if c.peek().is_some_and(|next| !matches!(next, ']' | '|' | '[')) {
                        s.increment(Counter::Link);
                        s.enter(Context::Link);
                        return style::local(s, Style::of(t::LINK_BRACKET));
                    }
                } else if let Some(len) = self.protocols().match_at(c.rest()) {
                    s.increment(Counter::Link);
                    s.enter(Context::ExternalLinkProtocol { len });
                    return style::local(s, Style::of(t::EXTLINK_BRACKET));
                }
            }
            '{' => {
                if let Some(style) = self.eat_open_brace(c, s) {
                    return style;
                }
            }
            '<' => {
                if let Some(style) = self.eat_open_angle(c, s) {
                    return style;
                }
            }
            '~' => {
                let run = run_length(c.rest(), '~');
                if run >= 2 {
                    c.advance(run.min(4));
                    return style::local(s, Style::of(t::SIGNATURE));
                }
            }
            '_' => {
                if let Some(style) = self.eat_double_underscore(c, s, &base) {
                    return style;
                }
            }
            ch if is_space(ch) => {
                c.eat_space();
                if !c.rest().starts_with("//") && self.protocols().match_at(c.rest()).is_some() {
                    s.enter(Context::FreeExternalLinkProtocol);
                }
                return style::styled(s, base);
            }
            _ => {}
        }

        c.eat_while(is_plain);
        style::styled(s, base)
    }

    /// Markup only recognized at the start of a line
    fn eat_line_start(&self, c: &mut LineCursor<'_>, s: &mut State) -> Option<Style> {
        let rest = c.rest();
        if !rest.starts_with("//") {
            if let Some(len) = self.protocols().match_at(rest) {
                c.advance(len);
                s.enter(Context::FreeExternalLink);
                return Some(style::local(s, Style::of(t::FREE_EXTLINK_PROTOCOL)));
            }
        }

        match c.peek()? {
            '-' => {
                let run = run_length(rest, '-');
                if run >= 4 {
                    c.advance(run);
                    return Some(style::local(s, Style::of(t::HR)));
                }
            }
            '=' => {
                let (level, count) = section_header(rest)?;
                c.advance(level);
                s.enter(Context::SectionHeader { count });
                return Some(style::local(
                    s,
                    Style::of(t::SECTION_HEADER).with(section_level(level)),
                ));
            }
            '*' | '#' | ';' => {
                c.eat_while(is_list_marker);
                return Some(style::local(s, Style::of(t::LIST)));
            }
            ':' => {
                if rest.trim_start_matches(':').starts_with("{|") {
                    s.enter(Context::StartTable);
                }
                c.eat_while(is_list_marker);
                return Some(style::local(s, Style::of(t::INDENTING)));
            }
            ' ' => {
                let table_follows = rest
                    .trim_start_matches(is_space)
                    .trim_start_matches(':')
                    .starts_with("{|");
                if !table_follows {
                    c.next();
                    return Some(style::local(s, Style::of(t::SKIP_FORMATTING)));
                }
                c.eat_space();
                if c.eat_while(|ch| ch == ':') {
                    s.enter(Context::StartTable);
                    return Some(style::local(s, Style::of(t::INDENTING)));
                }
                return Some(self.open_table(c, s));
            }
            '{' => {
                if rest.starts_with("{|") {
                    return Some(self.open_table(c, s));
                }
            }
            _ => {}
        }
        None
    }

    // ========================================================================
    // Headings and blocks
    // ========================================================================

    fn in_section_header(&self, c: &mut LineCursor<'_>, s: &mut State, count: usize) -> Step {
        let start = c.pos();
        if c.eat_while(|ch| !matches!(ch, '&' | '<' | '[' | '{' | '~')) {
            if c.eol() {
                c.set_pos(c.pos().saturating_sub(count).max(start));
                s.switch(Context::SectionHeaderEnd);
            } else if c.rest().strip_prefix("<!--").is_some_and(|body| {
                memchr::memmem::find_iter(body.as_bytes(), b"-->").all(|i| !body[i..].contains('='))
            }) {
                c.set_pos(c.pos().saturating_sub(count).max(start));
                s.switch(Context::Block(BlockKind::HeaderUntilComment));
            }
            if c.pos() == start {
                return None;
            }
            return Some(style::local(s, Style::of(t::SECTION)));
        }
        Some(self.eat_wikitext(c, s, Style::of(t::SECTION)))
    }

    fn in_block(&self, c: &mut LineCursor<'_>, s: &mut State, kind: BlockKind) -> Step {
        let start = c.pos();
        let (style, terminator, consume) = match kind {
            BlockKind::Comment => (t::COMMENT, "-->", true),
            BlockKind::HeaderUntilComment => (t::SECTION_HEADER, "<!--", false),
        };
        if c.skip_to(terminator) {
            if consume {
                c.advance(terminator.len());
            }
            s.leave();
        } else {
            c.skip_to_end();
        }
        if c.pos() == start {
            return None;
        }
        Some(style::local(s, Style::of(style)))
    }

    /// `<!--` was consumed: lex the comment up to `-->` or the end of the line
    pub(crate) fn open_comment(&self, c: &mut LineCursor<'_>, s: &mut State) -> Style {
        s.enter(Context::Block(BlockKind::Comment));
        self.in_block(c, s, BlockKind::Comment)
            .unwrap_or_else(|| style::local(s, Style::of(t::COMMENT)))
    }

    // ========================================================================
    // Small inline constructs
    // ========================================================================

    /// `&` was consumed: a character reference, or ordinary text
    pub(crate) fn eat_html_entity(&self, c: &mut LineCursor<'_>, s: &mut State, base: Style) -> Style {
        if self.scan_entity(c) {
            style::styled(s, Style::of(t::HTML_ENTITY))
        } else {
            style::styled(s, base)
        }
    }

    /// Consume the body of a character reference after `&`; true if it is valid
    pub(crate) fn scan_entity(&self, c: &mut LineCursor<'_>) -> bool {
        let start = c.pos();
        c.eat_while(|ch| ch.is_ascii_alphanumeric() || ch == '#')
            && c.eat(';')
            && is_valid_entity(&c.line()[start..c.pos() - 1])
    }

    /// `_` was consumed: a behavior switch such as `__NOTOC__`
    fn eat_double_underscore(&self, c: &mut LineCursor<'_>, s: &mut State, base: &Style) -> Option<Style> {
        let mut underscores = 1;
        while c.eat('_') {
            underscores += 1;
        }

        if underscores > 2 {
            // leave the last two for the next token, they may open a switch
            if !c.eol() {
                c.back_up(2);
            }
            return Some(style::styled(s, base.clone()));
        }
        if underscores < 2 {
            return None;
        }

        let rest = c.rest();
        let is_word_char = |ch: char| {
            !is_space(ch)
                && !matches!(ch, '>' | '}' | '[' | ']' | '<' | '{' | '\'' | '|' | '&' | ':' | '~')
        };
        let mut word_end = None;
        for (i, ch) in rest.char_indices() {
            if i > 0 && rest[i..].starts_with("__") {
                word_end = Some(i);
                break;
            }
            if !is_word_char(ch) {
                break;
            }
        }
        let word_end = word_end?;

        let key = format!("__{}__", &rest[..word_end]);
        c.advance(word_end + 2);
        if self.config().is_double_underscore(&key) {
            return Some(style::local(s, Style::of(t::DOUBLE_UNDERSCORE)));
        }
        if !c.eol() {
            c.back_up(2);
        }
        Some(style::styled(s, base.clone()))
    }
}
