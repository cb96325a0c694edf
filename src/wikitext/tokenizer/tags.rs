//! HTML and extension tags
//!
//! HTML tags are tracked on a stack of open names so that mismatched closing
//! tags can be flagged. Extension tags (`<ref>`, `<nowiki>`, ...) switch to
//! a body lexer that runs until the matching closing tag:
//!
//! ```text
//! <ref name="a">  body  </ref>
//! |   |         | |     |
//! |   |         | |     +-- ExtCloseTag -> TagName -> CloseBracket
//! |   |         | +-- ExtTagArea / ExtTokens (window ends at `</ref>`)
//! |   |         +-- `>` selects the body mode
//! |   +-- TagName -> ExtTagAttribute
//! +-- `<` bracket
//! ```

use crate::wikitext::config::{is_tag_name_char, TagMode};
use crate::wikitext::cursor::LineCursor;
use crate::wikitext::engine::Engine;
use crate::wikitext::state::{ActiveExtension, Context, State, TagKind};
use crate::wikitext::style::{self, Style};
use crate::wikitext::vocabulary::{tags as t, ExtId};
use memchr::memchr_iter;

/// Offset of the first `</name\s*>` in `text`, matching `name` case-insensitively
pub(crate) fn find_closing_tag(text: &str, name: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let name = name.as_bytes();
    memchr_iter(b'<', bytes).find(|&i| {
        let tail = &bytes[i + 1..];
        if tail.first() != Some(&b'/') || tail.len() < name.len() + 1 {
            return false;
        }
        if !tail[1..=name.len()].eq_ignore_ascii_case(name) {
            return false;
        }
        let after = &text[i + 2 + name.len()..];
        after.trim_start().starts_with('>')
    })
}

/// Consume a quoted attribute value opened by `quote`; restores on failure
///
/// The value may not contain `<`, `>` (nor, for HTML, the quote itself).
fn eat_quoted(c: &mut LineCursor<'_>, quote: char, allow_lt: bool) -> bool {
    let save = c.pos();
    if !c.eat(quote) {
        return false;
    }
    c.eat_while(|ch| ch != quote && ch != '>' && (allow_lt || ch != '<'));
    if c.eat(quote) {
        true
    } else {
        c.set_pos(save);
        false
    }
}

impl Engine {
    /// `<` was consumed: a comment, an extension tag or an HTML tag
    pub(crate) fn eat_open_angle(&self, c: &mut LineCursor<'_>, s: &mut State) -> Option<Style> {
        let save = c.pos();
        let close = c.eat('/');
        let name_start = c.pos();
        c.eat_while(is_tag_name_char);
        let len = c.pos() - name_start;

        if len == 0 {
            if !close && c.match_str("!--", true) {
                return Some(self.open_comment(c, s));
            }
            c.set_pos(save);
            return None;
        }

        let name = c.line()[name_start..c.pos()].to_lowercase();

        if let Some(ext) = self.vocabulary().extension(&name) {
            if close {
                return Some(style::local(s, Style::of(t::ERROR)));
            }
            c.set_pos(name_start);
            s.enter(Context::TagName {
                len,
                close: false,
                kind: TagKind::Ext(ext),
            });
            let ext_tag = self.vocabulary().extension_entry(ext).ext_tag;
            return Some(style::local(s, Style::of(t::EXTTAG_BRACKET).with(ext_tag)));
        }

        if self.config().is_html_tag(&name) {
            if close {
                if self.config().is_void_tag(&name) {
                    return Some(style::local(s, Style::of(t::ERROR)));
                }
                if s.open_html_tags.pop().as_deref() != Some(name.as_str()) {
                    return Some(style::local(s, Style::of(t::ERROR)));
                }
            }
            c.set_pos(name_start);
            s.enter(Context::TagName {
                len,
                close,
                kind: TagKind::Html,
            });
            return Some(style::local(s, Style::of(t::HTMLTAG_BRACKET)));
        }

        c.set_pos(save);
        None
    }

    pub(crate) fn in_tag_name(
        &self,
        c: &mut LineCursor<'_>,
        s: &mut State,
        len: usize,
        close: bool,
        kind: TagKind,
    ) -> Style {
        let start = c.pos();
        c.advance(len);
        let name = c.line()[start..c.pos()].to_lowercase();
        c.eat_space();

        match kind {
            TagKind::Html => {
                if close && !self.config().is_void_tag(&name) {
                    s.switch(Context::CloseBracket(TagKind::Html));
                } else {
                    s.switch(Context::HtmlTagAttribute { name });
                }
                style::local(s, Style::of(t::HTMLTAG_NAME))
            }
            TagKind::Ext(ext) => {
                if close {
                    s.switch(Context::CloseBracket(kind));
                } else {
                    s.switch(Context::ExtTagAttribute { ext });
                }
                let ext_tag = self.vocabulary().extension_entry(ext).ext_tag;
                style::local(s, Style::of(t::EXTTAG_NAME).with(ext_tag))
            }
        }
    }

    pub(crate) fn in_close_bracket(&self, c: &mut LineCursor<'_>, s: &mut State, kind: TagKind) -> Style {
        s.leave();
        if !c.eat('>') {
            return style::local(s, Style::of(t::ERROR));
        }
        match kind {
            TagKind::Html => style::local(s, Style::of(t::HTMLTAG_BRACKET)),
            TagKind::Ext(ext) => {
                let ext_tag = self.vocabulary().extension_entry(ext).ext_tag;
                style::local(s, Style::of(t::EXTTAG_BRACKET).with(ext_tag))
            }
        }
    }

    // ========================================================================
    // HTML tags
    // ========================================================================

    pub(crate) fn in_html_tag_attribute(&self, c: &mut LineCursor<'_>, s: &mut State, name: &str) -> Style {
        let start = c.pos();
        loop {
            if eat_quoted(c, '"', false) || eat_quoted(c, '\'', false) {
                continue;
            }
            if c.eat_if(|ch| !matches!(ch, '>' | '/' | '<' | '{' | '&' | '~')).is_none() {
                break;
            }
        }
        if c.pos() > start {
            return style::local(s, Style::of(t::HTMLTAG_ATTRIBUTE));
        }

        if c.eat('>') {
            if !self.config().is_void_tag(name) {
                s.open_html_tags.push(name.to_string());
            }
            s.leave();
            return style::local(s, Style::of(t::HTMLTAG_BRACKET));
        }
        if c.match_str("/>", true) {
            s.leave();
            return style::local(s, Style::of(t::HTMLTAG_BRACKET));
        }
        self.eat_wikitext(c, s, Style::of(t::HTMLTAG_ATTRIBUTE))
    }

    // ========================================================================
    // Extension tags
    // ========================================================================

    pub(crate) fn in_ext_tag_attribute(&self, c: &mut LineCursor<'_>, s: &mut State, ext: ExtId) -> Style {
        let entry = self.vocabulary().extension_entry(ext);
        let start = c.pos();
        loop {
            if eat_quoted(c, '"', true) || eat_quoted(c, '\'', true) {
                continue;
            }
            if c.eat_if(|ch| !matches!(ch, '>' | '/' | '<')).is_none() {
                break;
            }
        }
        if c.pos() > start {
            return style::local(s, Style::of(t::EXTTAG_ATTRIBUTE).with(entry.ext_tag));
        }

        if c.eat('>') {
            s.active_extension = self.config().extension_mode(&entry.name).map(|mode| {
                log_debug!("entering <{}> body as {:?}", entry.name, mode);
                Box::new(ActiveExtension {
                    ext,
                    mode,
                    embedded: (mode == TagMode::Wikitext).then(|| Box::new(State::new())),
                })
            });
            s.switch(Context::ExtTagArea { ext });
            return style::local(s, Style::of(t::EXTTAG_BRACKET).with(entry.ext_tag));
        }
        if c.match_str("/>", true) {
            s.leave();
            return style::local(s, Style::of(t::EXTTAG_BRACKET).with(entry.ext_tag));
        }
        self.eat_wikitext(c, s, Style::of(t::EXTTAG_ATTRIBUTE).with(entry.ext_tag))
    }

    pub(crate) fn in_ext_tag_area(&self, c: &mut LineCursor<'_>, s: &mut State, ext: ExtId) -> Style {
        let name = &self.vocabulary().extension_entry(ext).name;
        let window_end = match find_closing_tag(c.rest(), name) {
            Some(0) => {
                log_debug!("leaving <{}> body", name);
                s.active_extension = None;
                s.switch(Context::ExtCloseTag { ext });
                return self.in_ext_close_tag(c, s, ext);
            }
            Some(offset) => Some(c.pos() + offset),
            None => None,
        };
        s.enter(Context::ExtTokens { ext, window_end });
        self.in_ext_tokens(c, s, ext, window_end)
    }

    /// Body tokens of an extension tag, up to the closing tag or the end of the line
    pub(crate) fn in_ext_tokens(
        &self,
        c: &mut LineCursor<'_>,
        s: &mut State,
        ext: ExtId,
        window_end: Option<usize>,
    ) -> Style {
        let end = window_end.unwrap_or(c.line().len());
        let body = c.with_limit(end, |c| self.ext_body_token(c, s, ext));
        if c.pos() >= end {
            s.leave();
        }
        style::local(s, body)
    }

    fn ext_body_token(&self, c: &mut LineCursor<'_>, s: &mut State, ext: ExtId) -> Style {
        let body_tag = self.vocabulary().extension_entry(ext).body_tag;
        let Some(active) = s.active_extension.as_deref_mut() else {
            c.skip_to_end();
            return Style::of(t::EXTTAG);
        };

        let mut style = Style::of(body_tag);
        match (active.mode, active.embedded.as_deref_mut()) {
            (TagMode::Wikitext, Some(inner)) => {
                if c.eol() {
                    return style;
                }
                style.extend(&self.token(c, inner));
            }
            _ => {
                if c.eat('&') {
                    if self.scan_entity(c) {
                        style.push(t::HTML_ENTITY);
                    }
                } else {
                    c.eat_while(|ch| ch != '&');
                }
            }
        }
        style
    }

    pub(crate) fn in_ext_close_tag(&self, c: &mut LineCursor<'_>, s: &mut State, ext: ExtId) -> Style {
        let entry = self.vocabulary().extension_entry(ext);
        c.match_str("</", true);
        s.switch(Context::TagName {
            len: entry.name.len(),
            close: true,
            kind: TagKind::Ext(ext),
        });
        style::local(s, Style::of(t::EXTTAG_BRACKET).with(entry.ext_tag))
    }
}
