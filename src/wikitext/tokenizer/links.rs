//! Internal, external and bare links
//!
//! Links never span lines: a link still open at the start of the next line
//! is abandoned, its counter decremented and the line lexed by the parent
//! context.

use super::Step;
use crate::wikitext::config::is_url_terminator;
use crate::wikitext::cursor::{is_space, LineCursor};
use crate::wikitext::engine::Engine;
use crate::wikitext::state::{Context, State};
use crate::wikitext::style::{self, Counter, Style};
use crate::wikitext::vocabulary::tags as t;

/// Consume `\s* <literal> \s*` (trailing space only if `trailing`); restores on failure
fn eat_spaced(c: &mut LineCursor<'_>, literal: &str, trailing: bool) -> bool {
    let save = c.pos();
    c.eat_space();
    if c.match_str(literal, true) {
        if trailing {
            c.eat_space();
        }
        true
    } else {
        c.set_pos(save);
        false
    }
}

/// Consume `\s*` followed by a non-empty run of `pred`, or failing that any whitespace
fn eat_spaced_run(c: &mut LineCursor<'_>, pred: impl Fn(char) -> bool) -> bool {
    let save = c.pos();
    c.eat_space();
    if c.eat_while(pred) {
        return true;
    }
    c.pos() > save
}

impl Engine {
    /// Abandon a link at the start of a line
    fn abandon_link(&self, s: &mut State) -> Step {
        s.decrement(Counter::Link);
        s.leave();
        None
    }

    // ========================================================================
    // [[Internal links]]
    // ========================================================================

    pub(crate) fn in_link(&self, c: &mut LineCursor<'_>, s: &mut State) -> Step {
        if c.sol() {
            return self.abandon_link(s);
        }
        if eat_spaced(c, "#", true) {
            s.switch(Context::LinkToSection);
            return Some(style::local(s, Style::of(t::LINK)));
        }
        if eat_spaced(c, "|", true) {
            s.switch(Context::LinkText {
                bold: false,
                italic: false,
            });
            return Some(style::local(s, Style::of(t::LINK_DELIMITER)));
        }
        if eat_spaced(c, "]]", false) {
            s.leave();
            return Some(style::closing(s, Style::of(t::LINK_BRACKET), Counter::Link));
        }

        let page = Style::of(t::LINK_PAGENAME).with(t::PAGENAME);
        if eat_spaced_run(c, |ch| !is_space(ch) && !matches!(ch, '#' | '|' | ']' | '&' | '~' | '{')) {
            return Some(style::styled(s, page));
        }
        Some(self.eat_wikitext(c, s, page))
    }

    pub(crate) fn in_link_to_section(&self, c: &mut LineCursor<'_>, s: &mut State) -> Step {
        if c.sol() {
            return self.abandon_link(s);
        }
        if eat_spaced(c, "|", true) {
            s.switch(Context::LinkText {
                bold: false,
                italic: false,
            });
            return Some(style::local(s, Style::of(t::LINK_DELIMITER)));
        }
        if eat_spaced(c, "]]", false) {
            s.leave();
            return Some(style::closing(s, Style::of(t::LINK_BRACKET), Counter::Link));
        }
        if c.eat_while(|ch| !matches!(ch, '|' | ']' | '&' | '~' | '{' | '}')) {
            return Some(style::local(s, Style::of(t::LINK_TOSECTION)));
        }
        Some(self.eat_wikitext(c, s, Style::of(t::LINK_TOSECTION)))
    }

    pub(crate) fn in_link_text(
        &self,
        c: &mut LineCursor<'_>,
        s: &mut State,
        bold: bool,
        italic: bool,
    ) -> Step {
        if c.sol() {
            return self.abandon_link(s);
        }
        if c.match_str("]]", true) {
            s.leave();
            return Some(style::closing(s, Style::of(t::LINK_BRACKET), Counter::Link));
        }
        if c.match_str("'''", true) {
            s.switch(Context::LinkText { bold: !bold, italic });
            return Some(style::local(s, Style::of(t::LINK_TEXT).with(t::APOSTROPHES)));
        }
        if c.match_str("''", true) {
            s.switch(Context::LinkText { bold, italic: !italic });
            return Some(style::local(s, Style::of(t::LINK_TEXT).with(t::APOSTROPHES)));
        }

        let mut text = Style::of(t::LINK_TEXT);
        if bold {
            text.push(t::STRONG);
        }
        if italic {
            text.push(t::EM);
        }
        if c.eat_while(|ch| !matches!(ch, '\'' | ']' | '{' | '&' | '~' | '<')) {
            return Some(style::styled(s, text));
        }
        Some(self.eat_wikitext(c, s, text))
    }

    // ========================================================================
    // [External links]
    // ========================================================================

    pub(crate) fn in_external_link_protocol(
        &self,
        c: &mut LineCursor<'_>,
        s: &mut State,
        len: usize,
    ) -> Step {
        c.advance(len);
        if c.eol() {
            s.decrement(Counter::Link);
            s.leave();
        } else {
            s.switch(Context::ExternalLink);
        }
        Some(style::local(s, Style::of(t::EXTLINK_PROTOCOL)))
    }

    pub(crate) fn in_external_link(&self, c: &mut LineCursor<'_>, s: &mut State) -> Step {
        if c.sol() {
            return self.abandon_link(s);
        }
        if eat_spaced(c, "]", false) {
            s.leave();
            return Some(style::closing(s, Style::of(t::EXTLINK_BRACKET), Counter::Link));
        }
        if c.eat_space() {
            s.switch(Context::ExternalLinkText);
            return Some(style::styled(s, Style::new()));
        }
        if c.eat_while(|ch| !is_space(ch) && !matches!(ch, ']' | '{' | '&' | '~' | '\'')) {
            if c.peek() == Some('\'') {
                if c.match_str("''", false) {
                    s.switch(Context::ExternalLinkText);
                } else {
                    c.next();
                }
            }
            return Some(style::styled(s, Style::of(t::EXTLINK)));
        }
        Some(self.eat_wikitext(c, s, Style::of(t::EXTLINK)))
    }

    pub(crate) fn in_external_link_text(&self, c: &mut LineCursor<'_>, s: &mut State) -> Step {
        if c.sol() {
            return self.abandon_link(s);
        }
        if c.eat(']') {
            s.leave();
            return Some(style::closing(s, Style::of(t::EXTLINK_BRACKET), Counter::Link));
        }
        if c.eat_while(|ch| !matches!(ch, '\'' | ']' | '{' | '&' | '~' | '<')) {
            return Some(style::styled(s, Style::of(t::EXTLINK_TEXT)));
        }
        Some(self.eat_wikitext(c, s, Style::of(t::EXTLINK_TEXT)))
    }

    // ========================================================================
    // Bare URLs
    // ========================================================================

    pub(crate) fn in_free_external_link_protocol(&self, c: &mut LineCursor<'_>, s: &mut State) -> Step {
        match self.protocols().match_at(c.rest()) {
            Some(len) => {
                c.advance(len);
                s.switch(Context::FreeExternalLink);
                Some(style::styled(s, Style::of(t::FREE_EXTLINK_PROTOCOL)))
            }
            None => {
                s.leave();
                None
            }
        }
    }

    pub(crate) fn in_free_external_link(&self, c: &mut LineCursor<'_>, s: &mut State) -> Step {
        let start = c.pos();
        if !c.eol() {
            c.eat_while(|ch| !is_url_terminator(ch) && !matches!(ch, '}'));
            let rest = c.rest();
            match c.peek() {
                Some('~') if !rest.starts_with("~~~") => {
                    c.eat_while(|ch| ch == '~');
                    return Some(style::styled(s, Style::of(t::FREE_EXTLINK)));
                }
                Some('{') if !rest.starts_with("{{") => {
                    c.next();
                    return Some(style::styled(s, Style::of(t::FREE_EXTLINK)));
                }
                Some('\'') if !rest.starts_with("''") => {
                    c.next();
                    return Some(style::styled(s, Style::of(t::FREE_EXTLINK)));
                }
                Some(')' | '.' | ',') => {
                    let punct = rest
                        .find(|ch: char| !matches!(ch, ')' | '.' | ','))
                        .unwrap_or(rest.len());
                    let continues = rest[punct..]
                        .chars()
                        .next()
                        .is_some_and(|ch| !is_url_terminator(ch));
                    if continues {
                        c.advance(punct);
                        return Some(style::styled(s, Style::of(t::FREE_EXTLINK)));
                    }
                }
                _ => {}
            }
        }
        s.leave();
        if c.pos() == start {
            return None;
        }
        Some(style::styled(s, Style::of(t::FREE_EXTLINK)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eat_spaced() {
        let mut c = LineCursor::new("  | label");
        assert!(!eat_spaced(&mut c, "#", true));
        assert_eq!(c.pos(), 0);
        assert!(eat_spaced(&mut c, "|", true));
        assert_eq!(c.rest(), "label");
    }

    #[test]
    fn test_eat_spaced_run() {
        let mut c = LineCursor::new(" Main Page|");
        assert!(eat_spaced_run(&mut c, |ch| !is_space(ch) && ch != '|'));
        assert_eq!(c.rest(), " Page|");
        let mut c = LineCursor::new("|");
        assert!(!eat_spaced_run(&mut c, |ch| ch != '|'));
    }
}
