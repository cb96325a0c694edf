//! Templates, parser functions and template variables
//!
//! ```text
//! {{Name|arg|key=value}}     template        (template counter)
//! {{#if:cond|then|else}}     parser function (ext counter)
//! {{lc:TEXT}}                parser function when `lc` is a known synonym
//! {{{1|default}}}            template variable
//! ```
//!
//! All of them may span lines.

use super::Step;
use crate::wikitext::cursor::{is_space, LineCursor};
use crate::wikitext::engine::Engine;
use crate::wikitext::state::{Context, State};
use crate::wikitext::style::{self, Counter, Style};
use crate::wikitext::vocabulary::tags as t;

/// `{{{` opens a variable unless it is really `{{` + `{` or an immediately closed template
///
/// `rest` starts right after the first `{`.
fn opens_variable(rest: &str) -> bool {
    let Some(after) = rest.strip_prefix("{{") else {
        return false;
    };
    if after.starts_with('{') {
        return false;
    }
    let brace = after.find(['{', '}']).unwrap_or(after.len());
    let closes_as_template = after[brace..].starts_with("}}") && !after[brace + 2..].starts_with('}');
    !closes_as_template
}

/// `{{` opens a template or parser function unless it is the start of `{{{`
///
/// `rest` starts right after the first `{`.
fn opens_template(rest: &str) -> bool {
    let mut chars = rest.chars();
    chars.next() == Some('{') && !(chars.next() == Some('{') && chars.next() != Some('{'))
}

impl Engine {
    /// `{` was consumed: a variable, parser function or template
    pub(crate) fn eat_open_brace(&self, c: &mut LineCursor<'_>, s: &mut State) -> Option<Style> {
        let rest = c.rest();
        if opens_variable(rest) {
            c.advance(2);
            c.eat_space();
            s.enter(Context::Variable);
            return Some(style::local(s, Style::of(t::TEMPLATE_VARIABLE_BRACKET)));
        }
        if !opens_template(rest) {
            return None;
        }

        c.advance(1);
        c.eat_space();
        if c.peek() == Some('#') || self.is_parser_function_call(c.rest()) {
            s.increment(Counter::Ext);
            s.enter(Context::ParserFunctionName);
            return Some(style::local(s, Style::of(t::PARSER_FUNCTION_BRACKET)));
        }

        s.increment(Counter::Template);
        s.enter(Context::TemplatePageName { eaten: false });
        Some(style::local(s, Style::of(t::TEMPLATE_BRACKET)))
    }

    /// Whether `text` (after `{{`) starts with a known parser function name
    ///
    /// The name must be followed by `:`, by the end of the line, or by `}}`.
    fn is_parser_function_call(&self, text: &str) -> bool {
        let name_len = text
            .find(|ch: char| {
                is_space(ch) || matches!(ch, '}' | '[' | ']' | '<' | '{' | '\'' | '|' | '&' | ':')
            })
            .unwrap_or(text.len());
        if name_len == 0 {
            return false;
        }
        let name = &text[..name_len];
        let after = &text[name_len..];

        let (colon, after) = match after.strip_prefix(':') {
            Some(rest) => (true, rest),
            None => (false, after.trim_start_matches(is_space)),
        };
        let (closed, after) = match after.strip_prefix("}}") {
            Some(rest) => (true, rest),
            None => (false, after.strip_prefix('}').unwrap_or(after)),
        };

        (colon || closed || after.is_empty()) && self.config().is_parser_function(name)
    }

    // ========================================================================
    // Templates
    // ========================================================================

    pub(crate) fn in_template_page_name(&self, c: &mut LineCursor<'_>, s: &mut State, eaten: bool) -> Step {
        let save = c.pos();
        c.eat_space();
        if c.eat('|') {
            c.eat_space();
            s.switch(Context::TemplateArgument { expect_name: true });
            return Some(style::local(s, Style::of(t::TEMPLATE_DELIMITER)));
        }
        if c.match_str("}}", true) {
            s.leave();
            return Some(style::closing(s, Style::of(t::TEMPLATE_BRACKET), Counter::Template));
        }
        if c.match_str("<!--", false) {
            if let Some(end) = c.rest().find("-->") {
                c.advance(end + 3);
                return Some(style::local(s, Style::of(t::COMMENT)));
            }
        }
        c.set_pos(save);

        if eaten && c.sol() {
            s.decrement(Counter::Template);
            s.leave();
            return None;
        }

        let name = Style::of(t::TEMPLATE_NAME).with(t::PAGENAME);
        c.eat_space();
        if c.eat_while(|ch| {
            !is_space(ch) && !matches!(ch, '|' | '&' | '~' | '{' | '}' | '<' | '>' | '[' | ']')
        }) {
            s.switch(Context::TemplatePageName { eaten: true });
            return Some(style::local(s, name));
        }
        if c.pos() > save {
            return Some(style::local(s, name));
        }
        Some(self.eat_wikitext(c, s, name))
    }

    pub(crate) fn in_template_argument(&self, c: &mut LineCursor<'_>, s: &mut State, expect_name: bool) -> Style {
        if expect_name && c.eat_while(|ch| !matches!(ch, '=' | '|' | '}' | '{' | '[' | '<' | '&' | '~')) {
            if c.eat('=') {
                s.switch(Context::TemplateArgument { expect_name: false });
                return style::local(s, Style::of(t::TEMPLATE_ARGUMENT_NAME));
            }
            return style::local(s, Style::of(t::TEMPLATE));
        }
        if c.eat_while(|ch| !matches!(ch, '|' | '}' | '{' | '[' | '<' | '&' | '~')) {
            return style::local(s, Style::of(t::TEMPLATE));
        }
        if c.eat('|') {
            s.switch(Context::TemplateArgument { expect_name: true });
            return style::local(s, Style::of(t::TEMPLATE_DELIMITER));
        }
        if c.match_str("}}", true) {
            s.leave();
            return style::closing(s, Style::of(t::TEMPLATE_BRACKET), Counter::Template);
        }
        self.eat_wikitext(c, s, Style::of(t::TEMPLATE))
    }

    // ========================================================================
    // Parser functions
    // ========================================================================

    pub(crate) fn in_parser_function_name(&self, c: &mut LineCursor<'_>, s: &mut State) -> Style {
        if c.eat_while(|ch| !matches!(ch, ':' | '}' | '{' | '~')) {
            return style::local(s, Style::of(t::PARSER_FUNCTION_NAME));
        }
        if c.eat(':') {
            s.switch(Context::ParserFunctionArguments);
            return style::local(s, Style::of(t::PARSER_FUNCTION_DELIMITER));
        }
        if c.match_str("}}", true) {
            s.leave();
            return style::closing(s, Style::of(t::PARSER_FUNCTION_BRACKET), Counter::Ext);
        }
        self.eat_wikitext(c, s, Style::of(t::PARSER_FUNCTION))
    }

    pub(crate) fn in_parser_function_arguments(&self, c: &mut LineCursor<'_>, s: &mut State) -> Style {
        if c.eat_while(|ch| !matches!(ch, '|' | '}' | '{' | '[' | '<' | '&' | '~')) {
            return style::local(s, Style::of(t::PARSER_FUNCTION));
        }
        if c.eat('|') {
            return style::local(s, Style::of(t::PARSER_FUNCTION_DELIMITER));
        }
        if c.match_str("}}", true) {
            s.leave();
            return style::closing(s, Style::of(t::PARSER_FUNCTION_BRACKET), Counter::Ext);
        }
        self.eat_wikitext(c, s, Style::of(t::PARSER_FUNCTION))
    }

    // ========================================================================
    // Template variables
    // ========================================================================

    pub(crate) fn in_variable(&self, c: &mut LineCursor<'_>, s: &mut State) -> Style {
        if c.eat_while(|ch| !matches!(ch, '{' | '}' | '|')) {
            return style::local(s, Style::of(t::TEMPLATE_VARIABLE_NAME));
        }
        if c.eat('|') {
            s.switch(Context::VariableDefault);
            return style::local(s, Style::of(t::TEMPLATE_VARIABLE_DELIMITER));
        }
        if c.match_str("}}}", true) {
            s.leave();
            return style::local(s, Style::of(t::TEMPLATE_VARIABLE_BRACKET));
        }
        if c.match_str("{{{", true) {
            // nested variable inside the name: resume the same context afterwards
            s.stack.push(Context::Variable);
            return style::local(s, Style::of(t::TEMPLATE_VARIABLE_BRACKET));
        }
        c.next();
        style::local(s, Style::of(t::TEMPLATE_VARIABLE_NAME))
    }

    pub(crate) fn in_variable_default(&self, c: &mut LineCursor<'_>, s: &mut State) -> Style {
        if c.eat_while(|ch| !matches!(ch, '{' | '}' | '[' | '<' | '&' | '~')) {
            return style::local(s, Style::of(t::TEMPLATE_VARIABLE));
        }
        if c.match_str("}}}", true) {
            s.leave();
            return style::local(s, Style::of(t::TEMPLATE_VARIABLE_BRACKET));
        }
        self.eat_wikitext(c, s, Style::of(t::TEMPLATE_VARIABLE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opens_variable() {
        assert!(opens_variable("{{1}}}"));
        assert!(opens_variable("{{name|default}}}"));
        assert!(!opens_variable("{{{a}}}"));
        // `{{{a}}` closes as a template
        assert!(!opens_variable("{{a}}"));
        assert!(!opens_variable("{a}}"));
    }

    #[test]
    fn test_opens_template() {
        assert!(opens_template("{Foo}}"));
        assert!(opens_template("{{{x}}}"));
        assert!(!opens_template("{{x}}"));
        assert!(!opens_template("Foo"));
        assert!(opens_template("{"));
    }
}
