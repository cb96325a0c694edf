//! Tables
//!
//! ```text
//! {| class="wikitable"     TableDefinition
//! |+ Caption               TableCaption
//! |-                       row separator -> TableDefinition
//! ! Head !! Head           TableRow { head: true }
//! | style="x" | cell       TableRow { start: true }
//! | a || b                 TableRow
//! |}                       closes the table
//! ```
//!
//! Tables nest: a `{|` at the start of a line inside a table opens another.

use crate::wikitext::cursor::{is_space, LineCursor};
use crate::wikitext::engine::Engine;
use crate::wikitext::state::{Context, State};
use crate::wikitext::style::{self, Style};
use crate::wikitext::vocabulary::tags as t;

/// Whether the line continues with a table line marker after optional space
#[inline]
fn starts_table_line(rest: &str) -> bool {
    rest.trim_start_matches(is_space).starts_with(['|', '!'])
}

impl Engine {
    /// `{|` at the cursor opens a table
    pub(crate) fn open_table(&self, c: &mut LineCursor<'_>, s: &mut State) -> Style {
        c.match_str("{|", true);
        c.eat_space();
        s.enter(Context::TableDefinition);
        style::local(s, Style::of(t::TABLE_BRACKET))
    }

    /// After `:` indentation that leads to `{|`
    pub(crate) fn in_start_table(&self, c: &mut LineCursor<'_>, s: &mut State) -> Style {
        c.eat_while(|ch| ch == ':');
        c.eat_space();
        c.match_str("{|", true);
        c.eat_space();
        s.switch(Context::TableDefinition);
        style::local(s, Style::of(t::TABLE_BRACKET))
    }

    pub(crate) fn in_table_definition(&self, c: &mut LineCursor<'_>, s: &mut State) -> Style {
        if c.sol() {
            s.switch(Context::Table);
            return self.in_table(c, s);
        }
        self.eat_wikitext(c, s, Style::of(t::TABLE_DEFINITION))
    }

    pub(crate) fn in_table_caption(&self, c: &mut LineCursor<'_>, s: &mut State) -> Style {
        if c.sol() && starts_table_line(c.rest()) {
            s.switch(Context::Table);
            return self.in_table(c, s);
        }
        self.eat_wikitext(c, s, Style::of(t::TABLE_CAPTION))
    }

    /// Start of a line inside a table
    pub(crate) fn in_table(&self, c: &mut LineCursor<'_>, s: &mut State) -> Style {
        if c.sol() {
            c.eat_space();
            if c.eat('|') {
                if c.eat('-') {
                    c.eat_space();
                    s.switch(Context::TableDefinition);
                } else if c.eat('+') {
                    c.eat_space();
                    s.switch(Context::TableCaption);
                } else if c.eat('}') {
                    s.leave();
                    return style::local(s, Style::of(t::TABLE_BRACKET));
                } else {
                    c.eat_space();
                    s.switch(Context::TableRow {
                        start: true,
                        head: false,
                    });
                }
                return style::local(s, Style::of(t::TABLE_DELIMITER));
            }
            if c.eat('!') {
                c.eat_space();
                s.switch(Context::TableRow {
                    start: true,
                    head: true,
                });
                return style::local(s, Style::of(t::TABLE_DELIMITER));
            }
        }
        self.eat_wikitext(c, s, Style::new())
    }

    pub(crate) fn in_table_row(&self, c: &mut LineCursor<'_>, s: &mut State, start: bool, head: bool) -> Style {
        let cell = if head { Style::of(t::STRONG) } else { Style::new() };

        if c.sol() {
            if starts_table_line(c.rest()) {
                s.switch(Context::Table);
                return self.in_table(c, s);
            }
        } else {
            if c.eat_while(|ch| !matches!(ch, '\'' | '|' | '{' | '[' | '<' | '&' | '~' | '!')) {
                return style::styled(s, cell);
            }
            if c.match_str("||", true) || (head && c.match_str("!!", true)) || (start && c.eat('|')) {
                let emphasis = s.emphasis_mut();
                emphasis.bold = false;
                emphasis.italic = false;
                if start {
                    s.switch(Context::TableRow { start: false, head });
                }
                return style::local(s, Style::of(t::TABLE_DELIMITER));
            }
        }
        self.eat_wikitext(c, s, cell)
    }
}
