//! Tokenizer state
//!
//! A [`State`] is everything the tokenizer needs to resume lexing at the
//! start of any line: the active context, the stack of contexts to return
//! to, the nesting counters, open HTML tags, the embedded state of an
//! extension tag body and the line-scoped emphasis bookkeeping.
//!
//! States are plain owned values. `Clone` produces a fully independent deep
//! copy, so a host can keep one snapshot per line and restart from any of
//! them.
//!
//! # Resumption stack
//!
//! ```text
//! tokenize: TemplateArgument      <- called for the next token
//! stack:    [Default, Link]       <- restored one by one as constructs close
//! ```
//!
//! Popping an empty stack falls back to [`Context::Default`].

use super::config::TagMode;
use super::style::{Counter, Style};
use super::vocabulary::ExtId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Which kind of tag a [`Context::TagName`] or [`Context::CloseBracket`] belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagKind {
    /// A permitted HTML tag
    Html,
    /// A registered extension tag
    Ext(ExtId),
}

/// Block constructs that run until a terminator, possibly across lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    /// `<!-- ... -->`
    Comment,
    /// Section heading text up to a trailing comment
    HeaderUntilComment,
}

/// Tokenizer context: which lexing routine produces the next token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Context {
    /// Running wikitext
    Default,
    /// Heading text with `count` trailing equals signs
    SectionHeader {
        /// Length of the trailing `=` run
        count: usize,
    },
    /// Trailing `=` run of a heading
    SectionHeaderEnd,
    /// Comment or heading text before a trailing comment
    Block(BlockKind),
    /// `[[` page name
    Link,
    /// `[[page#` section
    LinkToSection,
    /// `[[page|` label
    LinkText {
        /// `'''` toggled inside the label
        bold: bool,
        /// `''` toggled inside the label
        italic: bool,
    },
    /// `[` followed by a protocol of `len` bytes
    ExternalLinkProtocol {
        /// Protocol length
        len: usize,
    },
    /// Target of an external link
    ExternalLink,
    /// Label of an external link
    ExternalLinkText,
    /// Protocol of a bare URL
    FreeExternalLinkProtocol,
    /// Rest of a bare URL
    FreeExternalLink,
    /// `{{` template name
    TemplatePageName {
        /// Whether some of the name was consumed already
        eaten: bool,
    },
    /// Template argument after `|`
    TemplateArgument {
        /// Whether an `name=` prefix may still follow
        expect_name: bool,
    },
    /// `{{#name` of a parser function
    ParserFunctionName,
    /// Parser function arguments after `:`
    ParserFunctionArguments,
    /// `{{{` variable name
    Variable,
    /// Variable default after `|`
    VariableDefault,
    /// After `:{|`, before the table bracket
    StartTable,
    /// Attributes after `{|` or `|-`
    TableDefinition,
    /// Caption after `|+`
    TableCaption,
    /// Start of a table line
    Table,
    /// Cells of a table line
    TableRow {
        /// Whether a single `|` still separates cell attributes
        start: bool,
        /// Header row (`!`)
        head: bool,
    },
    /// Name of an HTML or extension tag, `len` bytes long
    TagName {
        /// Name length
        len: usize,
        /// `</name`
        close: bool,
        /// HTML or extension tag
        kind: TagKind,
    },
    /// Attributes of an open HTML tag
    HtmlTagAttribute {
        /// Lowercased tag name
        name: String,
    },
    /// Attributes of an extension tag
    ExtTagAttribute {
        /// The tag
        ext: ExtId,
    },
    /// Body of an extension tag
    ExtTagArea {
        /// The tag
        ext: ExtId,
    },
    /// Body tokens up to `window_end` (byte offset) or the end of the line
    ExtTokens {
        /// The tag
        ext: ExtId,
        /// Start of the closing tag on this line, if any
        window_end: Option<usize>,
    },
    /// `</name>` of an extension tag
    ExtCloseTag {
        /// The tag
        ext: ExtId,
    },
    /// The final `>` of a closing tag
    CloseBracket(TagKind),
}

/// Extension tag whose body is currently being lexed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveExtension {
    /// The tag
    pub ext: ExtId,
    /// How the body is lexed
    pub mode: TagMode,
    /// State of the nested tokenizer ([`TagMode::Wikitext`] only)
    pub embedded: Option<Box<State>>,
}

/// A token produced ahead of time and replayed by later calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct BufferedToken {
    /// Cursor position after the token
    pub pos: usize,
    pub style: Style,
    /// State right after the token
    pub state: State,
}

/// Line-scoped bold / italic bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emphasis {
    /// Bold is on
    pub bold: bool,
    /// Italic is on
    pub italic: bool,
    /// Bold as it was at the first rollback point
    pub was_bold: bool,
    /// Italic as it was at the first rollback point
    pub was_italic: bool,
    /// End of the first `'''` that follows a single-letter word
    pub first_single_letter_word: Option<usize>,
    /// End of the first `'''` that follows a longer word
    pub first_multi_letter_word: Option<usize>,
    /// End of the first `'''` that follows a space
    pub first_space: Option<usize>,
    pub(crate) pending: VecDeque<BufferedToken>,
}

impl Emphasis {
    /// Rollback point in priority order
    #[inline]
    pub fn rollback_point(&self) -> Option<usize> {
        self.first_single_letter_word
            .or(self.first_multi_letter_word)
            .or(self.first_space)
    }

    #[inline]
    pub(crate) fn clear_points(&mut self) {
        self.first_single_letter_word = None;
        self.first_multi_letter_word = None;
        self.first_space = None;
    }

    /// Forget everything belonging to the current line
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Complete tokenizer state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub(crate) tokenize: Context,
    pub(crate) stack: Vec<Context>,
    pub(crate) template_depth: u32,
    pub(crate) link_depth: u32,
    pub(crate) ext_depth: u32,
    pub(crate) open_html_tags: Vec<String>,
    pub(crate) active_extension: Option<Box<ActiveExtension>>,
    pub(crate) emphasis: Emphasis,
}

impl State {
    /// State at the start of a document
    pub fn new() -> Self {
        Self {
            tokenize: Context::Default,
            stack: Vec::new(),
            template_depth: 0,
            link_depth: 0,
            ext_depth: 0,
            open_html_tags: Vec::new(),
            active_extension: None,
            emphasis: Emphasis::default(),
        }
    }

    /// Context producing the next token
    #[inline]
    pub fn context(&self) -> &Context {
        &self.tokenize
    }

    /// Contexts waiting to be resumed, outermost first
    #[inline]
    pub fn stack(&self) -> &[Context] {
        &self.stack
    }

    /// Open `{{templates}}`
    #[inline]
    pub fn template_depth(&self) -> u32 {
        self.template_depth
    }

    /// Open links
    #[inline]
    pub fn link_depth(&self) -> u32 {
        self.link_depth
    }

    /// Open parser functions
    #[inline]
    pub fn ext_depth(&self) -> u32 {
        self.ext_depth
    }

    /// HTML tags opened and not yet closed, innermost last
    #[inline]
    pub fn open_html_tags(&self) -> &[String] {
        &self.open_html_tags
    }

    /// Extension tag whose body is being lexed
    #[inline]
    pub fn active_extension(&self) -> Option<&ActiveExtension> {
        self.active_extension.as_deref()
    }

    /// Emphasis bookkeeping of the current line
    #[inline]
    pub fn emphasis(&self) -> &Emphasis {
        &self.emphasis
    }

    #[inline]
    pub(crate) fn emphasis_mut(&mut self) -> &mut Emphasis {
        &mut self.emphasis
    }

    /// Whether all counters are zero and no context is pending
    pub fn is_balanced(&self) -> bool {
        self.template_depth == 0
            && self.link_depth == 0
            && self.ext_depth == 0
            && self.stack.is_empty()
            && self.tokenize == Context::Default
    }

    // ========================================================================
    // Context transitions
    // ========================================================================

    /// Suspend the current context and switch to `next`
    #[inline]
    pub(crate) fn enter(&mut self, next: Context) {
        let current = std::mem::replace(&mut self.tokenize, next);
        self.stack.push(current);
    }

    /// Replace the current context without touching the stack
    #[inline]
    pub(crate) fn switch(&mut self, next: Context) {
        self.tokenize = next;
    }

    /// Resume the most recently suspended context
    pub(crate) fn leave(&mut self) {
        self.tokenize = match self.stack.pop() {
            Some(context) => context,
            None => {
                log_debug!("resumption stack empty, falling back to default context");
                Context::Default
            }
        };
    }

    #[inline]
    pub(crate) fn increment(&mut self, counter: Counter) {
        match counter {
            Counter::Template => self.template_depth += 1,
            Counter::Link => self.link_depth += 1,
            Counter::Ext => self.ext_depth += 1,
        }
    }

    #[inline]
    pub(crate) fn decrement(&mut self, counter: Counter) {
        let depth = match counter {
            Counter::Template => &mut self.template_depth,
            Counter::Link => &mut self.link_depth,
            Counter::Ext => &mut self.ext_depth,
        };
        *depth = depth.saturating_sub(1);
    }

    /// Drop line-scoped emphasis data, here and in any embedded state
    pub(crate) fn finish_line(&mut self) {
        self.emphasis.reset();
        if let Some(inner) = self
            .active_extension
            .as_mut()
            .and_then(|active| active.embedded.as_mut())
        {
            inner.finish_line();
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
