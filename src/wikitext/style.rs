//! Token styles and style composition
//!
//! A [`Style`] is an ordered set of [`TagId`]s. Every style handed to the
//! host is assembled from three layers:
//!
//! ```text
//! [ground]  body tags ...  [mw-strong] [mw-em]
//!    |          |                |
//!    |          |                +-- emphasis (only for running text)
//!    |          +-- what the construct is (bracket, name, delimiter, ...)
//!    +-- how deeply nested in templates / parser functions / links
//! ```
//!
//! `local` composes ground + body, `styled` additionally applies emphasis,
//! and `closing` computes the ground before decrementing the counter of the
//! construct being closed, so a closing bracket carries the same ground as
//! its opening bracket.

use super::state::State;
use super::vocabulary::{ground_tag, tags, TagId, Vocabulary};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered set of style tags; empty means unstyled text
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Style {
    tags: Vec<TagId>,
}

impl Style {
    /// Unstyled
    #[inline]
    pub fn new() -> Self {
        Self { tags: Vec::new() }
    }

    /// A style holding a single tag
    #[inline]
    pub fn of(tag: TagId) -> Self {
        Self { tags: vec![tag] }
    }

    /// A style holding the given tags, in order, without duplicates
    pub fn from_tags(tags: &[TagId]) -> Self {
        let mut style = Self::new();
        for &tag in tags {
            style.push(tag);
        }
        style
    }

    /// Append a tag unless already present
    #[inline]
    pub fn push(&mut self, tag: TagId) {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Insert a tag in front unless already present
    #[inline]
    pub fn prepend(&mut self, tag: TagId) {
        if !self.tags.contains(&tag) {
            self.tags.insert(0, tag);
        }
    }

    /// Builder form of [`push`](Self::push)
    #[inline]
    pub fn with(mut self, tag: TagId) -> Self {
        self.push(tag);
        self
    }

    /// Append every tag of `other`
    pub fn extend(&mut self, other: &Style) {
        for &tag in &other.tags {
            self.push(tag);
        }
    }

    /// Whether the style carries `tag`
    #[inline]
    pub fn contains(&self, tag: TagId) -> bool {
        self.tags.contains(&tag)
    }

    /// The tags, in order
    #[inline]
    pub fn tags(&self) -> &[TagId] {
        &self.tags
    }

    /// Whether this is unstyled text
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Render as space separated class names
    #[inline]
    pub fn display<'a>(&'a self, vocab: &'a Vocabulary) -> StyleDisplay<'a> {
        StyleDisplay { style: self, vocab }
    }
}

impl From<TagId> for Style {
    fn from(tag: TagId) -> Self {
        Self::of(tag)
    }
}

/// [`Display`](fmt::Display) adapter returned by [`Style::display`]
pub struct StyleDisplay<'a> {
    style: &'a Style,
    vocab: &'a Vocabulary,
}

impl fmt::Display for StyleDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &tag) in self.style.tags.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(self.vocab.name(tag))?;
        }
        Ok(())
    }
}

/// Nesting counter closed by a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    /// `{{template}}`
    Template,
    /// `[[link]]` and `[external link]`
    Link,
    /// Parser functions
    Ext,
}

// ============================================================================
// Composition
// ============================================================================

/// Ground tag for the state's current nesting, if any
#[inline]
pub fn ground(state: &State) -> Option<TagId> {
    let bucket = |depth: u32| depth.min(3) as u8;
    ground_tag(
        bucket(state.template_depth()),
        bucket(state.ext_depth()),
        state.link_depth() > 0,
    )
}

/// Ground + body
#[inline]
pub(crate) fn local(state: &State, mut body: Style) -> Style {
    if let Some(tag) = ground(state) {
        body.prepend(tag);
    }
    body
}

/// Ground + body, then decrement `counter`
#[inline]
pub(crate) fn closing(state: &mut State, body: Style, counter: Counter) -> Style {
    let style = local(state, body);
    state.decrement(counter);
    style
}

/// Ground + body + current bold / italic
#[inline]
pub(crate) fn styled(state: &State, mut body: Style) -> Style {
    let emphasis = state.emphasis();
    if emphasis.bold {
        body.push(tags::STRONG);
    }
    if emphasis.italic {
        body.push(tags::EM);
    }
    local(state, body)
}
