//! Style tag vocabulary
//!
//! Every token style is a set of named tags such as `mw-template-name` or
//! `mw-link-ground`. Tags are interned as [`TagId`]s so that styles are
//! cheap to build, compare and serialize. The vocabulary maps ids back to
//! their class names for hosts that render CSS classes.
//!
//! # Layout
//!
//! ```text
//! 0 ..................... builtin tags   (constants in `tags`)
//! GROUND_BASE ........... 31 ground tags (template x ext x link nesting)
//! DYNAMIC_BASE .......... per extension tag: `mw-ext-NAME`, `mw-tag-NAME`
//! ```
//!
//! Builtin and ground ids are fixed, so styles produced by different
//! engines with the same configuration are comparable.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Interned style tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TagId(pub u16);

/// Handle to a registered extension tag (`ref`, `nowiki`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExtId(pub u16);

macro_rules! builtin_tags {
    ($($ident:ident => $name:literal,)*) => {
        #[allow(non_camel_case_types, clippy::upper_case_acronyms)]
        #[repr(u16)]
        enum Builtin { $($ident,)* __Count }

        /// Builtin style tags
        pub mod tags {
            use super::{Builtin, TagId};
            $(
                #[doc = concat!("`", $name, "`")]
                pub const $ident: TagId = TagId(Builtin::$ident as u16);
            )*
        }

        const BUILTIN_NAMES: &[&str] = &[$($name,)*];
    };
}

builtin_tags! {
    APOSTROPHES => "mw-apostrophes",
    APOSTROPHES_BOLD => "mw-apostrophes-bold",
    APOSTROPHES_ITALIC => "mw-apostrophes-italic",
    COMMENT => "mw-comment",
    DOUBLE_UNDERSCORE => "mw-double-underscore",
    EM => "mw-em",
    ERROR => "mw-error",
    EXTLINK => "mw-extlink",
    EXTLINK_BRACKET => "mw-extlink-bracket",
    EXTLINK_PROTOCOL => "mw-extlink-protocol",
    EXTLINK_TEXT => "mw-extlink-text",
    EXTTAG => "mw-exttag",
    EXTTAG_ATTRIBUTE => "mw-exttag-attribute",
    EXTTAG_BRACKET => "mw-exttag-bracket",
    EXTTAG_NAME => "mw-exttag-name",
    FREE_EXTLINK => "mw-free-extlink",
    FREE_EXTLINK_PROTOCOL => "mw-free-extlink-protocol",
    HR => "mw-hr",
    HTML_ENTITY => "mw-html-entity",
    HTMLTAG_ATTRIBUTE => "mw-htmltag-attribute",
    HTMLTAG_BRACKET => "mw-htmltag-bracket",
    HTMLTAG_NAME => "mw-htmltag-name",
    INDENTING => "mw-indenting",
    LINK => "mw-link",
    LINK_BRACKET => "mw-link-bracket",
    LINK_DELIMITER => "mw-link-delimiter",
    LINK_PAGENAME => "mw-link-pagename",
    LINK_TEXT => "mw-link-text",
    LINK_TOSECTION => "mw-link-tosection",
    LIST => "mw-list",
    PAGENAME => "mw-pagename",
    PARSER_FUNCTION => "mw-parserfunction",
    PARSER_FUNCTION_BRACKET => "mw-parserfunction-bracket",
    PARSER_FUNCTION_DELIMITER => "mw-parserfunction-delimiter",
    PARSER_FUNCTION_NAME => "mw-parserfunction-name",
    SECTION => "mw-section",
    SECTION_HEADER => "mw-section-header",
    SECTION_1 => "mw-section-1",
    SECTION_2 => "mw-section-2",
    SECTION_3 => "mw-section-3",
    SECTION_4 => "mw-section-4",
    SECTION_5 => "mw-section-5",
    SECTION_6 => "mw-section-6",
    SIGNATURE => "mw-signature",
    SKIP_FORMATTING => "mw-skipformatting",
    STRONG => "mw-strong",
    TABLE_BRACKET => "mw-table-bracket",
    TABLE_CAPTION => "mw-table-caption",
    TABLE_DEFINITION => "mw-table-definition",
    TABLE_DELIMITER => "mw-table-delimiter",
    TEMPLATE => "mw-template",
    TEMPLATE_ARGUMENT_NAME => "mw-template-argument-name",
    TEMPLATE_BRACKET => "mw-template-bracket",
    TEMPLATE_DELIMITER => "mw-template-delimiter",
    TEMPLATE_NAME => "mw-template-name",
    TEMPLATE_VARIABLE => "mw-templatevariable",
    TEMPLATE_VARIABLE_BRACKET => "mw-templatevariable-bracket",
    TEMPLATE_VARIABLE_DELIMITER => "mw-templatevariable-delimiter",
    TEMPLATE_VARIABLE_NAME => "mw-templatevariable-name",
}

/// Number of builtin tags
pub const BUILTIN_COUNT: u16 = Builtin::__Count as u16;

/// First ground tag id
pub const GROUND_BASE: u16 = BUILTIN_COUNT;

/// Number of ground tags (4 template levels x 4 ext levels x 2 link levels, minus "none")
pub const GROUND_COUNT: u16 = 31;

/// First id handed out at runtime
pub const DYNAMIC_BASE: u16 = GROUND_BASE + GROUND_COUNT;

/// Section level tag for a heading of `level` equals signs (clamped to 1..=6)
#[inline]
pub fn section_level(level: usize) -> TagId {
    let level = level.clamp(1, 6) as u16;
    TagId(tags::SECTION_1.0 + level - 1)
}

/// Ground tag for the given (already clamped) nesting buckets
///
/// Returns `None` when nothing is open.
#[inline]
pub fn ground_tag(template: u8, ext: u8, link: bool) -> Option<TagId> {
    let index = u16::from(template.min(3)) * 8 + u16::from(ext.min(3)) * 2 + u16::from(link);
    if index == 0 {
        None
    } else {
        Some(TagId(GROUND_BASE + index - 1))
    }
}

fn ground_name(index: u16) -> String {
    const LEVELS: [&str; 4] = ["", "", "2", "3"];
    let template = (index / 8) as usize;
    let ext = ((index / 2) % 4) as usize;
    let link = index % 2 == 1;

    let mut name = String::from("mw");
    if template > 0 {
        name.push_str("-template");
        name.push_str(LEVELS[template]);
    }
    if ext > 0 {
        name.push_str("-ext");
        name.push_str(LEVELS[ext]);
    }
    if link {
        name.push_str("-link");
    }
    name.push_str("-ground");
    name
}

/// Tags belonging to one registered extension tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionEntry {
    /// Lowercased tag name
    pub name: String,
    /// `mw-ext-NAME`, carried by the tag's brackets and name
    pub ext_tag: TagId,
    /// `mw-tag-NAME`, prefixed to tokens of the tag body
    pub body_tag: TagId,
}

/// Interning table for style tags
#[derive(Debug, Clone)]
pub struct Vocabulary {
    names: Vec<String>,
    ids: HashMap<String, TagId>,
    extensions: Vec<ExtensionEntry>,
    extension_ids: HashMap<String, ExtId>,
}

impl Vocabulary {
    /// Create a vocabulary holding the builtin and ground tags
    pub fn new() -> Self {
        let mut vocab = Self {
            names: Vec::with_capacity(DYNAMIC_BASE as usize + 32),
            ids: HashMap::with_capacity(DYNAMIC_BASE as usize + 32),
            extensions: Vec::new(),
            extension_ids: HashMap::new(),
        };
        for name in BUILTIN_NAMES {
            vocab.register(name);
        }
        for index in 1..=GROUND_COUNT {
            vocab.register(&ground_name(index));
        }
        vocab
    }

    /// Intern `name`, returning the existing id if already known
    pub fn register(&mut self, name: &str) -> TagId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = TagId(self.names.len() as u16);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Look up an interned tag
    #[inline]
    pub fn lookup(&self, name: &str) -> Option<TagId> {
        self.ids.get(name).copied()
    }

    /// Class name of a tag (empty for ids this vocabulary never issued)
    #[inline]
    pub fn name(&self, id: TagId) -> &str {
        self.names.get(id.0 as usize).map_or("", String::as_str)
    }

    /// Number of interned tags
    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the vocabulary is empty (never true after construction)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Register an extension tag name and its two style tags
    pub fn register_extension(&mut self, name: &str) -> ExtId {
        let name = name.to_lowercase();
        if let Some(&id) = self.extension_ids.get(&name) {
            return id;
        }
        let ext_tag = self.register(&format!("mw-ext-{}", name));
        let body_tag = self.register(&format!("mw-tag-{}", name));
        let id = ExtId(self.extensions.len() as u16);
        self.extensions.push(ExtensionEntry {
            name: name.clone(),
            ext_tag,
            body_tag,
        });
        self.extension_ids.insert(name, id);
        id
    }

    /// Find a registered extension tag by (lowercased) name
    #[inline]
    pub fn extension(&self, name: &str) -> Option<ExtId> {
        self.extension_ids.get(name).copied()
    }

    /// Entry of a registered extension tag
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this vocabulary.
    #[inline]
    pub fn extension_entry(&self, id: ExtId) -> &ExtensionEntry {
        &self.extensions[id.0 as usize]
    }

    /// All registered extension tags, in registration order
    pub fn extensions(&self) -> impl Iterator<Item = (ExtId, &ExtensionEntry)> {
        self.extensions
            .iter()
            .enumerate()
            .map(|(i, entry)| (ExtId(i as u16), entry))
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}
