//! Language configuration
//!
//! Describes the wiki the text is written for: which HTML tags are allowed,
//! which extension tags exist and how their bodies are lexed, the names of
//! parser functions and magic words, and the URL protocols that start
//! external links.
//!
//! # Usage
//!
//! ```rust
//! use wikitext_lexer::wikitext::LanguageConfig;
//!
//! let json = r#"{
//!     "extensionTags": { "ref": "wikitext", "nowiki": "text", "math": null },
//!     "urlProtocols": ["http://", "https://", "//"]
//! }"#;
//!
//! let config = LanguageConfig::from_json(json).unwrap();
//! assert!(config.is_extension_tag("ref"));
//! assert!(config.is_html_tag("div"));
//! ```
//!
//! Every field is optional in JSON; missing fields take the MediaWiki core
//! defaults.

use super::error::ConfigError;
use hashbrown::{HashMap, HashSet};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Characters that may not follow a URL protocol for it to start a link
#[inline]
pub(crate) fn is_url_terminator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '{' | '[' | ']' | '<' | '>' | '~' | ')' | '.' | ',' | '\'')
}

/// Characters that can never appear in a tag name
#[inline]
pub(crate) fn is_tag_name_char(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(
            c,
            '>' | '/' | '.' | '*' | ',' | '[' | ']' | '{' | '}' | '$' | '^' | '+' | '?' | '|'
                | '\\' | '\'' | '`' | '~' | '<' | '=' | '!' | '@' | '#' | '%' | '&' | '('
                | ')' | '-'
        )
}

/// How the body of an extension tag is lexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagMode {
    /// The body is wikitext, lexed by a nested engine state
    Wikitext,
    /// The body is plain text where only character entities are recognized
    Text,
}

/// A set of names matched either case-insensitively or case-sensitively
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Synonyms {
    /// Names matched regardless of case (stored lowercased)
    pub insensitive: HashSet<String>,
    /// Names matched exactly
    pub sensitive: HashSet<String>,
}

impl Synonyms {
    fn from_lists(insensitive: &[&str], sensitive: &[&str]) -> Self {
        Self {
            insensitive: insensitive.iter().map(|s| s.to_lowercase()).collect(),
            sensitive: sensitive.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Whether `name` is one of the synonyms
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.sensitive.contains(name) || self.insensitive.contains(&name.to_lowercase())
    }

    fn normalize(&mut self) {
        self.insensitive = std::mem::take(&mut self.insensitive)
            .into_iter()
            .map(|s| s.to_lowercase())
            .collect();
    }
}

/// Configuration of the wiki dialect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageConfig {
    /// HTML tags permitted in wikitext (lowercase)
    pub html_tags: HashSet<String>,
    /// HTML tags that never take a closing tag (lowercase)
    pub void_html_tags: HashSet<String>,
    /// Extension tags and how their body is lexed (`None` = opaque)
    pub extension_tags: HashMap<String, Option<TagMode>>,
    /// Parser function names usable without a leading `#`
    pub function_synonyms: Synonyms,
    /// Behavior switches such as `__NOTOC__` (including the underscores)
    pub double_underscore: Synonyms,
    /// URL protocols that start external links
    pub url_protocols: Vec<String>,
}

impl LanguageConfig {
    /// Load a configuration from JSON
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(s)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(ConfigError::from)
    }

    /// Lowercase every tag name and case-insensitive synonym
    pub fn normalize(&mut self) {
        let lowercase = |set: &mut HashSet<String>| {
            *set = std::mem::take(set)
                .into_iter()
                .map(|s| s.to_lowercase())
                .collect();
        };
        lowercase(&mut self.html_tags);
        lowercase(&mut self.void_html_tags);
        self.extension_tags = std::mem::take(&mut self.extension_tags)
            .into_iter()
            .map(|(name, mode)| (name.to_lowercase(), mode))
            .collect();
        self.function_synonyms.normalize();
        self.double_underscore.normalize();
    }

    /// Check that every entry can actually be recognized by the tokenizer
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tag_names = self
            .html_tags
            .iter()
            .chain(self.void_html_tags.iter())
            .chain(self.extension_tags.keys());
        for name in tag_names {
            if name.is_empty() || !name.chars().all(is_tag_name_char) {
                return Err(ConfigError::InvalidTagName(name.clone()));
            }
        }
        if let Some(p) = self.url_protocols.iter().find(|p| p.is_empty()) {
            return Err(ConfigError::InvalidProtocol(p.clone()));
        }
        Ok(())
    }

    /// Whether `name` (lowercase) is a permitted HTML tag
    #[inline]
    pub fn is_html_tag(&self, name: &str) -> bool {
        self.html_tags.contains(name)
    }

    /// Whether `name` (lowercase) is a void HTML tag
    #[inline]
    pub fn is_void_tag(&self, name: &str) -> bool {
        self.void_html_tags.contains(name)
    }

    /// Whether `name` (lowercase) is an extension tag
    #[inline]
    pub fn is_extension_tag(&self, name: &str) -> bool {
        self.extension_tags.contains_key(name)
    }

    /// Body mode of an extension tag (`None` when opaque or unknown)
    #[inline]
    pub fn extension_mode(&self, name: &str) -> Option<TagMode> {
        self.extension_tags.get(name).copied().flatten()
    }

    /// Whether `name` is a parser function usable without `#`
    #[inline]
    pub fn is_parser_function(&self, name: &str) -> bool {
        self.function_synonyms.contains(name)
    }

    /// Whether `word` (with its underscores) is a behavior switch
    #[inline]
    pub fn is_double_underscore(&self, word: &str) -> bool {
        self.double_underscore.contains(word)
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        let set = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<HashSet<_>>();
        let extension_tags = DEFAULT_EXTENSION_TAGS
            .iter()
            .map(|&(name, mode)| (name.to_string(), mode))
            .collect();

        Self {
            html_tags: set(DEFAULT_HTML_TAGS),
            void_html_tags: set(&["br", "hr", "wbr"]),
            extension_tags,
            function_synonyms: Synonyms::from_lists(
                DEFAULT_FUNCTIONS_INSENSITIVE,
                DEFAULT_FUNCTIONS_SENSITIVE,
            ),
            double_underscore: Synonyms::from_lists(
                DEFAULT_SWITCHES_INSENSITIVE,
                DEFAULT_SWITCHES_SENSITIVE,
            ),
            url_protocols: DEFAULT_URL_PROTOCOLS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ============================================================================
// URL protocols
// ============================================================================

/// Compiled URL protocol matcher
///
/// The protocols are tried longest first, so `ftps://` wins over `ftp://`,
/// and a match only counts when a link character follows it.
#[derive(Debug, Clone)]
pub struct UrlProtocols {
    regex: Option<Regex>,
}

impl UrlProtocols {
    /// Compile the given protocols
    pub fn new(protocols: &[String]) -> Result<Self, ConfigError> {
        if let Some(p) = protocols.iter().find(|p| p.is_empty()) {
            return Err(ConfigError::InvalidProtocol(p.clone()));
        }
        if protocols.is_empty() {
            return Ok(Self { regex: None });
        }

        let mut sorted: Vec<&String> = protocols.iter().collect();
        sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        sorted.dedup();
        let alternation = sorted
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");
        let regex = Regex::new(&format!("(?i)^(?:{})", alternation))
            .map_err(|e| ConfigError::InvalidProtocol(e.to_string()))?;
        Ok(Self { regex: Some(regex) })
    }

    /// Length of the protocol at the start of `text`, if one starts a link there
    pub fn match_at(&self, text: &str) -> Option<usize> {
        let m = self.regex.as_ref()?.find(text)?;
        match text[m.end()..].chars().next() {
            Some(c) if !is_url_terminator(c) => Some(m.end()),
            _ => None,
        }
    }
}

// ============================================================================
// Defaults (MediaWiki core)
// ============================================================================

const DEFAULT_HTML_TAGS: &[&str] = &[
    "b", "bdi", "bdo", "del", "i", "ins", "u", "font", "big", "small", "sub", "sup", "h1", "h2",
    "h3", "h4", "h5", "h6", "cite", "code", "em", "s", "strike", "strong", "tt", "var", "div",
    "center", "blockquote", "q", "ol", "ul", "dl", "table", "caption", "pre", "ruby", "rb", "rp",
    "rt", "rtc", "p", "span", "abbr", "dfn", "kbd", "samp", "data", "time", "mark", "br", "wbr",
    "hr", "li", "dt", "dd", "td", "th", "tr", "noinclude", "includeonly", "onlyinclude",
];

const DEFAULT_EXTENSION_TAGS: &[(&str, Option<TagMode>)] = &[
    ("nowiki", Some(TagMode::Text)),
    ("pre", Some(TagMode::Text)),
    ("ref", Some(TagMode::Wikitext)),
    ("references", Some(TagMode::Wikitext)),
    ("poem", Some(TagMode::Wikitext)),
    ("indicator", Some(TagMode::Wikitext)),
    ("gallery", None),
    ("math", None),
    ("chem", None),
    ("syntaxhighlight", None),
    ("source", None),
    ("templatedata", None),
    ("templatestyles", None),
    ("score", None),
    ("timeline", None),
    ("hiero", None),
    ("imagemap", None),
    ("inputbox", None),
    ("categorytree", None),
    ("charinsert", None),
    ("section", None),
];

const DEFAULT_FUNCTIONS_INSENSITIVE: &[&str] = &[
    "ns", "nse", "urlencode", "lcfirst", "ucfirst", "lc", "uc", "localurl", "localurle",
    "fullurl", "fullurle", "canonicalurl", "canonicalurle", "formatnum", "grammar", "gender",
    "plural", "bidi", "padleft", "padright", "anchorencode", "filepath", "pageid", "int", "msg",
    "msgnw", "raw", "subst", "safesubst", "special", "speciale", "tag", "formatdate", "#if",
    "#ifeq", "#ifexist", "#ifexpr", "#iferror", "#switch", "#expr", "#time", "#timel",
    "#rel2abs", "#titleparts", "#invoke", "#tag", "#language", "#special", "#speciale",
];

const DEFAULT_FUNCTIONS_SENSITIVE: &[&str] = &[
    "!", "=", "DISPLAYTITLE", "DEFAULTSORT", "DEFAULTSORTKEY", "DEFAULTCATEGORYSORT",
    "PAGESINCATEGORY", "PAGESINCAT", "PAGESIZE", "PROTECTIONLEVEL", "PROTECTIONEXPIRY",
    "NUMBEROFPAGES", "NUMBEROFUSERS", "NUMBEROFARTICLES", "NUMBEROFFILES", "NUMBEROFADMINS",
    "NUMBEROFEDITS", "NUMBERINGROUP", "NAMESPACE", "NAMESPACEE", "NAMESPACENUMBER",
    "TALKSPACE", "SUBJECTSPACE", "ARTICLESPACE", "PAGENAME", "PAGENAMEE", "FULLPAGENAME",
    "FULLPAGENAMEE", "BASEPAGENAME", "ROOTPAGENAME", "SUBPAGENAME", "TALKPAGENAME",
    "SUBJECTPAGENAME", "ARTICLEPAGENAME", "REVISIONID", "REVISIONDAY", "REVISIONMONTH",
    "REVISIONYEAR", "REVISIONTIMESTAMP", "REVISIONUSER", "CASCADINGSOURCES", "SITENAME",
    "SERVER", "SERVERNAME", "SCRIPTPATH", "CURRENTYEAR", "CURRENTMONTH", "CURRENTDAY",
    "CURRENTTIME", "CURRENTTIMESTAMP", "LOCALYEAR", "LOCALMONTH", "LOCALDAY", "LOCALTIME",
];

const DEFAULT_SWITCHES_INSENSITIVE: &[&str] = &[
    "__notoc__", "__nogallery__", "__forcetoc__", "__toc__", "__noeditsection__",
    "__notitleconvert__", "__notc__", "__nocontentconvert__", "__nocc__", "__newsectionlink__",
    "__nonewsectionlink__", "__hiddencat__", "__index__", "__noindex__", "__staticredirect__",
    "__expectunusedcategory__", "__disambig__",
];

const DEFAULT_SWITCHES_SENSITIVE: &[&str] = &["__EXPECTED_UNCONNECTED_PAGE__"];

const DEFAULT_URL_PROTOCOLS: &[&str] = &[
    "bitcoin:", "ftp://", "ftps://", "geo:", "git://", "gopher://", "http://", "https://",
    "irc://", "ircs://", "magnet:", "mailto:", "matrix:", "mms://", "news:", "nntp://",
    "redis://", "sftp://", "sip:", "sips:", "sms:", "ssh://", "svn://", "tel:", "telnet://",
    "urn:", "worldwind://", "xmpp:", "//",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LanguageConfig::default();
        assert!(config.is_html_tag("div"));
        assert!(config.is_void_tag("br"));
        assert!(!config.is_void_tag("div"));
        assert_eq!(config.extension_mode("ref"), Some(TagMode::Wikitext));
        assert_eq!(config.extension_mode("nowiki"), Some(TagMode::Text));
        assert!(config.is_extension_tag("math"));
        assert_eq!(config.extension_mode("math"), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_synonym_case_sensitivity() {
        let config = LanguageConfig::default();
        assert!(config.is_parser_function("LC"));
        assert!(config.is_parser_function("lc"));
        assert!(config.is_parser_function("PAGENAME"));
        assert!(!config.is_parser_function("pagename"));
        assert!(config.is_double_underscore("__NOTOC__"));
        assert!(config.is_double_underscore("__notoc__"));
        assert!(!config.is_double_underscore("__expected_unconnected_page__"));
    }

    #[test]
    fn test_from_json_partial() {
        let json = r#"{
            "htmlTags": ["SPAN"],
            "extensionTags": { "Ref": "wikitext", "math": null },
            "functionSynonyms": { "insensitive": ["LC"] }
        }"#;
        let config = LanguageConfig::from_json(json).unwrap();
        assert!(config.is_html_tag("span"));
        assert!(!config.is_html_tag("div"));
        assert_eq!(config.extension_mode("ref"), Some(TagMode::Wikitext));
        assert!(config.is_extension_tag("math"));
        assert!(config.is_parser_function("lc"));
        assert!(!config.is_parser_function("PAGENAME"));
        // missing fields keep their defaults
        assert!(config.is_void_tag("br"));
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(
            LanguageConfig::from_json("{"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            LanguageConfig::from_json(r#"{ "urlProtocols": [""] }"#),
            Err(ConfigError::InvalidProtocol(_))
        ));
        assert!(matches!(
            LanguageConfig::from_json(r#"{ "htmlTags": ["my tag"] }"#),
            Err(ConfigError::InvalidTagName(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let config = LanguageConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(LanguageConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_url_protocols() {
        let protocols = UrlProtocols::new(&LanguageConfig::default().url_protocols).unwrap();
        assert_eq!(protocols.match_at("https://example.org"), Some(8));
        assert_eq!(protocols.match_at("HTTP://example.org"), Some(7));
        assert_eq!(protocols.match_at("ftps://x"), Some(7));
        assert_eq!(protocols.match_at("mailto:me@example.org"), Some(7));
        assert_eq!(protocols.match_at("http:// spaced"), None);
        assert_eq!(protocols.match_at("http://"), None);
        assert_eq!(protocols.match_at("//example.org"), Some(2));
        assert_eq!(protocols.match_at("example.org"), None);
    }

    #[test]
    fn test_no_protocols() {
        let protocols = UrlProtocols::new(&[]).unwrap();
        assert_eq!(protocols.match_at("http://x"), None);
        assert!(UrlProtocols::new(&[String::new()]).is_err());
    }
}
