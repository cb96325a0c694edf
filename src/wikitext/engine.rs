//! Engine entry point
//!
//! The [`Engine`] is the host-facing surface of the tokenizer. It owns the
//! language configuration and the style vocabulary and implements the four
//! operations a line-oriented highlighting host drives:
//!
//! | Operation       | Purpose                                          |
//! |-----------------|--------------------------------------------------|
//! | `start_state`   | state at the beginning of a document             |
//! | `copy_state`    | independent snapshot, e.g. one per line          |
//! | `token`         | consume one token from a line, return its style  |
//! | `blank_line`    | notify the state of an empty line                |
//!
//! # Usage
//!
//! ```rust
//! use wikitext_lexer::wikitext::{Engine, LanguageConfig, LineCursor};
//!
//! let engine = Engine::new(LanguageConfig::default()).unwrap();
//! let mut state = engine.start_state();
//! let mut cursor = LineCursor::new("{{Infobox|name=Foo}}");
//!
//! let mut classes = Vec::new();
//! while !cursor.eol() {
//!     let style = engine.token(&mut cursor, &mut state);
//!     classes.push(engine.style_name(&style));
//! }
//! assert_eq!(classes[0], "mw-template-ground mw-template-bracket");
//! ```
//!
//! The engine is immutable while tokenizing (`token` takes `&self`), so one
//! engine can serve any number of documents, each with its own [`State`].

use super::config::{is_tag_name_char, LanguageConfig, TagMode, UrlProtocols};
use super::cursor::LineCursor;
use super::error::ConfigError;
use super::state::State;
use super::style::{self, Style};
use super::vocabulary::{ExtId, Vocabulary};

/// Context switches allowed without consuming input before a character is forced
const MAX_REDISPATCH: usize = 64;

/// Wikitext tokenizer
#[derive(Debug, Clone)]
pub struct Engine {
    config: LanguageConfig,
    vocabulary: Vocabulary,
    protocols: UrlProtocols,
}

impl Engine {
    /// Build an engine for the given wiki configuration
    ///
    /// Extension tags are registered in name order, so engines built from
    /// equal configurations hand out equal style tags.
    pub fn new(mut config: LanguageConfig) -> Result<Self, ConfigError> {
        config.normalize();
        config.validate()?;
        let protocols = UrlProtocols::new(&config.url_protocols)?;

        let mut vocabulary = Vocabulary::new();
        let mut names: Vec<&String> = config.extension_tags.keys().collect();
        names.sort();
        for name in names {
            vocabulary.register_extension(name);
        }

        log_debug!(
            "engine ready: {} html tags, {} extension tags, {} url protocols",
            config.html_tags.len(),
            config.extension_tags.len(),
            config.url_protocols.len()
        );

        Ok(Self {
            config,
            vocabulary,
            protocols,
        })
    }

    /// Build an engine from a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::new(LanguageConfig::from_json(json)?)
    }

    /// The (normalized) configuration
    #[inline]
    pub fn config(&self) -> &LanguageConfig {
        &self.config
    }

    /// Style tag names
    #[inline]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[inline]
    pub(crate) fn protocols(&self) -> &UrlProtocols {
        &self.protocols
    }

    /// Add an extension tag after construction
    pub fn register_extension_tag(
        &mut self,
        name: &str,
        mode: Option<TagMode>,
    ) -> Result<ExtId, ConfigError> {
        let name = name.to_lowercase();
        if name.is_empty() || !name.chars().all(is_tag_name_char) {
            return Err(ConfigError::InvalidTagName(name));
        }
        let id = self.vocabulary.register_extension(&name);
        self.config.extension_tags.insert(name, mode);
        Ok(id)
    }

    // ========================================================================
    // Host operations
    // ========================================================================

    /// State at the beginning of a document
    #[inline]
    pub fn start_state(&self) -> State {
        State::new()
    }

    /// Independent deep copy of `state`
    #[inline]
    pub fn copy_state(&self, state: &State) -> State {
        state.clone()
    }

    /// Consume one token from `cursor` and return its style
    ///
    /// Always consumes at least one character unless the cursor is already
    /// at the end of the line.
    #[inline]
    pub fn token(&self, cursor: &mut LineCursor<'_>, state: &mut State) -> Style {
        self.resolve_token(cursor, state)
    }

    /// Notify `state` of an empty line
    pub fn blank_line(&self, state: &mut State) {
        state.emphasis_mut().reset();
        if let Some(inner) = state
            .active_extension
            .as_mut()
            .and_then(|active| active.embedded.as_mut())
        {
            self.blank_line(inner);
        }
    }

    /// Space separated class names of `style`
    pub fn style_name(&self, style: &Style) -> String {
        style.display(&self.vocabulary).to_string()
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// One token without emphasis resolution
    pub(crate) fn raw_token(&self, c: &mut LineCursor<'_>, s: &mut State) -> Style {
        let start = c.pos();
        for _ in 0..MAX_REDISPATCH {
            if let Some(style) = self.dispatch(c, s) {
                if c.pos() <= start && !c.eol() {
                    log_debug!("no progress in {:?} at {}, forcing one character", s.context(), start);
                    c.set_pos(start);
                    c.next();
                }
                return style;
            }
        }
        log_debug!("too many context switches at {}, forcing one character", start);
        c.next();
        style::styled(s, Style::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wikitext::state::Context;
    use crate::wikitext::vocabulary::tags;

    fn engine() -> Engine {
        Engine::new(LanguageConfig::default()).unwrap()
    }

    fn tokens(engine: &Engine, line: &str, state: &mut State) -> Vec<(String, String)> {
        let mut cursor = LineCursor::new(line);
        let mut out = Vec::new();
        while !cursor.eol() {
            let start = cursor.pos();
            let style = engine.token(&mut cursor, state);
            assert!(cursor.pos() > start, "no progress at {} in {:?}", start, line);
            out.push((line[start..cursor.pos()].to_string(), engine.style_name(&style)));
        }
        out
    }

    #[test]
    fn test_extension_ids_are_deterministic() {
        let a = engine();
        let b = engine();
        for (id, entry) in a.vocabulary().extensions() {
            assert_eq!(b.vocabulary().extension(&entry.name), Some(id));
        }
    }

    #[test]
    fn test_register_extension_tag() {
        let mut engine = engine();
        let id = engine.register_extension_tag("Mapframe", None).unwrap();
        assert_eq!(engine.vocabulary().extension("mapframe"), Some(id));
        assert!(engine.config().is_extension_tag("mapframe"));
        assert!(matches!(
            engine.register_extension_tag("bad name", None),
            Err(ConfigError::InvalidTagName(_))
        ));

        let mut state = engine.start_state();
        let toks = tokens(&engine, "<mapframe>", &mut state);
        assert_eq!(toks[0].1, "mw-exttag-bracket mw-ext-mapframe");
    }

    #[test]
    fn test_from_json() {
        let engine = Engine::from_json(r#"{ "extensionTags": { "ref": "wikitext" } }"#).unwrap();
        assert!(engine.vocabulary().extension("ref").is_some());
        assert!(engine.vocabulary().extension("nowiki").is_none());
        assert!(Engine::from_json("[").is_err());
    }

    #[test]
    fn test_plain_text() {
        let engine = engine();
        let mut state = engine.start_state();
        let toks = tokens(&engine, "Hello world", &mut state);
        assert!(toks.iter().all(|(_, style)| style.is_empty()));
        assert_eq!(
            toks.iter().map(|(text, _)| text.as_str()).collect::<String>(),
            "Hello world"
        );
        assert!(state.is_balanced());
    }

    #[test]
    fn test_template_closes() {
        let engine = engine();
        let mut state = engine.start_state();
        let toks = tokens(&engine, "{{Foo}}", &mut state);
        assert_eq!(
            toks,
            vec![
                ("{{".to_string(), "mw-template-ground mw-template-bracket".to_string()),
                (
                    "Foo".to_string(),
                    "mw-template-ground mw-template-name mw-pagename".to_string()
                ),
                ("}}".to_string(), "mw-template-ground mw-template-bracket".to_string()),
            ]
        );
        assert_eq!(state.template_depth(), 0);
        assert_eq!(state.context(), &Context::Default);
    }

    #[test]
    fn test_blank_line_reaches_embedded_state() {
        let engine = engine();
        let mut state = engine.start_state();
        tokens(&engine, "<ref>'''bold", &mut state);
        assert!(state.active_extension().is_some());

        engine.blank_line(&mut state);
        let inner = state.active_extension().unwrap().embedded.as_ref().unwrap();
        assert!(!inner.emphasis().bold);
        assert!(!state.emphasis().bold);
    }

    #[test]
    fn test_token_at_eol_returns_unstyled() {
        let engine = engine();
        let mut state = engine.start_state();
        let mut cursor = LineCursor::new("");
        let style = engine.token(&mut cursor, &mut state);
        assert!(style.is_empty());
        assert!(!style.contains(tags::ERROR));
    }
}
