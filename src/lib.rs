//! wikitext-lexer - Restartable Wikitext Tokenizer for Editor Highlighting
//!
//! This crate tokenizes MediaWiki wikitext one line at a time for syntax
//! highlighting in editors. It provides:
//! - A line-oriented tokenizer whose complete state is a plain, copyable value
//! - Templates, parser functions, links, tables, HTML and extension tags
//! - Bold / italic resolution following the MediaWiki apostrophe rules
//! - Nested tokenizing of extension tag bodies (`<ref>`, `<poem>`, ...)
//! - Incremental re-highlighting after line edits
//! - Developer tools (markup rendering, state summaries)
//!
//! ## Quick Start
//!
//! ```rust
//! use wikitext_lexer::wikitext::{Engine, LanguageConfig, LineCursor};
//!
//! let engine = Engine::new(LanguageConfig::default()).unwrap();
//! let mut state = engine.start_state();
//!
//! for line in "== Heading ==\n[[Main Page|home]]".lines() {
//!     let mut cursor = LineCursor::new(line);
//!     while !cursor.eol() {
//!         let start = cursor.pos();
//!         let style = engine.token(&mut cursor, &mut state);
//!         println!("{:?} -> {}", &line[start..cursor.pos()], engine.style_name(&style));
//!     }
//! }
//! ```
//!
//! ## Configuration via JSON
//!
//! ```rust
//! use wikitext_lexer::wikitext::Engine;
//!
//! let engine = Engine::from_json(r#"{
//!     "extensionTags": { "ref": "wikitext", "math": null },
//!     "urlProtocols": ["http://", "https://", "//"]
//! }"#).unwrap();
//! assert!(engine.config().is_extension_tag("math"));
//! ```
//!
//! ## Feature Flags
//!
//! - `logging` - Enable debug logging using the `log` crate

// Lint configuration for production quality
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all)]
#![allow(clippy::new_without_default)]
// Allow some pedantic lints that are too noisy
#![allow(clippy::module_inception)]
#![allow(clippy::redundant_closure)]

// Prelude module for convenient imports
pub mod prelude;

// Tokenizer core
pub mod wikitext;

/// Re-export commonly used types for convenience
pub use wikitext::{
    // Debug tools
    debug::{render_markup, StateSummary},
    // Highlighting
    highlight::{highlight_document, highlight_line, StyledSpan},
    // Incremental re-highlighting
    incremental::{IncrementalHighlighter, LineEdit, RehighlightResult},
    ConfigError,
    EditError,
    Engine,
    LanguageConfig,
    LineCursor,
    State,
    Style,
};
