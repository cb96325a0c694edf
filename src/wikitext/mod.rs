//! Incremental wikitext tokenizer
//!
//! This module contains the line-oriented tokenizer that turns MediaWiki
//! wikitext into styled tokens for editor highlighting.
//!
//! # Module Organization
//!
//! ## Core Types
//! - [`Engine`] - Tokenizer entry point (`start_state`, `token`, ...)
//! - [`State`] - Complete, copyable tokenizer state
//! - [`LineCursor`] - Position within the current line
//! - [`Style`] - Ordered set of style tags
//!
//! ## Configuration
//! - [`LanguageConfig`] - Tag lists, function synonyms, URL protocols
//! - [`vocabulary`] - Style tag names and their ids
//!
//! ## Error Handling
//! - [`ConfigError`] - Invalid configuration
//! - [`EditError`] - Invalid line edit
//!
//! ## Highlighting
//! - [`highlight`] - Whole-line and whole-document helpers
//! - [`incremental`] - Re-highlighting after line edits
//! - [`debug`] - Markup rendering and state summaries
//!
//! # Threading
//!
//! Everything here is synchronous. An [`Engine`] is immutable while
//! tokenizing, so it can be shared between threads; every [`State`] is owned
//! by exactly one caller.

// ============================================================================
// Logging
// ============================================================================

// Logging macros - no-op when logging feature is disabled
#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

// Logging macros - use log crate when logging feature is enabled
#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod cursor;
pub mod debug;
pub mod engine;
pub mod entities;
pub mod error;
pub mod highlight;
pub mod incremental;
pub mod state;
pub mod style;
pub mod vocabulary;

mod emphasis;
mod tokenizer;

// ============================================================================
// Core Types
// ============================================================================

pub use cursor::{is_space, LineCursor};
pub use engine::Engine;
pub use state::{ActiveExtension, BlockKind, Context, Emphasis, State, TagKind};
pub use style::{Counter, Style, StyleDisplay};

// ============================================================================
// Configuration
// ============================================================================

pub use config::{LanguageConfig, Synonyms, TagMode, UrlProtocols};
pub use vocabulary::{tags, ExtId, ExtensionEntry, TagId, Vocabulary};

// ============================================================================
// Error Handling
// ============================================================================

pub use error::{ConfigError, EditError};

// ============================================================================
// Highlighting
// ============================================================================

pub use debug::{render_markup, StateSummary};
pub use highlight::{highlight_document, highlight_line, StyledSpan};
pub use incremental::{IncrementalHighlighter, LineEdit, RehighlightResult};
