//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from wikitext-lexer.
//! Importing this module with a wildcard import brings the core types into scope:
//!
//! ```
//! use wikitext_lexer::prelude::*;
//! ```
//!
//! # Re-exported Items
//!
//! ## Core Types
//! - [`Engine`] - Tokenizer entry point
//! - [`State`] - Tokenizer state
//! - [`LineCursor`] - Position within the current line
//! - [`Style`] - Ordered set of style tags
//! - [`LanguageConfig`] - Wiki configuration
//!
//! ## Highlighting
//! - [`highlight_line()`] - Tokenize one line into spans
//! - [`highlight_document()`] - Tokenize a whole document
//! - [`IncrementalHighlighter`] - Re-highlight after line edits
//! - [`LineEdit`] - A change to the document's lines
//!
//! ## Error Handling
//! - [`ConfigError`] - Invalid configuration
//! - [`EditError`] - Invalid line edit

// ============================================================================
// Core Types
// ============================================================================

pub use crate::wikitext::{Engine, LanguageConfig, LineCursor, State, Style, TagMode};

// ============================================================================
// Highlighting
// ============================================================================

pub use crate::wikitext::{
    highlight_document, highlight_line, IncrementalHighlighter, LineEdit, RehighlightResult,
    StyledSpan,
};

// ============================================================================
// Error Handling
// ============================================================================

pub use crate::wikitext::{ConfigError, EditError};
