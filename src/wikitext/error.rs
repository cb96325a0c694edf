//! Error types
//!
//! Tokenizing itself never fails: malformed markup produces `mw-error`
//! styled tokens instead. Errors only arise when building an engine from a
//! configuration and when applying edits to an incremental highlighter.

use std::fmt;

/// Errors raised while loading or validating a [`LanguageConfig`](super::LanguageConfig)
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration JSON could not be parsed
    Json(serde_json::Error),
    /// A URL protocol entry is empty or could not be compiled
    InvalidProtocol(String),
    /// A tag name is empty or contains characters that can never form a tag name
    InvalidTagName(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "Invalid configuration JSON: {}", e),
            Self::InvalidProtocol(p) => write!(f, "Invalid URL protocol: {:?}", p),
            Self::InvalidTagName(name) => write!(f, "Invalid tag name: {:?}", name),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Errors raised by [`IncrementalHighlighter::apply_edit`](super::IncrementalHighlighter::apply_edit)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The edit touches lines past the end of the document
    LineOutOfRange {
        /// First line the edit touches
        first_line: usize,
        /// Number of lines the edit removes
        removed: usize,
        /// Lines currently in the document
        line_count: usize,
    },
    /// An inserted line contains a line break
    EmbeddedNewline {
        /// Index of the offending line within the edit
        index: usize,
    },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineOutOfRange {
                first_line,
                removed,
                line_count,
            } => write!(
                f,
                "Edit of lines {}..{} is out of range for a document of {} lines",
                first_line,
                first_line + removed,
                line_count
            ),
            Self::EmbeddedNewline { index } => {
                write!(f, "Inserted line {} contains a line break", index)
            }
        }
    }
}

impl std::error::Error for EditError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidProtocol(String::new());
        assert_eq!(err.to_string(), "Invalid URL protocol: \"\"");

        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = ConfigError::from(json_err);
        assert!(err.to_string().starts_with("Invalid configuration JSON"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_edit_error_display() {
        let err = EditError::LineOutOfRange {
            first_line: 4,
            removed: 2,
            line_count: 3,
        };
        assert_eq!(
            err.to_string(),
            "Edit of lines 4..6 is out of range for a document of 3 lines"
        );
    }
}
