//! Typed errors for the compliance core.
//!
//! Format problems (malformed purls, malformed tag-value lines, unreadable
//! streams) and domain lookups that miss are the only conditions surfaced as
//! errors. License incompatibilities are ordinary checker results, never
//! errors.

use thiserror::Error;
use uuid::Uuid;

/// A document or reference that could not be decoded.
///
/// Always carries the 1-based line number or the offending fragment so the
/// failure can be located in the input.
#[derive(Error, Debug)]
pub enum FormatError {
    /// A package URL that does not follow the `pkg:` form.
    #[error("malformed package URL '{input}': {reason}")]
    Purl { input: String, reason: String },

    /// A line that is neither blank, comment, nor `Tag: value`.
    #[error("Line {line}: not in tag-value format")]
    Syntax { line: usize },

    /// A structurally valid line whose value cannot be applied.
    #[error("Line {line}: {detail}")]
    Value { line: usize, detail: String },

    /// A `<text>` span still open when the stream ended.
    #[error("Line {line}: <text> value is never closed")]
    UnterminatedText { line: usize },

    /// The underlying stream failed while reading.
    #[error("error reading SPDX stream")]
    Io(#[from] std::io::Error),
}

impl FormatError {
    pub fn purl(input: impl Into<String>, reason: impl Into<String>) -> Self {
        FormatError::Purl {
            input: input.into(),
            reason: reason.into(),
        }
    }
}

/// A domain entity addressed by an identifier that does not exist.
#[derive(Error, Debug)]
pub enum NotFoundError {
    #[error("unknown project {0}")]
    Project(Uuid),

    #[error("project has no dependency '{0}'")]
    Dependency(String),

    #[error("no package definition for '{0}'")]
    Package(String),
}
