//! Error types for the tree runtime.

use thiserror::Error;

use crate::location::SourceLocation;

/// The structural rule a node violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    /// The node was produced by syntax-error recovery and can never be
    /// well-formed.
    #[error("node was produced by error recovery")]
    Erroneous,

    /// A `One` edge has no child bound.
    #[error("edge `{field}` is not bound")]
    Unbound { field: &'static str },

    /// A `Many` edge holds no elements.
    #[error("edge `{field}` requires at least one element")]
    Empty { field: &'static str },
}

/// A tree failed the well-formedness check.
///
/// Recoverable: callers typically surface this as a compiler diagnostic.
/// Carries the offending node's kind and, when the node has a source
/// location annotation, where it came from.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("node `{kind}`{} is not well-formed: {reason}", fmt_location(.location))]
#[must_use = "errors must not be silently ignored"]
pub struct NotWellFormed {
    pub kind: &'static str,
    pub location: Option<SourceLocation>,
    pub reason: Violation,
}

fn fmt_location(location: &Option<SourceLocation>) -> String {
    match location {
        Some(location) => format!(" at {location}"),
        None => String::new(),
    }
}

/// Fatal errors in the binary serialization format.
#[derive(Debug, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum FormatError {
    /// The kind discriminator is not part of the consuming schema.
    /// Indicates a schema or version mismatch.
    #[error("unknown node kind `{kind}`")]
    UnknownKind { kind: String },

    /// The input ended in the middle of a value.
    #[error("unexpected end of input")]
    Truncated,

    /// An unrecognized value tag byte.
    #[error("invalid value tag {tag:#04x} at offset {offset}")]
    InvalidTag { tag: u8, offset: u64 },

    /// A varint did not fit its target type.
    #[error("varint overflow")]
    VarintOverflow,

    /// A string was not valid UTF-8.
    #[error("invalid utf-8 in string")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A value had the wrong shape for its slot.
    #[error("expected {expected}, found {found}")]
    UnexpectedValue {
        expected: &'static str,
        found: &'static str,
    },

    /// A registered annotation failed to encode or decode.
    #[error("failed to (de)serialize annotation `{tag}`: {reason}")]
    Annotation { tag: String, reason: String },

    /// Input continued past the end of the encoded tree.
    #[error("trailing bytes after value")]
    TrailingBytes,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raised by visitor dispatch when neither a node's kind nor any ancestor
/// kind has a handler. A defect in the visiting code, not a routine
/// condition to catch silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum VisitError {
    #[error("no visitor handler for node kind `{kind}`")]
    UnhandledKind { kind: &'static str },
}
