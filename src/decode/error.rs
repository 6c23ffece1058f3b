//! Errors that can occur during decoding
//!
//! Decoding is fail-fast: the first error aborts the whole decode and
//! is returned to the caller with enough context to locate the problem
//! in the source document. Nothing in the decoder panics on malformed
//! input.

use crate::org::parser::ParseError;
use std::fmt;

/// Errors that can occur while decoding a node sequence into a target.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// A node kind incompatible with the target's classification, e.g.
    /// a tagged headline fed into a sequence target.
    ShapeMismatch {
        expected: &'static str,
        node: String,
    },
    /// The key/value extractor cannot derive a key from a node.
    UnresolvableKey {
        what: &'static str,
        node: String,
    },
    /// An error raised while decoding one key's value, wrapped with the
    /// originating key.
    Field {
        key: String,
        source: Box<DecodeError>,
    },
    /// Passed through unmodified from the parser.
    Parse(ParseError),
}

impl DecodeError {
    pub(crate) fn shape_mismatch(expected: &'static str, node: &crate::org::ast::Node) -> Self {
        DecodeError::ShapeMismatch {
            expected,
            node: describe(node),
        }
    }

    pub(crate) fn unresolvable_key(what: &'static str, node: &crate::org::ast::Node) -> Self {
        DecodeError::UnresolvableKey {
            what,
            node: describe(node),
        }
    }

    pub(crate) fn field(key: &str, source: DecodeError) -> Self {
        DecodeError::Field {
            key: key.to_string(),
            source: Box::new(source),
        }
    }

    /// The key path accumulated through nested field errors.
    pub fn key_path(&self) -> Vec<&str> {
        match self {
            DecodeError::Field { key, source } => {
                let mut path = vec![key.as_str()];
                path.extend(source.key_path());
                path
            }
            _ => vec![],
        }
    }
}

/// First line of the node's org rendering, for error messages.
fn describe(node: &crate::org::ast::Node) -> String {
    node.to_string().lines().next().unwrap_or("").to_string()
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::ShapeMismatch { expected, node } => {
                write!(f, "cannot decode {:?} into {}", node, expected)
            }
            DecodeError::UnresolvableKey { what, node } => {
                write!(f, "cannot treat {} as key/value pairs: {:?}", what, node)
            }
            DecodeError::Field { key, source } => write!(f, "key ({}): {}", key, source),
            DecodeError::Parse(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Field { source, .. } => Some(source.as_ref()),
            DecodeError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParseError> for DecodeError {
    fn from(err: ParseError) -> Self {
        DecodeError::Parse(err)
    }
}
