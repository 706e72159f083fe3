//! Error and warning types.
use crate::Mark;
use std::fmt::{Display, Formatter, Result as FmtResult};
use thiserror::Error as ThisError;

/// Result type alias of this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The class of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed source text.
    Structural,
    /// Tags, aliases, anchors or keys that cannot be resolved.
    Resolution,
    /// Invalid schema or dumper configuration.
    SchemaConfig,
    /// A value the dumper cannot represent.
    Unacceptable,
}

/// Errors raised by loading and dumping.
///
/// Errors from source text carry a [`Mark`] rendered as a snippet:
///
/// ```
/// use yaml_codec::{load, ErrorKind, LoadOptions};
///
/// let err = load("a: 1\na: 2\n", LoadOptions::default()).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Resolution);
/// assert_eq!(err.mark().unwrap().line, 1);
/// ```
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum Error {
    /// Malformed directive, bad indentation, missing separators.
    #[error("{msg}\n\n{mark}")]
    Syntax { msg: String, mark: Mark },
    /// End of the document or stream inside a quoted scalar.
    #[error("{msg}\n\n{mark}")]
    UnterminatedScalar { msg: String, mark: Mark },
    /// Unknown explicit tag.
    #[error("unknown tag !<{tag}>\n\n{mark}")]
    UnknownTag { tag: String, mark: Mark },
    /// The explicit tag does not accept the node.
    #[error("{msg}\n\n{mark}")]
    TagMismatch { tag: String, msg: String, mark: Mark },
    /// The alias refers to no anchor.
    #[error("unidentified alias \"{name}\"\n\n{mark}")]
    UnknownAlias { name: String, mark: Mark },
    /// An alias node carries a tag or an anchor.
    #[error("alias node should not have any properties\n\n{mark}")]
    AliasWithProperties { mark: Mark },
    /// A node carries two tags or two anchors.
    #[error("duplication of {property} property\n\n{mark}")]
    DuplicateProperty {
        property: &'static str,
        mark: Mark,
    },
    /// The same key appears twice in a mapping.
    #[error("duplicated mapping key\n\n{mark}")]
    DuplicateKey { mark: Mark },
    /// The merge source is not a mapping.
    #[error("cannot merge mappings; the provided source object is unacceptable\n\n{mark}")]
    InvalidMerge { mark: Mark },
    /// A single document was expected.
    #[error("expected a single document in the stream, but found more\n\n{mark}")]
    MultipleDocuments { mark: Mark },
    /// Schema construction failed.
    #[error("schema error: {0}")]
    Schema(String),
    /// The style requested for a tag is not provided by its type.
    #[error("!<{tag}> tag resolver accepts not \"{style}\" style")]
    InvalidStyle { tag: String, style: String },
    /// The dumper has no representation for the value.
    #[error("unacceptable kind of an object to dump: {0}")]
    UnacceptableValue(String),
    /// A cycle was found while references are disabled.
    #[error("cannot dump a cyclic structure without references")]
    CyclicValue,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Syntax { .. } | Self::UnterminatedScalar { .. } => ErrorKind::Structural,
            Self::UnknownTag { .. }
            | Self::TagMismatch { .. }
            | Self::UnknownAlias { .. }
            | Self::AliasWithProperties { .. }
            | Self::DuplicateProperty { .. }
            | Self::DuplicateKey { .. }
            | Self::InvalidMerge { .. }
            | Self::MultipleDocuments { .. } => ErrorKind::Resolution,
            Self::Schema(_) | Self::InvalidStyle { .. } => ErrorKind::SchemaConfig,
            Self::UnacceptableValue(_) | Self::CyclicValue => ErrorKind::Unacceptable,
        }
    }

    /// The source location, if this error comes from source text.
    pub fn mark(&self) -> Option<&Mark> {
        match self {
            Self::Syntax { mark, .. }
            | Self::UnterminatedScalar { mark, .. }
            | Self::UnknownTag { mark, .. }
            | Self::TagMismatch { mark, .. }
            | Self::UnknownAlias { mark, .. }
            | Self::AliasWithProperties { mark }
            | Self::DuplicateProperty { mark, .. }
            | Self::DuplicateKey { mark }
            | Self::InvalidMerge { mark }
            | Self::MultipleDocuments { mark } => Some(mark),
            Self::Schema(_)
            | Self::InvalidStyle { .. }
            | Self::UnacceptableValue(_)
            | Self::CyclicValue => None,
        }
    }
}

/// A non-fatal condition met while loading.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    /// Description of the condition.
    pub msg: String,
    /// Where it happened.
    pub mark: Mark,
}

impl Display for Warning {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}\n\n{}", self.msg, self.mark)
    }
}
