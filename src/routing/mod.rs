pub(crate) mod path;
pub(crate) mod router;
pub(crate) mod trie;

use std::fmt::Display;

use http::Method;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported when a route set fails validation at build time.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// The same method + pattern was registered twice while the duplicate
    /// policy is `Reject`.
    DuplicateRoute { method: Method, pattern: String },
    /// A `*name` segment appeared in a non-final position.
    WildcardNotLast { pattern: String },
    /// A `:` or `*` appeared after the first character of a segment,
    /// e.g. `ab:x`. Parametric markers must occupy the whole segment.
    MixedSegment { pattern: String, segment: String },
    /// A `:` or `*` segment with an empty name.
    UnnamedParameter { pattern: String },
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateRoute { method, pattern } => {
                write!(f, "route {method} {pattern} is already registered")
            }
            Self::WildcardNotLast { pattern } => {
                write!(f, "wildcard segment must be last in pattern {pattern}")
            }
            Self::MixedSegment { pattern, segment } => {
                write!(
                    f,
                    "segment {segment} in pattern {pattern} mixes literal and parametric characters"
                )
            }
            Self::UnnamedParameter { pattern } => {
                write!(f, "parametric segment in pattern {pattern} has no name")
            }
        }
    }
}

impl std::error::Error for Error {}
