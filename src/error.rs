use core::fmt;

/// Result alias for `plotmeans`.
pub type Result<T> = std::result::Result<T, Error>;

/// Which collection an out-of-range index referred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Index into the point set.
    Point,
    /// Index into the centroid set.
    Cluster,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Point => write!(f, "point"),
            IndexKind::Cluster => write!(f, "cluster"),
        }
    }
}

/// Errors returned by the clustering engine, the demo shell and its collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was empty.
    EmptyInput,

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// A point or cluster index was outside its collection.
    IndexOutOfRange {
        /// Collection the index referred to.
        kind: IndexKind,
        /// Offending index.
        index: usize,
        /// Length of the collection.
        len: usize,
    },

    /// A classification trainer failed to produce a model.
    Training(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            Error::IndexOutOfRange { kind, index, len } => {
                write!(f, "{kind} index {index} out of range (len {len})")
            }
            Error::Training(msg) => write!(f, "training failed: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
