//! Error types for healing.

use std::path::PathBuf;

use ui_lint_ts::ParseFailure;

/// A transformer could not rewrite its target.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The fix context lacks a key the transformer needs.
    #[error("missing argument `{0}`")]
    MissingArgument(String),

    /// The target is no longer present in the current tree.
    #[error("{0} not found")]
    NotFound(String),

    /// The target has a shape this transformer does not handle.
    #[error("unsupported shape: {0}")]
    Unsupported(String),

    /// A mutation could not be re-parsed.
    #[error(transparent)]
    Parse(#[from] ParseFailure),
}

/// Applying one fix descriptor failed. The unit keeps its pre-fix text.
#[derive(Debug, thiserror::Error)]
pub enum FixError {
    /// No transformer is registered under this id.
    #[error("unknown transformer `{0}`")]
    UnknownTransformer(String),

    /// A registered transformer returned an error.
    #[error("transformer `{id}` failed: {source}")]
    Transform {
        /// Transformer id.
        id: String,
        /// Underlying error.
        #[source]
        source: TransformError,
    },

    /// A registered transformer panicked.
    #[error("transformer `{id}` panicked: {message}")]
    Panicked {
        /// Transformer id.
        id: String,
        /// Panic payload.
        message: String,
    },

    /// A `ReplacePattern` regex did not compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// A `ReplacePattern` regex matched nothing.
    #[error("pattern `{0}` matched nothing")]
    NoMatch(String),

    /// The fix left the unit unchanged.
    #[error("fix made no change")]
    NoChange,

    /// An earlier fix rewrote the line this fix addresses.
    #[error("line {0} was rewritten by an earlier fix")]
    StaleLine(usize),

    /// The addressed line does not exist.
    #[error("line {0} is out of range")]
    LineOutOfRange(usize),

    /// Manual fixes are never applied.
    #[error("manual fixes are never applied")]
    Manual,

    /// A line edit could not be re-parsed.
    #[error(transparent)]
    Parse(#[from] ParseFailure),
}

impl FixError {
    pub(crate) fn transform(id: &str, source: TransformError) -> Self {
        Self::Transform {
            id: id.to_string(),
            source,
        }
    }
}

/// Flushing one staged write failed.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// Creating, writing or removing a file failed.
    #[error("{op} {}: {source}", path.display())]
    Io {
        /// What was attempted (`write`, `create directory for`, `rename`, `remove`).
        op: &'static str,
        /// Affected path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl WriteError {
    /// The path the failure concerns.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } => path,
        }
    }
}
