use std::path::PathBuf;

use thiserror::Error;

/// Parsing errors.
///
/// Defines all error types that can occur while splitting a document into
/// blocks or while tokenizing and reducing a line of code. Parse errors
/// include unknown block identifiers, unterminated blocks, and tokens that
/// appear where the grammar does not allow them.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types raised by the call registry and by evaluation:
/// import conflicts, unresolvable types, malformed signatures, and
/// invocations for which no handle or overload exists.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// Any error that aborts loading a document.
///
/// Registry errors carry no position of their own; the document driver
/// attaches the line of the statement that triggered them.
#[derive(Debug, Error)]
pub enum Error {
    /// The document or one of its code lines could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A registration or invocation failed while evaluating a code line.
    #[error("Error on line {line}: {source}")]
    Runtime {
        /// The source line of the failing statement.
        line:   usize,
        /// The underlying registry or evaluation error.
        #[source]
        source: RuntimeError,
    },
    /// The default host library could not be installed.
    #[error("Failed to install the host library: {0}")]
    Library(#[source] RuntimeError),
    /// The document file could not be read.
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        /// The path that was being read.
        path:   PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Wraps a runtime error with the line it was raised on.
    #[must_use]
    pub const fn runtime(source: RuntimeError, line: usize) -> Self {
        Self::Runtime { line, source }
    }

    /// Returns the runtime error inside this error, if it is one.
    #[must_use]
    pub const fn as_runtime(&self) -> Option<&RuntimeError> {
        match self {
            Self::Runtime { source, .. } => Some(source),
            _ => None,
        }
    }
}
