//! # interplay
//!
//! interplay is an interpreter for literate documents that describe a
//! program's expected interaction. A document mixes plain text with code:
//! code registers host constructors and operations by textual signature,
//! creates values and binds them to names, and plain text lines become
//! interaction entries in which `$name` references are substituted.
//!
//! ```
//! use interplay::{config::InterpreterConfig, load_document};
//!
//! let source = "<code>\nimport java.util.ArrayList\nconstructor ArrayList()\nx = new \
//!               ArrayList()\n</code>\n$x add";
//! let document = load_document(source, &InterpreterConfig::default()).unwrap();
//!
//! assert_eq!(document.entries()[0].to_string(), "[] add\n");
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::{fs, path::Path};

use crate::{
    config::InterpreterConfig,
    error::Error,
    interpreter::document::core::Document,
};

/// The default host library.
///
/// Declares a small set of `java.lang` and `java.util` types with native
/// implementations, plus the marker types documents use to annotate
/// interactions. Documents load it unless the configuration disables it.
pub mod builtins;
/// Interpreter configuration.
///
/// Holds the settings shared by every document: the packages searched for
/// unqualified type names and whether the default host library is
/// installed.
pub mod config;
/// Provides unified error types for scanning, parsing and evaluation.
///
/// This module defines all errors that can abort loading a document. Parse
/// errors carry the line they were found on; registry errors are wrapped
/// with the line of the statement that raised them.
pub mod error;
/// Orchestrates the entire process of document interpretation.
///
/// This module ties together the document scanner, the expression lexer and
/// reducer, the call registry and the runtime values.
pub mod interpreter;
/// General utilities for numeric kinds, literals and safe conversion.
pub mod util;

/// Loads a document from source text.
///
/// # Errors
/// Returns the first error encountered while scanning the document or
/// evaluating its code.
///
/// # Examples
/// ```
/// use interplay::{config::InterpreterConfig, load_document};
///
/// let config = InterpreterConfig::default();
///
/// let document = load_document("> x = 3 + 4\nx is $x", &config).unwrap();
/// assert_eq!(document.entries()[0].to_string(), "x is 7\n");
///
/// // Unknown block identifiers abort the load.
/// assert!(load_document("<table>\n</table>", &config).is_err());
/// ```
pub fn load_document(source: &str, config: &InterpreterConfig) -> Result<Document, Error> {
    Document::parse(source, config)
}

/// Reads and loads the document at `path`.
///
/// # Errors
/// Returns `Error::Io` if the file cannot be read, otherwise see
/// [`load_document`].
pub fn load_document_file(path: impl AsRef<Path>, config: &InterpreterConfig) -> Result<Document, Error> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| Error::Io { path: path.to_path_buf(),
                                                                        source })?;

    load_document(&source, config)
}
