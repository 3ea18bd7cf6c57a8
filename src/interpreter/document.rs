/// The document driver.
///
/// Owns a document's registry, environment, file table and interaction
/// entries, and dispatches each scanned block to the right consumer.
pub mod core;
/// Interaction entries.
///
/// Builds entries from plain text lines, substituting `$name` references and
/// collecting markers.
pub mod interaction;
/// The block scanner.
///
/// Normalizes the raw text and splits it into tagged blocks, code lines,
/// interaction blocks and blank runs.
pub mod scanner;
