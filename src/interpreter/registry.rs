/// The registry itself.
///
/// Holds the per-(type, operation) buckets of callable handles, resolves
/// written type names, and implements trial overload resolution.
pub mod core;
/// Callable handles.
///
/// A handle pairs a native implementation with the signature a document
/// declared for it and knows how to coerce arguments before calling it.
pub mod handle;
/// The short-name import table.
pub mod imports;
