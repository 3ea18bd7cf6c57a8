/// The document module splits a document into blocks and drives them.
///
/// The document is normalized, scanned into tagged blocks, code lines and
/// interaction blocks, and each block is handed to its consumer: code to the
/// evaluator, file bodies to the file table, interaction text to the entry
/// builder.
///
/// # Responsibilities
/// - Normalizes line endings and strips comments.
/// - Recognises `<file=..>` and `<code>` blocks, `>` code lines and
///   interaction blocks.
/// - Substitutes `$name` references and attaches markers to entries.
pub mod document;
/// The evaluator module reduces code lines against the registry.
///
/// Tokens are shifted onto an explicit stack of pending frames and reduced at
/// `+`, `,`, `)` and line ends. Calls and constructors are invoked through
/// the registry; assignments bind names in the document's environment.
pub mod evaluator;
/// The lexer module tokenizes code lines.
///
/// Statements such as imports and declarations are single tokens; call and
/// constructor openings, assignments and `+` are structural tokens; the
/// rest is literal text.
pub mod lexer;
/// The registry module stores callable handles and resolves overloads.
///
/// # Responsibilities
/// - Resolves written type names through imports, exact names and implicit
///   packages.
/// - Registers constructors, static and virtual operations by signature and
///   propagates virtual operations to subclasses.
/// - Invokes by trial resolution, trying every candidate until one accepts
///   the arguments.
pub mod registry;
/// The types module replaces a reflective type system.
///
/// The host declares types, their supertypes and native members in a
/// catalog; signatures are parsed against it and discovered types are
/// indexed for subclass propagation.
pub mod types;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the values a document computes: numbers of several
/// widths, strings, characters, booleans, arrays, host objects and markers.
/// It also provides numeric widening and the addition used by `+`.
pub mod value;
