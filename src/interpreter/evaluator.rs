/// The shift-reduce engine and the evaluation scope.
///
/// Contains the `Reducer`, which consumes the tokens of a code block one at a
/// time, the `Scope` trait through which it reaches the environment and the
/// registry, and the `Session` that implements that trait for a document.
pub mod core;

/// Pending sub-expressions.
///
/// Defines the frames kept on the reducer's stack while an expression is
/// still open.
pub mod frame;

/// Literal resolution.
///
/// Turns a finished text buffer into a value: quoted text, a bound
/// variable, a number, a keyword, or the text itself.
pub mod literal;
