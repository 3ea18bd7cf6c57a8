use thiserror::Error;

#[derive(Debug, Error)]
/// Represents all errors that can occur while scanning a document or
/// reducing a line of code.
pub enum ParseError {
    /// Found a token the grammar does not allow at this position.
    #[error("Error on line {line}: Unexpected token: {token}.")]
    UnexpectedToken {
        /// The token encountered.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A tagged block used an identifier other than `file` or `code`.
    #[error("Error on line {line}: Unknown block identifier '{id}'.")]
    UnknownBlock {
        /// The identifier of the block.
        id:   String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A tagged block was opened but its closing tag was never found.
    #[error("Error on line {line}: Block '{id}' is never closed. Expected '</{id}>'.")]
    UnterminatedBlock {
        /// The identifier of the block.
        id:   String,
        /// The source line where the block was opened.
        line: usize,
    },
    /// A `file` block did not name the file it stores.
    #[error("Error on line {line}: File block requires a name. Example: <file=input.txt>")]
    MissingFileName {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An assignment, addition or call receiver had no operand.
    #[error("Error on line {line}: Value missing.")]
    MissingValue {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An argument list contained an empty argument, as in `f(a, )`.
    #[error("Error on line {line}: Empty argument in argument list.")]
    EmptyArgument {
        /// The source line where the error occurred.
        line: usize,
    },
}
