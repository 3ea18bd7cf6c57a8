use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Represents all errors raised by the call registry and during evaluation.
pub enum RuntimeError {
    /// A short name was imported twice with different fully-qualified names.
    #[error("Ambiguous import: '{name}' already refers to '{existing}', cannot import '{requested}'.")]
    AmbiguousImport {
        /// The short name being imported.
        name:      String,
        /// The fully-qualified name it is already bound to.
        existing:  String,
        /// The fully-qualified name of the rejected import.
        requested: String,
    },
    /// A referenced type is neither imported, known, nor found in an implicit
    /// package.
    #[error("Unresolvable type '{name}'.")]
    UnresolvableType {
        /// The name as written.
        name: String,
    },
    /// A parameter or return signature could not be turned into a list of
    /// known types.
    #[error("Malformed signature '{signature}': {reason}.")]
    MalformedSignature {
        /// The signature text.
        signature: String,
        /// Why the signature was rejected.
        reason:    String,
    },
    /// A declaration names a member that the host catalog does not provide.
    #[error("No such member: {type_name}.{member}{signature}.")]
    NoSuchMember {
        /// The fully-qualified declaring type.
        type_name: String,
        /// The member name, `<init>` for constructors.
        member:    String,
        /// The declared parameter signature.
        signature: String,
    },
    /// Nothing was ever registered for this type and operation.
    #[error("No handle registered for {type_name}.{operation}.")]
    NoHandle {
        /// The fully-qualified type.
        type_name: String,
        /// The operation name, `<init>` for constructors.
        operation: String,
    },
    /// Handles exist but every candidate failed for the supplied arguments.
    #[error("Cannot invoke {type_name}.{operation} with arguments ({argument_types}).")]
    NoMatchingOverload {
        /// The fully-qualified type.
        type_name:      String,
        /// The operation name, `<init>` for constructors.
        operation:      String,
        /// Runtime types of the supplied arguments.
        argument_types: String,
    },
    /// An integral addition overflowed its promoted kind.
    #[error("Integer overflow while computing {left} + {right}.")]
    Overflow {
        /// The left operand.
        left:  String,
        /// The right operand.
        right: String,
    },
}
