use crate::interpreter::value::core::Value;

/// A pending sub-expression on the reducer's stack.
///
/// Operand frames (`Literal`, `Computed`) sit on top of the container frame
/// that will consume them when the next boundary token arrives.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Text accumulated since the last boundary.
    Literal(String),
    /// A value produced by a call, a constructor, or a folded addition.
    Computed(Value),
    /// An open operation call waiting for its closing bracket.
    Call {
        /// The operation name.
        name:     String,
        /// The value the operation was called on.
        receiver: Value,
        /// The arguments finished so far.
        args:     Vec<Value>,
    },
    /// An open constructor call waiting for its closing bracket.
    Constructor {
        /// The type as written.
        type_name: String,
        /// The arguments finished so far.
        args:      Vec<Value>,
    },
    /// An assignment waiting for its right-hand side.
    Assignment {
        /// The variable being bound.
        name: String,
    },
    /// An addition waiting for its right operand.
    Addition {
        /// The left operand.
        left: Value,
    },
}

impl Frame {
    /// Returns `true` for frames that hold an operand rather than wait for
    /// one.
    #[must_use]
    pub const fn is_operand(&self) -> bool {
        matches!(self, Self::Literal(_) | Self::Computed(_))
    }

    /// Returns `true` for frames closed by `)` and separated by `,`.
    #[must_use]
    pub const fn is_call(&self) -> bool {
        matches!(self, Self::Call { .. } | Self::Constructor { .. })
    }
}
