use std::fmt;

use crate::interpreter::{
    types::{
        catalog::{NativeFn, TypeCatalog},
        signature::Signature,
    },
    value::core::Value,
};

/// How a handle is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// Creates an instance; invoked with a `None` operation.
    Constructor,
    /// Invoked without a receiver.
    Static,
    /// Invoked with the receiver as the first argument and dispatched on the
    /// receiver's runtime type.
    Virtual,
}

/// A registered, invocable constructor, static or virtual operation.
///
/// `declared` is the parameter list written in the declaration and selects
/// the native implementation; `external` is the narrowed list used to match
/// call-site arguments, or a copy of `declared` if none was given.
#[derive(Clone)]
pub struct CallableHandle {
    /// The type the declaration was written against.
    pub declaring: String,
    /// The operation name, `None` for constructors.
    pub name:      Option<String>,
    /// How the handle is called.
    pub kind:      HandleKind,
    /// The declared parameters.
    pub declared:  Signature,
    /// The parameters arguments are matched against.
    pub external:  Signature,
    func:          NativeFn,
}

impl fmt::Debug for CallableHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallableHandle")
         .field("declaring", &self.declaring)
         .field("name", &self.name)
         .field("kind", &self.kind)
         .field("declared", &self.declared)
         .field("external", &self.external)
         .finish_non_exhaustive()
    }
}

impl fmt::Display for CallableHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}.{name}{}", self.declaring, self.external),
            None => write!(f, "{}{}", self.declaring, self.external),
        }
    }
}

/// Why a single candidate could not be invoked.
///
/// Never surfaced to callers; the registry moves on to the next candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvokeFailure {
    /// The number of arguments does not fit the signature.
    Arity {
        /// The handle's arity.
        expected: usize,
        /// The number of arguments supplied.
        actual:   usize,
    },
    /// The receiver is missing or not an instance of the declaring type.
    Receiver(String),
    /// An argument or the result could not be converted.
    Coercion(String),
    /// The native implementation reported an error.
    Native(String),
}

impl fmt::Display for InvokeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arity { expected, actual } => {
                write!(f, "expected {expected} arguments, got {actual}")
            },
            Self::Receiver(type_name) => write!(f, "receiver of type {type_name} does not fit"),
            Self::Coercion(reason) => write!(f, "{reason}"),
            Self::Native(message) => write!(f, "{message}"),
        }
    }
}

impl CallableHandle {
    /// Creates a handle for `func`.
    #[must_use]
    pub fn new(declaring: &str,
               name: Option<&str>,
               kind: HandleKind,
               declared: Signature,
               external: Signature,
               func: NativeFn)
               -> Self {
        Self { declaring: declaring.to_string(),
               name: name.map(str::to_string),
               kind,
               declared,
               external,
               func }
    }

    /// The number of arguments the handle is filed under, counting the
    /// receiver of a virtual handle.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.external.arity() + usize::from(self.kind == HandleKind::Virtual)
    }

    /// Invokes the handle with `args`.
    ///
    /// For a virtual handle `args[0]` is the receiver. Arguments are checked
    /// against the arity, packed if the handle is variadic, coerced to the
    /// external and then the declared parameters, and passed to the native
    /// implementation. A virtual call uses the most specific implementation
    /// the catalog has for the receiver's runtime type.
    ///
    /// # Errors
    /// Returns an `InvokeFailure` if this handle does not accept the
    /// arguments or the native implementation fails.
    pub fn invoke(&self, args: &[Value], catalog: &TypeCatalog) -> Result<Value, InvokeFailure> {
        let (receiver, rest) = match self.kind {
            HandleKind::Virtual => {
                let (receiver, rest) =
                    args.split_first()
                        .ok_or(InvokeFailure::Arity { expected: self.arity(),
                                                      actual:   0, })?;
                if matches!(receiver, Value::Null)
                   || !catalog.is_assignable(receiver.type_name(), &self.declaring)
                {
                    return Err(InvokeFailure::Receiver(receiver.type_name().to_string()));
                }
                (Some(receiver), rest)
            },
            _ => (None, args),
        };

        let packed = self.pack(rest).ok_or(InvokeFailure::Arity { expected: self.arity(),
                                                                   actual:   args.len(), })?;

        let mut call_args = Vec::with_capacity(packed.len() + 1);
        call_args.extend(receiver.cloned());
        for (index, value) in packed.iter().enumerate() {
            let coerced = catalog.coerce(value, &self.external.params[index])
                                 .and_then(|value| {
                                     catalog.coerce(&value, &self.declared.params[index])
                                 })
                                 .ok_or_else(|| {
                                     InvokeFailure::Coercion(format!("argument {} of type {} does \
                                                                      not fit {}",
                                                                     index + 1,
                                                                     value.type_name(),
                                                                     self.external.params[index]))
                                 })?;
            call_args.push(coerced);
        }

        let func = match (&self.kind, receiver, &self.name) {
            (HandleKind::Virtual, Some(receiver), Some(name)) => {
                catalog.find_instance(receiver.type_name(), name, &self.declared)
                       .map_or_else(|| self.func.clone(), |member| member.func.clone())
            },
            _ => self.func.clone(),
        };

        let result = func(&call_args).map_err(InvokeFailure::Native)?;

        let Some(returns) = &self.external.returns else {
            return Ok(result);
        };

        catalog.coerce(&result, returns).ok_or_else(|| {
            InvokeFailure::Coercion(format!("result of type {} does not fit {returns}",
                                            result.type_name()))
        })
    }

    /// Matches the explicit arguments to the parameter list, packing the
    /// tail of a variadic call into an array.
    fn pack(&self, args: &[Value]) -> Option<Vec<Value>> {
        let count = self.external.params.len();

        if !self.external.variadic {
            return (args.len() == count).then(|| args.to_vec());
        }

        let fixed = count - 1;
        if args.len() < fixed {
            return None;
        }
        if args.len() == count && matches!(args[fixed], Value::Array(_) | Value::Null) {
            return Some(args.to_vec());
        }

        let mut packed = args[..fixed].to_vec();
        packed.push(Value::from(args[fixed..].to_vec()));

        Some(packed)
    }
}
