use std::fmt;

use crate::{error::RuntimeError, util::num::NumKind};

/// A primitive parameter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `boolean`
    Boolean,
    /// `char`
    Char,
    /// One of the numeric primitives.
    Numeric(NumKind),
}

impl Primitive {
    /// Maps a primitive keyword to its type.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "boolean" => Some(Self::Boolean),
            "char" => Some(Self::Char),
            _ => NumKind::from_keyword(keyword).map(Self::Numeric),
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "boolean"),
            Self::Char => write!(f, "char"),
            Self::Numeric(kind) => write!(f, "{kind}"),
        }
    }
}

/// A resolved parameter or return type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A primitive type.
    Primitive(Primitive),
    /// A fully-qualified class type.
    Class(String),
    /// An array of the element type.
    Array(Box<Self>),
}

impl TypeRef {
    /// Parses a single type name.
    ///
    /// Primitive keywords are recognised directly, `T[]` suffixes build array
    /// types, and every other name is handed to `resolve` to obtain its
    /// fully-qualified form.
    ///
    /// Returns `None` if the name is malformed or cannot be resolved.
    pub fn parse(name: &str, resolve: &mut impl FnMut(&str) -> Option<String>) -> Option<Self> {
        let name = name.trim();

        if let Some(element) = name.strip_suffix("[]") {
            return Self::parse(element, resolve).map(|element| Self::Array(Box::new(element)));
        }
        if name.is_empty()
           || !name.chars().all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '$'))
        {
            return None;
        }
        if let Some(primitive) = Primitive::from_keyword(name) {
            return Some(Self::Primitive(primitive));
        }

        resolve(name).map(Self::Class)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(primitive) => write!(f, "{primitive}"),
            Self::Class(name) => write!(f, "{name}"),
            Self::Array(element) => write!(f, "{element}[]"),
        }
    }
}

/// A parameter list with an optional return type.
///
/// When `variadic` is set the last parameter is an array type and the call
/// site may pass its elements individually.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature {
    /// The parameter types in order.
    pub params:   Vec<TypeRef>,
    /// Whether the last parameter was written as `T...`.
    pub variadic: bool,
    /// The declared result type, if any.
    pub returns:  Option<TypeRef>,
}

impl Signature {
    /// Parses a signature of the form `(T1, T2, ...)` optionally followed by
    /// `: R`.
    ///
    /// The surrounding parentheses may be omitted. The last parameter may be
    /// written `T...` to make the signature variadic.
    ///
    /// # Errors
    /// Returns `RuntimeError::MalformedSignature` if the text cannot be split
    /// into parameters or a type name cannot be resolved.
    ///
    /// # Example
    /// ```
    /// use interplay::interpreter::types::signature::Signature;
    ///
    /// let mut resolve = |name: &str| Some(format!("java.lang.{name}"));
    /// let signature = Signature::parse("(int, String...): boolean", &mut resolve).unwrap();
    ///
    /// assert_eq!(signature.params.len(), 2);
    /// assert!(signature.variadic);
    /// assert_eq!(signature.to_string(), "(int, java.lang.String...): boolean");
    /// ```
    pub fn parse(text: &str,
                 resolve: &mut impl FnMut(&str) -> Option<String>)
                 -> Result<Self, RuntimeError> {
        let malformed = |reason: String| RuntimeError::MalformedSignature { signature:
                                                                                text.to_string(),
                                                                            reason };
        let trimmed = text.trim();

        let (list, returns) = match trimmed.strip_prefix('(') {
            Some(rest) => {
                let close = rest.find(')')
                                .ok_or_else(|| malformed("missing ')'".to_string()))?;
                let tail = rest[close + 1..].trim();
                let returns = if tail.is_empty() {
                    None
                } else {
                    let name = tail.strip_prefix(':')
                                   .ok_or_else(|| malformed(format!("unexpected '{tail}'")))?;
                    Some(TypeRef::parse(name, resolve).ok_or_else(|| {
                                                          malformed(format!("cannot resolve type '{}'",
                                                                            name.trim()))
                                                      })?)
                };
                (&rest[..close], returns)
            },
            None => (trimmed, None),
        };

        let mut params = Vec::new();
        let mut variadic = false;

        if !list.trim().is_empty() {
            let parts: Vec<&str> = list.split(',').map(str::trim).collect();
            for (index, part) in parts.iter().enumerate() {
                if variadic {
                    return Err(malformed("only the last parameter may be variadic".to_string()));
                }
                let (name, is_variadic) = match part.strip_suffix("...") {
                    Some(name) => (name, true),
                    None => (*part, false),
                };
                if name.is_empty() {
                    return Err(malformed(format!("parameter {} is empty", index + 1)));
                }
                let param = TypeRef::parse(name, resolve).ok_or_else(|| {
                                malformed(format!("cannot resolve type '{name}'"))
                            })?;
                if is_variadic {
                    variadic = true;
                    params.push(TypeRef::Array(Box::new(param)));
                } else {
                    params.push(param);
                }
            }
        }

        Ok(Self { params,
                  variadic,
                  returns })
    }

    /// The number of declared parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if both signatures take the same parameter types.
    ///
    /// Return types are not compared.
    #[must_use]
    pub fn same_params(&self, other: &Self) -> bool {
        self.params == other.params && self.variadic == other.variadic
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (index, param) in self.params.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            match param {
                TypeRef::Array(element) if self.variadic && index + 1 == self.params.len() => {
                    write!(f, "{element}...")?;
                },
                _ => write!(f, "{param}")?,
            }
        }
        write!(f, ")")?;
        if let Some(returns) = &self.returns {
            write!(f, ": {returns}")?;
        }
        Ok(())
    }
}
