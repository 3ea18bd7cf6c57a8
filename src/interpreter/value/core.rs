use std::{fmt, rc::Rc};

use crate::{
    error::RuntimeError,
    interpreter::value::{marker::Marker, object::ObjectRef},
    util::num::{NumKind, f64_to_i64_checked, host_float_text, i64_to_f32_checked,
                i64_to_f64_checked},
};

/// Root of the type hierarchy; every value is assignable to it.
pub const OBJECT_TYPE: &str = "java.lang.Object";
/// Runtime type of string values.
pub const STRING_TYPE: &str = "java.lang.String";
/// Supertype of strings and string builders.
pub const CHAR_SEQUENCE_TYPE: &str = "java.lang.CharSequence";
/// Runtime type of boolean values.
pub const BOOLEAN_TYPE: &str = "java.lang.Boolean";
/// Runtime type of character values.
pub const CHARACTER_TYPE: &str = "java.lang.Character";
/// Supertype of every numeric value type.
pub const NUMBER_TYPE: &str = "java.lang.Number";
/// Runtime type of `Byte` values.
pub const BYTE_TYPE: &str = "java.lang.Byte";
/// Runtime type of `Short` values.
pub const SHORT_TYPE: &str = "java.lang.Short";
/// Runtime type of `Int` values.
pub const INTEGER_TYPE: &str = "java.lang.Integer";
/// Runtime type of `Long` values.
pub const LONG_TYPE: &str = "java.lang.Long";
/// Runtime type of `Float` values.
pub const FLOAT_TYPE: &str = "java.lang.Float";
/// Runtime type of `Double` values.
pub const DOUBLE_TYPE: &str = "java.lang.Double";
/// Runtime type of arrays built from variadic arguments.
pub const ARRAY_TYPE: &str = "java.lang.Object[]";
/// Type name reported for `Value::Null`.
pub const NULL_TYPE: &str = "null";

/// Represents a runtime value in the interpreter.
///
/// Values are produced by literals, by invoking registered handles, and by
/// addition. They are stored in the environment by assignment and
/// substituted into interaction text by `$name`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absent reference.
    Null,
    /// A boolean value.
    Bool(bool),
    /// A single character.
    Char(char),
    /// An 8-bit integer.
    Byte(i8),
    /// A 16-bit integer.
    Short(i16),
    /// A 32-bit integer; unsuffixed whole-number literals that fit.
    Int(i32),
    /// A 64-bit integer.
    Long(i64),
    /// A 32-bit floating-point number.
    Float(f32),
    /// A 64-bit floating-point number; unsuffixed decimal literals.
    Double(f64),
    /// An immutable string.
    Str(Rc<str>),
    /// A fixed sequence of values, produced by variadic argument packing.
    Array(Rc<[Self]>),
    /// A host object created by a registered constructor.
    Object(ObjectRef),
    /// An annotation attached to interactions rather than printed.
    Marker(Marker),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Self::Char(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(Rc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(Rc::from(v))
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Array(Rc::from(v))
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Self::Object(v)
    }
}

impl From<Marker> for Value {
    fn from(v: Marker) -> Self {
        Self::Marker(v)
    }
}

impl Value {
    /// Returns the fully-qualified runtime type name of this value.
    ///
    /// This is the key the registry uses when an operation is invoked on the
    /// value.
    ///
    /// # Example
    /// ```
    /// use interplay::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Int(3).type_name(), "java.lang.Integer");
    /// assert_eq!(Value::from("x").type_name(), "java.lang.String");
    /// assert_eq!(Value::Null.type_name(), "null");
    /// ```
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Null => NULL_TYPE,
            Self::Bool(_) => BOOLEAN_TYPE,
            Self::Char(_) => CHARACTER_TYPE,
            Self::Byte(_) => BYTE_TYPE,
            Self::Short(_) => SHORT_TYPE,
            Self::Int(_) => INTEGER_TYPE,
            Self::Long(_) => LONG_TYPE,
            Self::Float(_) => FLOAT_TYPE,
            Self::Double(_) => DOUBLE_TYPE,
            Self::Str(_) => STRING_TYPE,
            Self::Array(_) => ARRAY_TYPE,
            Self::Object(object) => object.class(),
            Self::Marker(marker) => marker.type_name(),
        }
    }

    /// Returns the numeric kind of this value, or `None` if it is not a
    /// number.
    #[must_use]
    pub const fn numeric_kind(&self) -> Option<NumKind> {
        match self {
            Self::Byte(_) => Some(NumKind::Byte),
            Self::Short(_) => Some(NumKind::Short),
            Self::Int(_) => Some(NumKind::Int),
            Self::Long(_) => Some(NumKind::Long),
            Self::Float(_) => Some(NumKind::Float),
            Self::Double(_) => Some(NumKind::Double),
            _ => None,
        }
    }

    /// Returns the value of a whole-number variant as `i64`.
    #[must_use]
    pub fn as_integral(&self) -> Option<i64> {
        match self {
            Self::Byte(v) => Some(i64::from(*v)),
            Self::Short(v) => Some(i64::from(*v)),
            Self::Int(v) => Some(i64::from(*v)),
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string slice of a `Str` value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the object handle of an `Object` value.
    #[must_use]
    pub const fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Converts a numeric value to `kind`, following the widening order.
    ///
    /// Returns `None` if this value is not numeric, if its kind does not
    /// widen to `kind`, or if a whole number has no exact floating-point
    /// counterpart in `kind`.
    ///
    /// # Example
    /// ```
    /// use interplay::{interpreter::value::core::Value, util::num::NumKind};
    ///
    /// assert_eq!(Value::Int(4).widen(NumKind::Long), Some(Value::Long(4)));
    /// assert_eq!(Value::Int(4).widen(NumKind::Double), Some(Value::Double(4.0)));
    /// assert_eq!(Value::Double(4.0).widen(NumKind::Int), None);
    /// ```
    #[must_use]
    pub fn widen(&self, kind: NumKind) -> Option<Self> {
        let own = self.numeric_kind()?;
        if !own.widens_to(kind) {
            return None;
        }

        match kind {
            NumKind::Byte => i8::try_from(self.as_integral()?).ok().map(Self::Byte),
            NumKind::Short => i16::try_from(self.as_integral()?).ok().map(Self::Short),
            NumKind::Int => i32::try_from(self.as_integral()?).ok().map(Self::Int),
            NumKind::Long => self.as_integral().map(Self::Long),
            NumKind::Float => match self {
                Self::Float(f) => Some(Self::Float(*f)),
                _ => i64_to_f32_checked(self.as_integral()?).map(Self::Float),
            },
            NumKind::Double => match self {
                Self::Double(d) => Some(Self::Double(*d)),
                Self::Float(f) => Some(Self::Double(f64::from(*f))),
                _ => i64_to_f64_checked(self.as_integral()?).map(Self::Double),
            },
        }
    }

    /// Converts a numeric value to `kind` if the result is exactly the same
    /// number, regardless of the widening order.
    ///
    /// # Example
    /// ```
    /// use interplay::{interpreter::value::core::Value, util::num::NumKind};
    ///
    /// assert_eq!(Value::Double(4.0).exact(NumKind::Int), Some(Value::Int(4)));
    /// assert_eq!(Value::Double(4.5).exact(NumKind::Int), None);
    /// assert_eq!(Value::Int(20_000_001).exact(NumKind::Float), None);
    /// ```
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn exact(&self, kind: NumKind) -> Option<Self> {
        let whole = match self {
            Self::Float(f) => f64_to_i64_checked(f64::from(*f)),
            Self::Double(d) => f64_to_i64_checked(*d),
            _ => self.as_integral(),
        };

        match kind {
            NumKind::Byte => i8::try_from(whole?).ok().map(Self::Byte),
            NumKind::Short => i16::try_from(whole?).ok().map(Self::Short),
            NumKind::Int => i32::try_from(whole?).ok().map(Self::Int),
            NumKind::Long => whole.map(Self::Long),
            NumKind::Float => match self {
                Self::Float(f) => Some(Self::Float(*f)),
                Self::Double(d) => {
                    let narrowed = *d as f32;
                    (f64::from(narrowed).to_bits() == d.to_bits()).then_some(Self::Float(narrowed))
                },
                _ => i64_to_f32_checked(whole?).map(Self::Float),
            },
            NumKind::Double => match self {
                Self::Float(f) => Some(Self::Double(f64::from(*f))),
                Self::Double(d) => Some(Self::Double(*d)),
                _ => i64_to_f64_checked(whole?).map(Self::Double),
            },
        }
    }

    /// Converts a numeric value to `kind`, rounding whole numbers to the
    /// nearest floating-point value where no exact one exists.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn approximate(&self, kind: NumKind) -> Option<Self> {
        match (kind, self) {
            (NumKind::Float, Self::Double(d)) => Some(Self::Float(*d as f32)),
            (NumKind::Float, _) => {
                self.as_integral().map(|v| Self::Float(v as f32)).or_else(|| self.exact(kind))
            },
            (NumKind::Double, _) => {
                self.as_integral().map(|v| Self::Double(v as f64)).or_else(|| self.exact(kind))
            },
            _ => self.exact(kind),
        }
    }

    /// Adds two values.
    ///
    /// If both operands are numeric they are added in a shared kind: the
    /// wider of the two kinds if both operands convert to it exactly, else
    /// the narrower kind if both convert to that exactly, else the wider
    /// kind with rounding. Whole-number additions are checked for overflow.
    /// Otherwise the printed forms of both operands are concatenated.
    ///
    /// # Errors
    /// Returns `RuntimeError::Overflow` if a whole-number sum does not fit
    /// the chosen kind.
    ///
    /// # Example
    /// ```
    /// use interplay::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Int(3).add(&Value::Int(4)).unwrap(), Value::Int(7));
    /// assert_eq!(Value::Int(3).add(&Value::Long(4)).unwrap(), Value::Long(7));
    /// assert_eq!(Value::Long((1 << 53) + 1).add(&Value::Double(1.0)).unwrap(),
    ///            Value::Long((1 << 53) + 2));
    /// assert_eq!(Value::Int(3).add(&Value::from("a")).unwrap(), Value::from("3a"));
    /// ```
    pub fn add(&self, other: &Self) -> Result<Self, RuntimeError> {
        let (Some(left_kind), Some(right_kind)) = (self.numeric_kind(), other.numeric_kind())
        else {
            return Ok(Self::from(format!("{self}{other}")));
        };

        let wide = NumKind::promote(left_kind, right_kind);
        let narrow = if wide == left_kind { right_kind } else { left_kind };
        let exact_in = |kind| self.exact(kind).zip(other.exact(kind));
        let Some((left, right)) =
            exact_in(wide).or_else(|| exact_in(narrow))
                          .or_else(|| self.approximate(wide).zip(other.approximate(wide)))
        else {
            return Ok(Self::from(format!("{self}{other}")));
        };
        let overflow = || RuntimeError::Overflow { left:  self.to_string(),
                                                   right: other.to_string(), };

        match (left, right) {
            (Self::Byte(a), Self::Byte(b)) => a.checked_add(b).map(Self::Byte).ok_or_else(overflow),
            (Self::Short(a), Self::Short(b)) => {
                a.checked_add(b).map(Self::Short).ok_or_else(overflow)
            },
            (Self::Int(a), Self::Int(b)) => a.checked_add(b).map(Self::Int).ok_or_else(overflow),
            (Self::Long(a), Self::Long(b)) => a.checked_add(b).map(Self::Long).ok_or_else(overflow),
            (Self::Float(a), Self::Float(b)) => Ok(Self::Float(a + b)),
            (Self::Double(a), Self::Double(b)) => Ok(Self::Double(a + b)),
            _ => Ok(Self::from(format!("{self}{other}"))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Char(c) => write!(f, "{c}"),
            Self::Byte(n) => write!(f, "{n}"),
            Self::Short(n) => write!(f, "{n}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Long(n) => write!(f, "{n}"),
            Self::Float(r) => {
                let text = host_float_text(f64::from(*r), &format!("{r:?}"), &format!("{r:e}"));
                write!(f, "{text}")
            },
            Self::Double(r) => {
                write!(f, "{}", host_float_text(*r, &format!("{r:?}"), &format!("{r:e}")))
            },
            Self::Str(s) => write!(f, "{s}"),
            Self::Array(items) => write_list(f, items),
            Self::Object(object) => write!(f, "{object}"),
            Self::Marker(marker) => write!(f, "{marker}"),
        }
    }
}

/// Writes a sequence of values as `[a, b, c]`.
///
/// Shared by arrays and by host list objects so both print alike.
pub fn write_list(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    write!(f, "[")?;

    for (index, value) in items.iter().enumerate() {
        if index > 0 {
            write!(f, ", ")?;
        }

        match value {
            Value::Object(object) if object.is_borrowed() => write!(f, "(this Collection)")?,
            _ => write!(f, "{value}")?,
        }
    }

    write!(f, "]")
}
