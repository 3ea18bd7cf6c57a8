use std::fmt;

use crate::interpreter::value::core::Value;

/// The numeric representations a value can have.
///
/// Kinds are totally ordered by widening: a value of a kind can be
/// represented by any kind that compares greater or equal to it. Addition
/// prefers the wider kind of its operands, and argument coercion accepts a
/// numeric value for a parameter whose kind it widens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumKind {
    /// 8-bit signed integer.
    Byte,
    /// 16-bit signed integer.
    Short,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 32-bit floating point.
    Float,
    /// 64-bit floating point.
    Double,
}

impl NumKind {
    /// Returns `true` if a value of this kind can be produced in `target`.
    ///
    /// # Example
    /// ```
    /// use interplay::util::num::NumKind;
    ///
    /// assert!(NumKind::Int.widens_to(NumKind::Long));
    /// assert!(NumKind::Long.widens_to(NumKind::Double));
    /// assert!(!NumKind::Double.widens_to(NumKind::Int));
    /// ```
    #[must_use]
    pub fn widens_to(self, target: Self) -> bool {
        self <= target
    }

    /// Chooses the representation used for a binary operation.
    ///
    /// The right operand's kind is preferred if the left operand widens to
    /// it, otherwise the left operand's kind is used.
    ///
    /// # Example
    /// ```
    /// use interplay::util::num::NumKind;
    ///
    /// assert_eq!(NumKind::promote(NumKind::Int, NumKind::Long), NumKind::Long);
    /// assert_eq!(NumKind::promote(NumKind::Double, NumKind::Short), NumKind::Double);
    /// ```
    #[must_use]
    pub fn promote(left: Self, right: Self) -> Self {
        if left.widens_to(right) { right } else { left }
    }

    /// Returns `true` for the whole-number kinds.
    #[must_use]
    pub const fn is_integral(self) -> bool {
        matches!(self, Self::Byte | Self::Short | Self::Int | Self::Long)
    }

    /// Maps a primitive type keyword to its kind.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "byte" => Some(Self::Byte),
            "short" => Some(Self::Short),
            "int" => Some(Self::Int),
            "long" => Some(Self::Long),
            "float" => Some(Self::Float),
            "double" => Some(Self::Double),
            _ => None,
        }
    }

    /// The primitive type keyword for this kind.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

impl fmt::Display for NumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Converts an `i64` to `f64` if the result is exactly the same number.
///
/// ## Example
/// ```
/// use interplay::util::num::i64_to_f64_checked;
///
/// assert_eq!(i64_to_f64_checked(42), Some(42.0));
/// assert_eq!(i64_to_f64_checked(1 << 60), Some(1_152_921_504_606_846_976.0));
/// assert_eq!(i64_to_f64_checked((1 << 53) + 1), None);
/// ```
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
#[must_use]
pub fn i64_to_f64_checked(value: i64) -> Option<f64> {
    let converted = value as f64;
    (converted as i128 == i128::from(value)).then_some(converted)
}

/// Converts an `i64` to `f32` if the result is exactly the same number.
///
/// ## Example
/// ```
/// use interplay::util::num::i64_to_f32_checked;
///
/// assert_eq!(i64_to_f32_checked(-7), Some(-7.0));
/// assert_eq!(i64_to_f32_checked(20_000_000), Some(20_000_000.0));
/// assert_eq!(i64_to_f32_checked(20_000_001), None);
/// ```
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
#[must_use]
pub fn i64_to_f32_checked(value: i64) -> Option<f32> {
    let converted = value as f32;
    (converted as i128 == i128::from(value)).then_some(converted)
}

/// Converts an `f64` holding a whole number to `i64`.
///
/// Returns `None` for fractions, infinities, `NaN`, and values outside the
/// `i64` range.
///
/// ## Example
/// ```
/// use interplay::util::num::f64_to_i64_checked;
///
/// assert_eq!(f64_to_i64_checked(1.0), Some(1));
/// assert_eq!(f64_to_i64_checked(1.5), None);
/// assert_eq!(f64_to_i64_checked(9.3e18), None);
/// ```
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
#[must_use]
pub fn f64_to_i64_checked(value: f64) -> Option<i64> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    (value.fract() == 0.0 && (-LIMIT..LIMIT).contains(&value)).then_some(value as i64)
}

/// Formats a floating-point value the way the host platform prints it.
///
/// Magnitudes in `[1e-3, 1e7)` and zero are printed as plain decimals;
/// anything else uses the `1.0E20` notation. `shortest` and `scientific` are
/// the `{:?}` and `{:e}` renderings of the value in its own width, so `f32`
/// values keep their short digits.
///
/// ## Example
/// ```
/// use interplay::util::num::host_float_text;
///
/// let text = |x: f64| host_float_text(x, &format!("{x:?}"), &format!("{x:e}"));
///
/// assert_eq!(text(7.0), "7.0");
/// assert_eq!(text(0.25), "0.25");
/// assert_eq!(text(1e20), "1.0E20");
/// assert_eq!(text(1.5e-5), "1.5E-5");
/// assert_eq!(text(f64::NEG_INFINITY), "-Infinity");
/// ```
#[allow(clippy::float_cmp)]
#[must_use]
pub fn host_float_text(value: f64, shortest: &str, scientific: &str) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        return shortest.to_string();
    }

    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific, "0"));
    if mantissa.contains('.') {
        format!("{mantissa}E{exponent}")
    } else {
        format!("{mantissa}.0E{exponent}")
    }
}

/// Parses a numeric literal.
///
/// Whole numbers become `Int` when they fit 32 bits and `Long` otherwise;
/// an `L` suffix forces `Long`. Decimals of the form `1.5` become `Double`,
/// or `Float` with an `f` suffix. Returns `None` for anything else,
/// including whole numbers too large for 64 bits.
///
/// ## Example
/// ```
/// use interplay::{interpreter::value::core::Value, util::num::parse_number};
///
/// assert_eq!(parse_number("42"), Some(Value::Int(42)));
/// assert_eq!(parse_number("42L"), Some(Value::Long(42)));
/// assert_eq!(parse_number("3000000000"), Some(Value::Long(3_000_000_000)));
/// assert_eq!(parse_number("-1.5"), Some(Value::Double(-1.5)));
/// assert_eq!(parse_number("1.5f"), Some(Value::Float(1.5)));
/// assert_eq!(parse_number("1e5"), None);
/// ```
#[must_use]
pub fn parse_number(text: &str) -> Option<Value> {
    if let Some(digits) = text.strip_suffix(['L', 'l']) {
        return is_whole(digits).then(|| digits.parse().ok().map(Value::Long))
                               .flatten();
    }
    if is_whole(text) {
        return match text.parse::<i32>() {
            Ok(value) => Some(Value::Int(value)),
            Err(_) => text.parse().ok().map(Value::Long),
        };
    }
    if let Some(decimal) = text.strip_suffix(['f', 'F']) {
        return is_decimal(decimal).then(|| decimal.parse().ok().map(Value::Float))
                                  .flatten();
    }

    let decimal = text.strip_suffix(['d', 'D']).unwrap_or(text);
    is_decimal(decimal).then(|| decimal.parse().ok().map(Value::Double))
                       .flatten()
}

fn is_whole(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_decimal(text: &str) -> bool {
    text.split_once('.')
        .is_some_and(|(whole, fraction)| {
            is_whole(whole) && !fraction.is_empty() && fraction.bytes().all(|b| b.is_ascii_digit())
        })
}
