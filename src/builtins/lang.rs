use std::{
    fmt,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::{
    builtins::{arg, arg_double, arg_int, arg_long, arg_object, arg_str, int_value, natives},
    interpreter::{
        types::catalog::TypeCatalog,
        value::{
            core::{CHAR_SEQUENCE_TYPE, OBJECT_TYPE, Value},
            object::ObjectRef,
        },
    },
};

/// `java.lang.Math`
pub const MATH_TYPE: &str = "java.lang.Math";
/// `java.lang.StringBuilder`
pub const STRING_BUILDER_TYPE: &str = "java.lang.StringBuilder";

static NEXT_OBJECT_ID: AtomicUsize = AtomicUsize::new(1);

/// State of a plain `java.lang.Object`; prints as `java.lang.Object@<id>`.
#[derive(Debug)]
pub struct PlainObject {
    id: usize,
}

impl fmt::Display for PlainObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{OBJECT_TYPE}@{:x}", self.id)
    }
}

/// State of a `java.lang.StringBuilder`.
#[derive(Debug, Default)]
pub struct StringBuilderState {
    text: String,
}

impl fmt::Display for StringBuilderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Declares the `java.lang` types that are not value types.
pub fn declare(catalog: &mut TypeCatalog) {
    catalog.declare_type(MATH_TYPE, &[]);
    catalog.declare_type(STRING_BUILDER_TYPE, &[CHAR_SEQUENCE_TYPE]);
}

natives! {
    NATIVES {
        Constructor "java.lang.Object" "()" => object_new,
        Instance "java.lang.Object" . "toString" "()" => object_to_string,
        Instance "java.lang.Object" . "equals" "(Object)" => object_equals,

        Constructor "java.lang.String" "(String)" => string_new,
        Instance "java.lang.String" . "length" "()" => string_length,
        Instance "java.lang.String" . "toUpperCase" "()" => string_to_upper_case,
        Instance "java.lang.String" . "toLowerCase" "()" => string_to_lower_case,
        Instance "java.lang.String" . "trim" "()" => string_trim,
        Instance "java.lang.String" . "concat" "(String)" => string_concat,
        Instance "java.lang.String" . "charAt" "(int)" => string_char_at,
        Instance "java.lang.String" . "substring" "(int)" => string_substring_from,
        Instance "java.lang.String" . "substring" "(int, int)" => string_substring,
        Instance "java.lang.String" . "contains" "(CharSequence)" => string_contains,
        Instance "java.lang.String" . "isEmpty" "()" => string_is_empty,
        Instance "java.lang.String" . "repeat" "(int)" => string_repeat,
        Static "java.lang.String" . "valueOf" "(Object)" => string_value_of,
        Static "java.lang.String" . "join" "(CharSequence, Object...)" => string_join,

        Static "java.lang.Integer" . "parseInt" "(String)" => integer_parse,
        Static "java.lang.Integer" . "valueOf" "(int)" => integer_value_of,
        Static "java.lang.Integer" . "valueOf" "(String)" => integer_parse,
        Static "java.lang.Integer" . "toString" "(int)" => integer_to_string,
        Static "java.lang.Integer" . "sum" "(int, int)" => integer_sum,
        Static "java.lang.Long" . "parseLong" "(String)" => long_parse,
        Static "java.lang.Double" . "parseDouble" "(String)" => double_parse,
        Instance "java.lang.Number" . "intValue" "()" => number_int_value,
        Instance "java.lang.Number" . "longValue" "()" => number_long_value,
        Instance "java.lang.Number" . "doubleValue" "()" => number_double_value,

        Static "java.lang.Math" . "max" "(int, int)" => math_max_int,
        Static "java.lang.Math" . "max" "(long, long)" => math_max_long,
        Static "java.lang.Math" . "max" "(double, double)" => math_max_double,
        Static "java.lang.Math" . "min" "(int, int)" => math_min_int,
        Static "java.lang.Math" . "min" "(long, long)" => math_min_long,
        Static "java.lang.Math" . "min" "(double, double)" => math_min_double,
        Static "java.lang.Math" . "abs" "(int)" => math_abs_int,
        Static "java.lang.Math" . "abs" "(double)" => math_abs_double,
        Static "java.lang.Math" . "pow" "(double, double)" => math_pow,
        Static "java.lang.Math" . "sqrt" "(double)" => math_sqrt,

        Constructor "java.lang.StringBuilder" "()" => builder_new,
        Constructor "java.lang.StringBuilder" "(String)" => builder_from,
        Instance "java.lang.StringBuilder" . "append" "(Object)" => builder_append,
        Instance "java.lang.StringBuilder" . "length" "()" => builder_length,
        Instance "java.lang.StringBuilder" . "reverse" "()" => builder_reverse,
        Instance "java.lang.StringBuilder" . "toString" "()" => object_to_string,
    }
}

fn object_new(_: &[Value]) -> Result<Value, String> {
    let id = NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed);
    Ok(Value::from(ObjectRef::new(OBJECT_TYPE, PlainObject { id })))
}

fn object_to_string(args: &[Value]) -> Result<Value, String> {
    Ok(Value::from(arg(args, 0)?.to_string()))
}

fn object_equals(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Bool(arg(args, 0)? == arg(args, 1)?))
}

fn string_new(args: &[Value]) -> Result<Value, String> {
    arg_str(args, 0).map(Value::from)
}

fn string_length(args: &[Value]) -> Result<Value, String> {
    int_value(arg_str(args, 0)?.chars().count())
}

fn string_to_upper_case(args: &[Value]) -> Result<Value, String> {
    Ok(Value::from(arg_str(args, 0)?.to_uppercase()))
}

fn string_to_lower_case(args: &[Value]) -> Result<Value, String> {
    Ok(Value::from(arg_str(args, 0)?.to_lowercase()))
}

fn string_trim(args: &[Value]) -> Result<Value, String> {
    arg_str(args, 0).map(|s| Value::from(s.trim()))
}

fn string_concat(args: &[Value]) -> Result<Value, String> {
    Ok(Value::from(format!("{}{}", arg_str(args, 0)?, arg_str(args, 1)?)))
}

fn string_char_at(args: &[Value]) -> Result<Value, String> {
    let text = arg_str(args, 0)?;
    let index = arg_int(args, 1)?;

    usize::try_from(index).ok()
                          .and_then(|i| text.chars().nth(i))
                          .map(Value::Char)
                          .ok_or_else(|| format!("Index {index} out of bounds for length {}",
                                                 text.chars().count()))
}

/// Returns the characters of `text` in `begin..end`, counting characters.
fn char_range(text: &str, begin: i32, end: i32) -> Result<Value, String> {
    let len = text.chars().count();
    let (Ok(from), Ok(to)) = (usize::try_from(begin), usize::try_from(end)) else {
        return Err(format!("begin {begin}, end {end}, length {len}"));
    };
    if from > to || to > len {
        return Err(format!("begin {begin}, end {end}, length {len}"));
    }

    Ok(Value::from(text.chars().skip(from).take(to - from).collect::<String>()))
}

fn string_substring_from(args: &[Value]) -> Result<Value, String> {
    let text = arg_str(args, 0)?;
    let end = i32::try_from(text.chars().count()).map_err(|e| e.to_string())?;
    char_range(text, arg_int(args, 1)?, end)
}

fn string_substring(args: &[Value]) -> Result<Value, String> {
    char_range(arg_str(args, 0)?, arg_int(args, 1)?, arg_int(args, 2)?)
}

fn string_contains(args: &[Value]) -> Result<Value, String> {
    let needle = match arg(args, 1)? {
        Value::Null => return Err("contains(null)".to_string()),
        value => value.to_string(),
    };
    Ok(Value::Bool(arg_str(args, 0)?.contains(&needle)))
}

fn string_is_empty(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Bool(arg_str(args, 0)?.is_empty()))
}

fn string_repeat(args: &[Value]) -> Result<Value, String> {
    let count = arg_int(args, 1)?;
    let count = usize::try_from(count).map_err(|_| format!("count is negative: {count}"))?;
    Ok(Value::from(arg_str(args, 0)?.repeat(count)))
}

fn string_value_of(args: &[Value]) -> Result<Value, String> {
    Ok(Value::from(arg(args, 0)?.to_string()))
}

fn string_join(args: &[Value]) -> Result<Value, String> {
    let separator = arg(args, 0)?.to_string();
    let Value::Array(items) = arg(args, 1)? else {
        return Err("expected elements to join".to_string());
    };

    Ok(Value::from(items.iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(&separator)))
}

fn integer_parse(args: &[Value]) -> Result<Value, String> {
    let text = arg_str(args, 0)?;
    text.parse()
        .map(Value::Int)
        .map_err(|_| format!("For input string: \"{text}\""))
}

fn integer_value_of(args: &[Value]) -> Result<Value, String> {
    arg_int(args, 0).map(Value::Int)
}

fn integer_to_string(args: &[Value]) -> Result<Value, String> {
    Ok(Value::from(arg_int(args, 0)?.to_string()))
}

fn integer_sum(args: &[Value]) -> Result<Value, String> {
    let (a, b) = (arg_int(args, 0)?, arg_int(args, 1)?);
    a.checked_add(b)
     .map(Value::Int)
     .ok_or_else(|| format!("integer overflow: {a} + {b}"))
}

fn long_parse(args: &[Value]) -> Result<Value, String> {
    let text = arg_str(args, 0)?;
    text.parse()
        .map(Value::Long)
        .map_err(|_| format!("For input string: \"{text}\""))
}

fn double_parse(args: &[Value]) -> Result<Value, String> {
    let text = arg_str(args, 0)?;
    text.trim()
        .parse()
        .map(Value::Double)
        .map_err(|_| format!("For input string: \"{text}\""))
}

#[allow(clippy::cast_possible_truncation)]
fn number_int_value(args: &[Value]) -> Result<Value, String> {
    match arg(args, 0)? {
        Value::Float(f) => Ok(Value::Int(*f as i32)),
        Value::Double(d) => Ok(Value::Int(*d as i32)),
        other => other.as_integral()
                      .map(|n| Value::Int(n as i32))
                      .ok_or_else(|| format!("{} is not a number", other.type_name())),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn number_long_value(args: &[Value]) -> Result<Value, String> {
    match arg(args, 0)? {
        Value::Float(f) => Ok(Value::Long(*f as i64)),
        Value::Double(d) => Ok(Value::Long(*d as i64)),
        other => other.as_integral()
                      .map(Value::Long)
                      .ok_or_else(|| format!("{} is not a number", other.type_name())),
    }
}

#[allow(clippy::cast_precision_loss)]
fn number_double_value(args: &[Value]) -> Result<Value, String> {
    match arg(args, 0)? {
        Value::Float(f) => Ok(Value::Double(f64::from(*f))),
        Value::Double(d) => Ok(Value::Double(*d)),
        other => other.as_integral()
                      .map(|n| Value::Double(n as f64))
                      .ok_or_else(|| format!("{} is not a number", other.type_name())),
    }
}

fn math_max_int(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Int(arg_int(args, 0)?.max(arg_int(args, 1)?)))
}

fn math_max_long(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Long(arg_long(args, 0)?.max(arg_long(args, 1)?)))
}

fn math_max_double(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Double(arg_double(args, 0)?.max(arg_double(args, 1)?)))
}

fn math_min_int(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Int(arg_int(args, 0)?.min(arg_int(args, 1)?)))
}

fn math_min_long(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Long(arg_long(args, 0)?.min(arg_long(args, 1)?)))
}

fn math_min_double(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Double(arg_double(args, 0)?.min(arg_double(args, 1)?)))
}

fn math_abs_int(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Int(arg_int(args, 0)?.wrapping_abs()))
}

fn math_abs_double(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Double(arg_double(args, 0)?.abs()))
}

fn math_pow(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Double(arg_double(args, 0)?.powf(arg_double(args, 1)?)))
}

fn math_sqrt(args: &[Value]) -> Result<Value, String> {
    Ok(Value::Double(arg_double(args, 0)?.sqrt()))
}

fn builder_new(_: &[Value]) -> Result<Value, String> {
    Ok(Value::from(ObjectRef::new(STRING_BUILDER_TYPE, StringBuilderState::default())))
}

fn builder_from(args: &[Value]) -> Result<Value, String> {
    let text = arg_str(args, 0)?.to_string();
    Ok(Value::from(ObjectRef::new(STRING_BUILDER_TYPE, StringBuilderState { text })))
}

/// Applies `f` to the builder state of the receiver and returns the
/// receiver.
fn with_builder(args: &[Value], f: impl FnOnce(&mut StringBuilderState)) -> Result<Value, String> {
    let receiver = arg_object(args, 0)?;
    receiver.with_mut(f)
            .ok_or_else(|| format!("{} is not a StringBuilder", receiver.class()))?;
    Ok(Value::from(receiver.clone()))
}

fn builder_append(args: &[Value]) -> Result<Value, String> {
    let suffix = arg(args, 1)?.to_string();
    with_builder(args, |state| state.text.push_str(&suffix))
}

fn builder_length(args: &[Value]) -> Result<Value, String> {
    let receiver = arg_object(args, 0)?;
    let len = receiver.with(|state: &StringBuilderState| state.text.chars().count())
                      .ok_or_else(|| format!("{} is not a StringBuilder", receiver.class()))?;
    int_value(len)
}

fn builder_reverse(args: &[Value]) -> Result<Value, String> {
    with_builder(args, |state| state.text = state.text.chars().rev().collect())
}
