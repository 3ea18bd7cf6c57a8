use crate::{interpreter::value::core::Value, util::num::parse_number};

/// Resolves a finished literal buffer.
///
/// The buffer is trimmed first; an empty buffer yields `None`. Text enclosed
/// in one pair of double quotes yields the inner text verbatim. Any other
/// text is looked up with `lookup` and, if unbound, parsed with
/// [`parse_literal`].
///
/// # Example
/// ```
/// use interplay::interpreter::{evaluator::literal::resolve_literal, value::core::Value};
///
/// let lookup = |name: &str| (name == "x").then(|| Value::Int(7));
///
/// assert_eq!(resolve_literal("  x ", lookup), Some(Value::Int(7)));
/// assert_eq!(resolve_literal(" \"  a,b  \" ", lookup), Some(Value::from("  a,b  ")));
/// assert_eq!(resolve_literal("\"x\"", lookup), Some(Value::from("x")));
/// assert_eq!(resolve_literal("   ", lookup), None);
/// ```
pub fn resolve_literal(raw: &str, lookup: impl FnOnce(&str) -> Option<Value>) -> Option<Value> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(inner) = unquote(text) {
        return Some(Value::from(inner));
    }

    Some(lookup(text).unwrap_or_else(|| parse_literal(text)))
}

/// Parses unbound literal text.
///
/// Recognises `true`, `false`, `null` and numbers; everything else is kept
/// as a string.
#[must_use]
pub fn parse_literal(text: &str) -> Value {
    match text {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => parse_number(text).unwrap_or_else(|| Value::from(text)),
    }
}

fn unquote(text: &str) -> Option<&str> {
    if text.len() < 2 {
        return None;
    }

    text.strip_prefix('"')?.strip_suffix('"')
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn unbound(_: &str) -> Option<Value> {
        None
    }

    #[test]
    fn keywords_and_numbers() {
        assert_eq!(parse_literal("true"), Value::Bool(true));
        assert_eq!(parse_literal("null"), Value::Null);
        assert_eq!(parse_literal("12"), Value::Int(12));
        assert_eq!(parse_literal("2.5"), Value::Double(2.5));
        assert_eq!(parse_literal("java.util.List"), Value::from("java.util.List"));
    }

    #[test]
    fn unquoted_text_is_trimmed() {
        assert_eq!(resolve_literal("  a,b  ", unbound), Some(Value::from("a,b")));
    }

    #[test]
    fn quoted_text_skips_lookup_and_parsing() {
        let bound = |_: &str| Some(Value::Int(1));

        assert_eq!(resolve_literal("\"12\"", bound), Some(Value::from("12")));
        assert_eq!(resolve_literal("\"\"", bound), Some(Value::from("")));
    }

    #[test]
    fn lone_quote_is_text() {
        assert_eq!(resolve_literal("\"", unbound), Some(Value::from("\"")));
    }
}
