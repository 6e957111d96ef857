//! @ai:module:intent Coerce raw annotation text into typed values
//! @ai:module:layer domain
//! @ai:module:public_api coerce, split_top_level
//! @ai:module:depends_on value, error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::value::AnnotationValue;
use regex::Regex;
use std::sync::LazyLock;

static RE_NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$").expect("Invalid regex")
});

/// @ai:intent Coerce raw parameter text into a typed annotation value
/// @ai:pre none; any text is accepted
/// @ai:post Err only when `{...}` text is not valid JSON
/// @ai:example ("true") -> Bool(true)
/// @ai:example ("3.0") -> Int(3)
/// @ai:example ("\"123\"") -> Int(123)
/// @ai:example ("[a, b]") -> List[Str(a), Str(b)]
/// @ai:effects pure
pub fn coerce(raw: &str) -> Result<AnnotationValue> {
    let text = raw.trim();

    if let Some(inner) = strip_pair(text, '[', ']') {
        if inner.trim().is_empty() {
            return Ok(AnnotationValue::List(Vec::new()));
        }
        return split_top_level(inner)
            .into_iter()
            .map(coerce)
            .collect::<Result<Vec<_>>>()
            .map(AnnotationValue::List);
    }

    if strip_pair(text, '{', '}').is_some() {
        return serde_json::from_str(text)
            .map(AnnotationValue::Json)
            .map_err(|source| Error::InvalidValue {
                annotation: String::new(),
                raw: text.to_string(),
                source,
            });
    }

    // Quoted text is re-coerced, so "true" and "123" keep their literal types.
    if let Some(inner) = strip_pair(text, '"', '"') {
        return coerce(inner);
    }

    if text.eq_ignore_ascii_case("true") {
        return Ok(AnnotationValue::Bool(true));
    }
    if text.eq_ignore_ascii_case("false") {
        return Ok(AnnotationValue::Bool(false));
    }

    if let Some(number) = coerce_number(text) {
        return Ok(number);
    }

    Ok(AnnotationValue::Str(text.to_string()))
}

/// @ai:intent Turn numeric text into Int when it has no fractional part, else Float
/// @ai:example ("42") -> Some(Int(42))
/// @ai:example ("3.14") -> Some(Float(3.14))
/// @ai:example ("abc") -> None
/// @ai:effects pure
fn coerce_number(text: &str) -> Option<AnnotationValue> {
    if !RE_NUMERIC.is_match(text) {
        return None;
    }
    if let Ok(int) = text.parse::<i64>() {
        return Some(AnnotationValue::Int(int));
    }

    let float = text.parse::<f64>().ok()?;
    let in_range = float >= i64::MIN as f64 && float < i64::MAX as f64;
    if float.is_finite() && float.fract() == 0.0 && in_range {
        Some(AnnotationValue::Int(float as i64))
    } else {
        Some(AnnotationValue::Float(float))
    }
}

/// Inner text when `text` is wrapped in `open` ... `close`.
fn strip_pair(text: &str, open: char, close: char) -> Option<&str> {
    if text.len() >= 2 && text.starts_with(open) && text.ends_with(close) {
        Some(&text[open.len_utf8()..text.len() - close.len_utf8()])
    } else {
        None
    }
}

/// @ai:intent Split text on commas that are not nested in brackets, braces, parens or quotes
/// @ai:post segments are returned untrimmed and in order; an input without commas yields one segment
/// @ai:example ("a, [b, c], \"d, e\"") -> ["a", " [b, c]", " \"d, e\""]
/// @ai:edge_cases unbalanced closers never drive the depth below zero
/// @ai:effects pure
pub fn split_top_level(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth: usize = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        if in_quotes {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quotes = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            '[' | '{' | '(' => depth += 1,
            ']' | '}' | ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                segments.push(&text[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }

    segments.push(&text[start..]);
    segments
}
