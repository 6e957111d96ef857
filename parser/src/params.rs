//! @ai:module:intent Split raw annotation parameter text into key/value pairs
//! @ai:module:layer domain
//! @ai:module:public_api split_params, resolve_params, resolve_params_lenient, ParamText
//! @ai:module:depends_on coerce, value, error
//! @ai:module:stateless true

use crate::coerce::{coerce, split_top_level};
use crate::error::{Error, Result};
use crate::value::{AnnotationValue, Params};
use regex::Regex;
use std::sync::LazyLock;

static RE_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*([A-Za-z0-9_]+)\s*=\s*(.*?)\s*$").expect("Invalid regex"));

/// @ai:intent Shape of an annotation's parameter text after splitting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamText {
    /// `key = value` pairs in source order, values still raw.
    Named(Vec<(String, String)>),
    /// A single unnamed value, trimmed.
    Single(String),
    /// Nothing after the annotation name.
    Empty,
}

/// @ai:intent Split parameter text into named pairs or a single unnamed value
/// @ai:pre raw is the text following the annotation name, with or without parentheses
/// @ai:post Named is returned only when at least one segment looks like `key = value`
/// @ai:example ("(name = table)") -> Named[(name, table)]
/// @ai:example (" is awesome!") -> Single("is awesome!")
/// @ai:example ("") -> Empty
/// @ai:edge_cases segments that are not `key = value` are dropped once any pair exists
/// @ai:effects pure
pub fn split_params(raw: &str) -> ParamText {
    let inner = strip_parens(raw.trim());

    let pairs: Vec<(String, String)> = split_top_level(inner)
        .into_iter()
        .filter_map(|segment| {
            RE_PARAM
                .captures(segment)
                .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        })
        .collect();

    if !pairs.is_empty() {
        return ParamText::Named(pairs);
    }

    let single = inner.trim();
    if single.is_empty() {
        ParamText::Empty
    } else {
        ParamText::Single(single.to_string())
    }
}

/// @ai:intent Resolve raw parameter text all the way to a typed value
/// @ai:example ("(a = 1, b = [x, y])") -> Map{a: Int(1), b: List[x, y]}
/// @ai:example ("") -> Bool(true)
/// @ai:effects pure
pub fn resolve_params(raw: &str) -> Result<AnnotationValue> {
    match split_params(raw) {
        ParamText::Named(pairs) => {
            let mut params = Params::new();
            for (key, value) in pairs {
                params.insert(key, coerce(&value)?);
            }
            Ok(AnnotationValue::Map(params))
        }
        ParamText::Single(value) => coerce(&value),
        ParamText::Empty => Ok(AnnotationValue::Bool(true)),
    }
}

/// @ai:intent Resolve parameter text, keeping undecodable values as their raw text
/// @ai:post every decode failure is pushed to `errors`; the failing value becomes `Str(raw)`
/// @ai:edge_cases only the offending parameter degrades, its siblings keep their types
/// @ai:effects pure
pub fn resolve_params_lenient(raw: &str, errors: &mut Vec<Error>) -> AnnotationValue {
    let mut coerce_or_text = |text: &str| {
        coerce(text).unwrap_or_else(|err| {
            errors.push(err);
            AnnotationValue::Str(text.trim().to_string())
        })
    };

    match split_params(raw) {
        ParamText::Named(pairs) => AnnotationValue::Map(
            pairs
                .into_iter()
                .map(|(key, value)| (key, coerce_or_text(&value)))
                .collect(),
        ),
        ParamText::Single(value) => coerce_or_text(&value),
        ParamText::Empty => AnnotationValue::Bool(true),
    }
}

/// A leading `(` is dropped together with a trailing `)` if one is there, so
/// an unterminated multi-line block still splits.
fn strip_parens(text: &str) -> &str {
    match text.strip_prefix('(') {
        Some(rest) => rest.strip_suffix(')').unwrap_or(rest),
        None => text,
    }
}
