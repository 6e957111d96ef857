//! @ai:module:intent Define the typed values carried by annotations
//! @ai:module:layer domain
//! @ai:module:public_api AnnotationValue, Params
//! @ai:module:stateless true

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// @ai:intent A typed annotation value produced by coercion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<AnnotationValue>),
    /// Parameterized form, `@Name(key = value, ...)`.
    Map(Params),
    /// Embedded JSON document, kept exactly as decoded.
    Json(serde_json::Value),
}

impl AnnotationValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnnotationValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AnnotationValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AnnotationValue::Float(f) => Some(*f),
            AnnotationValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnnotationValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AnnotationValue]> {
        match self {
            AnnotationValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_params(&self) -> Option<&Params> {
        match self {
            AnnotationValue::Map(params) => Some(params),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            AnnotationValue::Json(json) => Some(json),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, AnnotationValue::List(_))
    }

    /// @ai:intent Look up one step of a nested path inside this value
    /// @ai:example Map{name: "x"}.child("name") -> Some("x")
    /// @ai:example List[a, b].child("1") -> Some(b)
    /// @ai:effects pure
    pub(crate) fn child(&self, segment: &str) -> Option<ChildRef<'_>> {
        match self {
            AnnotationValue::Map(params) => params.get_ignore_case(segment).map(ChildRef::Value),
            AnnotationValue::List(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|idx| items.get(idx))
                .map(ChildRef::Value),
            AnnotationValue::Json(json) => json_child(json, segment).map(ChildRef::Json),
            _ => None,
        }
    }
}

/// Borrowed step of a path walk; JSON documents are walked on their own terms.
#[derive(Clone, Copy)]
pub(crate) enum ChildRef<'a> {
    Value(&'a AnnotationValue),
    Json(&'a serde_json::Value),
}

impl<'a> ChildRef<'a> {
    pub(crate) fn child(&self, segment: &str) -> Option<ChildRef<'a>> {
        match *self {
            ChildRef::Value(value) => value.child(segment),
            ChildRef::Json(json) => json_child(json, segment).map(ChildRef::Json),
        }
    }
}

fn json_child<'a>(json: &'a serde_json::Value, segment: &str) -> Option<&'a serde_json::Value> {
    match json {
        serde_json::Value::Object(map) => map.get(segment),
        serde_json::Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

impl From<bool> for AnnotationValue {
    fn from(b: bool) -> Self {
        AnnotationValue::Bool(b)
    }
}

impl From<i64> for AnnotationValue {
    fn from(i: i64) -> Self {
        AnnotationValue::Int(i)
    }
}

impl From<f64> for AnnotationValue {
    fn from(f: f64) -> Self {
        AnnotationValue::Float(f)
    }
}

impl From<&str> for AnnotationValue {
    fn from(s: &str) -> Self {
        AnnotationValue::Str(s.to_string())
    }
}

impl From<String> for AnnotationValue {
    fn from(s: String) -> Self {
        AnnotationValue::Str(s)
    }
}

impl From<Vec<AnnotationValue>> for AnnotationValue {
    fn from(items: Vec<AnnotationValue>) -> Self {
        AnnotationValue::List(items)
    }
}

impl From<Params> for AnnotationValue {
    fn from(params: Params) -> Self {
        AnnotationValue::Map(params)
    }
}

/// @ai:intent Ordered parameter map with case-sensitive keys
/// @ai:invariant keys are unique; a repeated key overwrites in place
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, AnnotationValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Insert a parameter, replacing an existing key without moving it
    /// @ai:post returns the replaced value, if any
    pub fn insert(&mut self, key: impl Into<String>, value: AnnotationValue) -> Option<AnnotationValue> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&AnnotationValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Exact match wins; otherwise the first key equal ignoring ASCII case.
    pub fn get_ignore_case(&self, key: &str) -> Option<&AnnotationValue> {
        self.get(key).or_else(|| {
            self.entries
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnnotationValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, AnnotationValue)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, AnnotationValue)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
