//! @ai:module:intent Hold parsed annotations by case-insensitive name, in document order
//! @ai:module:layer domain
//! @ai:module:public_api AnnotationTable, InvalidValue
//! @ai:module:depends_on value
//! @ai:module:stateless true

use crate::value::{AnnotationValue, ChildRef};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::ops::Index;

/// @ai:intent Record of an embedded value that failed to decode and was kept as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidValue {
    pub annotation: String,
    pub line: usize,
    pub raw: String,
    pub message: String,
}

/// @ai:intent Ordered annotation table keyed by lowercased annotation name
/// @ai:invariant keys are stored lowercased and unique
/// @ai:invariant a name seen more than once holds a List of every value in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationTable {
    entries: Vec<(String, AnnotationValue)>,
    invalid: Vec<InvalidValue>,
}

impl AnnotationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Fold one annotation into the table using the duplicate-name policy
    /// @ai:post absent name => inserted as-is
    /// @ai:post present non-list => replaced by [old, new]
    /// @ai:post present list => value appended
    /// @ai:edge_cases a list written once (`@Tags [a, b]`) followed by a repeat appends to that list
    pub fn merge(&mut self, name: &str, value: AnnotationValue) {
        let key = name.to_lowercase();
        match self.position(&key) {
            None => self.entries.push((key, value)),
            Some(idx) => match &mut self.entries[idx].1 {
                AnnotationValue::List(items) => items.push(value),
                slot => {
                    let first = std::mem::replace(slot, AnnotationValue::Bool(false));
                    *slot = AnnotationValue::List(vec![first, value]);
                }
            },
        }
    }

    pub(crate) fn record_invalid(&mut self, invalid: InvalidValue) {
        self.invalid.push(invalid);
    }

    /// @ai:intent Look up an annotation ignoring case
    /// @ai:example ("Entity") on {entity: true} -> Some(true)
    pub fn get(&self, name: &str) -> Option<&AnnotationValue> {
        self.position(&name.to_lowercase()).map(|idx| &self.entries[idx].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Alias of [`AnnotationTable::contains`].
    pub fn is_annotated_with(&self, name: &str) -> bool {
        self.contains(name)
    }

    /// @ai:intent Check whether a nested path resolves to a value
    /// @ai:pre first segment names an annotation; later segments name parameters, list indexes or JSON keys
    /// @ai:post empty path => whether the table has any annotation
    /// @ai:example (["entity", "table"]) on {entity: {table: users}} -> true
    /// @ai:effects pure
    pub fn has_annotation(&self, path: &[&str]) -> bool {
        match path.split_first() {
            None => !self.is_empty(),
            Some(_) => self.resolve(path).is_some(),
        }
    }

    /// @ai:intent Return an annotation as a list whether or not it was repeated
    /// @ai:post missing => empty; List => its items; anything else => one-element list
    /// @ai:example ("param") on {param: [a, b]} -> [a, b]
    /// @ai:example ("entity") on {entity: {table: users}} -> [{table: users}]
    pub fn as_list(&self, name: &str) -> Vec<AnnotationValue> {
        self.as_list_at(&[name])
    }

    /// @ai:intent Same as `as_list`, for a nested path
    /// @ai:effects pure
    pub fn as_list_at(&self, path: &[&str]) -> Vec<AnnotationValue> {
        match self.resolve(path) {
            None => Vec::new(),
            Some(ChildRef::Value(AnnotationValue::List(items))) => items.clone(),
            Some(ChildRef::Value(value)) => vec![value.clone()],
            Some(ChildRef::Json(json)) => vec![AnnotationValue::Json(json.clone())],
        }
    }

    /// Overwrites any existing value for `name`; the merge policy does not apply.
    pub fn insert(&mut self, name: &str, value: AnnotationValue) -> Option<AnnotationValue> {
        let key = name.to_lowercase();
        match self.position(&key) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<AnnotationValue> {
        let idx = self.position(&name.to_lowercase())?;
        Some(self.entries.remove(idx).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lowercased names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnnotationValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Embedded values that could not be decoded and were kept as strings.
    pub fn invalid_values(&self) -> &[InvalidValue] {
        &self.invalid
    }

    /// @ai:intent Keep only the named annotations, matched ignoring case
    /// @ai:post invalid value records of dropped annotations are dropped too
    pub fn retain_names(&mut self, names: &[String]) {
        let keep = |name: &str| names.iter().any(|n| n.eq_ignore_ascii_case(name));
        self.entries.retain(|(k, _)| keep(k));
        self.invalid.retain(|invalid| keep(&invalid.annotation));
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    fn resolve(&self, path: &[&str]) -> Option<ChildRef<'_>> {
        let (first, rest) = path.split_first()?;
        let mut current = ChildRef::Value(self.get(first)?);
        for segment in rest {
            current = current.child(segment)?;
        }
        Some(current)
    }
}

impl Index<&str> for AnnotationTable {
    type Output = AnnotationValue;

    /// Panics when the annotation is absent.
    fn index(&self, name: &str) -> &AnnotationValue {
        match self.get(name) {
            Some(value) => value,
            None => panic!("no annotation named @{name}"),
        }
    }
}

impl<K: AsRef<str>> FromIterator<(K, AnnotationValue)> for AnnotationTable {
    fn from_iter<I: IntoIterator<Item = (K, AnnotationValue)>>(iter: I) -> Self {
        let mut table = AnnotationTable::new();
        for (name, value) in iter {
            table.merge(name.as_ref(), value);
        }
        table
    }
}

impl Serialize for AnnotationTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
