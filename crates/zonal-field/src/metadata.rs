//! Key/value annotations attached to a field.

use std::fmt;

use indexmap::IndexMap;

/// A metadata value.
#[derive(Clone, Debug, PartialEq)]
pub enum MetadataValue {
    /// Boolean flag.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Real number.
    Real(f64),
    /// Text.
    Text(String),
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for MetadataValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for MetadataValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for MetadataValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for MetadataValue {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for MetadataValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Insertion-ordered map of metadata entries.
///
/// Typed getters return `None` both for a missing key and for a key
/// holding another kind of value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    entries: IndexMap<String, MetadataValue>,
}

impl Metadata {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing any previous value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Whether `key` is present.
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Raw value of `key`.
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.entries.get(key)
    }

    /// `key` as a boolean.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            MetadataValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// `key` as an integer.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            MetadataValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// `key` as a real. Integers widen.
    pub fn get_real(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            MetadataValue::Real(v) => Some(*v),
            MetadataValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// `key` as text.
    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            MetadataValue::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Remove `key`, keeping the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<MetadataValue> {
        self.entries.shift_remove(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_getters() {
        let mut md = Metadata::new();
        md.set("units", "K").set("levels", 137).set("scale", 0.5).set("global", true);
        assert_eq!(md.get_text("units"), Some("K"));
        assert_eq!(md.get_int("levels"), Some(137));
        assert_eq!(md.get_real("levels"), Some(137.0));
        assert_eq!(md.get_real("scale"), Some(0.5));
        assert_eq!(md.get_bool("global"), Some(true));
        assert_eq!(md.get_int("units"), None);
        assert_eq!(md.get_bool("missing"), None);
    }

    #[test]
    fn insertion_order_kept_on_replace_and_remove() {
        let mut md = Metadata::new();
        md.set("a", 1).set("b", 2).set("c", 3);
        md.set("a", "one");
        md.remove("b");
        let keys: Vec<&str> = md.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "c"]);
        assert_eq!(md.get("a").map(|v| v.to_string()), Some("one".into()));
        assert_eq!(md.len(), 2);
    }
}
