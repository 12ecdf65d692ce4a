use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// The storage attribute holding an object's datatype string.
pub const DATATYPE_ATTR: &str = "datatype";

/// User metadata carried alongside an array.
///
/// Attributes are ordered by key so that equality and display are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns a copy without the `datatype` attribute, which storage layers manage themselves.
    pub fn without_datatype(&self) -> Self {
        let mut attrs = self.clone();
        attrs.remove(DATATYPE_ATTR);
        attrs
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Display for Attributes {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.0
                .iter()
                .format_with(", ", |(k, v), f| f(&format_args!("'{k}': '{v}'")))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_sorted() {
        let attrs: Attributes = [("units", "ns"), ("channel", "3")].into_iter().collect();
        assert_eq!(attrs.to_string(), "{'channel': '3', 'units': 'ns'}");
    }

    #[test]
    fn without_datatype_strips_storage_key() {
        let mut attrs = Attributes::new();
        attrs.insert(DATATYPE_ATTR, "array<1>{real}");
        attrs.insert("units", "adc");
        let stripped = attrs.without_datatype();
        assert_eq!(stripped.len(), 1);
        assert_eq!(stripped.get("units"), Some("adc"));
    }

    #[test]
    fn serde_as_plain_map() {
        let attrs: Attributes = [("units", "ns")].into_iter().collect();
        let json = serde_json::to_string(&attrs).unwrap();
        assert_eq!(json, r#"{"units":"ns"}"#);
        let back: Attributes = serde_json::from_str(&json).unwrap();
        assert_eq!(back, attrs);
    }
}
