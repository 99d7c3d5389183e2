// src/table/mod.rs

pub mod filter;
pub mod project;

pub use filter::filter_by_field;
pub use project::{project, Projection};

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A grid of text cells exactly as the sheet returned it.
/// Rows are ragged and may be entirely blank.
pub type RawTable = Vec<Vec<String>>;

/// One data row projected against a header: field → text value,
/// in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            fields: Vec::with_capacity(n),
        }
    }

    /// Set `name` to `value`. A repeated name keeps its first position
    /// and takes the latest value.
    pub fn insert(&mut self, name: &str, value: String) {
        match self.fields.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_name_keeps_first_slot() {
        let mut rec = Record::default();
        rec.insert("Email", "a".into());
        rec.insert("Process", "Eng".into());
        rec.insert("Email", "b".into());

        assert_eq!(rec.len(), 2);
        assert_eq!(rec.get("Email"), Some("b"));
        assert_eq!(rec.keys().collect::<Vec<_>>(), vec!["Email", "Process"]);
        assert_eq!(
            rec.iter().collect::<Vec<_>>(),
            vec![("Email", "b"), ("Process", "Eng")]
        );
    }

    #[test]
    fn test_serializes_in_header_order() {
        let mut rec = Record::default();
        rec.insert("Zeta", "1".into());
        rec.insert("Alpha", "2".into());
        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(json, r#"{"Zeta":"1","Alpha":"2"}"#);
    }
}
