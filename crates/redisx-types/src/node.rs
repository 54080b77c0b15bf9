//! Decoded results of index and node queries.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::vector::Vector;

/// Index description returned by `USEARCH.INDEX.GET`.
///
/// The store decides which keys it reports; values are kept as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexInfo {
    options: HashMap<String, String>,
}

impl IndexInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an option, replacing any earlier value for the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.options.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Parse an option as an unsigned integer.
    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn options(&self) -> &HashMap<String, String> {
        &self.options
    }

    pub fn into_map(self) -> HashMap<String, String> {
        self.options
    }
}

impl From<HashMap<String, String>> for IndexInfo {
    fn from(options: HashMap<String, String>) -> Self {
        Self { options }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for IndexInfo {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            options: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// One node returned by a node lookup or a nearest-neighbor search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMatch {
    /// Node identifier as reported by the store; the node name when the
    /// store reports no separate id
    pub id: String,
    /// Node name, when the store reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Distance to the query (search results only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Stored vector, when the store returned it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vector>,
}

impl NodeMatch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            distance: None,
            vector: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn with_vector(mut self, vector: Vector) -> Self {
        self.vector = Some(vector);
        self
    }

    /// The identifier as a numeric key, when it is one.
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_info_lookup() {
        let info: IndexInfo = vec![("dim", "3"), ("metric", "IP")].into_iter().collect();
        assert_eq!(info.len(), 2);
        assert_eq!(info.get("metric"), Some("IP"));
        assert_eq!(info.get_usize("dim"), Some(3));
        assert_eq!(info.get("missing"), None);
        assert_eq!(info.get_usize("metric"), None);
    }

    #[test]
    fn test_index_info_insert_replaces() {
        let mut info = IndexInfo::new();
        info.insert("dim", "3");
        info.insert("dim", "4");
        assert_eq!(info.get("dim"), Some("4"));
        assert_eq!(info.len(), 1);
    }

    #[test]
    fn test_node_match_builder() {
        let m = NodeMatch::new("42")
            .with_name("usearch.idx0.n42")
            .with_distance(0.5)
            .with_vector(Vector::Int(vec![1, 0]));
        assert_eq!(m.numeric_id(), Some(42));
        assert_eq!(m.name.as_deref(), Some("usearch.idx0.n42"));
        assert_eq!(m.distance, Some(0.5));
        assert!(m.vector.as_ref().unwrap().is_int());
        assert_eq!(NodeMatch::new("n1").numeric_id(), None);
    }

    #[test]
    fn test_node_match_json_skips_absent_fields() {
        let json = serde_json::to_string(&NodeMatch::new("7")).unwrap();
        assert_eq!(json, r#"{"id":"7"}"#);
    }
}
