//! Flattened, JSON-shaped views of individuals.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

/// Key carrying the bare id of a record.
pub const ID_KEY: &str = "$id";

/// One flattened individual: an ordered map that always carries `$id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Json>);

impl Record {
    /// Starts a record for `id`.
    #[must_use]
    pub fn new(id: &str) -> Self {
        let mut map = Map::new();
        map.insert(ID_KEY.to_owned(), Json::from(id));
        Self(map)
    }

    /// Bare id of the record.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_KEY).and_then(Json::as_str)
    }

    /// Field lookup.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Json> {
        self.0.get(key)
    }

    /// Sets a field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Json) {
        self.0.insert(key.into(), value);
    }

    /// Appends to the list under `key`, creating it if needed.
    pub fn push(&mut self, key: &str, value: Json) {
        let slot = self
            .0
            .entry(key.to_owned())
            .or_insert_with(|| Json::Array(Vec::new()));
        match slot {
            Json::Array(items) => items.push(value),
            other => *other = Json::Array(vec![other.take(), value]),
        }
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Converts into a JSON object.
    #[must_use]
    pub fn into_json(self) -> Json {
        Json::Object(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn push_creates_and_extends_lists() {
        let mut record = Record::new("we1");
        record.push("hasName", json!("Engineer"));
        record.push("hasName", json!("Lead"));
        assert_eq!(record.get("hasName"), Some(&json!(["Engineer", "Lead"])));
        assert_eq!(record.id(), Some("we1"));
    }

    #[test]
    fn keys_keep_insertion_order() {
        let mut record = Record::new("x");
        record.push("zeta", json!(1));
        record.push("alpha", json!(2));
        assert_eq!(record.keys().collect::<Vec<_>>(), ["$id", "zeta", "alpha"]);
    }

    #[test]
    fn serializes_as_a_plain_object() {
        let mut record = Record::new("x");
        record.insert("awards", json!([]));
        assert_eq!(
            serde_json::to_value(&record).expect("serializable"),
            json!({ "$id": "x", "awards": [] })
        );
    }
}
