//! The in-memory store record.

use tagmap_codec::Value;

/// The insertion-ordered key/value mapping mirrored to the backing file.
///
/// Keys may be of any value kind; a repeated key keeps its original
/// position and takes the new value. The record lives entirely in memory
/// and is converted to and from a map envelope for persistence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(Value, Value)>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from entries, deduplicating keys (last value wins,
    /// first position kept).
    #[must_use]
    pub fn from_entries(entries: Vec<(Value, Value)>) -> Self {
        let mut record = Self::new();
        for (key, value) in entries {
            record.insert(key, value);
        }
        record
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the record holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts or replaces the value under `key`.
    pub fn insert(&mut self, key: Value, value: Value) {
        if let Some(existing) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Looks up the value under `key`.
    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether an entry exists under `key`.
    #[must_use]
    pub fn contains(&self, key: &Value) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Removes the entry under `key`, returning whether it existed.
    pub fn remove(&mut self, key: &Value) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| k != key);
        self.entries.len() != before
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[(Value, Value)] {
        &self.entries
    }

    /// The keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// The values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Converts this record into a map value for encoding.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Map(self.entries.clone())
    }

    /// Rebuilds a record from a decoded map value.
    ///
    /// Returns `None` if the value is not a map.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Map(entries) => Some(Self::from_entries(entries)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut record = Record::new();
        record.insert(Value::from("a"), Value::from(1));
        record.insert(Value::from("b"), Value::from(2));

        assert_eq!(record.len(), 2);
        assert_eq!(record.get(&Value::from("a")), Some(&Value::from(1)));
        assert_eq!(record.get(&Value::from("missing")), None);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut record = Record::new();
        record.insert(Value::from("a"), Value::from(1));
        record.insert(Value::from("b"), Value::from(2));
        record.insert(Value::from("a"), Value::from(3));

        assert_eq!(record.len(), 2);
        assert_eq!(record.entries()[0], (Value::from("a"), Value::from(3)));
    }

    #[test]
    fn keys_of_any_kind() {
        let mut record = Record::new();
        record.insert(Value::from(1), Value::from("one"));
        record.insert(Value::Null, Value::from("null"));

        assert!(record.contains(&Value::from(1)));
        assert!(record.contains(&Value::Null));
        assert!(!record.contains(&Value::from(2)));
    }

    #[test]
    fn remove_reports_existence() {
        let mut record = Record::new();
        record.insert(Value::from("a"), Value::from(1));

        assert!(record.remove(&Value::from("a")));
        assert!(!record.remove(&Value::from("a")));
        assert!(record.is_empty());
    }

    #[test]
    fn clear_empties_the_record() {
        let mut record = Record::new();
        record.insert(Value::from("a"), Value::from(1));
        record.clear();
        assert!(record.is_empty());
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let mut record = Record::new();
        record.insert(Value::from("z"), Value::from(1));
        record.insert(Value::from("a"), Value::from(2));

        let keys: Vec<_> = record.keys().cloned().collect();
        assert_eq!(keys, vec![Value::from("z"), Value::from("a")]);

        let values: Vec<_> = record.values().cloned().collect();
        assert_eq!(values, vec![Value::from(1), Value::from(2)]);
    }

    #[test]
    fn value_conversions() {
        let mut record = Record::new();
        record.insert(Value::from("a"), Value::from(1));

        let rebuilt = Record::from_value(record.to_value()).unwrap();
        assert_eq!(rebuilt, record);

        assert!(Record::from_value(Value::from("not a map")).is_none());
    }
}
