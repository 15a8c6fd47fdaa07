use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// One candidate data item submitted for validation: a mapping from field
/// name to [`Value`], held in field-name order.
///
/// A record may carry fields the schema never mentions; whether those pass
/// is decided by the schema's strict flag and ban list. Records are plain
/// data — building one never fails, and validation never modifies it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Make a new, empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, consuming and returning the record for chaining.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Insert a field, replacing any previous value for that name.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(field.into(), value.into())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over the fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<BTreeMap<String, Value>> for Record {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get() {
        let rec = Record::new().set("gender", "female").set("math_score", 72);
        assert_eq!(rec.len(), 2);
        assert_eq!(rec.get("gender"), Some(&Value::from("female")));
        assert!(!rec.contains("reading_score"));
    }

    #[test]
    fn iter_is_name_ordered() {
        let rec = Record::new().set("b", 1).set("a", 2).set("c", 3);
        let names: Vec<&str> = rec.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn from_json() {
        let rec: Record =
            serde_json::from_str(r#"{"gender": "male", "math_score": 88, "race": null}"#).unwrap();
        assert_eq!(rec.get("math_score"), Some(&Value::from(88)));
        assert_eq!(rec.get("race"), Some(&Value::Null));
    }
}
