use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Kind;

/// One persisted record of a kind.
///
/// `id`, `created_on` and `last_updated` are common to every kind; everything
/// else lives in `fields` as raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    pub kind: Kind,
    pub id: String,
    pub created_on: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub fields: Map<String, Value>,
}

impl Entity {
    #[must_use]
    pub fn new(
        kind: impl Into<Kind>,
        id: impl Into<String>,
        created_on: DateTime<Utc>,
        last_updated: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            created_on,
            last_updated,
            fields: Map::new(),
        }
    }

    /// Builder-style field setter.
    #[must_use]
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) {
        self.fields.insert(name.to_string(), value.into());
    }

    pub fn remove_field(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    #[must_use]
    pub fn i64_field(&self, name: &str) -> Option<i64> {
        self.field(name).and_then(Value::as_i64)
    }

    #[must_use]
    pub fn f64_field(&self, name: &str) -> Option<f64> {
        self.field(name).and_then(Value::as_f64)
    }

    /// Every id held by a reference field.
    ///
    /// Scalar strings and numbers yield one id, arrays yield one id per
    /// scalar element, and `null` or a missing field yields none.
    #[must_use]
    pub fn id_values(&self, name: &str) -> Vec<String> {
        match self.field(name) {
            Some(Value::Array(items)) => items.iter().filter_map(scalar_to_id).collect(),
            Some(value) => scalar_to_id(value).into_iter().collect(),
            None => Vec::new(),
        }
    }
}

fn scalar_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
