use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Values keyed by entity name, then by dataset display name.
///
/// Entity order is the order the server sent (or inserted) them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataMatrix(Map<String, Value>);

impl DataMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entity names in matrix order.
    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The value for `entity` under `dataset_name`. `null` counts as absent.
    pub fn value(&self, entity: &str, dataset_name: &str) -> Option<&Value> {
        self.0
            .get(entity)
            .and_then(Value::as_object)
            .and_then(|row| row.get(dataset_name))
            .filter(|v| !v.is_null())
    }

    /// Set one cell, creating the entity row on first use.
    pub fn insert(&mut self, entity: &str, dataset_name: &str, value: Value) {
        let row = self
            .0
            .entry(entity.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(cells) = row {
            cells.insert(dataset_name.to_string(), value);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One bibliographic entry attached to a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Citation {
    pub citation_id: Option<i64>,
    pub text: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    /// ISO-8601 date; only the year is displayed.
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Shown verbatim.
    pub date_accessed: Option<String>,
}

/// Body of `GET /citations/{dataset_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationsResponse {
    #[serde(default)]
    pub citations: Vec<Citation>,
}

/// A `(value, label)` pair from an `<option>` or dataset checkbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEntry {
    pub value: String,
    pub label: String,
}

impl OptionEntry {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}
