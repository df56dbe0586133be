//! Result table construction.
//!
//! Columns are derived once per submit from the dataset-ID order. The same
//! 1-based index appears in the header and in the citation list.

use std::collections::HashMap;

use serde_json::Value;

use crate::models::{DataMatrix, OptionEntry};

pub const ENTITY_HEADER: &str = "Entity";
pub const MISSING_VALUE: &str = "N/A";

/// Resolves a dataset ID to the name the page shows for it.
pub trait DatasetLabels {
    fn label(&self, dataset_id: &str) -> Option<String>;
}

impl DatasetLabels for HashMap<String, String> {
    fn label(&self, dataset_id: &str) -> Option<String> {
        self.get(dataset_id).cloned()
    }
}

impl DatasetLabels for [OptionEntry] {
    fn label(&self, dataset_id: &str) -> Option<String> {
        self.iter()
            .find(|e| e.value == dataset_id)
            .map(|e| e.label.clone())
    }
}

impl DatasetLabels for Vec<OptionEntry> {
    fn label(&self, dataset_id: &str) -> Option<String> {
        self.as_slice().label(dataset_id)
    }
}

/// One dataset column: display name and its citation index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetColumn {
    pub name: String,
    pub index: usize,
}

impl DatasetColumn {
    pub fn header(&self) -> String {
        format!("{} [{}]", self.name, self.index)
    }
}

/// Build the dataset columns in one left-to-right pass.
///
/// Unknown IDs are named `Dataset <id>`. When two IDs share a display name the
/// column appears once, at the first ID's position and with the first ID's
/// index. The page this replaces kept the first position but took the last
/// ID's index.
pub fn build_columns<L>(dataset_ids: &[String], labels: &L) -> Vec<DatasetColumn>
where
    L: DatasetLabels + ?Sized,
{
    let mut columns: Vec<DatasetColumn> = Vec::with_capacity(dataset_ids.len());
    for (position, id) in dataset_ids.iter().enumerate() {
        let name = labels
            .label(id)
            .unwrap_or_else(|| format!("Dataset {id}"));
        if columns.iter().any(|c| c.name == name) {
            continue;
        }
        columns.push(DatasetColumn {
            name,
            index: position + 1,
        });
    }
    columns
}

/// Rendered table content: header labels and body cells as display text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

pub fn build_table(matrix: &DataMatrix, columns: &[DatasetColumn]) -> DataTable {
    let mut headers = Vec::with_capacity(columns.len() + 1);
    headers.push(ENTITY_HEADER.to_string());
    headers.extend(columns.iter().map(DatasetColumn::header));

    let rows = matrix
        .entities()
        .map(|entity| {
            let mut row = Vec::with_capacity(columns.len() + 1);
            row.push(entity.to_string());
            for column in columns {
                let cell = matrix
                    .value(entity, &column.name)
                    .filter(|v| !is_blank(v))
                    .map(cell_text)
                    .unwrap_or_else(|| MISSING_VALUE.to_string());
                row.push(cell);
            }
            row
        })
        .collect();

    DataTable { headers, rows }
}

/// Values the page shows as missing: `0`, `""` and `false` as well as `null`.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
