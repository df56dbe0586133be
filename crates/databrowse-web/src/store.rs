//! SQLite storage for categories, contexts, datasets, values and citations.

use std::path::Path;

use databrowse_core::{Citation, DataMatrix, OptionEntry};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, params, params_from_iter};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub struct Store {
    conn: Connection,
}

/// Create tables and indexes if they don't exist yet.
fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            category_id INTEGER PRIMARY KEY,
            category_name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS contexts (
            context_id INTEGER PRIMARY KEY,
            context_name TEXT NOT NULL,
            category_id INTEGER NOT NULL REFERENCES categories(category_id)
        );

        CREATE TABLE IF NOT EXISTS datasets (
            dataset_id INTEGER PRIMARY KEY,
            dataset_name TEXT NOT NULL,
            context_id INTEGER NOT NULL REFERENCES contexts(context_id)
        );

        CREATE TABLE IF NOT EXISTS entities (
            entity_id INTEGER PRIMARY KEY,
            entity_name TEXT NOT NULL,
            context_id INTEGER NOT NULL REFERENCES contexts(context_id)
        );

        CREATE TABLE IF NOT EXISTS datavalues (
            entity_id INTEGER NOT NULL REFERENCES entities(entity_id),
            dataset_id INTEGER NOT NULL REFERENCES datasets(dataset_id),
            value,
            PRIMARY KEY (entity_id, dataset_id)
        );

        CREATE TABLE IF NOT EXISTS citations (
            citation_id INTEGER PRIMARY KEY,
            dataset_id INTEGER NOT NULL REFERENCES datasets(dataset_id),
            text TEXT,
            author TEXT,
            url TEXT,
            start_date TEXT,
            end_date TEXT,
            date_accessed TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_contexts_category ON contexts(category_id);
        CREATE INDEX IF NOT EXISTS idx_datasets_context ON datasets(context_id);
        CREATE INDEX IF NOT EXISTS idx_entities_context ON entities(context_id);
        CREATE INDEX IF NOT EXISTS idx_datavalues_dataset ON datavalues(dataset_id);
        CREATE INDEX IF NOT EXISTS idx_citations_dataset ON citations(dataset_id);
        "#,
    )?;
    Ok(())
}

impl Store {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Run a SQL script (used to seed a fresh database).
    pub fn load_sql(&self, sql: &str) -> Result<(), StoreError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// True when no category exists yet.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        Ok(count == 0)
    }

    pub fn categories(&self) -> Result<Vec<OptionEntry>, StoreError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT category_id, category_name FROM categories ORDER BY category_id",
        )?;
        let rows = stmt.query_map([], option_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    pub fn contexts(&self, category_id: i64) -> Result<Vec<OptionEntry>, StoreError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT context_id, context_name FROM contexts \
             WHERE category_id = ?1 ORDER BY context_id",
        )?;
        let rows = stmt.query_map(params![category_id], option_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Datasets of a context, provided the context belongs to the category.
    pub fn datasets(
        &self,
        category_id: i64,
        context_id: i64,
    ) -> Result<Vec<OptionEntry>, StoreError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT d.dataset_id, d.dataset_name FROM datasets d \
             JOIN contexts c ON d.context_id = c.context_id \
             WHERE d.context_id = ?1 AND c.category_id = ?2 \
             ORDER BY d.dataset_id",
        )?;
        let rows = stmt.query_map(params![context_id, category_id], option_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Values of the given datasets for every entity of the context.
    ///
    /// Entities appear in the order they are first met, scanning by entity ID
    /// then dataset ID.
    pub fn data_matrix(
        &self,
        context_id: i64,
        dataset_ids: &[i64],
    ) -> Result<DataMatrix, StoreError> {
        let mut matrix = DataMatrix::new();
        if dataset_ids.is_empty() {
            return Ok(matrix);
        }

        let placeholders = (0..dataset_ids.len())
            .map(|i| format!("?{}", i + 2))
            .collect::<Vec<_>>()
            .join(",");
        let sql = format!(
            "SELECT e.entity_name, d.dataset_name, dv.value \
             FROM datavalues dv \
             JOIN entities e ON dv.entity_id = e.entity_id \
             JOIN datasets d ON dv.dataset_id = d.dataset_id \
             WHERE e.context_id = ?1 AND dv.dataset_id IN ({placeholders}) \
             ORDER BY e.entity_id, d.dataset_id"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let bound = std::iter::once(context_id).chain(dataset_ids.iter().copied());
        let mut rows = stmt.query(params_from_iter(bound))?;
        while let Some(row) = rows.next()? {
            let entity: String = row.get(0)?;
            let dataset: String = row.get(1)?;
            let value = json_value(row.get_ref(2)?);
            matrix.insert(&entity, &dataset, value);
        }
        Ok(matrix)
    }

    pub fn citations(&self, dataset_id: i64) -> Result<Vec<Citation>, StoreError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT citation_id, text, author, url, start_date, end_date, date_accessed \
             FROM citations WHERE dataset_id = ?1 ORDER BY citation_id",
        )?;
        let rows = stmt.query_map(params![dataset_id], |row| {
            Ok(Citation {
                citation_id: row.get(0)?,
                text: row.get(1)?,
                author: row.get(2)?,
                url: row.get(3)?,
                start_date: row.get(4)?,
                end_date: row.get(5)?,
                date_accessed: row.get(6)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }
}

fn option_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<OptionEntry> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    Ok(OptionEntry::new(id.to_string(), name))
}

fn json_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(_) => Value::Null,
    }
}
