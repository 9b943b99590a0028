//! SQLite-backed document store

use crate::StoreError;
use chrono::{DateTime, Utc};
use dokgraph_domain::traits::DocumentStore;
use dokgraph_domain::{ConnectionSet, Document, DocumentSummary, StoredDocument};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tracing::debug;

const SELECT_COLUMNS: &str =
    "SELECT id, name, url, created_at, updated_at, raw_markdown, document, connections FROM documents";

/// SQLite-based implementation of DocumentStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Share a store across tasks
/// behind a mutex.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dokgraph_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("dokgraph.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    fn to_micros(time: DateTime<Utc>) -> i64 {
        time.timestamp_micros()
    }

    fn from_micros(micros: i64, column: usize) -> rusqlite::Result<DateTime<Utc>> {
        DateTime::from_timestamp_micros(micros).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Integer,
                Box::new(StoreError::InvalidData(format!("timestamp out of range: {}", micros))),
            )
        })
    }

    fn json_column<T: serde::de::DeserializeOwned>(text: &str, column: usize) -> rusqlite::Result<T> {
        serde_json::from_str(text).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
        })
    }

    fn row_to_document(row: &Row<'_>) -> rusqlite::Result<StoredDocument> {
        let document: String = row.get(6)?;
        let connections: Option<String> = row.get(7)?;

        Ok(StoredDocument {
            id: row.get(0)?,
            name: row.get(1)?,
            url: row.get(2)?,
            created_at: Self::from_micros(row.get(3)?, 3)?,
            updated_at: Self::from_micros(row.get(4)?, 4)?,
            raw_markdown: row.get(5)?,
            document: Self::json_column(&document, 6)?,
            connections: connections
                .map(|text| Self::json_column(&text, 7))
                .transpose()?,
        })
    }
}

impl DocumentStore for SqliteStore {
    type Error = StoreError;

    fn save(
        &mut self,
        id: &str,
        name: &str,
        url: &str,
        document: &Document,
        raw_markdown: &str,
    ) -> Result<StoredDocument, Self::Error> {
        let now = Self::to_micros(Utc::now());
        let document_json = serde_json::to_string(document)?;

        self.conn.execute(
            "INSERT INTO documents (id, name, url, created_at, updated_at, raw_markdown, document, connections)
             VALUES (?1, ?2, ?3, ?4, ?4, ?5, ?6, NULL)
             ON CONFLICT(id) DO UPDATE SET
             name = excluded.name, url = excluded.url, updated_at = excluded.updated_at,
             raw_markdown = excluded.raw_markdown, document = excluded.document, connections = NULL",
            params![id, name, url, now, raw_markdown, document_json],
        )?;

        debug!(id, name, "saved document");

        self.get(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn get(&self, id: &str) -> Result<Option<StoredDocument>, Self::Error> {
        let document = self
            .conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                Self::row_to_document,
            )
            .optional()?;

        Ok(document)
    }

    fn list(&self) -> Result<Vec<DocumentSummary>, Self::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM documents ORDER BY created_at DESC, rowid DESC")?;

        let summaries = stmt
            .query_map([], |row| {
                Ok(DocumentSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: Self::from_micros(row.get(2)?, 2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(summaries)
    }

    fn delete(&mut self, id: &str) -> Result<bool, Self::Error> {
        let removed = self
            .conn
            .execute("DELETE FROM documents WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    fn save_connections(
        &mut self,
        id: &str,
        connections: &ConnectionSet,
    ) -> Result<bool, Self::Error> {
        let updated = self.conn.execute(
            "UPDATE documents SET connections = ?1, updated_at = ?2 WHERE id = ?3",
            params![
                serde_json::to_string(connections)?,
                Self::to_micros(Utc::now()),
                id
            ],
        )?;
        Ok(updated > 0)
    }

    fn get_connections(&self, id: &str) -> Result<Option<ConnectionSet>, Self::Error> {
        let text: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT connections FROM documents WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        match text.flatten() {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }
}
