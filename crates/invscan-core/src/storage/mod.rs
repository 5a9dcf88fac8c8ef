//! SQLite persistence for invoice records.

use std::path::Path;

use rusqlite::{params, Connection};
use tracing::{debug, info};

use crate::error::StorageError;
use crate::models::record::InvoiceRecord;

const CREATE_INVOICES: &str = "CREATE TABLE IF NOT EXISTS invoices (
    name TEXT,
    invoice_number TEXT,
    due_date TEXT,
    description TEXT
)";

const INSERT_INVOICE: &str = "INSERT INTO invoices VALUES (?1, ?2, ?3, ?4)";

/// Destination for extracted records.
pub trait RecordSink {
    /// Persist one record.
    fn save(&mut self, record: &InvoiceRecord) -> Result<(), StorageError>;
}

/// Record store backed by a single SQLite connection.
///
/// The connection lives as long as the store. Dropping the store closes it;
/// [`SqliteStore::close`] does the same but reports failures.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        debug!("Opened database {}", path.display());
        Ok(Self { conn })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Create the `invoices` table if it does not exist yet.
    pub fn ensure_schema(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(CREATE_INVOICES)?;
        Ok(())
    }

    /// All stored records in insertion order.
    pub fn records(&self) -> Result<Vec<InvoiceRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT name, invoice_number, due_date, description FROM invoices ORDER BY rowid",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(InvoiceRecord {
                name: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                invoice_number: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                due_date: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                description: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            })
        })?;

        let mut records = Vec::new();
        for record in rows {
            records.push(record?);
        }
        Ok(records)
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<u64, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM invoices", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Close the connection, reporting any error SQLite raises on close.
    pub fn close(self) -> Result<(), StorageError> {
        self.conn.close().map_err(|(_, e)| StorageError::Sqlite(e))
    }
}

impl RecordSink for SqliteStore {
    fn save(&mut self, record: &InvoiceRecord) -> Result<(), StorageError> {
        self.conn.execute(
            INSERT_INVOICE,
            params![
                record.name,
                record.invoice_number,
                record.due_date,
                record.description
            ],
        )?;
        info!("Saved invoice {:?}", record.invoice_number);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn table_count(store: &SqliteStore) -> i64 {
        store
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'invoices'",
                [],
                |row| row.get(0),
            )
            .unwrap()
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();
        store.ensure_schema().unwrap();

        assert_eq!(table_count(&store), 1);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_save_and_list() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.ensure_schema().unwrap();

        let first = InvoiceRecord::new("ACME", "A-1", "2024-01-31", "Bolts");
        let second = InvoiceRecord::default();
        store.save(&first).unwrap();
        store.save(&second).unwrap();
        store.save(&first).unwrap();

        assert_eq!(store.count().unwrap(), 3);
        assert_eq!(store.records().unwrap(), vec![first.clone(), second, first]);
    }

    #[test]
    fn test_save_without_schema_fails() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let result = store.save(&InvoiceRecord::default());
        assert!(matches!(result, Err(StorageError::Sqlite(_))));
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("invoice_data.db");

        let mut store = SqliteStore::open(&path).unwrap();
        store.ensure_schema().unwrap();
        store
            .save(&InvoiceRecord::new("Globex", "G-9", "Invalid Date", "Nuts"))
            .unwrap();
        store.close().unwrap();

        let store = SqliteStore::open(&path).unwrap();
        store.ensure_schema().unwrap();
        assert_eq!(
            store.records().unwrap(),
            vec![InvoiceRecord::new("Globex", "G-9", "Invalid Date", "Nuts")]
        );
    }
}
