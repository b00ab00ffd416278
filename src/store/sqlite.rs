//! SQLite backing store.
//!
//! The list lives in a single `products` table. `position` keeps the list
//! order so a load returns the sequence exactly as it was saved.
//! - Loading a database file that does not exist never creates it.
//! - Saving replaces the table content inside one transaction.

use super::{ProductStore, StoreFormat};
use crate::error::{InventoryError, Result};
use crate::io::{reject, LoadReport, MalformedPolicy};
use crate::models::Product;
use rusqlite::types::Value;
use rusqlite::{params, Connection, OpenFlags};
use std::path::{Path, PathBuf};

/// Result type for database operations
pub type DbResult<T> = std::result::Result<T, rusqlite::Error>;

#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Creates the `products` table if it does not already exist.
fn init_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS products (
            position INTEGER NOT NULL PRIMARY KEY,
            name     TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            price    REAL NOT NULL
        );",
    )
}

/// Reads every row in list order and applies the malformed-record policy.
///
/// Columns are read as dynamic values, so a row holding the wrong type is a
/// malformed record rather than a database error.
fn load_conn(conn: &Connection, policy: MalformedPolicy) -> Result<LoadReport> {
    let rows: Vec<(i64, Value, Value, Value)> = conn
        .prepare("SELECT position, name, quantity, price FROM products ORDER BY position")?
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))?
        .collect::<DbResult<Vec<_>>>()?;

    let mut report = LoadReport::default();
    for (position, name, quantity, price) in rows {
        let content = format!(
            "{},{},{}",
            value_text(&name),
            value_text(&quantity),
            value_text(&price)
        );
        match product_from_row(name, quantity, price) {
            Ok(product) => report.products.push(product),
            Err(err) => reject(policy, position as u64, &content, err, &mut report.rejected)?,
        }
    }
    Ok(report)
}

fn product_from_row(name: Value, quantity: Value, price: Value) -> Result<Product> {
    let name = match name {
        Value::Text(name) => name,
        other => {
            return Err(InventoryError::InvalidProduct(format!(
                "invalid name '{}'",
                value_text(&other)
            )))
        }
    };
    let quantity = match quantity {
        Value::Integer(quantity) => u32::try_from(quantity).map_err(|_| {
            InventoryError::InvalidProduct(format!("invalid quantity '{quantity}'"))
        })?,
        other => {
            return Err(InventoryError::InvalidProduct(format!(
                "invalid quantity '{}'",
                value_text(&other)
            )))
        }
    };
    let price = match price {
        Value::Real(price) => price,
        Value::Integer(price) => price as f64,
        other => {
            return Err(InventoryError::InvalidProduct(format!(
                "invalid price '{}'",
                value_text(&other)
            )))
        }
    };
    Product::new(name, quantity, price)
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(t) => t.clone(),
        Value::Blob(b) => format!("<{} byte blob>", b.len()),
    }
}

/// Replaces the table content with `products`, numbering positions from 1.
fn save_conn(conn: &mut Connection, products: &[Product]) -> DbResult<usize> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM products", [])?;
    {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO products (position, name, quantity, price) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for (index, product) in products.iter().enumerate() {
            stmt.execute(params![
                index as i64 + 1,
                product.name,
                product.quantity,
                product.price
            ])?;
        }
    }
    tx.commit()?;
    Ok(products.len())
}

impl ProductStore for SqliteStore {
    fn format(&self) -> StoreFormat {
        StoreFormat::Sqlite
    }

    fn location(&self) -> &Path {
        &self.path
    }

    fn load(&self, policy: MalformedPolicy) -> Result<LoadReport> {
        if !self.path.exists() {
            return Ok(LoadReport::missing(&self.path));
        }
        let conn = Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_WRITE)?;
        init_schema(&conn)?;
        let report = load_conn(&conn, policy)?;
        log::info!(
            "Loaded {} products from {} ({} rows skipped)",
            report.products.len(),
            self.path.display(),
            report.rejected.len()
        );
        Ok(report)
    }

    fn save(&self, products: &[Product]) -> Result<()> {
        let mut conn = Connection::open(&self.path)?;
        init_schema(&conn)?;
        let count = save_conn(&mut conn, products)?;
        log::info!("Saved {} products to {}", count, self.path.display());
        Ok(())
    }
}
