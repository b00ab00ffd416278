//! Backing stores for the product list.
//!
//! Every backend loads and saves the full sequence; there is no incremental
//! update. Whoever saves last wins.

pub mod json;
pub mod sqlite;
pub mod text;

pub use json::JsonStore;
pub use sqlite::SqliteStore;
pub use text::TextStore;

use crate::error::{InventoryError, Result};
use crate::io::{LoadReport, MalformedPolicy};
use crate::models::Product;
use std::path::{Path, PathBuf};

/// Supported storage formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    Text,
    Json,
    Sqlite,
}

impl StoreFormat {
    /// Returns the lowercase name of the format
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreFormat::Text => "text",
            StoreFormat::Json => "json",
            StoreFormat::Sqlite => "sqlite",
        }
    }

    /// Picks the format from the file extension; unknown extensions are text
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("json") => StoreFormat::Json,
            Some("db") | Some("sqlite") | Some("sqlite3") => StoreFormat::Sqlite,
            _ => StoreFormat::Text,
        }
    }

    /// Parse a format name (e.g. "text", "json", "sqlite")
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(StoreFormat::Text),
            "json" => Some(StoreFormat::Json),
            "sqlite" | "db" => Some(StoreFormat::Sqlite),
            _ => None,
        }
    }
}

impl std::str::FromStr for StoreFormat {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).ok_or_else(|| {
            InventoryError::InvalidInput(format!(
                "unknown storage format '{s}' (expected text, json or sqlite)"
            ))
        })
    }
}

/// A place the product list is loaded from and flushed to
pub trait ProductStore {
    fn format(&self) -> StoreFormat;

    fn location(&self) -> &Path;

    /// Loads the whole sequence. A missing store is an empty, non-error load.
    fn load(&self, policy: MalformedPolicy) -> Result<LoadReport>;

    /// Replaces the stored sequence with `products`
    fn save(&self, products: &[Product]) -> Result<()>;
}

/// Opens the store for `path` in the given format
pub fn open_store(path: impl Into<PathBuf>, format: StoreFormat) -> Box<dyn ProductStore> {
    let path = path.into();
    match format {
        StoreFormat::Text => Box::new(TextStore::new(path)),
        StoreFormat::Json => Box::new(JsonStore::new(path)),
        StoreFormat::Sqlite => Box::new(SqliteStore::new(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(StoreFormat::from_path(Path::new("a.json")), StoreFormat::Json);
        assert_eq!(StoreFormat::from_path(Path::new("a.JSON")), StoreFormat::Json);
        assert_eq!(StoreFormat::from_path(Path::new("a.db")), StoreFormat::Sqlite);
        assert_eq!(StoreFormat::from_path(Path::new("a.sqlite3")), StoreFormat::Sqlite);
        assert_eq!(StoreFormat::from_path(Path::new("a.txt")), StoreFormat::Text);
        assert_eq!(StoreFormat::from_path(Path::new("products")), StoreFormat::Text);
    }

    #[test]
    fn format_from_str() {
        assert_eq!("JSON".parse::<StoreFormat>().unwrap(), StoreFormat::Json);
        assert_eq!("txt".parse::<StoreFormat>().unwrap(), StoreFormat::Text);
        assert!("xml".parse::<StoreFormat>().is_err());
    }

    #[test]
    fn open_store_keeps_location_and_format() {
        let store = open_store("/tmp/x.db", StoreFormat::Sqlite);
        assert_eq!(store.format(), StoreFormat::Sqlite);
        assert_eq!(store.location(), Path::new("/tmp/x.db"));
    }
}
