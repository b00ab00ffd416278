//! Error types for product_manager

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for product_manager operations
#[derive(Debug, Error)]
pub enum InventoryError {
    /// File system operation failed for a specific path
    #[error("I/O error for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Reading user input or writing to the terminal failed
    #[error("Terminal I/O error: {0}")]
    Terminal(#[from] std::io::Error),
    /// The text backing store could not be read as comma separated records
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// Failed to read or write the JSON backing store
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// A stored record could not be turned into a product
    #[error("Line {line}: {reason} ('{content}')")]
    MalformedLine {
        line: u64,
        content: String,
        reason: String,
    },
    /// Product fields violate the record invariants
    #[error("Invalid product: {0}")]
    InvalidProduct(String),
    /// User supplied input that cannot be used
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Position outside of the displayed list (1-based)
    #[error("No product at position {position} (list has {len} products)")]
    PositionOutOfRange { position: usize, len: usize },
    /// Binary search called on a list that is not sorted by name
    #[error("Products are not sorted by name; sort by name before a binary search")]
    NotSorted,
    /// The operation works on the stored file and the list has changes that
    /// were not saved yet
    #[error("The product list has unsaved changes; save them before {0}")]
    UnsavedChanges(&'static str),
    /// The backing store needed by the operation does not exist
    #[error("Backing store not found: {}", .0.display())]
    MissingStore(PathBuf),
    /// The operation is only available for some storage formats
    #[error("{operation} is not supported for {format} storage")]
    Unsupported {
        operation: &'static str,
        format: &'static str,
    },
}

impl InventoryError {
    /// Wraps an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InventoryError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for product_manager operations
pub type Result<T> = std::result::Result<T, InventoryError>;
