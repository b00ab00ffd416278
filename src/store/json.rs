//! JSON backing store: a pretty printed array of product objects.

use super::{ProductStore, StoreFormat};
use crate::error::{InventoryError, Result};
use crate::io::{reject, write_atomic, LoadReport, MalformedPolicy};
use crate::models::Product;
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProductStore for JsonStore {
    fn format(&self) -> StoreFormat {
        StoreFormat::Json
    }

    fn location(&self) -> &Path {
        &self.path
    }

    fn load(&self, policy: MalformedPolicy) -> Result<LoadReport> {
        if !self.path.exists() {
            return Ok(LoadReport::missing(&self.path));
        }

        let content =
            std::fs::read_to_string(&self.path).map_err(|e| InventoryError::io(&self.path, e))?;
        // Empty file behaves like an empty list
        if content.trim().is_empty() {
            return Ok(LoadReport::default());
        }

        // Elements are decoded one by one so a single bad entry does not
        // invalidate the whole file.
        let entries: Vec<Value> = serde_json::from_str(&content)?;
        let mut report = LoadReport::default();

        for (index, entry) in entries.into_iter().enumerate() {
            let line = index as u64 + 1;
            let content = entry.to_string();
            let parsed = serde_json::from_value::<Product>(entry)
                .map_err(|e| InventoryError::InvalidProduct(e.to_string()))
                .and_then(Product::validated);
            match parsed {
                Ok(product) => report.products.push(product),
                Err(err) => reject(policy, line, &content, err, &mut report.rejected)?,
            }
        }

        log::info!(
            "Loaded {} products from {} ({} entries skipped)",
            report.products.len(),
            self.path.display(),
            report.rejected.len()
        );
        Ok(report)
    }

    fn save(&self, products: &[Product]) -> Result<()> {
        let mut content = serde_json::to_string_pretty(products)?;
        content.push('\n');
        write_atomic(&self.path, content.as_bytes())?;
        log::info!("Saved {} products to {}", products.len(), self.path.display());
        Ok(())
    }
}
