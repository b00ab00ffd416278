use super::{ProductStore, StoreFormat};
use crate::error::Result;
use crate::io::{read_products, write_products, LoadReport, MalformedPolicy};
use crate::models::Product;
use std::path::{Path, PathBuf};

/// Plain `name,quantity,price` text file
#[derive(Debug, Clone)]
pub struct TextStore {
    path: PathBuf,
}

impl TextStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProductStore for TextStore {
    fn format(&self) -> StoreFormat {
        StoreFormat::Text
    }

    fn location(&self) -> &Path {
        &self.path
    }

    fn load(&self, policy: MalformedPolicy) -> Result<LoadReport> {
        read_products(&self.path, policy)
    }

    fn save(&self, products: &[Product]) -> Result<()> {
        write_products(&self.path, products)
    }
}
