//! Runtime settings resolved from the command line and environment.

use crate::error::Result;
use crate::inventory::Inventory;
use crate::io::{ensure_parent_dir, MalformedPolicy};
use crate::store::{open_store, StoreFormat};
use std::path::PathBuf;

/// Environment variable that overrides the default data file
pub const FILE_ENV_VAR: &str = "PRODUCT_MANAGER_FILE";

/// Returns the default data file: ~/.local/share/product_manager/products.txt
pub fn default_data_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("product_manager")
        .join("products.txt")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_file: PathBuf,
    pub format: StoreFormat,
    /// Abort on the first malformed record instead of skipping it
    pub strict: bool,
}

impl Settings {
    /// Builds settings; without an explicit format it is taken from the file extension
    pub fn new(data_file: PathBuf, format: Option<StoreFormat>, strict: bool) -> Self {
        let format = format.unwrap_or_else(|| StoreFormat::from_path(&data_file));
        Self {
            data_file,
            format,
            strict,
        }
    }

    /// Policy for loading the product list
    pub fn load_policy(&self) -> MalformedPolicy {
        if self.strict {
            MalformedPolicy::Abort
        } else {
            MalformedPolicy::Skip
        }
    }

    /// Policy for the raw-line price sort of the data file
    pub fn file_sort_policy(&self, skip_malformed: bool) -> MalformedPolicy {
        if skip_malformed && !self.strict {
            MalformedPolicy::Skip
        } else {
            MalformedPolicy::Abort
        }
    }

    /// Opens the configured store and loads the product list
    pub fn open_inventory(&self) -> Result<Inventory> {
        ensure_parent_dir(&self.data_file)?;
        log::info!(
            "Data file: {} ({})",
            self.data_file.display(),
            self.format.as_str()
        );
        Inventory::open(
            open_store(self.data_file.clone(), self.format),
            self.load_policy(),
        )
    }
}
