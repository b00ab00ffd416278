//! The product list of one run.
//!
//! `Inventory` is the only owner of the in-memory sequence. Reads hand out
//! borrowed views; every change goes through a `&mut self` method and is only
//! persisted by an explicit `save`.

use crate::error::{InventoryError, Result};
use crate::io::{MalformedPolicy, RejectedLine};
use crate::models::{parse_price, parse_quantity, Product};
use crate::search::{binary_search, linear_search};
use crate::sorting::{self, sort_products, PriceSortReport, SortDirection, SortKey};
use crate::stats::StockStats;
use crate::store::{ProductStore, StoreFormat};
use log::{info, warn};
use std::path::Path;

pub struct Inventory {
    store: Box<dyn ProductStore>,
    products: Vec<Product>,
    rejected: Vec<RejectedLine>,
    source_missing: bool,
    sorted_by: Option<(SortKey, SortDirection)>,
    load_policy: MalformedPolicy,
    unsaved_changes: bool,
}

impl Inventory {
    /// Loads the product list from `store`
    pub fn open(store: Box<dyn ProductStore>, policy: MalformedPolicy) -> Result<Self> {
        let report = store.load(policy)?;
        if !report.rejected.is_empty() {
            warn!(
                "{} records of {} could not be read and were skipped",
                report.rejected.len(),
                store.location().display()
            );
        }
        Ok(Self {
            store,
            products: report.products,
            rejected: report.rejected,
            source_missing: report.source_missing,
            sorted_by: None,
            load_policy: policy,
            unsaved_changes: false,
        })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Records skipped during the last load
    pub fn rejected(&self) -> &[RejectedLine] {
        &self.rejected
    }

    /// The backing store did not exist when the inventory was opened
    pub fn source_was_missing(&self) -> bool {
        self.source_missing
    }

    pub fn location(&self) -> &Path {
        self.store.location()
    }

    pub fn format(&self) -> StoreFormat {
        self.store.format()
    }

    /// The list changed since it was loaded or last saved
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved_changes
    }

    /// Key and direction of the last sort, cleared by any other change
    pub fn sorted_by(&self) -> Option<(SortKey, SortDirection)> {
        self.sorted_by
    }

    pub fn add(&mut self, product: Product) -> &Product {
        info!("Added product '{}'", product.name);
        self.products.push(product);
        self.sorted_by = None;
        self.unsaved_changes = true;
        &self.products[self.products.len() - 1]
    }

    /// Adds a product from raw user input. Nothing changes if any field is invalid.
    pub fn add_from_input(&mut self, name: &str, quantity: &str, price: &str) -> Result<&Product> {
        let product = Product::from_fields(name, quantity, price)
            .map_err(|e| InventoryError::InvalidInput(invalid_reason(e)))?;
        Ok(self.add(product))
    }

    /// Removes the product at the 1-based `position`
    pub fn remove(&mut self, position: usize) -> Result<Product> {
        let index = self.index_of(position)?;
        let removed = self.products.remove(index);
        self.unsaved_changes = true;
        info!("Removed product '{}' (position {position})", removed.name);
        Ok(removed)
    }

    /// Updates quantity and/or price of the product at the 1-based `position`
    pub fn modify(
        &mut self,
        position: usize,
        quantity: Option<u32>,
        price: Option<f64>,
    ) -> Result<&Product> {
        let index = self.index_of(position)?;
        let current = &self.products[index];
        // Validate the whole update before touching the stored product
        let updated = Product::new(
            current.name.clone(),
            quantity.unwrap_or(current.quantity),
            price.unwrap_or(current.price),
        )
        .map_err(|e| InventoryError::InvalidInput(invalid_reason(e)))?;
        info!(
            "Modified product '{}': quantity {} -> {}, price {} -> {}",
            updated.name, current.quantity, updated.quantity, current.price, updated.price
        );
        self.products[index] = updated;
        if quantity.is_some() || price.is_some() {
            self.sorted_by = None;
            self.unsaved_changes = true;
        }
        Ok(&self.products[index])
    }

    /// Same as [`Inventory::modify`] but from raw user input; blank fields
    /// keep their current value.
    pub fn modify_from_input(
        &mut self,
        position: usize,
        quantity: &str,
        price: &str,
    ) -> Result<&Product> {
        let quantity = optional_field(quantity, parse_quantity)?;
        let price = optional_field(price, parse_price)?;
        self.modify(position, quantity, price)
    }

    /// Case-insensitive substring search on product names
    pub fn search(&self, query: &str) -> Vec<&Product> {
        linear_search(&self.products, query)
    }

    /// Dichotomic search for an exact name (ignoring case).
    ///
    /// Runs on a name-sorted copy, so the list order is left as it is.
    pub fn find_by_name(&self, query: &str) -> Result<Option<Product>> {
        let mut sorted = self.products.clone();
        sort_products(&mut sorted, SortKey::Name, SortDirection::Ascending);
        Ok(binary_search(&sorted, query)?.cloned())
    }

    pub fn sort(&mut self, key: SortKey, direction: SortDirection) {
        sort_products(&mut self.products, key, direction);
        self.sorted_by = Some((key, direction));
        self.unsaved_changes = true;
        info!(
            "Sorted {} products by {} ({})",
            self.products.len(),
            key.column().to_lowercase(),
            direction.as_str()
        );
    }

    pub fn stats(&self) -> StockStats {
        StockStats::from_products(&self.products)
    }

    /// Writes the whole list to the backing store
    pub fn save(&mut self) -> Result<()> {
        self.store.save(&self.products)?;
        self.source_missing = false;
        self.unsaved_changes = false;
        Ok(())
    }

    /// Sorts the backing text file by price ascending, with a `.backup`
    /// copy, and reloads the list from the sorted file.
    ///
    /// The file is sorted exactly as stored, so lines skipped at load time
    /// are still subject to `policy`. Refused while the list has unsaved
    /// changes, since the reload would discard them.
    pub fn sort_backing_file_by_price(&mut self, policy: MalformedPolicy) -> Result<PriceSortReport> {
        if self.store.format() != StoreFormat::Text {
            return Err(InventoryError::Unsupported {
                operation: "Sorting the backing file by price",
                format: self.store.format().as_str(),
            });
        }
        if self.unsaved_changes {
            return Err(InventoryError::UnsavedChanges("sorting the data file"));
        }
        let report = sorting::sort_file_by_price(self.store.location(), policy)?;
        let reloaded = self.store.load(self.load_policy)?;
        self.products = reloaded.products;
        self.rejected = reloaded.rejected;
        self.source_missing = false;
        self.sorted_by = Some((SortKey::Price, SortDirection::Ascending));
        Ok(report)
    }

    fn index_of(&self, position: usize) -> Result<usize> {
        if position == 0 || position > self.products.len() {
            return Err(InventoryError::PositionOutOfRange {
                position,
                len: self.products.len(),
            });
        }
        Ok(position - 1)
    }
}

fn invalid_reason(err: InventoryError) -> String {
    match err {
        InventoryError::InvalidProduct(reason) => reason,
        other => other.to_string(),
    }
}

fn optional_field<T>(raw: &str, parse: fn(&str) -> Result<T>) -> Result<Option<T>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse(raw)
        .map(Some)
        .map_err(|e| InventoryError::InvalidInput(invalid_reason(e)))
}

#[cfg(test)]
#[path = "inventory_tests.rs"]
mod tests;
