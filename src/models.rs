use crate::error::{InventoryError, Result};
use log::debug;
use serde::{Deserialize, Serialize};

/// A single product entry of the inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

impl Product {
    /// Creates a product after checking the record invariants.
    ///
    /// The name is trimmed and must not be empty. It cannot hold a comma or a
    /// line break, which the line format has no way to escape. The price must
    /// be a finite, non-negative number.
    pub fn new(name: impl Into<String>, quantity: u32, price: f64) -> Result<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(InventoryError::InvalidProduct(
                "product name cannot be empty".to_string(),
            ));
        }
        if name.contains([',', '\n', '\r']) {
            return Err(InventoryError::InvalidProduct(format!(
                "product name cannot contain a comma or a line break: '{name}'"
            )));
        }
        if !price.is_finite() || price < 0.0 {
            return Err(InventoryError::InvalidProduct(format!(
                "price must be a non-negative number, got {price}"
            )));
        }
        Ok(Self {
            name,
            quantity,
            price,
        })
    }

    /// Parses the three textual fields of a stored or typed-in product
    pub fn from_fields(name: &str, quantity: &str, price: &str) -> Result<Self> {
        debug!("Parsing product fields: '{name}', '{quantity}', '{price}'");
        let quantity = parse_quantity(quantity)?;
        let price = parse_price(price)?;
        Self::new(name, quantity, price)
    }

    /// Serialized form `name,quantity,price` with the price at full precision
    pub fn to_line(&self) -> String {
        format!("{},{},{}", self.name, self.quantity, self.price)
    }

    /// Price as shown to the user (2 decimals)
    pub fn display_price(&self) -> String {
        format!("{:.2}", self.price)
    }

    /// Case-folded name used by every name comparison
    pub fn name_key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Stock value of this line (quantity times unit price)
    pub fn stock_value(&self) -> f64 {
        self.quantity as f64 * self.price
    }

    /// Re-checks the invariants of a product that did not go through `new`
    /// (e.g. one deserialized from JSON).
    pub fn validated(self) -> Result<Self> {
        Self::new(self.name, self.quantity, self.price)
    }
}

/// Parses a quantity field. Only plain non-negative integers are accepted.
pub fn parse_quantity(quantity_str: &str) -> Result<u32> {
    let trimmed = quantity_str.trim();
    trimmed
        .parse::<u32>()
        .map_err(|_| InventoryError::InvalidProduct(format!("invalid quantity '{trimmed}'")))
}

/// Parses a price field written with a `.` decimal separator
pub fn parse_price(price_str: &str) -> Result<f64> {
    let trimmed = price_str.trim();
    let price = trimmed
        .parse::<f64>()
        .map_err(|_| InventoryError::InvalidProduct(format!("invalid price '{trimmed}'")))?;
    if !price.is_finite() || price < 0.0 {
        return Err(InventoryError::InvalidProduct(format!(
            "price must be a non-negative number, got '{trimmed}'"
        )));
    }
    Ok(price)
}

/// Extracts the price field out of a raw `name,quantity,price` line.
///
/// The line must have exactly three comma separated fields.
pub fn price_of_line(line: &str) -> Result<f64> {
    let fields: Vec<&str> = line.trim().split(',').collect();
    if fields.len() != 3 {
        return Err(InventoryError::InvalidProduct(format!(
            "expected 3 fields, found {}",
            fields.len()
        )));
    }
    parse_price(fields[2])
}
