//! Product lookups by name.
//!
//! All comparisons use the case-folded name (`Product::name_key`). Nothing in
//! here reorders its input.

use crate::error::{InventoryError, Result};
use crate::models::Product;
use log::debug;
use std::cmp::Ordering;

/// Returns every product whose name contains `query`, ignoring case.
///
/// Matches keep their original order. A blank query matches everything.
pub fn linear_search<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    let matches: Vec<&Product> = products
        .iter()
        .filter(|product| product.name_key().contains(&needle))
        .collect();
    debug!(
        "Linear search for '{}' matched {} of {} products",
        needle,
        matches.len(),
        products.len()
    );
    matches
}

/// True when `products` is sorted ascending by case-folded name
pub fn is_sorted_by_name(products: &[Product]) -> bool {
    products
        .windows(2)
        .all(|pair| pair[0].name_key() <= pair[1].name_key())
}

/// Dichotomic search for a product named exactly `query` (ignoring case).
///
/// `products` must already be sorted ascending by case-folded name, otherwise
/// `InventoryError::NotSorted` is returned. When several products share the
/// name, the one hit first by the search path is returned, which is not
/// necessarily the first of them in the list.
pub fn binary_search<'a>(products: &'a [Product], query: &str) -> Result<Option<&'a Product>> {
    if !is_sorted_by_name(products) {
        return Err(InventoryError::NotSorted);
    }

    let target = query.trim().to_lowercase();
    // Half-open interval [low, high); mid is the floor midpoint of the
    // inclusive range [low, high - 1].
    let mut low = 0;
    let mut high = products.len();
    let mut steps = 0;

    while low < high {
        steps += 1;
        let mid = low + (high - 1 - low) / 2;
        let candidate = &products[mid];
        match candidate.name_key().as_str().cmp(target.as_str()) {
            Ordering::Equal => {
                debug!("Binary search found '{}' after {} steps", target, steps);
                return Ok(Some(candidate));
            }
            Ordering::Less => low = mid + 1,
            Ordering::Greater => high = mid,
        }
    }

    debug!("Binary search: '{}' not found after {} steps", target, steps);
    Ok(None)
}
