//! Product orderings.
//!
//! In-memory sorting works on `Product` values. `quicksort_lines` and
//! `sort_file_by_price` work on the raw text lines of a backing file instead
//! and always order by price ascending.

use crate::error::{InventoryError, Result};
use crate::io::{self, reject, MalformedPolicy, RejectedLine};
use crate::models::{price_of_line, Product};
use log::{debug, info};
use std::cmp::Reverse;
use std::path::{Path, PathBuf};

/// Field a product list can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Quantity,
    Price,
}

impl SortKey {
    /// Direction used when the user does not pick one
    pub fn default_direction(&self) -> SortDirection {
        match self {
            SortKey::Name => SortDirection::Ascending,
            SortKey::Quantity | SortKey::Price => SortDirection::Descending,
        }
    }

    /// Column heading this key sorts
    pub fn column(&self) -> &'static str {
        match self {
            SortKey::Name => "Name",
            SortKey::Quantity => "Quantity",
            SortKey::Price => "Price",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" | "alpha" | "alphabetical" => Some(SortKey::Name),
            "quantity" | "qty" | "stock" => Some(SortKey::Quantity),
            "price" => Some(SortKey::Price),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// The other direction; a second click on a column heading flips it
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Marker shown next to the sorted column heading
    pub fn indicator(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }
}

/// Sorts `products` in place by `key`.
///
/// Equal elements keep their relative order for every key. Quantity always
/// goes through [`bubble_sort_by_quantity`].
pub fn sort_products(products: &mut [Product], key: SortKey, direction: SortDirection) {
    match key {
        SortKey::Name => match direction {
            SortDirection::Ascending => products.sort_by_cached_key(|p| p.name_key()),
            SortDirection::Descending => products.sort_by_cached_key(|p| Reverse(p.name_key())),
        },
        SortKey::Quantity => {
            bubble_sort_by_quantity(products, direction);
        }
        SortKey::Price => match direction {
            SortDirection::Ascending => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortDirection::Descending => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
        },
    }
    debug!(
        "Sorted {} products by {} ({})",
        products.len(),
        key.column(),
        direction.as_str()
    );
}

/// Bubble sort on quantity.
///
/// Descending swaps a pair only when `left < right`, ascending only when
/// `left > right`, so equal quantities never swap. Stops early after a pass
/// without swaps. Returns the number of swaps performed.
pub fn bubble_sort_by_quantity(products: &mut [Product], direction: SortDirection) -> usize {
    let n = products.len();
    let mut swaps = 0;
    for pass in 0..n.saturating_sub(1) {
        let mut swapped = false;
        for i in 0..n - 1 - pass {
            let (left, right) = (products[i].quantity, products[i + 1].quantity);
            let out_of_order = match direction {
                SortDirection::Descending => left < right,
                SortDirection::Ascending => left > right,
            };
            if out_of_order {
                products.swap(i, i + 1);
                swapped = true;
                swaps += 1;
            }
        }
        if !swapped {
            break;
        }
    }
    swaps
}

/// Raw lines ordered by price, plus the lines that could not be priced
#[derive(Debug, Default)]
pub struct SortedLines {
    /// Sorted lines, followed by skipped lines in their original order
    pub lines: Vec<String>,
    pub rejected: Vec<RejectedLine>,
}

struct PricedLine {
    price: f64,
    line: String,
}

/// Sorts raw `name,quantity,price` lines by price, ascending.
///
/// Quicksort: the last line is the pivot, lines priced `<=` the
/// pivot go left, the rest right, and the result is `left + [pivot] + right`.
/// A line whose price cannot be read stops the sort under
/// `MalformedPolicy::Abort`; under `Skip` it is kept aside and appended
/// after the sorted lines.
pub fn quicksort_lines(lines: &[String], policy: MalformedPolicy) -> Result<SortedLines> {
    let mut priced = Vec::with_capacity(lines.len());
    let mut rejected = Vec::new();
    let mut unsortable = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        match price_of_line(line) {
            Ok(price) => priced.push(PricedLine {
                price,
                line: line.clone(),
            }),
            Err(err) => {
                reject(policy, index as u64 + 1, line, err, &mut rejected)?;
                unsortable.push(line.clone());
            }
        }
    }

    let mut sorted: Vec<String> = quicksort_by_price(priced)
        .into_iter()
        .map(|entry| entry.line)
        .collect();
    sorted.extend(unsortable);

    Ok(SortedLines {
        lines: sorted,
        rejected,
    })
}

/// Pending step of the quicksort
enum Work {
    Sort(Vec<PricedLine>),
    Emit(PricedLine),
}

/// Last-element pivot quicksort, driven by an explicit work stack so that
/// already sorted input cannot exhaust the call stack.
///
/// A segment already in ascending order is emitted as it is: partitioning it
/// with the `<=` rule returns the same sequence.
fn quicksort_by_price(entries: Vec<PricedLine>) -> Vec<PricedLine> {
    let mut sorted = Vec::with_capacity(entries.len());
    let mut pending = vec![Work::Sort(entries)];

    while let Some(work) = pending.pop() {
        match work {
            Work::Emit(entry) => sorted.push(entry),
            Work::Sort(entries) if is_ascending(&entries) => sorted.extend(entries),
            Work::Sort(mut entries) => {
                let Some(pivot) = entries.pop() else {
                    continue;
                };
                let (left, right): (Vec<_>, Vec<_>) = entries
                    .into_iter()
                    .partition(|entry| entry.price <= pivot.price);
                // Popped in reverse: left, then the pivot, then right
                pending.push(Work::Sort(right));
                pending.push(Work::Emit(pivot));
                pending.push(Work::Sort(left));
            }
        }
    }
    sorted
}

fn is_ascending(entries: &[PricedLine]) -> bool {
    entries.windows(2).all(|pair| pair[0].price <= pair[1].price)
}

/// Statistics from a file price sort
#[derive(Debug)]
pub struct PriceSortReport {
    /// Number of lines written back
    pub lines: usize,
    pub rejected: Vec<RejectedLine>,
    pub backup: PathBuf,
}

/// Sorts a text backing file by price ascending, in place.
///
/// The file is first copied byte for byte to `<path>.backup`; the sorted
/// lines then replace the original. When the sort fails the backup exists
/// and the original is left as it was.
pub fn sort_file_by_price(path: &Path, policy: MalformedPolicy) -> Result<PriceSortReport> {
    if !path.exists() {
        return Err(InventoryError::MissingStore(path.to_path_buf()));
    }

    let backup = io::create_backup(path)?;
    let lines = io::read_raw_lines(path)?;
    let sorted = quicksort_lines(&lines, policy)?;
    io::write_raw_lines(path, &sorted.lines)?;

    info!(
        "Sorted {} lines of {} by price ascending ({} lines could not be priced)",
        sorted.lines.len(),
        path.display(),
        sorted.rejected.len()
    );
    Ok(PriceSortReport {
        lines: sorted.lines.len(),
        rejected: sorted.rejected,
        backup,
    })
}

#[cfg(test)]
#[path = "sorting_tests.rs"]
mod tests;
