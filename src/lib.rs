//! Product Manager
//!
//! Keeps a list of products (name, quantity, unit price) in a text, JSON or
//! SQLite file, with substring and dichotomic search, several orderings and a
//! stock statistics view.

pub mod config;
pub mod error;
pub mod formatters;
pub mod inventory;
pub mod io;
pub mod menu;
pub mod models;
pub mod search;
pub mod sorting;
pub mod stats;
pub mod store;

// Re-export commonly used items
pub use config::Settings;
pub use error::{InventoryError, Result};
pub use formatters::{format_product_table, format_search_results, format_stock_chart};
pub use inventory::Inventory;
pub use io::{read_products, write_products, LoadReport, MalformedPolicy, RejectedLine};
pub use menu::{run_menu, MenuExit};
pub use models::Product;
pub use search::{binary_search, is_sorted_by_name, linear_search};
pub use sorting::{
    bubble_sort_by_quantity, quicksort_lines, sort_file_by_price, sort_products, SortDirection,
    SortKey,
};
pub use stats::StockStats;
pub use store::{open_store, ProductStore, StoreFormat};
