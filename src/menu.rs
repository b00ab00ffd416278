//! Interactive text menu.
//!
//! Reads choices line by line from any `BufRead` and writes to any `Write`,
//! so the whole loop can be driven from a string in tests. Failed operations
//! print a message and return to the menu without changing the list.

use crate::error::{InventoryError, Result};
use crate::formatters::{
    format_product_line, format_product_table, format_search_results, format_stock_chart,
};
use crate::inventory::Inventory;
use crate::io::MalformedPolicy;
use crate::sorting::SortKey;
use std::io::{BufRead, Write};

/// Width of the largest bar in the statistics chart
const CHART_WIDTH: usize = 40;

/// How the menu loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuExit {
    /// The user chose "save and quit" and the save succeeded
    Saved,
    /// Input ended before the user quit; nothing was saved
    EndOfInput,
}

pub struct Menu<R, W> {
    input: R,
    output: W,
    file_sort_policy: MalformedPolicy,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            file_sort_policy: MalformedPolicy::Abort,
        }
    }

    /// Policy used by the "sort data file by price" entry
    pub fn with_file_sort_policy(mut self, policy: MalformedPolicy) -> Self {
        self.file_sort_policy = policy;
        self
    }

    pub fn run(&mut self, inventory: &mut Inventory) -> Result<MenuExit> {
        if inventory.source_was_missing() {
            writeln!(
                self.output,
                "The file {} does not exist yet, starting with an empty list.",
                inventory.location().display()
            )?;
        }
        if !inventory.rejected().is_empty() {
            writeln!(
                self.output,
                "{} line(s) of {} could not be read and were skipped.",
                inventory.rejected().len(),
                inventory.location().display()
            )?;
        }

        loop {
            writeln!(self.output)?;
            writeln!(self.output, "=== Product Manager ===")?;
            writeln!(self.output, "1. Show the product list")?;
            writeln!(self.output, "2. Add a product")?;
            writeln!(self.output, "3. Remove a product")?;
            writeln!(self.output, "4. Modify a product")?;
            writeln!(self.output, "5. Search for a product")?;
            writeln!(self.output, "6. Sort the products")?;
            writeln!(self.output, "7. Stock statistics")?;
            writeln!(self.output, "8. Sort the data file by price (ascending, with backup)")?;
            writeln!(self.output, "9. Save and quit")?;

            let Some(choice) = self.prompt("Your choice: ")? else {
                return self.end_of_input();
            };

            let handled = match choice.as_str() {
                "1" => {
                    let table = format_product_table(inventory.products(), inventory.sorted_by());
                    write!(self.output, "\n{table}")?;
                    Some(())
                }
                "2" => self.add(inventory)?,
                "3" => self.remove(inventory)?,
                "4" => self.modify(inventory)?,
                "5" => self.search(inventory)?,
                "6" => self.sort(inventory)?,
                "7" => {
                    let chart = format_stock_chart(&inventory.stats(), CHART_WIDTH);
                    write!(self.output, "\n{chart}")?;
                    Some(())
                }
                "8" => self.sort_file(inventory)?,
                "9" => match inventory.save() {
                    Ok(()) => {
                        writeln!(self.output, "Changes saved. Goodbye!")?;
                        return Ok(MenuExit::Saved);
                    }
                    Err(e) => {
                        self.report_error(&e)?;
                        Some(())
                    }
                },
                _ => {
                    writeln!(self.output, "Invalid choice, please try again.")?;
                    Some(())
                }
            };

            if handled.is_none() {
                return self.end_of_input();
            }
        }
    }

    /// Prints `text`, then reads one trimmed line. `None` at end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn end_of_input(&mut self) -> Result<MenuExit> {
        log::warn!("Input closed before quitting, unsaved changes are discarded");
        writeln!(self.output)?;
        Ok(MenuExit::EndOfInput)
    }

    fn report_error(&mut self, err: &InventoryError) -> Result<()> {
        log::warn!("Menu operation failed: {err}");
        writeln!(self.output, "{err}")?;
        Ok(())
    }

    fn read_position(&mut self, text: &str) -> Result<Option<std::result::Result<usize, String>>> {
        let Some(raw) = self.prompt(text)? else {
            return Ok(None);
        };
        Ok(Some(
            raw.parse::<usize>()
                .map_err(|_| format!("'{raw}' is not a valid number.")),
        ))
    }

    fn add(&mut self, inventory: &mut Inventory) -> Result<Option<()>> {
        let Some(name) = self.prompt("Product name: ")? else {
            return Ok(None);
        };
        if name.is_empty() {
            writeln!(self.output, "The product name cannot be empty.")?;
            return Ok(Some(()));
        }
        let Some(quantity) = self.prompt("Quantity: ")? else {
            return Ok(None);
        };
        let Some(price) = self.prompt("Price: ")? else {
            return Ok(None);
        };

        match inventory.add_from_input(&name, &quantity, &price) {
            Ok(product) => {
                let message = format!("Product '{}' added.", product.name);
                writeln!(self.output, "{message}")?;
            }
            Err(e) => self.report_error(&e)?,
        }
        Ok(Some(()))
    }

    fn remove(&mut self, inventory: &mut Inventory) -> Result<Option<()>> {
        write!(
            self.output,
            "\n{}",
            format_product_table(inventory.products(), inventory.sorted_by())
        )?;
        let Some(position) = self.read_position("Number of the product to remove: ")? else {
            return Ok(None);
        };
        let result = match position {
            Ok(position) => inventory.remove(position).map_err(|e| e.to_string()),
            Err(message) => Err(message),
        };
        match result {
            Ok(removed) => writeln!(self.output, "Product '{}' removed.", removed.name)?,
            Err(message) => writeln!(self.output, "{message}")?,
        }
        Ok(Some(()))
    }

    fn modify(&mut self, inventory: &mut Inventory) -> Result<Option<()>> {
        write!(
            self.output,
            "\n{}",
            format_product_table(inventory.products(), inventory.sorted_by())
        )?;
        let Some(position) = self.read_position("Number of the product to modify: ")? else {
            return Ok(None);
        };
        let position = match position {
            Ok(position) => position,
            Err(message) => {
                writeln!(self.output, "{message}")?;
                return Ok(Some(()));
            }
        };
        let Some(quantity) = self.prompt("New quantity (blank keeps the current one): ")? else {
            return Ok(None);
        };
        let Some(price) = self.prompt("New price (blank keeps the current one): ")? else {
            return Ok(None);
        };

        match inventory.modify_from_input(position, &quantity, &price) {
            Ok(product) => {
                let message = format!("Product updated: {}", format_product_line(product));
                writeln!(self.output, "{message}")?;
            }
            Err(e) => self.report_error(&e)?,
        }
        Ok(Some(()))
    }

    fn search(&mut self, inventory: &Inventory) -> Result<Option<()>> {
        writeln!(self.output, "\nSearch mode:")?;
        writeln!(self.output, "1. Search by name")?;
        writeln!(self.output, "2. Dichotomic search (exact name)")?;
        let Some(mode) = self.prompt("Your choice: ")? else {
            return Ok(None);
        };
        if mode != "1" && mode != "2" {
            writeln!(self.output, "Invalid search choice.")?;
            return Ok(Some(()));
        }
        let Some(query) = self.prompt("Product name to search for: ")? else {
            return Ok(None);
        };

        if mode == "1" {
            let matches = inventory.search(&query);
            write!(self.output, "\n{}", format_search_results(&query, &matches))?;
        } else {
            match inventory.find_by_name(&query) {
                Ok(Some(product)) => writeln!(
                    self.output,
                    "\nProduct found: {}",
                    format_product_line(&product)
                )?,
                Ok(None) => writeln!(self.output, "\nProduct '{query}' was not found.")?,
                Err(e) => self.report_error(&e)?,
            }
        }
        Ok(Some(()))
    }

    /// Sorts the data file as stored. Unsaved changes are saved first, on
    /// confirmation only.
    fn sort_file(&mut self, inventory: &mut Inventory) -> Result<Option<()>> {
        if inventory.has_unsaved_changes() {
            let Some(answer) =
                self.prompt("The list has unsaved changes. Save them before sorting the file? (y/n): ")?
            else {
                return Ok(None);
            };
            if !answer.eq_ignore_ascii_case("y") {
                writeln!(self.output, "The data file was not sorted.")?;
                return Ok(Some(()));
            }
            if let Err(e) = inventory.save() {
                self.report_error(&e)?;
                return Ok(Some(()));
            }
        }

        match inventory.sort_backing_file_by_price(self.file_sort_policy) {
            Ok(report) => {
                writeln!(
                    self.output,
                    "Backup written to {}. {} lines sorted by price (ascending).",
                    report.backup.display(),
                    report.lines
                )?;
                for rejected in &report.rejected {
                    writeln!(
                        self.output,
                        "Line {} could not be priced and was moved to the end: {}",
                        rejected.line, rejected.reason
                    )?;
                }
            }
            Err(e) => self.report_error(&e)?,
        }
        Ok(Some(()))
    }

    fn sort(&mut self, inventory: &mut Inventory) -> Result<Option<()>> {
        writeln!(self.output, "\nSort by:")?;
        writeln!(self.output, "1. Name")?;
        writeln!(self.output, "2. Quantity")?;
        writeln!(self.output, "3. Price")?;
        let Some(choice) = self.prompt("Your choice: ")? else {
            return Ok(None);
        };
        let key = match choice.as_str() {
            "1" => SortKey::Name,
            "2" => SortKey::Quantity,
            "3" => SortKey::Price,
            _ => {
                writeln!(self.output, "Invalid choice, the list was not sorted.")?;
                return Ok(Some(()));
            }
        };

        // Picking the current sort key again flips the direction
        let direction = match inventory.sorted_by() {
            Some((current, direction)) if current == key => direction.toggle(),
            _ => key.default_direction(),
        };
        inventory.sort(key, direction);
        writeln!(
            self.output,
            "Products sorted by {} ({}).",
            key.column().to_lowercase(),
            direction.as_str()
        )?;
        Ok(Some(()))
    }
}

/// Runs the menu on `inventory` until the user saves and quits or input ends
pub fn run_menu<R: BufRead, W: Write>(
    inventory: &mut Inventory,
    input: R,
    output: W,
) -> Result<MenuExit> {
    Menu::new(input, output).run(inventory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TextStore;
    use std::fs;
    use tempfile::TempDir;

    const FRUIT: &str = "Banana,5,3.00\nApple,10,1.50\nCherry,20,0.75\n";

    fn setup(content: Option<&str>) -> (TempDir, Inventory) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.txt");
        if let Some(content) = content {
            fs::write(&path, content).unwrap();
        }
        let inventory =
            Inventory::open(Box::new(TextStore::new(path)), MalformedPolicy::Skip).unwrap();
        (dir, inventory)
    }

    fn drive(inventory: &mut Inventory, script: &str) -> (MenuExit, String) {
        let mut output = Vec::new();
        let exit = run_menu(inventory, script.as_bytes(), &mut output).unwrap();
        (exit, String::from_utf8(output).unwrap())
    }

    #[test]
    fn display_and_quit_saves() {
        let (dir, mut inventory) = setup(Some(FRUIT));
        let (exit, output) = drive(&mut inventory, "1\n9\n");

        assert_eq!(exit, MenuExit::Saved);
        assert!(output.contains("2 | Apple "));
        assert!(output.contains("Changes saved. Goodbye!"));
        assert_eq!(
            fs::read_to_string(dir.path().join("products.txt")).unwrap(),
            "Banana,5,3\nApple,10,1.5\nCherry,20,0.75\n"
        );
    }

    #[test]
    fn end_of_input_does_not_save() {
        let (dir, mut inventory) = setup(None);
        let (exit, output) = drive(&mut inventory, "2\nKiwi\n3\n0.5\n");

        assert_eq!(exit, MenuExit::EndOfInput);
        assert!(output.contains("does not exist yet"));
        assert!(output.contains("Product 'Kiwi' added."));
        assert!(!dir.path().join("products.txt").exists());
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn invalid_add_leaves_list_unchanged() {
        let (_dir, mut inventory) = setup(Some(FRUIT));
        let (_, output) = drive(&mut inventory, "2\nKiwi\nlots\n0.5\n2\n\n");

        assert!(output.contains("invalid quantity 'lots'"));
        assert!(output.contains("The product name cannot be empty."));
        assert_eq!(inventory.len(), 3);
    }

    #[test]
    fn remove_with_bad_positions() {
        let (_dir, mut inventory) = setup(Some(FRUIT));
        let (_, output) = drive(&mut inventory, "3\nabc\n3\n7\n3\n1\n");

        assert!(output.contains("'abc' is not a valid number."));
        assert!(output.contains("No product at position 7 (list has 3 products)"));
        assert!(output.contains("Product 'Banana' removed."));
        assert_eq!(inventory.len(), 2);
    }

    #[test]
    fn modify_keeps_blank_fields() {
        let (_dir, mut inventory) = setup(Some(FRUIT));
        let (_, output) = drive(&mut inventory, "4\n2\n\n2.25\n");

        assert!(output.contains("Product updated: Apple, quantity: 10, price: 2.25"));
    }

    #[test]
    fn both_search_modes() {
        let (_dir, mut inventory) = setup(Some(FRUIT));
        let (_, output) = drive(&mut inventory, "5\n1\nAN\n5\n2\ncherry\n5\n2\nKiwi\n5\n3\n");

        assert!(output.contains("1 product found:"));
        assert!(output.contains("Product found: Cherry, quantity: 20, price: 0.75"));
        assert!(output.contains("Product 'Kiwi' was not found."));
        assert!(output.contains("Invalid search choice."));
        // Dichotomic search does not reorder the list
        assert_eq!(inventory.products()[0].name, "Banana");
    }

    #[test]
    fn sorting_twice_flips_direction() {
        let (_dir, mut inventory) = setup(Some(FRUIT));
        let (_, output) = drive(&mut inventory, "6\n2\n6\n2\n");

        assert!(output.contains("Products sorted by quantity (descending)."));
        assert!(output.contains("Products sorted by quantity (ascending)."));
        assert_eq!(inventory.products()[0].name, "Banana");
    }

    #[test]
    fn statistics_chart() {
        let (_dir, mut inventory) = setup(Some(FRUIT));
        let (_, output) = drive(&mut inventory, "7\n");
        assert!(output.contains("Units in stock: 35"));
    }

    #[test]
    fn file_sort_entry() {
        let (dir, mut inventory) = setup(Some(FRUIT));
        let (_, output) = drive(&mut inventory, "8\n1\n");

        assert!(output.contains("3 lines sorted by price (ascending)."));
        assert!(dir.path().join("products.txt.backup").exists());
        assert_eq!(inventory.products()[0].name, "Cherry");
        assert!(output.contains("Price ▲"));
    }

    #[test]
    fn file_sort_aborts_on_malformed_line() {
        let original = "Banana,5,3.00\nBroken line\nApple,10,1.50\n";
        let (dir, mut inventory) = setup(Some(original));
        let (_, output) = drive(&mut inventory, "8\n");

        assert!(output.contains("Line 2:"));
        let path = dir.path().join("products.txt");
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
        assert_eq!(
            fs::read_to_string(dir.path().join("products.txt.backup")).unwrap(),
            original
        );
        assert_eq!(inventory.products()[0].name, "Banana");
    }

    #[test]
    fn file_sort_with_skip_policy_moves_bad_lines_last() {
        let original = "Banana,5,3.00\nBroken line\nApple,10,1.50\n";
        let (dir, mut inventory) = setup(Some(original));
        let mut output = Vec::new();
        Menu::new("8\n".as_bytes(), &mut output)
            .with_file_sort_policy(MalformedPolicy::Skip)
            .run(&mut inventory)
            .unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("Line 2 could not be priced and was moved to the end"));
        assert_eq!(
            fs::read_to_string(dir.path().join("products.txt")).unwrap(),
            "Apple,10,1.50\nBanana,5,3.00\nBroken line\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("products.txt.backup")).unwrap(),
            original
        );
    }

    #[test]
    fn file_sort_asks_before_saving_changes() {
        let (dir, mut inventory) = setup(Some(FRUIT));
        let path = dir.path().join("products.txt");

        let (_, output) = drive(&mut inventory, "2\nKiwi\n3\n0.5\n8\nn\n");
        assert!(output.contains("The data file was not sorted."));
        assert_eq!(fs::read_to_string(&path).unwrap(), FRUIT);
        assert!(!dir.path().join("products.txt.backup").exists());
        assert_eq!(inventory.len(), 4);

        let (_, output) = drive(&mut inventory, "8\ny\n");
        assert!(output.contains("4 lines sorted by price (ascending)."));
        assert_eq!(inventory.products()[0].name, "Kiwi");
        assert!(!inventory.has_unsaved_changes());
    }

    #[test]
    fn unknown_choice() {
        let (_dir, mut inventory) = setup(Some(FRUIT));
        let (_, output) = drive(&mut inventory, "42\n");
        assert!(output.contains("Invalid choice, please try again."));
    }
}
