//! Product Manager - command line front end
//!
//! Without a subcommand the interactive menu is started.

use clap::{Parser, Subcommand, ValueEnum};
use product_manager::config::{default_data_path, FILE_ENV_VAR};
use product_manager::formatters::{
    format_product_line, format_product_table, format_search_results, format_stock_chart,
};
use product_manager::menu::Menu;
use product_manager::{Product, Result, Settings, SortKey, StoreFormat};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Product inventory manager - list, search, sort and count your stock
#[derive(Parser, Debug)]
#[command(name = "product_manager")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the product data file
    #[arg(short, long, env = FILE_ENV_VAR, default_value_os_t = default_data_path())]
    file: PathBuf,

    /// Storage format (default: detected from the file extension)
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Stop at the first malformed record instead of skipping it
    #[arg(long, default_value_t = false)]
    strict: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive menu (default)
    Menu,
    /// Show the product list
    List,
    /// Add a product
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        quantity: u32,
        #[arg(long)]
        price: f64,
    },
    /// Remove the product at a position of the list (1-based)
    Remove { position: usize },
    /// Change quantity and/or price of the product at a position (1-based)
    Modify {
        position: usize,
        #[arg(long)]
        quantity: Option<u32>,
        #[arg(long)]
        price: Option<f64>,
    },
    /// Search products by name
    Search {
        query: String,
        /// Exact name lookup with a dichotomic search
        #[arg(long, default_value_t = false)]
        exact: bool,
    },
    /// Sort the list and save it
    Sort {
        #[arg(long, value_enum)]
        by: SortArg,
        /// Use the opposite of the default direction
        #[arg(long, default_value_t = false)]
        reverse: bool,
    },
    /// Sort the text data file by price, ascending, keeping a .backup copy
    SortFile {
        /// Keep unreadable lines (moved to the end) instead of aborting
        #[arg(long, default_value_t = false)]
        skip_malformed: bool,
    },
    /// Stock statistics with a quantity bar chart
    Stats {
        /// Width of the largest bar
        #[arg(long, default_value_t = 40)]
        width: usize,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Text,
    Json,
    Sqlite,
}

impl From<FormatArg> for StoreFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => StoreFormat::Text,
            FormatArg::Json => StoreFormat::Json,
            FormatArg::Sqlite => StoreFormat::Sqlite,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortArg {
    Name,
    Quantity,
    Price,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortKey::Name,
            SortArg::Quantity => SortKey::Quantity,
            SortArg::Price => SortKey::Price,
        }
    }
}

fn main() {
    // Initialize logger. Set RUST_LOG environment variable to control log level.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let settings = Settings::new(args.file, args.format.map(StoreFormat::from), args.strict);
    let mut inventory = settings.open_inventory()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command.unwrap_or(Command::Menu) {
        Command::Menu => {
            let stdin = io::stdin();
            let input = stdin.lock();
            run_interactive(&mut inventory, input, &mut out)?;
        }
        Command::List => {
            write!(out, "{}", format_product_table(inventory.products(), None))?;
        }
        Command::Add {
            name,
            quantity,
            price,
        } => {
            let product = Product::new(name, quantity, price)?;
            let name = inventory.add(product).name.clone();
            inventory.save()?;
            writeln!(out, "Product '{name}' added.")?;
        }
        Command::Remove { position } => {
            let removed = inventory.remove(position)?;
            inventory.save()?;
            writeln!(out, "Product '{}' removed.", removed.name)?;
        }
        Command::Modify {
            position,
            quantity,
            price,
        } => {
            let line = format_product_line(inventory.modify(position, quantity, price)?);
            inventory.save()?;
            writeln!(out, "Product updated: {line}")?;
        }
        Command::Search { query, exact } => {
            if exact {
                match inventory.find_by_name(&query)? {
                    Some(product) => {
                        writeln!(out, "Product found: {}", format_product_line(&product))?
                    }
                    None => writeln!(out, "Product '{}' was not found.", query.trim())?,
                }
            } else {
                let matches = inventory.search(&query);
                write!(out, "{}", format_search_results(&query, &matches))?;
            }
        }
        Command::Sort { by, reverse } => {
            let key = SortKey::from(by);
            let direction = if reverse {
                key.default_direction().toggle()
            } else {
                key.default_direction()
            };
            inventory.sort(key, direction);
            inventory.save()?;
            write!(
                out,
                "{}",
                format_product_table(inventory.products(), inventory.sorted_by())
            )?;
        }
        Command::SortFile { skip_malformed } => {
            let report =
                inventory.sort_backing_file_by_price(settings.file_sort_policy(skip_malformed))?;
            writeln!(
                out,
                "Backup written to {}. {} lines sorted by price (ascending).",
                report.backup.display(),
                report.lines
            )?;
            for rejected in &report.rejected {
                writeln!(
                    out,
                    "Line {} could not be priced and was moved to the end: {}",
                    rejected.line, rejected.reason
                )?;
            }
        }
        Command::Stats { width } => {
            write!(out, "{}", format_stock_chart(&inventory.stats(), width))?;
        }
    }

    Ok(())
}

fn run_interactive<R: BufRead, W: Write>(
    inventory: &mut product_manager::Inventory,
    input: R,
    output: W,
) -> Result<()> {
    let exit = Menu::new(input, output).run(inventory)?;
    log::info!("Menu closed: {exit:?}");
    Ok(())
}
