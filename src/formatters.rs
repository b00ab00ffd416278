use crate::models::Product;
use crate::sorting::{SortDirection, SortKey};
use crate::stats::StockStats;

fn text_width(s: &str) -> usize {
    s.chars().count()
}

/// Heading for `column`, with the direction marker if the list is sorted by it
fn heading(column: SortKey, sorted_by: Option<(SortKey, SortDirection)>) -> String {
    match sorted_by {
        Some((key, direction)) if key == column => {
            format!("{} {}", column.column(), direction.indicator())
        }
        _ => column.column().to_string(),
    }
}

struct ColumnWidths {
    name: usize,
    quantity: usize,
    price: usize,
}

impl ColumnWidths {
    fn measure<'a, I>(products: I, headings: [&str; 3]) -> Self
    where
        I: IntoIterator<Item = &'a Product>,
    {
        let mut widths = ColumnWidths {
            name: text_width(headings[0]),
            quantity: text_width(headings[1]),
            price: text_width(headings[2]),
        };
        for product in products {
            widths.name = widths.name.max(text_width(&product.name));
            widths.quantity = widths.quantity.max(product.quantity.to_string().len());
            widths.price = widths.price.max(product.display_price().len());
        }
        widths
    }
}

/// Renders the product list as an aligned table with 1-based positions.
///
/// `sorted_by` puts a ▲/▼ marker on the heading of the column the list was
/// last sorted by.
pub fn format_product_table(
    products: &[Product],
    sorted_by: Option<(SortKey, SortDirection)>,
) -> String {
    if products.is_empty() {
        return "The product list is empty.\n".to_string();
    }

    let name_heading = heading(SortKey::Name, sorted_by);
    let quantity_heading = heading(SortKey::Quantity, sorted_by);
    let price_heading = heading(SortKey::Price, sorted_by);
    let widths = ColumnWidths::measure(
        products,
        [name_heading.as_str(), quantity_heading.as_str(), price_heading.as_str()],
    );
    let max_pos_len = products.len().to_string().len();

    let mut output = String::new();
    output.push_str(&format!(
        "{:>width_pos$} | {:<width_name$} | {:>width_qty$} | {:>width_price$}\n",
        "#",
        name_heading,
        quantity_heading,
        price_heading,
        width_pos = max_pos_len,
        width_name = widths.name,
        width_qty = widths.quantity,
        width_price = widths.price,
    ));
    output.push_str(&format!(
        "{:->width_pos$}-+-{:-<width_name$}-+-{:-<width_qty$}-+-{:-<width_price$}\n",
        "",
        "",
        "",
        "",
        width_pos = max_pos_len,
        width_name = widths.name,
        width_qty = widths.quantity,
        width_price = widths.price,
    ));

    for (index, product) in products.iter().enumerate() {
        output.push_str(&format!(
            "{:>width_pos$} | {:<width_name$} | {:>width_qty$} | {:>width_price$}\n",
            index + 1,
            product.name,
            product.quantity,
            product.display_price(),
            width_pos = max_pos_len,
            width_name = widths.name,
            width_qty = widths.quantity,
            width_price = widths.price,
        ));
    }

    output
}

/// Renders the result of a substring search
pub fn format_search_results(query: &str, matches: &[&Product]) -> String {
    if matches.is_empty() {
        return format!("No product matches '{}'.\n", query.trim());
    }

    let widths = ColumnWidths::measure(matches.iter().copied(), ["Name", "Quantity", "Price"]);

    let mut output = format!(
        "{} product{} found:\n",
        matches.len(),
        if matches.len() == 1 { "" } else { "s" }
    );
    output.push_str(&format!(
        "{:<width_name$} | {:>width_qty$} | {:>width_price$}\n",
        "Name",
        "Quantity",
        "Price",
        width_name = widths.name,
        width_qty = widths.quantity,
        width_price = widths.price,
    ));
    output.push_str(&format!(
        "{:-<width_name$}-+-{:-<width_qty$}-+-{:-<width_price$}\n",
        "",
        "",
        "",
        width_name = widths.name,
        width_qty = widths.quantity,
        width_price = widths.price,
    ));
    for product in matches {
        output.push_str(&format!(
            "{:<width_name$} | {:>width_qty$} | {:>width_price$}\n",
            product.name,
            product.quantity,
            product.display_price(),
            width_name = widths.name,
            width_qty = widths.quantity,
            width_price = widths.price,
        ));
    }
    output
}

/// One-line description of a single product
pub fn format_product_line(product: &Product) -> String {
    format!(
        "{}, quantity: {}, price: {}",
        product.name,
        product.quantity,
        product.display_price()
    )
}

/// Number of `#` for `quantity`, scaled so `max` fills `width` columns.
/// Any non-zero quantity gets at least one.
fn bar_length(quantity: u32, max: u32, width: usize) -> usize {
    if quantity == 0 || max == 0 {
        return 0;
    }
    let scaled = (u64::from(quantity) * width as u64 + u64::from(max) / 2) / u64::from(max);
    (scaled as usize).max(1)
}

/// Horizontal bar chart of quantities per product, followed by the totals
pub fn format_stock_chart(stats: &StockStats, width: usize) -> String {
    let mut output = String::new();
    if stats.quantities.is_empty() {
        output.push_str("No products in stock.\n");
        return output;
    }

    let max = stats.max_quantity();
    let max_name_len = stats
        .quantities
        .iter()
        .map(|(name, _)| text_width(name))
        .max()
        .unwrap_or(0);

    output.push_str(&format!(
        "Stock by product (largest bar = {max} units)\n"
    ));
    output.push_str(&format!("{:-<1$}\n", "", max_name_len + width + 10));

    for (name, quantity) in &stats.quantities {
        let bar = "#".repeat(bar_length(*quantity, max, width));
        output.push_str(&format!(
            "{name:<max_name_len$} | {bar} {quantity}\n"
        ));
    }

    output.push_str(&format!("{:-<1$}\n", "", max_name_len + width + 10));
    output.push_str(&format!("Products: {}\n", stats.product_count));
    output.push_str(&format!("Units in stock: {}\n", stats.total_units));
    output.push_str(&format!("Stock value: {:.2}\n", stats.total_value));
    if let Some(average) = stats.average_unit_price() {
        output.push_str(&format!("Average unit price: {average:.2}\n"));
    }
    if let Some((name, quantity)) = &stats.most_stocked {
        output.push_str(&format!("Most stocked: {name} ({quantity})\n"));
    }
    output
}
