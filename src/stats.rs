use crate::models::Product;

/// Summary figures for the current product list
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StockStats {
    pub product_count: usize,
    pub total_units: u64,
    /// Sum of quantity times price over all products
    pub total_value: f64,
    /// Name and quantity of the product with the most units (first one wins)
    pub most_stocked: Option<(String, u32)>,
    /// Name and quantity of every product, in list order
    pub quantities: Vec<(String, u32)>,
}

impl StockStats {
    pub fn from_products(products: &[Product]) -> Self {
        let mut stats = StockStats {
            product_count: products.len(),
            ..Self::default()
        };

        for product in products {
            stats.total_units += u64::from(product.quantity);
            stats.total_value += product.stock_value();
            stats.quantities.push((product.name.clone(), product.quantity));

            let is_new_max = stats
                .most_stocked
                .as_ref()
                .map_or(true, |(_, max)| product.quantity > *max);
            if is_new_max {
                stats.most_stocked = Some((product.name.clone(), product.quantity));
            }
        }

        stats
    }

    /// Largest quantity in the list, 0 when empty
    pub fn max_quantity(&self) -> u32 {
        self.quantities.iter().map(|(_, q)| *q).max().unwrap_or(0)
    }

    /// Mean unit price weighted by quantity, `None` when nothing is in stock
    pub fn average_unit_price(&self) -> Option<f64> {
        if self.total_units == 0 {
            None
        } else {
            Some(self.total_value / self.total_units as f64)
        }
    }
}
