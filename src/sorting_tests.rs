//! Unit tests for product orderings.

use super::*;
use std::fs;
use tempfile::TempDir;

fn make_product(name: &str, quantity: u32, price: f64) -> Product {
    Product::new(name, quantity, price).unwrap()
}

fn names(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.name.as_str()).collect()
}

fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|l| l.to_string()).collect()
}

mod sort_products_tests {
    use super::*;

    #[test]
    fn by_name_is_case_insensitive() {
        let mut products = vec![
            make_product("banana", 1, 1.0),
            make_product("Cherry", 1, 1.0),
            make_product("apple", 1, 1.0),
            make_product("Apricot", 1, 1.0),
        ];
        sort_products(&mut products, SortKey::Name, SortDirection::Ascending);
        assert_eq!(names(&products), vec!["apple", "Apricot", "banana", "Cherry"]);
    }

    #[test]
    fn by_name_descending_keeps_ties_in_order() {
        let mut products = vec![
            make_product("Apple", 1, 1.0),
            make_product("apple", 2, 1.0),
            make_product("Banana", 3, 1.0),
        ];
        sort_products(&mut products, SortKey::Name, SortDirection::Descending);
        let quantities: Vec<u32> = products.iter().map(|p| p.quantity).collect();
        assert_eq!(quantities, vec![3, 1, 2]);
    }

    #[test]
    fn by_quantity_defaults_to_descending() {
        let mut products = vec![
            make_product("A", 5, 1.0),
            make_product("B", 20, 1.0),
            make_product("C", 10, 1.0),
        ];
        sort_products(
            &mut products,
            SortKey::Quantity,
            SortKey::Quantity.default_direction(),
        );
        assert_eq!(names(&products), vec!["B", "C", "A"]);
    }

    #[test]
    fn by_price_descending_and_ascending() {
        let mut products = vec![
            make_product("Apple", 10, 1.5),
            make_product("Banana", 5, 3.0),
            make_product("Cherry", 20, 0.75),
        ];
        sort_products(&mut products, SortKey::Price, SortDirection::Descending);
        assert_eq!(names(&products), vec!["Banana", "Apple", "Cherry"]);

        sort_products(&mut products, SortKey::Price, SortDirection::Ascending);
        assert_eq!(names(&products), vec!["Cherry", "Apple", "Banana"]);
    }

    #[test]
    fn by_price_is_stable() {
        let mut products = vec![
            make_product("First", 1, 2.0),
            make_product("Cheap", 1, 1.0),
            make_product("Second", 1, 2.0),
        ];
        sort_products(&mut products, SortKey::Price, SortDirection::Descending);
        assert_eq!(names(&products), vec!["First", "Second", "Cheap"]);
    }

    #[test]
    fn sort_key_parse_and_defaults() {
        assert_eq!(SortKey::parse("Quantity"), Some(SortKey::Quantity));
        assert_eq!(SortKey::parse("price"), Some(SortKey::Price));
        assert_eq!(SortKey::parse("name"), Some(SortKey::Name));
        assert_eq!(SortKey::parse("color"), None);
        assert_eq!(SortKey::Name.default_direction(), SortDirection::Ascending);
        assert_eq!(SortKey::Price.default_direction(), SortDirection::Descending);
    }

    #[test]
    fn direction_toggle_and_indicator() {
        assert_eq!(SortDirection::Ascending.toggle(), SortDirection::Descending);
        assert_eq!(SortDirection::Descending.toggle(), SortDirection::Ascending);
        assert_eq!(SortDirection::Ascending.indicator(), "▲");
        assert_eq!(SortDirection::Descending.indicator(), "▼");
    }
}

mod bubble_sort_tests {
    use super::*;

    #[test]
    fn equal_quantities_never_swap() {
        let mut products = vec![
            make_product("First", 5, 1.0),
            make_product("Big", 9, 1.0),
            make_product("Second", 5, 1.0),
            make_product("Third", 5, 1.0),
        ];
        bubble_sort_by_quantity(&mut products, SortDirection::Descending);
        assert_eq!(names(&products), vec!["Big", "First", "Second", "Third"]);
    }

    #[test]
    fn ascending_is_stable_too() {
        let mut products = vec![
            make_product("First", 5, 1.0),
            make_product("Small", 1, 1.0),
            make_product("Second", 5, 1.0),
        ];
        bubble_sort_by_quantity(&mut products, SortDirection::Ascending);
        assert_eq!(names(&products), vec!["Small", "First", "Second"]);
    }

    #[test]
    fn already_sorted_needs_no_swaps() {
        let mut products = vec![
            make_product("A", 3, 1.0),
            make_product("B", 2, 1.0),
            make_product("C", 2, 1.0),
        ];
        assert_eq!(
            bubble_sort_by_quantity(&mut products, SortDirection::Descending),
            0
        );
    }

    #[test]
    fn reversed_input_swaps_every_pair() {
        let mut products = vec![
            make_product("A", 1, 1.0),
            make_product("B", 2, 1.0),
            make_product("C", 3, 1.0),
            make_product("D", 4, 1.0),
        ];
        let swaps = bubble_sort_by_quantity(&mut products, SortDirection::Descending);
        assert_eq!(swaps, 6);
        assert_eq!(names(&products), vec!["D", "C", "B", "A"]);
    }

    #[test]
    fn empty_and_single_element() {
        let mut empty: Vec<Product> = Vec::new();
        assert_eq!(bubble_sort_by_quantity(&mut empty, SortDirection::Descending), 0);

        let mut single = vec![make_product("Solo", 1, 1.0)];
        assert_eq!(bubble_sort_by_quantity(&mut single, SortDirection::Ascending), 0);
    }
}

mod quicksort_tests {
    use super::*;

    #[test]
    fn sorts_fruit_lines_by_price_ascending() {
        let input = lines(&["Apple,10,1.50", "Banana,5,3.00", "Cherry,20,0.75"]);
        let sorted = quicksort_lines(&input, MalformedPolicy::Abort).unwrap();
        assert_eq!(
            sorted.lines,
            lines(&["Cherry,20,0.75", "Apple,10,1.50", "Banana,5,3.00"])
        );
        assert!(sorted.rejected.is_empty());
    }

    #[test]
    fn keeps_lines_verbatim() {
        let input = lines(&["  Pear ,1, 2.5", "Fig,1,1"]);
        let sorted = quicksort_lines(&input, MalformedPolicy::Abort).unwrap();
        assert_eq!(sorted.lines, lines(&["Fig,1,1", "  Pear ,1, 2.5"]));
    }

    #[test]
    fn equal_prices_stay_adjacent() {
        let input = lines(&["A,1,2", "B,1,1", "C,1,2", "D,1,1"]);
        let sorted = quicksort_lines(&input, MalformedPolicy::Abort).unwrap();
        let prices: Vec<f64> = sorted
            .lines
            .iter()
            .map(|l| price_of_line(l).unwrap())
            .collect();
        assert_eq!(prices, vec![1.0, 1.0, 2.0, 2.0]);
    }

    #[test]
    fn abort_policy_fails_on_bad_price() {
        let input = lines(&["Apple,10,1.50", "Banana,5,cheap", "Cherry,20,0.75"]);
        let err = quicksort_lines(&input, MalformedPolicy::Abort).unwrap_err();
        assert!(matches!(err, InventoryError::MalformedLine { line: 2, .. }));
    }

    #[test]
    fn skip_policy_appends_bad_lines() {
        let input = lines(&["Banana,5,3.00", "garbage", "Apple,10,1.50", "Kiwi,1"]);
        let sorted = quicksort_lines(&input, MalformedPolicy::Skip).unwrap();
        assert_eq!(
            sorted.lines,
            lines(&["Apple,10,1.50", "Banana,5,3.00", "garbage", "Kiwi,1"])
        );
        assert_eq!(sorted.rejected.len(), 2);
    }

    #[test]
    fn empty_input() {
        let sorted = quicksort_lines(&[], MalformedPolicy::Abort).unwrap();
        assert!(sorted.lines.is_empty());
    }

    #[test]
    fn large_sorted_input() {
        let input: Vec<String> = (0..100_000).map(|i| format!("P{i},1,{i}")).collect();
        let sorted = quicksort_lines(&input, MalformedPolicy::Abort).unwrap();
        assert_eq!(sorted.lines, input);
    }

    #[test]
    fn large_input_with_equal_prices() {
        let input: Vec<String> = (0..100_000).map(|i| format!("P{i},1,2.50")).collect();
        let sorted = quicksort_lines(&input, MalformedPolicy::Abort).unwrap();
        assert_eq!(sorted.lines, input);
    }

    #[test]
    fn reversed_input_with_ties() {
        let input: Vec<String> = (0..3_000)
            .rev()
            .map(|i| format!("P{i},1,{}", i / 2))
            .collect();
        let sorted = quicksort_lines(&input, MalformedPolicy::Abort).unwrap();

        let mut expected = input.clone();
        expected.sort_by(|a, b| {
            price_of_line(a)
                .unwrap()
                .total_cmp(&price_of_line(b).unwrap())
        });
        assert_eq!(sorted.lines, expected);
    }
}

mod sort_file_tests {
    use super::*;

    #[test]
    fn sorts_file_and_writes_backup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.txt");
        let original = "Apple,10,1.50\nBanana,5,3.00\nCherry,20,0.75\n";
        fs::write(&path, original).unwrap();

        let report = sort_file_by_price(&path, MalformedPolicy::Abort).unwrap();

        assert_eq!(report.lines, 3);
        assert_eq!(report.backup, dir.path().join("products.txt.backup"));
        assert_eq!(fs::read_to_string(&report.backup).unwrap(), original);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Cherry,20,0.75\nApple,10,1.50\nBanana,5,3.00\n"
        );
    }

    #[test]
    fn failed_sort_leaves_original_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.txt");
        let original = "Apple,10,1.50\nBanana,5,???\n";
        fs::write(&path, original).unwrap();

        let result = sort_file_by_price(&path, MalformedPolicy::Abort);
        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
        assert_eq!(
            fs::read_to_string(dir.path().join("products.txt.backup")).unwrap(),
            original
        );
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let result = sort_file_by_price(&dir.path().join("none.txt"), MalformedPolicy::Skip);
        assert!(matches!(result, Err(InventoryError::MissingStore(_))));
    }
}
