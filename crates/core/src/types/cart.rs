//! Server-authoritative cart.
//!
//! The API recomputes the cart on every mutation and returns it as a JSON
//! array of product records. [`Cart`] wraps that array as-is: membership is
//! never decided locally, only the display sums are computed here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Product;

/// The cart exactly as last returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<Product>,
}

impl Cart {
    /// Wrap a server response.
    #[must_use]
    pub const fn new(items: Vec<Product>) -> Self {
        Self { items }
    }

    /// An empty cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self { items: Vec::new() }
    }

    /// Every record the server returned, in server order.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Records that are displayed as cart lines (quantity above zero).
    pub fn lines(&self) -> impl Iterator<Item = &Product> {
        self.items.iter().filter(|p| p.in_cart())
    }

    /// Sum of `qty × price` over the displayed lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines()
            .map(Product::subtotal)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Total number of units across the displayed lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines().map(|p| u64::from(p.qty)).sum()
    }

    /// True if there is nothing to display.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines().next().is_none()
    }

    /// Find a displayed line by the rendered form of its id.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&Product> {
        self.lines().find(|p| p.id.matches(key))
    }

}

impl From<Vec<Product>> for Cart {
    fn from(items: Vec<Product>) -> Self {
        Self::new(items)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cart_from(value: serde_json::Value) -> Cart {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_zero_quantity_products_are_not_lines() {
        let cart = cart_from(json!([
            {"_id": 1, "model": "A", "company": "X", "price": 100, "qty": 0},
            {"_id": 2, "model": "B", "company": "Y", "price": 200, "qty": 2}
        ]));

        let ids: Vec<String> = cart.lines().map(|p| p.id.to_string()).collect();
        assert_eq!(ids, vec!["2"]);
        assert_eq!(cart.items().len(), 2);
        assert!(cart.find("1").is_none());
        assert!(cart.find("2").is_some());
    }

    #[test]
    fn test_total_is_sum_of_displayed_subtotals() {
        let cart = cart_from(json!([
            {"_id": "a", "model": "A", "company": "X", "price": 12_999.5, "qty": 2},
            {"_id": "b", "model": "B", "company": "Y", "price": 700, "qty": 3},
            {"_id": "c", "model": "C", "company": "Z", "price": 5_000, "qty": 0}
        ]));

        let expected: Decimal = cart.lines().map(Product::subtotal).sum();
        assert_eq!(cart.total(), expected);
        assert_eq!(cart.total(), Decimal::new(2_809_900, 2));
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_empty_cart() {
        let cart = Cart::empty();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
        assert_eq!(cart.item_count(), 0);

        let only_zero = cart_from(json!([
            {"_id": 1, "model": "A", "company": "X", "price": 100, "qty": 0}
        ]));
        assert!(only_zero.is_empty());
    }

    #[test]
    fn test_out_of_range_price_fails_to_decode() {
        let result = serde_json::from_value::<Cart>(json!([
            {"_id": 1, "model": "A", "company": "X", "price": 1e25, "qty": 100_000}
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_total_of_largest_lines_does_not_panic() {
        let cart = cart_from(json!([
            {"_id": 1, "model": "A", "company": "X", "price": 1e12, "qty": u32::MAX},
            {"_id": 2, "model": "B", "company": "Y", "price": 1e12, "qty": u32::MAX}
        ]));
        let line = Decimal::from(1_000_000_000_000_u64) * Decimal::from(u32::MAX);
        assert_eq!(cart.total(), line + line);
    }

    #[test]
    fn test_serializes_as_bare_array() {
        let cart = cart_from(json!([
            {"_id": 1, "model": "A", "company": "X", "price": 100, "qty": 1}
        ]));
        let value = serde_json::to_value(&cart).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["_id"], json!(1));
    }
}
