//! Product (mobile) records as served by the mobiles API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Price, ProductId};

/// A catalog product.
///
/// The same record shape is used for catalog entries and cart lines; `qty` is
/// the quantity currently in the cart and is zero for products that are not
/// in it. Fields this type does not model are kept in `extra` so that a record
/// sent back to the API matches what the API sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Server-assigned identifier.
    #[serde(rename = "_id")]
    pub id: ProductId,
    /// Display name, e.g. "iPhone 13 mini".
    pub model: String,
    /// Manufacturer.
    pub company: String,
    /// Unit price.
    pub price: Price,
    /// Image URL.
    #[serde(default)]
    pub img: String,
    /// Quantity in the cart.
    #[serde(default)]
    pub qty: u32,
    /// Unmodelled fields, echoed back verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Whether the product currently has units in the cart.
    #[must_use]
    pub const fn in_cart(&self) -> bool {
        self.qty > 0
    }

    /// `qty × price`.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.price.times(self.qty)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_api_record() {
        let product: Product = serde_json::from_value(json!({
            "_id": "64b7f0c2e4a1b2c3d4e5f601",
            "model": "OnePlus 9 5G",
            "img": "https://example.com/oneplus9.jpg",
            "company": "Oneplus",
            "price": 41_999,
            "qty": 3
        }))
        .unwrap();

        assert_eq!(product.id, ProductId::from("64b7f0c2e4a1b2c3d4e5f601"));
        assert_eq!(product.model, "OnePlus 9 5G");
        assert_eq!(product.qty, 3);
        assert_eq!(product.subtotal(), Decimal::from(125_997));
        assert!(product.extra.is_empty());
    }

    #[test]
    fn test_missing_qty_defaults_to_zero() {
        let product: Product = serde_json::from_value(json!({
            "_id": 1,
            "model": "Galaxy S21",
            "company": "Samsung",
            "price": 25_000
        }))
        .unwrap();

        assert_eq!(product.qty, 0);
        assert!(!product.in_cart());
        assert_eq!(product.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn test_negative_qty_is_rejected() {
        let result = serde_json::from_value::<Product>(json!({
            "_id": 1,
            "model": "Galaxy S21",
            "company": "Samsung",
            "price": 25_000,
            "qty": -1
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let original = json!({
            "_id": 9,
            "model": "Pixel 6",
            "company": "Google",
            "price": 59_999,
            "img": "pixel.png",
            "qty": 1,
            "rating": 4.5
        });
        let product: Product = serde_json::from_value(original).unwrap();
        assert_eq!(product.extra.get("rating"), Some(&json!(4.5)));

        let echoed = serde_json::to_value(&product).unwrap();
        assert_eq!(echoed["_id"], json!(9));
        assert_eq!(echoed["rating"], json!(4.5));
        assert_eq!(echoed["qty"], json!(1));
    }
}
