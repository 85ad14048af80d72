//! Storefront catalogue and order records.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::RangeInclusive;

/// Quantities a single order line may carry.
pub const ORDER_QUANTITY_RANGE: RangeInclusive<u32> = 1..=20;

/// Sequential order identifier.
pub type OrderId = i64;

/// One catalogue product. Products are identified by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    pub image_name: String,
    /// Unit price in the smallest currency unit.
    pub price: i64,
    pub description: String,
    #[serde(default)]
    pub is_favorite: bool,
}

/// A placed order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub product: Product,
    pub quantity: u32,
}

impl Order {
    /// Total price of the line, saturating at the `i64` bounds.
    pub fn price(&self) -> i64 {
        self.product.price.saturating_mul(i64::from(self.quantity))
    }
}

/// Display preferences for the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSetting {
    pub show_favorite_list: bool,
    /// Row height in points.
    pub product_row_height: f64,
}

impl Default for AppSetting {
    fn default() -> Self {
        Self {
            show_favorite_list: true,
            product_row_height: 150.0,
        }
    }
}

/// Order input rejected before touching storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderValidationError {
    QuantityOutOfRange(u32),
}

impl Display for OrderValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuantityOutOfRange(quantity) => write!(
                f,
                "order quantity {quantity} outside {}..={}",
                ORDER_QUANTITY_RANGE.start(),
                ORDER_QUANTITY_RANGE.end()
            ),
        }
    }
}

impl Error for OrderValidationError {}

/// Checks `quantity` against [`ORDER_QUANTITY_RANGE`].
pub fn validate_quantity(quantity: u32) -> Result<(), OrderValidationError> {
    if ORDER_QUANTITY_RANGE.contains(&quantity) {
        Ok(())
    } else {
        Err(OrderValidationError::QuantityOutOfRange(quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_quantity, Order, OrderValidationError, Product};

    fn fig() -> Product {
        Product {
            name: "Fig".to_string(),
            image_name: "fig".to_string(),
            price: 3100,
            description: "Sweet domestic figs.".to_string(),
            is_favorite: false,
        }
    }

    #[test]
    fn order_price_multiplies_quantity() {
        let order = Order {
            id: 1,
            product: fig(),
            quantity: 3,
        };
        assert_eq!(order.price(), 9300);
    }

    #[test]
    fn order_price_saturates_instead_of_overflowing() {
        let mut product = fig();
        product.price = i64::MAX / 2;
        let order = Order {
            id: 1,
            product,
            quantity: 3,
        };
        assert_eq!(order.price(), i64::MAX);
    }

    #[test]
    fn product_decodes_without_favorite_flag() {
        let product: Product = serde_json::from_str(
            r#"{"name":"Fig","imageName":"fig","price":3100,"description":"Sweet domestic figs."}"#,
        )
        .unwrap();
        assert_eq!(product, fig());
    }

    #[test]
    fn quantity_bounds_are_inclusive() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(20).is_ok());
        assert_eq!(
            validate_quantity(0),
            Err(OrderValidationError::QuantityOutOfRange(0))
        );
        assert!(validate_quantity(21).is_err());
    }
}
