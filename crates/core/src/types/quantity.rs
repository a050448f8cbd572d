//! Quantity input policy derived from a product's unit and stock.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use super::{Product, Unit};

/// Errors produced when a quantity breaks the input policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    /// The quantity is not positive or exceeds the cached stock.
    #[error("quantity {quantity} is out of range (must be greater than 0 and at most {max})")]
    OutOfRange { quantity: Decimal, max: Decimal },

    /// The quantity is not a multiple of the unit's step.
    #[error("quantity {quantity} must be a multiple of {step}")]
    InvalidIncrement { quantity: Decimal, step: Decimal },
}

/// The constraints a quantity field should enforce for one product.
///
/// Weighed products (`kg`) accept one decimal place, everything else whole
/// counts. `max` is the stock quantity captured when the product was fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuantityPolicy {
    pub step: Decimal,
    pub max: Decimal,
    pub default_value: Decimal,
}

impl QuantityPolicy {
    /// Step for weighed units.
    pub const WEIGHT_STEP: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

    /// Derive the policy for a freshly fetched product.
    #[must_use]
    pub fn for_product(product: &Product) -> Self {
        Self {
            step: Self::step_for(&product.unit),
            max: product.stock_quantity,
            default_value: Decimal::ONE,
        }
    }

    /// Input step for a unit.
    #[must_use]
    pub const fn step_for(unit: &Unit) -> Decimal {
        if unit.is_weight() {
            Self::WEIGHT_STEP
        } else {
            Decimal::ONE
        }
    }

    /// Check a clerk-entered quantity against the policy.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::OutOfRange`] when `quantity <= 0` or
    /// `quantity > max`, and [`QuantityError::InvalidIncrement`] when the
    /// quantity is in range but finer than the step allows.
    pub fn validate(&self, quantity: Decimal) -> Result<(), QuantityError> {
        if quantity <= Decimal::ZERO || quantity > self.max {
            return Err(QuantityError::OutOfRange {
                quantity,
                max: self.max,
            });
        }

        // Steps are powers of ten, so a multiple of the step never carries
        // more decimal places than the step itself.
        if quantity.normalize().scale() > self.step.normalize().scale() {
            return Err(QuantityError::InvalidIncrement {
                quantity,
                step: self.step,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ProductId;

    fn product(unit: &str, stock: Decimal) -> Product {
        Product {
            product_id: ProductId::new(1),
            name: "Test".to_string(),
            price: Decimal::TEN,
            unit: Unit::from(unit),
            stock_quantity: stock,
        }
    }

    #[test]
    fn test_weight_step_is_one_tenth() {
        assert_eq!(QuantityPolicy::WEIGHT_STEP, Decimal::new(1, 1));
    }

    #[test]
    fn test_policy_for_kg() {
        let policy = QuantityPolicy::for_product(&product("kg", Decimal::new(50, 0)));
        assert_eq!(policy.step, Decimal::new(1, 1));
        assert_eq!(policy.max, Decimal::new(50, 0));
        assert_eq!(policy.default_value, Decimal::ONE);
    }

    #[test]
    fn test_policy_for_counted_units() {
        for unit in ["unit", "units", "liters"] {
            let policy = QuantityPolicy::for_product(&product(unit, Decimal::new(5, 0)));
            assert_eq!(policy.step, Decimal::ONE, "unit {unit}");
        }
    }

    #[test]
    fn test_validate_bounds() {
        let policy = QuantityPolicy::for_product(&product("kg", Decimal::new(50, 0)));

        assert!(matches!(
            policy.validate(Decimal::ZERO),
            Err(QuantityError::OutOfRange { .. })
        ));
        assert!(matches!(
            policy.validate(Decimal::new(-1, 0)),
            Err(QuantityError::OutOfRange { .. })
        ));
        assert!(matches!(
            policy.validate(Decimal::new(501, 1)),
            Err(QuantityError::OutOfRange { .. })
        ));
        assert!(policy.validate(Decimal::new(50, 0)).is_ok());
    }

    #[test]
    fn test_validate_kg_accepts_one_decimal() {
        let policy = QuantityPolicy::for_product(&product("kg", Decimal::new(50, 0)));

        assert!(policy.validate(Decimal::new(25, 1)).is_ok());
        assert!(policy.validate(Decimal::new(1, 1)).is_ok());
        assert_eq!(
            policy.validate(Decimal::new(125, 2)),
            Err(QuantityError::InvalidIncrement {
                quantity: Decimal::new(125, 2),
                step: Decimal::new(1, 1),
            })
        );
    }

    #[test]
    fn test_validate_huge_weighed_stock() {
        let stock = Decimal::from_i128_with_scale(70_000_000_000_000_000_000_000_000_000, 0);
        let policy = QuantityPolicy::for_product(&product("kg", stock));

        assert!(policy.validate(stock).is_ok());
        assert!(policy.validate(Decimal::MAX).is_err());
        assert!(policy.validate(Decimal::new(25, 1)).is_ok());
        assert!(matches!(
            policy.validate(Decimal::new(125, 2)),
            Err(QuantityError::InvalidIncrement { .. })
        ));
    }

    #[test]
    fn test_validate_counted_units_require_integers() {
        let policy = QuantityPolicy::for_product(&product("units", Decimal::new(10, 0)));

        assert!(policy.validate(Decimal::new(3, 0)).is_ok());
        // Trailing zeros are still a whole count.
        assert!(policy.validate(Decimal::new(30, 1)).is_ok());
        assert!(matches!(
            policy.validate(Decimal::new(15, 1)),
            Err(QuantityError::InvalidIncrement { .. })
        ));
    }

    #[test]
    fn test_out_of_range_takes_precedence_over_increment() {
        let policy = QuantityPolicy::for_product(&product("units", Decimal::new(10, 0)));
        assert!(matches!(
            policy.validate(Decimal::new(105, 1)),
            Err(QuantityError::OutOfRange { .. })
        ));
    }
}
