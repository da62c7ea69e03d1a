//! Money calculation utilities using rust_decimal for precision
//!
//! Prices travel as `f64`; sums and the deposit are computed in `Decimal`
//! and converted back.

use rust_decimal::prelude::*;
use shared::models::MenuSelection;

/// Rounding for line totals (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(
            value = ?value,
            "Non-finite f64 in monetary calculation, defaulting to zero"
        );
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Sum of `price * quantity` over the pre-ordered dishes; `None` on overflow
pub fn subtotal(items: &[MenuSelection]) -> Option<Decimal> {
    items.iter().try_fold(Decimal::ZERO, |total, item| {
        let line = to_decimal(item.price).checked_mul(Decimal::from(item.quantity))?;
        total.checked_add(line)
    })
}

/// Deposit for a subtotal, rounded to whole currency units; `None` on overflow
pub fn deposit_amount(subtotal: Decimal, rate: f64) -> Option<Decimal> {
    let rate = to_decimal(rate.clamp(0.0, 1.0));
    subtotal
        .checked_mul(rate)
        .map(|d| d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dish(id: &str, price: f64, quantity: u32) -> MenuSelection {
        MenuSelection {
            dish_id: id.into(),
            name: id.into(),
            price,
            quantity,
            image: None,
            category: None,
            note: None,
        }
    }

    #[test]
    fn test_subtotal_avoids_float_drift() {
        let items = vec![dish("a", 0.1, 3), dish("b", 0.2, 1)];
        assert_eq!(to_f64(subtotal(&items).unwrap()), 0.5);
    }

    #[test]
    fn test_deposit_rounding() {
        let items = vec![dish("pho", 55000.0, 2), dish("tea", 15000.0, 1)];
        let total = subtotal(&items).unwrap();
        assert_eq!(total, Decimal::from(125000));
        assert_eq!(deposit_amount(total, 0.3), Some(Decimal::from(37500)));
        assert_eq!(deposit_amount(Decimal::from(5), 0.3), Some(Decimal::from(2)));
        assert_eq!(deposit_amount(total, 2.0), Some(total));
    }

    #[test]
    fn test_subtotal_overflow_is_none() {
        assert_eq!(subtotal(&[dish("a", 1e20, u32::MAX)]), None);
        let lines: Vec<_> = (0..3).map(|_| dish("a", 3e28, 1)).collect();
        assert_eq!(subtotal(&lines), None);
        assert_eq!(subtotal(&[]), Some(Decimal::ZERO));
    }

    #[test]
    fn test_non_finite_price_counts_as_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
    }
}
