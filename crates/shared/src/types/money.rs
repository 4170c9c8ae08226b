//! Monetary helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount in the system is a `rust_decimal::Decimal`.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Number of decimal places stored for currency amounts.
pub const CURRENCY_PRECISION: u32 = 2;

/// Largest difference between total debit and total credit that still
/// counts as balanced.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Rounds an amount to currency precision using Banker's Rounding.
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_PRECISION, RoundingStrategy::MidpointNearestEven)
}

/// Returns true if two amounts differ by no more than `BALANCE_TOLERANCE`.
#[must_use]
pub fn within_tolerance(left: Decimal, right: Decimal) -> bool {
    left.checked_sub(right).is_some_and(|difference| difference.abs() <= BALANCE_TOLERANCE)
}

/// Computes `base * percent / 100` rounded to currency precision.
///
/// Returns `None` if the product does not fit the decimal range.
#[must_use]
pub fn percentage_of(base: Decimal, percent: Decimal) -> Option<Decimal> {
    base.checked_mul(percent)?
        .checked_div(Decimal::ONE_HUNDRED)
        .map(round_currency)
}
