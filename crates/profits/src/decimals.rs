//! Truncation of native-token amounts to the token's decimal resolution
//!
//! Native amounts are floored at the token's precision:
//! truncate(x, d) = floor(x × 10^d) / 10^d
//! Negative values move toward negative infinity, so -1.005 at 2 decimals
//! becomes -1.01, not -1.00.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::Token;

/// Floor `value` to `decimals` fractional digits.
///
/// Values that already carry no more than `decimals` digits are returned
/// unchanged. Precision beyond 28 digits is not representable by `Decimal`
/// and is left as-is.
pub fn truncate(value: Decimal, decimals: u32) -> Decimal {
    // Equivalent to (value * 10^d).floor() / 10^d without the intermediate
    // multiplication overflowing for large `d`.
    value.round_dp_with_strategy(decimals, RoundingStrategy::ToNegativeInfinity)
}

/// Floor `value` to the native resolution of `token`.
pub fn truncate_to_token(value: Decimal, token: &Token) -> Decimal {
    truncate(value, token.decimals)
}
