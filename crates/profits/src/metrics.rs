//! Metrics derived from summed profit totals
//!
//! Shared by the pair-group and quote-token aggregators so both levels agree.
//! Profit is carried with the sign convention of the position records, where
//! negating it yields the human-readable return.

use rust_decimal::Decimal;

use crate::decimals::truncate;
use crate::summarize::Summable;

/// Impermanent loss in native units: profit minus fees, floored at `decimals`.
pub fn divergence_loss(total_profit: Decimal, total_fees: Decimal, decimals: u32) -> Decimal {
    truncate(total_profit - total_fees, decimals)
}

/// Impermanent loss in USD: profit minus fees minus rewards.
///
/// Missing operands count as zero; the result is `None` only when all three
/// are missing.
pub fn usd_divergence_loss(
    usd_total_profit: Option<Decimal>,
    usd_total_fees: Option<Decimal>,
    usd_total_rewards: Option<Decimal>,
) -> Option<Decimal> {
    usd_total_profit
        .combine(usd_total_fees.map(|fees| -fees))
        .combine(usd_total_rewards.map(|rewards| -rewards))
}

/// Return on deposits, `-profit / deposits`. `None` when deposits are zero.
pub fn profit_percent(total_profit: Decimal, total_deposits: Decimal) -> Option<Decimal> {
    (-total_profit).checked_div(total_deposits)
}

/// USD return on deposits.
///
/// `None` unless both operands are present and non-zero. A genuine zero is
/// indistinguishable from missing data here.
pub fn usd_profit_percent(
    usd_total_profit: Option<Decimal>,
    usd_total_deposits: Option<Decimal>,
) -> Option<Decimal> {
    match (usd_total_profit, usd_total_deposits) {
        (Some(profit), Some(deposits)) if !profit.is_zero() && !deposits.is_zero() => {
            (-profit).checked_div(deposits)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_divergence_loss_floors() {
        assert_eq!(divergence_loss(dec!(-1), dec!(0.0051), 2), dec!(-1.01));
        assert_eq!(divergence_loss(dec!(-15), dec!(3), 6), dec!(-18));
    }

    #[test]
    fn test_usd_divergence_loss() {
        assert_eq!(
            usd_divergence_loss(Some(dec!(10)), Some(dec!(2)), Some(dec!(0.5))),
            Some(dec!(7.5))
        );
        assert_eq!(
            usd_divergence_loss(Some(dec!(10)), None, Some(dec!(1))),
            Some(dec!(9))
        );
        assert_eq!(
            usd_divergence_loss(None, Some(dec!(2)), None),
            Some(dec!(-2))
        );
        assert_eq!(usd_divergence_loss(None, None, None), None);
    }

    #[test]
    fn test_profit_percent_sign() {
        assert_eq!(profit_percent(dec!(-15), dec!(100)), Some(dec!(0.15)));
        assert_eq!(profit_percent(dec!(5), dec!(50)), Some(dec!(-0.1)));
    }

    #[test]
    fn test_profit_percent_zero_deposits() {
        assert_eq!(profit_percent(dec!(-15), Decimal::ZERO), None);
    }

    #[test]
    fn test_usd_profit_percent_requires_non_zero_operands() {
        assert_eq!(
            usd_profit_percent(Some(dec!(-20)), Some(dec!(200))),
            Some(dec!(0.1))
        );
        assert_eq!(usd_profit_percent(None, Some(dec!(200))), None);
        assert_eq!(usd_profit_percent(Some(dec!(-20)), None), None);
        assert_eq!(usd_profit_percent(Some(Decimal::ZERO), Some(dec!(200))), None);
        assert_eq!(usd_profit_percent(Some(dec!(-20)), Some(Decimal::ZERO)), None);
    }
}
