//! Pair-group aggregation: one base/quote pair's positions into a profit summary

use rust_decimal::Decimal;
use tracing::info;

use crate::config::ProfitConfig;
use crate::decimals::truncate;
use crate::metrics;
use crate::summarize::Summarizer;
use crate::types::{PairGroupProfit, Position, Token};
use crate::{ProfitError, ProfitResult};

fn missing_api_data(position: &Position, value: Decimal) -> Decimal {
    if position.has_api_error {
        value
    } else {
        Decimal::ZERO
    }
}

impl PairGroupProfit {
    /// Aggregate the positions of one pair.
    ///
    /// Native profit and fee totals are floored at the quote token's
    /// precision. Positions keep their input order.
    pub fn from_positions(
        base_token: Token,
        quote_token: Token,
        positions: Vec<Position>,
        config: &ProfitConfig,
    ) -> ProfitResult<Self> {
        if positions.is_empty() {
            return Err(ProfitError::EmptyInput {
                what: "pair group positions",
            });
        }

        let decimals = quote_token.decimals;
        let floor = move |value: Decimal| truncate(value, decimals);
        let usd = |value: Option<Decimal>| config.resolve_usd(value);

        let summarizer = Summarizer::<Position, PairGroupProfit>::new()
            .count("positionCount", |t, n| t.position_count = n)
            .sum(
                "positionCountWithApiErrors",
                |p| u64::from(p.has_api_error),
                |t, v| t.position_count_with_api_errors = v,
            )
            .sum(
                "transactionCount",
                |p| p.transaction_count,
                |t, v| t.transaction_count = v,
            )
            .sum("totalDeposits", |p| p.deposit_value, |t, v| t.total_deposits = v)
            .sum_with(
                "totalProfit",
                |p| p.profit_loss_value,
                floor,
                |t, v| t.total_profit = v,
            )
            .sum_with(
                "profitMissingApiData",
                |p| missing_api_data(p, p.profit_loss_value),
                floor,
                |t, v| t.profit_missing_api_data = v,
            )
            .sum_with("totalFees", |p| p.fee_value, floor, |t, v| t.total_fees = v)
            .sum_with(
                "feesMissingApiData",
                |p| missing_api_data(p, p.fee_value),
                floor,
                |t, v| t.fees_missing_api_data = v,
            )
            .sum_with(
                "usdTotalDeposits",
                |p| p.usd_deposit_value,
                usd,
                |t, v| t.usd_total_deposits = v,
            )
            .sum_with(
                "usdTotalProfit",
                |p| p.usd_profit_loss_value,
                usd,
                |t, v| t.usd_total_profit = v,
            )
            .sum_with(
                "usdTotalFees",
                |p| p.usd_fee_value,
                usd,
                |t, v| t.usd_total_fees = v,
            )
            .sum_with(
                "usdTotalRewards",
                |p| p.usd_reward_value,
                usd,
                |t, v| t.usd_total_rewards = v,
            );

        let mut group = PairGroupProfit {
            base_token,
            quote_token,
            ..Default::default()
        };
        summarizer.summarize(&positions, &mut group)?;

        group.divergence_loss =
            metrics::divergence_loss(group.total_profit, group.total_fees, decimals);
        group.usd_divergence_loss = metrics::usd_divergence_loss(
            group.usd_total_profit,
            group.usd_total_fees,
            group.usd_total_rewards,
        );
        group.profit_percent = metrics::profit_percent(group.total_profit, group.total_deposits);
        group.usd_profit_percent =
            metrics::usd_profit_percent(group.usd_total_profit, group.usd_total_deposits);
        group.positions = positions;

        info!(
            base = %group.base_token.symbol,
            quote = %group.quote_token.symbol,
            positions = group.position_count,
            total_profit = %group.total_profit,
            "Pair group aggregated"
        );

        Ok(group)
    }
}
