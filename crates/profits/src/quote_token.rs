//! Quote-token aggregation
//!
//! Rolls every pair group that shares a quote token into a single summary,
//! alongside a cumulative profit series ordered by close/claim time and one
//! report row per pair group.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ProfitConfig;
use crate::decimals::truncate;
use crate::metrics;
use crate::summarize::Summarizer;
use crate::types::{PairGroupProfit, Position, Token};
use crate::{ProfitError, ProfitResult};

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// One point of the running profit total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeProfitPoint {
    /// Close or claim time of the position, epoch milliseconds
    #[serde(rename = "Close/Claim Date")]
    pub close_claim_date: i64,
    #[serde(rename = "Cumulative Profit")]
    pub cumulative_profit: Decimal,
    #[serde(rename = "Cumulative Profit in USD")]
    pub cumulative_profit_usd: Decimal,
}

impl CumulativeProfitPoint {
    pub fn close_date(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.close_claim_date)
    }
}

/// Per-pair report row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenProfitRow {
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Quote Symbol")]
    pub quote_symbol: String,
    #[serde(rename = "Fees")]
    pub fees: Decimal,
    #[serde(rename = "Fees in USD")]
    pub fees_usd: Option<Decimal>,
    #[serde(rename = "Rewards in USD")]
    pub rewards_usd: Option<Decimal>,
    #[serde(rename = "Impermanent Loss")]
    pub impermanent_loss: Decimal,
    #[serde(rename = "Total Deposits")]
    pub total_deposits: Decimal,
    #[serde(rename = "Impermanent Loss in USD")]
    pub impermanent_loss_usd: Option<Decimal>,
    #[serde(rename = "Total Deposits in USD")]
    pub total_deposits_usd: Option<Decimal>,
    #[serde(rename = "Total Profit")]
    pub total_profit: Decimal,
    #[serde(rename = "Total Profit Percent")]
    pub total_profit_percent: Option<Decimal>,
    #[serde(rename = "Total Profit in USD")]
    pub total_profit_usd: Option<Decimal>,
    #[serde(rename = "USD Total Profit Percent")]
    pub usd_total_profit_percent: Option<Decimal>,
}

impl From<&PairGroupProfit> for TokenProfitRow {
    fn from(group: &PairGroupProfit) -> Self {
        Self {
            symbol: group.base_token.symbol.clone(),
            quote_symbol: group.quote_token.symbol.clone(),
            fees: group.total_fees,
            fees_usd: group.usd_total_fees,
            rewards_usd: group.usd_total_rewards,
            impermanent_loss: group.divergence_loss,
            total_deposits: group.total_deposits,
            impermanent_loss_usd: group.usd_divergence_loss,
            total_deposits_usd: group.usd_total_deposits,
            total_profit: group.total_profit,
            total_profit_percent: group.profit_percent,
            total_profit_usd: group.usd_total_profit,
            usd_total_profit_percent: group.usd_profit_percent,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Profit summary over every pair group denominated in one quote token
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteTokenProfit {
    pub quote_token: Token,
    /// Sorted by `total_profit`, highest first
    pub pair_group_profits: Vec<PairGroupProfit>,
    pub pair_group_count: usize,
    pub position_count: u64,
    pub position_count_with_api_errors: u64,
    pub transaction_count: u64,
    pub total_deposits: Decimal,
    pub total_profit: Decimal,
    pub profit_missing_api_data: Decimal,
    pub total_fees: Decimal,
    pub fees_missing_api_data: Decimal,
    pub usd_total_deposits: Option<Decimal>,
    pub usd_total_profit: Option<Decimal>,
    pub usd_total_fees: Option<Decimal>,
    pub usd_total_rewards: Option<Decimal>,
    pub divergence_loss: Decimal,
    pub usd_divergence_loss: Option<Decimal>,
    /// `None` when there are no deposits
    pub profit_percent: Option<Decimal>,
    pub usd_profit_percent: Option<Decimal>,
    /// Ascending by close/claim date
    pub cumulative_profit: Vec<CumulativeProfitPoint>,
    /// One row per pair group, in `pair_group_profits` order
    pub token_profit: Vec<TokenProfitRow>,
}

impl QuoteTokenProfit {
    /// Aggregate pair groups sharing one quote token with the default config.
    pub fn new(pair_group_profits: Vec<PairGroupProfit>) -> ProfitResult<Self> {
        Self::with_config(pair_group_profits, &ProfitConfig::default())
    }

    /// Aggregate pair groups sharing one quote token.
    ///
    /// The quote token is taken from the first group; callers guarantee the
    /// rest match (see [`group_by_quote_token`]). Fails on empty input.
    pub fn with_config(
        mut pair_group_profits: Vec<PairGroupProfit>,
        config: &ProfitConfig,
    ) -> ProfitResult<Self> {
        let quote_token = match pair_group_profits.first() {
            Some(group) => group.quote_token.clone(),
            None => {
                return Err(ProfitError::EmptyInput {
                    what: "quote token pair groups",
                })
            }
        };

        // stable: equal profits keep their input order
        pair_group_profits.sort_by(|a, b| b.total_profit.cmp(&a.total_profit));

        let decimals = quote_token.decimals;
        let floor = move |value: Decimal| truncate(value, decimals);
        let usd = |value: Option<Decimal>| config.resolve_usd(value);

        let summarizer = Summarizer::<PairGroupProfit, QuoteTokenProfit>::new()
            .count("pairGroupCount", |t, n| t.pair_group_count = n)
            .sum("positionCount", |g| g.position_count, |t, v| t.position_count = v)
            .sum(
                "positionCountWithApiErrors",
                |g| g.position_count_with_api_errors,
                |t, v| t.position_count_with_api_errors = v,
            )
            .sum(
                "transactionCount",
                |g| g.transaction_count,
                |t, v| t.transaction_count = v,
            )
            .sum("totalDeposits", |g| g.total_deposits, |t, v| t.total_deposits = v)
            .sum_with(
                "totalProfit",
                |g| g.total_profit,
                floor,
                |t, v| t.total_profit = v,
            )
            .sum_with(
                "profitMissingApiData",
                |g| g.profit_missing_api_data,
                floor,
                |t, v| t.profit_missing_api_data = v,
            )
            .sum_with("totalFees", |g| g.total_fees, floor, |t, v| t.total_fees = v)
            .sum_with(
                "feesMissingApiData",
                |g| g.fees_missing_api_data,
                floor,
                |t, v| t.fees_missing_api_data = v,
            )
            .sum_with(
                "usdTotalDeposits",
                |g| g.usd_total_deposits,
                usd,
                |t, v| t.usd_total_deposits = v,
            )
            .sum_with(
                "usdTotalProfit",
                |g| g.usd_total_profit,
                usd,
                |t, v| t.usd_total_profit = v,
            )
            .sum_with(
                "usdTotalFees",
                |g| g.usd_total_fees,
                usd,
                |t, v| t.usd_total_fees = v,
            )
            .sum_with(
                "usdTotalRewards",
                |g| g.usd_total_rewards,
                usd,
                |t, v| t.usd_total_rewards = v,
            );

        let mut profit = QuoteTokenProfit {
            quote_token,
            ..Default::default()
        };
        summarizer.summarize(&pair_group_profits, &mut profit)?;

        profit.divergence_loss =
            metrics::divergence_loss(profit.total_profit, profit.total_fees, decimals);
        profit.usd_divergence_loss = metrics::usd_divergence_loss(
            profit.usd_total_profit,
            profit.usd_total_fees,
            profit.usd_total_rewards,
        );
        profit.profit_percent = metrics::profit_percent(profit.total_profit, profit.total_deposits);
        profit.usd_profit_percent =
            metrics::usd_profit_percent(profit.usd_total_profit, profit.usd_total_deposits);

        profit.cumulative_profit = cumulative_profit(&pair_group_profits, decimals);
        profit.token_profit = pair_group_profits.iter().map(TokenProfitRow::from).collect();
        profit.pair_group_profits = pair_group_profits;

        info!(
            quote = %profit.quote_token.symbol,
            pair_groups = profit.pair_group_count,
            positions = profit.position_count,
            total_profit = %profit.total_profit,
            usd_total_profit = ?profit.usd_total_profit,
            "Quote token profit aggregated"
        );

        Ok(profit)
    }
}

/// Running profit total over every position of `pair_groups`, oldest first.
///
/// Positions with equal timestamps keep pair-group order, then their order
/// within the group. The first point carries the first position's own value;
/// each later native total is floored at `decimals`. USD values are never
/// truncated and a missing USD value counts as zero.
pub fn cumulative_profit(
    pair_groups: &[PairGroupProfit],
    decimals: u32,
) -> Vec<CumulativeProfitPoint> {
    let mut positions: Vec<&Position> = pair_groups
        .iter()
        .flat_map(|group| group.positions.iter())
        .collect();
    positions.sort_by_key(|position| position.close_timestamp_ms);

    let mut series: Vec<CumulativeProfitPoint> = Vec::with_capacity(positions.len());
    for position in positions {
        let usd = position.usd_profit_loss_value.unwrap_or(Decimal::ZERO);
        let (native_total, usd_total) = match series.last() {
            None => (position.profit_loss_value, usd),
            Some(previous) => (
                truncate(previous.cumulative_profit + position.profit_loss_value, decimals),
                previous.cumulative_profit_usd + usd,
            ),
        };

        series.push(CumulativeProfitPoint {
            close_claim_date: position.close_timestamp_ms,
            cumulative_profit: native_total,
            cumulative_profit_usd: usd_total,
        });
    }

    debug!(points = series.len(), "Built cumulative profit series");
    series
}

/// Partition pair groups by quote token and aggregate each partition.
///
/// Quote tokens appear in the order they are first seen; groups keep their
/// input order within a partition before sorting.
pub fn group_by_quote_token(
    pair_groups: Vec<PairGroupProfit>,
    config: &ProfitConfig,
) -> ProfitResult<Vec<QuoteTokenProfit>> {
    let mut order: Vec<String> = Vec::new();
    let mut by_quote: HashMap<String, Vec<PairGroupProfit>> = HashMap::new();

    for group in pair_groups {
        let address = group.quote_token.address.clone();
        by_quote
            .entry(address.clone())
            .or_insert_with(|| {
                order.push(address);
                Vec::new()
            })
            .push(group);
    }

    debug!(quote_tokens = order.len(), "Grouped pair groups by quote token");

    order
        .into_iter()
        .filter_map(|address| by_quote.remove(&address))
        .map(|groups| QuoteTokenProfit::with_config(groups, config))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
