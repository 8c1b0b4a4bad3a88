//! Data contracts consumed by the aggregators

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Token metadata as resolved from a token list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Mint address, the token's identity
    pub address: String,
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Native decimal resolution (e.g. 6 for USDC, 9 for SOL)
    pub decimals: u32,
}

/// A closed or claimed liquidity position
///
/// Profit values are denominated in the quote token of the pair. Only
/// `close_timestamp_ms`, `profit_loss_value` and `usd_profit_loss_value` are
/// needed at the quote-token level; the remaining amounts feed
/// [`PairGroupProfit::from_positions`](crate::PairGroupProfit::from_positions).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(default)]
    pub position_address: String,
    pub close_timestamp_ms: i64,
    pub profit_loss_value: Decimal,
    #[serde(default)]
    pub usd_profit_loss_value: Option<Decimal>,
    #[serde(default)]
    pub transaction_count: u64,
    /// Set when price or transaction data could not be fetched for this position
    #[serde(default)]
    pub has_api_error: bool,
    #[serde(default)]
    pub deposit_value: Decimal,
    #[serde(default)]
    pub fee_value: Decimal,
    #[serde(default)]
    pub usd_deposit_value: Option<Decimal>,
    #[serde(default)]
    pub usd_fee_value: Option<Decimal>,
    #[serde(default)]
    pub usd_reward_value: Option<Decimal>,
}

/// Profit summary over all positions of one base/quote pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairGroupProfit {
    pub base_token: Token,
    pub quote_token: Token,
    pub positions: Vec<Position>,
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
    /// `None` when the group has no deposits
    pub profit_percent: Option<Decimal>,
    pub usd_profit_percent: Option<Decimal>,
}
