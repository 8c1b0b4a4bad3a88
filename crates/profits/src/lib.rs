//! Liquidity-pool profit aggregation
//!
//! Rolls per-position profit/loss records up into per-pair summaries and
//! those into per-quote-token summaries.
//! Provides:
//! - Declarative field summarizer with null-aware USD sums
//! - Pair-group aggregation from positions
//! - Quote-token aggregation with a cumulative profit series
//! - Native amount truncation at the quote token's decimal resolution

pub mod config;
pub mod decimals;
pub mod metrics;
pub mod pair_group;
pub mod quote_token;
pub mod summarize;
pub mod types;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfitError {
    #[error("Empty input: {what} must not be empty")]
    EmptyInput { what: &'static str },
}

pub type ProfitResult<T> = Result<T, ProfitError>;

// Re-exports for convenience
pub use config::ProfitConfig;
pub use decimals::{truncate, truncate_to_token};
pub use quote_token::{
    cumulative_profit, group_by_quote_token, CumulativeProfitPoint, QuoteTokenProfit,
    TokenProfitRow,
};
pub use summarize::{Summable, Summarizer, SummaryMethod};
pub use types::*;
