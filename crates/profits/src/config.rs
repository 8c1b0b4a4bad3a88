//! Aggregation settings

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Settings shared by the pair-group and quote-token aggregators
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfitConfig {
    /// Report a USD total as 0 instead of null when no record carries USD data
    /// (default false)
    pub usd_missing_as_zero: bool,
}

impl ProfitConfig {
    /// Resolve a summed USD total that no record contributed to.
    pub fn resolve_usd(&self, total: Option<Decimal>) -> Option<Decimal> {
        match total {
            None if self.usd_missing_as_zero => Some(Decimal::ZERO),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_keeps_missing_usd_null() {
        assert!(!ProfitConfig::default().usd_missing_as_zero);
    }

    #[test]
    fn test_resolve_usd() {
        let strict = ProfitConfig::default();
        let lenient = ProfitConfig {
            usd_missing_as_zero: true,
        };

        assert_eq!(strict.resolve_usd(None), None);
        assert_eq!(lenient.resolve_usd(None), Some(Decimal::ZERO));
        assert_eq!(lenient.resolve_usd(Some(dec!(2.5))), Some(dec!(2.5)));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ProfitConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ProfitConfig::default());

        let config: ProfitConfig =
            serde_json::from_str(r#"{"usd_missing_as_zero": true}"#).unwrap();
        assert!(config.usd_missing_as_zero);
    }
}
