//! Market data types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketKind {
    Crypto,
    Forex,
}

impl std::str::FromStr for MarketKind {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "crypto" => Ok(MarketKind::Crypto),
            "forex" => Ok(MarketKind::Forex),
            _ => Err(MarketError::UnknownMarket(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("Invalid market type '{0}'. Use 'crypto' or 'forex'.")]
    UnknownMarket(String),

    #[error("Cryptocurrency '{0}' not found.")]
    UnknownCoin(String),

    #[error("Forex symbol must be 6 characters (e.g., EURUSD, GBPUSD)")]
    InvalidPair(String),

    #[error("Currency pair {base}/{quote} not found.")]
    UnknownPair { base: String, quote: String },

    #[error("API error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Spot price and 24h statistics for a coin, quoted in USD.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CryptoQuote {
    pub symbol: String,
    pub price: f64,
    pub change_24h: f64,
    pub volume_24h: f64,
    pub market_cap: f64,
}

/// Exchange rate for one currency pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForexRate {
    pub base: String,
    pub quote: String,
    pub rate: f64,
}

/// `/simple/price` response, keyed by coin id.
pub(crate) type SimplePriceResponse = HashMap<String, SimplePrice>;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SimplePrice {
    pub usd: f64,
    pub usd_24h_change: f64,
    pub usd_24h_vol: f64,
    pub usd_market_cap: f64,
}

/// `/latest/{base}` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct LatestRatesResponse {
    #[serde(default)]
    pub rates: HashMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_kind_parse() {
        assert_eq!("crypto".parse::<MarketKind>().unwrap(), MarketKind::Crypto);
        assert_eq!("FOREX".parse::<MarketKind>().unwrap(), MarketKind::Forex);
        assert!(matches!(
            "stocks".parse::<MarketKind>(),
            Err(MarketError::UnknownMarket(_))
        ));
    }

    #[test]
    fn test_simple_price_partial_fields() {
        let parsed: SimplePriceResponse =
            serde_json::from_str(r#"{"bitcoin":{"usd":64000.5}}"#).unwrap();
        let btc = &parsed["bitcoin"];
        assert_eq!(btc.usd, 64000.5);
        assert_eq!(btc.usd_24h_change, 0.0);
    }
}
