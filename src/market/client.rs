//! HTTP client for crypto quotes and forex rates.

use std::time::Duration;

use crate::config::MarketConfig;
use crate::market::types::{
    CryptoQuote, ForexRate, LatestRatesResponse, MarketError, SimplePriceResponse,
};

/// Ticker → CoinGecko id for the commonly requested coins.
const COIN_IDS: [(&str, &str); 10] = [
    ("BTC", "bitcoin"),
    ("ETH", "ethereum"),
    ("SOL", "solana"),
    ("XRP", "ripple"),
    ("ADA", "cardano"),
    ("DOGE", "dogecoin"),
    ("DOT", "polkadot"),
    ("AVAX", "avalanche-2"),
    ("MATIC", "matic-network"),
    ("LINK", "chainlink"),
];

/// Resolve a ticker to a CoinGecko id; unknown tickers are passed through
/// lowercased.
pub fn coin_id(symbol: &str) -> String {
    let symbol = symbol.to_uppercase();
    COIN_IDS
        .iter()
        .find(|(ticker, _)| *ticker == symbol)
        .map(|(_, id)| id.to_string())
        .unwrap_or_else(|| symbol.to_lowercase())
}

/// Split a six-letter pair such as `EURUSD` into `("EUR", "USD")`.
pub fn split_pair(symbol: &str) -> Result<(String, String), MarketError> {
    let symbol = symbol.to_uppercase();
    if symbol.len() != 6 || !symbol.is_ascii() {
        return Err(MarketError::InvalidPair(symbol));
    }
    let (base, quote) = symbol.split_at(3);
    Ok((base.to_string(), quote.to_string()))
}

#[derive(Debug, Clone)]
pub struct MarketClient {
    client: reqwest::Client,
    config: MarketConfig,
}

impl MarketClient {
    pub fn new(client: reqwest::Client, config: MarketConfig) -> Self {
        Self { client, config }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    /// USD price and 24h statistics for `symbol`.
    pub async fn crypto_quote(&self, symbol: &str) -> Result<CryptoQuote, MarketError> {
        let id = coin_id(symbol);
        let url = format!(
            "{}/simple/price",
            self.config.crypto_api_url.trim_end_matches('/')
        );

        let prices: SimplePriceResponse = self
            .client
            .get(url)
            .query(&[
                ("ids", id.as_str()),
                ("vs_currencies", "usd"),
                ("include_24hr_change", "true"),
                ("include_24hr_vol", "true"),
                ("include_market_cap", "true"),
            ])
            .timeout(self.timeout())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let price = prices
            .get(&id)
            .ok_or_else(|| MarketError::UnknownCoin(symbol.to_uppercase()))?;

        Ok(CryptoQuote {
            symbol: symbol.to_uppercase(),
            price: price.usd,
            change_24h: price.usd_24h_change,
            volume_24h: price.usd_24h_vol,
            market_cap: price.usd_market_cap,
        })
    }

    /// Exchange rate for a six-letter pair such as `EURUSD`.
    pub async fn forex_rate(&self, symbol: &str) -> Result<ForexRate, MarketError> {
        let (base, quote) = split_pair(symbol)?;
        let url = format!(
            "{}/{}",
            self.config.forex_api_url.trim_end_matches('/'),
            base
        );

        let latest: LatestRatesResponse = self
            .client
            .get(url)
            .timeout(self.timeout())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let rate = *latest
            .rates
            .get(&quote)
            .ok_or_else(|| MarketError::UnknownPair {
                base: base.clone(),
                quote: quote.clone(),
            })?;

        Ok(ForexRate { base, quote, rate })
    }
}
