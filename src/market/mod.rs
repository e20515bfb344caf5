//! Market data lookups backing the `fetch_market_data` tool.
//!
//! Crypto prices come from a CoinGecko-compatible API, forex rates from an
//! ExchangeRate-API-compatible one. Each lookup is a single GET.

pub mod client;
pub mod types;

pub use client::MarketClient;
pub use types::{CryptoQuote, ForexRate, MarketError, MarketKind};
