//! Tool catalogue and result rendering.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::json;

use crate::market::{CryptoQuote, ForexRate};
use crate::mcp::protocol::Tool;
use crate::risk::{Direction, PositionPlan, PositionRequest, RewardRating};
use crate::verdict::{self, Emphasis};

pub const ANALYZE_TRADE: &str = "analyze_trade";
pub const CALCULATE_RISK: &str = "calculate_risk";
pub const SUBSCRIBE_EMAIL: &str = "subscribe_email";
pub const FETCH_MARKET_DATA: &str = "fetch_market_data";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Format check applied by the `subscribe_email` tool.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeArgs {
    #[serde(default)]
    pub input: String,
}

#[derive(Debug, Deserialize)]
pub struct SubscribeArgs {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct MarketArgs {
    pub symbol: String,
    #[serde(rename = "type")]
    pub kind: String,
}

pub fn catalogue() -> Vec<Tool> {
    vec![
        Tool {
            name: ANALYZE_TRADE,
            description: "Analyze a trading decision or market news using AI. Returns APPROVED or REJECTED verdict with professional explanation.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "input": {
                        "type": "string",
                        "description": "Trade rationale or market news to analyze"
                    }
                },
                "required": ["input"]
            }),
        },
        Tool {
            name: CALCULATE_RISK,
            description: "Calculate position size based on account size, risk percentage, entry price, and stop loss.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "accountSize": { "type": "number", "description": "Total account balance in USD" },
                    "riskPercent": { "type": "number", "description": "Risk percentage per trade (0.5 to 5)" },
                    "entryPrice": { "type": "number", "description": "Entry price for the trade" },
                    "stopLoss": { "type": "number", "description": "Stop loss price" },
                    "takeProfit": { "type": "number", "description": "Take profit price (optional)" }
                },
                "required": ["accountSize", "riskPercent", "entryPrice", "stopLoss"]
            }),
        },
        Tool {
            name: SUBSCRIBE_EMAIL,
            description: "Subscribe an email address to the MBridge newsletter.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "email": { "type": "string", "description": "Email address to subscribe" }
                },
                "required": ["email"]
            }),
        },
        Tool {
            name: FETCH_MARKET_DATA,
            description: "Get real-time market data for crypto or forex pairs.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "symbol": {
                        "type": "string",
                        "description": "Trading symbol (e.g., BTC, ETH, EURUSD, GBPUSD)"
                    },
                    "type": {
                        "type": "string",
                        "enum": ["crypto", "forex"],
                        "description": "Market type: 'crypto' or 'forex'"
                    }
                },
                "required": ["symbol", "type"]
            }),
        },
    ]
}

pub fn render_analysis(text: Option<&str>) -> String {
    let text = text.map_or_else(|| "No response".to_string(), |t| {
        verdict::emphasize(t, Emphasis::Markdown)
    });
    format!("**Trade Analysis**\n\n{text}")
}

pub fn render_position(request: &PositionRequest, plan: &PositionPlan) -> String {
    let direction = match plan.direction {
        Direction::Long => "LONG",
        Direction::Short => "SHORT",
    };

    let mut out = format!(
        "**Position Size Calculator**\n\n\
         **Direction:** {direction}\n\
         **Account Size:** ${:.2}\n\
         **Risk Per Trade:** {}% (${:.2})\n\n\
         **Entry Price:** {}\n\
         **Stop Loss:** {}\n\
         **Stop Distance:** {:.5}\n\n\
         **Position Size:** {:.4} units",
        request.account_size,
        request.risk_percent,
        plan.dollar_risk,
        request.entry_price,
        request.stop_loss,
        plan.stop_distance,
        plan.position_size,
    );

    if let Some(reward) = plan.reward {
        let rating = match reward.rating {
            RewardRating::Good => "Good",
            RewardRating::Acceptable => "Acceptable",
            RewardRating::Poor => "Poor",
        };
        out.push_str(&format!(
            "\n**Risk:Reward Ratio:** 1:{:.2} ({rating})",
            reward.ratio
        ));
    }

    out.push_str(
        "\n\n---\n*Always use proper risk management. Never risk more than you can afford to lose.*",
    );
    out
}

pub fn render_crypto(quote: &CryptoQuote) -> String {
    format!(
        "**{}/USD Market Data**\n\n\
         **Price:** ${:.2}\n\
         **24h Change:** {:+.2}%\n\
         **24h Volume:** ${:.0}\n\
         **Market Cap:** ${:.0}\n\n\
         _Data from CoinGecko_",
        quote.symbol, quote.price, quote.change_24h, quote.volume_24h, quote.market_cap
    )
}

pub fn render_forex(rate: &ForexRate) -> String {
    format!(
        "**{base}/{quote} Exchange Rate**\n\n\
         **Rate:** {:.5}\n\
         **Base Currency:** {base}\n\
         **Quote Currency:** {quote}\n\n\
         _Data from ExchangeRate-API_",
        rate.rate,
        base = rate.base,
        quote = rate.quote,
    )
}
