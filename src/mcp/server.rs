//! MCP server over newline-delimited JSON-RPC.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast;

use crate::config::GatewayConfig;
use crate::market::{MarketClient, MarketKind};
use crate::mcp::protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, ToolCall, ToolResult, INVALID_PARAMS,
    METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION,
};
use crate::mcp::tools::{self, AnalyzeArgs, MarketArgs, SubscribeArgs};
use crate::proxy::{AnalysisProxy, ProxyError, SubscriptionProxy};
use crate::risk::PositionRequest;
use crate::verdict;

/// Serves the trading tools to an MCP client.
pub struct McpServer {
    analysis: AnalysisProxy,
    subscription: SubscriptionProxy,
    market: MarketClient,
    tool_timeout: Duration,
}

impl McpServer {
    pub fn new(config: &GatewayConfig, client: reqwest::Client) -> Self {
        Self {
            analysis: AnalysisProxy::new(client.clone(), config.analysis.clone()),
            subscription: SubscriptionProxy::new(client.clone(), config.subscription.clone()),
            market: MarketClient::new(client, config.market.clone()),
            tool_timeout: Duration::from_secs(config.mcp.tool_timeout_secs),
        }
    }

    /// Read requests line by line until EOF or shutdown.
    pub async fn run<R, W>(
        &self,
        reader: R,
        mut writer: W,
        mut shutdown: broadcast::Receiver<()>,
    ) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        tracing::info!("MCP server ready on stdio");
        let mut lines = reader.lines();

        loop {
            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = shutdown.recv() => {
                    tracing::info!("MCP server shutting down");
                    break;
                }
            };
            let Some(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }

            let response = tokio::select! {
                response = self.handle_line(&line) => response,
                _ = shutdown.recv() => {
                    tracing::info!("MCP server shutting down with a call in flight");
                    break;
                }
            };

            if let Some(response) = response {
                let mut out = serde_json::to_vec(&response)?;
                out.push(b'\n');
                writer.write_all(&out).await?;
                writer.flush().await?;
            }
        }

        Ok(())
    }

    /// Handle one raw message. Notifications produce no response.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::new(PARSE_ERROR, format!("Parse error: {e}")),
                ));
            }
        };

        let Some(id) = request.id.clone() else {
            tracing::debug!(method = %request.method, "Notification received");
            return None;
        };

        let result = match request.method.as_str() {
            "initialize" => Ok(initialize()),
            "tools/list" => Ok(json!({ "tools": tools::catalogue() })),
            "tools/call" => self.call_tool(request.params).await,
            other => Err(JsonRpcError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            )),
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(error) => JsonRpcResponse::failure(id, error),
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let call: ToolCall = parse_params(params.unwrap_or(Value::Null))?;
        tracing::debug!(tool = %call.name, "Tool call");

        let result = match call.name.as_str() {
            tools::ANALYZE_TRADE => {
                let args = parse_params(call.arguments)?;
                self.with_deadline(tools::ANALYZE_TRADE, self.analyze_trade(args))
                    .await
            }
            tools::CALCULATE_RISK => calculate_risk(parse_params(call.arguments)?),
            tools::SUBSCRIBE_EMAIL => {
                let args = parse_params(call.arguments)?;
                self.with_deadline(tools::SUBSCRIBE_EMAIL, self.subscribe_email(args))
                    .await
            }
            tools::FETCH_MARKET_DATA => {
                self.fetch_market_data(parse_params(call.arguments)?).await
            }
            other => {
                return Err(JsonRpcError::new(
                    INVALID_PARAMS,
                    format!("Unknown tool: {other}"),
                ))
            }
        };

        serde_json::to_value(result).map_err(|e| JsonRpcError::new(INVALID_PARAMS, e.to_string()))
    }

    /// Bound an upstream-backed tool call by `mcp.tool_timeout_secs`.
    async fn with_deadline<F>(&self, tool: &'static str, call: F) -> ToolResult
    where
        F: Future<Output = ToolResult>,
    {
        match tokio::time::timeout(self.tool_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    tool,
                    timeout_secs = self.tool_timeout.as_secs(),
                    "Tool call timed out"
                );
                ToolResult::error(format!("API Error: {}", verdict::OFFLINE_NOTICE))
            }
        }
    }

    async fn analyze_trade(&self, args: AnalyzeArgs) -> ToolResult {
        match self.analysis.analyze(Some(&args.input)).await {
            Ok(response) => match response.json() {
                Ok(body) => ToolResult::text(tools::render_analysis(verdict::extract_text(&body))),
                Err(_) => ToolResult::error(format!("Error: {}", verdict::OFFLINE_NOTICE)),
            },
            Err(ProxyError::Configuration(_)) => ToolResult::error(
                "Error: GEMINI_API_KEY not configured. Please add it to your environment.",
            ),
            Err(ProxyError::Upstream(_)) => {
                ToolResult::error(format!("API Error: {}", verdict::OFFLINE_NOTICE))
            }
            Err(e) => ToolResult::error(format!("Error: {}", e.public_message())),
        }
    }

    async fn subscribe_email(&self, args: SubscribeArgs) -> ToolResult {
        let email = args.email.trim();
        if !tools::is_valid_email(email) {
            return ToolResult::error(
                "Invalid email format. Please provide a valid email address.",
            );
        }

        match self.subscription.subscribe(Some(email)).await {
            Ok(_) => ToolResult::text(format!(
                "**Subscribed Successfully!**\n\n{email} has been added to the MBridge newsletter."
            )),
            Err(ProxyError::Configuration(_)) => ToolResult::error(
                "Error: GOOGLE_SHEET_URL not configured. Please add it to your environment.",
            ),
            Err(e) => ToolResult::error(format!("Subscription failed: {}", e.public_message())),
        }
    }

    async fn fetch_market_data(&self, args: MarketArgs) -> ToolResult {
        let kind = match args.kind.parse::<MarketKind>() {
            Ok(kind) => kind,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        let rendered = match kind {
            MarketKind::Crypto => self
                .market
                .crypto_quote(&args.symbol)
                .await
                .map(|q| tools::render_crypto(&q)),
            MarketKind::Forex => self
                .market
                .forex_rate(&args.symbol)
                .await
                .map(|r| tools::render_forex(&r)),
        };

        match rendered {
            Ok(text) => ToolResult::text(text),
            Err(e) => {
                tracing::warn!(symbol = %args.symbol, error = %e, "Market data lookup failed");
                ToolResult::error(e.to_string())
            }
        }
    }
}

fn initialize() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "serverInfo": {
            "name": "mbridge-mcp",
            "version": env!("CARGO_PKG_VERSION")
        },
        "capabilities": {
            "tools": {}
        }
    })
}

fn calculate_risk(request: PositionRequest) -> ToolResult {
    match request.plan() {
        Ok(plan) => ToolResult::text(tools::render_position(&request, &plan)),
        Err(e) => ToolResult::error(e.to_string()),
    }
}

fn parse_params<T: DeserializeOwned>(value: Value) -> Result<T, JsonRpcError> {
    serde_json::from_value(value)
        .map_err(|e| JsonRpcError::new(INVALID_PARAMS, format!("Invalid params: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Shutdown;

    fn server() -> McpServer {
        let mut config = GatewayConfig::default();
        config.analysis.api_key = None;
        config.subscription.sheet_url = None;
        McpServer::new(&config, reqwest::Client::new())
    }

    async fn call(server: &McpServer, message: Value) -> Value {
        let response = server.handle_line(&message.to_string()).await.unwrap();
        serde_json::to_value(response).unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let response = call(
            &server(),
            json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {} }),
        )
        .await;
        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(response["result"]["serverInfo"]["name"], "mbridge-mcp");
    }

    #[tokio::test]
    async fn test_tools_list() {
        let response = call(
            &server(),
            json!({ "jsonrpc": "2.0", "id": "a", "method": "tools/list" }),
        )
        .await;
        let tools = response["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 4);
        assert_eq!(tools[0]["name"], "analyze_trade");
        assert!(tools[0]["inputSchema"]["required"].is_array());
    }

    #[tokio::test]
    async fn test_unknown_method_and_parse_error() {
        let server = server();
        let response = call(
            &server,
            json!({ "jsonrpc": "2.0", "id": 7, "method": "resources/list" }),
        )
        .await;
        assert_eq!(response["error"]["code"], METHOD_NOT_FOUND);

        let response = server.handle_line("{not json").await.unwrap();
        let response = serde_json::to_value(response).unwrap();
        assert_eq!(response["error"]["code"], PARSE_ERROR);
        assert!(response["id"].is_null());
    }

    #[tokio::test]
    async fn test_notification_has_no_response() {
        let line = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }).to_string();
        assert!(server().handle_line(&line).await.is_none());
    }

    #[tokio::test]
    async fn test_calculate_risk_tool() {
        let response = call(
            &server(),
            json!({
                "jsonrpc": "2.0", "id": 2, "method": "tools/call",
                "params": {
                    "name": "calculate_risk",
                    "arguments": { "accountSize": 10000, "riskPercent": 1, "entryPrice": 100, "stopLoss": 95 }
                }
            }),
        )
        .await;
        assert_eq!(response["result"]["isError"], false);
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("**Position Size:** 20.0000 units"));
    }

    #[tokio::test]
    async fn test_calculate_risk_validation_and_bad_params() {
        let server = server();
        let response = call(
            &server,
            json!({
                "jsonrpc": "2.0", "id": 3, "method": "tools/call",
                "params": {
                    "name": "calculate_risk",
                    "arguments": { "accountSize": 10000, "riskPercent": 9, "entryPrice": 100, "stopLoss": 95 }
                }
            }),
        )
        .await;
        assert_eq!(response["result"]["isError"], true);
        assert_eq!(
            response["result"]["content"][0]["text"],
            "Risk percent must be between 0.5% and 5%"
        );

        let response = call(
            &server,
            json!({
                "jsonrpc": "2.0", "id": 4, "method": "tools/call",
                "params": { "name": "calculate_risk", "arguments": { "accountSize": 10000 } }
            }),
        )
        .await;
        assert_eq!(response["error"]["code"], INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_subscribe_rejects_bad_email_before_config_check() {
        let response = call(
            &server(),
            json!({
                "jsonrpc": "2.0", "id": 5, "method": "tools/call",
                "params": { "name": "subscribe_email", "arguments": { "email": "nope" } }
            }),
        )
        .await;
        assert_eq!(response["result"]["isError"], true);
        assert!(response["result"]["content"][0]["text"]
            .as_str()
            .unwrap()
            .starts_with("Invalid email format"));
    }

    #[tokio::test]
    async fn test_analyze_without_key() {
        let response = call(
            &server(),
            json!({
                "jsonrpc": "2.0", "id": 6, "method": "tools/call",
                "params": { "name": "analyze_trade", "arguments": { "input": "Long EURUSD at support" } }
            }),
        )
        .await;
        assert_eq!(response["result"]["isError"], true);
        assert!(response["result"]["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("GEMINI_API_KEY not configured"));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let response = call(
            &server(),
            json!({
                "jsonrpc": "2.0", "id": 8, "method": "tools/call",
                "params": { "name": "place_order", "arguments": {} }
            }),
        )
        .await;
        assert_eq!(response["error"]["code"], INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_run_over_buffers() {
        let input = [
            json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize" }).to_string(),
            String::new(),
            json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }).to_string(),
            json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" }).to_string(),
        ]
        .join("\n");

        let shutdown = Shutdown::new();
        let mut output = Vec::new();
        server()
            .run(input.as_bytes(), &mut output, shutdown.subscribe())
            .await
            .unwrap();

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], 1);
        assert_eq!(lines[1]["id"], 2);
    }
}
