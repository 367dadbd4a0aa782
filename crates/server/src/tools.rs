//! Tool catalog and dispatch.
//!
//! Every tool maps to exactly one `FmpClient` call. Argument problems are
//! protocol errors (`-32602`); upstream API failures come back as `is_error`
//! tool results so hosts can surface them to the model.

use fmp_client::{FmpClient, FmpError, Period};
use rmcp::ErrorData;
use rmcp::model::{CallToolResult, Content, JsonObject, Tool, ToolAnnotations};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

/// Default row count for statement-style endpoints.
pub const DEFAULT_STATEMENT_LIMIT: u32 = 5;

/// Default row count for company search.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

// Every upstream call is a plain GET.
fn read_only_annotations() -> ToolAnnotations {
    ToolAnnotations {
        title: None,
        read_only_hint: Some(true),
        destructive_hint: Some(false),
        idempotent_hint: Some(true),
        open_world_hint: Some(true),
    }
}

fn tool(name: &'static str, description: &'static str, schema: Value) -> Tool {
    let schema_obj = schema.as_object().cloned().unwrap_or_else(JsonObject::new);
    let mut tool = Tool::new(name, description, Arc::new(schema_obj));
    tool.annotations = Some(read_only_annotations());
    tool
}

fn symbol_property() -> Value {
    json!({ "type": "string", "description": "Ticker symbol, e.g. AAPL" })
}

fn symbol_only_schema() -> Value {
    json!({
        "type": "object",
        "properties": { "symbol": symbol_property() },
        "required": ["symbol"]
    })
}

fn period_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "symbol": symbol_property(),
            "period": {
                "type": "string",
                "enum": ["annual", "quarter"],
                "default": "annual",
                "description": "Reporting period"
            },
            "limit": {
                "type": "integer",
                "minimum": 1,
                "default": DEFAULT_STATEMENT_LIMIT,
                "description": "Number of periods to return"
            }
        },
        "required": ["symbol"]
    })
}

fn statements_schema() -> Value {
    let mut schema = period_schema();
    schema["properties"]["statement_type"] = json!({
        "type": "string",
        "enum": ["income", "balance", "cashflow"],
        "description": "Which statement to fetch"
    });
    schema["required"] = json!(["symbol", "statement_type"]);
    schema
}

fn search_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": { "type": "string", "description": "Company name or ticker fragment" },
            "limit": {
                "type": "integer",
                "minimum": 1,
                "default": DEFAULT_SEARCH_LIMIT,
                "description": "Maximum matches to return"
            }
        },
        "required": ["query"]
    })
}

/// The static tool surface, in display order.
#[must_use]
pub fn catalog() -> Vec<Tool> {
    vec![
        tool(
            "get_company_profile",
            "Get the company profile for one symbol: business description, sector, industry, and key figures.",
            symbol_only_schema(),
        ),
        tool(
            "get_stock_quote",
            "Get a real-time stock quote with current price, volume, and market data.",
            symbol_only_schema(),
        ),
        tool(
            "get_financial_statements",
            "Get financial statements (income statement, balance sheet, or cash flow) for a company.",
            statements_schema(),
        ),
        tool(
            "get_key_metrics",
            "Get key financial metrics for fundamental analysis.",
            period_schema(),
        ),
        tool(
            "get_financial_ratios",
            "Get financial ratios for valuation and analysis.",
            period_schema(),
        ),
        tool(
            "get_dcf_valuation",
            "Get the discounted cash flow valuation for one symbol.",
            symbol_only_schema(),
        ),
        tool(
            "get_financial_score",
            "Get the financial health score for one symbol.",
            symbol_only_schema(),
        ),
        tool(
            "get_market_cap",
            "Get the current market capitalization for one symbol.",
            symbol_only_schema(),
        ),
        tool(
            "search_companies",
            "Search for companies by name or ticker symbol.",
            search_schema(),
        ),
        tool(
            "get_sector_performance",
            "Get the per-sector performance snapshot for the current session.",
            json!({ "type": "object", "properties": {} }),
        ),
    ]
}

#[derive(Debug, Deserialize)]
struct SymbolArgs {
    symbol: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum StatementType {
    Income,
    Balance,
    Cashflow,
}

#[derive(Debug, Deserialize)]
struct StatementArgs {
    symbol: String,
    statement_type: StatementType,
    #[serde(default)]
    period: Period,
    #[serde(default = "default_statement_limit")]
    limit: u32,
}

#[derive(Debug, Deserialize)]
struct PeriodArgs {
    symbol: String,
    #[serde(default)]
    period: Period,
    #[serde(default = "default_statement_limit")]
    limit: u32,
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
    #[serde(default = "default_search_limit")]
    limit: u32,
}

fn default_statement_limit() -> u32 {
    DEFAULT_STATEMENT_LIMIT
}

fn default_search_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}

fn parse_args<T: serde::de::DeserializeOwned>(
    tool_name: &str,
    arguments: Option<JsonObject>,
) -> Result<T, ErrorData> {
    let value = Value::Object(arguments.unwrap_or_default());
    serde_json::from_value(value).map_err(|e| {
        ErrorData::invalid_params(format!("Invalid arguments for tool '{tool_name}': {e}"), None)
    })
}

fn require_non_empty(tool_name: &str, field: &str, value: &str) -> Result<(), ErrorData> {
    if value.trim().is_empty() {
        return Err(ErrorData::invalid_params(
            format!("Invalid arguments for tool '{tool_name}': '{field}' must not be empty"),
            None,
        ));
    }
    Ok(())
}

/// Execute one tool call.
///
/// # Errors
///
/// Returns a protocol error for unknown tools or invalid arguments. Upstream
/// failures are not errors at this level; they become `is_error` results.
pub async fn dispatch(
    client: &FmpClient,
    name: &str,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, ErrorData> {
    debug!(tool = %name, "tools/call");

    let rows = match name {
        "get_company_profile" => {
            let args: SymbolArgs = parse_args(name, arguments)?;
            require_non_empty(name, "symbol", &args.symbol)?;
            client.company_profile(&args.symbol).await
        }
        "get_stock_quote" => {
            let args: SymbolArgs = parse_args(name, arguments)?;
            require_non_empty(name, "symbol", &args.symbol)?;
            client.quote(&args.symbol).await
        }
        "get_financial_statements" => {
            let args: StatementArgs = parse_args(name, arguments)?;
            require_non_empty(name, "symbol", &args.symbol)?;
            match args.statement_type {
                StatementType::Income => {
                    client
                        .income_statement(&args.symbol, args.period, args.limit)
                        .await
                }
                StatementType::Balance => {
                    client
                        .balance_sheet(&args.symbol, args.period, args.limit)
                        .await
                }
                StatementType::Cashflow => {
                    client.cash_flow(&args.symbol, args.period, args.limit).await
                }
            }
        }
        "get_key_metrics" => {
            let args: PeriodArgs = parse_args(name, arguments)?;
            require_non_empty(name, "symbol", &args.symbol)?;
            client.key_metrics(&args.symbol, args.period, args.limit).await
        }
        "get_financial_ratios" => {
            let args: PeriodArgs = parse_args(name, arguments)?;
            require_non_empty(name, "symbol", &args.symbol)?;
            client
                .financial_ratios(&args.symbol, args.period, args.limit)
                .await
        }
        "get_dcf_valuation" => {
            let args: SymbolArgs = parse_args(name, arguments)?;
            require_non_empty(name, "symbol", &args.symbol)?;
            client.dcf_valuation(&args.symbol).await
        }
        "get_financial_score" => {
            let args: SymbolArgs = parse_args(name, arguments)?;
            require_non_empty(name, "symbol", &args.symbol)?;
            client.financial_score(&args.symbol).await
        }
        "get_market_cap" => {
            let args: SymbolArgs = parse_args(name, arguments)?;
            require_non_empty(name, "symbol", &args.symbol)?;
            client.market_cap(&args.symbol).await
        }
        "search_companies" => {
            let args: SearchArgs = parse_args(name, arguments)?;
            require_non_empty(name, "query", &args.query)?;
            client.search_companies(&args.query, args.limit).await
        }
        "get_sector_performance" => client.sector_performance().await,
        other => {
            return Err(ErrorData::invalid_params(
                format!("Unknown tool: {other}"),
                None,
            ));
        }
    };

    Ok(into_tool_result(rows))
}

// Upstream failures become `is_error` results rather than protocol errors.
fn into_tool_result(rows: Result<Vec<Value>, FmpError>) -> CallToolResult {
    match rows {
        Ok(rows) => {
            let text = serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string());
            CallToolResult::success(vec![Content::text(text)])
        }
        Err(e) => CallToolResult::error(vec![Content::text(e.to_string())]),
    }
}
