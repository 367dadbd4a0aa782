//! Prompt catalog.
//!
//! Prompts are canned analysis walkthroughs rendered from their arguments.
//! They never touch the API; the text tells the model which tools to call
//! and what to do with the results.

use rmcp::ErrorData;
use rmcp::model::{
    GetPromptResult, JsonObject, Prompt, PromptArgument, PromptMessage, PromptMessageRole,
};
use serde_json::Value;

/// The static prompt surface.
#[must_use]
pub fn catalog() -> Vec<Prompt> {
    vec![
        Prompt::new(
            "company_snapshot",
            Some("Produce a concise snapshot of one company: what it does, how it trades, and what it is worth."),
            Some(vec![required_arg(
                "symbol",
                "Ticker symbol to analyze, e.g. AAPL",
            )]),
        ),
        Prompt::new(
            "financial_health_review",
            Some("Walk through statements, ratios, and the health score for one company."),
            Some(vec![
                required_arg("symbol", "Ticker symbol to analyze, e.g. AAPL"),
                optional_arg("period", "Reporting period: annual (default) or quarter"),
            ]),
        ),
        Prompt::new(
            "sector_pulse",
            Some("Read the current sector performance snapshot and call out what stands out."),
            None,
        ),
    ]
}

fn required_arg(name: &str, description: &str) -> PromptArgument {
    PromptArgument {
        name: name.to_string(),
        title: None,
        description: Some(description.to_string()),
        required: Some(true),
    }
}

fn optional_arg(name: &str, description: &str) -> PromptArgument {
    PromptArgument {
        name: name.to_string(),
        title: None,
        description: Some(description.to_string()),
        required: Some(false),
    }
}

/// Render one prompt from its arguments.
///
/// # Errors
///
/// Returns `-32602` for unknown prompts, missing required arguments, or an
/// out-of-range `period`.
pub fn render(name: &str, arguments: Option<JsonObject>) -> Result<GetPromptResult, ErrorData> {
    let args = arguments.unwrap_or_default();

    match name {
        "company_snapshot" => {
            let symbol = require_arg(name, &args, "symbol")?;
            Ok(prompt_result(
                "Concise company snapshot",
                format!(
                    "Build a snapshot of {symbol}:\n\
                     1. Call get_company_profile to establish what the company does, its sector, and its size.\n\
                     2. Call get_stock_quote for current price, day range, and volume.\n\
                     3. Call get_dcf_valuation and compare the DCF value against the current price.\n\
                     Summarize in a short paragraph: business, trading picture, and whether the market \
                     price sits above or below the DCF estimate. Flag anything unusual in volume or \
                     the profile rather than speculating beyond the data."
                ),
            ))
        }
        "financial_health_review" => {
            let symbol = require_arg(name, &args, "symbol")?;
            let period = optional_period(name, &args)?;
            Ok(prompt_result(
                "Financial health review",
                format!(
                    "Review the financial health of {symbol} using {period} data:\n\
                     1. Call get_financial_statements for each statement_type (income, balance, cashflow) \
                     with period=\"{period}\".\n\
                     2. Call get_financial_ratios and get_key_metrics with the same period.\n\
                     3. Call get_financial_score for the overall health score.\n\
                     Assess: revenue and margin trajectory, leverage and liquidity from the balance \
                     sheet, cash generation versus reported earnings, and how the ratios compare to \
                     the score. Close with the two or three numbers that most deserve a follow-up."
                ),
            ))
        }
        "sector_pulse" => Ok(prompt_result(
            "Sector performance read",
            "Call get_sector_performance and read the snapshot:\n\
             1. Rank sectors by change and name the leaders and laggards.\n\
             2. Note whether the dispersion looks narrow or wide.\n\
             3. Call out any sector moving against the broader direction.\n\
             Keep it to a few sentences; this is a pulse check, not a report."
                .to_string(),
        )),
        other => Err(ErrorData::invalid_params(
            format!("Unknown prompt: {other}"),
            None,
        )),
    }
}

fn require_arg<'a>(prompt: &str, args: &'a JsonObject, key: &str) -> Result<&'a str, ErrorData> {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            ErrorData::invalid_params(
                format!("Prompt '{prompt}' requires argument '{key}'"),
                None,
            )
        })
}

fn optional_period(prompt: &str, args: &JsonObject) -> Result<String, ErrorData> {
    let period = args
        .get("period")
        .and_then(Value::as_str)
        .unwrap_or("annual");
    if period != "annual" && period != "quarter" {
        return Err(ErrorData::invalid_params(
            format!("Prompt '{prompt}': period must be 'annual' or 'quarter', got '{period}'"),
            None,
        ));
    }
    Ok(period.to_string())
}

fn prompt_result(description: &str, text: String) -> GetPromptResult {
    GetPromptResult {
        description: Some(description.to_string()),
        messages: vec![PromptMessage::new_text(PromptMessageRole::User, text)],
    }
}
