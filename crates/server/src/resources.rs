//! Resource catalog and URI handling.
//!
//! Resources expose read-only JSON views under the `fmp://` scheme: one
//! static market snapshot plus per-company templates. Reading a resource
//! performs the single matching client call.

use fmp_client::FmpClient;
use rmcp::ErrorData;
use rmcp::model::{
    AnnotateAble as _, RawResource, RawResourceTemplate, ReadResourceResult, Resource,
    ResourceContents, ResourceTemplate,
};

pub const SECTOR_PERFORMANCE_URI: &str = "fmp://markets/sector-performance";

/// Concrete resources (no template expansion needed).
#[must_use]
pub fn catalog() -> Vec<Resource> {
    let mut sectors = RawResource::new(SECTOR_PERFORMANCE_URI, "sector-performance");
    sectors.description =
        Some("Per-sector performance snapshot for the current trading session.".to_string());
    sectors.mime_type = Some("application/json".to_string());
    vec![sectors.no_annotation()]
}

/// Per-company resource templates.
#[must_use]
pub fn templates() -> Vec<ResourceTemplate> {
    vec![
        template(
            "fmp://companies/{symbol}/profile",
            "company-profile",
            "Company profile for the given ticker symbol.",
        ),
        template(
            "fmp://companies/{symbol}/quote",
            "company-quote",
            "Real-time quote for the given ticker symbol.",
        ),
        template(
            "fmp://companies/{symbol}/dcf",
            "company-dcf",
            "Discounted cash flow valuation for the given ticker symbol.",
        ),
    ]
}

fn template(uri_template: &str, name: &str, description: &str) -> ResourceTemplate {
    RawResourceTemplate {
        uri_template: uri_template.to_string(),
        name: name.to_string(),
        title: None,
        description: Some(description.to_string()),
        mime_type: Some("application/json".to_string()),
        icons: None,
    }
    .no_annotation()
}

enum ResourceView {
    SectorPerformance,
    Profile(String),
    Quote(String),
    Dcf(String),
}

/// Resolve and read one `fmp://` URI.
///
/// # Errors
///
/// Returns `resource_not_found` for URIs outside the catalog and an internal
/// error when the upstream call fails (resources have no `is_error` channel).
pub async fn read(client: &FmpClient, uri: &str) -> Result<ReadResourceResult, ErrorData> {
    let rows = match parse_uri(uri)? {
        ResourceView::SectorPerformance => client.sector_performance().await,
        ResourceView::Profile(symbol) => client.company_profile(&symbol).await,
        ResourceView::Quote(symbol) => client.quote(&symbol).await,
        ResourceView::Dcf(symbol) => client.dcf_valuation(&symbol).await,
    }
    .map_err(|e| {
        ErrorData::internal_error(format!("Failed to read resource '{uri}': {e}"), None)
    })?;

    let text = serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string());
    let mut contents = ResourceContents::text(text, uri);
    if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
        *mime_type = Some("application/json".to_string());
    }

    Ok(ReadResourceResult {
        contents: vec![contents],
    })
}

fn parse_uri(uri: &str) -> Result<ResourceView, ErrorData> {
    if uri == SECTOR_PERFORMANCE_URI {
        return Ok(ResourceView::SectorPerformance);
    }

    let not_found = || ErrorData::resource_not_found(format!("Unknown resource URI: {uri}"), None);

    let rest = uri.strip_prefix("fmp://companies/").ok_or_else(not_found)?;
    let (symbol, view) = rest.split_once('/').ok_or_else(not_found)?;
    // An unexpanded template (empty `{symbol}`) is not a resource.
    if symbol.is_empty() {
        return Err(not_found());
    }

    match view {
        "profile" => Ok(ResourceView::Profile(symbol.to_string())),
        "quote" => Ok(ResourceView::Quote(symbol.to_string())),
        "dcf" => Ok(ResourceView::Dcf(symbol.to_string())),
        _ => Err(not_found()),
    }
}
