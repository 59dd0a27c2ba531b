//! v10 quote summary endpoint: module flattening into one metadata map.

use crate::error::ProviderError;
use crate::provider::Metadata;
use serde::Deserialize;
use serde_json::Value;

use super::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    quote_summary: SummaryEnvelope,
}

#[derive(Debug, Deserialize)]
struct SummaryEnvelope {
    result: Option<Vec<Metadata>>,
    error: Option<ApiError>,
}

/// Parse a quote summary body and flatten the requested modules.
///
/// Modules are merged in `modules` order, so a later module wins on key collisions. Modules the
/// response does not carry are skipped; the remaining fields pass through unvalidated.
pub(super) fn parse_summary(
    symbol: &str,
    body: &str,
    modules: &[String],
) -> Result<Metadata, ProviderError> {
    let resp: SummaryResponse = serde_json::from_str(body).map_err(|e| {
        ProviderError::ResponseFormatChanged(format!("failed to parse summary for {symbol}: {e}"))
    })?;

    let envelope = resp.quote_summary;
    if let Some(err) = envelope.error {
        return Err(err.into_provider_error(symbol));
    }

    let result = envelope
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| {
            ProviderError::ResponseFormatChanged(format!("empty summary result for {symbol}"))
        })?;

    let mut info = flatten_modules(&result, modules);
    info.insert("symbol".into(), Value::String(symbol.to_string()));
    Ok(info)
}

fn flatten_modules(result: &Metadata, modules: &[String]) -> Metadata {
    let mut info = Metadata::new();
    for name in modules {
        let Some(Value::Object(module)) = result.get(name) else {
            continue;
        };
        for (key, value) in module {
            if key == "maxAge" {
                continue;
            }
            info.insert(key.clone(), unwrap_raw(value.clone()));
        }
    }
    info
}

/// Reduce `{"raw": x, "fmt": ...}` wrappers to `x` and empty objects to `null`, recursively.
fn unwrap_raw(value: Value) -> Value {
    match value {
        Value::Object(mut map) => {
            if map.is_empty() {
                Value::Null
            } else if let Some(raw) = map.remove("raw") {
                raw
            } else {
                Value::Object(map.into_iter().map(|(k, v)| (k, unwrap_raw(v))).collect())
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(unwrap_raw).collect()),
        other => other,
    }
}
