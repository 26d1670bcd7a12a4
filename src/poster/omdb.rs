use serde_json::Value;

use crate::http::HttpClient;

const PLACEHOLDER_POSTER: &str = "N/A";

/// Looks a title up on OMDb. `Ok(None)` means the service answered but had no
/// usable poster.
pub(super) fn lookup(
    http: &HttpClient,
    base_url: &str,
    api_key: Option<&str>,
    title: &str,
) -> Result<Option<String>, String> {
    let Some(api_key) = api_key else {
        return Err("no OMDb API key configured".to_string());
    };
    let body = http.get_text(base_url, &[("t", title), ("apikey", api_key)])?;
    parse_poster(&body)
}

pub(super) fn parse_poster(raw: &str) -> Result<Option<String>, String> {
    let parsed: Value =
        serde_json::from_str(raw).map_err(|err| format!("invalid OMDb response: {err}"))?;

    if parsed.get("Response").and_then(Value::as_str) != Some("True") {
        if let Some(message) = parsed.get("Error").and_then(Value::as_str) {
            tracing::debug!(message, "OMDb reported no match");
        }
        return Ok(None);
    }

    Ok(parsed
        .get("Poster")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|poster| !poster.is_empty() && *poster != PLACEHOLDER_POSTER)
        .map(str::to_string))
}
