use serde_json::Value;

use crate::http::HttpClient;

pub(super) fn lookup(
    http: &HttpClient,
    base_url: &str,
    title: &str,
) -> Result<Option<String>, String> {
    let body = http.get_text(base_url, &[("q", title), ("limit", "1")])?;
    parse_first_image(&body)
}

/// Image URL of the first search hit, if there is one.
pub(super) fn parse_first_image(raw: &str) -> Result<Option<String>, String> {
    let parsed: Value =
        serde_json::from_str(raw).map_err(|err| format!("invalid Jikan response: {err}"))?;

    Ok(parsed
        .pointer("/data/0/images/jpg/image_url")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string))
}
