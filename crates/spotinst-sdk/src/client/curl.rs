//! Curl rendering of outgoing requests for trace logs

use reqwest::Method;
use serde_json::Value;
use url::Url;

/// Format a curl command equivalent to one API request.
///
/// The bearer token is always redacted. The `accountId` query parameter is
/// kept since it identifies, not authenticates.
pub fn format_curl(
    method: &Method,
    url: &Url,
    content_type: &str,
    user_agent: &str,
    body: Option<&Value>,
) -> String {
    let mut parts = vec![
        "curl".to_string(),
        "-s".to_string(),
        format!("-X {}", method),
    ];

    parts.push(format!("'{}'", url));
    parts.push(format!("-H 'Accept: {}'", content_type));
    parts.push("-H 'Authorization: Bearer <REDACTED>'".to_string());
    parts.push(format!("-H 'User-Agent: {}'", user_agent));

    if let Some(body) = body {
        parts.push(format!("-H 'Content-Type: {}'", content_type));
        parts.push(format!("-d '{}'", body.to_string().replace('\'', r"'\''")));
    }

    parts.join(" \\\n  ")
}
