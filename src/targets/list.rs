use crate::targets::UrlRef;
use crate::RelayError;
use serde_json::Value;
use url::Url;

/// Parses a list of batch targets from agent output or a file
///
/// Accepted forms:
///
/// * A JSON array of URL strings and/or `{"url": ...}` records
/// * A JSON object with a `urls` array
/// * Plain text with one URL per line; blank lines, `#` comments and leading
///   list bullets are ignored, and lines that are not http(s) URLs are skipped
///
/// JSON may be wrapped in a Markdown code fence.
///
/// # Returns
///
/// * `Ok(Vec<UrlRef>)` - The parsed targets, in order
/// * `Err(RelayError)` - Malformed JSON, or an object without `urls`
pub fn parse_target_list(text: &str) -> Result<Vec<UrlRef>, RelayError> {
    let body = strip_code_fence(text.trim());

    if body.starts_with('[') {
        return Ok(serde_json::from_str(body)?);
    }

    if body.starts_with('{') {
        let mut value: Value = serde_json::from_str(body)?;
        return match value.get_mut("urls").map(Value::take) {
            Some(urls @ Value::Array(_)) => Ok(serde_json::from_value(urls)?),
            _ => Err(RelayError::InvalidInput(
                "expected a JSON object with a 'urls' array".to_string(),
            )),
        };
    }

    Ok(body.lines().filter_map(parse_line).collect())
}

/// Removes a surrounding ```json ... ``` fence if present
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };

    // Drop the info string (e.g. "json") on the opening line
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

fn parse_line(line: &str) -> Option<UrlRef> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let candidate = line
        .trim_start_matches(|c: char| c == '-' || c == '*')
        .trim();

    match Url::parse(candidate) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
            Some(UrlRef::from(candidate))
        }
        _ => {
            tracing::debug!("Skipping non-URL line: {}", line);
            None
        }
    }
}
