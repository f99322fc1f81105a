use serde::Serialize;
use serde_json::Value;

use super::error::{AppError, Result};

/// An extracted (person name, color label) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePair {
    pub name: String,
    pub color: String,
}

#[derive(Serialize)]
struct ExtractRequest<'a> {
    text: &'a str,
}

/// Ask the extraction service which person names appear in `text`.
///
/// Extraction is best-effort: any transport failure, timeout, non-success
/// status or unusable payload degrades to an empty result. Nothing on this
/// path ever interrupts the editing session.
pub fn extract_names(server_url: &str, text: &str, timeout_secs: u64) -> Vec<NamePair> {
    match request_names(server_url, text, timeout_secs) {
        Ok(pairs) => pairs,
        Err(e) => {
            eprintln!("Name extraction failed: {}", e);
            Vec::new()
        }
    }
}

fn request_names(server_url: &str, text: &str, timeout_secs: u64) -> Result<Vec<NamePair>> {
    let response = minreq::post(endpoint_url(server_url))
        .with_timeout(timeout_secs)
        .with_json(&ExtractRequest { text })
        .map_err(|e| AppError::Extraction(format!("failed to encode request: {}", e)))?
        .send()
        .map_err(|e| AppError::Extraction(format!("failed to contact extraction server: {}", e)))?;

    if response.status_code != 200 {
        return Err(AppError::Extraction(format!(
            "extraction server returned {} {}",
            response.status_code, response.reason_phrase
        )));
    }

    let body: Value = response
        .json()
        .map_err(|e| AppError::Extraction(format!("failed to parse extraction response: {}", e)))?;
    Ok(parse_name_pairs(&body))
}

fn endpoint_url(server_url: &str) -> String {
    format!("{}/extract_names", server_url.trim_end_matches('/'))
}

/// Pull the well-formed pairs out of a response body.
///
/// The service replies `{"names": [[name, color], ...]}`. Elements that are
/// not two-string arrays, or whose name is empty, are dropped individually;
/// the rest of the batch is kept.
pub fn parse_name_pairs(body: &Value) -> Vec<NamePair> {
    let Some(names) = body.get("names").and_then(Value::as_array) else {
        return Vec::new();
    };
    names
        .iter()
        .filter_map(|entry| {
            let pair = entry.as_array()?;
            if pair.len() != 2 {
                return None;
            }
            let name = pair[0].as_str()?;
            let color = pair[1].as_str()?;
            if name.is_empty() {
                return None;
            }
            Some(NamePair {
                name: name.to_string(),
                color: color.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_pairs() {
        let body = json!({"names": [["Alice", "blue"], ["Bob", "green"]]});
        let pairs = parse_name_pairs(&body);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], NamePair { name: "Alice".into(), color: "blue".into() });
        assert_eq!(pairs[1], NamePair { name: "Bob".into(), color: "green".into() });
    }

    #[test]
    fn test_malformed_elements_dropped_individually() {
        let body = json!({"names": [
            ["Alice", "blue"],
            "not a pair",
            ["too", "many", "fields"],
            ["lonely"],
            [42, "red"],
            ["Carol", 7],
            ["", "green"],
            ["Bob", "green"],
        ]});
        let pairs = parse_name_pairs(&body);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].name, "Alice");
        assert_eq!(pairs[1].name, "Bob");
    }

    #[test]
    fn test_missing_or_wrong_shape_yields_empty() {
        assert!(parse_name_pairs(&json!({})).is_empty());
        assert!(parse_name_pairs(&json!({"names": "Alice"})).is_empty());
        assert!(parse_name_pairs(&json!(null)).is_empty());
        assert!(parse_name_pairs(&json!([1, 2, 3])).is_empty());
    }

    #[test]
    fn test_endpoint_url_joining() {
        assert_eq!(
            endpoint_url("http://localhost:19953"),
            "http://localhost:19953/extract_names"
        );
        assert_eq!(
            endpoint_url("http://localhost:19953/"),
            "http://localhost:19953/extract_names"
        );
    }

    #[test]
    fn test_unreachable_server_degrades_to_empty() {
        // Nothing listens on port 9; the failure must come back as an
        // empty result, not an error.
        let pairs = extract_names("http://127.0.0.1:9", "some text", 1);
        assert!(pairs.is_empty());
    }
}
