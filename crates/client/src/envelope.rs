//! Response envelopes.
//!
//! Most endpoints answer `{ "success": true, "data": ... }`; a few (party
//! details, ledger tallies) return the payload bare. Business failures come
//! back as `{ "success": false, "message": "..." }`, sometimes with a 2xx
//! status.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, ClientResult};

/// One page of a paginated resource listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub count: u64,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

fn message_of(body: &Value) -> Option<String> {
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Fail on `success: false`, whatever the status code was.
pub fn ensure_success(body: &Value) -> ClientResult<()> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = message_of(body).unwrap_or_else(|| "request was rejected".to_string());
        return Err(ClientError::Rejected(message));
    }
    Ok(())
}

/// Decode the payload of a successful response, unwrapping `data` if present.
pub fn decode_payload<T: DeserializeOwned>(mut body: Value) -> ClientResult<T> {
    ensure_success(&body)?;
    let payload = match body.as_object_mut().and_then(|o| o.remove("data")) {
        Some(data) => data,
        None => body,
    };
    serde_json::from_value(payload).map_err(|e| ClientError::Parse(e.to_string()))
}

/// Decode a paginated listing (`data`, `totalPages`, `count` side by side).
pub fn decode_page<T: DeserializeOwned>(body: Value) -> ClientResult<Page<T>> {
    ensure_success(&body)?;
    serde_json::from_value(body).map_err(|e| ClientError::Parse(e.to_string()))
}

/// Message to surface for a non-2xx response body.
pub fn error_message(status: u16, raw: &str) -> String {
    serde_json::from_str::<Value>(raw)
        .ok()
        .as_ref()
        .and_then(message_of)
        .unwrap_or_else(|| {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                format!("request failed with status {status}")
            } else {
                trimmed.chars().take(200).collect()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wrapped_and_bare_payloads_decode() {
        let wrapped: Vec<u32> = decode_payload(json!({"success": true, "data": [1, 2]})).unwrap();
        assert_eq!(wrapped, vec![1, 2]);
        let bare: Vec<u32> = decode_payload(json!([3])).unwrap();
        assert_eq!(bare, vec![3]);
    }

    #[test]
    fn success_false_is_a_rejection() {
        let err = decode_payload::<Value>(json!({"success": false, "message": "Party not found"}))
            .unwrap_err();
        assert!(matches!(err, ClientError::Rejected(m) if m == "Party not found"));
    }

    #[test]
    fn pages_carry_counts() {
        let page: Page<Value> = decode_page(json!({
            "success": true, "data": [{"id": 1}], "totalPages": 4, "count": 37
        }))
        .unwrap();
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.count, 37);
        assert_eq!(page.data.len(), 1);
    }

    #[test]
    fn error_message_prefers_json_message() {
        assert_eq!(error_message(400, r#"{"success":false,"message":"bad date"}"#), "bad date");
        assert_eq!(error_message(502, ""), "request failed with status 502");
        assert_eq!(error_message(500, "upstream down"), "upstream down");
    }
}
