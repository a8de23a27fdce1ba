use reqwest::{RequestBuilder, header::RETRY_AFTER};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AnalysisError;

/// Sends `request` once and decodes a JSON body.
///
/// Non-success responses become `Upstream` errors carrying the status, the
/// provider's own error message when the body has one, and `Retry-After`.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
) -> Result<T, AnalysisError> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());

    let body: Value = response.json().await.unwrap_or(Value::Null);

    Err(AnalysisError::Upstream {
        message: error_message(&body)
            .unwrap_or_else(|| format!("request failed with status {}", status)),
        status: Some(status.as_u16()),
        retry_after,
    })
}

/// Spotify nests the message as `error.message`, ReccoBeats puts it at the top.
fn error_message(body: &Value) -> Option<String> {
    body["error"]["message"]
        .as_str()
        .or_else(|| body["message"].as_str())
        .or_else(|| body["error"].as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::error_message;

    #[test]
    fn test_error_message_shapes() {
        let spotify = json!({ "error": { "status": 429, "message": "API rate limit exceeded" } });
        assert_eq!(
            error_message(&spotify).as_deref(),
            Some("API rate limit exceeded")
        );

        let reccobeats = json!({ "timestamp": "2025-01-01T00:00:00", "message": "Invalid ids" });
        assert_eq!(error_message(&reccobeats).as_deref(), Some("Invalid ids"));

        let flat = json!({ "error": "invalid_client" });
        assert_eq!(error_message(&flat).as_deref(), Some("invalid_client"));
    }

    #[test]
    fn test_error_message_missing() {
        assert_eq!(error_message(&serde_json::Value::Null), None);
        assert_eq!(error_message(&json!({ "status": 500 })), None);
        assert_eq!(error_message(&json!({ "error": { "status": 500 } })), None);
    }
}
