//! Request and response types for the admin backend API.
//!
//! The backend speaks snake_case JSON, so no field renaming is needed.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ApiError;

/// Normalized body of a successful response.
///
/// JSON bodies are parsed; anything else is surfaced as the raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Json(Value),
    Text(String),
}

impl ApiResponse {
    /// Parse a response body, falling back to the raw text when it is not JSON.
    pub fn from_body(text: String) -> Self {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => ApiResponse::Json(value),
            Err(_) => ApiResponse::Text(text),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            ApiResponse::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ApiResponse::Text(text) => Some(text),
            ApiResponse::Json(_) => None,
        }
    }

    /// Decode a JSON body into a typed response struct.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            ApiResponse::Json(value) => {
                serde_json::from_value(value).map_err(|e| ApiError::Decode {
                    message: e.to_string(),
                })
            }
            ApiResponse::Text(text) => Err(ApiError::Decode {
                message: format!("expected JSON, got text: {}", text),
            }),
        }
    }
}

impl std::fmt::Display for ApiResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiResponse::Json(value) => write!(f, "{}", value),
            ApiResponse::Text(text) => f.write_str(text),
        }
    }
}

/// Shape of an error body. Only `message` is honoured.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Pick the message out of an error response, if there is a usable one.
    ///
    /// Returns `None` when the body is not a JSON object or the message is
    /// missing or empty.
    pub fn extract_message(text: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(text)
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.is_empty())
    }
}

/// Login request body sent to POST /login.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response from POST /login.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub id_token: String,
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_body_is_parsed() {
        let resp = ApiResponse::from_body(r#"{"a":1}"#.to_string());
        assert_eq!(resp, ApiResponse::Json(json!({"a": 1})));
    }

    #[test]
    fn test_plain_text_is_kept_verbatim() {
        let resp = ApiResponse::from_body("plain text".to_string());
        assert_eq!(resp.as_text(), Some("plain text"));
        assert!(resp.as_json().is_none());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            ErrorBody::extract_message(r#"{"message":"not found"}"#),
            Some("not found".to_string())
        );
        assert_eq!(ErrorBody::extract_message(r#"{"message":""}"#), None);
        assert_eq!(ErrorBody::extract_message(r#"{"error":"nope"}"#), None);
        assert_eq!(ErrorBody::extract_message("<html>oops</html>"), None);
        assert_eq!(ErrorBody::extract_message("[1,2]"), None);
    }

    #[test]
    fn test_decode_login_response() {
        let resp = ApiResponse::Json(json!({
            "id_token": "id",
            "access_token": "access",
            "refresh_token": "refresh"
        }));
        let login: LoginResponse = resp.decode().unwrap();
        assert_eq!(login.id_token, "id");
        assert_eq!(login.refresh_token, "refresh");
    }

    #[test]
    fn test_decode_text_fails() {
        let resp = ApiResponse::Text("pong".to_string());
        let err = resp.decode::<LoginResponse>().unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }
}
