//! HTTP client with auth header injection and response normalization.
//!
//! Every request re-reads the token source, so concurrent calls never share
//! header state. Success and failure both come back as a single `Result`:
//! `ApiResponse` on 2xx, `ApiError` otherwise.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::Serialize;

use super::auth::TokenSource;
use super::error::ApiError;
use super::types::{ApiResponse, ErrorBody, LoginRequest, LoginResponse};

/// Default backend origin when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Caller-supplied tweaks to a single request.
///
/// An explicit method always wins over the body-based default. Headers are
/// applied first, so `Content-Type` and `Authorization` set here are
/// overwritten by the client.
#[derive(Debug, Clone, Default)]
pub struct RequestOverrides {
    pub method: Option<Method>,
    pub headers: HeaderMap,
}

impl RequestOverrides {
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// HTTP client wrapper for the admin backend.
///
/// Holds the origin and the token source; every path is resolved against
/// the origin.
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl ApiClient {
    /// Create a new API client with the given origin and token source.
    pub fn new(base_url: &str, tokens: Arc<dyn TokenSource>) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a GET request to a relative API path.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.request::<()>(path, None, RequestOverrides::default()).await
    }

    /// Send a POST request with a JSON body to a relative API path.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, ApiError> {
        self.request(path, Some(body), RequestOverrides::default()).await
    }

    /// Log in against the backend and return its tokens.
    ///
    /// Storing the id token is left to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post("/login", &body).await?.decode()
    }

    /// Issue one request and normalize the outcome.
    ///
    /// Method defaults to POST when a body is given and GET otherwise. No
    /// retries; a transport failure is reported as `ApiError::Transport`.
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
        overrides: RequestOverrides,
    ) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let method = overrides.method.unwrap_or(match body {
            Some(_) => Method::POST,
            None => Method::GET,
        });

        let mut headers = overrides.headers;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = self.tokens.token() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                ApiError::Encode {
                    message: format!("invalid token for Authorization header: {}", e),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = self.client.request(method.clone(), &url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(serde_json::to_string(body)?);
        }

        log::debug!("{} {}", method, url);
        let resp = builder.send().await.map_err(|e| {
            log::debug!("{} {} failed: {}", method, url, e);
            ApiError::from(e)
        })?;

        let status = resp.status();
        log::debug!("{} {} -> {}", method, url, status);

        if !status.is_success() {
            let message = match resp.text().await {
                Ok(text) => ErrorBody::extract_message(&text),
                Err(_) => None,
            };
            return Err(match message {
                Some(message) => ApiError::Status {
                    status: status.as_u16(),
                    message,
                },
                None => ApiError::status_fallback(status.as_u16()),
            });
        }

        let text = resp.text().await?;
        Ok(ApiResponse::from_body(text))
    }
}
