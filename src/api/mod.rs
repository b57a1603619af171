//! API client module for the admin backend.
//!
//! Provides the HTTP client with bearer auth injection, the Keychain-backed
//! token source, and the request/response types shared with the backend.

pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use auth::{KeychainTokenSource, NoToken, TokenSource};
pub use client::{ApiClient, RequestOverrides, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use types::{ApiResponse, LoginResponse};
