//! Token source backed by the OS credential store.
//!
//! Uses the `keyring` crate. The API client only ever reads the token; the
//! login and logout commands are the only writers.

use keyring::Entry;
use thiserror::Error;

/// Default keychain service name.
pub const DEFAULT_SERVICE_NAME: &str = "adminkit";

/// Fixed key the id token is stored under.
pub const TOKEN_KEY: &str = "idToken";

#[derive(Debug, Error)]
pub enum KeychainError {
    #[error("Keychain operation failed: {0}")]
    OperationFailed(String),
}

impl From<keyring::Error> for KeychainError {
    fn from(err: keyring::Error) -> Self {
        KeychainError::OperationFailed(err.to_string())
    }
}

/// Supplies the current bearer token, if any.
///
/// Implementations must not fail: anything that goes wrong reading the
/// underlying store is reported as "no token".
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Option<String>;
}

impl<F> TokenSource for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<String> {
        self()
    }
}

/// Anonymous requests only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoToken;

impl TokenSource for NoToken {
    fn token(&self) -> Option<String> {
        None
    }
}

/// Reads the id token from the keychain on every call.
///
/// Nothing is cached, so a re-login by another process is picked up by the
/// next request.
#[derive(Debug, Clone)]
pub struct KeychainTokenSource {
    service: String,
}

impl KeychainTokenSource {
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }
}

impl Default for KeychainTokenSource {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_NAME)
    }
}

impl TokenSource for KeychainTokenSource {
    fn token(&self) -> Option<String> {
        match get_token(&self.service) {
            Ok(token) => token,
            Err(e) => {
                log::warn!("Failed to read token from Keychain: {}", e);
                None
            }
        }
    }
}

/// Retrieve the id token for the given service.
///
/// Returns `None` if no entry exists (never logged in, or logged out).
pub fn get_token(service: &str) -> Result<Option<String>, KeychainError> {
    let entry = Entry::new(service, TOKEN_KEY)?;
    match entry.get_password() {
        Ok(token) if !token.is_empty() => Ok(Some(token)),
        Ok(_) => Ok(None),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(KeychainError::from(e)),
    }
}

/// Store the id token for the given service, replacing any previous one.
pub fn store_token(service: &str, token: &str) -> Result<(), KeychainError> {
    let entry = Entry::new(service, TOKEN_KEY)?;
    entry.set_password(token)?;
    Ok(())
}

/// Delete the id token for the given service.
///
/// Idempotent: ignores `NoEntry` error (already deleted or never stored).
pub fn delete_token(service: &str) -> Result<(), KeychainError> {
    let entry = Entry::new(service, TOKEN_KEY)?;
    match entry.delete_credential() {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(KeychainError::from(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_no_token_is_anonymous() {
        assert_eq!(NoToken.token(), None);
    }

    #[test]
    fn test_closure_source_is_reread_each_call() {
        let current = std::sync::Arc::new(Mutex::new(Some("first".to_string())));
        let shared = current.clone();
        let source = move || shared.lock().unwrap().clone();

        assert_eq!(source.token().as_deref(), Some("first"));

        *current.lock().unwrap() = Some("rotated".to_string());
        assert_eq!(source.token().as_deref(), Some("rotated"));

        *current.lock().unwrap() = None;
        assert_eq!(source.token(), None);
    }

    #[test]
    fn test_keychain_error_message() {
        let err = KeychainError::from(keyring::Error::NoEntry);
        assert!(err.to_string().starts_with("Keychain operation failed"));
    }
}
