//! OpenAI client configuration with sensible defaults.

use crate::error::{Result, VidchatError};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for OpenAI API requests (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an OpenAI client with a custom timeout.
pub fn create_client_with_timeout(api_key: &str, timeout: Duration) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    let config = OpenAIConfig::new().with_api_key(api_key);
    Ok(Client::with_config(config).with_http_client(http_client))
}

/// Build a client if a key is available, otherwise remember why it is not.
///
/// Services hold the outcome and report the configuration error on first use,
/// so a missing key fails individual requests instead of process startup.
pub fn lazy_client(
    api_key: Option<&str>,
    timeout: Duration,
) -> std::result::Result<Client<OpenAIConfig>, String> {
    match api_key {
        Some(key) if !key.trim().is_empty() => {
            create_client_with_timeout(key, timeout).map_err(|e| e.to_string())
        }
        _ => Err("OPENAI_API_KEY not set. Set it in the environment, a .env file, or [openai] api_key".to_string()),
    }
}

/// Turn a deferred client error into the library error type.
pub fn client_or_config_error(
    client: &std::result::Result<Client<OpenAIConfig>, String>,
) -> Result<&Client<OpenAIConfig>> {
    client
        .as_ref()
        .map_err(|msg| VidchatError::Config(msg.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_deferred() {
        let client = lazy_client(None, Duration::from_secs(1));
        assert!(client.is_err());
        assert!(matches!(
            client_or_config_error(&client),
            Err(VidchatError::Config(_))
        ));

        let blank = lazy_client(Some("   "), Duration::from_secs(1));
        assert!(blank.is_err());
    }

    #[test]
    fn test_client_with_key() {
        let client = lazy_client(Some("sk-test"), Duration::from_secs(1));
        assert!(client_or_config_error(&client).is_ok());
    }
}
