//! Document-retrieval collaborator.
//!
//! The engine only ever consumes document bytes; this module is the thin
//! transport that produces them for [`crate::Resolver::from_url`].
//! Timeout and retry policy live here, never inside the resolution
//! engine.

use std::borrow::Cow;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{ExtractError, Result};

/// User agent string identifying this library.
const USER_AGENT: &str = concat!("docpluck/", env!("CARGO_PKG_VERSION"));

/// HTTP timeout in seconds.
const HTTP_TIMEOUT_SECS: u64 = 30;

/// Maximum number of download attempts per URL.
const MAX_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff (milliseconds).
const BACKOFF_BASE_MS: u64 = 500;

/// Create a configured HTTP client.
///
/// # Errors
/// Returns `Http` if the client cannot be constructed.
pub fn create_client() -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Download a document body as text.
///
/// Transient failures (connect errors, timeouts, 5xx statuses) are
/// retried with exponential backoff; 4xx statuses fail immediately.
///
/// Bodies are decoded as UTF-8. Invalid byte sequences are replaced
/// with U+FFFD rather than rejecting the document, since real-world
/// feeds occasionally carry stray legacy-encoded bytes; the substitution
/// is logged so it can be traced back to the source.
///
/// # Errors
/// Returns `Http` for non-retryable failures and `RetriesExhausted` when
/// every attempt failed transiently.
pub fn download(client: &Client, url: &str) -> Result<String> {
    let mut failure = String::new();

    for attempt in 1..=MAX_ATTEMPTS {
        if attempt > 1 {
            let delay = BACKOFF_BASE_MS << (attempt - 2);
            tracing::debug!(url, attempt, delay_ms = delay, "Backing off before retry");
            thread::sleep(Duration::from_millis(delay));
        }

        let response = match client.get(url).send() {
            Ok(response) => response,
            Err(e) if e.is_connect() || e.is_timeout() => {
                tracing::warn!(
                    url,
                    attempt,
                    max_attempts = MAX_ATTEMPTS,
                    error = %e,
                    "Connection failed, retrying"
                );
                failure = e.to_string();
                continue;
            }
            Err(e) => return Err(ExtractError::Http(e)),
        };

        let status = response.status();
        if status.is_server_error() {
            tracing::warn!(
                url,
                attempt,
                max_attempts = MAX_ATTEMPTS,
                status = %status,
                "Server error, retrying"
            );
            failure = format!("server error: {status}");
            continue;
        }

        let bytes = response.error_for_status()?.bytes()?;
        return Ok(bytes_to_string(&bytes, url));
    }

    Err(ExtractError::RetriesExhausted {
        attempts: MAX_ATTEMPTS,
        message: failure,
    })
}

/// Decode a response body, substituting U+FFFD for invalid UTF-8 and
/// logging when that happens.
fn bytes_to_string(bytes: &[u8], url: &str) -> String {
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(text) => text.to_string(),
        Cow::Owned(text) => {
            tracing::warn!(url, "Response body is not valid UTF-8, decoding lossily");
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_client() {
        assert!(create_client().is_ok());
    }

    #[test]
    fn test_valid_utf8_body_passes_through() {
        assert_eq!(
            bytes_to_string("caf\u{e9}".as_bytes(), "http://example.invalid"),
            "caf\u{e9}"
        );
    }

    #[test]
    fn test_invalid_utf8_body_is_replaced_not_rejected() {
        // 0xE9 is Latin-1 e-acute, not valid on its own in UTF-8.
        let decoded = bytes_to_string(b"caf\xe9 quality", "http://example.invalid");
        assert_eq!(decoded, "caf\u{fffd} quality");
    }
}
