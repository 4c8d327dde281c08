//! Error taxonomy for Google Maps calls

use super::transport::TransportError;
use thiserror::Error;

/// Longest response body excerpt carried in an error message
pub const BODY_SNIPPET_LIMIT: usize = 300;

/// Errors raised by [`super::MapsGateway`].
///
/// `Auth` and `MissingApiKey` are credential problems, `Malformed` means the
/// provider answered without the expected top-level key, and everything else
/// is a generic API failure.
#[derive(Debug, Error)]
pub enum MapsError {
    #[error("Google Maps API key missing")]
    MissingApiKey,
    #[error("Authentication error with Google {endpoint}")]
    Auth { endpoint: &'static str },
    #[error("{endpoint} HTTP {status}: {snippet}")]
    Http {
        endpoint: &'static str,
        status: u16,
        snippet: String,
    },
    #[error("Google Maps API error: {message}")]
    Api { message: String },
    #[error("{endpoint} request failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: TransportError,
    },
    #[error("{endpoint} returned invalid JSON: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{endpoint} malformed response: {message}")]
    Malformed {
        endpoint: &'static str,
        message: String,
    },
}

impl MapsError {
    /// Credentials were missing or rejected
    pub fn is_auth(&self) -> bool {
        matches!(self, MapsError::Auth { .. } | MapsError::MissingApiKey)
    }

    /// The response lacked a required top-level key
    pub fn is_malformed(&self) -> bool {
        matches!(self, MapsError::Malformed { .. })
    }

    /// Provider, transport, timeout or decoding failure
    pub fn is_generic(&self) -> bool {
        !self.is_auth() && !self.is_malformed()
    }

    pub(crate) fn http(endpoint: &'static str, status: u16, body: &str) -> Self {
        MapsError::Http {
            endpoint,
            status,
            snippet: snippet(body),
        }
    }
}

/// First [`BODY_SNIPPET_LIMIT`] characters of a response body
pub fn snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_LIMIT).collect()
}
