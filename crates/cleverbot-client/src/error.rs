//! Error taxonomy of the HTTP side.

use thiserror::Error;

/// Cookie `(name, value)` pairs in the order the service set them.
pub type SetCookies = Vec<(String, String)>;

/// The HTTP exchange itself failed.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connect, timeout or body read failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    ///
    /// `cookies` holds everything set along the way, error page included.
    #[error("service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
        cookies: SetCookies,
    },

    /// A redirect chain could not be followed.
    #[error("redirect failed: {reason}")]
    Redirect { reason: String, cookies: SetCookies },
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Request(e) if e.is_timeout())
    }

    /// Cookies the service set before the exchange failed.
    pub fn cookies(&self) -> &[(String, String)] {
        match self {
            TransportError::Request(_) => &[],
            TransportError::Status { cookies, .. } | TransportError::Redirect { cookies, .. } => {
                cookies
            }
        }
    }
}

/// The one-time root page fetch used to collect initial cookies failed.
#[derive(Debug, Error)]
#[error("cookie bootstrap failed: {0}")]
pub struct BootstrapError(#[from] pub TransportError);

/// A client could not be constructed from its configuration.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid header value for {name}")]
    InvalidHeader { name: &'static str },

    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}
