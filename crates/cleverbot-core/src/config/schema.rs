//! Typed client configuration.
//!
//! JSON on disk uses camelCase keys.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::protocol::{DEFAULT_BASE_URL, ENDPOINT_PATH};

/// HTTP verb used for the conversational request.
///
/// The service has been seen to accept the form body on either.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestMethod {
    #[default]
    Get,
    Post,
}

impl FromStr for RequestMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(RequestMethod::Get),
            "post" => Ok(RequestMethod::Post),
            other => Err(format!("unsupported request method '{other}'")),
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestMethod::Get => f.write_str("GET"),
            RequestMethod::Post => f.write_str("POST"),
        }
    }
}

// ─────────────────────────────────────────────
// ClientConfig
// ─────────────────────────────────────────────

/// Settings for one client instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    /// Scheme and host of the service, e.g. `http://www.cleverbot.com`.
    pub base_url: String,
    /// Timeout for every HTTP request, in seconds.
    pub timeout_secs: u64,
    /// Verb used for the conversational request.
    pub method: RequestMethod,
    /// Fetch the root page once on construction to collect cookies.
    pub bootstrap: bool,
    /// Resume a tracked session with this id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Replaces the default browser User-Agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            method: RequestMethod::Get,
            bootstrap: true,
            session_id: None,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Config pointed at another origin (mock servers, proxies).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Full URL of the conversational endpoint.
    pub fn endpoint_url(&self) -> String {
        format!("{}{}", self.root_url().trim_end_matches('/'), ENDPOINT_PATH)
    }

    /// Root page of the service, with a trailing slash. Also the `Referer`.
    pub fn root_url(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint_url(), "http://www.cleverbot.com/webservicemin");
        assert_eq!(config.root_url(), "http://www.cleverbot.com/");
    }

    #[test]
    fn test_trailing_slash_base() {
        let config = ClientConfig::with_base_url("http://127.0.0.1:8080/");
        assert_eq!(config.endpoint_url(), "http://127.0.0.1:8080/webservicemin");
        assert_eq!(config.root_url(), "http://127.0.0.1:8080/");
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("GET".parse::<RequestMethod>().unwrap(), RequestMethod::Get);
        assert_eq!("post".parse::<RequestMethod>().unwrap(), RequestMethod::Post);
        assert!("put".parse::<RequestMethod>().is_err());
    }

    #[test]
    fn test_method_serde_lowercase() {
        let json = serde_json::to_string(&RequestMethod::Post).unwrap();
        assert_eq!(json, "\"post\"");
    }
}
