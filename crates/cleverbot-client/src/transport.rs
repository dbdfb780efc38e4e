//! HTTP transport for the Cleverbot endpoint.
//!
//! The service gates access partly on header shape, so every request carries
//! the same browser-like header set, with `Host` and `Referer` derived from
//! the configured origin. Cookies are not kept here: the caller passes its
//! jar in and receives the response cookies back.

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use tracing::debug;
use url::Url;

use cleverbot_core::protocol;
use cleverbot_core::{ClientConfig, CookieJar, RequestMethod, RequestPayload};

use crate::error::{BootstrapError, ClientError, SetCookies, TransportError};

/// Hops followed before a redirect chain is abandoned.
const MAX_REDIRECTS: usize = 10;

/// Raw result of a successful exchange.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Exchange {
    pub body: String,
    /// `Set-Cookie` pairs of every hop, in the order they were received.
    pub cookies: SetCookies,
}

// ─────────────────────────────────────────────
// Trait
// ─────────────────────────────────────────────

/// The two HTTP exchanges a conversation needs.
#[async_trait]
pub trait ServiceTransport: Send + Sync {
    /// Unauthenticated GET of the root page, returning the cookies it set.
    ///
    /// On failure, cookies set before the error are in
    /// [`TransportError::cookies`].
    async fn fetch_root(&self) -> Result<SetCookies, BootstrapError>;

    /// Send a sealed payload with the given cookies attached.
    async fn exchange(
        &self,
        payload: &RequestPayload,
        cookies: &CookieJar,
    ) -> Result<Exchange, TransportError>;
}

// ─────────────────────────────────────────────
// HttpTransport
// ─────────────────────────────────────────────

/// `reqwest`-backed transport.
///
/// Redirects are followed here rather than by reqwest so that cookies set on
/// every hop reach the jar.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
    root: Url,
    method: Method,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint.as_str())
            .field("method", &self.method)
            .finish()
    }
}

/// Final response of a redirect chain.
struct Fetched {
    status: StatusCode,
    body: String,
    cookies: SetCookies,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason,
        };
        let root = Url::parse(&config.root_url()).map_err(|e| invalid(e.to_string()))?;
        if root.host_str().is_none() {
            return Err(invalid("no host".to_string()));
        }
        let endpoint = Url::parse(&config.endpoint_url()).map_err(|e| invalid(e.to_string()))?;

        let client = reqwest::Client::builder()
            .default_headers(browser_headers(config)?)
            .redirect(reqwest::redirect::Policy::none())
            .timeout(config.timeout())
            .build()?;

        let method = match config.method {
            RequestMethod::Get => Method::GET,
            RequestMethod::Post => Method::POST,
        };

        Ok(HttpTransport {
            client,
            endpoint,
            root,
            method,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Send one request and follow redirects by hand, collecting the cookies
    /// of every hop and attaching them to the next one.
    ///
    /// 301/302/303 continue as a bodyless GET; 307/308 repeat the request.
    async fn fetch(
        &self,
        method: Method,
        url: &Url,
        form: Option<String>,
        cookies: &CookieJar,
    ) -> Result<Fetched, TransportError> {
        let mut jar = cookies.clone();
        let mut harvested = SetCookies::new();
        let (mut method, mut url, mut form) = (method, url.clone(), form);

        for _ in 0..=MAX_REDIRECTS {
            let mut request = self.client.request(method.clone(), url.clone());
            if let Some(host) = host_header(&url) {
                request = request.header(header::HOST, host);
            }
            if let Some(cookie) = cookie_header(&jar) {
                request = request.header(header::COOKIE, cookie);
            }
            if let Some(ref body) = form {
                request = request
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(body.clone());
            }

            let response = request.send().await?;
            let status = response.status();
            let hop = response_cookies(&response);
            jar.extend(hop.iter().cloned());
            harvested.extend(hop);

            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(String::from);

            let location = match location {
                Some(location) if status.is_redirection() => location,
                _ => {
                    let body = if status.is_success() {
                        response.text().await?
                    } else {
                        response.text().await.unwrap_or_default()
                    };
                    return Ok(Fetched {
                        status,
                        body,
                        cookies: harvested,
                    });
                }
            };

            url = match url.join(&location) {
                Ok(next) => next,
                Err(e) => {
                    return Err(TransportError::Redirect {
                        reason: format!("bad Location '{location}': {e}"),
                        cookies: harvested,
                    })
                }
            };
            debug!(status = %status, location = %url, "following redirect");

            if status != StatusCode::TEMPORARY_REDIRECT && status != StatusCode::PERMANENT_REDIRECT {
                method = Method::GET;
                form = None;
            }
        }

        Err(TransportError::Redirect {
            reason: format!("more than {MAX_REDIRECTS} redirects"),
            cookies: harvested,
        })
    }
}

#[async_trait]
impl ServiceTransport for HttpTransport {
    async fn fetch_root(&self) -> Result<SetCookies, BootstrapError> {
        debug!(url = %self.root, "fetching root page for cookies");

        let fetched = self
            .fetch(Method::GET, &self.root, None, &CookieJar::new())
            .await?;

        if !fetched.status.is_success() {
            return Err(TransportError::Status {
                status: fetched.status,
                body: fetched.body,
                cookies: fetched.cookies,
            }
            .into());
        }

        Ok(fetched.cookies)
    }

    async fn exchange(
        &self,
        payload: &RequestPayload,
        cookies: &CookieJar,
    ) -> Result<Exchange, TransportError> {
        let fetched = self
            .fetch(
                self.method.clone(),
                &self.endpoint,
                Some(payload.encode()),
                cookies,
            )
            .await?;

        if !fetched.status.is_success() {
            return Err(TransportError::Status {
                status: fetched.status,
                body: fetched.body,
                cookies: fetched.cookies,
            });
        }

        debug!(
            status = %fetched.status,
            bytes = fetched.body.len(),
            cookies = fetched.cookies.len(),
            "reply received"
        );

        Ok(Exchange {
            body: fetched.body,
            cookies: fetched.cookies,
        })
    }
}

// ─────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────

/// The fixed header set. `Host` is added per hop by [`host_header`].
fn browser_headers(config: &ClientConfig) -> Result<HeaderMap, ClientError> {
    let referer = config.root_url();
    let user_agent = config.user_agent.as_deref().unwrap_or(protocol::USER_AGENT);

    let entries = [
        (header::USER_AGENT, "User-Agent", user_agent),
        (header::ACCEPT, "Accept", protocol::ACCEPT),
        (header::ACCEPT_CHARSET, "Accept-Charset", protocol::ACCEPT_CHARSET),
        (header::ACCEPT_LANGUAGE, "Accept-Language", protocol::ACCEPT_LANGUAGE),
        (header::CACHE_CONTROL, "Cache-Control", protocol::CACHE_CONTROL),
        (header::REFERER, "Referer", referer.as_str()),
        (header::PRAGMA, "Pragma", protocol::PRAGMA),
    ];

    let mut headers = HeaderMap::new();
    for (name, label, value) in entries {
        let value =
            HeaderValue::from_str(value).map_err(|_| ClientError::InvalidHeader { name: label })?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// `host[:port]` of the URL being requested.
fn host_header(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// `name=value; name=value` for a non-empty jar.
fn cookie_header(cookies: &CookieJar) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }
    Some(
        cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; "),
    )
}

fn response_cookies(response: &reqwest::Response) -> SetCookies {
    response
        .cookies()
        .map(|c| (c.name().to_string(), c.value().to_string()))
        .collect()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
