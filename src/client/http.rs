//! HTTP transport shared by all fetchers.
//!
//! Deliberately thin: one request in, one parsed JSON body out. HTTP error
//! statuses are not failures at this layer - the body still carries the
//! envelope and the envelope's `errors` list is the discriminator. Only
//! network-level failures (connect, timeout, abort) and unparseable bodies
//! are errors here, and they stay distinct from business outcomes.

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method};
use serde_json::Value;
use url::Url;

use super::credentials::Credentials;
use crate::error::ClientError;

/// Maximum length of a response body to log (avoid logging entire posts
/// or anything sensitive).
const MAX_LOG_BODY_LENGTH: usize = 200;

/// API version pinned on every request.
const ACCEPT_VERSION: &str = "v5.0";

/// Truncate and strip non-printable characters before logging a body.
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };
    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Thin reqwest wrapper.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ClientError> {
        let client = Client::builder()
            .user_agent(concat!("ghost-api/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Send one request and parse the body as JSON. An empty body maps to
    /// `Value::Null` (deletions respond with nothing).
    pub async fn send(
        &self,
        credentials: &Credentials,
        method: Method,
        url: Url,
        body: Option<&Value>,
        resource: &str,
    ) -> Result<Value, ClientError> {
        tracing::debug!("{} {}", method, url.path());

        let mut request = self
            .client
            .request(method, url)
            .header("Accept-Version", ACCEPT_VERSION);
        if let Some(authorization) = credentials.authorization().await? {
            request = request.header(AUTHORIZATION, authorization);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::debug!("API status {}: {}", status, sanitize_for_log(&text));
        }

        if text.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| {
            ClientError::contract(
                resource,
                format!("response is not JSON ({e}): {}", sanitize_for_log(&text)),
            )
        })
    }
}
