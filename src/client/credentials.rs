//! Endpoint credentials and target URL construction.

use std::fmt;
use std::sync::Arc;

use url::Url;

use super::auth::TokenProvider;
use crate::error::ClientError;

/// API surface a credential is bound to. Content endpoints authenticate
/// with a static key carried as a query parameter; admin endpoints with a
/// signed token carried as a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Admin,
    Content,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Admin => "admin",
            Endpoint::Content => "content",
        }
    }
}

enum AuthMaterial {
    ContentKey(String),
    AdminToken(Arc<dyn TokenProvider>),
}

/// One site's credentials: origin, endpoint kind and auth material. Fixed
/// at construction; fetchers resolve their target URL from this once.
#[derive(Clone)]
pub struct Credentials {
    url: Url,
    endpoint: Endpoint,
    auth: Arc<AuthMaterial>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Auth material is deliberately not printed.
        f.debug_struct("Credentials")
            .field("url", &self.url.as_str())
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl Credentials {
    /// Content-endpoint credentials with a static key.
    pub fn content(url: &str, key: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self {
            url: parse_origin(url)?,
            endpoint: Endpoint::Content,
            auth: Arc::new(AuthMaterial::ContentKey(key.into())),
        })
    }

    /// Admin-endpoint credentials with an externally produced signed token.
    pub fn admin(url: &str, provider: Arc<dyn TokenProvider>) -> Result<Self, ClientError> {
        Ok(Self {
            url: parse_origin(url)?,
            endpoint: Endpoint::Admin,
            auth: Arc::new(AuthMaterial::AdminToken(provider)),
        })
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// Resolve the base URL for one resource:
    /// `{origin}/ghost/api/{endpoint}/{resource}/`, plus the `key` query
    /// parameter on content endpoints.
    pub fn resource_url(&self, resource: &str) -> Url {
        let mut url = self.url.clone();
        url.set_path(&format!(
            "/ghost/api/{}/{}/",
            self.endpoint.as_str(),
            resource
        ));
        if let AuthMaterial::ContentKey(key) = self.auth.as_ref() {
            url.query_pairs_mut().append_pair("key", key);
        }
        url
    }

    /// Header value for admin requests, `None` on content endpoints.
    pub(crate) async fn authorization(&self) -> Result<Option<String>, ClientError> {
        match self.auth.as_ref() {
            AuthMaterial::ContentKey(_) => Ok(None),
            AuthMaterial::AdminToken(provider) => {
                let token = provider.token().await?;
                Ok(Some(format!("Ghost {token}")))
            }
        }
    }
}

fn parse_origin(url: &str) -> Result<Url, ClientError> {
    Url::parse(url).map_err(|e| ClientError::Auth(format!("invalid site url '{url}': {e}")))
}
