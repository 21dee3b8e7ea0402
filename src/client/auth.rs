//! Auth material for admin endpoints.
//!
//! Admin requests carry a short-lived signed token; producing that token
//! (signing a JWT from the admin key) is an external collaborator's job,
//! abstracted behind [`TokenProvider`]. The framework only caches and
//! forwards the opaque string.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use tokio::sync::RwLock;

use crate::error::ClientError;

/// Signed tokens are short-lived; refresh this much before expiry so a
/// token never expires mid-request.
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(30);

/// Conservative default TTL when the provider does not report expiry.
/// Admin tokens are signed for five minutes.
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(5 * 60);

/// Produces signed admin tokens. Object-safe: implementations return a
/// boxed future.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> BoxFuture<'_, Result<String, ClientError>>;
}

/// Fixed token, for tests and pre-signed CLI use.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn token(&self) -> BoxFuture<'_, Result<String, ClientError>> {
        Box::pin(async move { Ok(self.token.clone()) })
    }
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Caching wrapper around another provider. Returns the cached token while
/// it is still valid, refreshes ahead of expiry.
pub struct CachedTokenProvider {
    inner: Arc<dyn TokenProvider>,
    ttl: Duration,
    cache: RwLock<Option<CachedToken>>,
}

impl CachedTokenProvider {
    pub fn new(inner: Arc<dyn TokenProvider>) -> Self {
        Self::with_ttl(inner, DEFAULT_TOKEN_TTL)
    }

    pub fn with_ttl(inner: Arc<dyn TokenProvider>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cache: RwLock::new(None),
        }
    }

    async fn fetch(&self) -> Result<String, ClientError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.token.clone());
                }
                tracing::debug!("cached admin token expired, refreshing");
            }
        }

        let token = self.inner.token().await?;
        let expires_at = Instant::now() + self.ttl.saturating_sub(TOKEN_EXPIRY_BUFFER);
        {
            let mut cache = self.cache.write().await;
            *cache = Some(CachedToken {
                token: token.clone(),
                expires_at,
            });
        }
        Ok(token)
    }
}

impl TokenProvider for CachedTokenProvider {
    fn token(&self) -> BoxFuture<'_, Result<String, ClientError>> {
        Box::pin(self.fetch())
    }
}
