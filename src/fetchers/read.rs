//! Single-entity retrieval by identity.

use reqwest::Method;
use serde_json::Value;
use url::Url;

use super::basic::BasicFetcher;
use crate::envelope::{self, ApiOutcome};
use crate::error::ClientError;
use crate::schema::Identity;

/// Fetches one entity, addressed by id, slug or email. The identity was
/// validated against the resource's identity schema before construction.
#[derive(Debug, Clone)]
pub struct ReadFetcher {
    base: BasicFetcher,
    identity: Identity,
    formats: Vec<String>,
    fields: Vec<String>,
    include: Vec<String>,
}

impl ReadFetcher {
    pub(crate) fn new(base: BasicFetcher, identity: Identity) -> Self {
        Self {
            base,
            identity,
            formats: Vec::new(),
            fields: Vec::new(),
            include: Vec::new(),
        }
    }

    /// Request rendered output formats alongside the structured fields
    /// (e.g. `html`, `plaintext`).
    pub fn formats(mut self, formats: &[&str]) -> Self {
        self.formats = formats.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Narrow the response to the given fields. Validated by the composer
    /// before the fetcher is handed out, so this is not re-checked here.
    pub(crate) fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    pub(crate) fn with_include(mut self, include: Vec<String>) -> Self {
        self.include = include;
        self
    }

    pub fn resource(&self) -> &str {
        self.base.resource()
    }

    /// Identity routing: ids live directly under the resource root, other
    /// identity kinds get a discriminating path segment.
    pub fn url(&self) -> Url {
        let mut pairs = Vec::new();
        if !self.formats.is_empty() {
            pairs.push(("formats".to_string(), self.formats.join(",")));
        }
        if !self.fields.is_empty() {
            pairs.push(("fields".to_string(), self.fields.join(",")));
        }
        if !self.include.is_empty() {
            pairs.push(("include".to_string(), self.include.join(",")));
        }
        let mut url = self.base.url_with_query(&pairs);
        let segment = match &self.identity {
            Identity::Id(id) => format!("{id}/"),
            Identity::Slug(slug) => format!("slug/{slug}/"),
            Identity::Email(email) => format!("email/{email}/"),
        };
        url.set_path(&format!("{}{segment}", self.base.url().path()));
        url
    }

    pub async fn fetch(&self) -> Result<ApiOutcome<Value>, ClientError> {
        let raw = self.base.execute(Method::GET, self.url(), None).await?;
        envelope::parse_single(
            &raw,
            self.base.resource(),
            &self.base.schema_set().schema,
            &self.fields,
        )
    }
}
