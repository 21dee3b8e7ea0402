//! Base fetcher: target URL resolution and the execute-then-validate step
//! every operation shares.

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::client::{Credentials, HttpTransport};
use crate::envelope::{self, ApiOutcome};
use crate::error::ClientError;
use crate::schema::SchemaSet;

/// Common core of all fetchers. The target URL is resolved once at
/// construction and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct BasicFetcher {
    resource: String,
    set: Arc<SchemaSet>,
    credentials: Credentials,
    transport: HttpTransport,
    url: Url,
}

impl BasicFetcher {
    pub(crate) fn new(
        resource: impl Into<String>,
        set: Arc<SchemaSet>,
        credentials: Credentials,
        transport: HttpTransport,
    ) -> Self {
        let resource = resource.into();
        let url = credentials.resource_url(&resource);
        Self {
            resource,
            set,
            credentials,
            transport,
            url,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Declared output field names, for introspection and test assertions.
    pub fn output_fields(&self) -> Vec<&str> {
        self.set.schema.field_names()
    }

    /// The resolved target URL. Useful for debugging; mutating a request
    /// happens through parameters, never through this.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub(crate) fn schema_set(&self) -> &Arc<SchemaSet> {
        &self.set
    }

    /// Copy of the base URL with extra query pairs appended (the `key`
    /// auth parameter is already present on content endpoints).
    pub(crate) fn url_with_query(&self, pairs: &[(String, String)]) -> Url {
        let mut url = self.url.clone();
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in pairs {
                query.append_pair(key, value);
            }
        }
        url
    }

    /// Hand one request to the transport and return the raw envelope.
    pub(crate) async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Value, ClientError> {
        self.transport
            .send(&self.credentials, method, url, body, &self.resource)
            .await
    }

    /// Single-shot fetch of the bare resource root, validated as one
    /// entity. Covers singleton resources that have no identity or paging.
    pub async fn fetch(&self) -> Result<ApiOutcome<Value>, ClientError> {
        let raw = self.execute(Method::GET, self.url.clone(), None).await?;
        envelope::parse_single(&raw, &self.resource, &self.set.schema, &[])
    }
}
