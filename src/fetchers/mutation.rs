//! Create and update requests.

use reqwest::Method;
use serde_json::{json, Map, Value};
use url::Url;

use super::basic::BasicFetcher;
use crate::envelope::{self, ApiOutcome};
use crate::error::ClientError;

/// Submits one create (`POST`) or update (`PUT {id}/`) request. The payload
/// was validated against the create/update schema before construction.
pub struct MutationFetcher {
    base: BasicFetcher,
    method: Method,
    id: Option<String>,
    payload: Map<String, Value>,
    options: Vec<(String, String)>,
}

impl MutationFetcher {
    pub(crate) fn create(
        base: BasicFetcher,
        payload: Map<String, Value>,
        options: Vec<(String, String)>,
    ) -> Self {
        Self {
            base,
            method: Method::POST,
            id: None,
            payload,
            options,
        }
    }

    pub(crate) fn update(base: BasicFetcher, id: String, payload: Map<String, Value>) -> Self {
        Self {
            base,
            method: Method::PUT,
            id: Some(id),
            payload,
            options: Vec::new(),
        }
    }

    pub fn url(&self) -> Url {
        let mut url = self.base.url_with_query(&self.options);
        if let Some(id) = &self.id {
            url.set_path(&format!("{}{id}/", self.base.url().path()));
        }
        url
    }

    /// The wire body: the API expects the payload wrapped in a one-element
    /// array under the resource name.
    fn body(&self) -> Value {
        json!({ self.base.resource(): [Value::Object(self.payload.clone())] })
    }

    pub async fn submit(&self) -> Result<ApiOutcome<Value>, ClientError> {
        let raw = self
            .base
            .execute(self.method.clone(), self.url(), Some(&self.body()))
            .await?;
        envelope::parse_single(&raw, self.base.resource(), &self.base.schema_set().schema, &[])
    }
}
