//! Deletion by id.

use reqwest::Method;
use url::Url;

use super::basic::BasicFetcher;
use crate::envelope::{self, ApiOutcome};
use crate::error::ClientError;

/// Issues one `DELETE {resource}/{id}/`. Deletion responses carry no
/// entity payload; an empty success body still yields a well-formed
/// outcome.
pub struct DeleteFetcher {
    base: BasicFetcher,
    id: String,
}

impl DeleteFetcher {
    pub(crate) fn new(base: BasicFetcher, id: String) -> Self {
        Self { base, id }
    }

    pub fn url(&self) -> Url {
        let mut url = self.base.url_with_query(&[]);
        url.set_path(&format!("{}{}/", self.base.url().path(), self.id));
        url
    }

    pub async fn submit(&self) -> Result<ApiOutcome<()>, ClientError> {
        let raw = self
            .base
            .execute(Method::DELETE, self.url(), None)
            .await?;
        envelope::parse_deletion(&raw, self.base.resource())
    }
}
