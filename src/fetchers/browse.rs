//! Multi-entity retrieval with filter/order/paging, and the forward-only
//! pagination cursor.

use reqwest::Method;
use serde_json::Value;

use super::basic::BasicFetcher;
use crate::envelope::{self, ApiOutcome, Pagination};
use crate::error::ClientError;
use crate::query::BrowseParams;

/// Fetches one page of a resource listing. Parameters were validated
/// before construction; the fetcher only encodes and executes.
#[derive(Debug, Clone)]
pub struct BrowseFetcher {
    base: BasicFetcher,
    params: BrowseParams,
}

impl BrowseFetcher {
    pub(crate) fn new(base: BasicFetcher, params: BrowseParams) -> Self {
        Self { base, params }
    }

    pub fn resource(&self) -> &str {
        self.base.resource()
    }

    pub fn params(&self) -> &BrowseParams {
        &self.params
    }

    pub fn url(&self) -> url::Url {
        self.base.url_with_query(&self.params.encode())
    }

    /// Fetch this page only.
    pub async fn fetch(&self) -> Result<ApiOutcome<Vec<Value>>, ClientError> {
        let raw = self.base.execute(Method::GET, self.url(), None).await?;
        envelope::parse_collection(
            &raw,
            self.base.resource(),
            &self.base.schema_set().schema,
            &self.params.fields,
        )
    }

    /// Fetch this page and wrap it in a cursor over the remaining pages.
    pub async fn paginate(&self) -> Result<PageCursor, ClientError> {
        let raw = self.base.execute(Method::GET, self.url(), None).await?;
        let current = envelope::parse_collection(
            &raw,
            self.base.resource(),
            &self.base.schema_set().schema,
            &self.params.fields,
        )?;
        let meta = envelope::pagination(&raw);

        // A next step exists exactly when the server declared a next page.
        let next = match (&current, meta.as_ref().and_then(|m| m.next)) {
            (ApiOutcome::Success(_), Some(next_page)) => {
                let next_page = u32::try_from(next_page).map_err(|_| {
                    ClientError::contract(
                        self.base.resource(),
                        format!("next page {next_page} out of range"),
                    )
                })?;
                let mut params = self.params.clone();
                params.page = Some(next_page);
                Some(BrowseFetcher::new(self.base.clone(), params))
            }
            _ => None,
        };

        Ok(PageCursor {
            current,
            meta,
            next,
        })
    }
}

/// Forward-only handle over successive pages of a browse result.
///
/// Holds the current page's outcome plus, when the server declared a next
/// page, the fetcher that produces it. Driving [`PageCursor::next`] until
/// it returns `None` visits every page exactly once, in ascending order -
/// each step's page number comes from the prior response's metadata, so
/// pages cannot be fetched speculatively.
#[derive(Debug)]
pub struct PageCursor {
    /// Outcome of the page this cursor was produced from.
    pub current: ApiOutcome<Vec<Value>>,
    /// Paging metadata from the raw envelope, when present.
    pub meta: Option<Pagination>,
    next: Option<BrowseFetcher>,
}

impl PageCursor {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Fetch the next page, or `None` when the last response declared no
    /// next page.
    pub async fn next(&self) -> Result<Option<PageCursor>, ClientError> {
        match &self.next {
            Some(fetcher) => Ok(Some(fetcher.paginate().await?)),
            None => Ok(None),
        }
    }
}
