//! Schema-validated client framework for Ghost-style CMS REST APIs.
//!
//! Given a declarative description of a resource's shape (field schema,
//! identity fields, includable relations, create/update payload shapes),
//! the framework produces a runtime-validated client surface for that
//! resource: browse with filter/order/paging and cursor pagination, read
//! by identity, create, update and delete - without hand-written
//! per-resource request/response code.
//!
//! # Example
//!
//! ```ignore
//! use ghost_api::{ApiComposer, BrowseParams, Credentials};
//!
//! async fn titles() -> anyhow::Result<Vec<String>> {
//!     let credentials = Credentials::content("https://demo.ghost.io", "<key>")?;
//!     let posts = ApiComposer::for_resource("posts", credentials)?;
//!     let mut cursor = posts
//!         .browse(Some(BrowseParams::new().order("published_at DESC")))?
//!         .paginate()
//!         .await?;
//!     let mut titles = Vec::new();
//!     loop {
//!         if let ghost_api::ApiOutcome::Success(page) = &cursor.current {
//!             titles.extend(page.iter().filter_map(|p| {
//!                 p["title"].as_str().map(str::to_string)
//!             }));
//!         }
//!         match cursor.next().await? {
//!             Some(next) => cursor = next,
//!             None => break,
//!         }
//!     }
//!     Ok(titles)
//! }
//! ```
//!
//! Errors come in three disjoint classes: pre-flight validation
//! ([`ValidationError`]), server-declared business failures (data:
//! [`ApiOutcome::Failure`]) and transport/contract errors
//! ([`ClientError`]). See [`error`] for the taxonomy.

pub mod client;
pub mod composer;
pub mod config;
pub mod envelope;
pub mod error;
pub mod fetchers;
pub mod query;
pub mod registry;
pub mod schema;

pub use client::{CachedTokenProvider, Credentials, Endpoint, StaticTokenProvider, TokenProvider};
pub use composer::{ApiComposer, ComposerView, Operation};
pub use envelope::{ApiError, ApiOutcome, Pagination};
pub use error::{ClientError, ValidationError};
pub use fetchers::{BrowseFetcher, DeleteFetcher, MutationFetcher, PageCursor, ReadFetcher};
pub use query::{BrowseParams, Limit};
pub use schema::{Identity, SchemaSet};
