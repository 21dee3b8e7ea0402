//! Request fetchers.
//!
//! Each operation gets its own fetcher built around a shared
//! [`BasicFetcher`] core that owns target URL resolution and the
//! execute-then-validate step:
//!
//! - [`basic`] - URL construction, introspection, single-shot execute
//! - [`read`] - single-entity retrieval by identity, with format selectors
//! - [`browse`] - multi-entity retrieval with filter/order/paging and the
//!   forward-only [`PageCursor`](browse::PageCursor)
//! - [`mutation`] - create (`POST`) and update (`PUT`)
//! - [`delete`] - deletion by id, tolerating empty success bodies
//!
//! Fetchers are one-shot values: constructed pre-validated, executed, then
//! consumed. Nothing on a fetcher mutates after construction, so sharing
//! one across concurrent calls is safe but pointless.

pub mod basic;
pub mod browse;
pub mod delete;
pub mod mutation;
pub mod read;

pub use basic::BasicFetcher;
pub use browse::{BrowseFetcher, PageCursor};
pub use delete::DeleteFetcher;
pub use mutation::MutationFetcher;
pub use read::ReadFetcher;
