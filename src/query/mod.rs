//! Browse parameter validation and query-string encoding.
//!
//! Everything here is pure: parameters are checked against the resource and
//! include schemas, then rendered to URL-safe query pairs. Filter and order
//! expressions get a syntactic check only - the server evaluates them, the
//! client just refuses to send expressions that reference unknown fields or
//! are not well-formed.

mod filter;
mod order;
mod params;

pub use params::{BrowseParams, Limit};

pub(crate) use filter::check_filter;
pub(crate) use order::check_order;
