//! API client plumbing: credentials, auth material and the HTTP transport.
//!
//! # Module Structure
//!
//! - [`auth`] - token providers for admin endpoints, with caching
//! - [`credentials`] - site URL + endpoint kind + auth material binding
//! - [`http`] - thin reqwest wrapper shared by all fetchers

pub mod auth;
pub mod credentials;
pub mod http;

pub use auth::{CachedTokenProvider, StaticTokenProvider, TokenProvider};
pub use credentials::{Credentials, Endpoint};
pub use http::HttpTransport;
