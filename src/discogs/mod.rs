//! # Discogs Module
//!
//! Client for the source catalog: the user's Discogs record collection.
//! Authentication uses a personal access token passed via the
//! `Authorization: Discogs token=...` header; Discogs additionally requires
//! a descriptive `User-Agent` on every request.
//!
//! The module is split by concern:
//!
//! - `collection` - collection folders and paginated release enumeration
//! - `release` - full release fetch and conversion into the domain model
//!
//! Rate limiting (60 requests/minute for authenticated clients) is handled
//! by honoring the `Retry-After` header on 429 responses.

pub mod collection;
pub mod release;

use reqwest::Client;

pub(crate) const USER_AGENT: &str = concat!("discosync/", env!("CARGO_PKG_VERSION"));

pub(crate) fn client() -> Result<Client, reqwest::Error> {
    Client::builder().user_agent(USER_AGENT).build()
}
