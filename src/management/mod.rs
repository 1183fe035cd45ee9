//! # Management Module
//!
//! Persistent state for the sync CLI: the release resolution cache, the
//! playlist name-to-id mapping and the audit log of past runs. Everything
//! is stored as pretty-printed JSON under the platform-specific local data
//! directory (`~/.local/share/discosync/` on Linux) so repeated runs are
//! cheap and inspectable.
//!
//! Every manager can be rooted at an explicit base directory, which the
//! integration tests use to keep state out of the real data directory.

mod audit;
mod playlist_map;
mod release_cache;

pub use audit::{AuditError, AuditLogManager, AuditRecord};
pub use playlist_map::{PlaylistMapError, PlaylistMapManager};
pub use release_cache::{ReleaseCacheError, ReleaseCacheManager};

use std::path::PathBuf;

pub(crate) fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("discosync");
    path
}
