//! # CLI Module
//!
//! User-facing commands for the Discogs to Tidal sync CLI. Each command is
//! a free async function that owns its user interaction (progress feedback,
//! tables, colored status lines) and delegates the actual work to the
//! `discogs`, `matching`, `tidal` and `management` modules.
//!
//! ## Commands
//!
//! - [`sync`] - Reconciles a collection folder into one or more Tidal
//!   playlists. This is the main entry point: it enumerates the folder,
//!   resolves every release against the Tidal catalog (consulting the
//!   release cache first), converges the target playlist, and records the
//!   run in the audit log.
//! - [`folders`] - Lists the user's Discogs collection folders.
//! - [`info`] - Shows local state: playlist mappings, cache statistics and
//!   recent runs.
//! - [`cache`] - Inspects or clears the release resolution cache.
//!
//! ## Error Presentation
//!
//! Commands never return errors. Recoverable problems (a single release
//! failing to fetch, a track the store rejects) are reported with
//! `warning!` and the run continues; unrecoverable ones (no credentials,
//! source catalog unreachable) terminate via `error!`.

mod cache;
mod folders;
mod info;
mod sync;

pub use cache::cache;
pub use folders::folders;
pub use info::info;
pub use sync::sync;
