//! # Matching Module
//!
//! This module implements the track resolution core: given a track or
//! release from the Discogs collection, find the best matching entry in the
//! Tidal catalog. The two catalogs disagree on title and artist spelling,
//! bracketed annotations, remix suffixes and featuring-artist conventions,
//! and the same logical track may be indexed as a single-disc entry on one
//! side and an EP or compilation entry on the other, so matching is a
//! best-effort heuristic with tunable thresholds rather than a
//! deterministic join.
//!
//! ## Pipeline
//!
//! ```text
//! Track (Discogs)
//!     ↓
//! Query Planning (query)
//!     ├── progressively looser search queries, most specific first
//!     ↓
//! Remote Search (tidal, via CatalogSearch)
//!     ↓
//! Candidate Scoring (scorer)
//!     ├── artist-first filter, then title filter
//!     ├── combined score with mode-dependent weighting
//!     └── position bonus for aligned track numbers
//!     ↓
//! Resolution (resolver)
//!     ├── per-track individual resolution
//!     └── album backfill for under-resolved releases
//! ```
//!
//! ## Scoring Modes
//!
//! The scorer supports two weighting modes because its call sites trust
//! different evidence:
//!
//! - **Cold search** - nothing is known about the candidate beyond the
//!   search result itself. Artist and title similarity contribute equally
//!   and thresholds are strict.
//! - **Album context** - the candidate comes from the tracklist of an
//!   already-confirmed album match, so title precision is privileged
//!   (70/30 weighting) and the title threshold is relaxed.
//!
//! All thresholds are named fields on [`scorer::MatchThresholds`] and are
//! policy, not load-bearing constants.
//!
//! ## Album Backfill
//!
//! Cold per-track search underperforms on compilations and EPs because
//! artist metadata is often release-level rather than track-level. When
//! more than half of a release's tracks resolve individually, the resolver
//! searches for the complete release on Tidal, fetches its tracklist once,
//! and re-matches the remaining tracks against that tracklist only. An
//! already-accepted individual match is never downgraded by the backfill
//! pass.

pub mod query;
pub mod resolver;
pub mod scorer;
