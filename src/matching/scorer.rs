use strsim::normalized_levenshtein;

use crate::{
    types::{TidalAlbum, TidalTrack},
    utils,
};

/// Similarity thresholds and weights used by [`MatchScorer`]. All values
/// live in `0.0..=1.0` similarity space; the defaults are the tuned
/// production values.
#[derive(Debug, Clone, Copy)]
pub struct MatchThresholds {
    /// Minimum artist similarity for a candidate to survive the first
    /// filter stage.
    pub artist_primary: f64,
    /// Relaxed artist floor applied in album context when no candidate
    /// passes `artist_primary`.
    pub artist_album_fallback: f64,
    /// Title floor for cold-search candidates.
    pub title_track: f64,
    /// Relaxed title floor for candidates drawn from a confirmed album
    /// tracklist.
    pub title_album: f64,
    /// Title floor for accepting an album search result.
    pub album_title: f64,
    /// Artist floor for accepting an album search result.
    pub album_artist: f64,
    /// Score bonus when the candidate's track number equals the source
    /// track's position.
    pub position_bonus: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            artist_primary: 0.85,
            artist_album_fallback: 0.5,
            title_track: 0.7,
            title_album: 0.6,
            album_title: 0.8,
            album_artist: 0.8,
            position_bonus: 0.1,
        }
    }
}

/// How much context the scorer may assume about its candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Candidates come from an open catalog search. Artist and title weigh
    /// equally and thresholds are strict.
    ColdSearch,
    /// Candidates come from the tracklist of an already-confirmed album
    /// match. Title similarity is privileged and the artist filter may
    /// fall back to a relaxed floor.
    AlbumContext,
}

/// Centralized two-stage candidate scorer.
///
/// Stage one filters candidates by artist similarity, stage two ranks the
/// survivors by a mode-dependent combination of title and artist
/// similarity. Keeping every similarity decision here means the resolver
/// and the backfill pass cannot drift apart on what "close enough" means.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchScorer {
    pub thresholds: MatchThresholds,
}

impl MatchScorer {
    pub fn new(thresholds: MatchThresholds) -> Self {
        Self { thresholds }
    }

    /// Similarity of two already-cleaned strings in `0.0..=1.0`.
    pub fn similarity(a: &str, b: &str) -> f64 {
        normalized_levenshtein(a, b)
    }

    fn title_similarity(target: &str, candidate: &str) -> f64 {
        Self::similarity(
            &utils::normalize(&utils::clean_title(target)),
            &utils::normalize(&utils::clean_title(candidate)),
        )
    }

    fn artist_similarity(target: &str, candidate: &str) -> f64 {
        Self::similarity(
            &utils::normalize(&utils::clean_artist(target)),
            &utils::normalize(&utils::clean_artist(candidate)),
        )
    }

    /// Picks the best candidate for a target track, or `None` when no
    /// candidate clears both filter stages.
    ///
    /// The artist filter runs first because artist mismatches are the
    /// dominant failure mode of open catalog search. In album context an
    /// empty first pass is retried against the relaxed artist floor before
    /// giving up. Ties keep the earlier candidate, preserving the remote
    /// ranking.
    pub fn best_track_match<'a>(
        &self,
        candidates: &'a [TidalTrack],
        target_title: &str,
        target_artist: &str,
        target_position: Option<u32>,
        mode: MatchMode,
    ) -> Option<&'a TidalTrack> {
        let mut survivors = self.filter_by_artist(candidates, target_artist, self.thresholds.artist_primary);
        if survivors.is_empty() && mode == MatchMode::AlbumContext {
            survivors = self.filter_by_artist(
                candidates,
                target_artist,
                self.thresholds.artist_album_fallback,
            );
        }
        if survivors.is_empty() {
            return None;
        }

        let title_floor = match mode {
            MatchMode::ColdSearch => self.thresholds.title_track,
            MatchMode::AlbumContext => self.thresholds.title_album,
        };

        let mut best: Option<&TidalTrack> = None;
        let mut best_score = 0.0;
        for (candidate, artist_score) in survivors {
            let title_score = Self::title_similarity(target_title, &candidate.title);
            if title_score <= title_floor {
                continue;
            }

            let mut score = match mode {
                MatchMode::ColdSearch => artist_score + title_score,
                MatchMode::AlbumContext => title_score * 0.7 + artist_score * 0.3,
            };
            if target_position.is_some() && candidate.track_number == target_position {
                score += self.thresholds.position_bonus;
            }
            if score > best_score {
                best = Some(candidate);
                best_score = score;
            }
        }
        best
    }

    fn filter_by_artist<'a>(
        &self,
        candidates: &'a [TidalTrack],
        target_artist: &str,
        floor: f64,
    ) -> Vec<(&'a TidalTrack, f64)> {
        candidates
            .iter()
            .map(|c| (c, Self::artist_similarity(target_artist, &c.artist.name)))
            .filter(|(_, score)| *score > floor)
            .collect()
    }

    /// Whether an album search result matches the target release. Both the
    /// title and the artist must clear their floors; there is no fallback
    /// because a wrong album poisons every backfill match drawn from it.
    pub fn is_album_match(
        &self,
        target_title: &str,
        target_artist: &str,
        candidate: &TidalAlbum,
    ) -> bool {
        Self::title_similarity(target_title, &candidate.title) > self.thresholds.album_title
            && Self::artist_similarity(target_artist, &candidate.artist.name)
                > self.thresholds.album_artist
    }
}
