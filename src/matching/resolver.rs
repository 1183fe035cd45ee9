use std::collections::HashMap;

use async_trait::async_trait;

use crate::{
    Res,
    matching::{
        query,
        scorer::{MatchMode, MatchScorer},
    },
    types::{Album, MatchKind, MatchResult, SearchResults, TidalTrack, Track},
    utils, warning,
};

/// Read side of the target catalog, as much of it as resolution needs.
/// The production implementation is the Tidal HTTP client; tests swap in
/// an in-memory fake.
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    /// Free-text search over tracks and albums.
    async fn search(&self, query: &str) -> Res<SearchResults>;

    /// Complete tracklist of an album by catalog id.
    async fn album_tracks(&self, album_id: u64) -> Res<Vec<TidalTrack>>;
}

/// Resolves source tracks and releases against a [`CatalogSearch`] backend.
///
/// Holds a per-run album tracklist cache so repeated releases (and repeated
/// backfill attempts against the same album) cost one search and one
/// tracklist fetch. Negative lookups are cached too.
pub struct Resolver<'a, S: CatalogSearch> {
    catalog: &'a S,
    scorer: MatchScorer,
    album_cache: HashMap<String, Option<Vec<TidalTrack>>>,
}

impl<'a, S: CatalogSearch> Resolver<'a, S> {
    pub fn new(catalog: &'a S, scorer: MatchScorer) -> Self {
        Self {
            catalog,
            scorer,
            album_cache: HashMap::new(),
        }
    }

    /// Resolves a single track by walking its query plan until a candidate
    /// clears the cold-search thresholds. Tracks without a usable title or
    /// artist come back unmatched instead of producing junk queries; a
    /// failed query logs a warning and falls through to the next one.
    pub async fn resolve_track(&self, track: &Track) -> MatchResult {
        let artist = match track.primary_artist() {
            Some(artist) if !artist.name.trim().is_empty() => artist.name.clone(),
            _ => return MatchResult::unmatched(track.clone()),
        };
        if track.title.trim().is_empty() {
            return MatchResult::unmatched(track.clone());
        }

        for q in query::track_queries(&track.title, &artist) {
            let results = match self.catalog.search(&q).await {
                Ok(results) => results,
                Err(err) => {
                    warning!("Search '{}' failed: {}", q, err);
                    continue;
                }
            };

            if let Some(found) = self.scorer.best_track_match(
                &results.tracks,
                &track.title,
                &artist,
                track.track_number,
                MatchMode::ColdSearch,
            ) {
                return MatchResult {
                    source_track: track.clone(),
                    matched: Some(found.clone()),
                    match_kind: MatchKind::Individual,
                };
            }
        }

        MatchResult::unmatched(track.clone())
    }

    /// Resolves every track of a release, then runs the album backfill pass
    /// when individual resolution found more than half of the tracks but
    /// not all of them. Backfill only fills gaps; individual matches are
    /// never replaced.
    pub async fn resolve_release(&mut self, album: &Album, tracks: &[Track]) -> Vec<MatchResult> {
        let mut results = Vec::with_capacity(tracks.len());
        for track in tracks {
            results.push(self.resolve_track(track).await);
        }

        let found = results
            .iter()
            .filter(|r| r.match_kind == MatchKind::Individual)
            .count();
        if found * 2 > tracks.len() && found < tracks.len() {
            if let Some(album_tracks) = self.find_album_tracks(album).await {
                for result in results.iter_mut().filter(|r| !r.is_matched()) {
                    let artist = result
                        .source_track
                        .primary_artist()
                        .map(|a| a.name.as_str())
                        .unwrap_or_default();
                    if let Some(found) = self.scorer.best_track_match(
                        &album_tracks,
                        &result.source_track.title,
                        artist,
                        result.source_track.track_number,
                        MatchMode::AlbumContext,
                    ) {
                        result.matched = Some(found.clone());
                        result.match_kind = MatchKind::AlbumBackfill;
                    }
                }
            }
        }

        results
    }

    /// Looks up the release on the target catalog and returns its complete
    /// tracklist, consulting the per-run cache first. The first search
    /// result that clears both album thresholds and yields a non-empty
    /// tracklist wins.
    async fn find_album_tracks(&mut self, album: &Album) -> Option<Vec<TidalTrack>> {
        let artist = album.primary_artist()?.name.clone();
        let key = format!(
            "{}_{}",
            utils::normalize(&album.title),
            utils::normalize(&artist)
        );
        if let Some(cached) = self.album_cache.get(&key) {
            return cached.clone();
        }

        let found = self.search_album_tracks(album, &artist).await;
        self.album_cache.insert(key, found.clone());
        found
    }

    async fn search_album_tracks(&self, album: &Album, artist: &str) -> Option<Vec<TidalTrack>> {
        for q in query::album_queries(&album.title, artist) {
            let results = match self.catalog.search(&q).await {
                Ok(results) => results,
                Err(err) => {
                    warning!("Album search '{}' failed: {}", q, err);
                    continue;
                }
            };

            for candidate in &results.albums {
                if !self.scorer.is_album_match(&album.title, artist, candidate) {
                    continue;
                }
                match self.catalog.album_tracks(candidate.id).await {
                    Ok(tracks) if !tracks.is_empty() => return Some(tracks),
                    Ok(_) => continue,
                    Err(err) => {
                        warning!("Tracklist fetch for album {} failed: {}", candidate.id, err);
                        continue;
                    }
                }
            }
        }
        None
    }
}
