use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
    pub id: Option<String>,
}

impl Artist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
        }
    }
}

/// A Discogs release. `artists` is never absent; an empty list is allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub title: String,
    pub artists: Vec<Artist>,
    pub year: Option<i32>,
    pub id: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub styles: Vec<String>,
}

impl Album {
    pub fn primary_artist(&self) -> Option<&Artist> {
        self.artists.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub artists: Vec<Artist>,
    /// Duration in seconds, parsed from the Discogs `"MM:SS"` string.
    pub duration: Option<u32>,
    pub track_number: Option<u32>,
    pub id: Option<String>,
}

impl Track {
    pub fn primary_artist(&self) -> Option<&Artist> {
        self.artists.first()
    }
}

/// How a source track was resolved against the Tidal catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    None,
    Individual,
    AlbumBackfill,
}

/// Resolution outcome for one source track. Produced once per track per run
/// and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub source_track: Track,
    pub matched: Option<TidalTrack>,
    pub match_kind: MatchKind,
}

impl MatchResult {
    pub fn unmatched(source_track: Track) -> Self {
        Self {
            source_track,
            matched: None,
            match_kind: MatchKind::None,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.matched.is_some()
    }
}

/// Cached resolution of one release: the parsed album plus the per-track
/// match results. Re-caching under the same release id replaces the entry
/// (last-write-wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseCacheEntry {
    pub album: Album,
    pub tracks: Vec<MatchResult>,
    pub cached_at: DateTime<Utc>,
}

/// Aggregated outcome of one reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResult {
    pub success: bool,
    pub total_tracks: usize,
    pub matched_tracks: usize,
    pub failed_tracks: usize,
    pub playlist_name: String,
    pub errors: Vec<String>,
}

impl SyncResult {
    /// Match rate as a percentage of total tracks.
    pub fn match_rate(&self) -> f64 {
        if self.total_tracks == 0 {
            return 0.0;
        }
        (self.matched_tracks as f64 / self.total_tracks as f64) * 100.0
    }
}

#[derive(Tabled)]
pub struct FolderTableRow {
    pub id: u64,
    pub name: String,
    pub items: u64,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub id: String,
}

// --- Discogs wire types ------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscogsFoldersResponse {
    pub folders: Vec<DiscogsFolder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscogsFolder {
    pub id: u64,
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscogsCollectionResponse {
    pub pagination: DiscogsPagination,
    pub releases: Vec<DiscogsCollectionRelease>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscogsPagination {
    pub page: u32,
    pub pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscogsCollectionRelease {
    pub id: u64,
    pub basic_information: DiscogsBasicInformation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscogsBasicInformation {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscogsReleaseResponse {
    pub id: u64,
    pub title: String,
    pub year: Option<i32>,
    #[serde(default)]
    pub artists: Vec<DiscogsArtist>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub styles: Vec<String>,
    #[serde(default)]
    pub tracklist: Vec<DiscogsTrackEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscogsArtist {
    pub name: String,
    pub id: Option<u64>,
}

/// Raw tracklist entry. `position` is a side/position string like `"A1"` or
/// `"3"`; `duration` is `"MM:SS"` or empty. Both are validated at the
/// boundary before entering the matching core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscogsTrackEntry {
    #[serde(default)]
    pub position: String,
    pub title: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub artists: Vec<DiscogsArtist>,
}

// --- Tidal wire types --------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TidalItemList<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Default for TidalItemList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TidalSearchResponse {
    #[serde(default)]
    pub tracks: TidalItemList<TidalTrack>,
    #[serde(default)]
    pub albums: TidalItemList<TidalAlbum>,
}

/// Search results for one query. Lists are empty on no results, never null.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub tracks: Vec<TidalTrack>,
    pub albums: Vec<TidalAlbum>,
}

impl From<TidalSearchResponse> for SearchResults {
    fn from(resp: TidalSearchResponse) -> Self {
        Self {
            tracks: resp.tracks.items,
            albums: resp.albums.items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TidalArtist {
    pub id: Option<u64>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TidalTrack {
    pub id: u64,
    pub title: String,
    pub artist: TidalArtist,
    #[serde(rename = "trackNumber")]
    pub track_number: Option<u32>,
    pub duration: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TidalAlbum {
    pub id: u64,
    pub title: String,
    pub artist: TidalArtist,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TidalPlaylist {
    pub uuid: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "numberOfTracks", default)]
    pub number_of_tracks: u32,
}
