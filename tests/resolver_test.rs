use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use discosync::Res;
use discosync::matching::resolver::{CatalogSearch, Resolver};
use discosync::matching::scorer::MatchScorer;
use discosync::types::{
    Album, Artist, MatchKind, SearchResults, TidalAlbum, TidalArtist, TidalTrack, Track,
};

// In-memory catalog. Every search returns the same result set; calls are
// recorded so tests can assert how often the network would be hit.
struct FakeCatalog {
    tracks: Vec<TidalTrack>,
    albums: Vec<TidalAlbum>,
    album_tracks: HashMap<u64, Vec<TidalTrack>>,
    search_calls: Mutex<Vec<String>>,
    album_tracks_calls: Mutex<Vec<u64>>,
}

impl FakeCatalog {
    fn new(tracks: Vec<TidalTrack>) -> Self {
        Self {
            tracks,
            albums: Vec::new(),
            album_tracks: HashMap::new(),
            search_calls: Mutex::new(Vec::new()),
            album_tracks_calls: Mutex::new(Vec::new()),
        }
    }

    fn with_album(mut self, album: TidalAlbum, tracks: Vec<TidalTrack>) -> Self {
        self.album_tracks.insert(album.id, tracks);
        self.albums.push(album);
        self
    }

    fn search_count(&self) -> usize {
        self.search_calls.lock().unwrap().len()
    }

    fn album_tracks_count(&self) -> usize {
        self.album_tracks_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CatalogSearch for FakeCatalog {
    async fn search(&self, query: &str) -> Res<SearchResults> {
        self.search_calls.lock().unwrap().push(query.to_string());
        Ok(SearchResults {
            tracks: self.tracks.clone(),
            albums: self.albums.clone(),
        })
    }

    async fn album_tracks(&self, album_id: u64) -> Res<Vec<TidalTrack>> {
        self.album_tracks_calls.lock().unwrap().push(album_id);
        Ok(self.album_tracks.get(&album_id).cloned().unwrap_or_default())
    }
}

// Helper function to create a source track
fn source_track(title: &str, artist: &str, number: Option<u32>) -> Track {
    Track {
        title: title.to_string(),
        artists: vec![Artist::new(artist)],
        duration: None,
        track_number: number,
        id: None,
    }
}

// Helper function to create a catalog track
fn catalog_track(id: u64, title: &str, artist: &str, number: Option<u32>) -> TidalTrack {
    TidalTrack {
        id,
        title: title.to_string(),
        artist: TidalArtist {
            id: Some(id),
            name: artist.to_string(),
        },
        track_number: number,
        duration: None,
    }
}

fn source_album(title: &str, artist: &str) -> Album {
    Album {
        title: title.to_string(),
        artists: vec![Artist::new(artist)],
        year: Some(1976),
        id: "r1".to_string(),
        genres: Vec::new(),
        styles: Vec::new(),
    }
}

#[tokio::test]
async fn test_resolve_track_individual_match() {
    let catalog = FakeCatalog::new(vec![catalog_track(
        42,
        "Black Shampoo",
        "Wood Brass & Steel",
        Some(1),
    )]);
    let resolver = Resolver::new(&catalog, MatchScorer::default());

    let result = resolver
        .resolve_track(&source_track("Black Shampoo", "Wood Brass & Steel", Some(1)))
        .await;

    assert_eq!(result.match_kind, MatchKind::Individual);
    assert_eq!(result.matched.unwrap().id, 42);
    // First query already matched, no fallback queries needed
    assert_eq!(catalog.search_count(), 1);
}

#[tokio::test]
async fn test_resolve_track_no_match() {
    let catalog = FakeCatalog::new(vec![catalog_track(
        1,
        "Unrelated Tune",
        "Somebody Else",
        None,
    )]);
    let resolver = Resolver::new(&catalog, MatchScorer::default());

    let result = resolver
        .resolve_track(&source_track("Black Shampoo", "Wood Brass & Steel", None))
        .await;

    assert_eq!(result.match_kind, MatchKind::None);
    assert!(result.matched.is_none());
    // Every query in the plan was exhausted before giving up
    assert!(catalog.search_count() >= 2);
}

#[tokio::test]
async fn test_resolve_track_missing_artist_short_circuits() {
    let catalog = FakeCatalog::new(vec![catalog_track(1, "Song", "Artist", None)]);
    let resolver = Resolver::new(&catalog, MatchScorer::default());

    let no_artist = Track {
        title: "Song".to_string(),
        artists: Vec::new(),
        duration: None,
        track_number: None,
        id: None,
    };
    let result = resolver.resolve_track(&no_artist).await;

    assert_eq!(result.match_kind, MatchKind::None);
    assert_eq!(catalog.search_count(), 0);
}

#[tokio::test]
async fn test_resolve_track_empty_title_short_circuits() {
    let catalog = FakeCatalog::new(vec![catalog_track(1, "Song", "Artist", None)]);
    let resolver = Resolver::new(&catalog, MatchScorer::default());

    let result = resolver.resolve_track(&source_track("  ", "Artist", None)).await;

    assert_eq!(result.match_kind, MatchKind::None);
    assert_eq!(catalog.search_count(), 0);
}

#[tokio::test]
async fn test_backfill_fills_gaps_when_majority_found() {
    // Three of four tracks resolve individually; the fourth only exists on
    // the album tracklist.
    let catalog = FakeCatalog::new(vec![
        catalog_track(1, "Open Up", "E-Tones", Some(1)),
        catalog_track(2, "Closing Time", "E-Tones", Some(2)),
        catalog_track(3, "Middle Eight", "E-Tones", Some(3)),
    ])
    .with_album(
        TidalAlbum {
            id: 100,
            title: "The Session".to_string(),
            artist: TidalArtist {
                id: Some(7),
                name: "E-Tones".to_string(),
            },
        },
        vec![
            catalog_track(1, "Open Up", "E-Tones", Some(1)),
            catalog_track(2, "Closing Time", "E-Tones", Some(2)),
            catalog_track(3, "Middle Eight", "E-Tones", Some(3)),
            catalog_track(4, "Hidden Cut", "E-Tones", Some(4)),
        ],
    );
    let mut resolver = Resolver::new(&catalog, MatchScorer::default());

    let tracks = vec![
        source_track("Open Up", "E-Tones", Some(1)),
        source_track("Closing Time", "E-Tones", Some(2)),
        source_track("Middle Eight", "E-Tones", Some(3)),
        source_track("Hidden Cut", "E-Tones", Some(4)),
    ];
    let results = resolver
        .resolve_release(&source_album("The Session", "E-Tones"), &tracks)
        .await;

    assert_eq!(results[0].match_kind, MatchKind::Individual);
    assert_eq!(results[1].match_kind, MatchKind::Individual);
    assert_eq!(results[2].match_kind, MatchKind::Individual);
    assert_eq!(results[3].match_kind, MatchKind::AlbumBackfill);
    assert_eq!(results[3].matched.as_ref().unwrap().id, 4);
}

#[tokio::test]
async fn test_backfill_not_triggered_at_exactly_half() {
    // Two of four tracks resolve: exactly half, so no album lookup happens.
    let catalog = FakeCatalog::new(vec![
        catalog_track(1, "Open Up", "E-Tones", Some(1)),
        catalog_track(2, "Closing Time", "E-Tones", Some(2)),
    ])
    .with_album(
        TidalAlbum {
            id: 100,
            title: "The Session".to_string(),
            artist: TidalArtist {
                id: Some(7),
                name: "E-Tones".to_string(),
            },
        },
        vec![
            catalog_track(3, "Hidden Cut", "E-Tones", Some(3)),
            catalog_track(4, "Fourth Wall", "E-Tones", Some(4)),
        ],
    );
    let mut resolver = Resolver::new(&catalog, MatchScorer::default());

    let tracks = vec![
        source_track("Open Up", "E-Tones", Some(1)),
        source_track("Closing Time", "E-Tones", Some(2)),
        source_track("Hidden Cut", "E-Tones", Some(3)),
        source_track("Fourth Wall", "E-Tones", Some(4)),
    ];
    let results = resolver
        .resolve_release(&source_album("The Session", "E-Tones"), &tracks)
        .await;

    assert_eq!(results[2].match_kind, MatchKind::None);
    assert_eq!(results[3].match_kind, MatchKind::None);
    assert_eq!(catalog.album_tracks_count(), 0);
}

#[tokio::test]
async fn test_backfill_never_downgrades_individual_matches() {
    // The album tracklist carries the same titles under different ids; the
    // individually matched tracks must keep their original ids.
    let catalog = FakeCatalog::new(vec![
        catalog_track(1, "Open Up", "E-Tones", Some(1)),
        catalog_track(2, "Closing Time", "E-Tones", Some(2)),
        catalog_track(3, "Middle Eight", "E-Tones", Some(3)),
    ])
    .with_album(
        TidalAlbum {
            id: 100,
            title: "The Session".to_string(),
            artist: TidalArtist {
                id: Some(7),
                name: "E-Tones".to_string(),
            },
        },
        vec![
            catalog_track(901, "Open Up", "E-Tones", Some(1)),
            catalog_track(902, "Closing Time", "E-Tones", Some(2)),
            catalog_track(903, "Middle Eight", "E-Tones", Some(3)),
            catalog_track(904, "Hidden Cut", "E-Tones", Some(4)),
        ],
    );
    let mut resolver = Resolver::new(&catalog, MatchScorer::default());

    let tracks = vec![
        source_track("Open Up", "E-Tones", Some(1)),
        source_track("Closing Time", "E-Tones", Some(2)),
        source_track("Middle Eight", "E-Tones", Some(3)),
        source_track("Hidden Cut", "E-Tones", Some(4)),
    ];
    let results = resolver
        .resolve_release(&source_album("The Session", "E-Tones"), &tracks)
        .await;

    assert_eq!(results[0].matched.as_ref().unwrap().id, 1);
    assert_eq!(results[1].matched.as_ref().unwrap().id, 2);
    assert_eq!(results[2].matched.as_ref().unwrap().id, 3);
    assert_eq!(results[0].match_kind, MatchKind::Individual);
    assert_eq!(results[3].matched.as_ref().unwrap().id, 904);
    assert_eq!(results[3].match_kind, MatchKind::AlbumBackfill);
}

#[tokio::test]
async fn test_album_tracklist_fetched_once_per_album() {
    let album = TidalAlbum {
        id: 100,
        title: "The Session".to_string(),
        artist: TidalArtist {
            id: Some(7),
            name: "E-Tones".to_string(),
        },
    };
    let tracklist = vec![
        catalog_track(1, "Open Up", "E-Tones", Some(1)),
        catalog_track(2, "Closing Time", "E-Tones", Some(2)),
        catalog_track(4, "Hidden Cut", "E-Tones", Some(4)),
    ];
    let catalog = FakeCatalog::new(vec![
        catalog_track(1, "Open Up", "E-Tones", Some(1)),
        catalog_track(2, "Closing Time", "E-Tones", Some(2)),
    ])
    .with_album(album, tracklist);
    let mut resolver = Resolver::new(&catalog, MatchScorer::default());

    let album = source_album("The Session", "E-Tones");
    let tracks = vec![
        source_track("Open Up", "E-Tones", Some(1)),
        source_track("Closing Time", "E-Tones", Some(2)),
        source_track("Hidden Cut", "E-Tones", Some(4)),
    ];

    // Same release resolved twice: the second pass reuses the cached
    // tracklist instead of re-fetching it.
    let first = resolver.resolve_release(&album, &tracks).await;
    let second = resolver.resolve_release(&album, &tracks).await;

    assert_eq!(first[2].match_kind, MatchKind::AlbumBackfill);
    assert_eq!(second[2].match_kind, MatchKind::AlbumBackfill);
    assert_eq!(catalog.album_tracks_count(), 1);
}
