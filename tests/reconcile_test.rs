use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use discosync::Res;
use discosync::management::PlaylistMapManager;
use discosync::tidal::playlist::PlaylistStore;
use discosync::tidal::reconcile::PlaylistReconciler;
use discosync::types::{TidalArtist, TidalPlaylist, TidalTrack};

// In-memory playlist store. Tracks per playlist live behind a mutex so the
// fake can be mutated through &self like the real client.
#[derive(Default)]
struct FakeStore {
    playlists: Mutex<Vec<TidalPlaylist>>,
    contents: Mutex<HashMap<String, Vec<u64>>>,
    rejected_ids: HashSet<u64>,
    add_calls: Mutex<usize>,
}

impl FakeStore {
    fn with_playlist(self, uuid: &str, title: &str, tracks: Vec<u64>) -> Self {
        self.playlists.lock().unwrap().push(TidalPlaylist {
            uuid: uuid.to_string(),
            title: title.to_string(),
            description: String::new(),
            number_of_tracks: tracks.len() as u32,
        });
        self.contents
            .lock()
            .unwrap()
            .insert(uuid.to_string(), tracks);
        self
    }

    fn rejecting(mut self, id: u64) -> Self {
        self.rejected_ids.insert(id);
        self
    }

    fn tracks_of(&self, uuid: &str) -> Vec<u64> {
        self.contents
            .lock()
            .unwrap()
            .get(uuid)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl PlaylistStore for FakeStore {
    async fn playlists(&self) -> Res<Vec<TidalPlaylist>> {
        Ok(self.playlists.lock().unwrap().clone())
    }

    async fn playlist(&self, playlist_id: &str) -> Res<Option<TidalPlaylist>> {
        Ok(self
            .playlists
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.uuid == playlist_id)
            .cloned())
    }

    async fn create_playlist(&self, name: &str, description: &str) -> Res<TidalPlaylist> {
        let playlist = TidalPlaylist {
            uuid: format!("uuid-{}", name.to_lowercase().replace(' ', "-")),
            title: name.to_string(),
            description: description.to_string(),
            number_of_tracks: 0,
        };
        self.playlists.lock().unwrap().push(playlist.clone());
        self.contents
            .lock()
            .unwrap()
            .insert(playlist.uuid.clone(), Vec::new());
        Ok(playlist)
    }

    async fn playlist_tracks(&self, playlist_id: &str) -> Res<Vec<TidalTrack>> {
        let tracks = self
            .contents
            .lock()
            .unwrap()
            .get(playlist_id)
            .cloned()
            .unwrap_or_default();
        Ok(tracks
            .into_iter()
            .map(|id| TidalTrack {
                id,
                title: format!("track {}", id),
                artist: TidalArtist {
                    id: None,
                    name: "artist".to_string(),
                },
                track_number: None,
                duration: None,
            })
            .collect())
    }

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[u64]) -> Res<()> {
        *self.add_calls.lock().unwrap() += 1;
        if track_ids.iter().any(|id| self.rejected_ids.contains(id)) {
            return Err("track not available".into());
        }
        self.contents
            .lock()
            .unwrap()
            .entry(playlist_id.to_string())
            .or_default()
            .extend_from_slice(track_ids);
        Ok(())
    }
}

// Store that is entirely unreachable, as during a target-service outage.
struct DownStore;

#[async_trait]
impl PlaylistStore for DownStore {
    async fn playlists(&self) -> Res<Vec<TidalPlaylist>> {
        Err("service unavailable".into())
    }

    async fn playlist(&self, _playlist_id: &str) -> Res<Option<TidalPlaylist>> {
        Err("service unavailable".into())
    }

    async fn create_playlist(&self, _name: &str, _description: &str) -> Res<TidalPlaylist> {
        Err("service unavailable".into())
    }

    async fn playlist_tracks(&self, _playlist_id: &str) -> Res<Vec<TidalTrack>> {
        Err("service unavailable".into())
    }

    async fn add_tracks(&self, _playlist_id: &str, _track_ids: &[u64]) -> Res<()> {
        Err("service unavailable".into())
    }
}

fn mapping_at_tmp() -> PlaylistMapManager {
    PlaylistMapManager::at(std::env::temp_dir().join("discosync-reconcile-test"))
}

#[tokio::test]
async fn test_ensure_playlist_creates_when_absent() {
    let store = FakeStore::default();
    let reconciler = PlaylistReconciler::new(&store);
    let mut mapping = mapping_at_tmp();

    let playlist = reconciler
        .ensure_playlist(&mut mapping, "Discogs Collection", "imported")
        .await
        .unwrap();

    assert_eq!(playlist.title, "Discogs Collection");
    assert_eq!(mapping.get("Discogs Collection"), Some(&playlist.uuid));
}

#[tokio::test]
async fn test_ensure_playlist_reuses_mapped_id() {
    let store = FakeStore::default().with_playlist("p1", "Discogs Collection", vec![]);
    let reconciler = PlaylistReconciler::new(&store);
    let mut mapping = mapping_at_tmp();
    mapping.set("Discogs Collection".to_string(), "p1".to_string());

    let playlist = reconciler
        .ensure_playlist(&mut mapping, "Discogs Collection", "imported")
        .await
        .unwrap();

    assert_eq!(playlist.uuid, "p1");
    assert_eq!(store.playlists.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_ensure_playlist_recovers_from_stale_id() {
    // The stored id no longer resolves, but a playlist with the exact
    // title still exists remotely. The mapping heals to the live id and
    // nothing is created.
    let store = FakeStore::default().with_playlist("p2", "Discogs Collection", vec![]);
    let reconciler = PlaylistReconciler::new(&store);
    let mut mapping = mapping_at_tmp();
    mapping.set("Discogs Collection".to_string(), "deleted-id".to_string());

    let playlist = reconciler
        .ensure_playlist(&mut mapping, "Discogs Collection", "imported")
        .await
        .unwrap();

    assert_eq!(playlist.uuid, "p2");
    assert_eq!(mapping.get("Discogs Collection"), Some(&"p2".to_string()));
    assert_eq!(store.playlists.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_ensure_playlist_fails_when_store_unreachable() {
    // No playlist can be established at all: the error must propagate so
    // the caller can treat the run as a total failure instead of quietly
    // finishing with nothing synchronized.
    let store = DownStore;
    let reconciler = PlaylistReconciler::new(&store);
    let mut mapping = mapping_at_tmp();

    let result = reconciler
        .ensure_playlist(&mut mapping, "Discogs Collection", "imported")
        .await;

    assert!(result.is_err());
    assert_eq!(mapping.get("Discogs Collection"), None);
}

#[tokio::test]
async fn test_ensure_playlist_distrusts_renamed_playlist() {
    // The stored id still resolves, but the playlist was renamed remotely.
    // The mapping must not keep feeding the renamed playlist; a fresh one
    // with the expected title is created instead.
    let store = FakeStore::default().with_playlist("p1", "Renamed By User", vec![]);
    let reconciler = PlaylistReconciler::new(&store);
    let mut mapping = mapping_at_tmp();
    mapping.set("Discogs Collection".to_string(), "p1".to_string());

    let playlist = reconciler
        .ensure_playlist(&mut mapping, "Discogs Collection", "imported")
        .await
        .unwrap();

    assert_eq!(playlist.title, "Discogs Collection");
    assert_ne!(playlist.uuid, "p1");
    assert_eq!(mapping.get("Discogs Collection"), Some(&playlist.uuid));
}

#[tokio::test]
async fn test_reconcile_adds_only_missing_tracks() {
    let store = FakeStore::default().with_playlist("p1", "List", vec![1, 2]);
    let reconciler = PlaylistReconciler::new(&store);

    let outcome = reconciler.reconcile("p1", &[1, 2, 3]).await.unwrap();

    assert_eq!(outcome.added, 1);
    assert_eq!(outcome.already_present, 2);
    assert!(outcome.failed.is_empty());
    assert_eq!(store.tracks_of("p1"), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_reconcile_is_idempotent() {
    let store = FakeStore::default().with_playlist("p1", "List", vec![]);
    let reconciler = PlaylistReconciler::new(&store);

    let first = reconciler.reconcile("p1", &[1, 2, 3]).await.unwrap();
    let second = reconciler.reconcile("p1", &[1, 2, 3]).await.unwrap();

    assert_eq!(first.added, 3);
    assert_eq!(second.added, 0);
    assert_eq!(second.already_present, 3);
    assert_eq!(store.tracks_of("p1"), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_reconcile_collapses_duplicates() {
    let store = FakeStore::default().with_playlist("p1", "List", vec![]);
    let reconciler = PlaylistReconciler::new(&store);

    let outcome = reconciler.reconcile("p1", &[5, 5, 6, 5]).await.unwrap();

    assert_eq!(outcome.added, 2);
    assert_eq!(store.tracks_of("p1"), vec![5, 6]);
}

#[tokio::test]
async fn test_reconcile_preserves_desired_order() {
    let store = FakeStore::default().with_playlist("p1", "List", vec![]);
    let reconciler = PlaylistReconciler::new(&store);

    reconciler.reconcile("p1", &[9, 3, 7]).await.unwrap();

    assert_eq!(store.tracks_of("p1"), vec![9, 3, 7]);
}

#[tokio::test]
async fn test_reconcile_batch_falls_back_per_track() {
    // One rejected id sinks the batch; the per-track fallback still lands
    // the other two.
    let store = FakeStore::default()
        .with_playlist("p1", "List", vec![])
        .rejecting(2);
    let reconciler = PlaylistReconciler::new(&store);

    let outcome = reconciler.reconcile("p1", &[1, 2, 3]).await.unwrap();

    assert_eq!(outcome.added, 2);
    assert_eq!(outcome.failed, vec![2]);
    assert_eq!(store.tracks_of("p1"), vec![1, 3]);
    // One batch call plus three individual retries
    assert_eq!(*store.add_calls.lock().unwrap(), 4);
}
