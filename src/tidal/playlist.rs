use async_trait::async_trait;
use reqwest::StatusCode;

use crate::{
    Res, config,
    tidal::TidalClient,
    types::{TidalItemList, TidalPlaylist, TidalTrack},
};

const PAGE_SIZE: u32 = 50;

/// Write side of the target catalog: everything playlist reconciliation
/// needs. The production implementation is [`TidalClient`]; tests swap in
/// an in-memory fake.
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    /// All playlists owned by the configured user.
    async fn playlists(&self) -> Res<Vec<TidalPlaylist>>;

    /// A playlist by id, or `None` when the id no longer resolves.
    async fn playlist(&self, playlist_id: &str) -> Res<Option<TidalPlaylist>>;

    async fn create_playlist(&self, name: &str, description: &str) -> Res<TidalPlaylist>;

    /// Current contents of a playlist, in playlist order.
    async fn playlist_tracks(&self, playlist_id: &str) -> Res<Vec<TidalTrack>>;

    /// Appends tracks to a playlist. Order within the slice is preserved.
    async fn add_tracks(&self, playlist_id: &str, track_ids: &[u64]) -> Res<()>;
}

#[async_trait]
impl PlaylistStore for TidalClient {
    async fn playlists(&self) -> Res<Vec<TidalPlaylist>> {
        let path = format!("/users/{}/playlists", config::tidal_user());
        let mut playlists: Vec<TidalPlaylist> = Vec::new();
        let mut offset: u32 = 0;

        loop {
            let response = self
                .execute(|| {
                    self.get(&path).query(&[
                        ("limit", PAGE_SIZE.to_string()),
                        ("offset", offset.to_string()),
                    ])
                })
                .await?;

            let page = response.json::<TidalItemList<TidalPlaylist>>().await?;
            let fetched = page.items.len() as u32;
            playlists.extend(page.items);

            if fetched < PAGE_SIZE {
                return Ok(playlists);
            }
            offset += PAGE_SIZE;
        }
    }

    async fn playlist(&self, playlist_id: &str) -> Res<Option<TidalPlaylist>> {
        let path = format!("/playlists/{}", playlist_id);
        let response = self
            .get(&path)
            .bearer_auth(config::tidal_token())
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let playlist = response.error_for_status()?.json::<TidalPlaylist>().await?;
        Ok(Some(playlist))
    }

    async fn create_playlist(&self, name: &str, description: &str) -> Res<TidalPlaylist> {
        let path = format!("/users/{}/playlists", config::tidal_user());
        let response = self
            .execute(|| {
                self.post(&path)
                    .form(&[("title", name), ("description", description)])
            })
            .await?;

        let playlist = response.json::<TidalPlaylist>().await?;
        Ok(playlist)
    }

    async fn playlist_tracks(&self, playlist_id: &str) -> Res<Vec<TidalTrack>> {
        let path = format!("/playlists/{}/tracks", playlist_id);
        let mut tracks: Vec<TidalTrack> = Vec::new();
        let mut offset: u32 = 0;

        loop {
            let response = self
                .execute(|| {
                    self.get(&path).query(&[
                        ("limit", PAGE_SIZE.to_string()),
                        ("offset", offset.to_string()),
                    ])
                })
                .await?;

            let page = response.json::<TidalItemList<TidalTrack>>().await?;
            let fetched = page.items.len() as u32;
            tracks.extend(page.items);

            if fetched < PAGE_SIZE {
                return Ok(tracks);
            }
            offset += PAGE_SIZE;
        }
    }

    async fn add_tracks(&self, playlist_id: &str, track_ids: &[u64]) -> Res<()> {
        let path = format!("/playlists/{}/tracks", playlist_id);
        let ids = track_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        self.execute(|| {
            self.post(&path).form(&[
                ("trackIds", ids.as_str()),
                ("onArtifactNotFound", "SKIP"),
            ])
        })
        .await?;
        Ok(())
    }
}
