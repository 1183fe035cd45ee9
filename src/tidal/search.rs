use async_trait::async_trait;

use crate::{
    Res,
    matching::resolver::CatalogSearch,
    tidal::TidalClient,
    types::{SearchResults, TidalItemList, TidalSearchResponse, TidalTrack},
};

const SEARCH_LIMIT: u32 = 25;
const TRACKS_PAGE_SIZE: u32 = 100;

#[async_trait]
impl CatalogSearch for TidalClient {
    /// Free-text search over the Tidal catalog, restricted to the track
    /// and album result buckets.
    async fn search(&self, query: &str) -> Res<SearchResults> {
        let response = self
            .execute(|| {
                self.get("/search").query(&[
                    ("query", query),
                    ("types", "TRACKS,ALBUMS"),
                    ("limit", &SEARCH_LIMIT.to_string()),
                ])
            })
            .await?;

        let json = response.json::<TidalSearchResponse>().await?;
        Ok(json.into())
    }

    /// Complete tracklist of an album, walking the paginated endpoint.
    async fn album_tracks(&self, album_id: u64) -> Res<Vec<TidalTrack>> {
        let path = format!("/albums/{}/tracks", album_id);
        let mut tracks: Vec<TidalTrack> = Vec::new();
        let mut offset: u32 = 0;

        loop {
            let response = self
                .execute(|| {
                    self.get(&path).query(&[
                        ("limit", TRACKS_PAGE_SIZE.to_string()),
                        ("offset", offset.to_string()),
                    ])
                })
                .await?;

            let page = response.json::<TidalItemList<TidalTrack>>().await?;
            let fetched = page.items.len() as u32;
            tracks.extend(page.items);

            if fetched < TRACKS_PAGE_SIZE {
                return Ok(tracks);
            }
            offset += TRACKS_PAGE_SIZE;
        }
    }
}
