use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::StatusCode;
use tokio::time::sleep;

use crate::{
    config, discogs,
    retry::RetryPolicy,
    types::{Album, Artist, DiscogsReleaseResponse, Track},
    utils,
};

// Discogs disambiguates duplicate artist names with a numeric suffix,
// e.g. "Cream (2)". The suffix is a database artifact, not part of the name.
static NAME_DISAMBIGUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\(\d+\)\s*$").unwrap());

/// Fetches the full release record for one release ID, including the
/// tracklist.
///
/// # Rate Limiting
///
/// A 429 response is retried after the `Retry-After` delay, within the
/// bounded [`RetryPolicy`] budget. A spent budget or a delay above 120
/// seconds lets `error_for_status` surface the 429 instead of stalling.
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(DiscogsReleaseResponse)` - The raw release record
/// - `Err(reqwest::Error)` - Network error, API error, or HTTP error
pub async fn get_release(release_id: u64) -> Result<DiscogsReleaseResponse, reqwest::Error> {
    let client = discogs::client()?;
    let api_url = format!(
        "{uri}/releases/{id}",
        uri = &config::discogs_apiurl(),
        id = release_id
    );

    let retry = RetryPolicy::default();
    let mut attempt: u32 = 0;
    loop {
        let response = client
            .get(&api_url)
            .header(
                "Authorization",
                format!("Discogs token={}", config::discogs_token()),
            )
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            attempt += 1;
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            if !retry_after.is_some_and(|secs| secs > 120) {
                if let Some(delay) = retry.rate_limit_delay(attempt, retry_after) {
                    sleep(delay).await;
                    continue;
                }
            }
        }

        let json = response
            .error_for_status()?
            .json::<DiscogsReleaseResponse>()
            .await?;
        return Ok(json);
    }
}

/// Converts a raw Discogs release into the domain model, validating fields
/// at the boundary so nothing downstream has to re-check them.
///
/// - Tracklist entries without a title are dropped (Discogs uses them for
///   side headings and index rows).
/// - Tracks without their own artist credits inherit the release artists.
/// - Durations (`"MM:SS"`) and positions (`"A1"`, `"3"`) parse leniently;
///   a malformed value becomes `None` rather than failing the track.
/// - Numeric name disambiguation suffixes are stripped from artist names.
pub fn parse_release(response: DiscogsReleaseResponse) -> (Album, Vec<Track>) {
    let release_artists: Vec<Artist> = response
        .artists
        .iter()
        .map(|a| Artist {
            name: clean_name(&a.name),
            id: a.id.map(|id| id.to_string()),
        })
        .collect();

    let album = Album {
        title: response.title.clone(),
        artists: release_artists.clone(),
        year: response.year.filter(|y| *y != 0),
        id: response.id.to_string(),
        genres: response.genres.clone(),
        styles: response.styles.clone(),
    };

    let tracks = response
        .tracklist
        .into_iter()
        .filter(|entry| !entry.title.trim().is_empty())
        .map(|entry| {
            let artists = if entry.artists.is_empty() {
                release_artists.clone()
            } else {
                entry
                    .artists
                    .iter()
                    .map(|a| Artist {
                        name: clean_name(&a.name),
                        id: a.id.map(|id| id.to_string()),
                    })
                    .collect()
            };

            Track {
                title: entry.title.trim().to_string(),
                artists,
                duration: utils::parse_duration(&entry.duration),
                track_number: utils::parse_position(&entry.position),
                id: None,
            }
        })
        .collect();

    (album, tracks)
}

fn clean_name(name: &str) -> String {
    NAME_DISAMBIGUATION.replace(name.trim(), "").to_string()
}
