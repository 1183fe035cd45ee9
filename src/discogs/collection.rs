use reqwest::StatusCode;
use tokio::time::sleep;

use crate::{
    config, discogs,
    retry::RetryPolicy,
    types::{DiscogsCollectionRelease, DiscogsCollectionResponse, DiscogsFolder, DiscogsFoldersResponse},
    warning,
};

/// Retrieves the collection folders of the configured Discogs user.
///
/// Folder `0` is the synthetic "All" folder and folder `1` is "Uncategorized";
/// both are returned as regular entries. Requires a personal access token
/// because collection folders other than "All" are private.
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(Vec<DiscogsFolder>)` - The user's folders with their item counts
/// - `Err(reqwest::Error)` - Network error, API error, or HTTP error
pub async fn get_folders() -> Result<Vec<DiscogsFolder>, reqwest::Error> {
    let client = discogs::client()?;
    let api_url = format!(
        "{uri}/users/{user}/collection/folders",
        uri = &config::discogs_apiurl(),
        user = &config::discogs_username()
    );

    let response = client
        .get(&api_url)
        .header("Authorization", format!("Discogs token={}", config::discogs_token()))
        .send()
        .await?
        .error_for_status()?;

    let json = response.json::<DiscogsFoldersResponse>().await?;
    Ok(json.folders)
}

/// Enumerates the releases in one collection folder, walking the paginated
/// endpoint until the last page.
///
/// # Arguments
///
/// * `folder_id` - Discogs folder ID (`0` for the whole collection)
/// * `max_releases` - Optional cap on the number of releases returned,
///   applied across page boundaries
///
/// # Rate Limiting
///
/// A 429 response is retried after the delay announced in the `Retry-After`
/// header, within the bounded [`RetryPolicy`] budget; once the budget is
/// spent the 429 surfaces as an error. Delays above 120 seconds abort the
/// enumeration with a warning instead of stalling the run.
///
/// # Returns
///
/// Returns a `Result` containing:
/// - `Ok(Vec<DiscogsCollectionRelease>)` - Release stubs (id + basic info)
/// - `Err(reqwest::Error)` - Network error, API error, or HTTP error
pub async fn get_folder_releases(
    folder_id: u64,
    max_releases: Option<usize>,
) -> Result<Vec<DiscogsCollectionRelease>, reqwest::Error> {
    let client = discogs::client()?;
    let retry = RetryPolicy::default();
    let mut releases: Vec<DiscogsCollectionRelease> = Vec::new();
    let mut page: u32 = 1;
    let mut attempt: u32 = 0;

    loop {
        let api_url = format!(
            "{uri}/users/{user}/collection/folders/{folder}/releases?page={page}&per_page=100",
            uri = &config::discogs_apiurl(),
            user = &config::discogs_username(),
            folder = folder_id,
            page = page
        );

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
            if let Some(secs) = retry_after {
                if secs > 120 {
                    warning!(
                        "Retry after has reached an abnormal high of {} seconds. Stopping enumeration.",
                        secs
                    );
                    return Ok(releases);
                }
            }
            if let Some(delay) = retry.rate_limit_delay(attempt, retry_after) {
                sleep(delay).await;
                continue;
            }
            // Budget spent; the 429 surfaces through error_for_status below
        }

        let json = response
            .error_for_status()?
            .json::<DiscogsCollectionResponse>()
            .await?;
        attempt = 0;

        let pages = json.pagination.pages;
        releases.extend(json.releases);

        if let Some(max) = max_releases {
            if releases.len() >= max {
                releases.truncate(max);
                return Ok(releases);
            }
        }

        if page >= pages {
            return Ok(releases);
        }
        page += 1;
    }
}
