use std::{collections::HashMap, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::sleep;

use crate::{
    discogs, error, info,
    management::{AuditLogManager, PlaylistMapManager, ReleaseCacheManager},
    matching::{resolver::Resolver, scorer::MatchScorer},
    success,
    tidal::{TidalClient, reconcile::PlaylistReconciler},
    types::{Album, MatchResult, SyncResult},
    warning,
};

/// Delay between release fetches so a large folder does not hammer the
/// Discogs rate limit.
const RELEASE_DELAY: Duration = Duration::from_millis(500);

const DEFAULT_PLAYLIST: &str = "Discogs Collection";

/// Synchronizes one Discogs collection folder into Tidal playlists.
///
/// Walks the folder release by release, resolves each release against the
/// Tidal catalog (consulting the persistent release cache first) and then
/// converges the target playlist on the matched tracks. With `by_style`
/// the matched tracks are grouped into one playlist per release style
/// instead of a single playlist. `force` ignores cached resolutions.
pub async fn sync(
    folder: u64,
    playlist: Option<String>,
    max_releases: Option<usize>,
    by_style: bool,
    force: bool,
) {
    if folder != 0 {
        match discogs::collection::get_folders().await {
            Ok(folders) if !folders.iter().any(|f| f.id == folder) => {
                error!("Folder {} does not exist. Run `discosync folders`.", folder);
            }
            Ok(_) => {}
            Err(e) => {
                error!("Failed to verify collection folder {}: {}", folder, e);
            }
        }
    }

    let pb = spinner("Enumerating collection releases...");
    let stubs = match discogs::collection::get_folder_releases(folder, max_releases).await {
        Ok(stubs) => stubs,
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to enumerate collection folder {}: {}", folder, e);
        }
    };
    pb.finish_and_clear();

    if stubs.is_empty() {
        warning!("Folder {} contains no releases. Nothing to do.", folder);
        return;
    }
    info!("Found {} releases in folder {}", stubs.len(), folder);

    let tidal = match TidalClient::new() {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to construct Tidal client: {}", e);
        }
    };

    let mut cache = match ReleaseCacheManager::new().load_from_cache().await {
        Ok(cache) => cache,
        Err(e) => {
            warning!("Release cache unreadable, starting empty: {}", e);
            ReleaseCacheManager::new()
        }
    };

    let mut resolver = Resolver::new(&tidal, MatchScorer::default());
    let mut all_results: Vec<MatchResult> = Vec::new();
    let mut style_tracks: HashMap<String, Vec<u64>> = HashMap::new();
    let mut cache_hits = 0usize;
    let mut cache_misses = 0usize;
    let mut errors: Vec<String> = Vec::new();

    let total = stubs.len();
    let pb = spinner("Resolving releases...");
    for (index, stub) in stubs.iter().enumerate() {
        pb.set_message(format!(
            "({index}/{total}) {title}",
            index = index + 1,
            total = total,
            title = stub.basic_information.title.clone()
        ));

        let cached = if force {
            None
        } else {
            cache
                .get(&stub.id.to_string())
                .map(|entry| (entry.album.clone(), entry.tracks.clone()))
        };

        let (album, results) = match cached {
            Some(hit) => {
                cache_hits += 1;
                hit
            }
            None => {
                cache_misses += 1;
                let release = match discogs::release::get_release(stub.id).await {
                    Ok(release) => release,
                    Err(e) => {
                        warning!("Failed to fetch release {}: {}", stub.id, e);
                        errors.push(format!("release {}: {}", stub.id, e));
                        continue;
                    }
                };
                let (album, tracks) = discogs::release::parse_release(release);
                let results = resolver.resolve_release(&album, &tracks).await;
                cache.put(album.clone(), results.clone());
                sleep(RELEASE_DELAY).await;
                (album, results)
            }
        };

        if by_style {
            collect_by_style(&mut style_tracks, &album, &results);
        }
        all_results.extend(results);
    }
    pb.finish_and_clear();

    if let Err(e) = cache.save_to_cache().await {
        warning!("Failed to persist release cache: {}", e);
    }

    let matched_ids: Vec<u64> = all_results
        .iter()
        .filter_map(|r| r.matched.as_ref().map(|t| t.id))
        .collect();
    let total_tracks = all_results.len();
    let matched_tracks = matched_ids.len();
    let failed_tracks = total_tracks - matched_tracks;

    info!(
        "Resolved {}/{} tracks ({} cache hits, {} misses)",
        matched_tracks, total_tracks, cache_hits, cache_misses
    );
    for unmatched in all_results.iter().filter(|r| !r.is_matched()) {
        let artist = unmatched
            .source_track
            .primary_artist()
            .map(|a| a.name.clone())
            .unwrap_or_default();
        warning!("No match: {} - {}", artist, unmatched.source_track.title);
    }

    let playlist_name = playlist.unwrap_or_else(|| DEFAULT_PLAYLIST.to_string());
    let mut mapping = match PlaylistMapManager::new().load_from_cache().await {
        Ok(mapping) => mapping,
        Err(e) => {
            warning!("Playlist mapping unreadable, starting empty: {}", e);
            PlaylistMapManager::new()
        }
    };

    let reconciler = PlaylistReconciler::new(&tidal);
    let mut targets: Vec<(String, Vec<u64>)> = if by_style {
        let mut targets: Vec<(String, Vec<u64>)> = style_tracks
            .into_iter()
            .map(|(style, ids)| (format!("{} - {}", playlist_name, style), ids))
            .collect();
        targets.sort_by(|a, b| a.0.cmp(&b.0));
        targets
    } else {
        vec![(playlist_name.clone(), matched_ids)]
    };

    let target_count = targets.len();
    let mut established = 0usize;
    for (name, ids) in targets.drain(..) {
        let description = format!("Imported from Discogs ({} tracks)", ids.len());
        let target = match reconciler
            .ensure_playlist(&mut mapping, &name, &description)
            .await
        {
            Ok(target) => {
                established += 1;
                target
            }
            Err(e) => {
                warning!("Failed to resolve playlist '{}': {}", name, e);
                errors.push(format!("playlist {}: {}", name, e));
                continue;
            }
        };

        match reconciler.reconcile(&target.uuid, &ids).await {
            Ok(outcome) => {
                success!(
                    "Playlist '{}': {} added, {} already present, {} failed",
                    name,
                    outcome.added,
                    outcome.already_present,
                    outcome.failed.len()
                );
                for id in outcome.failed {
                    errors.push(format!("playlist {}: track {} rejected", name, id));
                }
            }
            Err(e) => {
                warning!("Failed to reconcile playlist '{}': {}", name, e);
                errors.push(format!("playlist {}: {}", name, e));
            }
        }
    }

    if let Err(e) = mapping.save_to_cache().await {
        warning!("Failed to persist playlist mapping: {}", e);
    }

    // Partial playlist failures degrade to warnings; establishing none at
    // all means nothing was synchronized and the run must fail.
    if target_count > 0 && established == 0 {
        error!("No playlist could be established. Aborting sync.");
    }

    let result = SyncResult {
        success: errors.is_empty(),
        total_tracks,
        matched_tracks,
        failed_tracks,
        playlist_name,
        errors,
    };

    let mut audit = match AuditLogManager::new().load_from_cache().await {
        Ok(audit) => audit,
        Err(e) => {
            warning!("Audit log unreadable, starting empty: {}", e);
            AuditLogManager::new()
        }
    };
    audit.record(result.clone(), all_results);
    if let Err(e) = audit.save_to_cache().await {
        warning!("Failed to persist audit log: {}", e);
    }

    if result.success {
        success!(
            "Sync complete: {}/{} tracks matched ({:.1}%)",
            result.matched_tracks,
            result.total_tracks,
            result.match_rate()
        );
    } else {
        warning!(
            "Sync finished with {} problem(s): {}/{} tracks matched ({:.1}%)",
            result.errors.len(),
            result.matched_tracks,
            result.total_tracks,
            result.match_rate()
        );
    }
}

fn collect_by_style(
    style_tracks: &mut HashMap<String, Vec<u64>>,
    album: &Album,
    results: &[MatchResult],
) {
    let ids: Vec<u64> = results
        .iter()
        .filter_map(|r| r.matched.as_ref().map(|t| t.id))
        .collect();
    if ids.is_empty() {
        return;
    }
    if album.styles.is_empty() {
        style_tracks
            .entry("Unknown Style".to_string())
            .or_default()
            .extend(ids.iter().copied());
        return;
    }
    for style in &album.styles {
        style_tracks
            .entry(style.clone())
            .or_default()
            .extend(ids.iter().copied());
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
