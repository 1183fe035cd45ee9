use tabled::Table;

use crate::{
    info,
    management::{AuditLogManager, PlaylistMapManager, ReleaseCacheManager},
    types::PlaylistTableRow,
    warning,
};

/// Shows local application state. Each flag selects one report; without
/// flags a short status line per area is printed.
pub async fn info(playlists: bool, cache: bool, runs: Option<usize>) {
    let all = !playlists && !cache && runs.is_none();

    if playlists || all {
        show_playlists(all).await;
    }
    if cache || all {
        show_cache().await;
    }
    if runs.is_some() || all {
        show_runs(runs.unwrap_or(5)).await;
    }
}

async fn show_playlists(summary_only: bool) {
    let mapping = match PlaylistMapManager::new().load_from_cache().await {
        Ok(mapping) => mapping,
        Err(e) => {
            warning!("Playlist mapping unreadable: {}", e);
            return;
        }
    };

    if summary_only {
        info!("{} playlist mapping(s) stored", mapping.mapping().len());
        return;
    }

    let mut rows: Vec<PlaylistTableRow> = mapping
        .mapping()
        .iter()
        .map(|(name, id)| PlaylistTableRow {
            name: name.clone(),
            id: id.clone(),
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));

    let table = Table::new(rows);
    println!("{}", table);
}

async fn show_cache() {
    let cache = match ReleaseCacheManager::new().load_from_cache().await {
        Ok(cache) => cache,
        Err(e) => {
            warning!("Release cache unreadable: {}", e);
            return;
        }
    };

    let total_tracks: usize = cache.entries().values().map(|e| e.tracks.len()).sum();
    let matched_tracks: usize = cache
        .entries()
        .values()
        .flat_map(|e| e.tracks.iter())
        .filter(|r| r.is_matched())
        .count();
    info!(
        "{} cached release(s), {}/{} tracks matched",
        cache.len(),
        matched_tracks,
        total_tracks
    );
}

async fn show_runs(count: usize) {
    let audit = match AuditLogManager::new().load_from_cache().await {
        Ok(audit) => audit,
        Err(e) => {
            warning!("Audit log unreadable: {}", e);
            return;
        }
    };

    if audit.is_empty() {
        info!("No recorded runs yet");
        return;
    }

    for record in audit.recent(count) {
        let status = if record.result.success { "ok" } else { "failed" };
        info!(
            "{} [{}] '{}': {}/{} matched ({:.1}%)",
            record.recorded_at.format("%Y-%m-%d %H:%M"),
            status,
            record.result.playlist_name,
            record.result.matched_tracks,
            record.result.total_tracks,
            record.result.match_rate()
        );
    }
}
