use crate::{error, info, management::ReleaseCacheManager, success, warning};

/// Inspects or clears the persistent release resolution cache.
pub async fn cache(clear: bool) {
    let mut cache = match ReleaseCacheManager::new().load_from_cache().await {
        Ok(cache) => cache,
        Err(e) => {
            error!("Release cache unreadable: {}", e);
        }
    };

    if clear {
        let entries = cache.len();
        if let Err(e) = cache.clear().await {
            error!("Failed to clear release cache: {}", e);
        }
        success!("Cleared {} cached release(s)", entries);
        return;
    }

    if cache.is_empty() {
        info!("Release cache is empty");
        return;
    }

    info!("{} cached release(s):", cache.len());
    let mut entries: Vec<_> = cache.entries().values().collect();
    entries.sort_by(|a, b| a.album.title.cmp(&b.album.title));
    for entry in entries {
        let matched = entry.tracks.iter().filter(|r| r.is_matched()).count();
        let artist = entry
            .album
            .primary_artist()
            .map(|a| a.name.clone())
            .unwrap_or_default();
        let line = format!(
            "{} - {} ({}/{} matched, cached {})",
            artist,
            entry.album.title,
            matched,
            entry.tracks.len(),
            entry.cached_at.format("%Y-%m-%d")
        );
        if matched == entry.tracks.len() {
            info!("{}", line);
        } else {
            warning!("{}", line);
        }
    }
}
