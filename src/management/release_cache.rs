use std::{collections::HashMap, io::Error, path::PathBuf};

use chrono::Utc;

use crate::{
    management,
    types::{Album, MatchResult, ReleaseCacheEntry},
};

#[derive(Debug)]
pub enum ReleaseCacheError {
    IoError(Error),
    CriticalError(String),
    SerdeError(serde_json::Error),
}

impl From<Error> for ReleaseCacheError {
    fn from(err: Error) -> Self {
        ReleaseCacheError::IoError(err)
    }
}

impl std::fmt::Display for ReleaseCacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReleaseCacheError::IoError(e) => write!(f, "io error: {}", e),
            ReleaseCacheError::CriticalError(e) => write!(f, "{}", e),
            ReleaseCacheError::SerdeError(e) => write!(f, "serde error: {}", e),
        }
    }
}

/// Persistent cache of resolved releases, keyed by source release id.
///
/// A cache hit skips search, scoring and backfill for the whole release, so
/// entries store the full per-track match results rather than the source
/// tracks. Re-caching a release id replaces the previous entry.
pub struct ReleaseCacheManager {
    base: PathBuf,
    entries: HashMap<String, ReleaseCacheEntry>,
}

impl ReleaseCacheManager {
    pub fn new() -> Self {
        Self::at(management::data_dir())
    }

    pub fn at(base: PathBuf) -> Self {
        Self {
            base,
            entries: HashMap::new(),
        }
    }

    /// Loads the cache from disk. A missing cache file is an empty cache,
    /// not an error.
    pub async fn load_from_cache(&self) -> Result<Self, ReleaseCacheError> {
        let path = self.get_path();
        let entries = match async_fs::read_to_string(&path).await {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| ReleaseCacheError::SerdeError(e))?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(ReleaseCacheError::IoError(e)),
        };
        Ok(Self {
            base: self.base.clone(),
            entries,
        })
    }

    pub async fn save_to_cache(&self) -> Result<(), ReleaseCacheError> {
        let path = self.get_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| ReleaseCacheError::IoError(e))?;
        }

        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| ReleaseCacheError::SerdeError(e))?;
        async_fs::write(&path, json)
            .await
            .map_err(|e| ReleaseCacheError::IoError(e))
    }

    pub fn get(&self, release_id: &str) -> Option<&ReleaseCacheEntry> {
        self.entries.get(release_id)
    }

    /// Stores the resolution of one release. Releases without tracks, or
    /// where no track matched at all, are not cached: an empty or fully
    /// unmatched resolution usually means the fetch or the searches failed
    /// transiently, and caching it would pin the failure until `--force`.
    pub fn put(&mut self, album: Album, tracks: Vec<MatchResult>) {
        if tracks.is_empty() || tracks.iter().all(|r| !r.is_matched()) {
            return;
        }
        self.entries.insert(
            album.id.clone(),
            ReleaseCacheEntry {
                album,
                tracks,
                cached_at: Utc::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &HashMap<String, ReleaseCacheEntry> {
        &self.entries
    }

    pub async fn clear(&mut self) -> Result<(), ReleaseCacheError> {
        self.entries.clear();
        let path = self.get_path();
        match async_fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ReleaseCacheError::IoError(e)),
        }
    }

    fn get_path(&self) -> PathBuf {
        self.base.join("cache/releases.json")
    }
}
