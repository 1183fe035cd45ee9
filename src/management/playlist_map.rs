use std::{collections::HashMap, io::Error, path::PathBuf};

use crate::management;

#[derive(Debug)]
pub enum PlaylistMapError {
    IoError(Error),
    CriticalError(String),
    SerdeError(serde_json::Error),
}

impl From<Error> for PlaylistMapError {
    fn from(err: Error) -> Self {
        PlaylistMapError::IoError(err)
    }
}

impl std::fmt::Display for PlaylistMapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaylistMapError::IoError(e) => write!(f, "io error: {}", e),
            PlaylistMapError::CriticalError(e) => write!(f, "{}", e),
            PlaylistMapError::SerdeError(e) => write!(f, "serde error: {}", e),
        }
    }
}

/// Persistent playlist name to Tidal playlist id mapping.
///
/// Tidal identifies playlists by server-assigned UUID, so the name chosen
/// by the user has to be mapped locally to stay idempotent across runs. A
/// stored id can go stale when the playlist is deleted remotely; the
/// reconciler handles that by falling back to a listing scan and calling
/// [`PlaylistMapManager::set`] with the fresh id.
pub struct PlaylistMapManager {
    base: PathBuf,
    mapping: HashMap<String, String>,
}

impl PlaylistMapManager {
    pub fn new() -> Self {
        Self::at(management::data_dir())
    }

    pub fn at(base: PathBuf) -> Self {
        Self {
            base,
            mapping: HashMap::new(),
        }
    }

    pub async fn load_from_cache(&self) -> Result<Self, PlaylistMapError> {
        let path = self.get_path();
        let mapping = match async_fs::read_to_string(&path).await {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| PlaylistMapError::SerdeError(e))?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(PlaylistMapError::IoError(e)),
        };
        Ok(Self {
            base: self.base.clone(),
            mapping,
        })
    }

    pub async fn save_to_cache(&self) -> Result<(), PlaylistMapError> {
        let path = self.get_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| PlaylistMapError::IoError(e))?;
        }

        let json = serde_json::to_string_pretty(&self.mapping)
            .map_err(|e| PlaylistMapError::SerdeError(e))?;
        async_fs::write(&path, json)
            .await
            .map_err(|e| PlaylistMapError::IoError(e))
    }

    pub fn get(&self, name: &str) -> Option<&String> {
        self.mapping.get(name)
    }

    pub fn set(&mut self, name: String, playlist_id: String) {
        self.mapping.insert(name, playlist_id);
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.mapping.remove(name)
    }

    pub fn mapping(&self) -> &HashMap<String, String> {
        &self.mapping
    }

    fn get_path(&self) -> PathBuf {
        self.base.join("playlists/mapping.json")
    }
}
