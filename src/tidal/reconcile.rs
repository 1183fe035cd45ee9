use std::collections::HashSet;

use crate::{
    Res,
    management::PlaylistMapManager,
    tidal::playlist::PlaylistStore,
    types::TidalPlaylist,
    warning,
};

/// Tracks per add request. Batches that fail are retried one track at a
/// time so a single rejected id cannot sink its whole batch.
pub const ADD_BATCH_SIZE: usize = 50;

/// Outcome of one reconcile pass over a playlist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Distinct desired tracks that were already in the playlist.
    pub already_present: usize,
    /// Tracks appended by this pass.
    pub added: usize,
    /// Tracks the store rejected even individually.
    pub failed: Vec<u64>,
}

/// Converges a named playlist onto a desired set of tracks.
///
/// Reconciliation is additive: tracks are appended when missing, never
/// removed or reordered, so a playlist the user has edited by hand stays
/// intact. Running the same reconcile twice is a no-op the second time.
pub struct PlaylistReconciler<'a, P: PlaylistStore> {
    store: &'a P,
}

impl<'a, P: PlaylistStore> PlaylistReconciler<'a, P> {
    pub fn new(store: &'a P) -> Self {
        Self { store }
    }

    /// Resolves a playlist name to a live playlist, creating one if needed.
    ///
    /// The stored id mapping is tried first and is only trusted when the
    /// live playlist still carries the expected title. A stale id (playlist
    /// deleted or renamed remotely) falls back to scanning the user's
    /// playlists by exact title, and only when that also fails is a new
    /// playlist created. The mapping is updated in place; persisting it is
    /// the caller's job.
    pub async fn ensure_playlist(
        &self,
        mapping: &mut PlaylistMapManager,
        name: &str,
        description: &str,
    ) -> Res<TidalPlaylist> {
        if let Some(id) = mapping.get(name).cloned() {
            match self.store.playlist(&id).await? {
                Some(playlist) if playlist.title == name => return Ok(playlist),
                Some(playlist) => {
                    warning!(
                        "Stored id for playlist '{}' now points at '{}', rescanning",
                        name,
                        playlist.title
                    );
                    mapping.remove(name);
                }
                None => {
                    warning!("Stored id for playlist '{}' is stale, rescanning", name);
                    mapping.remove(name);
                }
            }
        }

        for playlist in self.store.playlists().await? {
            if playlist.title == name {
                mapping.set(name.to_string(), playlist.uuid.clone());
                return Ok(playlist);
            }
        }

        let playlist = self.store.create_playlist(name, description).await?;
        mapping.set(name.to_string(), playlist.uuid.clone());
        Ok(playlist)
    }

    /// Appends the desired tracks that are missing from the playlist.
    ///
    /// Desired order is preserved for the appended tracks; duplicates in
    /// the desired set collapse to their first occurrence. Additions go
    /// out in batches of [`ADD_BATCH_SIZE`] with a per-track fallback when
    /// a batch is rejected.
    pub async fn reconcile(&self, playlist_id: &str, desired: &[u64]) -> Res<ReconcileOutcome> {
        let existing: HashSet<u64> = self
            .store
            .playlist_tracks(playlist_id)
            .await?
            .iter()
            .map(|t| t.id)
            .collect();

        let mut seen: HashSet<u64> = HashSet::new();
        let mut missing: Vec<u64> = Vec::new();
        let mut already_present = 0usize;
        for id in desired.iter().copied() {
            if !seen.insert(id) {
                continue;
            }
            if existing.contains(&id) {
                already_present += 1;
            } else {
                missing.push(id);
            }
        }

        let mut outcome = ReconcileOutcome {
            already_present,
            ..Default::default()
        };

        for chunk in missing.chunks(ADD_BATCH_SIZE) {
            match self.store.add_tracks(playlist_id, chunk).await {
                Ok(()) => outcome.added += chunk.len(),
                Err(err) => {
                    warning!(
                        "Batch add of {} tracks failed, retrying individually: {}",
                        chunk.len(),
                        err
                    );
                    for id in chunk {
                        match self.store.add_tracks(playlist_id, &[*id]).await {
                            Ok(()) => outcome.added += 1,
                            Err(err) => {
                                warning!("Track {} could not be added: {}", id, err);
                                outcome.failed.push(*id);
                            }
                        }
                    }
                }
            }
        }

        Ok(outcome)
    }
}
