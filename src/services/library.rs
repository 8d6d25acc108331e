//! Library state
//!
//! Holds the profile list, the currently loaded profile and its catalog, and
//! the stream handed to the player. Loading a profile fetches its playlist,
//! parses it and replaces the catalog wholesale.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{CatalogSnapshot, CatalogStats, ProfileRecord, StreamRequest};
use crate::services::fetcher::{Fetcher, TransportError};
use crate::services::m3u_parser::{self, hash_url};
use crate::services::metrics;
use crate::services::profile_store::{ProfileStore, StoreError};

/// Library operation failure
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Playlist download failed; retry by loading again
    #[error("Unable to download playlist: {0}")]
    Transport(#[from] TransportError),
    /// Download worked but the document holds no channels, movies or series
    #[error("Playlist is valid but contains no media")]
    Content,
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),
    #[error("Profile already exists: {0}")]
    DuplicateProfile(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Default)]
struct LibraryState {
    current_profile: Option<ProfileRecord>,
    snapshot: Option<Arc<CatalogSnapshot>>,
    loading: bool,
    error: Option<String>,
    stream: Option<StreamRequest>,
    /// Bumped on every load/unload so a stale load cannot overwrite newer state
    generation: u64,
}

/// Library status
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_profile: Option<ProfileRecord>,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<i64>,
    pub stats: CatalogStats,
}

pub struct Library {
    fetcher: Arc<dyn Fetcher>,
    store: Arc<dyn ProfileStore>,
    profiles: RwLock<Vec<ProfileRecord>>,
    state: RwLock<LibraryState>,
}

impl Library {
    /// Create the library and load stored profiles
    pub async fn new(fetcher: Arc<dyn Fetcher>, store: Arc<dyn ProfileStore>) -> Self {
        let profiles = store.list().await;
        tracing::info!("Loaded {} stored profiles", profiles.len());

        Self {
            fetcher,
            store,
            profiles: RwLock::new(profiles),
            state: RwLock::new(LibraryState::default()),
        }
    }

    pub async fn profiles(&self) -> Vec<ProfileRecord> {
        self.profiles.read().await.clone()
    }

    /// Append a profile; an empty id is replaced by a fresh UUID
    pub async fn add_profile(&self, mut profile: ProfileRecord) -> Result<ProfileRecord, LibraryError> {
        if profile.id().is_empty() {
            profile.set_id(uuid::Uuid::new_v4().to_string());
        }

        let mut profiles = self.profiles.write().await;
        if profiles.iter().any(|p| p.id() == profile.id()) {
            return Err(LibraryError::DuplicateProfile(profile.id().to_string()));
        }

        let mut updated = profiles.clone();
        updated.push(profile.clone());
        self.store.save(&updated).await?;
        *profiles = updated;

        tracing::info!("Added {} profile {}", profile.kind(), profile.id());
        Ok(profile)
    }

    /// Remove a profile, unloading it first when it is the current one
    pub async fn remove_profile(&self, id: &str) -> Result<(), LibraryError> {
        {
            let mut profiles = self.profiles.write().await;
            if !profiles.iter().any(|p| p.id() == id) {
                return Err(LibraryError::ProfileNotFound(id.to_string()));
            }

            let updated: Vec<ProfileRecord> =
                profiles.iter().filter(|p| p.id() != id).cloned().collect();
            self.store.save(&updated).await?;
            *profiles = updated;
        }

        let is_current = self
            .state
            .read()
            .await
            .current_profile
            .as_ref()
            .map(|p| p.id() == id)
            .unwrap_or(false);
        if is_current {
            self.unload().await;
        }

        tracing::info!("Removed profile {}", id);
        Ok(())
    }

    /// Replace the profile with the same id
    pub async fn edit_profile(&self, profile: ProfileRecord) -> Result<ProfileRecord, LibraryError> {
        {
            let mut profiles = self.profiles.write().await;
            let position = profiles
                .iter()
                .position(|p| p.id() == profile.id())
                .ok_or_else(|| LibraryError::ProfileNotFound(profile.id().to_string()))?;

            let mut updated = profiles.clone();
            updated[position] = profile.clone();
            self.store.save(&updated).await?;
            *profiles = updated;
        }

        let mut state = self.state.write().await;
        if let Some(current) = state.current_profile.as_mut() {
            if current.id() == profile.id() {
                *current = profile.clone();
            }
        }

        Ok(profile)
    }

    /// Load a profile's playlist into the catalog.
    ///
    /// The previous catalog is cleared before fetching. On failure the error
    /// message is kept for status reporting and the current profile is left
    /// unchanged.
    pub async fn load_profile(&self, id: &str) -> Result<CatalogStats, LibraryError> {
        let profile = self
            .profiles
            .read()
            .await
            .iter()
            .find(|p| p.id() == id)
            .cloned()
            .ok_or_else(|| LibraryError::ProfileNotFound(id.to_string()))?;

        let generation = {
            let mut state = self.state.write().await;
            state.generation += 1;
            state.loading = true;
            state.error = None;
            state.snapshot = None;
            state.generation
        };
        metrics::set_catalog_entries(&CatalogStats::default());

        let result = self.fetch_snapshot(&profile).await;

        let mut state = self.state.write().await;
        if state.generation != generation {
            tracing::info!("Discarding stale load of profile {}", id);
            return result.map(|snapshot| snapshot.map(|s| s.stats).unwrap_or_default());
        }
        state.loading = false;

        match result {
            Ok(snapshot) => {
                let stats = snapshot.as_ref().map(|s| s.stats).unwrap_or_default();
                metrics::set_catalog_entries(&stats);
                state.snapshot = snapshot.map(Arc::new);
                state.current_profile = Some(profile);
                Ok(stats)
            }
            Err(e) => {
                tracing::error!("Failed to load profile {}: {}", id, e);
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn fetch_snapshot(&self, profile: &ProfileRecord) -> Result<Option<CatalogSnapshot>, LibraryError> {
        let Some(url) = profile.playlist_url() else {
            tracing::warn!("Loading {} profiles is not supported ({})", profile.kind(), profile.id());
            return Ok(None);
        };

        tracing::info!("Loading playlist: {}", url);

        let document = match self.fetcher.fetch(url).await {
            Ok(document) => document,
            Err(e) => {
                metrics::record_load("transport_error");
                return Err(e.into());
            }
        };

        let catalog = m3u_parser::parse(&document);
        if catalog.is_empty() {
            metrics::record_load("content_error");
            return Err(LibraryError::Content);
        }

        let stats = catalog.stats();
        metrics::record_load("ok");
        tracing::info!(
            "Catalog loaded: {} channels, {} movies, {} series ({} episodes)",
            stats.channel_count,
            stats.movie_count,
            stats.series_count,
            stats.episode_count
        );

        Ok(Some(CatalogSnapshot {
            source_hash: hash_url(url),
            loaded_at: chrono::Utc::now().timestamp_millis(),
            stats,
            catalog,
        }))
    }

    /// Drop the current profile, catalog, error and stream
    pub async fn unload(&self) {
        let mut state = self.state.write().await;
        let generation = state.generation + 1;
        *state = LibraryState {
            generation,
            ..LibraryState::default()
        };
        metrics::set_catalog_entries(&CatalogStats::default());
    }

    pub async fn snapshot(&self) -> Option<Arc<CatalogSnapshot>> {
        self.state.read().await.snapshot.clone()
    }

    pub async fn status(&self) -> LibraryStatus {
        let state = self.state.read().await;
        LibraryStatus {
            current_profile: state.current_profile.clone(),
            loading: state.loading,
            error: state.error.clone(),
            source_hash: state.snapshot.as_ref().map(|s| s.source_hash.clone()),
            loaded_at: state.snapshot.as_ref().map(|s| s.loaded_at),
            stats: state.snapshot.as_ref().map(|s| s.stats).unwrap_or_default(),
        }
    }

    pub async fn play_stream(&self, stream: StreamRequest) {
        tracing::info!("Playing stream {}", stream.id);
        self.state.write().await.stream = Some(stream);
    }

    pub async fn stop(&self) {
        self.state.write().await.stream = None;
    }

    pub async fn now_playing(&self) -> Option<StreamRequest> {
        self.state.read().await.stream.clone()
    }
}
