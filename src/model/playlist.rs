//! The playlist: ordered songs, the current position and their persisted record

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use super::catalog_client::{CatalogApi, CatalogError};
use super::collection::{MergeSummary, SongCollection};
use super::song::{DisplayId, PlayingSong, Song, SongAttributes};
use super::store::{LocalStore, StoreError};

/// Store key, and the record's own `id`
pub const PLAYLIST_KEY: &str = "playlist";

#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("song {0} is not in the playlist")]
    SongNotFound(DisplayId),

    #[error("playlist could not be saved: {0}")]
    Persistence(#[from] StoreError),

    #[error("album could not be loaded: {0}")]
    Network(#[from] CatalogError),
}

/// Persisted shape: `{id, position, songCollection: [...]}`, position -1 when nothing is selected
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaylistRecord {
    pub id: String,
    #[serde(default = "no_position")]
    pub position: i64,
    #[serde(rename = "songCollection", default)]
    pub song_collection: Vec<SongAttributes>,
}

fn no_position() -> i64 {
    -1
}

pub struct Playlist {
    id: String,
    songs: SongCollection,
    position: Option<usize>,
    store: Arc<dyn LocalStore>,
    catalog: Arc<dyn CatalogApi>,
    playing: Arc<RwLock<PlayingSong>>,
}

impl Playlist {
    /// Empty playlist, not yet read from or written to the store
    pub fn new(
        store: Arc<dyn LocalStore>,
        catalog: Arc<dyn CatalogApi>,
        playing: Arc<RwLock<PlayingSong>>,
    ) -> Self {
        Self {
            id: PLAYLIST_KEY.to_string(),
            songs: SongCollection::new(),
            position: None,
            store,
            catalog,
            playing,
        }
    }

    /// Read the persisted playlist, or create an empty record if there is none.
    ///
    /// Never fails: whatever happens with the store, the returned playlist is usable.
    pub async fn bootstrap(
        store: Arc<dyn LocalStore>,
        catalog: Arc<dyn CatalogApi>,
        playing: Arc<RwLock<PlayingSong>>,
    ) -> Self {
        let mut playlist = Self::new(store, catalog, playing);

        match playlist.store.read(&playlist.id).await {
            Ok(value) => match serde_json::from_value::<PlaylistRecord>(value) {
                Ok(record) => {
                    playlist.hydrate(record).await;
                    tracing::info!(
                        songs = playlist.songs.len(),
                        position = playlist.position_index(),
                        "Successfully read playlist from local store"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Stored playlist could not be decoded; starting empty");
                }
            },
            Err(e @ StoreError::NotFound(_)) => {
                tracing::info!(error = %e, "Reading playlist from local store failed; creating");
                match playlist.record_value() {
                    Ok(value) => match playlist.store.create(&playlist.id, value).await {
                        Ok(()) => tracing::info!("Succeeded in creating playlist in local store"),
                        Err(e) => tracing::error!(error = %e, "Creating playlist in local store failed"),
                    },
                    Err(e) => tracing::error!(error = %e, "Creating playlist in local store failed"),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Reading playlist from local store failed; starting empty");
            }
        }

        playlist
    }

    /// Replace in-memory state with a stored record.
    ///
    /// The record's song bags are turned into a fresh live collection; a
    /// position that does not point into it is dropped.
    async fn hydrate(&mut self, record: PlaylistRecord) {
        self.songs = SongCollection::from_attributes(record.song_collection);
        self.position = usize::try_from(record.position)
            .ok()
            .filter(|&p| p < self.songs.len());

        if self.position.is_none() && record.position != -1 {
            tracing::warn!(
                stored = record.position,
                songs = self.songs.len(),
                "Stored position is out of range; nothing selected"
            );
        }

        if let Some(song) = self.current_song() {
            self.playing.write().await.change_song(song);
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn songs(&self) -> &SongCollection {
        &self.songs
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Position as stored: -1 when nothing is selected
    pub fn position_index(&self) -> i64 {
        self.position.map_or(-1, |p| p as i64)
    }

    pub fn current_song(&self) -> Option<&Song> {
        self.position.and_then(|p| self.songs.at(p))
    }

    pub fn to_record(&self) -> PlaylistRecord {
        PlaylistRecord {
            id: self.id.clone(),
            position: self.position_index(),
            song_collection: self.songs.to_attributes(),
        }
    }

    fn record_value(&self) -> Result<Value, StoreError> {
        Ok(serde_json::to_value(self.to_record())?)
    }

    /// Write the full playlist state back to the store
    pub async fn persist(&self, operation: &str) -> Result<(), PlaylistError> {
        let result = match self.record_value() {
            Ok(value) => self.store.update(&self.id, value).await,
            Err(e) => Err(e),
        };
        crate::log_sync_result!(operation, result);
        Ok(result?)
    }

    async fn seek_to_index(&mut self, index: usize) {
        let Some(song) = self.songs.at(index) else {
            return;
        };
        self.position = Some(index);
        self.playing.write().await.change_song(song);
    }

    /// Make the song with this identity the current one
    pub async fn seek_to_song(&mut self, id: DisplayId) -> Result<(), PlaylistError> {
        match self.songs.index_of(id) {
            Some(index) => {
                self.seek_to_index(index).await;
                Ok(())
            }
            None => {
                tracing::warn!(display_id = %id, "Tried to seek to a song not in the playlist");
                Err(PlaylistError::SongNotFound(id))
            }
        }
    }

    /// Returns false, changing nothing, when there is no next song
    pub async fn next_song(&mut self) -> bool {
        let next = self.position.map_or(0, |p| p + 1);
        if next >= self.songs.len() {
            return false;
        }
        self.seek_to_index(next).await;
        true
    }

    /// Returns false, changing nothing, at the first song or with nothing selected
    pub async fn prev_song(&mut self) -> bool {
        match self.position {
            Some(p) if p > 0 => {
                self.seek_to_index(p - 1).await;
                true
            }
            _ => false,
        }
    }

    /// Append a song and save. The song stays even if saving fails.
    pub async fn add_song(&mut self, attributes: SongAttributes) -> Result<DisplayId, PlaylistError> {
        let id = self.songs.add(attributes);
        self.persist("add song").await?;
        Ok(id)
    }

    /// Merge an album's tracks into the playlist and save.
    ///
    /// The lock is only taken around the merge, never across the album request.
    pub async fn add_album(playlist: &Mutex<Self>, album_id: u64) -> Result<MergeSummary, PlaylistError> {
        let catalog = playlist.lock().await.catalog.clone();

        let mut album = SongCollection::new();
        album.load_from_album(catalog.as_ref(), album_id).await?;

        let mut playlist = playlist.lock().await;
        let summary = playlist.songs.merge(album.to_attributes());
        tracing::debug!(album_id, total = playlist.songs.len(), "Album tracks merged into playlist");
        playlist.persist("add album").await?;
        Ok(summary)
    }

    /// Remove a song, keeping the position on the same logical song.
    ///
    /// Removing the current song moves on to the next one, or to nothing if it
    /// was the last. An unknown identity is logged and leaves everything as is.
    pub async fn remove_song(&mut self, id: DisplayId) -> Result<Option<Song>, PlaylistError> {
        let Some(removed_index) = self.songs.index_of(id) else {
            tracing::warn!(display_id = %id, "Tried to remove a song not in the playlist");
            return Ok(None);
        };

        if self.position == Some(removed_index) && !self.next_song().await {
            self.position = None;
        }

        let removed = self.songs.remove(id);

        if let Some(position) = self.position {
            if removed_index < position {
                self.position = Some(position - 1);
            }
        }

        self.persist("remove song").await?;
        Ok(removed)
    }
}
