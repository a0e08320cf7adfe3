//! Ordered song collection shared by the playlist and the search results

use super::catalog_client::{CatalogApi, CatalogError};
use super::song::{DisplayId, Song, SongAttributes, SongUpdate};

/// Outcome of merging server objects into a collection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub added: usize,
    pub updated: usize,
}

/// Songs in insertion order, looked up by display identity
#[derive(Clone, Debug, Default)]
pub struct SongCollection {
    songs: Vec<Song>,
}

impl SongCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a live collection from plain attribute bags, keeping their order
    pub fn from_attributes(attributes: Vec<SongAttributes>) -> Self {
        let mut collection = Self::new();
        collection.set(attributes);
        collection
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Song> {
        self.songs.iter()
    }

    pub fn at(&self, index: usize) -> Option<&Song> {
        self.songs.get(index)
    }

    pub fn get(&self, id: DisplayId) -> Option<&Song> {
        self.songs.iter().find(|s| s.display_id() == id)
    }

    pub fn index_of(&self, id: DisplayId) -> Option<usize> {
        self.songs.iter().position(|s| s.display_id() == id)
    }

    /// Append a new song built from `attributes`
    pub fn add(&mut self, attributes: SongAttributes) -> DisplayId {
        self.push(Song::new(attributes))
    }

    pub fn push(&mut self, song: Song) -> DisplayId {
        let id = song.display_id();
        self.songs.push(song);
        id
    }

    pub fn remove(&mut self, id: DisplayId) -> Option<Song> {
        match self.index_of(id) {
            Some(index) => Some(self.songs.remove(index)),
            None => {
                tracing::warn!(display_id = %id, "Tried to remove a song that is not in the collection");
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.songs.clear();
    }

    /// Replace the whole content with fresh songs
    pub fn set(&mut self, attributes: Vec<SongAttributes>) {
        self.songs = attributes.into_iter().map(Song::new).collect();
    }

    /// Add or update without removing anything.
    ///
    /// An incoming object whose server `id` matches a song already present
    /// updates that song in place; everything else is appended.
    pub fn merge(&mut self, attributes: Vec<SongAttributes>) -> MergeSummary {
        let mut summary = MergeSummary::default();

        for attrs in attributes {
            let existing = attrs.server_id().and_then(|server_id| {
                self.songs
                    .iter()
                    .position(|s| s.attributes().server_id() == Some(server_id))
            });

            match existing {
                Some(index) => {
                    self.songs[index].set_attributes(SongUpdate::from(attrs));
                    summary.updated += 1;
                }
                None => {
                    self.add(attrs);
                    summary.added += 1;
                }
            }
        }

        summary
    }

    /// Fetch an album and merge its tracks. Nothing changes if the fetch fails.
    pub async fn load_from_album(
        &mut self,
        catalog: &dyn CatalogApi,
        album_id: u64,
    ) -> Result<MergeSummary, CatalogError> {
        let tracks = catalog.album(album_id).await?;
        let summary = self.merge(tracks);
        tracing::info!(
            album_id,
            added = summary.added,
            updated = summary.updated,
            total = self.len(),
            "Album merged into collection"
        );
        Ok(summary)
    }

    /// Plain attribute bags in order, the shape that gets persisted
    pub fn to_attributes(&self) -> Vec<SongAttributes> {
        self.songs.iter().map(|s| s.attributes().clone()).collect()
    }
}
