//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `song`: Song attributes, display identities and the now-playing mirror
//! - `collection`: Ordered song collection with album merging
//! - `search`: Debounced search-as-you-type
//! - `playlist`: Playlist position tracking and persistence
//! - `store`: Local key/value store backends
//! - `catalog_client`: potsfyi server API client
//! - `types`: UI state and view snapshots
//! - `app_model`: Application context owning all of the above

mod song;
mod collection;
mod search;
mod playlist;
mod store;
mod catalog_client;
mod types;
mod app_model;

pub use song::SongAttributes;

pub use search::{SearchQuery, SearchState, DEFAULT_SEARCH_DELAY};

pub use playlist::{Playlist, PlaylistError};

pub use store::{JsonFileStore, LocalStore, MemoryStore};

pub use catalog_client::{player_url, CatalogError, song_stream_url, HttpCatalog, WANTED_FORMATS};

pub use types::{ActiveSection, ContentState, SelectedItem, UiState};

pub use app_model::AppModel;

#[cfg(test)]
pub(crate) use collection::tests::MockCatalog;

#[cfg(test)]
pub(crate) use store::tests::FailingStore;

#[cfg(test)]
pub(crate) use app_model::tests::{test_model, test_model_with_store};
