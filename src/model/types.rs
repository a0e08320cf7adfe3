//! Core type definitions for the application

use std::time::Instant;

use super::song::{DisplayId, SongAttributes};
use super::search::SearchSnapshot;

/// Which section of the UI is currently active/focused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSection {
    Search,
    Results,
    Playlist,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::Results,
            ActiveSection::Results => ActiveSection::Playlist,
            ActiveSection::Playlist => ActiveSection::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::Playlist,
            ActiveSection::Results => ActiveSection::Search,
            ActiveSection::Playlist => ActiveSection::Results,
        }
    }
}

/// UI state for the application
#[derive(Clone)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub search_input: String,
    pub results_selected: usize,
    pub playlist_selected: usize,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::Search,
            search_input: String::new(),
            results_selected: 0,
            playlist_selected: 0,
            error_message: None,
            error_timestamp: None,
            show_help_popup: false,
        }
    }
}

/// A playlist row as the view sees it
#[derive(Clone, Debug)]
pub struct PlaylistEntry {
    pub id: DisplayId,
    pub attributes: SongAttributes,
}

/// Snapshot of everything the view renders besides the UI state
#[derive(Clone, Debug, Default)]
pub struct ContentState {
    pub search: SearchSnapshot,
    pub playlist: Vec<PlaylistEntry>,
    pub position: Option<usize>,
    pub now_playing: Option<SongAttributes>,
    pub server_url: String,
}

/// What Enter on a search result should do
#[derive(Clone, Debug, PartialEq)]
pub enum SelectedItem {
    Album { id: u64, title: String },
    Song { attributes: SongAttributes },
}

impl SelectedItem {
    pub fn from_result(attributes: &SongAttributes) -> Self {
        match attributes.server_id() {
            Some(id) if attributes.is_album() => SelectedItem::Album {
                id,
                title: attributes.title.clone(),
            },
            _ => SelectedItem::Song {
                attributes: attributes.clone(),
            },
        }
    }
}
