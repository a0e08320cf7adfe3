//! Main application model: owns every component for the whole session

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};

use super::catalog_client::CatalogApi;
use super::playlist::Playlist;
use super::search::SearchQuery;
use super::song::{DisplayId, PlayingSong};
use super::store::LocalStore;
use super::types::{ActiveSection, ContentState, PlaylistEntry, SelectedItem, UiState};

const ERROR_DISPLAY_SECS: u64 = 5;

/// Application context: constructed once at startup, lives until exit
pub struct AppModel {
    playlist: Arc<Mutex<Playlist>>,
    playing: Arc<RwLock<PlayingSong>>,
    search: Mutex<SearchQuery>,
    pub ui_state: Arc<Mutex<UiState>>,
    should_quit: Arc<Mutex<bool>>,
    server_url: String,
}

impl AppModel {
    /// Wire up the components and run the playlist bootstrap
    pub async fn init(
        store: Arc<dyn LocalStore>,
        catalog: Arc<dyn CatalogApi>,
        search: SearchQuery,
        server_url: String,
    ) -> Self {
        let playing = Arc::new(RwLock::new(PlayingSong::new()));
        let playlist = Playlist::bootstrap(store, catalog, playing.clone()).await;
        let mut ui_state = UiState::default();
        ui_state.playlist_selected = playlist.position().unwrap_or(0);

        Self {
            playlist: Arc::new(Mutex::new(playlist)),
            playing,
            search: Mutex::new(search),
            ui_state: Arc::new(Mutex::new(ui_state)),
            should_quit: Arc::new(Mutex::new(false)),
            server_url,
        }
    }

    pub fn playlist(&self) -> Arc<Mutex<Playlist>> {
        self.playlist.clone()
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    /// Drop any scheduled search before exit; in-flight requests are left alone
    pub async fn shutdown(&self) {
        let mut search = self.search.lock().await;
        let state = search.state().await;
        tracing::debug!(
            query = search.query(),
            state = ?state,
            pending = search.has_pending_timer(),
            "Stopping search"
        );
        search.cancel().await;
        drop(search);

        let playlist = self.playlist.lock().await;
        tracing::info!(
            playlist_id = playlist.id(),
            songs = playlist.songs().len(),
            position = ?playlist.position(),
            "Session ended"
        );
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn get_content_state(&self) -> ContentState {
        let search = self.search.lock().await.snapshot().await;
        let (playlist, position) = {
            let playlist = self.playlist.lock().await;
            let entries = playlist
                .songs()
                .iter()
                .map(|song| PlaylistEntry {
                    id: song.display_id(),
                    attributes: song.attributes().clone(),
                })
                .collect();
            (entries, playlist.position())
        };
        let now_playing = {
            let playing = self.playing.read().await;
            playing.is_loaded().then(|| playing.attributes().clone())
        };

        ContentState {
            search,
            playlist,
            position,
            now_playing,
            server_url: self.server_url.clone(),
        }
    }

    // ========================================================================
    // Sections & search input
    // ========================================================================

    pub async fn cycle_section_forward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.next();
    }

    pub async fn cycle_section_backward(&self) {
        let mut state = self.ui_state.lock().await;
        state.active_section = state.active_section.prev();
    }

    pub async fn set_active_section(&self, section: ActiveSection) {
        let mut state = self.ui_state.lock().await;
        state.active_section = section;
    }

    async fn push_search_input(&self, input: String) {
        {
            let mut state = self.ui_state.lock().await;
            state.search_input = input.clone();
            state.results_selected = 0;
        }
        self.search.lock().await.update_query(&input).await;
    }

    pub async fn append_to_search(&self, c: char) {
        let mut input = self.ui_state.lock().await.search_input.clone();
        input.push(c);
        self.push_search_input(input).await;
    }

    pub async fn backspace_search(&self) {
        let mut input = self.ui_state.lock().await.search_input.clone();
        input.pop();
        self.push_search_input(input).await;
    }

    pub async fn clear_search(&self) {
        self.push_search_input(String::new()).await;
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub async fn move_selection_up(&self) {
        let mut state = self.ui_state.lock().await;
        match state.active_section {
            ActiveSection::Results => {
                state.results_selected = state.results_selected.saturating_sub(1);
            }
            ActiveSection::Playlist => {
                state.playlist_selected = state.playlist_selected.saturating_sub(1);
            }
            ActiveSection::Search => {}
        }
    }

    pub async fn move_selection_down(&self) {
        let section = self.ui_state.lock().await.active_section;
        let len = match section {
            ActiveSection::Results => self.search.lock().await.results().await.len(),
            ActiveSection::Playlist => self.playlist.lock().await.songs().len(),
            ActiveSection::Search => return,
        };

        let mut state = self.ui_state.lock().await;
        let selected = match section {
            ActiveSection::Results => &mut state.results_selected,
            _ => &mut state.playlist_selected,
        };
        if *selected < len.saturating_sub(1) {
            *selected += 1;
        }
    }

    pub async fn get_selected_result(&self) -> Option<SelectedItem> {
        let index = self.ui_state.lock().await.results_selected;
        let results = self.search.lock().await.results().await;
        results.at(index).map(|song| SelectedItem::from_result(song.attributes()))
    }

    pub async fn get_selected_playlist_song(&self) -> Option<DisplayId> {
        let index = self.ui_state.lock().await.playlist_selected;
        let playlist = self.playlist.lock().await;
        playlist.songs().at(index).map(|song| song.display_id())
    }

    /// Keep the playlist cursor inside the list after it shrank
    pub async fn clamp_playlist_selection(&self) {
        let len = self.playlist.lock().await.songs().len();
        let mut state = self.ui_state.lock().await;
        state.playlist_selected = state.playlist_selected.min(len.saturating_sub(1));
    }

    /// Move the playlist cursor onto the current song
    pub async fn follow_position(&self) {
        if let Some(position) = self.playlist.lock().await.position() {
            self.ui_state.lock().await.playlist_selected = position;
        }
    }

    // ========================================================================
    // Overlays
    // ========================================================================

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed().as_secs() > ERROR_DISPLAY_SECS {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::collection::tests::MockCatalog;
    use crate::model::search::DEFAULT_SEARCH_DELAY;
    use crate::model::song::SongAttributes;
    use crate::model::store::MemoryStore;
    use std::time::Duration;

    pub(crate) async fn test_model(catalog: MockCatalog) -> (AppModel, Arc<MockCatalog>) {
        test_model_with_store(catalog, Arc::new(MemoryStore::new())).await
    }

    pub(crate) async fn test_model_with_store(
        catalog: MockCatalog,
        store: Arc<dyn LocalStore>,
    ) -> (AppModel, Arc<MockCatalog>) {
        let catalog = Arc::new(catalog);
        let search = SearchQuery::new(catalog.clone(), DEFAULT_SEARCH_DELAY);
        let model = AppModel::init(
            store,
            catalog.clone(),
            search,
            "http://127.0.0.1:5000".to_string(),
        )
        .await;
        (model, catalog)
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_feeds_one_debounced_search() {
        let (model, catalog) = test_model(MockCatalog {
            search_results: vec![SongAttributes::new("X", "Y", "y.mp3")],
            ..Default::default()
        })
        .await;

        for c in "abc".chars() {
            model.append_to_search(c).await;
        }
        model.backspace_search().await;
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(catalog.requests(), vec!["search:ab"]);
        let content = model.get_content_state().await;
        assert_eq!(content.search.results.len(), 1);
        assert_eq!(model.get_ui_state().await.search_input, "ab");
    }

    #[tokio::test]
    async fn test_selection_is_clamped_to_playlist() {
        let (model, _) = test_model(MockCatalog::default()).await;
        {
            let playlist = model.playlist();
            let mut playlist = playlist.lock().await;
            playlist.add_song(SongAttributes::new("A", "T1", "a.mp3")).await.unwrap();
            playlist.add_song(SongAttributes::new("A", "T2", "b.mp3")).await.unwrap();
        }

        model.set_active_section(ActiveSection::Playlist).await;
        for _ in 0..5 {
            model.move_selection_down().await;
        }
        assert_eq!(model.get_ui_state().await.playlist_selected, 1);

        model.move_selection_up().await;
        model.move_selection_up().await;
        assert_eq!(model.get_ui_state().await.playlist_selected, 0);
    }

    #[tokio::test]
    async fn test_content_state_reports_now_playing() {
        let (model, _) = test_model(MockCatalog::default()).await;
        assert!(model.get_content_state().await.now_playing.is_none());

        {
            let playlist = model.playlist();
            let mut playlist = playlist.lock().await;
            let id = playlist.add_song(SongAttributes::new("A", "T1", "a.mp3")).await.unwrap();
            playlist.seek_to_song(id).await.unwrap();
        }

        let content = model.get_content_state().await;
        assert_eq!(content.position, Some(0));
        assert_eq!(content.now_playing.unwrap().title, "T1");
    }

    #[tokio::test]
    async fn test_errors_can_be_dismissed() {
        let (model, _) = test_model(MockCatalog::default()).await;
        model.set_error("Sync failed".to_string()).await;
        assert!(model.has_error().await);
        model.auto_clear_old_errors().await;
        assert!(model.has_error().await);
        model.clear_error().await;
        assert!(!model.has_error().await);
    }
}
