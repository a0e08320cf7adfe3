//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (truncation, scrollable lists)
//! - `layout`: Top bar with the search box
//! - `content`: Search results and playlist panes
//! - `now_playing`: Now-playing bar
//! - `overlays`: Modal overlays (error, help)

mod utils;
mod layout;
mod content;
mod now_playing;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{ContentState, UiState};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, ui_state: &UiState, content_state: &ContentState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar + server
                Constraint::Min(0),    // Results + playlist
                Constraint::Length(3), // Now playing
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], ui_state, content_state);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(50), // Search results
                Constraint::Percentage(50), // Playlist
            ])
            .split(chunks[1]);

        content::render_search_results(frame, main_chunks[0], ui_state, content_state);
        content::render_playlist(frame, main_chunks[1], ui_state, content_state);

        now_playing::render_now_playing(frame, chunks[2], content_state);

        // Error notification overlay (if there's an error)
        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        // Help popup overlay (if open)
        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
