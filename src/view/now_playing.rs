//! Now-playing bar

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::{player_url, song_stream_url, ContentState, SongAttributes, WANTED_FORMATS};

/// Link to hand to the browser for the current song
fn playback_link(server_url: &str, attributes: &SongAttributes) -> String {
    match attributes.server_id() {
        Some(id) => format!("{}{}", server_url, song_stream_url(id, &WANTED_FORMATS)),
        None => format!("{}{}", server_url, player_url(&attributes.filename)),
    }
}

pub fn render_now_playing(frame: &mut Frame, area: Rect, content_state: &ContentState) {
    let line = match &content_state.now_playing {
        Some(attributes) => {
            let position = content_state
                .position
                .map(|p| format!("[{}/{}] ", p + 1, content_state.playlist.len()))
                .unwrap_or_default();
            Line::from(vec![
                Span::styled("▶ ", Style::default().fg(Color::Green)),
                Span::styled(position, Style::default().fg(Color::DarkGray)),
                Span::styled(
                    attributes.display_label(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    playback_link(&content_state.server_url, attributes),
                    Style::default().fg(Color::Cyan),
                ),
            ])
        }
        None => Line::from(Span::styled(
            "Nothing playing (n to start the playlist)",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let bar = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Now Playing ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(bar, area);
}
