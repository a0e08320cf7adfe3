//! Top bar rendering (search box and server)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::{ActiveSection, ContentState, SearchState, UiState};

pub fn render_top_bar(frame: &mut Frame, area: Rect, ui_state: &UiState, content_state: &ContentState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Search input
            Constraint::Length(32), // Server
        ])
        .split(area);

    let is_focused = ui_state.active_section == ActiveSection::Search;
    let search_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };

    let search_text = if ui_state.search_input.is_empty() {
        "Type to search..."
    } else {
        &ui_state.search_input
    };

    let title = match content_state.search.state {
        SearchState::Idle => " Search ",
        SearchState::Pending => " Search … ",
        SearchState::Fetching => " Search (searching) ",
    };

    let search = Paragraph::new(search_text)
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .padding(Padding::horizontal(1))
                .border_style(if is_focused {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                }),
        );
    frame.render_widget(search, chunks[0]);

    let server = Paragraph::new(content_state.server_url.as_str())
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title(" Server "));
    frame.render_widget(server, chunks[1]);
}
