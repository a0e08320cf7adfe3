//! Main content area rendering (search results and playlist)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{ListItem, Paragraph},
    Frame,
};

use crate::model::{ActiveSection, ContentState, SearchState, SongAttributes, UiState};
use super::utils::{calculate_num_width, render_scrollable_list, section_block, truncate_string};

fn item_style(is_selected: bool, is_focused: bool) -> Style {
    if is_selected && is_focused {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else if is_selected {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

pub fn render_search_results(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    content_state: &ContentState,
) {
    let is_focused = ui_state.active_section == ActiveSection::Results;
    let search = &content_state.search;

    let title = match (&search.last_error, search.state) {
        (Some(_), _) => " Results (search failed) ".to_string(),
        (None, SearchState::Fetching) => " Results (loading...) ".to_string(),
        (None, _) if search.results_query.is_empty() => " Results ".to_string(),
        (None, _) => format!(" Results for \"{}\" ({}) ", search.results_query, search.results.len()),
    };
    let block = section_block(title, is_focused);

    if search.results.is_empty() {
        let hint = match (&search.last_error, search.query.is_empty()) {
            (Some(error), _) => error.clone(),
            (None, true) => "Type in the search box to find albums and tracks".to_string(),
            (None, false) if search.state == SearchState::Idle => "No matches".to_string(),
            (None, false) => "Searching...".to_string(),
        };
        let color = if search.last_error.is_some() { Color::Red } else { Color::DarkGray };
        let paragraph = Paragraph::new(hint)
            .style(Style::default().fg(color))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let content_width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = search
        .results
        .iter()
        .enumerate()
        .map(|(i, song)| {
            let style = item_style(i == ui_state.results_selected, is_focused);
            ListItem::new(result_line(song.attributes(), content_width)).style(style)
        })
        .collect();

    render_scrollable_list(frame, area, items, ui_state.results_selected, block);
}

/// Albums get a disc marker; tracks show their album when the server sent one
fn result_line(attributes: &SongAttributes, width: usize) -> Line<'static> {
    let (marker, marker_color) = if attributes.is_album() {
        ("◉ ", Color::Yellow)
    } else {
        ("♪ ", Color::Cyan)
    };

    let label = match attributes.album_title() {
        Some(album) if !attributes.is_album() && !album.is_empty() => {
            format!("{} [{}]", attributes.display_label(), album)
        }
        _ => attributes.display_label(),
    };

    Line::from(vec![
        Span::styled(marker, Style::default().fg(marker_color)),
        Span::raw(truncate_string(&label, width.saturating_sub(2))),
    ])
}

pub fn render_playlist(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    content_state: &ContentState,
) {
    let is_focused = ui_state.active_section == ActiveSection::Playlist;
    let title = format!(" Playlist ({}) ", content_state.playlist.len());
    let block = section_block(title, is_focused);

    if content_state.playlist.is_empty() {
        let empty = Paragraph::new("Playlist is empty\n\nPress Enter on a search result to add it")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let num_width = calculate_num_width(content_state.playlist.len());
    let content_width = area.width.saturating_sub(4) as usize;
    let label_width = content_width.saturating_sub(num_width + 3);

    let items: Vec<ListItem> = content_state
        .playlist
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let is_current = content_state.position == Some(i);
            let marker = if is_current { "▶ " } else { "  " };
            let label = truncate_string(&entry.attributes.display_label(), label_width);

            let mut style = item_style(i == ui_state.playlist_selected, is_focused);
            if is_current {
                style = style.fg(Color::Magenta);
            }

            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Magenta)),
                Span::styled(
                    format!("{:>width$} ", i + 1, width = num_width),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(label),
            ]))
            .style(style)
        })
        .collect();

    render_scrollable_list(frame, area, items, ui_state.playlist_selected, block);
}
