//! Error and help popups drawn over the main layout

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::model::UiState;

const KEYBINDINGS: &[(&str, &str)] = &[
    ("", "Navigation"),
    ("Tab / Shift+Tab", "Cycle sections"),
    ("↑ / ↓", "Move selection"),
    ("/", "Focus search"),
    ("Esc", "Clear search / Back"),
    ("", ""),
    ("", "Playlist"),
    ("Enter", "Add result / Play song"),
    ("N / P", "Next / Previous song"),
    ("D / Delete", "Remove song"),
    ("", ""),
    ("", "General"),
    ("H", "Toggle this help"),
    ("Q / Ctrl+Q", "Quit"),
];

/// Rect of the given size centered in `area`, shrunk to fit with a small margin
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

fn popup_block(title: &'static str, color: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title)
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Black))
}

pub fn render_error_notification(frame: &mut Frame, ui_state: &UiState) {
    let Some(message) = ui_state.error_message.as_deref() else {
        return;
    };

    let width = 56;
    let inner_width = usize::from(width - 4).max(1);
    let lines = message.chars().count().div_ceil(inner_width).max(1) as u16;
    let area = centered(frame.area(), width, lines + 2);

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(message)
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(popup_block(" Error (Esc to dismiss) ", Color::Red)),
        area,
    );
}

pub fn render_help_popup(frame: &mut Frame) {
    let area = centered(frame.area(), 48, KEYBINDINGS.len() as u16 + 2);

    let lines: Vec<Line> = KEYBINDINGS
        .iter()
        .map(|&(key, action)| {
            if key.is_empty() {
                Line::from(Span::styled(
                    action,
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(format!("{:>16}", key), Style::default().fg(Color::Green)),
                    Span::raw("  "),
                    Span::raw(action),
                ])
            }
        })
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(popup_block(" Help (H or Esc to close) ", Color::Cyan)),
        area,
    );
}
