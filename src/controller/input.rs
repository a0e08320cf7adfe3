//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::ActiveSection;
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = &self.model;

        // Handle error message first (blocks all other interactions)
        if model.has_error().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                model.clear_error().await;
            }
            return Ok(());
        }

        // Handle help popup
        if model.is_help_popup_open().await {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H')) {
                model.hide_help_popup().await;
            }
            return Ok(());
        }

        let ui_state = model.get_ui_state().await;

        // Handle search input when in search section
        if ui_state.active_section == ActiveSection::Search {
            match key.code {
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        model.cycle_section_backward().await;
                    } else {
                        model.cycle_section_forward().await;
                    }
                    return Ok(());
                }
                KeyCode::BackTab => {
                    model.cycle_section_backward().await;
                    return Ok(());
                }
                KeyCode::Enter | KeyCode::Down => {
                    model.set_active_section(ActiveSection::Results).await;
                    return Ok(());
                }
                KeyCode::Esc => {
                    model.clear_search().await;
                    return Ok(());
                }
                KeyCode::Backspace => {
                    model.backspace_search().await;
                    return Ok(());
                }
                KeyCode::Char(c) => {
                    // Q still quits even in search mode when Ctrl is pressed
                    if (c == 'q' || c == 'Q') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        model.set_should_quit(true).await;
                        return Ok(());
                    }
                    model.append_to_search(c).await;
                    return Ok(());
                }
                _ => {}
            }
        }

        if ui_state.active_section == ActiveSection::Results {
            match key.code {
                KeyCode::Enter => {
                    self.add_selected_result().await;
                    return Ok(());
                }
                KeyCode::Esc => {
                    model.set_active_section(ActiveSection::Search).await;
                    return Ok(());
                }
                _ => {}
            }
        }

        if ui_state.active_section == ActiveSection::Playlist {
            match key.code {
                KeyCode::Enter => {
                    self.play_selected().await;
                    return Ok(());
                }
                KeyCode::Delete | KeyCode::Char('d') | KeyCode::Char('D') => {
                    self.remove_selected().await;
                    return Ok(());
                }
                _ => {}
            }
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    model.cycle_section_backward().await;
                } else {
                    model.cycle_section_forward().await;
                }
            }
            KeyCode::BackTab => {
                model.cycle_section_backward().await;
            }
            KeyCode::Up => {
                model.move_selection_up().await;
            }
            KeyCode::Down => {
                model.move_selection_down().await;
            }
            KeyCode::Char('/') => {
                model.set_active_section(ActiveSection::Search).await;
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.next_song().await;
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.prev_song().await;
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.show_help_popup().await;
            }
            _ => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{test_model, MockCatalog};
    use std::sync::Arc;
    use std::time::Duration;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_goes_to_search_box() {
        let (model, catalog) = test_model(MockCatalog::default()).await;
        let controller = AppController::new(Arc::new(model));

        for c in "qn".chars() {
            controller.handle_key_event(press(KeyCode::Char(c))).await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(!controller.model.should_quit().await);
        assert_eq!(controller.model.get_ui_state().await.search_input, "qn");
        assert_eq!(catalog.requests(), vec!["search:qn"]);

        controller.handle_key_event(press(KeyCode::Esc)).await.unwrap();
        assert_eq!(controller.model.get_ui_state().await.search_input, "");
    }

    #[tokio::test]
    async fn test_error_overlay_swallows_keys() {
        let (model, _) = test_model(MockCatalog::default()).await;
        let controller = AppController::new(Arc::new(model));
        controller.model.set_error("Sync failed".to_string()).await;

        controller.handle_key_event(press(KeyCode::Char('x'))).await.unwrap();
        assert_eq!(controller.model.get_ui_state().await.search_input, "");

        controller.handle_key_event(press(KeyCode::Esc)).await.unwrap();
        assert!(!controller.model.has_error().await);
    }

    #[tokio::test]
    async fn test_quit_outside_search() {
        let (model, _) = test_model(MockCatalog::default()).await;
        let controller = AppController::new(Arc::new(model));

        controller.handle_key_event(press(KeyCode::Tab)).await.unwrap();
        assert_eq!(controller.model.get_ui_state().await.active_section, ActiveSection::Results);

        controller.handle_key_event(press(KeyCode::Char('q'))).await.unwrap();
        assert!(controller.model.should_quit().await);
    }
}
