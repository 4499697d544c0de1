use crate::app::{App, AppResult, InputMode};
use crate::orchestrator::Mode;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handles the key events and updates the state of [`App`].
pub fn handle_key_events(key_event: KeyEvent, app: &mut App) -> AppResult<()> {
    match app.input_mode {
        InputMode::Normal => match key_event.code {
            // Exit application on `ESC` or `q`
            KeyCode::Esc | KeyCode::Char('q') => app.quit(),
            KeyCode::Char('i') => app.set_input_mode(InputMode::Editing),
            KeyCode::Char('t') => app.new_tab(),
            KeyCode::Char('w') => app.close_tab(),
            KeyCode::Tab => app.next_tab(),
            KeyCode::BackTab => app.previous_tab(),
            KeyCode::Char('b') => app.toggle_sidebar(),
            KeyCode::Char('h') => app.focus_history(),
            KeyCode::Char('m') => app.cycle_model(),
            KeyCode::Char('o') => app.toggle_thoughts(),
            KeyCode::Up | KeyCode::Char('k') => app.increment_vertical_scroll(),
            KeyCode::Down | KeyCode::Char('j') => app.decrement_vertical_scroll(),
            _ => {}
        },
        InputMode::History => match key_event.code {
            KeyCode::Esc => app.set_input_mode(InputMode::Normal),
            KeyCode::Up | KeyCode::Char('k') => app.history.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => app.history.select_next(),
            KeyCode::Enter => app.open_selected_history(),
            _ => {}
        },
        InputMode::Editing => {
            let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
            match key_event.code {
                // Exit editing mode on `ESC`
                KeyCode::Esc => app.set_input_mode(InputMode::Normal),
                KeyCode::Char('t') if ctrl => app.toggle_mode(Mode::Translate),
                KeyCode::Char('r') if ctrl => app.toggle_mode(Mode::Think),
                KeyCode::Char('f') if ctrl => app.toggle_mode(Mode::File),
                KeyCode::Enter => {
                    if key_event.modifiers == KeyModifiers::NONE {
                        app.input_textarea.input(key_event);
                    } else {
                        app.submit_message();
                    }
                }
                _ => {
                    if !app.is_waiting() {
                        app.input_textarea.input(key_event);
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::sample_history;
    use crate::models::Model;
    use crate::orchestrator::Chat;
    use crate::presenter::StreamingPresenter;
    use crate::provider::CannedProvider;
    use std::sync::Arc;
    use std::time::Duration;

    fn app() -> App<'static> {
        let (chat, _rx) = Chat::new(
            Arc::new(CannedProvider),
            StreamingPresenter::new(2, Duration::ZERO),
            Model::default(),
        );
        App::new(chat, sample_history().into_iter().collect())
    }

    fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        handle_key_events(KeyEvent::new(code, modifiers), app).unwrap();
    }

    #[test]
    fn normal_mode_manages_tabs() {
        let mut app = app();
        press(&mut app, KeyCode::Char('t'), KeyModifiers::NONE);
        assert_eq!(app.chat.tabs.len(), 2);
        press(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(app.chat.tabs.active_index(), 0);
        press(&mut app, KeyCode::Char('w'), KeyModifiers::NONE);
        assert_eq!(app.chat.tabs.len(), 1);
        press(&mut app, KeyCode::Char('w'), KeyModifiers::NONE);
        assert_eq!(app.chat.tabs.len(), 1);
        press(&mut app, KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(!app.running);
    }

    #[test]
    fn editing_shortcuts_toggle_modes() {
        let mut app = app();
        press(&mut app, KeyCode::Char('i'), KeyModifiers::NONE);
        assert_eq!(app.input_mode, InputMode::Editing);
        press(&mut app, KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(app.mode, Mode::Think);
        press(&mut app, KeyCode::Char('t'), KeyModifiers::CONTROL);
        assert_eq!(app.mode, Mode::Translate);
        press(&mut app, KeyCode::Char('t'), KeyModifiers::CONTROL);
        assert_eq!(app.mode, Mode::None);
        press(&mut app, KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(app.input_textarea.lines().join(""), "x");
    }

    #[tokio::test]
    async fn modified_enter_sends() {
        let mut app = app();
        press(&mut app, KeyCode::Char('i'), KeyModifiers::NONE);
        for c in "hey".chars() {
            press(&mut app, KeyCode::Char(c), KeyModifiers::NONE);
        }
        press(&mut app, KeyCode::Enter, KeyModifiers::ALT);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.chat.tabs.active().messages.len(), 2);
        assert_eq!(app.chat.tabs.active().title, "hey");
    }

    #[test]
    fn history_focus_opens_entries() {
        let mut app = app();
        press(&mut app, KeyCode::Char('h'), KeyModifiers::NONE);
        press(&mut app, KeyCode::Char('k'), KeyModifiers::NONE);
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.chat.tabs.active().title, "Bug Investigation");
    }
}
