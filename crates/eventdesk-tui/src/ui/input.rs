//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};

use eventdesk_core::models::ShirtSize;
use eventdesk_core::seating::group_options;

use crate::app::{
    can_add_note_char, can_add_operator_char, can_add_passcode_char, can_add_search_char, App,
    AppState, LoginFocus, Tab, PAGE_SCROLL_SIZE,
};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        AppState::LoggingIn => return Ok(handle_login_input(app, key)),
        AppState::Searching => {
            handle_search_input(app, key);
            return Ok(false);
        }
        AppState::EditingNote => {
            handle_note_input(app, key);
            return Ok(false);
        }
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?' | 'q')) {
                app.state = AppState::Normal;
            }
            return Ok(false);
        }
        AppState::ConfirmingQuit => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    app.state = AppState::Quitting;
                    return Ok(true);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        AppState::Quitting => return Ok(true),
        AppState::Normal => {}
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char('L') => {
            app.start_login();
            return Ok(false);
        }
        KeyCode::Char('S') => {
            let result = app.desk.save_all();
            app.report(result, |_| "All changes saved".to_string());
            return Ok(false);
        }
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            app.current_tab = Tab::ALL[index];
            return Ok(false);
        }
        KeyCode::Left => {
            app.current_tab = app.current_tab.prev();
            return Ok(false);
        }
        KeyCode::Right => {
            app.current_tab = app.current_tab.next();
            return Ok(false);
        }
        _ => {}
    }

    match app.current_tab {
        Tab::Terminal => handle_terminal_input(app, key),
        Tab::Transport => handle_transport_input(app, key),
        Tab::Inventory => handle_inventory_input(app, key),
        Tab::Dashboard => {}
        Tab::Activity => handle_activity_input(app, key),
    }
    Ok(false)
}

/// Move a list selection, clamped to `len`
fn move_selection(selection: &mut usize, len: usize, code: KeyCode) {
    if len == 0 {
        *selection = 0;
        return;
    }
    let last = len - 1;
    *selection = match code {
        KeyCode::Up => selection.saturating_sub(1),
        KeyCode::Down => (*selection + 1).min(last),
        KeyCode::PageUp => selection.saturating_sub(PAGE_SCROLL_SIZE),
        KeyCode::PageDown => (*selection + PAGE_SCROLL_SIZE).min(last),
        KeyCode::Home => 0,
        KeyCode::End => last,
        _ => (*selection).min(last),
    };
}

fn is_navigation(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Up
            | KeyCode::Down
            | KeyCode::PageUp
            | KeyCode::PageDown
            | KeyCode::Home
            | KeyCode::End
    )
}

fn handle_terminal_input(app: &mut App, key: KeyEvent) {
    if is_navigation(key.code) {
        let len = app.search_results().len();
        move_selection(&mut app.terminal_selection, len, key.code);
        return;
    }

    match key.code {
        KeyCode::Char('/') => {
            app.state = AppState::Searching;
            app.search_query.clear();
            app.terminal_selection = 0;
        }
        KeyCode::Enter => app.check_in_selected(),
        KeyCode::Char('k') => app.toggle_kit_selected(),
        KeyCode::Char('f') => app.toggle_food_selected(),
        KeyCode::Char('b') => app.cycle_bus_selected(),
        KeyCode::Char('x') => app.unassign_selected(),
        KeyCode::Char('n') => app.start_note_edit(),
        KeyCode::Char('z') => app.undo_check_in_selected(),
        KeyCode::Esc => {
            app.search_query.clear();
            app.terminal_selection = 0;
        }
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.search_query.clear();
            app.terminal_selection = 0;
            app.state = AppState::Normal;
        }
        KeyCode::Enter => {
            app.state = AppState::Normal;
            // A single match is checked in straight away
            if app.search_results().len() == 1 {
                app.check_in_selected();
            }
        }
        KeyCode::Backspace => {
            app.search_query.pop();
            app.terminal_selection = 0;
        }
        KeyCode::Char(c) if can_add_search_char(app.search_query.len(), c) => {
            app.search_query.push(c);
            app.terminal_selection = 0;
        }
        _ => {}
    }
}

fn handle_note_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.note_input.clear();
            app.state = AppState::Normal;
        }
        KeyCode::Enter => app.save_note(),
        KeyCode::Backspace => {
            app.note_input.pop();
        }
        KeyCode::Char(c) if can_add_note_char(app.note_input.chars().count(), c) => {
            app.note_input.push(c);
        }
        _ => {}
    }
}

fn handle_transport_input(app: &mut App, key: KeyEvent) {
    let fleet_len = app.desk.context().fleet.len();

    if is_navigation(key.code) {
        let len = group_options(app.desk.roster().attendees(), app.transport.group_field).len();
        let before = app.transport.group_selection;
        move_selection(&mut app.transport.group_selection, len, key.code);
        if before != app.transport.group_selection {
            app.transport.last_plan = None;
        }
        return;
    }

    match key.code {
        KeyCode::Char('g') => app.transport.toggle_group_field(),
        KeyCode::Char(']') => app.transport.cycle_start_bus(fleet_len, true),
        KeyCode::Char('[') => app.transport.cycle_start_bus(fleet_len, false),
        KeyCode::Char('s') => {
            let seed = Utc::now().timestamp_millis().unsigned_abs();
            app.transport.toggle_lottery(seed);
        }
        KeyCode::Char('w') => {
            app.transport.stop_when_full = !app.transport.stop_when_full;
            app.transport.last_plan = None;
        }
        KeyCode::Char('p') => app.preview_assignment(),
        KeyCode::Char('a') => app.run_assignment(),
        KeyCode::Char('r') => app.reset_selected_group(),
        KeyCode::Tab if fleet_len > 0 => {
            app.transport.bus_selection = (app.transport.bus_selection + 1) % fleet_len;
        }
        _ => {}
    }
}

fn handle_inventory_input(app: &mut App, key: KeyEvent) {
    if is_navigation(key.code) {
        move_selection(&mut app.stock_selection, ShirtSize::ALL.len(), key.code);
        return;
    }

    match key.code {
        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_stock(1),
        KeyCode::Char('-') => app.adjust_stock(-1),
        KeyCode::Char(']') => app.adjust_stock(10),
        KeyCode::Char('[') => app.adjust_stock(-10),
        _ => {}
    }
}

fn handle_activity_input(app: &mut App, key: KeyEvent) {
    if is_navigation(key.code) {
        let len = app.desk.activity().len();
        move_selection(&mut app.activity_scroll, len, key.code);
        return;
    }

    if key.code == KeyCode::Char('c') {
        app.clear_activity();
    }
}

/// Returns true if the app should quit
fn handle_login_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Quitting;
            return true;
        }
        KeyCode::Down | KeyCode::Tab => app.login_focus = app.login_focus.next(),
        KeyCode::Up | KeyCode::BackTab => app.login_focus = app.login_focus.prev(),
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Operator => app.login_focus = LoginFocus::Passcode,
            LoginFocus::Passcode | LoginFocus::Button => app.attempt_login(),
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Operator => {
                app.login_operator.pop();
            }
            LoginFocus::Passcode => {
                app.login_passcode.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => {
            let operator_len = app.login_operator.chars().count();
            match app.login_focus {
                LoginFocus::Operator if can_add_operator_char(operator_len, c) => {
                    app.login_operator.push(c);
                }
                LoginFocus::Passcode if can_add_passcode_char(app.login_passcode.len(), c) => {
                    app.login_passcode.push(c);
                }
                _ => {}
            }
        }
        _ => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use eventdesk_core::auth::{Access, Operator};
    use eventdesk_core::store::JsonStore;
    use eventdesk_core::{Config, EventDesk};

    fn temp_app(name: &str) -> App {
        let dir = std::env::temp_dir().join(format!(
            "eventdesk-input-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        let config = Config::default();
        let store = JsonStore::new(dir).unwrap();
        let desk = EventDesk::open(store, config.fleet(), Operator::new("Desk", Access::Admin));
        App::new(desk, config)
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn cleanup(app: &App) {
        let _ = std::fs::remove_dir_all(app.desk.store().data_dir());
    }

    // ------------------------------------------------------------------------
    // Text Entry Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_search_ignores_rejected_chars() {
        let mut app = temp_app("search");
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.state, AppState::Searching);

        press(&mut app, KeyCode::Char('r'));
        press(&mut app, KeyCode::Char('\t'));
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.search_query, "ra");

        for _ in 0..100 {
            press(&mut app, KeyCode::Char('x'));
        }
        assert_eq!(app.search_query.len(), 64);
        assert_eq!(app.state, AppState::Searching);
        cleanup(&app);
    }

    #[test]
    fn test_help_closes_on_q_without_quitting() {
        let mut app = temp_app("help");
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.state, AppState::ShowingHelp);

        assert!(!press(&mut app, KeyCode::Char('x')));
        assert_eq!(app.state, AppState::ShowingHelp);
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.state, AppState::Normal);
        cleanup(&app);
    }

    // ------------------------------------------------------------------------
    // Navigation Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_move_selection_clamps() {
        let mut sel = 0;
        move_selection(&mut sel, 5, KeyCode::Up);
        assert_eq!(sel, 0);
        move_selection(&mut sel, 5, KeyCode::PageDown);
        assert_eq!(sel, 4);
        move_selection(&mut sel, 5, KeyCode::Up);
        assert_eq!(sel, 3);
        move_selection(&mut sel, 5, KeyCode::Home);
        assert_eq!(sel, 0);
        move_selection(&mut sel, 5, KeyCode::End);
        assert_eq!(sel, 4);
        move_selection(&mut sel, 2, KeyCode::Down);
        assert_eq!(sel, 1);
        move_selection(&mut sel, 0, KeyCode::Down);
        assert_eq!(sel, 0);
    }

    #[test]
    fn test_navigation_keys() {
        assert!(is_navigation(KeyCode::PageUp));
        assert!(!is_navigation(KeyCode::Enter));
        assert!(!is_navigation(KeyCode::Char('k')));
    }
}
