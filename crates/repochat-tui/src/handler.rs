use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use repochat_core::InputBuffer;

use crate::app::{App, Screen};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work on any screen
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.screen {
        Screen::Landing(_) => handle_landing_key(app, key),
        Screen::Chat(_) => handle_chat_key(app, key),
    }
}

fn handle_landing_key(app: &mut App, key: KeyEvent) {
    let Screen::Landing(ingest) = &mut app.screen else {
        return;
    };

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Enter => match ingest.submit_input() {
            Ok(_) => app.notice = None,
            Err(e) => app.notice = Some(e.to_string()),
        },
        _ => {
            // The field is locked while indexing
            if !ingest.state().is_pending() && edit_input(ingest.input_mut(), key) {
                app.notice = None;
            }
        }
    }
}

fn handle_chat_key(app: &mut App, key: KeyEvent) {
    let Screen::Chat(chat) = &mut app.screen else {
        return;
    };

    match key.code {
        KeyCode::Esc => app.back_to_landing(),
        KeyCode::Enter => {
            if chat.submit_input() {
                // Scroll to bottom so "Thinking..." is visible
                app.scroll_chat_to_bottom();
            }
        }
        KeyCode::PageUp => app.scroll_up(app.chat_height.max(2) / 2),
        KeyCode::PageDown => app.scroll_down(app.chat_height.max(2) / 2),
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        _ => {
            if !chat.state().is_pending() {
                edit_input(chat.input_mut(), key);
            }
        }
    }
}

/// Apply an editing key to a text field. Returns whether the key was one.
fn edit_input(input: &mut InputBuffer, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        _ => return false,
    }
    true
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if !matches!(app.screen, Screen::Chat(_)) {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_down(3),
        MouseEventKind::ScrollUp => app.scroll_up(3),
        _ => {}
    }
}
