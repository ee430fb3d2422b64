use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::time::Duration;

use crate::app::keymap::KeyAction;
use crate::app::{AppState, Focus, InputMode, ModalState};
use crate::search::{SearchResponse, SearchWorker};
use crate::ui;

/// Whether the event loop keeps going after a key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Draw, apply finished lookups, handle one key, hand new lookups to the worker.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    worker: &SearchWorker,
) -> Result<()> {
    loop {
        for resp in worker.drain() {
            apply_search_response(app, resp);
        }

        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key) == Flow::Quit {
                    break;
                }
            }
        }

        for ticket in app.pending_searches.drain(..) {
            worker.submit(ticket);
        }
    }
    tracing::info!("quit");
    Ok(())
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Flow {
    match app.input_mode {
        InputMode::Modal => handle_modal_key(app, key.code),
        InputMode::Search => handle_search_key(app, key),
        InputMode::Normal => return handle_normal_key(app, key),
    }
    Flow::Continue
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) -> Flow {
    let Some(action) = app.keymap.resolve(&key) else {
        return Flow::Continue;
    };
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::OpenHelp => {
            app.modal = Some(ModalState::Help { scroll: 0 });
            app.input_mode = InputMode::Modal;
        }
        KeyAction::StartSearch => {
            app.focus = Focus::Results;
            app.input_mode = InputMode::Search;
        }
        KeyAction::SwitchTab => switch_tab(app),
        KeyAction::ToggleFocus => {
            app.focus = match app.focus {
                Focus::Results => Focus::List,
                Focus::List => Focus::Results,
            };
        }
        KeyAction::MoveUp => move_cursor(app, -1),
        KeyAction::MoveDown => move_cursor(app, 1),
        KeyAction::Select => {
            if app.focus == Focus::Results {
                select_search_result(app);
            }
        }
        KeyAction::RemoveSelection => {
            if app.focus == Focus::List {
                remove_selected(app);
            }
        }
        KeyAction::Ignore => {}
    }
    Flow::Continue
}

fn handle_search_key(app: &mut AppState, key: KeyEvent) {
    let kind = app.active_tab;
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Enter => select_search_result(app),
        KeyCode::Tab => switch_tab(app),
        KeyCode::Up => app.search_mut(kind).move_up(),
        KeyCode::Down => app.search_mut(kind).move_down(),
        KeyCode::Backspace => {
            if let Some(ticket) = app.search_mut(kind).pop_char() {
                app.pending_searches.push(ticket);
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(ticket) = app.search_mut(kind).push_char(c) {
                app.pending_searches.push(ticket);
            }
        }
        _ => {}
    }
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    match &mut app.modal {
        Some(ModalState::Info { .. }) => {
            if matches!(code, KeyCode::Enter | KeyCode::Esc) {
                close_modal(app);
            }
        }
        Some(ModalState::Help { scroll }) => match code {
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => close_modal(app),
            _ => {}
        },
        None => app.input_mode = InputMode::Normal,
    }
}

fn close_modal(app: &mut AppState) {
    app.modal = None;
    app.input_mode = InputMode::Normal;
}

fn switch_tab(app: &mut AppState) {
    app.active_tab = app.active_tab.other();
    clamp_selection(app);
}

fn move_cursor(app: &mut AppState, delta: isize) {
    let kind = app.active_tab;
    match app.focus {
        Focus::Results => {
            let search = app.search_mut(kind);
            if delta < 0 { search.move_up() } else { search.move_down() }
        }
        Focus::List => {
            let len = app.editor.state().list(kind).len();
            let idx = app.selected_index_mut(kind);
            if delta < 0 {
                *idx = idx.saturating_sub(1);
            } else if *idx + 1 < len {
                *idx += 1;
            }
        }
    }
}

/// Add the highlighted result to the active tab's list.
///
/// A conflict opens an info modal and leaves the search box as it was.
pub fn select_search_result(app: &mut AppState) {
    let kind = app.active_tab;
    let Some(name) = app.search(kind).selected_result().map(str::to_string) else {
        return;
    };
    match app.editor.add_to(kind, &name) {
        Ok(()) => {
            app.search_mut(kind).clear();
            app.status = Some(format!("{name} → {}", kind.label()));
            persist_form(app);
        }
        Err(e) => {
            app.status = Some(format!("{} not added to {}", e.username(), kind.label()));
            app.modal = Some(ModalState::Info { message: e.to_string() });
            app.input_mode = InputMode::Modal;
        }
    }
    clamp_selection(app);
}

/// Remove the highlighted entry of the active list from both lists.
pub fn remove_selected(app: &mut AppState) {
    let Some(name) = app.selected_name().map(str::to_string) else {
        return;
    };
    app.editor.remove_from_both(&name);
    app.status = Some(format!("{name} removed"));
    persist_form(app);
    clamp_selection(app);
}

pub fn apply_search_response(app: &mut AppState, resp: SearchResponse) {
    app.search_mut(resp.kind).accept(resp.seq, resp.result);
}

fn persist_form(app: &mut AppState) {
    let Some(path) = app.form_path.as_deref() else {
        return;
    };
    match app.editor.fields().write_file(path) {
        Ok(()) => tracing::debug!(path, "form saved"),
        Err(e) => {
            tracing::error!(path, error = %e, "failed to save form");
            app.status = Some(format!("failed to save {path}: {e}"));
        }
    }
}

fn clamp_selection(app: &mut AppState) {
    let allowed = app.editor.state().allowed().len();
    let blocked = app.editor.state().blocked().len();
    app.selected_allow = app.selected_allow.min(allowed.saturating_sub(1));
    app.selected_block = app.selected_block.min(blocked.saturating_sub(1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acl::editor::AclEditor;
    use crate::acl::{AclState, ListKind};
    use crate::app::Theme;
    use crate::app::keymap::Keymap;

    fn mk_app(allowed: &str, blocked: &str) -> AppState {
        let editor = AclEditor::new(AclState::parse(allowed, blocked));
        AppState::new(editor, Theme::dark(), Keymap::default())
    }

    fn press(app: &mut AppState, code: KeyCode) -> Flow {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut AppState, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn answer_latest(app: &mut AppState, names: &[&str]) {
        let ticket = app.pending_searches.pop().expect("a lookup was issued");
        apply_search_response(
            app,
            SearchResponse {
                kind: ticket.kind,
                seq: ticket.seq,
                result: Ok(names.iter().map(|s| s.to_string()).collect()),
            },
        );
    }

    #[test]
    fn typing_issues_one_lookup_per_keystroke() {
        let mut app = mk_app("", "");
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Search);
        type_str(&mut app, "ca");
        assert_eq!(app.pending_searches.len(), 2);
        assert_eq!(app.pending_searches[1].query, "ca");
    }

    #[test]
    fn selecting_a_result_adds_and_clears_search() {
        let mut app = mk_app("", "");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_tab, ListKind::Block);
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "car");
        answer_latest(&mut app, &["carol"]);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.editor.fields().blocked_users, "carol");
        assert!(app.block_search.query.is_empty());
        assert!(app.block_search.results.is_empty());
    }

    #[test]
    fn conflict_opens_blocking_modal() {
        let mut app = mk_app("", "carol");
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "c");
        answer_latest(&mut app, &["carol"]);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Modal);
        assert!(matches!(&app.modal, Some(ModalState::Info { message }) if message.contains("unblock first")));
        assert_eq!(app.editor.fields().allowed_users, "");
        assert_eq!(app.status.as_deref(), Some("carol not added to Allow"));

        // q is swallowed by the modal
        assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Continue);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.modal.is_none());
    }

    #[test]
    fn remove_selected_entry_from_list() {
        let mut app = mk_app("alice,bob", "");
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus, Focus::List);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.editor.fields().allowed_users, "alice");
        assert_eq!(app.selected_allow, 0);
    }

    #[test]
    fn remove_key_ignored_while_results_focused() {
        let mut app = mk_app("alice,bob", "");
        assert_eq!(app.focus, Focus::Results);
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.editor.fields().allowed_users, "alice,bob");
        assert!(app.status.is_none());
    }

    #[test]
    fn failed_save_reports_and_keeps_change() {
        // a directory can't be written as a file
        let dir = std::env::temp_dir().to_string_lossy().to_string();
        let mut app = mk_app("alice", "").with_form_path(dir.clone());
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "b");
        answer_latest(&mut app, &["bob"]);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.editor.fields().allowed_users, "alice,bob");
        let status = app.status.clone().unwrap_or_default();
        assert!(status.starts_with(&format!("failed to save {dir}")), "{status}");
        assert_eq!(app.input_mode, InputMode::Search);
    }

    #[test]
    fn quit_from_normal_mode() {
        let mut app = mk_app("", "");
        assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Quit);
    }
}
