pub mod components;
pub mod lists;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Tabs};

use crate::acl::ListKind;
use crate::app::{AppState, ModalState};

pub fn render(f: &mut Frame, app: &AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(root[1]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)].as_ref())
        .split(body[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(body[1]);

    let state = app.editor.state();
    let titles = [
        format!("Allow ({})", state.allowed().len()),
        format!("Block ({})", state.blocked().len()),
    ];
    let selected = match app.active_tab {
        ListKind::Allow => 0,
        ListKind::Block => 1,
    };
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg))
        .highlight_style(
            Style::default()
                .fg(app.theme.list_color(app.active_tab))
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .title("acl-editor  Tab: switch  /: search  ?: help  q: quit")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(tabs, root[0]);

    lists::render_search_box(f, left[0], app);
    lists::render_results(f, left[1], app);
    lists::render_acl_list(f, right[0], app, ListKind::Allow);
    lists::render_acl_list(f, right[1], app, ListKind::Block);

    components::render_status_bar(f, root[2], app);

    match &app.modal {
        Some(ModalState::Info { message }) => components::render_info_modal(f, f.area(), app, message),
        Some(ModalState::Help { scroll }) => components::render_help_modal(f, f.area(), app, *scroll),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acl::AclState;
    use crate::acl::editor::AclEditor;
    use crate::app::Theme;
    use crate::app::keymap::Keymap;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen_text(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buf = terminal.backend().buffer().clone();
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn renders_both_lists() {
        let editor = AclEditor::new(AclState::parse("alice,bob", "carol"));
        let app = AppState::new(editor, Theme::dark(), Keymap::default());
        let text = screen_text(&app);
        assert!(text.contains("Allow (2)"));
        assert!(text.contains("Block (1)"));
        assert!(text.contains("alice"));
        assert!(text.contains("carol"));
    }

    #[test]
    fn renders_info_modal() {
        let editor = AclEditor::new(AclState::new());
        let mut app = AppState::new(editor, Theme::dark(), Keymap::default());
        app.modal = Some(ModalState::Info { message: "user already blocked".into() });
        assert!(screen_text(&app).contains("user already blocked"));
    }
}
