//! Search box, search results and the two ACL lists.
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::acl::ListKind;
use crate::app::{AppState, Focus, InputMode};

pub fn render_search_box(f: &mut Frame, area: Rect, app: &AppState) {
    let kind = app.active_tab;
    let search = app.search(kind);
    let editing = app.input_mode == InputMode::Search;
    let border = if editing { app.theme.highlight_fg } else { app.theme.border };
    let p = Paragraph::new(search.query.as_str())
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title(format!("Search → {}", kind.label()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
    f.render_widget(p, area);
    if editing {
        let x = area.x + 1 + search.query.chars().count() as u16;
        f.set_cursor_position(Position::new(x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

pub fn render_results(f: &mut Frame, area: Rect, app: &AppState) {
    let search = app.search(app.active_tab);
    let state = app.editor.state();
    let items: Vec<ListItem> = search
        .results
        .iter()
        .map(|name| {
            // Tag names that already sit on a list
            let tag = match state.side_of(name) {
                Some(kind) => Span::styled(
                    format!("  [{}]", kind.label().to_lowercase()),
                    Style::default().fg(app.theme.list_color(kind)),
                ),
                None => Span::raw(""),
            };
            ListItem::new(Line::from(vec![Span::raw(name.clone()), tag]))
        })
        .collect();

    let focused = app.focus == Focus::Results;
    let title = if search.query.trim().is_empty() {
        "Results".to_string()
    } else {
        format!("Results ({})", search.results.len())
    };
    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if focused { app.theme.title } else { app.theme.border })),
        )
        .highlight_style(
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut ls = ListState::default();
    if focused && !search.results.is_empty() {
        ls.select(Some(search.selected));
    }
    f.render_stateful_widget(list, area, &mut ls);
}

/// One of the two ACL lists; each entry carries the removal hint when highlighted.
pub fn render_acl_list(f: &mut Frame, area: Rect, app: &AppState, kind: ListKind) {
    let names = app.editor.state().list(kind);
    let active = app.active_tab == kind;
    let items: Vec<ListItem> = if names.is_empty() {
        vec![ListItem::new(Span::styled(
            "(empty)",
            Style::default().fg(app.theme.muted),
        ))]
    } else {
        names
            .iter()
            .map(|n| ListItem::new(Span::styled(n.clone(), Style::default().fg(app.theme.text))))
            .collect()
    };

    let border = if active { app.theme.list_color(kind) } else { app.theme.border };
    let list = List::new(items)
        .block(
            Block::default()
                .title(format!("{} ({})", kind.label(), names.len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
        .highlight_style(
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::REVERSED),
        )
        .highlight_symbol("x ");
    let mut ls = ListState::default();
    if active && app.focus == Focus::List && !names.is_empty() {
        ls.select(Some(app.selected_index(kind)));
    }
    f.render_stateful_widget(list, area, &mut ls);
}
