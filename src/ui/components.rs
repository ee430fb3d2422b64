//! Shared UI components (status bar, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::{KeyAction, format_action};
use crate::app::{AppState, InputMode};

/// Render the bottom status bar with mode, list sizes and the last message.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
    };
    let state = app.editor.state();
    let form = app.form_path.as_deref().unwrap_or("(memory)");
    let mut msg = format!(
        "mode: {mode}  allowed:{}  blocked:{}  form:{form}",
        state.allowed().len(),
        state.blocked().len(),
    );
    if let Some(status) = &app.status {
        msg.push_str("  | ");
        msg.push_str(status);
    }
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, message: &str) {
    // Wrap long text inside a box sized to the message
    let max_w = area.width.saturating_sub(6).max(30);
    let min_w = 50u16.min(max_w);
    let approx_lines = (message.len() as u16 / (min_w.saturating_sub(4).max(10))).max(1);
    let max_h = area.height.saturating_sub(6).max(5);
    let height = (approx_lines + 4).min(max_h).max(5);
    let rect = centered_rect(min_w, height, area);
    let lines = vec![
        Line::raw(message.to_string()),
        Line::raw(""),
        Line::from(Span::styled(
            "Enter / Esc to dismiss",
            Style::default().fg(app.theme.muted).add_modifier(Modifier::ITALIC),
        )),
    ];
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Info")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.block)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

const HELP_ROWS: [(KeyAction, &str); 9] = [
    (KeyAction::StartSearch, "Search users for the active tab"),
    (KeyAction::Select, "Add highlighted result to the active list"),
    (KeyAction::SwitchTab, "Switch Allow / Block tab"),
    (KeyAction::ToggleFocus, "Toggle focus: results / list"),
    (KeyAction::MoveUp, "Move up"),
    (KeyAction::MoveDown, "Move down"),
    (KeyAction::RemoveSelection, "Remove highlighted name from both lists"),
    (KeyAction::OpenHelp, "Open this help"),
    (KeyAction::Quit, "Quit"),
];

/// Help listing every action with the keys currently bound to it.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 72u16.min(area.width.saturating_sub(4)).max(40);
    let height = 20u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Keys",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
    ];
    for (action, text) in HELP_ROWS {
        let keys = app.keymap.keys_for(action).join(" / ");
        lines.push(Line::from(vec![
            Span::raw(format!("{text}: ")),
            Span::styled(keys, Style::default().add_modifier(Modifier::ITALIC)),
            Span::styled(
                format!("  ({})", format_action(action)),
                Style::default().fg(app.theme.muted),
            ),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "While searching",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::raw("Type to query, Up/Down to pick, Enter to add, Esc to leave"));
    lines.push(Line::raw(""));
    lines.push(Line::raw(
        "Blocking an allowed user moves them to the block list. \
         A blocked user must be removed before they can be allowed.",
    ));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
