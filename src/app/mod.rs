//! Application state types and entry glue.
//!
//! Defines enums and structs that model the TUI state, config file lookup,
//! and re-exports the event loop as `run`.
//!
pub mod keymap;
pub mod update;

use ratatui::style::Color;
use std::path::PathBuf;

use crate::acl::ListKind;
use crate::acl::editor::AclEditor;
use crate::search::{SearchSession, SearchTicket};

/// Which pane of the active tab receives navigation keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Focus {
    Results,
    List,
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
}

/// Modal dialogs. Both block all other input until dismissed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    Info { message: String },
    Help { scroll: u16 },
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub allow: Color,
    pub block: Color,
}

impl Theme {
    /// Dark default theme.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            allow: Color::Green,
            block: Color::Red,
        }
    }

    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            allow: Color::Rgb(0xa6, 0xe3, 0xa1),        // green
            block: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
        }
    }

    pub fn list_color(&self, kind: ListKind) -> Color {
        match kind {
            ListKind::Allow => self.allow,
            ListKind::Block => self.block,
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            let Some(color) = Self::parse_color(val) else {
                continue;
            };
            match key {
                "text" => theme.text = color,
                "muted" => theme.muted = color,
                "title" => theme.title = color,
                "border" => theme.border = color,
                "header_bg" => theme.header_bg = color,
                "header_fg" => theme.header_fg = color,
                "status_bg" => theme.status_bg = color,
                "status_fg" => theme.status_fg = color,
                "highlight_fg" => theme.highlight_fg = color,
                "highlight_bg" => theme.highlight_bg = color,
                "allow" => theme.allow = color,
                "block" => theme.block = color,
                _ => {}
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# acl-editor theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };
        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);
        kv("allow", self.allow);
        kv("block", self.block);

        std::fs::write(path, buf)
    }

    /// Load from `path` if present, else from the config dir, else write `mocha` to `path`.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        if let Some(existing) = config_file_read_path("theme.conf") {
            return Self::from_file(&existing).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(e) = t.write_file(path) {
            tracing::debug!(path, error = %e, "could not write default theme");
        }
        t
    }
}

fn color_to_str(c: Color) -> String {
    match c {
        Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
        Color::Reset => "reset".to_string(),
        // Named colors: best-effort hex approximation
        Color::Black => "#000000".to_string(),
        Color::Red => "#FF0000".to_string(),
        Color::Green => "#00FF00".to_string(),
        Color::Yellow => "#FFFF00".to_string(),
        Color::Blue => "#0000FF".to_string(),
        Color::Magenta => "#FF00FF".to_string(),
        Color::Cyan => "#00FFFF".to_string(),
        Color::Gray => "#B3B3B3".to_string(),
        Color::DarkGray => "#4D4D4D".to_string(),
        Color::LightRed => "#FF6666".to_string(),
        Color::LightGreen => "#66FF66".to_string(),
        Color::LightYellow => "#FFFF66".to_string(),
        Color::LightBlue => "#6666FF".to_string(),
        Color::LightMagenta => "#FF66FF".to_string(),
        Color::LightCyan => "#66FFFF".to_string(),
        Color::White => "#FFFFFF".to_string(),
        Color::Indexed(i) => format!("index:{}", i),
    }
}

/// `$XDG_CONFIG_HOME/acl-editor`, falling back to `$HOME/.config/acl-editor`.
pub fn config_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join("acl-editor"))
}

/// Path of an existing config file named `name` inside [`config_dir`].
pub fn config_file_read_path(name: &str) -> Option<String> {
    let p = config_dir()?.join(name);
    p.exists().then(|| p.to_string_lossy().into_owned())
}

/// Where to create `name`: inside [`config_dir`] when that directory exists, else the working dir.
pub fn config_file_write_path(name: &str) -> String {
    match config_dir() {
        Some(dir) if dir.is_dir() => dir.join(name).to_string_lossy().into_owned(),
        _ => name.to_string(),
    }
}

pub struct AppState {
    pub editor: AclEditor,
    /// Form file rewritten after every applied change; `None` keeps changes in memory.
    pub form_path: Option<String>,
    pub active_tab: ListKind,
    pub focus: Focus,
    pub allow_search: SearchSession,
    pub block_search: SearchSession,
    pub selected_allow: usize,
    pub selected_block: usize,
    pub input_mode: InputMode,
    pub theme: Theme,
    pub keymap: keymap::Keymap,
    pub modal: Option<ModalState>,
    /// One-line feedback shown in the status bar.
    pub status: Option<String>,
    /// Lookups issued by key handling, waiting to be handed to the worker.
    pub pending_searches: Vec<SearchTicket>,
}

impl AppState {
    pub fn new(editor: AclEditor, theme: Theme, keymap: keymap::Keymap) -> Self {
        Self {
            editor,
            form_path: None,
            active_tab: ListKind::Allow,
            focus: Focus::Results,
            allow_search: SearchSession::new(ListKind::Allow),
            block_search: SearchSession::new(ListKind::Block),
            selected_allow: 0,
            selected_block: 0,
            input_mode: InputMode::Normal,
            theme,
            keymap,
            modal: None,
            status: None,
            pending_searches: Vec::new(),
        }
    }

    pub fn with_form_path(mut self, path: impl Into<String>) -> Self {
        self.form_path = Some(path.into());
        self
    }

    pub fn search(&self, kind: ListKind) -> &SearchSession {
        match kind {
            ListKind::Allow => &self.allow_search,
            ListKind::Block => &self.block_search,
        }
    }

    pub fn search_mut(&mut self, kind: ListKind) -> &mut SearchSession {
        match kind {
            ListKind::Allow => &mut self.allow_search,
            ListKind::Block => &mut self.block_search,
        }
    }

    pub fn selected_index(&self, kind: ListKind) -> usize {
        match kind {
            ListKind::Allow => self.selected_allow,
            ListKind::Block => self.selected_block,
        }
    }

    pub fn selected_index_mut(&mut self, kind: ListKind) -> &mut usize {
        match kind {
            ListKind::Allow => &mut self.selected_allow,
            ListKind::Block => &mut self.selected_block,
        }
    }

    /// Name under the cursor in the active tab's list.
    pub fn selected_name(&self) -> Option<&str> {
        let kind = self.active_tab;
        self.editor
            .state()
            .list(kind)
            .as_slice()
            .get(self.selected_index(kind))
            .map(String::as_str)
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
