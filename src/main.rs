//! acl-editor binary entry point.
//!
//! Parses arguments, loads the form file, initializes the terminal in raw
//! mode, runs the TUI event loop, and restores the terminal state on exit.
//!
use acl_editor::acl::editor::AclEditor;
use acl_editor::app::{self, AppState, Theme, keymap::Keymap};
use acl_editor::directory::{self, PasswdDirectory, StaticDirectory, UserDirectory};
use acl_editor::error::{Context, Result};
use acl_editor::form::FormFields;
use acl_editor::search::SearchWorker;
use acl_editor::UsernameSet;
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// Edit mutually exclusive allow/block username lists.
#[derive(Parser, Debug)]
#[command(name = "acl-editor", version, about)]
struct Cli {
    /// Form file holding `allowed_users` and `blocked_users`; rewritten on every change.
    #[arg(long, env = "ACL_EDITOR_FORM", default_value = "acl.form")]
    form: String,
    /// Initial allow list (comma-separated), replacing the form file's value.
    #[arg(long)]
    allowed: Option<String>,
    /// Initial block list (comma-separated), replacing the form file's value.
    #[arg(long)]
    blocked: Option<String>,
    /// passwd-format file searched for usernames.
    #[arg(long, default_value = "/etc/passwd")]
    passwd: PathBuf,
    /// Search this comma-separated list instead of the passwd file.
    #[arg(long)]
    users: Option<String>,
    /// Theme file (default: config dir or ./theme.conf).
    #[arg(long)]
    theme: Option<String>,
    /// Keybindings file (default: config dir or ./keybinds.conf).
    #[arg(long)]
    keybinds: Option<String>,
    /// Write logs here; filter with ACL_EDITOR_LOG.
    #[arg(long, env = "ACL_EDITOR_LOG_FILE")]
    log_file: Option<PathBuf>,
    /// Print the normalized form fields and exit without starting the UI.
    #[arg(long)]
    print: bool,
}

/// The terminal belongs to the UI, so logs only go to a file.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_ctx(|| format!("open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env("ACL_EDITOR_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn build_directory(cli: &Cli) -> Arc<dyn UserDirectory> {
    match &cli.users {
        Some(list) => {
            let names = UsernameSet::parse(list);
            Arc::new(StaticDirectory::new(names.iter().cloned()).excluding(directory::current_username()))
        }
        None => Arc::new(PasswdDirectory::new(cli.passwd.clone())),
    }
}

/// Program entry point: run the TUI; errors surface after the terminal is restored.
fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    // An unreadable form file stops startup rather than being overwritten later
    let mut fields = if cli.print {
        FormFields::load(&cli.form)?
    } else {
        FormFields::load_or_init(&cli.form)?
    };
    if let Some(a) = &cli.allowed {
        fields.allowed_users = a.clone();
    }
    if let Some(b) = &cli.blocked {
        fields.blocked_users = b.clone();
    }
    let editor = AclEditor::from_fields(&fields);

    if cli.print {
        println!("allowed_users = {}", editor.fields().allowed_users);
        println!("blocked_users = {}", editor.fields().blocked_users);
        return Ok(());
    }
    // Keep the file equal to the normalized projection from the start
    if editor.fields() != &fields {
        editor
            .fields()
            .write_file(&cli.form)
            .with_ctx(|| format!("write {}", cli.form))?;
    }
    tracing::info!(form = %cli.form, "starting");

    let theme_path = cli.theme.clone().unwrap_or_else(|| app::config_file_write_path("theme.conf"));
    let keymap_path = cli.keybinds.clone().unwrap_or_else(|| app::config_file_write_path("keybinds.conf"));
    let mut state = AppState::new(editor, Theme::load_or_init(&theme_path), Keymap::load_or_init(&keymap_path))
        .with_form_path(cli.form.clone());
    let worker = SearchWorker::spawn(build_directory(&cli));

    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {}", e))?;

    let res = app::run(&mut terminal, &mut state, &worker);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    exit_result(res)
}

/// Map the event loop outcome to the process result, after the terminal is restored.
fn exit_result(res: anyhow::Result<()>) -> Result<()> {
    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        return Err(format!("application error: {err}").into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_loop_error_fails_the_process() {
        let err = exit_result(Err(anyhow::anyhow!("terminal went away"))).unwrap_err();
        assert_eq!(err.to_string(), "application error: terminal went away");
        assert!(exit_result(Ok(())).is_ok());
    }
}
