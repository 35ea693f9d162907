mod breadcrumb;
mod cli;
mod database;
mod demo_data;
mod error;
mod reorder;
mod session;
mod store;
mod theme;
mod tree;
mod ui;

use clap::Parser;
use cli::Cli;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use database::Database;
use demo_data::DemoDataGenerator;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::{env, io};
use tracing_subscriber::EnvFilter;
use ui::App;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.demo {
        let demo_db_path = PathBuf::from("demo_goals.db");
        init_logging(&demo_db_path)?;
        let database = Database::new(&demo_db_path.to_string_lossy())?;
        return DemoDataGenerator::new(database).populate_demo_data();
    }

    let db_path = get_db_path(cli.db)?;
    init_logging(&db_path)?;
    tracing::info!(path = %db_path.display(), "opening goal database");
    let database = Database::new(&db_path.to_string_lossy())?;

    match cli.command {
        Some(command) => cli::dispatch(command, database),
        None => run_ui(database),
    }
}

/// Logs go to `goaldb.log` beside the database since the TUI owns the terminal.
fn init_logging(db_path: &Path) -> anyhow::Result<()> {
    let log_path = db_path.with_file_name("goaldb.log");
    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("goaldb=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_ui(database: Database) -> anyhow::Result<()> {
    let mut app = App::new(database)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Ensure data is written to disk before exit
    if let Err(e) = app.close() {
        tracing::warn!(error = %e, "checkpoint on shutdown failed");
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| app.draw(f))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key_event(key.code)?;
                if app.should_quit {
                    break;
                }
            }
        }
    }
    Ok(())
}

fn get_db_path(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    // Default location is ~/.local/share/goaldb/
    let mut home_path = PathBuf::from(env::var("HOME").unwrap_or_else(|_| ".".to_string()));
    home_path.push(".local");
    home_path.push("share");
    home_path.push("goaldb");
    std::fs::create_dir_all(&home_path)?;

    home_path.push("goals.db");
    Ok(home_path)
}
