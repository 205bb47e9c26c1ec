mod app;
mod handler;
mod tui;
mod ui;

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use app::App;
use bi3oo_core::{Action, Config, ContentService, LocalStore, Marketplace};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tui::{EventHandler, TerminalSession, TICK_RATE};

#[derive(Parser)]
#[command(name = "bi3oo")]
#[command(about = "Classifieds marketplace in the terminal, padded with AI-generated listings")]
struct Cli {
    /// Directory for stored accounts, listings and the log file
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep everything in memory for this session
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if !Config::get_config_path()?.exists() {
        config.save()?;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    if cli.memory {
        config.storage = Some("memory".to_string());
    }

    // Log to a file; the terminal belongs to the UI
    let data_dir = config.data_dir()?;
    fs::create_dir_all(&data_dir)?;
    let log_file = File::create(data_dir.join("bi3oo.log"))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,bi3oo_core=debug")),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let store = LocalStore::open(config.open_kv()?);
    let content = ContentService::new(config.content_provider()?);
    info!(
        provider = content.provider_name(),
        model = %config.model(),
        storage = ?config.storage_backend(),
        "starting"
    );

    let mut app = App::new(Marketplace::new(store, content));
    app.dispatch(Action::Refresh);

    let mut terminal = TerminalSession::enter()?;
    run(&mut terminal, &mut app).await
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new(TICK_RATE);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        // Queued work runs after the loading state has been drawn
        if let Some(pending) = app.pending.take() {
            app.run_pending(pending).await;
            continue;
        }

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }

    Ok(())
}
