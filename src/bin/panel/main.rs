//! Argus Panel - Browsing Side Panel
//!
//! Renders the side-panel dashboard and tools against a browser host
//! bridge (or an in-memory host in offline mode):
//! - Browsing stats and recent activity
//! - Tool actions: screenshot, bookmark, translate, reading mode, search
//! - Tab management
//! - Preference persistence, data export
//!
//! Usage:
//!   argus-panel [OPTIONS]
//!
//! Examples:
//!   argus-panel                          # Connect to localhost:9777
//!   argus-panel --api http://localhost:9777
//!   argus-panel --offline                # Seeded in-memory host
//!   argus-panel --refresh 500            # Faster dashboard re-poll (ms)

mod app;
mod views;

use anyhow::Result;
use app::App;
use argus_core::background::{BackgroundController, LifecycleEvent};
use argus_core::host::HostServices;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};
use tokio::time::interval;
use tracing::{debug, error, Level};
use tracing_subscriber::EnvFilter;

/// Panel CLI arguments
#[derive(Parser)]
#[command(name = "argus-panel")]
#[command(about = "Browsing side panel over a browser host bridge")]
#[command(version)]
struct Args {
    /// Host bridge URL
    #[arg(long, default_value = "http://localhost:9777")]
    api: String,

    /// Run against a seeded in-memory host instead of a bridge
    #[arg(long)]
    offline: bool,

    /// Dashboard refresh interval in milliseconds
    #[arg(long, default_value = "1000")]
    refresh: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging (to file, not stderr - the TUI owns the terminal)
    let level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let filter = EnvFilter::new(format!(
        "argus_panel={level},argus_core={level}",
        level = level.as_str().to_lowercase()
    ));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(|| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open("/tmp/argus-panel.log")
                .unwrap()
        })
        .init();

    debug!("Panel v{} starting...", env!("CARGO_PKG_VERSION"));

    let host = if args.offline {
        debug!("offline mode: in-memory host");
        HostServices::in_memory()
    } else {
        debug!("bridge URL: {}", args.api);
        HostServices::http(&args.api)
    };

    // Make sure the panel is enabled host-side before anything renders
    let background = BackgroundController::new(host.clone());
    background.handle(LifecycleEvent::Installed).await;

    // Load preferences and the first snapshot before the first draw,
    // so dark mode never flashes
    let mut app = App::new(host);
    app.init().await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut tick = interval(Duration::from_millis(args.refresh));
    let result = run_app(&mut terminal, &mut app, &mut tick).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!("Error: {:?}", err);
        return Err(err);
    }

    debug!("Panel exiting cleanly");
    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick: &mut tokio::time::Interval,
) -> Result<()> {
    loop {
        terminal.draw(|f| views::draw(f, app))?;

        // Handle input
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if let Some(command) = app.command_for_key(key.code) {
                    if app.apply(command).await {
                        return Ok(());
                    }
                }
            }
        }

        // Expire notices and re-poll the dashboard on tick
        app.tick();
        tokio::select! {
            _ = tick.tick() => {
                app.on_refresh_tick().await;
            }
        }
    }
}
