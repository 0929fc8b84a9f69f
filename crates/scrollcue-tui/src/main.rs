use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

use scrollcue_core::Config;

mod app;
mod fade;

use app::{App, ROW_PX};

/// Cadence of the cooperative event loop; deferred engine work (trailing
/// throttle fires, settled debounces) is released on this tick.
const TICK: Duration = Duration::from_millis(16);

#[derive(Parser)]
#[command(name = "scrollcue")]
#[command(author, version, about = "Terminal demo for the scrollcue reveal engine")]
struct Cli {
    /// Path to a TOML config file (default: ~/.config/scrollcue/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override: px subtracted from the viewport height for the trigger line
    #[arg(long)]
    offset: Option<f64>,

    /// Override: latch reveals permanently after the first trigger
    #[arg(long)]
    once: bool,

    /// Override: reverse reveals when sections scroll back out
    #[arg(long)]
    mirror: bool,

    /// Override: skip the structural-change observer
    #[arg(long)]
    disable_mutation_observer: bool,

    /// Number of demo sections
    #[arg(long, default_value_t = 12)]
    sections: usize,
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("scrollcue")
            .join("config.toml")
    })
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_or_default(&config_path(cli))?;
    if let Some(offset) = cli.offset {
        config.offset = offset;
    }
    if cli.once {
        config.once = true;
    }
    if cli.mirror {
        config.mirror = true;
    }
    if cli.disable_mutation_observer {
        config.disable_mutation_observer = true;
    }
    Ok(config)
}

fn main() -> Result<()> {
    // Log to a file so tracing output does not fight the TUI.
    let log_file = std::fs::File::create("scrollcue.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    info!(
        offset = config.offset,
        once = config.once,
        mirror = config.mirror,
        "starting demo"
    );

    let mut terminal = ratatui::init();
    let size = terminal.size()?;
    // Bottom row is the status bar.
    let viewport_px = f64::from(size.height.saturating_sub(1)) * ROW_PX;
    let mut app = App::new(config, viewport_px, cli.sections);

    let result = run(&mut terminal, &mut app);
    ratatui::restore();
    result
}

fn run(terminal: &mut ratatui::DefaultTerminal, app: &mut App) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|frame| app.render(frame, Instant::now()))?;

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key.code, Instant::now());
                }
                Event::Resize(_, rows) => {
                    app.handle_resize(rows, Instant::now());
                }
                _ => {}
            }
        }

        app.tick(Instant::now());
    }
    Ok(())
}
