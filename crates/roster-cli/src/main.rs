//! `roster`: terminal front end for the people directory.
//!
//! # Usage
//!
//! ```
//! roster --location https://example.org/site
//! roster --source remote --url https://xyz.example.co --anon-key <KEY>
//! roster --config ~/.config/roster/config.toml --route '#/discover'
//! ```

mod app;
mod settings;
mod ui;

use std::{
  fs::File,
  io,
  path::{Path, PathBuf},
  sync::{Arc, Mutex},
  time::Duration,
};

use anyhow::{Context, Result};
use app::{App, Loaded};
use clap::Parser;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use roster_client::{Catalog, Source};
use roster_core::follow::Follows;
use roster_store_sqlite::SqlitePreferences;
use settings::Settings;
use tokio::sync::mpsc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SourceKind {
  Static,
  Remote,
}

#[derive(Parser, Debug)]
#[command(name = "roster", version, about = "Browse the people directory from a terminal")]
pub struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Which backend to read from.
  #[arg(long, value_enum)]
  source: Option<SourceKind>,

  /// Static source root: an http(s) base URL or a local directory.
  #[arg(long)]
  location: Option<String>,

  /// Remote service base URL.
  #[arg(long)]
  url: Option<String>,

  /// Remote service public anon key.
  #[arg(long, env = "ROSTER_ANON_KEY", hide_env_values = true)]
  anon_key: Option<String>,

  /// Preference database (follow state).
  #[arg(long, value_name = "PATH")]
  prefs: Option<PathBuf>,

  /// Route to open first, e.g. `#/hot` or `#/post/<id>`.
  #[arg(long, value_name = "HASH")]
  route: Option<String>,

  /// Write logs to this file. Logging is off without it.
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  if let Some(path) = &args.log_file {
    init_tracing(path)?;
  }

  let settings = Settings::load(&args)?;
  let source = Source::from_config(&settings.source).context("invalid data source")?;
  tracing::info!(
    source = source.kind(),
    prefs = %settings.prefs_path.display(),
    "starting"
  );
  let catalog = Arc::new(Catalog::new(source));
  catalog.start().await;

  // Nothing useful can be shown without the directory.
  let directory = catalog
    .load_directory()
    .await
    .context("failed to load the people directory")?;

  let prefs = SqlitePreferences::open(&settings.prefs_path)
    .await
    .with_context(|| format!("opening preferences at {}", settings.prefs_path.display()))?;

  let (loaded_tx, loaded_rx) = mpsc::unbounded_channel();
  let mut app = App::new(
    catalog,
    directory,
    Follows::new(prefs),
    settings.search.policy(),
    loaded_tx,
  );
  app.refresh_follows().await;
  app.navigate(&settings.initial_route);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);

  // Run the event loop; restore terminal even on error.
  let run_result = match Terminal::new(backend).context("creating terminal") {
    Ok(mut terminal) => {
      let result = run_event_loop(&mut terminal, &mut app, loaded_rx).await;
      terminal.show_cursor().ok();
      result
    }
    Err(e) => Err(e),
  };

  disable_raw_mode().ok();
  execute!(io::stdout(), LeaveAlternateScreen).ok();

  run_result
}

fn init_tracing(path: &Path) -> Result<()> {
  let file =
    File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_ansi(false)
    .with_writer(Mutex::new(file))
    .init();
  Ok(())
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
  mut loaded: mpsc::UnboundedReceiver<Loaded>,
) -> Result<()> {
  loop {
    // Apply whichever post loads finished since the last frame.
    while let Ok(done) = loaded.try_recv() {
      app.apply_loaded(done);
    }

    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key).await
    {
      break;
    }
  }

  Ok(())
}
