//! `collegespace`: terminal browser for CollegeSpace study resources.
//!
//! # Usage
//!
//! ```text
//! collegespace --url http://localhost:8080
//! collegespace --link "/resources?q=Digital%20Electronics"
//! collegespace --semester 3
//! collegespace --university "Delhi University" --config ~/.config/collegespace.toml
//! ```

mod app;
mod client;
mod ui;

use std::{
  io::{self, Stdout},
  path::Path,
  time::Duration,
};

use anyhow::{Context, Result};
use app::{App, Fetched};
use clap::Parser;
use client::{ApiClient, ApiConfig};
use collegespace_core::{catalog::Scope, resource::Semester};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use uuid::Uuid;

const DEFAULT_URL: &str = "http://localhost:8080";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "collegespace", about = "Terminal browser for CollegeSpace study resources")]
struct Args {
  /// TOML file with `url`, `username` and `password` defaults.
  #[arg(long, short = 'c', value_name = "PATH")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the CollegeSpace server (default: http://localhost:8080).
  #[arg(long, env = "COLLEGESPACE_URL")]
  url: Option<String>,

  /// Admin username; only needed to show admin status.
  #[arg(long, env = "COLLEGESPACE_USER")]
  user: Option<String>,

  /// Admin password (plaintext).
  #[arg(long, env = "COLLEGESPACE_PASSWORD")]
  password: Option<String>,

  /// A shared listing link whose filters to start with.
  #[arg(long, value_name = "LINK")]
  link: Option<String>,

  /// Only fetch resources for this semester (1-8).
  #[arg(long, value_parser = parse_semester, conflicts_with_all = ["university", "subject"])]
  semester: Option<Semester>,

  /// Only fetch resources for this university (id or exact name).
  #[arg(long, conflicts_with = "subject")]
  university: Option<String>,

  /// Only fetch resources for this subject id.
  #[arg(long)]
  subject: Option<Uuid>,
}

fn parse_semester(s: &str) -> Result<Semester, String> {
  let n: u8 = s.parse().map_err(|e| format!("{e}"))?;
  Semester::new(n).map_err(|e| e.to_string())
}

impl Args {
  fn scope(&self) -> Scope {
    let mut scope = Scope::all();
    scope.semester = self.semester;
    scope.subject_id = self.subject;
    if let Some(university) = &self.university {
      match Uuid::parse_str(university) {
        Ok(id) => scope.university_id = Some(id),
        Err(_) => scope.university_name = Some(university.clone()),
      }
    }
    scope
  }
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Optional TOML file holding connection defaults.
#[derive(Deserialize, Default)]
#[serde(default)]
struct Settings {
  url:      Option<String>,
  username: Option<String>,
  password: Option<String>,
}

impl Settings {
  fn load(path: Option<&Path>) -> Result<Self> {
    let Some(path) = path else {
      return Ok(Self::default());
    };
    let text = std::fs::read_to_string(path)
      .with_context(|| format!("cannot read {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid settings in {}", path.display()))
  }
}

/// The flag if given, else a non-empty file value.
fn pick(flag: &Option<String>, file: &Option<String>) -> Option<String> {
  flag
    .clone()
    .or_else(|| file.clone().filter(|value| !value.is_empty()))
}

// ─── Entry point ──────────────────────────────────────────────────────────────

type Tui = Terminal<CrosstermBackend<Stdout>>;

fn enter_tui() -> Result<Tui> {
  enable_raw_mode().context("raw mode unavailable")?;
  let mut out = io::stdout();
  execute!(out, EnterAlternateScreen).context("alternate screen unavailable")?;
  Terminal::new(CrosstermBackend::new(out)).context("terminal setup failed")
}

fn leave_tui(tui: &mut Tui) {
  let _ = disable_raw_mode();
  let _ = execute!(tui.backend_mut(), LeaveAlternateScreen);
  let _ = tui.show_cursor();
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let settings = Settings::load(args.config.as_deref())?;

  let api_config = ApiConfig {
    base_url: pick(&args.url, &settings.url)
      .unwrap_or_else(|| DEFAULT_URL.to_string()),
    username: pick(&args.user, &settings.username).unwrap_or_default(),
    password: pick(&args.password, &settings.password).unwrap_or_default(),
  };

  let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
  let mut app = App::new(
    ApiClient::new(api_config)?,
    args.scope(),
    args.link.as_deref(),
    fetch_tx,
  );
  app.load_session().await;
  app.reload();

  let mut tui = enter_tui()?;
  let outcome = run(&mut tui, &mut app, fetch_rx).await;
  leave_tui(&mut tui);
  outcome
}

// ─── Event loop ───────────────────────────────────────────────────────────────

const TICK: Duration = Duration::from_millis(50);

/// Waits up to one tick for terminal input without stalling other tasks.
fn next_event() -> io::Result<Option<Event>> {
  tokio::task::block_in_place(|| {
    if event::poll(TICK)? { event::read().map(Some) } else { Ok(None) }
  })
}

async fn run(
  tui: &mut Tui,
  app: &mut App,
  mut fetch_rx: UnboundedReceiver<Fetched>,
) -> Result<()> {
  loop {
    while let Ok(fetched) = fetch_rx.try_recv() {
      app.apply_fetch(fetched);
    }
    tui.draw(|frame| ui::draw(frame, app)).context("render failed")?;

    let Some(Event::Key(key)) = next_event()? else {
      continue;
    };
    if !app.handle_key(key).await? {
      return Ok(());
    }
  }
}
