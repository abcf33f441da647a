//! collegespace-server binary.
//!
//! Settings come from built-in defaults, then the TOML file named by
//! `--config`, then `COLLEGESPACE_*` environment variables. The server opens
//! the SQLite catalog and the local file store and serves the API over HTTP.
//!
//! # Admin password
//!
//! `admin_password_hash` holds an argon2 PHC string, printed by:
//!
//! ```text
//! collegespace-server --hash-password
//! ```

use std::{
  io::{self, BufRead, Write},
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::{Context as _, anyhow};
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use collegespace_api::{ApiState, AuthConfig};
use collegespace_server::{LocalFileStore, ServerConfig};
use collegespace_store_sqlite::SqliteCatalog;
use config::{Config, Environment, File};
use rand_core::OsRng;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DATA_DIR: &str = "~/.local/share/collegespace";

#[derive(Parser)]
#[command(author, version, about = "CollegeSpace resource server")]
struct Cli {
  /// Settings file; missing is not an error.
  #[arg(long, short = 'c', value_name = "PATH", default_value = "config.toml")]
  config: PathBuf,

  /// Read a password from stdin, print its argon2 hash, and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  init_tracing();
  let cli = Cli::parse();

  if cli.hash_password {
    println!("{}", hash_password(&prompt("Password: ")?)?);
    return Ok(());
  }

  let settings = load_settings(&cli.config)?;

  let store_path = home_relative(&settings.store_path);
  if let Some(dir) = store_path.parent() {
    tokio::fs::create_dir_all(dir)
      .await
      .with_context(|| format!("cannot create {}", dir.display()))?;
  }
  let catalog = SqliteCatalog::open(&store_path)
    .await
    .with_context(|| format!("cannot open catalog {}", store_path.display()))?;

  let files_dir = home_relative(&settings.files_dir);
  let files = LocalFileStore::open(&files_dir, &settings.public_url)
    .await
    .with_context(|| format!("cannot open file store {}", files_dir.display()))?;
  tracing::info!(
    catalog = %store_path.display(),
    files = %files_dir.display(),
    "storage ready"
  );

  let state = ApiState {
    catalog: Arc::new(catalog),
    files:   Arc::new(files),
    auth:    Arc::new(AuthConfig {
      username:      settings.admin_username.clone(),
      password_hash: settings.admin_password_hash.clone(),
    }),
  };
  let app = collegespace_server::router(state, &files_dir);

  let bind = format!("{}:{}", settings.host, settings.port);
  let listener = TcpListener::bind(&bind)
    .await
    .with_context(|| format!("cannot listen on {bind}"))?;
  tracing::info!(public_url = %settings.public_url, "listening on {bind}");

  axum::serve(listener, app).await.context("server stopped")
}

fn init_tracing() {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();
  tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_settings(file: &Path) -> anyhow::Result<ServerConfig> {
  Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 8080)?
    .set_default("public_url", "http://localhost:8080")?
    .set_default("store_path", format!("{DATA_DIR}/catalog.db"))?
    .set_default("files_dir", format!("{DATA_DIR}/files"))?
    .add_source(File::from(file).required(false))
    .add_source(Environment::with_prefix("COLLEGESPACE"))
    .build()
    .context("cannot load settings")?
    .try_deserialize()
    .context("invalid settings")
}

fn hash_password(password: &str) -> anyhow::Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| anyhow!("cannot hash password: {e}"))
}

/// One line from stdin, without its line ending.
fn prompt(label: &str) -> io::Result<String> {
  let mut out = io::stdout();
  write!(out, "{label}")?;
  out.flush()?;
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

/// `~/x` resolved against `$HOME`; other paths unchanged.
fn home_relative(path: &Path) -> PathBuf {
  match (path.strip_prefix("~"), std::env::var_os("HOME")) {
    (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
    _ => path.to_path_buf(),
  }
}
