//! Browser state: the filter controller, cursors and focus, plus key dispatch.

use std::sync::Arc;

use collegespace_core::{
  catalog::Scope,
  controller::{FetchTicket, FilterController},
  filter::{Facets, SubjectFacet},
  resource::{ResourceKind, ResourceRecord, Semester},
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::client::ApiClient;

const LOADING: &str = "Loading resources…";

// ─── Focus ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  /// Resource list has the keyboard.
  List,
  /// Subject picker in the filter pane has the keyboard.
  Subjects,
  /// Detail pane for the selected resource.
  Detail,
}

/// The outcome of one background fetch.
pub struct Fetched {
  pub ticket: FetchTicket,
  pub result: anyhow::Result<Vec<ResourceRecord>>,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Everything the UI draws from.
pub struct App {
  pub focus: Focus,

  /// Filter state and the fetched resources it narrows.
  pub controller: FilterController,

  /// Subjects and semesters present in the fetched list.
  pub facets: Facets,

  /// Which part of the catalog is fetched.
  pub scope: Scope,

  /// Whether keystrokes go into the search text.
  pub search_active: bool,

  /// Cursor within the filtered view.
  pub list_cursor: usize,

  /// Cursor within `facets.subjects`.
  pub subject_cursor: usize,

  /// Resource shown in the detail pane.
  pub selected: Option<Uuid>,

  /// A fetch is in flight.
  pub loading: bool,

  /// Whether the configured credentials are the admin's.
  pub admin: bool,

  /// Feedback for the last action; replaces the key hints while set.
  pub status_msg: String,

  /// Cloned into each background fetch.
  pub client: Arc<ApiClient>,

  fetch_tx: UnboundedSender<Fetched>,
}

impl App {
  /// Create an [`App`] whose filters are restored from `link`, e.g.
  /// `/resources?q=Digital%20Electronics`.
  pub fn new(
    client: ApiClient,
    scope: Scope,
    link: Option<&str>,
    fetch_tx: UnboundedSender<Fetched>,
  ) -> Self {
    let controller = match link {
      Some(link) => FilterController::restored(link),
      None => FilterController::new(),
    };
    Self {
      focus: Focus::List,
      controller,
      facets: Facets::default(),
      scope,
      search_active: false,
      list_cursor: 0,
      subject_cursor: 0,
      selected: None,
      loading: false,
      admin: false,
      status_msg: String::new(),
      client: Arc::new(client),
      fetch_tx,
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Start fetching the scope in the background. Any fetch still in flight
  /// becomes stale and its result will be dropped.
  pub fn reload(&mut self) {
    self.status_msg = LOADING.into();
    self.refresh();
  }

  /// Like [`Self::reload`], but the status line is left alone unless the
  /// fetch fails.
  fn refresh(&mut self) {
    let ticket = self.controller.begin_fetch();
    self.loading = true;

    let client = self.client.clone();
    let scope = self.scope.clone();
    let tx = self.fetch_tx.clone();
    tokio::spawn(async move {
      let result = client.list_resources(&scope).await;
      // The receiver is gone only when the app is shutting down.
      let _ = tx.send(Fetched { ticket, result });
    });
  }

  /// Apply a finished fetch, unless a newer one has been started since.
  pub fn apply_fetch(&mut self, fetched: Fetched) {
    if !self.controller.is_current(fetched.ticket) {
      return;
    }
    self.loading = false;

    let records = match fetched.result {
      Ok(records) => {
        if self.status_msg == LOADING {
          self.status_msg = format!("{} resources", records.len());
        }
        records
      }
      Err(e) => {
        self.status_msg = format!("Error: {e:#}");
        Vec::new()
      }
    };
    self.controller.complete_fetch(fetched.ticket, records);
    self.facets = Facets::from_records(self.controller.source());
    self.subject_cursor = self
      .subject_cursor
      .min(self.facets.subjects.len().saturating_sub(1));
    self.clamp_cursor();
  }

  pub async fn load_session(&mut self) {
    if !self.client.has_credentials() {
      return;
    }
    match self.client.is_admin().await {
      Ok(admin) => self.admin = admin,
      Err(e) => self.status_msg = format!("Error: {e:#}"),
    }
  }

  // ── Views ─────────────────────────────────────────────────────────────────

  /// The resource under the list cursor, if any.
  pub fn cursor_record(&self) -> Option<&ResourceRecord> {
    self.controller.visible_at(self.list_cursor)
  }

  pub fn selected_record(&self) -> Option<&ResourceRecord> {
    let id = self.selected?;
    self.controller.source().iter().find(|r| r.id == id)
  }

  pub fn cursor_subject(&self) -> Option<&SubjectFacet> {
    self.facets.subjects.get(self.subject_cursor)
  }

  /// A link that reproduces the current filters.
  pub fn share_link(&self) -> String {
    let query = self.controller.state().to_query_string();
    if query.is_empty() {
      "/resources".to_string()
    } else {
      format!("/resources?{query}")
    }
  }

  fn clamp_cursor(&mut self) {
    let len = self.controller.visible_len();
    self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Apply one key press. `Ok(false)` ends the session.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if self.search_active {
      self.handle_search_key(key);
      return Ok(true);
    }

    match self.focus {
      Focus::List => Ok(self.handle_list_key(key)),
      Focus::Subjects => {
        self.handle_subject_key(key);
        Ok(true)
      }
      Focus::Detail => self.handle_detail_key(key).await,
    }
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    let mut text = self.controller.state().search_text.clone();
    match key.code {
      KeyCode::Esc => {
        self.search_active = false;
        text.clear();
      }
      KeyCode::Enter => {
        self.search_active = false;
        return;
      }
      KeyCode::Backspace => {
        text.pop();
      }
      KeyCode::Char(c) => text.push(c),
      _ => return,
    }
    self.controller.set_search_text(text);
    self.list_cursor = 0;
  }

  /// Filter toggles shared by the list and subject-picker focus.
  fn handle_filter_key(&mut self, code: KeyCode) -> bool {
    match code {
      KeyCode::Char('n') => self.controller.toggle_kind(ResourceKind::Notes),
      KeyCode::Char('p') => self.controller.toggle_kind(ResourceKind::Paper),
      KeyCode::Char('b') => self.controller.toggle_kind(ResourceKind::Book),
      KeyCode::Char(c @ '1'..='8') => {
        let n = c as u8 - b'0';
        if let Ok(semester) = Semester::new(n) {
          self.controller.toggle_semester(semester);
        }
      }
      KeyCode::Char('x') => {
        self.controller.reset();
        self.status_msg = "Filters cleared".into();
      }
      _ => return false,
    }
    self.clamp_cursor();
    true
  }

  fn handle_list_key(&mut self, key: KeyEvent) -> bool {
    if self.handle_filter_key(key.code) {
      return true;
    }
    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Down | KeyCode::Char('j') => {
        if self.list_cursor + 1 < self.controller.visible_len() {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.cursor_record().map(|r| r.id) {
          self.selected = Some(id);
          self.focus = Focus::Detail;
        }
      }

      KeyCode::Char('/') => {
        self.search_active = true;
        self.list_cursor = 0;
      }
      KeyCode::Char('s') => {
        if self.facets.subjects.is_empty() {
          self.status_msg = "No subjects to filter by".into();
        } else {
          self.focus = Focus::Subjects;
        }
      }
      KeyCode::Char('r') => self.reload(),
      KeyCode::Char('y') => self.status_msg = self.share_link(),

      _ => {}
    }
    true
  }

  fn handle_subject_key(&mut self, key: KeyEvent) {
    if self.handle_filter_key(key.code) {
      return;
    }
    match key.code {
      KeyCode::Esc | KeyCode::Char('s') | KeyCode::Char('q') => self.focus = Focus::List,
      KeyCode::Down | KeyCode::Char('j') => {
        if self.subject_cursor + 1 < self.facets.subjects.len() {
          self.subject_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.subject_cursor = self.subject_cursor.saturating_sub(1);
      }
      KeyCode::Enter | KeyCode::Char(' ') => {
        if let Some(key) = self.cursor_subject().map(|f| f.key.clone()) {
          self.controller.toggle_subject(key);
          self.clamp_cursor();
        }
      }
      _ => {}
    }
  }

  async fn handle_detail_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.focus = Focus::List;
        self.selected = None;
      }

      KeyCode::Char(']') | KeyCode::PageDown => {
        if self.list_cursor + 1 < self.controller.visible_len() {
          self.list_cursor += 1;
          self.selected = self.cursor_record().map(|r| r.id);
        }
      }
      KeyCode::Char('[') | KeyCode::PageUp => {
        if self.list_cursor > 0 {
          self.list_cursor -= 1;
          self.selected = self.cursor_record().map(|r| r.id);
        }
      }

      KeyCode::Char('o') => {
        if let Some(id) = self.selected {
          match self.client.download_url(id).await {
            Ok(url) => {
              // Picks up the new view count.
              self.refresh();
              self.status_msg = format!("Download: {url}");
            }
            Err(e) => self.status_msg = format!("Error: {e:#}"),
          }
        }
      }

      _ => {}
    }
    Ok(true)
  }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use tokio::{
    io::{AsyncReadExt as _, AsyncWriteExt as _},
    net::TcpListener,
    sync::mpsc,
  };

  use super::*;
  use crate::client::ApiConfig;

  fn record(n: u128, title: &str, subject: &str, kind: ResourceKind, sem: u8) -> ResourceRecord {
    ResourceRecord {
      id:          Uuid::from_u128(n),
      title:       title.into(),
      description: None,
      kind,
      subject:     subject.into(),
      subject_id:  Some(Uuid::from_u128(0x100 + subject.len() as u128)),
      semester:    Semester::new(sem).unwrap(),
      uploaded_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
      file_url:    None,
      view_count:  0,
    }
  }

  fn records() -> Vec<ResourceRecord> {
    vec![
      record(1, "Digital Electronics Complete Notes", "Electronics", ResourceKind::Notes, 3),
      record(2, "Data Structures Question Paper", "Computer Science", ResourceKind::Paper, 3),
      record(3, "Thermodynamics Handbook", "Mechanical", ResourceKind::Book, 4),
    ]
  }

  fn app_at(base_url: &str, link: Option<&str>) -> (App, mpsc::UnboundedReceiver<Fetched>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let client = ApiClient::new(ApiConfig {
      base_url: base_url.into(),
      username: String::new(),
      password: String::new(),
    })
    .unwrap();
    (App::new(client, Scope::all(), link, tx), rx)
  }

  fn app(link: Option<&str>) -> (App, mpsc::UnboundedReceiver<Fetched>) {
    app_at("http://localhost:8080", link)
  }

  fn load(app: &mut App) {
    let ticket = app.controller.begin_fetch();
    app.apply_fetch(Fetched { ticket, result: Ok(records()) });
  }

  fn loaded(link: Option<&str>) -> App {
    let (mut app, _rx) = app(link);
    load(&mut app);
    app
  }

  /// A minimal HTTP server: downloads redirect to a fixed file, every other
  /// request gets an empty listing.
  async fn serve_stub() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      while let Ok((mut socket, _)) = listener.accept().await {
        tokio::spawn(async move {
          let mut buf = vec![0u8; 8192];
          let n = socket.read(&mut buf).await.unwrap_or(0);
          let request = String::from_utf8_lossy(&buf[..n]).into_owned();
          let request_line = request.lines().next().unwrap_or_default();
          let response = if request_line.contains("/download ") {
            "HTTP/1.1 307 Temporary Redirect\r\nLocation: http://files.test/x.pdf\r\n\
             Content-Length: 0\r\nConnection: close\r\n\r\n"
              .to_string()
          } else {
            let body = r#"{"items":[],"facets":{"subjects":[],"semesters":[]},"total":0}"#;
            format!(
              "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
               Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
              body.len()
            )
          };
          let _ = socket.write_all(response.as_bytes()).await;
          let _ = socket.shutdown().await;
        });
      }
    });
    format!("http://{addr}")
  }

  fn press(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  async fn type_keys(app: &mut App, codes: impl IntoIterator<Item = KeyCode>) {
    for code in codes {
      assert!(app.handle_key(press(code)).await.unwrap());
    }
  }

  #[tokio::test]
  async fn link_seeds_search() {
    let app = loaded(Some("/resources?q=Digital%20Electronics"));
    assert_eq!(app.controller.state().search_text, "Digital Electronics");
    assert_eq!(app.controller.visible_len(), 1);
    assert_eq!(app.share_link(), "/resources?q=Digital+Electronics");
  }

  #[tokio::test]
  async fn typing_a_search_filters_live() {
    let mut app = loaded(None);
    type_keys(&mut app, [KeyCode::Char('/')]).await;
    assert!(app.search_active);
    type_keys(&mut app, "thermo".chars().map(KeyCode::Char)).await;
    assert_eq!(app.controller.visible_len(), 1);

    type_keys(&mut app, [KeyCode::Esc]).await;
    assert!(!app.search_active);
    assert_eq!(app.controller.state().search_text, "");
    assert_eq!(app.controller.visible_len(), 3);
  }

  #[tokio::test]
  async fn kind_and_semester_toggles() {
    let mut app = loaded(None);
    type_keys(&mut app, [KeyCode::Char('3')]).await;
    assert_eq!(app.controller.visible_len(), 2);
    type_keys(&mut app, [KeyCode::Char('p')]).await;
    assert_eq!(app.cursor_record().unwrap().title, "Data Structures Question Paper");
    assert_eq!(app.share_link(), "/resources?type=paper&semester=3");

    type_keys(&mut app, [KeyCode::Char('x')]).await;
    assert_eq!(app.controller.visible_len(), 3);
  }

  #[tokio::test]
  async fn subject_picker_toggles_facet() {
    let mut app = loaded(None);
    assert_eq!(app.facets.subjects.len(), 3);
    type_keys(&mut app, [KeyCode::Char('s'), KeyCode::Down, KeyCode::Char(' ')]).await;
    assert_eq!(app.focus, Focus::Subjects);
    let visible: Vec<_> = app.controller.visible().map(|r| r.subject.clone()).collect();
    assert_eq!(visible, vec!["Computer Science"]);

    type_keys(&mut app, [KeyCode::Esc]).await;
    assert_eq!(app.focus, Focus::List);
  }

  #[tokio::test]
  async fn cursor_is_clamped_when_view_shrinks() {
    let mut app = loaded(None);
    type_keys(&mut app, [KeyCode::Down, KeyCode::Down]).await;
    assert_eq!(app.list_cursor, 2);
    type_keys(&mut app, [KeyCode::Char('4')]).await;
    assert_eq!(app.list_cursor, 0);
    assert_eq!(app.cursor_record().unwrap().title, "Thermodynamics Handbook");
  }

  #[tokio::test]
  async fn stale_and_failed_fetches() {
    let (mut app, _rx) = app(None);
    let stale = app.controller.begin_fetch();
    let current = app.controller.begin_fetch();

    app.apply_fetch(Fetched { ticket: current, result: Err(anyhow::anyhow!("offline")) });
    assert!(app.controller.is_empty());
    assert!(app.status_msg.contains("offline"));

    app.apply_fetch(Fetched { ticket: stale, result: Ok(records()) });
    assert!(app.controller.is_empty());
  }

  #[tokio::test]
  async fn detail_opens_on_enter() {
    let mut app = loaded(None);
    type_keys(&mut app, [KeyCode::Down, KeyCode::Enter]).await;
    assert_eq!(app.focus, Focus::Detail);
    assert_eq!(app.selected_record().unwrap().id, Uuid::from_u128(2));

    type_keys(&mut app, [KeyCode::Char(']')]).await;
    assert_eq!(app.selected, Some(Uuid::from_u128(3)));
    type_keys(&mut app, [KeyCode::Esc]).await;
    assert_eq!(app.focus, Focus::List);
    assert!(app.selected.is_none());
  }

  #[tokio::test]
  async fn download_link_survives_the_refresh() {
    let base = serve_stub().await;
    let (mut app, mut rx) = app_at(&base, None);
    load(&mut app);

    type_keys(&mut app, [KeyCode::Enter, KeyCode::Char('o')]).await;
    assert_eq!(app.status_msg, "Download: http://files.test/x.pdf");
    assert!(app.loading);

    let refreshed = rx.recv().await.unwrap();
    app.apply_fetch(refreshed);
    assert!(!app.loading);
    assert_eq!(app.status_msg, "Download: http://files.test/x.pdf");
  }

  #[tokio::test]
  async fn reload_reports_the_count() {
    let base = serve_stub().await;
    let (mut app, mut rx) = app_at(&base, None);
    app.reload();
    assert_eq!(app.status_msg, LOADING);
    let fetched = rx.recv().await.unwrap();
    app.apply_fetch(fetched);
    assert_eq!(app.status_msg, "0 resources");
  }
}
