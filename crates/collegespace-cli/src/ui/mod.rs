//! TUI rendering. Lays out and draws every pane.

pub mod filter_pane;
pub mod resource_detail;
pub mod resource_list;

use chrono::Local;
use collegespace_core::catalog::Scope;
use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Focus};

// ─── Frame ────────────────────────────────────────────────────────────────────

/// Draws one whole frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  let [header, body, status] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Min(0),
    Constraint::Length(1),
  ])
  .areas(area);

  draw_header(f, header, app);
  draw_body(f, body, app);
  draw_status(f, status, app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn scope_label(scope: &Scope) -> String {
  if let Some(id) = scope.subject_id {
    return format!("subject {id}");
  }
  if let Some(id) = scope.university_id {
    return format!("university {id}");
  }
  if let Some(name) = &scope.university_name {
    return name.clone();
  }
  if let Some(semester) = scope.semester {
    return format!("semester {semester}");
  }
  "all resources".to_string()
}

/// A single line with `left` flush left and `right` flush right.
fn spread<'a>(left: Span<'a>, right: Span<'a>, width: u16) -> Line<'a> {
  let used = left.width() + right.width();
  let gap = (width as usize).saturating_sub(used);
  Line::from(vec![left, Span::raw(" ".repeat(gap)), right])
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let title = Span::styled(
    format!(" collegespace  {}", scope_label(&app.scope)),
    Style::new().fg(Color::White).add_modifier(Modifier::BOLD),
  );
  let today = Local::now().format("%Y-%m-%d");
  let info = Span::styled(
    format!("{}{today} ", if app.admin { "admin  " } else { "" }),
    Style::new().fg(Color::Gray),
  );

  f.render_widget(
    Paragraph::new(spread(title, info, area.width))
      .style(Style::new().bg(Color::DarkGray)),
    area,
  );
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  let [left, right] =
    Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
      .areas(area);
  let [list, filters] =
    Layout::vertical([Constraint::Min(5), Constraint::Length(filter_pane::HEIGHT)])
      .areas(left);

  resource_list::draw(f, list, app);
  filter_pane::draw(f, filters, app);

  if app.selected.is_some() {
    resource_detail::draw(f, right, app);
  } else {
    draw_empty_detail(f, right);
  }
}

fn draw_empty_detail(f: &mut Frame, area: Rect) {
  let hint = Paragraph::new("Select a resource and press Enter.")
    .style(Style::new().fg(Color::DarkGray))
    .block(
      Block::bordered()
        .title(" Detail ")
        .border_style(Style::new().fg(Color::DarkGray)),
    );
  f.render_widget(hint, area);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn key_hints(app: &App) -> (&'static str, &'static str) {
  match app.focus {
    Focus::List if app.search_active => {
      ("SEARCH", "Type to filter  Enter keep  Esc clear")
    }
    Focus::List => (
      "LIST",
      "↑↓/jk move  / search  n p b type  1-8 sem  s subject  x reset  y link  r reload  q quit",
    ),
    Focus::Subjects => ("SUBJECT", "↑↓/jk move  space toggle  Esc back"),
    Focus::Detail => ("DETAIL", "o download  [ prev  ] next  Esc back  q quit"),
  }
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode, hints) = key_hints(app);
  let message = match app.status_msg.as_str() {
    "" => hints,
    msg => msg,
  };

  let line = Line::from(vec![
    Span::styled(
      format!(" {mode} "),
      Style::new().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
    ),
    Span::styled(format!("  {message}"), Style::new().fg(Color::DarkGray)),
  ]);
  f.render_widget(Paragraph::new(line).style(Style::new().bg(Color::Black)), area);
}
