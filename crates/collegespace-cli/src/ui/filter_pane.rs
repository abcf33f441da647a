//! Filter pane, bottom left. Shows every dimension of the filter state
//! against the options present in the fetched list.

use collegespace_core::{
  filter::FilterState,
  resource::{ResourceKind, Semester},
};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, Focus};

/// Rows the pane occupies, borders included.
pub const HEIGHT: u16 = 10;

fn check(on: bool) -> &'static str { if on { "[x]" } else { "[ ]" } }

fn toggle_span(label: String, on: bool) -> Span<'static> {
  let style = if on {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::Gray)
  };
  Span::styled(format!("{} {label}  ", check(on)), style)
}

fn kinds_line(state: &FilterState) -> Line<'static> {
  let mut spans = vec![Span::styled("type  ", Style::default().fg(Color::Cyan))];
  spans.extend(ResourceKind::all().map(|kind| {
    toggle_span(kind.to_string(), state.selected_kinds.contains(&kind))
  }));
  Line::from(spans)
}

/// One entry per semester, 1 through 8, whether or not the fetched list has
/// records for it: `(semester, selected, present)`.
pub fn semester_options(
  state: &FilterState,
  present: &[Semester],
) -> Vec<(Semester, bool, bool)> {
  Semester::all()
    .map(|semester| {
      (
        semester,
        state.selected_semesters.contains(&semester),
        present.contains(&semester),
      )
    })
    .collect()
}

fn semesters_line(state: &FilterState, present: &[Semester]) -> Line<'static> {
  let mut spans = vec![Span::styled("sem   ", Style::default().fg(Color::Cyan))];
  spans.extend(semester_options(state, present).into_iter().map(
    |(semester, on, present)| {
      let span = toggle_span(semester.to_string(), on);
      if on || present {
        span
      } else {
        span.patch_style(Style::default().fg(Color::DarkGray))
      }
    },
  ));
  Line::from(spans)
}

/// Render the filter pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let focused = app.focus == Focus::Subjects;
  let block = Block::default()
    .title(" Filters ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let state = app.controller.state();
  let mut lines = vec![
    kinds_line(state),
    semesters_line(state, &app.facets.semesters),
    Line::from(Span::styled("subject", Style::default().fg(Color::Cyan))),
  ];

  // Keep the subject cursor on screen.
  let room = (inner.height as usize).saturating_sub(lines.len()).max(1);
  let first = app.subject_cursor.saturating_sub(room - 1);

  for (i, facet) in app.facets.subjects.iter().enumerate().skip(first).take(room) {
    let on = state.selected_subjects.contains(&facet.key);
    let mut span = toggle_span(format!("{} ({})", facet.name, facet.count), on);
    if focused && i == app.subject_cursor {
      span = span.patch_style(Style::default().bg(Color::Blue).fg(Color::White));
    }
    lines.push(Line::from(vec![Span::raw("  "), span]));
  }

  f.render_widget(Paragraph::new(lines), inner);
}
