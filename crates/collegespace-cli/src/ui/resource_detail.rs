//! Resource detail pane, right panel.

use chrono::Utc;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{app::App, ui::resource_list::kind_color};

fn field(label: &'static str, value: String) -> Line<'static> {
  Line::from(vec![
    Span::styled(
      format!("{label:<10}"),
      Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ),
    Span::raw(value),
  ])
}

/// Render the detail pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(record) = app.selected_record() else {
    let block = Block::default()
      .title(" Detail ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
      Paragraph::new("This resource is no longer in the list.")
        .style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  };

  let block = Block::default()
    .title(format!(" {} ", record.title))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines = vec![
    Line::from(vec![
      Span::styled(
        format!("{:<10}", "type"),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
      ),
      Span::styled(record.kind.to_string(), Style::default().fg(kind_color(record.kind))),
    ]),
    field("subject", record.subject.clone()),
    field("semester", record.semester.to_string()),
    field("uploaded", record.uploaded_ago(Utc::now())),
    field("views", record.view_count.to_string()),
    field(
      "file",
      record.file_url.clone().unwrap_or_else(|| "(none)".to_string()),
    ),
  ];

  if let Some(description) = &record.description {
    lines.push(Line::from(""));
    lines.push(Line::from(description.clone()));
  }

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
