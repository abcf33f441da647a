//! Resource list pane, top left.

use collegespace_core::resource::ResourceKind;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::App;

pub fn kind_color(kind: ResourceKind) -> Color {
  match kind {
    ResourceKind::Notes => Color::Green,
    ResourceKind::Paper => Color::Yellow,
    ResourceKind::Book => Color::Magenta,
  }
}

/// Render the filtered resource list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let controller = &app.controller;
  let total = controller.source().len();
  let shown = controller.visible_len();

  let title = if app.loading {
    " Resources (loading…) ".to_string()
  } else if controller.state().is_inactive() {
    format!(" Resources ({total}) ")
  } else {
    format!(" Resources ({shown}/{total}) ")
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  let search = &controller.state().search_text;
  if (app.search_active || !search.is_empty()) && inner_area.height > 2 {
    let search_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let text = if app.search_active {
      format!("/{search}_")
    } else {
      format!("/{search}")
    };
    f.render_widget(
      Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
      search_area,
    );
  }

  if controller.is_empty() && !app.loading {
    f.render_widget(
      Paragraph::new("No resources match your filters.")
        .style(Style::default().fg(Color::DarkGray)),
      inner_area,
    );
    return;
  }

  let items: Vec<ListItem> = controller
    .visible()
    .map(|record| {
      ListItem::new(Line::from(vec![
        Span::styled(
          format!("{:<6}", record.kind.as_ref()),
          Style::default().fg(kind_color(record.kind)),
        ),
        Span::styled(format!("S{} ", record.semester), Style::default().fg(Color::Cyan)),
        Span::raw(record.title.clone()),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select((shown > 0).then_some(app.list_cursor));

  f.render_stateful_widget(
    List::new(items)
      .highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol(""),
    inner_area,
    &mut state,
  );
}
