//! Take-down request overlay.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::centered;
use crate::app::{App, TakedownField};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(overlay) = &app.takedown else {
    return;
  };

  let popup = centered(area, 60, 11);
  let block = Block::default()
    .title(" Request take-down / appeal ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Yellow));
  let inner = block.inner(popup);
  f.render_widget(Clear, popup);
  f.render_widget(block, popup);

  let label = Style::default().fg(Color::Cyan);
  let field = |name: &'static str, value: &str, active: bool| {
    let cursor = if active { "_" } else { "" };
    let style = if active {
      Style::default().add_modifier(Modifier::BOLD)
    } else {
      Style::default()
    };
    Line::from(vec![
      Span::styled(format!("{name:<9}"), label),
      Span::styled(format!("{value}{cursor}"), style),
    ])
  };

  let mut lines = vec![
    field("target", &overlay.form.target_name, false),
    Line::from(""),
    field("contact", &overlay.form.contact, overlay.field == TakedownField::Contact),
    field("reason", &overlay.form.reason, overlay.field == TakedownField::Reason),
  ];
  if let Some(error) = &overlay.error {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))));
  }

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
