//! Post view: one post detail, full width.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;

/// Render the post view into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let Some(page) = app.views.post_page() else {
    return;
  };

  let block = Block::default()
    .title(format!(" {} ", page.title))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines: Vec<Line> = Vec::new();
  if !page.meta.is_empty() {
    lines.push(Line::from(Span::styled(page.meta, Style::default().fg(Color::DarkGray))));
    lines.push(Line::from(""));
  }

  for paragraph in page.paragraphs {
    lines.push(Line::from(paragraph));
    lines.push(Line::from(""));
  }

  // Images follow the content.
  for image in &page.images {
    let alt = if image.alt.is_empty() { "image" } else { image.alt.as_str() };
    lines.push(Line::from(vec![
      Span::styled(format!("[{alt}] "), Style::default().fg(Color::Cyan)),
      Span::styled(image.src.clone(), Style::default().fg(Color::DarkGray)),
    ]));
  }

  if let Some(back) = page.back {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
      format!("← {} (Esc)", back.label),
      Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD),
    )));
  }

  let para = Paragraph::new(lines)
    .wrap(Wrap { trim: false })
    .scroll((app.detail_scroll, 0));
  f.render_widget(para, inner);
}
