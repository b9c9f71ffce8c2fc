//! TUI rendering for all panes.

pub mod home;
pub mod post;
pub mod takedown;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};
use roster_core::view::View;

use crate::app::{App, Input};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  match app.views.view() {
    View::Home => home::draw(f, rows[1], app),
    View::Post => post::draw(f, rows[1], app),
  }
  draw_status(f, rows[2], app);

  if app.takedown.is_some() {
    takedown::draw(f, area, app);
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();
  let mask = if app.masked { "  [masked]" } else { "" };

  let left = Span::styled(
    format!(" roster  {}{mask}", app.views.route()),
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{date} "),
    Style::default().fg(Color::DarkGray),
  );

  // Simple left-right header: pad the middle.
  let left_width = left.width() as u16;
  let right_width = right.width() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let prompt;
  let (mode_label, hints) = match (app.input, app.views.view()) {
    (Some(Input::Keyword), _) => {
      prompt = format!("/{}_", app.input_buf);
      ("SEARCH", prompt.as_str())
    }
    (Some(Input::Route), _) => {
      prompt = format!(":{}_", app.input_buf);
      ("ROUTE", prompt.as_str())
    }
    _ if app.takedown.is_some() => ("REPORT", "Tab switch field  Enter submit  Esc cancel"),
    (None, View::Home) => (
      "HOME",
      "jk move  Tab pane  Enter open  / search  g r u facets  w window  n new  f follow  x report  m mask  : route  q quit",
    ),
    (None, View::Post) => ("POST", "jk scroll  Esc back  m mask  : route  q quit"),
  };

  let status = if app.status_msg.is_empty() || app.input.is_some() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let status_style = if app.input.is_some() {
    Style::default().fg(Color::Yellow)
  } else {
    Style::default().fg(Color::DarkGray)
  };
  let hint_span = Span::styled(format!("  {status}"), status_style);

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

/// A rect of `width` × `height` centred in `area`, clamped to fit.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  }
}
