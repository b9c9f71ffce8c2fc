//! Home view: the hot/new feed on the left, discover (search) on the right.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use roster_core::{
  feed::FeedMode,
  mask::display_name,
  person::Person,
  search::SearchOutcome,
};

use crate::app::{App, Focus};

/// Render the home view into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
    .split(area);

  draw_feed(f, cols[0], app);
  draw_discover(f, cols[1], app);
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
  let border = if focused { Color::Cyan } else { Color::DarkGray };
  Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border))
}

fn highlight() -> Style {
  Style::default()
    .bg(Color::Blue)
    .fg(Color::White)
    .add_modifier(Modifier::BOLD)
}

// ─── Feed ─────────────────────────────────────────────────────────────────────

fn draw_feed(f: &mut Frame, area: Rect, app: &App) {
  let feed = app.feed();
  let title = match app.feed_mode {
    FeedMode::Hot(window) => format!(" Hot · {window} ({}) ", feed.len()),
    FeedMode::New => format!(" New ({}) ", feed.len()),
  };
  let block = pane_block(title, app.focus == Focus::Feed);

  if feed.is_empty() {
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
      Paragraph::new("Nothing in this window.").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let items: Vec<ListItem> = feed
    .iter()
    .map(|item| {
      let date = item
        .post
        .date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".into());
      ListItem::new(vec![
        Line::from(vec![
          Span::styled(
            format!("♥{:<5}", item.post.likes),
            Style::default().fg(Color::Red),
          ),
          Span::styled(
            item.post.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
          ),
        ]),
        Line::from(Span::styled(
          format!(
            "      {} · {} · {} · {date} · {} comments",
            app.name_of(item.person),
            item.person.university,
            item.person.location,
            item.post.comments,
          ),
          Style::default().fg(Color::DarkGray),
        )),
      ])
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.feed_cursor.min(feed.len() - 1)));
  f.render_stateful_widget(
    List::new(items).block(block).highlight_style(highlight()),
    area,
    &mut state,
  );
}

// ─── Discover ─────────────────────────────────────────────────────────────────

fn draw_discover(f: &mut Frame, area: Rect, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(4), Constraint::Min(0)])
    .split(area);

  draw_search_form(f, rows[0], app);
  draw_results(f, rows[1], app);
}

fn draw_search_form(f: &mut Frame, area: Rect, app: &App) {
  let any = |s: &str| if s.is_empty() { "any".to_owned() } else { s.to_owned() };
  let label = Style::default().fg(Color::Cyan);
  let lines = vec![
    Line::from(vec![
      Span::styled("keyword ", label),
      Span::raw(if app.filter.keyword.is_empty() { "-".to_owned() } else { app.filter.keyword.clone() }),
    ]),
    Line::from(vec![
      Span::styled("gender ", label),
      Span::raw(any(&app.filter.gender)),
      Span::styled("  region ", label),
      Span::raw(any(&app.filter.location)),
      Span::styled("  university ", label),
      Span::raw(any(&app.filter.university)),
    ]),
  ];
  let block = Block::default()
    .title(" Discover ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_results(f: &mut Frame, area: Rect, app: &App) {
  let outcome = app.results();
  let title = match &outcome {
    SearchOutcome::AwaitingInput => " Results ".to_owned(),
    SearchOutcome::Matches(rows) => format!(" Results ({}) ", rows.len()),
  };
  let block = pane_block(title, app.focus == Focus::Results);

  let message = match &outcome {
    SearchOutcome::AwaitingInput => Some("Type / and a keyword to search."),
    SearchOutcome::Matches(rows) if rows.is_empty() => Some("No matching records."),
    SearchOutcome::Matches(_) => None,
  };
  if let Some(message) = message {
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
      Paragraph::new(message).style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let rows = outcome.matches();
  let items: Vec<ListItem> = rows
    .iter()
    .map(|person| result_row(app, person))
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.result_cursor.min(rows.len() - 1)));
  f.render_stateful_widget(
    List::new(items).block(block).highlight_style(highlight()),
    area,
    &mut state,
  );
}

/// Two lines per person: names and follow state, then facets and activity.
fn result_row<'a>(app: &App, person: &Person) -> ListItem<'a> {
  let followed = app.followed.contains(&person.id);
  let star = if followed {
    Span::styled("★ ", Style::default().fg(Color::Yellow))
  } else {
    Span::raw("☆ ")
  };

  let mut names = vec![star];
  if !person.name_cn.is_empty() {
    names.push(Span::styled(
      display_name(&person.name_cn, app.masked),
      Style::default().add_modifier(Modifier::BOLD),
    ));
    names.push(Span::raw(" "));
  }
  if !person.name_en.is_empty() {
    names.push(Span::raw(display_name(&person.name_en, app.masked)));
  }
  let tags = person
    .post
    .as_ref()
    .map(|p| p.tags.iter().take(2).map(|t| format!("#{t}")).collect::<Vec<_>>().join(" "))
    .unwrap_or_default();
  if !tags.is_empty() {
    names.push(Span::styled(format!("  {tags}"), Style::default().fg(Color::Magenta)));
  }

  let updated = person
    .last_report_at
    .map(|d| d.format("%Y-%m-%d").to_string())
    .unwrap_or_else(|| "-".into());
  let facets = Line::from(Span::styled(
    format!(
      "  {} · {} · {} · {} reports · updated {updated}",
      or_dash(&person.gender),
      or_dash(&person.location),
      or_dash(&person.university),
      person.incidents,
    ),
    Style::default().fg(Color::DarkGray),
  ));

  ListItem::new(vec![Line::from(names), facets])
}

fn or_dash(s: &str) -> &str { if s.is_empty() { "-" } else { s } }
