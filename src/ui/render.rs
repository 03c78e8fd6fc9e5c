use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap};

use crate::composer::DraftField;
use crate::models::platform::{CODING_PLATFORMS, find_platform};
use crate::models::session::format_session_date;
use crate::navigation::tabs::ActiveView;
use crate::ui::app::{App, AppState};

const ACCENT: Color = Color::Magenta;

pub fn draw(app: &App, f: &mut Frame) {
    let size = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(1)].as_ref())
        .split(size);

    let status = match &app.state {
        AppState::SignedOut { .. } => "Signed out | [g] Google | [h] GitHub | [q] Quit".to_string(),
        AppState::Dashboard => {
            let who = app.user.as_ref().map(|u| u.display_name()).unwrap_or("-");
            format!(
                "{} | {} | [Tab/1-3] Switch [ ] Back/Fwd [Home] Home [r] Reload [l] Logs [o] Sign out [q] Quit",
                who,
                app.tabs.location().href()
            )
        }
        AppState::EditingField { field, .. } => {
            format!("Editing {} - [Enter] Save | [Esc] Cancel", field.label())
        }
        AppState::ViewingLogs => "Viewing Logs - Press any key to return".to_string(),
    };
    let status_widget = Paragraph::new(status)
        .block(Block::default().borders(Borders::ALL).title("Prepwise"));
    f.render_widget(status_widget, chunks[0]);

    if let AppState::SignedOut { message } = &app.state {
        draw_sign_in(f, chunks[2], message.as_deref());
        return;
    }

    draw_tabs(app, f, chunks[1]);

    match &app.state {
        AppState::ViewingLogs => draw_logs(app, f, chunks[2]),
        _ => match app.tabs.active() {
            ActiveView::Overview => draw_overview(app, f, chunks[2]),
            ActiveView::InterviewComposer => draw_composer(app, f, chunks[2]),
            ActiveView::CodingPractice => draw_coding_practice(app, f, chunks[2]),
        },
    }

    if let AppState::EditingField { field, buffer } = &app.state {
        let area = centered_rect(70, 30, size);
        f.render_widget(Clear, area);
        let input = Paragraph::new(format!("{}_", buffer))
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(field.label()));
        f.render_widget(input, area);
    }
}

fn draw_sign_in(f: &mut Frame, area: Rect, message: Option<&str>) {
    let mut lines = vec![
        Line::from("Welcome to Prepwise"),
        Line::from(""),
        Line::from("Sign in to track your interview practice."),
        Line::from("[g] Continue with Google    [h] Continue with GitHub"),
    ];
    if let Some(message) = message {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Red))));
    }
    let widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Sign In"));
    f.render_widget(widget, centered_rect(60, 40, area));
}

fn draw_tabs(app: &App, f: &mut Frame, area: Rect) {
    let titles: Vec<Line> = ActiveView::ALL
        .iter()
        .enumerate()
        .map(|(i, v)| Line::from(format!("{} {}", i + 1, v.title())))
        .collect();
    let selected = ActiveView::ALL
        .iter()
        .position(|v| *v == app.tabs.active())
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}

fn draw_overview(app: &App, f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(4), Constraint::Min(1)].as_ref())
        .split(area);

    let welcome = app.user.as_ref().map(|u| u.welcome_name()).unwrap_or("Job Seeker");
    let greeting = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Welcome back, {}!", welcome),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from("Ready to ace your next interview with AI practice?"),
    ]);
    f.render_widget(greeting, chunks[0]);

    let metrics = app.metrics();
    let cards = [
        ("Total Interviews", metrics.total_interviews.to_string()),
        ("Avg Duration", format!("{}m", metrics.avg_duration_minutes)),
        ("Interview Types", metrics.distinct_interview_type_count.to_string()),
        ("This Month", metrics.interviews_this_calendar_month.to_string()),
        ("Coding Sessions", metrics.total_coding_sessions.to_string()),
    ];
    let card_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5].as_ref())
        .split(chunks[1]);
    for (i, (title, value)) in cards.iter().enumerate() {
        let card = Paragraph::new(Line::from(Span::styled(
            value.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL).title(*title));
        f.render_widget(card, card_areas[i]);
    }

    draw_history(app, f, chunks[2]);
}

pub fn draw_history(app: &App, f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Interview History ([↑/↓] Select | [d] Delete)");

    if app.store.is_loading() {
        f.render_widget(Paragraph::new("Loading sessions...").block(block), area);
        return;
    }

    let sessions = app.store.interview_sessions();
    if sessions.is_empty() {
        let empty = Paragraph::new("No interview sessions yet. Start your first practice from the Mock Interview tab.")
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = sessions
        .iter()
        .enumerate()
        .map(|(i, session)| {
            let prefix = if i == app.selected_history { "→ " } else { "  " };
            let display = format!(
                "{}{} {} at {} [{}] {} | {} minutes",
                prefix,
                session.interview_type.glyph(),
                session.role,
                session.company,
                session.interview_type,
                format_session_date(&session.created_at),
                session.duration
            );
            let style = if i == app.selected_history {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(display)).style(style)
        })
        .collect();
    f.render_widget(List::new(items).block(block), area);
}

fn draw_composer(app: &App, f: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = DraftField::ALL
        .iter()
        .map(|field| {
            let value = match field {
                DraftField::InterviewType => app
                    .draft
                    .interview_type
                    .map(|t| t.label().to_string())
                    .unwrap_or_else(|| "Select interview type...".to_string()),
                DraftField::Duration => format!("{} minutes", app.draft.duration),
                _ => {
                    let text = app.draft.text(*field).unwrap_or_default();
                    if text.chars().count() > 60 {
                        format!("{}...", text.chars().take(60).collect::<String>())
                    } else {
                        text.to_string()
                    }
                }
            };
            let selected = *field == app.selected_field;
            let prefix = if selected { "→ " } else { "  " };
            let style = if selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(format!("{}{:<32} {}", prefix, field.label(), value))).style(style)
        })
        .collect();

    let footer = if app.draft.is_valid() {
        Span::styled("[s] Start Interview Practice", Style::default().fg(Color::Green))
    } else {
        Span::styled(
            format!("Fill in: {}", app.draft.missing_fields().join(", ")),
            Style::default().fg(Color::DarkGray),
        )
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(area);
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Start a New Interview Practice ([↑/↓] Field | [Enter] Edit/Cycle)"),
    );
    f.render_widget(list, chunks[0]);
    f.render_widget(
        Paragraph::new(Line::from(footer)).block(Block::default().borders(Borders::ALL)),
        chunks[1],
    );
}

fn draw_coding_practice(app: &App, f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
        .split(area);

    let items: Vec<ListItem> = CODING_PLATFORMS
        .iter()
        .enumerate()
        .map(|(i, platform)| {
            let prefix = if i == app.selected_platform { "→ " } else { "  " };
            let style = if i == app.selected_platform {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(format!(
                "{}{:<14} {}",
                prefix, platform.name, platform.description
            )))
            .style(style)
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Coding Practice ([↑/↓] Select | [Enter] Open)"),
    );
    f.render_widget(list, chunks[0]);

    let recent: Vec<ListItem> = app
        .store
        .coding_sessions()
        .iter()
        .take(chunks[1].height.saturating_sub(2) as usize)
        .map(|s| {
            let name = match find_platform(&s.platform_name) {
                Some(platform) => platform.name.to_string(),
                None => format!("{} (unlisted)", s.platform_name),
            };
            ListItem::new(Line::from(format!("{} {}", name, format_session_date(&s.created_at))))
        })
        .collect();
    f.render_widget(
        List::new(recent).block(Block::default().borders(Borders::ALL).title("Recent Sessions")),
        chunks[1],
    );
}

fn draw_logs(app: &App, f: &mut Frame, area: Rect) {
    let log_items: Vec<ListItem> = app
        .logs
        .iter()
        .rev()
        .take(area.height.saturating_sub(2) as usize)
        .map(|log| ListItem::new(Line::from(log.clone())))
        .collect();
    let log_list = List::new(log_items).block(Block::default().borders(Borders::ALL).title("Logs"));
    f.render_widget(log_list, area);
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}
