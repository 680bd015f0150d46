pub mod log_panel;
pub mod map_view;
pub mod status_view;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::state::WalkState;

pub fn render(frame: &mut Frame, state: &WalkState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(12), Constraint::Min(0)])
        .split(columns[1]);

    map_view::render(frame, state, columns[0]);
    status_view::render(frame, state, side[0]);
    log_panel::render(frame, &state.log, side[1], " Events ");
    render_prompt(frame, state, rows[1]);

    if state.show_help {
        render_help(frame, frame.area());
    }
}

fn render_prompt(frame: &mut Frame, state: &WalkState, area: Rect) {
    let line = match &state.prompt {
        Some(text) => Line::styled(text.as_str(), Style::default().fg(Color::Yellow).bold()),
        None if !state.walk.is_locked() => Line::styled(
            "[Esc] Capture controls  [?] Help",
            Style::default().fg(Color::DarkGray),
        ),
        None => Line::raw(""),
    };
    let widget = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::styled("Controls", Style::default().bold().fg(Color::Cyan)),
        Line::raw(""),
        Line::raw("[w a s d / arrows] Move"),
        Line::raw("[j l] Turn left / right"),
        Line::raw("[i k] Look up / down"),
        Line::raw("[e] Interact"),
        Line::raw("[Esc/Enter] Capture / release"),
        Line::raw("[Space] Skip intro"),
        Line::raw("[PgUp/PgDn] Scroll events  [c] Clear"),
        Line::raw("[?] Close help  [q] Quit"),
    ];
    let popup = centered(area, 42, lines.len() as u16 + 2);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .border_style(Style::default().fg(Color::Cyan)),
        ),
        popup,
    );
}

/// A `width` x `height` rect centered in `area`, clipped to it.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
