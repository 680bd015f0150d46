use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::state::WalkState;

pub fn render(frame: &mut Frame, state: &WalkState, area: Rect) {
    let position = state.walk.position();
    let view = state.view();

    let (capture, capture_style) = if state.walk.is_locked() {
        ("Captured", Style::default().fg(Color::Green).bold())
    } else {
        ("Free", Style::default().fg(Color::Yellow).bold())
    };

    let held = if state.held.is_empty() {
        "-".to_string()
    } else {
        state.held.names().collect::<Vec<_>>().join(" ")
    };

    let lines = vec![
        Line::styled(state.source.label(), Style::default().fg(Color::DarkGray)),
        Line::from(vec![
            Span::raw("Phase: "),
            Span::styled(state.phase_label(), Style::default().bold()),
            Span::raw(format!(" ({:.0}%)", state.walk.intro_progress() * 100.0)),
        ]),
        Line::from(vec![Span::raw("Controls: "), Span::styled(capture, capture_style)]),
        Line::raw(format!(
            "Position: {:>6.2} {:>5.2} {:>6.2}",
            position.x, position.y, position.z
        )),
        Line::raw(format!(
            "Yaw {:>6.1}°  Pitch {:>5.1}°",
            view.yaw.to_degrees(),
            view.pitch.to_degrees()
        )),
        Line::raw(format!("Movement: {}", state.move_label())),
        Line::raw(format!("Keys: {held}")),
        Line::raw(format!(
            "Target: {}",
            state.walk.target_name().unwrap_or("none")
        )),
        Line::raw(format!(
            "Downloads: {}  Time: {:.1}s",
            state.downloads,
            state.clock()
        )),
    ];

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Walkthrough ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(widget, area);
}
