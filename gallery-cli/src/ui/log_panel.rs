use std::ops::Range;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::state::{LogBuffer, LogKind};

/// Lines shown for a panel `height` rows tall, ending at the scroll offset.
pub fn visible_range(len: usize, scroll_offset: usize, height: usize) -> Range<usize> {
    let end = (scroll_offset + 1).min(len);
    end.saturating_sub(height)..end
}

fn kind_style(kind: LogKind) -> Style {
    match kind {
        LogKind::Info => Style::default(),
        LogKind::Prompt => Style::default().fg(Color::Yellow),
        LogKind::Download => Style::default().fg(Color::Green).bold(),
        LogKind::Notice => Style::default().fg(Color::Magenta),
    }
}

pub fn render(frame: &mut Frame, log: &LogBuffer, area: Rect, title: &str) {
    let height = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = log.lines[visible_range(log.lines.len(), log.scroll_offset, height)]
        .iter()
        .map(|line| {
            Line::from(vec![
                Span::styled(
                    line.timestamp.format("%H:%M:%S ").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(line.text.as_str(), kind_style(line.kind)),
            ])
        })
        .collect();

    let scroll_hint = if log.auto_scroll { "" } else { " (scrolled)" };
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{title}{scroll_hint}"))
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_range_tail() {
        assert_eq!(visible_range(10, 9, 4), 6..10);
    }

    #[test]
    fn test_visible_range_short_log() {
        assert_eq!(visible_range(2, 1, 10), 0..2);
        assert_eq!(visible_range(0, 0, 10), 0..0);
    }

    #[test]
    fn test_visible_range_scrolled_up() {
        assert_eq!(visible_range(100, 20, 5), 16..21);
    }
}
