use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::result::SessionResult;
use crate::ui::components::stats_sidebar::{accuracy_color, format_keys};
use crate::ui::theme::Theme;

pub struct Dashboard<'a> {
    pub result: &'a SessionResult,
    pub theme: &'a Theme,
    pub tip_pending: bool,
}

impl<'a> Dashboard<'a> {
    pub fn new(result: &'a SessionResult, theme: &'a Theme, tip_pending: bool) -> Self {
        Self {
            result,
            theme,
            tip_pending,
        }
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let result = self.result;

        let title = if result.mode == "zen" {
            " Zen Complete "
        } else {
            " Lesson Complete "
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(6),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            "Results",
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let label = |text: &'static str| Span::styled(text, Style::default().fg(colors.fg()));
        let weak = if result.weak_keys.is_empty() {
            Span::styled("none", Style::default().fg(colors.success()))
        } else {
            Span::styled(format_keys(&result.weak_keys), Style::default().fg(colors.warning()))
        };

        let stat_lines = vec![
            Line::from(vec![
                label("  Speed:     "),
                Span::styled(
                    format!("{} WPM", result.wpm),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                label("  Accuracy:  "),
                Span::styled(
                    format!("{}%", result.accuracy),
                    Style::default()
                        .fg(accuracy_color(colors, result.accuracy))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({}/{} correct)", result.correct_chars(), result.chars_typed),
                    Style::default().fg(colors.text_pending()),
                ),
            ]),
            Line::from(vec![
                label("  Time:      "),
                Span::styled(
                    format!("{:.1}s", result.elapsed_secs),
                    Style::default().fg(colors.fg()),
                ),
            ]),
            Line::from(vec![
                label("  Errors:    "),
                Span::styled(
                    result.mistakes.to_string(),
                    Style::default().fg(if result.mistakes == 0 {
                        colors.success()
                    } else {
                        colors.error()
                    }),
                ),
            ]),
            Line::from(vec![label("  Weak keys: "), weak]),
        ];
        Paragraph::new(stat_lines).render(layout[1], buf);

        let tip = match (&result.coaching_tip, self.tip_pending) {
            (Some(tip), _) => Span::styled(tip.clone(), Style::default().fg(colors.fg())),
            (None, true) => Span::styled(
                "Your coach is thinking...",
                Style::default()
                    .fg(colors.text_pending())
                    .add_modifier(Modifier::ITALIC),
            ),
            (None, false) => Span::raw(""),
        };
        Paragraph::new(Line::from(tip))
            .block(
                Block::bordered()
                    .title(" Coach ")
                    .border_style(Style::default().fg(colors.border())),
            )
            .wrap(Wrap { trim: true })
            .render(layout[2], buf);

        Paragraph::new(Line::from(vec![
            Span::styled("  [n/Enter] Next lesson  ", Style::default().fg(colors.accent())),
            Span::styled("[r] Retry  ", Style::default().fg(colors.accent())),
            Span::styled("[q/Esc] Menu", Style::default().fg(colors.accent())),
        ]))
        .render(layout[3], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut out = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_renders_result_and_tip() {
        let result = SessionResult {
            mode: "lesson".to_string(),
            wpm: 48,
            accuracy: 96,
            mistakes: 2,
            chars_typed: 50,
            elapsed_secs: 12.5,
            weak_keys: vec!['q'],
            coaching_tip: Some("Slow down on q.".to_string()),
            timestamp: Utc::now(),
        };
        let theme = Theme::default();
        let area = Rect::new(0, 0, 70, 18);
        let mut buf = Buffer::empty(area);
        Dashboard::new(&result, &theme, false).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("48 WPM"));
        assert!(text.contains("96%"));
        assert!(text.contains("48/50 correct"));
        assert!(text.contains("Slow down on q."));
    }
}
