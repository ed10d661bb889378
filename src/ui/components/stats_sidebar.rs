use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::scoring::SessionStats;
use crate::ui::theme::{Theme, ThemeColors};

pub struct StatsSidebar<'a> {
    stats: SessionStats,
    progress: Option<f64>,
    weak_keys: &'a [char],
    theme: &'a Theme,
}

impl<'a> StatsSidebar<'a> {
    pub fn new(stats: SessionStats, weak_keys: &'a [char], theme: &'a Theme) -> Self {
        Self {
            stats,
            progress: None,
            weak_keys,
            theme,
        }
    }

    /// Lesson completion, 0.0 to 1.0. Zen has none.
    pub fn progress(mut self, progress: Option<f64>) -> Self {
        self.progress = progress;
        self
    }
}

pub fn accuracy_color(colors: &ThemeColors, accuracy: u32) -> Color {
    if accuracy >= 95 {
        colors.success()
    } else if accuracy >= 85 {
        colors.warning()
    } else {
        colors.error()
    }
}

pub fn format_keys(keys: &[char]) -> String {
    keys.iter()
        .map(|&k| if k == ' ' { "space".to_string() } else { k.to_string() })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Widget for StatsSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let stats = self.stats;

        let mut lines = vec![
            Line::from(vec![
                Span::styled("WPM:      ", Style::default().fg(colors.fg())),
                Span::styled(stats.wpm.to_string(), Style::default().fg(colors.accent())),
            ]),
            Line::from(vec![
                Span::styled("Accuracy: ", Style::default().fg(colors.fg())),
                Span::styled(
                    format!("{}%", stats.accuracy),
                    Style::default().fg(accuracy_color(colors, stats.accuracy)),
                ),
            ]),
            Line::from(vec![
                Span::styled("Errors:   ", Style::default().fg(colors.fg())),
                Span::styled(stats.mistakes.to_string(), Style::default().fg(colors.error())),
            ]),
            Line::from(vec![
                Span::styled("Time:     ", Style::default().fg(colors.fg())),
                Span::styled(
                    format!("{:.1}s", stats.elapsed.as_secs_f64()),
                    Style::default().fg(colors.fg()),
                ),
            ]),
        ];

        if let Some(progress) = self.progress {
            lines.push(Line::from(vec![
                Span::styled("Progress: ", Style::default().fg(colors.fg())),
                Span::styled(
                    format!("{:.0}%", progress * 100.0),
                    Style::default().fg(colors.accent()),
                ),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Weak keys",
            Style::default().fg(colors.text_pending()),
        )));
        let weak = if self.weak_keys.is_empty() {
            Span::styled("none yet", Style::default().fg(colors.text_pending()))
        } else {
            Span::styled(format_keys(self.weak_keys), Style::default().fg(colors.warning()))
        };
        lines.push(Line::from(weak));

        let block = Block::bordered()
            .title(" Stats ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        Paragraph::new(lines).block(block).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_keys() {
        assert_eq!(format_keys(&['a', ' ', 'q']), "a space q");
        assert_eq!(format_keys(&[]), "");
    }

    #[test]
    fn test_accuracy_color_bands() {
        let colors = ThemeColors::default();
        assert_eq!(accuracy_color(&colors, 100), colors.success());
        assert_eq!(accuracy_color(&colors, 90), colors.warning());
        assert_eq!(accuracy_color(&colors, 50), colors.error());
    }
}
