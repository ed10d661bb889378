use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Horizontal fill bar with a centered `done/total` label.
pub struct ProgressBar<'a> {
    pub label: &'a str,
    pub done: usize,
    pub total: usize,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(label: &'a str, done: usize, total: usize, theme: &'a Theme) -> Self {
        Self {
            label,
            done,
            total,
            theme,
        }
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.done as f64 / self.total as f64).clamp(0.0, 1.0)
        }
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.label))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled = (self.ratio() * inner.width as f64).round() as u16;
        for x in inner.x..inner.x + inner.width {
            let bg = if x < inner.x + filled {
                colors.bar_filled()
            } else {
                colors.bar_empty()
            };
            buf[(x, inner.y)].set_style(Style::default().bg(bg));
        }

        let text = format!("{}/{}", self.done, self.total);
        let x = inner.x + (inner.width.saturating_sub(text.len() as u16)) / 2;
        buf.set_string(x, inner.y, &text, Style::default().fg(colors.fg()));
    }
}
