use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::engine::heatmap::KeyHeatmap;
use crate::keyboard::layout::KeyboardLayout;
use crate::ui::theme::Theme;

/// Keyboard colored by per-key error rate, with the next expected key
/// highlighted.
pub struct KeyboardDiagram<'a> {
    pub layout: &'a KeyboardLayout,
    pub heatmap: &'a KeyHeatmap,
    pub next_key: Option<char>,
    pub compact: bool,
    pub theme: &'a Theme,
}

impl<'a> KeyboardDiagram<'a> {
    pub fn new(
        layout: &'a KeyboardLayout,
        heatmap: &'a KeyHeatmap,
        next_key: Option<char>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            layout,
            heatmap,
            next_key,
            compact: false,
            theme,
        }
    }

    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    fn key_width(&self) -> u16 {
        if self.compact { 3 } else { 5 }
    }

    fn key_label(&self, key: char) -> String {
        if self.compact {
            format!("[{key}]")
        } else {
            format!("[ {key} ]")
        }
    }
}

impl Widget for KeyboardDiagram<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} heatmap ", self.layout.name))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let key_width = self.key_width();
        if inner.height < 3 || inner.width < key_width * 10 {
            return;
        }

        let next = self.next_key.map(|c| c.to_ascii_lowercase());
        let stagger: &[u16] = if self.compact { &[0, 1, 2] } else { &[1, 3, 5] };

        for (row_idx, row) in self.layout.rows.iter().enumerate() {
            let y = inner.y + row_idx as u16;
            if y >= inner.y + inner.height {
                break;
            }
            let offset = stagger.get(row_idx).copied().unwrap_or(0);

            for (col_idx, &key) in row.iter().enumerate() {
                let x = inner.x + offset + col_idx as u16 * key_width;
                if x + key_width > inner.x + inner.width {
                    break;
                }

                let style = if next == Some(key) {
                    Style::default()
                        .fg(colors.text_cursor_fg())
                        .bg(colors.text_cursor_bg())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                        .fg(colors.fg())
                        .bg(colors.heat(self.heatmap.heat(key)))
                };

                buf.set_string(x, y, self.key_label(key), style);
            }
        }

        // Space bar under the bottom row
        let space_y = inner.y + self.layout.rows.len() as u16;
        if space_y < inner.y + inner.height {
            let width = key_width * 5;
            let x = inner.x + (inner.width.saturating_sub(width)) / 2;
            let style = if next == Some(' ') {
                Style::default().bg(colors.text_cursor_bg())
            } else {
                Style::default().bg(colors.heat(self.heatmap.heat(' ')))
            };
            buf.set_string(x, space_y, " ".repeat(width as usize), style);
        }
    }
}
