use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

pub struct MenuItem {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

pub const ITEMS: [MenuItem; 4] = [
    MenuItem {
        key: "1",
        label: "Lesson",
        description: "Generated practice text aimed at your weak keys",
    },
    MenuItem {
        key: "2",
        label: "Zen",
        description: "Free typing with no target and no mistakes",
    },
    MenuItem {
        key: "3",
        label: "Arcade",
        description: "Type the falling words before they hit the ground",
    },
    MenuItem {
        key: "c",
        label: "Settings",
        description: "Difficulty, topic, theme and keyboard layout",
    },
];

pub struct Menu<'a> {
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(selected: usize, theme: &'a Theme) -> Self {
        Self { selected, theme }
    }
}

impl Widget for Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "T Y P E N E O N",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "neon typing trainer",
                Style::default().fg(colors.border_focused()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(ITEMS.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
            .split(layout[1]);

        for (i, item) in ITEMS.iter().enumerate() {
            let Some(&row) = rows.get(i) else {
                break;
            };
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };

            let label_style = if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };

            let lines = vec![
                Line::from(Span::styled(
                    format!(" {indicator} [{}] {}", item.key, item.label),
                    label_style,
                )),
                Line::from(Span::styled(
                    format!("     {}", item.description),
                    Style::default().fg(colors.text_pending()),
                )),
            ];
            Paragraph::new(lines).render(row, buf);
        }
    }
}
