use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::state::{SessionKind, TypingSession};
use crate::ui::layout::wrapped_line_count;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CharStatus {
    Correct,
    Incorrect,
    Cursor,
    Pending,
}

fn char_status(reference: &[char], typed: &[char], idx: usize) -> CharStatus {
    match typed.get(idx) {
        Some(&ch) if reference.get(idx) == Some(&ch) => CharStatus::Correct,
        Some(_) => CharStatus::Incorrect,
        None if idx == typed.len() => CharStatus::Cursor,
        None => CharStatus::Pending,
    }
}

pub struct TypingArea<'a> {
    session: &'a TypingSession,
    theme: &'a Theme,
    pending: bool,
}

impl<'a> TypingArea<'a> {
    pub fn new(session: &'a TypingSession, theme: &'a Theme) -> Self {
        Self {
            session,
            theme,
            pending: false,
        }
    }

    /// Show a placeholder while the lesson text is on its way.
    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    fn lesson_lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let reference = self.session.reference();
        let typed = self.session.typed();

        let spans: Vec<Span> = reference
            .iter()
            .enumerate()
            .map(|(idx, &expected)| match char_status(reference, typed, idx) {
                CharStatus::Correct => {
                    Span::styled(expected.to_string(), Style::default().fg(colors.text_correct()))
                }
                // Show what was actually typed; a mistyped space stays visible
                CharStatus::Incorrect => {
                    let shown = match typed[idx] {
                        ' ' => '\u{00b7}',
                        ch => ch,
                    };
                    Span::styled(
                        shown.to_string(),
                        Style::default()
                            .fg(colors.text_incorrect())
                            .bg(colors.text_incorrect_bg())
                            .add_modifier(Modifier::UNDERLINED),
                    )
                }
                CharStatus::Cursor => Span::styled(
                    expected.to_string(),
                    Style::default()
                        .fg(colors.text_cursor_fg())
                        .bg(colors.text_cursor_bg()),
                ),
                CharStatus::Pending => {
                    Span::styled(expected.to_string(), Style::default().fg(colors.text_pending()))
                }
            })
            .collect();

        vec![Line::from(spans)]
    }

    /// Zen text is hard-wrapped so the tail can be kept in view.
    fn zen_lines(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let typed = self.session.typed();
        if width == 0 || height == 0 {
            return Vec::new();
        }

        let total_rows = wrapped_line_count(typed.len() + 1, width);
        let skip_rows = total_rows.saturating_sub(height);
        let start = skip_rows * width;

        let mut lines: Vec<Line> = typed[start.min(typed.len())..]
            .chunks(width)
            .map(|chunk| {
                Line::from(Span::styled(
                    chunk.iter().collect::<String>(),
                    Style::default().fg(colors.fg()),
                ))
            })
            .collect();

        let cursor = Span::styled(
            " ",
            Style::default().bg(colors.text_cursor_bg()),
        );
        match lines.last_mut() {
            Some(last) if last.width() < width => last.spans.push(cursor),
            _ => lines.push(Line::from(cursor)),
        }
        lines
    }
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = match self.session.kind() {
            SessionKind::Lesson => " Lesson ",
            SessionKind::Zen => " Zen ",
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.pending {
            Paragraph::new(Line::from(Span::styled(
                "Generating your lesson...",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::ITALIC),
            )))
            .render(inner, buf);
            return;
        }

        match self.session.kind() {
            SessionKind::Lesson => {
                Paragraph::new(self.lesson_lines())
                    .wrap(Wrap { trim: false })
                    .render(inner, buf);
            }
            SessionKind::Zen => {
                let lines = self.zen_lines(inner.width as usize, inner.height as usize);
                if self.session.typed().is_empty() {
                    Paragraph::new(vec![
                        Line::from(Span::styled(
                            "Type anything. Esc when you are done.",
                            Style::default().fg(colors.text_pending()),
                        )),
                    ])
                    .render(inner, buf);
                } else {
                    Paragraph::new(lines).render(inner, buf);
                }
            }
        }
    }
}
