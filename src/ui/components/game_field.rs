use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use crate::engine::game::{BOTTOM_BOUNDARY, GameState, WordEntity};
use crate::ui::layout::centered_rect;
use crate::ui::theme::Theme;

/// Falling words, the input line and a game-over overlay.
pub struct GameField<'a> {
    game: &'a GameState,
    theme: &'a Theme,
}

impl<'a> GameField<'a> {
    pub fn new(game: &'a GameState, theme: &'a Theme) -> Self {
        Self { game, theme }
    }
}

/// Map a word's percentage position into a cell of `area`. Words above the
/// top edge have no cell yet.
fn word_cell(word: &WordEntity, area: Rect) -> Option<(u16, u16)> {
    if word.y < 0.0 || area.width == 0 || area.height == 0 {
        return None;
    }
    let col = (word.x / 100.0 * area.width as f64) as u16;
    let row = (word.y / BOTTOM_BOUNDARY * area.height as f64) as u16;
    let len = word.text.chars().count() as u16;
    let col = col.min(area.width.saturating_sub(len));
    let row = row.min(area.height - 1);
    Some((area.x + col, area.y + row))
}

pub fn hud_line(game: &GameState) -> String {
    format!(
        " Score {}  Level {}  Lives {}  Misses {}",
        game.score(),
        game.level(),
        "\u{2665}".repeat(game.lives() as usize),
        game.misses(),
    )
}

impl Widget for GameField<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Arcade ")
            .title_bottom(Line::from(format!(" > {} ", self.game.input())))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        for word in self.game.words() {
            let Some((x, y)) = word_cell(word, inner) else {
                continue;
            };
            let (typed, rest) = word.split_typed();
            let typed_len = typed.chars().count() as u16;
            buf.set_string(
                x,
                y,
                typed,
                Style::default()
                    .fg(colors.word_typed())
                    .add_modifier(Modifier::BOLD),
            );
            buf.set_string(x + typed_len, y, rest, Style::default().fg(colors.word()));
        }

        if self.game.is_over() {
            let summary = self.game.summary();
            let popup = centered_rect(40, 40, inner);
            Clear.render(popup, buf);
            let lines = vec![
                Line::from(Span::styled(
                    "GAME OVER",
                    Style::default()
                        .fg(colors.error())
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(format!("Score: {}", summary.score)),
                Line::from(format!("Level: {}", summary.level)),
                Line::from(format!("Words: {}", summary.words_completed)),
                Line::from(format!("Misses: {}", summary.misses)),
                Line::from(""),
                Line::from(Span::styled(
                    "[r] Play again  [Esc] Menu",
                    Style::default().fg(colors.accent()),
                )),
            ];
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .style(Style::default().fg(colors.fg()).bg(colors.bg()))
                .block(
                    Block::bordered().border_style(Style::default().fg(colors.error())),
                )
                .render(popup, buf);
        }
    }
}
