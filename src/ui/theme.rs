use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::heatmap::Heat;

pub const DEFAULT_THEME: &str = "neon";

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub text_correct: String,
    pub text_incorrect: String,
    pub text_incorrect_bg: String,
    pub text_pending: String,
    pub text_cursor_bg: String,
    pub text_cursor_fg: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub error: String,
    pub warning: String,
    pub success: String,
    pub word: String,
    pub word_typed: String,
    pub heat_untested: String,
    pub heat_cool: String,
    pub heat_warm: String,
    pub heat_hot: String,
    pub heat_critical: String,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        // User themes shadow bundled ones
        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir
                .join("typeneon")
                .join("themes")
                .join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                match toml::from_str::<Theme>(&content) {
                    Ok(theme) => return Some(theme),
                    Err(err) => warn!(path = %user_theme_path.display(), error = %err, "ignoring broken theme"),
                }
            }
        }

        let filename = format!("{name}.toml");
        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    /// The named theme, or the default one when it does not exist.
    pub fn load_or_default(name: &str) -> Self {
        Self::load(name).unwrap_or_else(|| {
            warn!(theme = name, "unknown theme, using default");
            Self::default()
        })
    }

    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect();
        names.sort();
        names
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: DEFAULT_THEME.to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#0d0221".to_string(),
            fg: "#e0e0ff".to_string(),
            text_correct: "#39ff14".to_string(),
            text_incorrect: "#ff2a6d".to_string(),
            text_incorrect_bg: "#3d0a24".to_string(),
            text_pending: "#5a5a8a".to_string(),
            text_cursor_bg: "#05d9e8".to_string(),
            text_cursor_fg: "#0d0221".to_string(),
            accent: "#05d9e8".to_string(),
            accent_dim: "#1b3b5a".to_string(),
            border: "#3a2f6b".to_string(),
            border_focused: "#d300c5".to_string(),
            header_bg: "#1a0b3d".to_string(),
            header_fg: "#e0e0ff".to_string(),
            bar_filled: "#d300c5".to_string(),
            bar_empty: "#1a0b3d".to_string(),
            error: "#ff2a6d".to_string(),
            warning: "#f9c80e".to_string(),
            success: "#39ff14".to_string(),
            word: "#05d9e8".to_string(),
            word_typed: "#f9c80e".to_string(),
            heat_untested: "#2a2450".to_string(),
            heat_cool: "#1f6f8b".to_string(),
            heat_warm: "#b8a200".to_string(),
            heat_hot: "#ff7b00".to_string(),
            heat_critical: "#ff2a6d".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::White
    }

    pub fn heat(&self, heat: Heat) -> Color {
        match heat {
            Heat::Untested => Self::parse_color(&self.heat_untested),
            Heat::Cool => Self::parse_color(&self.heat_cool),
            Heat::Warm => Self::parse_color(&self.heat_warm),
            Heat::Hot => Self::parse_color(&self.heat_hot),
            Heat::Critical => Self::parse_color(&self.heat_critical),
        }
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn text_correct(&self) -> Color { Self::parse_color(&self.text_correct) }
    pub fn text_incorrect(&self) -> Color { Self::parse_color(&self.text_incorrect) }
    pub fn text_incorrect_bg(&self) -> Color { Self::parse_color(&self.text_incorrect_bg) }
    pub fn text_pending(&self) -> Color { Self::parse_color(&self.text_pending) }
    pub fn text_cursor_bg(&self) -> Color { Self::parse_color(&self.text_cursor_bg) }
    pub fn text_cursor_fg(&self) -> Color { Self::parse_color(&self.text_cursor_fg) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
    pub fn word(&self) -> Color { Self::parse_color(&self.word) }
    pub fn word_typed(&self) -> Color { Self::parse_color(&self.word_typed) }
}
