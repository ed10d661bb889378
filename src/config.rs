use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&d| d == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&d| d == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const TOPICS: &[&str] = &[
    "general",
    "technology",
    "science",
    "nature",
    "history",
    "space",
    "cyberpunk",
];

pub const KEYBOARD_LAYOUTS: &[&str] = &["qwerty", "dvorak", "colemak"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_enabled")]
    pub enabled: bool,
    #[serde(default = "default_provider_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_provider_model")]
    pub model: String,
    #[serde(default = "default_provider_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider_enabled() -> bool {
    true
}
fn default_provider_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_provider_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_provider_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}
fn default_provider_timeout_secs() -> u64 {
    15
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: default_provider_enabled(),
            endpoint: default_provider_endpoint(),
            model: default_provider_model(),
            api_key_env: default_provider_api_key_env(),
            timeout_secs: default_provider_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_keyboard_layout")]
    pub keyboard_layout: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_topic")]
    pub topic: String,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_weak_key_min_attempts")]
    pub weak_key_min_attempts: u32,
    #[serde(default = "default_weak_key_error_rate")]
    pub weak_key_error_rate: f64,
    #[serde(default = "default_arcade_word_batch")]
    pub arcade_word_batch: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub provider: ProviderConfig,
}

fn default_theme() -> String {
    "neon".to_string()
}
fn default_keyboard_layout() -> String {
    "qwerty".to_string()
}
fn default_topic() -> String {
    "general".to_string()
}
fn default_tick_rate_ms() -> u64 {
    33
}
fn default_weak_key_min_attempts() -> u32 {
    2
}
fn default_weak_key_error_rate() -> f64 {
    0.1
}
fn default_arcade_word_batch() -> usize {
    20
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            keyboard_layout: default_keyboard_layout(),
            difficulty: Difficulty::default(),
            topic: default_topic(),
            tick_rate_ms: default_tick_rate_ms(),
            weak_key_min_attempts: default_weak_key_min_attempts(),
            weak_key_error_rate: default_weak_key_error_rate(),
            arcade_word_batch: default_arcade_word_batch(),
            log_level: default_log_level(),
            provider: ProviderConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typeneon")
            .join("config.toml")
    }

    pub fn log_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typeneon")
            .join("logs")
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.clamp(10, 1000))
    }

    /// Reset values an old or hand-edited file may carry that the app
    /// cannot use.
    pub fn normalize(&mut self) {
        if !KEYBOARD_LAYOUTS.contains(&self.keyboard_layout.as_str()) {
            self.keyboard_layout = default_keyboard_layout();
        }
        if self.topic.trim().is_empty() {
            self.topic = default_topic();
        }
        if !(0.0..=1.0).contains(&self.weak_key_error_rate) {
            self.weak_key_error_rate = default_weak_key_error_rate();
        }
        if self.arcade_word_batch == 0 {
            self.arcade_word_batch = default_arcade_word_batch();
        }
    }

    pub fn cycle_topic(&mut self, forward: bool) {
        let idx = TOPICS.iter().position(|&t| t == self.topic);
        let next = match (idx, forward) {
            (Some(i), true) => (i + 1) % TOPICS.len(),
            (Some(i), false) => (i + TOPICS.len() - 1) % TOPICS.len(),
            (None, _) => 0,
        };
        self.topic = TOPICS[next].to_string();
    }

    pub fn cycle_keyboard_layout(&mut self, forward: bool) {
        let idx = KEYBOARD_LAYOUTS
            .iter()
            .position(|&l| l == self.keyboard_layout)
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % KEYBOARD_LAYOUTS.len()
        } else {
            (idx + KEYBOARD_LAYOUTS.len() - 1) % KEYBOARD_LAYOUTS.len()
        };
        self.keyboard_layout = KEYBOARD_LAYOUTS[next].to_string();
    }
}

/// Command-line values. They shape one run and never reach the file.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub topic: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub theme: Option<String>,
    pub keyboard_layout: Option<String>,
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    /// The effective config for this run.
    pub fn apply(&self, config: &Config) -> Config {
        let mut effective = config.clone();
        if let Some(topic) = &self.topic {
            effective.topic = topic.clone();
        }
        if let Some(difficulty) = self.difficulty {
            effective.difficulty = difficulty;
        }
        if let Some(theme) = &self.theme {
            effective.theme = theme.clone();
        }
        if let Some(layout) = &self.keyboard_layout {
            effective.keyboard_layout = layout.clone();
        }
        if let Some(level) = &self.log_level {
            effective.log_level = level.clone();
        }
        effective.normalize();
        effective
    }
}
