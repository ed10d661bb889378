//! Practice text, coaching tips and arcade words from a generative-text API.
//!
//! Providers may fail freely; [`worker::resolve`] turns every failure into the
//! fixed content in [`fallback`] before anything reaches the app.

pub mod fallback;
pub mod gemini;
pub mod offline;
pub mod prompt;
pub mod response;
pub mod worker;

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::{Difficulty, ProviderConfig};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider is offline")]
    Offline,
    #[error("API key not set (expected in ${0})")]
    MissingApiKey(String),
    #[error("request failed: {0}")]
    Http(String),
    #[error("provider returned HTTP {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("provider returned no content")]
    Empty,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PracticeTextRequest {
    pub focus_keys: Vec<char>,
    pub difficulty: Difficulty,
    pub topic: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoachingRequest {
    pub wpm: u32,
    pub accuracy: u32,
    pub weak_keys: Vec<char>,
}

pub trait TextProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// 40-60 words of plain prose.
    fn practice_text(&self, request: &PracticeTextRequest) -> Result<String, ProviderError>;

    /// One or two sentences of advice.
    fn coaching_tip(&self, request: &CoachingRequest) -> Result<String, ProviderError>;

    /// Lowercase single words for the arcade.
    fn practice_words(
        &self,
        count: usize,
        difficulty: Difficulty,
    ) -> Result<Vec<String>, ProviderError>;
}

/// Pick a provider for this run. Anything short of a usable API client
/// yields the offline provider, which always falls back.
pub fn from_config(config: &ProviderConfig, force_offline: bool) -> Arc<dyn TextProvider> {
    if force_offline || !config.enabled || !cfg!(feature = "network") {
        info!("text provider disabled, using offline fallbacks");
        return Arc::new(offline::OfflineProvider);
    }

    let api_key = match std::env::var(&config.api_key_env) {
        Ok(key) if !key.trim().is_empty() => key,
        _ => {
            warn!(
                "{}",
                ProviderError::MissingApiKey(config.api_key_env.clone())
            );
            return Arc::new(offline::OfflineProvider);
        }
    };

    match gemini::GeminiProvider::new(config, api_key) {
        Ok(provider) => {
            info!(model = %config.model, "using gemini text provider");
            Arc::new(provider)
        }
        Err(err) => {
            warn!(error = %err, "could not build gemini client, using offline fallbacks");
            Arc::new(offline::OfflineProvider)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_config_is_offline() {
        let config = ProviderConfig {
            enabled: false,
            ..ProviderConfig::default()
        };
        assert_eq!(from_config(&config, false).name(), "offline");
    }

    #[test]
    fn test_forced_offline() {
        assert_eq!(from_config(&ProviderConfig::default(), true).name(), "offline");
    }

    #[test]
    fn test_missing_key_is_offline() {
        let config = ProviderConfig {
            api_key_env: "TYPENEON_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..ProviderConfig::default()
        };
        assert_eq!(from_config(&config, false).name(), "offline");
    }
}
