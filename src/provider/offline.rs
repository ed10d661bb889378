use crate::config::Difficulty;
use crate::provider::{CoachingRequest, PracticeTextRequest, ProviderError, TextProvider};

/// Never reaches the network; every call falls back.
pub struct OfflineProvider;

impl TextProvider for OfflineProvider {
    fn name(&self) -> &'static str {
        "offline"
    }

    fn practice_text(&self, _request: &PracticeTextRequest) -> Result<String, ProviderError> {
        Err(ProviderError::Offline)
    }

    fn coaching_tip(&self, _request: &CoachingRequest) -> Result<String, ProviderError> {
        Err(ProviderError::Offline)
    }

    fn practice_words(
        &self,
        _count: usize,
        _difficulty: Difficulty,
    ) -> Result<Vec<String>, ProviderError> {
        Err(ProviderError::Offline)
    }
}
