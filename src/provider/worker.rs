use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use tracing::{debug, warn};

use crate::config::Difficulty;
use crate::event::AppEvent;
use crate::provider::{CoachingRequest, PracticeTextRequest, TextProvider, fallback};

/// Identifies the session a request was made for. A reply whose generation
/// no longer matches the app's current one is stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderRequest {
    PracticeText(PracticeTextRequest),
    CoachingTip(CoachingRequest),
    PracticeWords { count: usize, difficulty: Difficulty },
}

impl ProviderRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderRequest::PracticeText(_) => "practice_text",
            ProviderRequest::CoachingTip(_) => "coaching_tip",
            ProviderRequest::PracticeWords { .. } => "practice_words",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderReply {
    PracticeText(String),
    CoachingTip(String),
    PracticeWords(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderResponse {
    pub ticket: Ticket,
    pub reply: ProviderReply,
    /// True when the reply is fallback content.
    pub degraded: bool,
}

/// Run one request to completion. Errors and empty content become the fixed
/// fallback, so the caller always gets something to show.
pub fn resolve(provider: &dyn TextProvider, request: &ProviderRequest) -> (ProviderReply, bool) {
    match request {
        ProviderRequest::PracticeText(req) => match provider.practice_text(req) {
            Ok(text) if !text.trim().is_empty() => (ProviderReply::PracticeText(text), false),
            Ok(_) => {
                warn!(provider = provider.name(), "empty practice text, using fallback");
                (ProviderReply::PracticeText(fallback::practice_text()), true)
            }
            Err(err) => {
                warn!(provider = provider.name(), error = %err, "practice text failed, using fallback");
                (ProviderReply::PracticeText(fallback::practice_text()), true)
            }
        },
        ProviderRequest::CoachingTip(req) => match provider.coaching_tip(req) {
            Ok(tip) if !tip.trim().is_empty() => (ProviderReply::CoachingTip(tip), false),
            Ok(_) => {
                warn!(provider = provider.name(), "empty coaching tip, using fallback");
                (ProviderReply::CoachingTip(fallback::coaching_tip()), true)
            }
            Err(err) => {
                warn!(provider = provider.name(), error = %err, "coaching tip failed, using fallback");
                (ProviderReply::CoachingTip(fallback::coaching_tip()), true)
            }
        },
        ProviderRequest::PracticeWords { count, difficulty } => {
            match provider.practice_words(*count, *difficulty) {
                Ok(words) if !words.is_empty() => (ProviderReply::PracticeWords(words), false),
                Ok(_) => {
                    warn!(provider = provider.name(), "empty word list, using fallback");
                    (ProviderReply::PracticeWords(fallback::practice_words()), true)
                }
                Err(err) => {
                    warn!(provider = provider.name(), error = %err, "word list failed, using fallback");
                    (ProviderReply::PracticeWords(fallback::practice_words()), true)
                }
            }
        }
    }
}

/// Runs provider requests off the UI thread and posts each reply back as an
/// [`AppEvent::Provider`].
#[derive(Clone)]
pub struct Dispatcher {
    provider: Arc<dyn TextProvider>,
    tx: Sender<AppEvent>,
}

impl Dispatcher {
    pub fn new(provider: Arc<dyn TextProvider>, tx: Sender<AppEvent>) -> Self {
        Self { provider, tx }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn dispatch(&self, ticket: Ticket, request: ProviderRequest) {
        debug!(generation = ticket.generation, kind = request.kind(), "dispatching provider request");

        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("provider-{}", request.kind()))
            .spawn({
                let request = request.clone();
                move || {
                    let (reply, degraded) = resolve(provider.as_ref(), &request);
                    let _ = tx.send(AppEvent::Provider(ProviderResponse {
                        ticket,
                        reply,
                        degraded,
                    }));
                }
            });

        if let Err(err) = spawned {
            warn!(error = %err, "could not spawn provider thread, answering with fallback");
            let reply = match request {
                ProviderRequest::PracticeText(_) => ProviderReply::PracticeText(fallback::practice_text()),
                ProviderRequest::CoachingTip(_) => ProviderReply::CoachingTip(fallback::coaching_tip()),
                ProviderRequest::PracticeWords { .. } => {
                    ProviderReply::PracticeWords(fallback::practice_words())
                }
            };
            let _ = self.tx.send(AppEvent::Provider(ProviderResponse {
                ticket,
                reply,
                degraded: true,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::offline::OfflineProvider;

    #[test]
    fn test_offline_resolves_to_fallbacks() {
        let provider = OfflineProvider;
        let (reply, degraded) = resolve(
            &provider,
            &ProviderRequest::PracticeText(PracticeTextRequest {
                focus_keys: vec![],
                difficulty: Difficulty::Beginner,
                topic: "general".to_string(),
            }),
        );
        assert!(degraded);
        assert_eq!(reply, ProviderReply::PracticeText(fallback::PRACTICE_TEXT.to_string()));

        let (reply, _) = resolve(
            &provider,
            &ProviderRequest::CoachingTip(CoachingRequest {
                wpm: 10,
                accuracy: 90,
                weak_keys: vec![],
            }),
        );
        assert_eq!(reply, ProviderReply::CoachingTip(fallback::COACHING_TIP.to_string()));

        let (reply, _) = resolve(
            &provider,
            &ProviderRequest::PracticeWords {
                count: 5,
                difficulty: Difficulty::Advanced,
            },
        );
        let ProviderReply::PracticeWords(words) = reply else {
            panic!("expected words");
        };
        assert_eq!(words.len(), 10);
    }
}
