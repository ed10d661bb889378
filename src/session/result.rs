use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::scoring::SessionStats;
use crate::session::state::{SessionKind, TypingSession};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionResult {
    pub mode: String,
    pub wpm: u32,
    pub accuracy: u32,
    pub mistakes: usize,
    pub chars_typed: usize,
    pub elapsed_secs: f64,
    pub weak_keys: Vec<char>,
    #[serde(default)]
    pub coaching_tip: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl SessionResult {
    pub fn from_session(
        session: &TypingSession,
        stats: SessionStats,
        weak_keys: Vec<char>,
    ) -> Self {
        let mode = match session.kind() {
            SessionKind::Lesson => "lesson",
            SessionKind::Zen => "zen",
        };
        Self {
            mode: mode.to_string(),
            wpm: stats.wpm,
            accuracy: stats.accuracy,
            mistakes: stats.mistakes,
            chars_typed: stats.chars_typed,
            elapsed_secs: stats.elapsed.as_secs_f64(),
            weak_keys,
            coaching_tip: None,
            timestamp: Utc::now(),
        }
    }

    pub fn correct_chars(&self) -> usize {
        self.chars_typed.saturating_sub(self.mistakes)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::session::input::KeyAction;
    use crate::session::state::Transition;

    #[test]
    fn test_result_from_finished_lesson() {
        let t0 = Instant::now();
        let mut session = TypingSession::lesson("cat");
        session.apply(KeyAction::Char('c'), t0);
        session.apply(KeyAction::Char('a'), t0);
        let transition = session.apply(KeyAction::Char('p'), t0 + Duration::from_secs(3));
        let Some(Transition::Finished(stats)) = transition else {
            panic!("lesson should be finished");
        };

        let result = SessionResult::from_session(&session, stats, vec!['t']);
        assert_eq!(result.mode, "lesson");
        assert_eq!(result.accuracy, 67);
        assert_eq!(result.mistakes, 1);
        assert_eq!(result.correct_chars(), 2);
        assert!((result.elapsed_secs - 3.0).abs() < 1e-9);
        assert_eq!(result.weak_keys, vec!['t']);
        assert!(result.coaching_tip.is_none());
    }

    #[test]
    fn test_result_serializes() {
        let session = TypingSession::zen();
        let result = SessionResult::from_session(&session, SessionStats::default(), Vec::new());
        let json = serde_json::to_string(&result).unwrap();
        let back: SessionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.mode, "zen");
        assert_eq!(back.coaching_tip, None);
    }
}
