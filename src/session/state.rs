use std::time::Instant;

use crate::engine::heatmap::KeyHeatmap;
use crate::engine::scoring::{self, SessionStats};
use crate::session::input::KeyAction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionKind {
    /// Type a fixed reference text; ends when the text is fully typed.
    Lesson,
    /// Free typing with no reference; ends only when asked to.
    Zen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Started,
    Finished(SessionStats),
}

pub struct TypingSession {
    kind: SessionKind,
    reference: Vec<char>,
    typed: Vec<char>,
    phase: Phase,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    final_stats: Option<SessionStats>,
    heatmap: KeyHeatmap,
    advice: Option<String>,
}

impl TypingSession {
    pub fn lesson(text: &str) -> Self {
        Self::with_kind(SessionKind::Lesson, text.chars().collect())
    }

    pub fn zen() -> Self {
        Self::with_kind(SessionKind::Zen, Vec::new())
    }

    fn with_kind(kind: SessionKind, reference: Vec<char>) -> Self {
        Self {
            kind,
            reference,
            typed: Vec::new(),
            phase: Phase::NotStarted,
            started_at: None,
            finished_at: None,
            final_stats: None,
            heatmap: KeyHeatmap::new(),
            advice: None,
        }
    }

    /// Applies one classified key press at time `now`. A keystroke that both
    /// starts and completes a lesson reports `Finished`.
    pub fn apply(&mut self, action: KeyAction, now: Instant) -> Option<Transition> {
        if self.phase == Phase::Finished {
            return None;
        }
        match action {
            KeyAction::Char(ch) => self.type_char(ch, now),
            KeyAction::Delete => {
                self.typed.pop();
                None
            }
            KeyAction::Ignored => None,
        }
    }

    fn type_char(&mut self, ch: char, now: Instant) -> Option<Transition> {
        if self.kind == SessionKind::Lesson && self.typed.len() >= self.reference.len() {
            return None;
        }

        let mut transition = None;
        if self.phase == Phase::NotStarted {
            self.phase = Phase::InProgress;
            self.started_at = Some(now);
            transition = Some(Transition::Started);
        }

        if self.kind == SessionKind::Lesson {
            let expected = self.reference.get(self.typed.len()).copied();
            self.heatmap = self.heatmap.record_attempt(expected, expected == Some(ch));
        }
        self.typed.push(ch);

        if self.kind == SessionKind::Lesson && self.typed.len() == self.reference.len() {
            return self.finish(now);
        }
        transition
    }

    /// Ends an in-progress session at `now`, freezing its stats.
    pub fn finish(&mut self, now: Instant) -> Option<Transition> {
        if self.phase != Phase::InProgress {
            return None;
        }
        self.phase = Phase::Finished;
        self.finished_at = Some(now);
        let stats = self.live_stats(now);
        self.final_stats = Some(stats);
        Some(Transition::Finished(stats))
    }

    /// Back to `NotStarted` on the same reference text.
    pub fn reset(&mut self) {
        self.typed.clear();
        self.phase = Phase::NotStarted;
        self.started_at = None;
        self.finished_at = None;
        self.final_stats = None;
        self.heatmap = KeyHeatmap::new();
        self.advice = None;
    }

    /// Frozen stats once finished, live stats otherwise.
    pub fn stats(&self, now: Instant) -> SessionStats {
        self.final_stats.unwrap_or_else(|| self.live_stats(now))
    }

    fn live_stats(&self, now: Instant) -> SessionStats {
        match self.kind {
            SessionKind::Lesson => {
                scoring::compute_stats(&self.reference, &self.typed, self.started_at, now)
            }
            SessionKind::Zen => {
                scoring::compute_stats(&self.typed, &self.typed, self.started_at, now)
            }
        }
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn reference(&self) -> &[char] {
        &self.reference
    }

    pub fn reference_text(&self) -> String {
        self.reference.iter().collect()
    }

    pub fn typed(&self) -> &[char] {
        &self.typed
    }

    pub fn cursor(&self) -> usize {
        self.typed.len()
    }

    /// The character the user should type next, if any.
    pub fn expected_char(&self) -> Option<char> {
        self.reference.get(self.typed.len()).copied()
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<Instant> {
        self.finished_at
    }

    pub fn heatmap(&self) -> &KeyHeatmap {
        &self.heatmap
    }

    pub fn advice(&self) -> Option<&str> {
        self.advice.as_deref()
    }

    pub fn set_advice(&mut self, advice: String) {
        self.advice = Some(advice);
    }

    pub fn progress(&self) -> f64 {
        if self.reference.is_empty() {
            return 0.0;
        }
        self.typed.len() as f64 / self.reference.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn type_str(session: &mut TypingSession, s: &str, now: Instant) -> Vec<Transition> {
        s.chars()
            .filter_map(|ch| session.apply(KeyAction::Char(ch), now))
            .collect()
    }

    #[test]
    fn test_new_lesson() {
        let session = TypingSession::lesson("hello");
        assert_eq!(session.reference().len(), 5);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.phase(), Phase::NotStarted);
        assert_eq!(session.progress(), 0.0);
        assert_eq!(session.expected_char(), Some('h'));
    }

    #[test]
    fn test_first_keystroke_starts_once() {
        let t0 = Instant::now();
        let mut session = TypingSession::lesson("abc");
        assert_eq!(
            session.apply(KeyAction::Char('a'), t0),
            Some(Transition::Started)
        );
        let t1 = t0 + Duration::from_secs(1);
        assert_eq!(session.apply(KeyAction::Char('b'), t1), None);
        assert_eq!(session.started_at(), Some(t0));
        assert_eq!(session.phase(), Phase::InProgress);
    }

    #[test]
    fn test_delete_does_not_start_or_record() {
        let t0 = Instant::now();
        let mut session = TypingSession::lesson("abc");
        assert_eq!(session.apply(KeyAction::Delete, t0), None);
        assert_eq!(session.phase(), Phase::NotStarted);
        session.apply(KeyAction::Char('x'), t0);
        session.apply(KeyAction::Delete, t0);
        assert!(session.typed().is_empty());
        assert_eq!(session.heatmap().get('a').unwrap().total, 1);
    }

    #[test]
    fn test_ignored_keys_do_nothing() {
        let mut session = TypingSession::lesson("abc");
        assert_eq!(session.apply(KeyAction::Ignored, Instant::now()), None);
        assert_eq!(session.phase(), Phase::NotStarted);
    }

    #[test]
    fn test_mistakes_are_appended_and_keyed_by_expected() {
        let t0 = Instant::now();
        let mut session = TypingSession::lesson("cat");
        type_str(&mut session, "cap", t0);
        assert_eq!(session.typed(), &['c', 'a', 'p']);
        let t = session.heatmap().get('t').unwrap();
        assert_eq!((t.total, t.errors), (1, 1));
        assert!(session.heatmap().get('p').is_none());
    }

    #[test]
    fn test_finishes_once_with_completion_time() {
        let t0 = Instant::now();
        let done = t0 + Duration::from_secs(12);
        let mut session = TypingSession::lesson("ab");
        session.apply(KeyAction::Char('a'), t0);
        let transition = session.apply(KeyAction::Char('b'), done);
        let Some(Transition::Finished(stats)) = transition else {
            panic!("expected finish, got {transition:?}");
        };
        assert_eq!(stats.elapsed, Duration::from_secs(12));
        assert_eq!(session.finished_at(), Some(done));

        // Later reads keep the completion-time stats.
        let later = done + Duration::from_secs(30);
        assert_eq!(session.stats(later), stats);
        assert_eq!(session.apply(KeyAction::Char('c'), later), None);
        assert_eq!(session.apply(KeyAction::Delete, later), None);
        assert_eq!(session.typed().len(), 2);
    }

    #[test]
    fn test_single_char_lesson_starts_and_finishes() {
        let mut session = TypingSession::lesson("a");
        let transitions = type_str(&mut session, "a", Instant::now());
        assert!(matches!(transitions[..], [Transition::Finished(_)]));
        assert!(session.is_finished());
    }

    #[test]
    fn test_empty_lesson_never_starts() {
        let mut session = TypingSession::lesson("");
        assert_eq!(session.apply(KeyAction::Char('a'), Instant::now()), None);
        assert_eq!(session.phase(), Phase::NotStarted);
        assert!(session.typed().is_empty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let t0 = Instant::now();
        let mut session = TypingSession::lesson("hi");
        type_str(&mut session, "hi", t0);
        session.set_advice("slow down".to_string());
        session.reset();
        assert_eq!(session.phase(), Phase::NotStarted);
        assert!(session.typed().is_empty());
        assert!(session.started_at().is_none());
        assert!(session.finished_at().is_none());
        assert!(session.advice().is_none());
        assert!(session.heatmap().is_empty());
        assert_eq!(session.reference_text(), "hi");
    }

    #[test]
    fn test_zen_has_no_mistakes_and_finishes_on_request() {
        let t0 = Instant::now();
        let mut session = TypingSession::zen();
        type_str(&mut session, "anything goes", t0);
        assert!(!session.is_finished());
        assert!(session.heatmap().is_empty());

        let end = t0 + Duration::from_secs(60);
        let Some(Transition::Finished(stats)) = session.finish(end) else {
            panic!("zen session should finish");
        };
        assert_eq!(stats.mistakes, 0);
        assert_eq!(stats.accuracy, 100);
        assert_eq!(stats.chars_typed, 13);
        assert_eq!(stats.wpm, 3);
    }

    #[test]
    fn test_finish_before_start_is_noop() {
        let mut session = TypingSession::zen();
        assert_eq!(session.finish(Instant::now()), None);
        assert_eq!(session.phase(), Phase::NotStarted);
    }
}
