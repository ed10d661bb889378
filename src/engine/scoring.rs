use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Standard word length used for WPM.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Elapsed time never drops below this when dividing, so a keystroke landing
/// in the same instant as the start does not blow up the WPM.
pub const MIN_ELAPSED: Duration = Duration::from_millis(60);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub wpm: u32,
    pub accuracy: u32,
    pub elapsed: Duration,
    pub mistakes: usize,
    pub chars_typed: usize,
}

/// Derive live or final stats for a session.
///
/// `start` is `None` until the first keystroke; in that case elapsed time is
/// zero and WPM is zero. Positions past the end of `reference` count as
/// mistakes.
pub fn compute_stats(
    reference: &[char],
    typed: &[char],
    start: Option<Instant>,
    now: Instant,
) -> SessionStats {
    let chars_typed = typed.len();
    let mistakes = count_mistakes(reference, typed);

    let elapsed = start
        .map(|s| now.saturating_duration_since(s))
        .unwrap_or_default();

    let wpm = if start.is_some() {
        wpm(chars_typed, elapsed)
    } else {
        0
    };

    SessionStats {
        wpm,
        accuracy: accuracy(chars_typed, mistakes),
        elapsed,
        mistakes,
        chars_typed,
    }
}

pub fn count_mistakes(reference: &[char], typed: &[char]) -> usize {
    typed
        .iter()
        .enumerate()
        .filter(|&(i, ch)| reference.get(i) != Some(ch))
        .count()
}

pub fn wpm(chars_typed: usize, elapsed: Duration) -> u32 {
    let minutes = elapsed.max(MIN_ELAPSED).as_secs_f64() / 60.0;
    ((chars_typed as f64 / CHARS_PER_WORD) / minutes).round() as u32
}

pub fn accuracy(chars_typed: usize, mistakes: usize) -> u32 {
    if chars_typed == 0 {
        return 100;
    }
    let correct = chars_typed.saturating_sub(mistakes);
    (correct as f64 / chars_typed as f64 * 100.0).round() as u32
}
