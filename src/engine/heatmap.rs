use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyStat {
    pub ch: char,
    pub total: u32,
    pub errors: u32,
}

impl KeyStat {
    fn new(ch: char) -> Self {
        Self {
            ch,
            total: 0,
            errors: 0,
        }
    }

    pub fn error_rate(&self) -> f64 {
        self.errors as f64 / self.total.max(1) as f64
    }
}

/// Coarse error-rate bucket used to color the on-screen keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Heat {
    Untested,
    Cool,
    Warm,
    Hot,
    Critical,
}

impl Heat {
    pub fn from_rate(rate: f64) -> Self {
        if rate < 0.05 {
            Heat::Cool
        } else if rate < 0.15 {
            Heat::Warm
        } else if rate < 0.30 {
            Heat::Hot
        } else {
            Heat::Critical
        }
    }
}

/// Per-key attempt/error tally for one session, keyed by the lowercase
/// expected character.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyHeatmap {
    stats: BTreeMap<char, KeyStat>,
}

impl KeyHeatmap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the heatmap with one more attempt recorded for `expected`.
    /// `None` means the cursor is past the end of the text and nothing is
    /// recorded.
    #[must_use]
    pub fn record_attempt(&self, expected: Option<char>, was_correct: bool) -> KeyHeatmap {
        let mut next = self.clone();
        let Some(expected) = expected else {
            return next;
        };

        // One keystroke, one key, even when lowercasing expands the char
        let ch = expected.to_lowercase().next().unwrap_or(expected);
        let stat = next.stats.entry(ch).or_insert_with(|| KeyStat::new(ch));
        stat.total += 1;
        if !was_correct {
            stat.errors += 1;
        }
        next
    }

    /// Keys with more than `total_threshold` attempts and an error rate above
    /// `error_rate_threshold`, worst first.
    pub fn weak_keys(&self, total_threshold: u32, error_rate_threshold: f64) -> Vec<char> {
        let mut weak: Vec<&KeyStat> = self
            .stats
            .values()
            .filter(|s| s.total > total_threshold && s.error_rate() > error_rate_threshold)
            .collect();
        // Stable sort keeps character order among equal rates.
        weak.sort_by(|a, b| b.error_rate().total_cmp(&a.error_rate()));
        weak.into_iter().map(|s| s.ch).collect()
    }

    pub fn get(&self, ch: char) -> Option<&KeyStat> {
        self.stats.get(&ch)
    }

    pub fn heat(&self, ch: char) -> Heat {
        match self.get(ch) {
            Some(stat) if stat.total > 0 => Heat::from_rate(stat.error_rate()),
            _ => Heat::Untested,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyStat> {
        self.stats.values()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_many(map: KeyHeatmap, ch: char, correct: u32, wrong: u32) -> KeyHeatmap {
        let mut map = map;
        for _ in 0..correct {
            map = map.record_attempt(Some(ch), true);
        }
        for _ in 0..wrong {
            map = map.record_attempt(Some(ch), false);
        }
        map
    }

    #[test]
    fn test_record_does_not_mutate_input() {
        let before = KeyHeatmap::new();
        let after = before.record_attempt(Some('a'), false);
        assert!(before.is_empty());
        assert_eq!(after.get('a').unwrap().total, 1);
        assert_eq!(after.get('a').unwrap().errors, 1);
    }

    #[test]
    fn test_end_of_text_is_noop() {
        let map = KeyHeatmap::new().record_attempt(None, false);
        assert!(map.is_empty());
    }

    #[test]
    fn test_keys_are_lowercased() {
        let map = KeyHeatmap::new()
            .record_attempt(Some('T'), true)
            .record_attempt(Some('t'), false);
        let stat = map.get('t').unwrap();
        assert_eq!(stat.total, 2);
        assert_eq!(stat.errors, 1);
        assert!(map.get('T').is_none());
    }

    #[test]
    fn test_multi_char_lowercase_counts_once() {
        let map = KeyHeatmap::new().record_attempt(Some('\u{130}'), false);
        assert_eq!(map.iter().count(), 1);
        let stat = map.get('i').unwrap();
        assert_eq!(stat.total, 1);
        assert_eq!(stat.errors, 1);
    }

    #[test]
    fn test_errors_never_exceed_total() {
        let mut map = KeyHeatmap::new();
        let pattern = [true, false, false, true, false];
        for (i, &ok) in pattern.iter().cycle().take(40).enumerate() {
            let ch = (b'a' + (i % 4) as u8) as char;
            map = map.record_attempt(Some(ch), ok);
        }
        for stat in map.iter() {
            assert!(stat.errors <= stat.total);
        }
    }

    #[test]
    fn test_weak_keys_sorted_by_error_rate() {
        let mut map = KeyHeatmap::new();
        map = record_many(map, 'a', 8, 2); // 20%
        map = record_many(map, 'b', 2, 8); // 80%
        map = record_many(map, 'c', 10, 0); // 0%
        map = record_many(map, 'd', 5, 5); // 50%
        assert_eq!(map.weak_keys(3, 0.1), vec!['b', 'd', 'a']);
    }

    #[test]
    fn test_weak_keys_respects_attempt_threshold() {
        let map = record_many(KeyHeatmap::new(), 'q', 0, 3);
        assert!(map.weak_keys(3, 0.1).is_empty());
        assert_eq!(map.weak_keys(2, 0.1), vec!['q']);
    }

    #[test]
    fn test_weak_keys_never_untested() {
        let map = record_many(KeyHeatmap::new(), 'x', 0, 1);
        for ch in map.weak_keys(0, 0.0) {
            assert!(map.get(ch).unwrap().total > 0);
        }
    }

    #[test]
    fn test_heat_buckets() {
        let mut map = KeyHeatmap::new();
        map = record_many(map, 'a', 20, 0);
        map = record_many(map, 'b', 9, 1);
        map = record_many(map, 'c', 8, 2);
        map = record_many(map, 'd', 1, 1);
        assert_eq!(map.heat('a'), Heat::Cool);
        assert_eq!(map.heat('b'), Heat::Warm);
        assert_eq!(map.heat('c'), Heat::Hot);
        assert_eq!(map.heat('d'), Heat::Critical);
        assert_eq!(map.heat('z'), Heat::Untested);
    }
}
