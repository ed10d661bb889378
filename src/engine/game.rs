//! Falling-word arcade simulation.
//!
//! The loop is a pure step function: the host feeds elapsed time through
//! [`GameState::tick`] and keystrokes through [`GameState::type_char`], and
//! reacts to the returned [`GameEvent`]s. No timers live in here.

use std::collections::VecDeque;
use std::time::Duration;

use rand::Rng;

pub const STARTING_LIVES: u32 = 3;
pub const STARTING_LEVEL: u32 = 1;

pub const INITIAL_SPAWN_INTERVAL_MS: f64 = 2000.0;
pub const SPAWN_INTERVAL_STEP_MS: f64 = 10.0;
pub const MIN_SPAWN_INTERVAL_MS: f64 = 800.0;

/// Vertical positions are percentages of the field height.
pub const SPAWN_Y: f64 = -10.0;
pub const BOTTOM_BOUNDARY: f64 = 100.0;
pub const MIN_SPAWN_X: f64 = 5.0;
pub const MAX_SPAWN_X: f64 = 85.0;

/// Fall speed in percent of field height per second.
pub const BASE_FALL_SPEED: f64 = 6.0;
pub const FALL_SPEED_PER_LEVEL: f64 = 2.0;

pub const POINTS_PER_CHAR: u32 = 10;
pub const POINTS_PER_LEVEL: u32 = 100;

/// Spawned when the word queue has run dry and no batch is on its way.
pub const DEFAULT_WORD: &str = "neon";

#[derive(Clone, Debug, PartialEq)]
pub struct WordEntity {
    pub id: u64,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    /// Number of leading characters already matched by the input buffer.
    pub typed: usize,
}

impl WordEntity {
    /// Splits the text into the matched prefix and the remainder.
    pub fn split_typed(&self) -> (&str, &str) {
        let split = self
            .text
            .char_indices()
            .nth(self.typed)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len());
        self.text.split_at(split)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Spawned { id: u64, text: String },
    Escaped { id: u64, text: String },
    LifeLost { remaining: u32 },
    Completed { id: u64, text: String, points: u32 },
    LevelUp { level: u32 },
    /// A keystroke that matched no active word.
    Miss,
    GameOver { score: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameSummary {
    pub score: u32,
    pub level: u32,
    pub words_completed: u32,
    pub misses: u32,
}

/// Words waiting to be spawned, fed in batches by the text provider.
#[derive(Clone, Debug, Default)]
pub struct WordQueue {
    words: VecDeque<String>,
    low_water: usize,
}

impl WordQueue {
    pub fn new(low_water: usize) -> Self {
        Self {
            words: VecDeque::new(),
            low_water,
        }
    }

    /// Appends a batch, keeping only single alphabetic words (lowercased).
    pub fn push_batch<I, S>(&mut self, batch: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.words.len();
        for word in batch {
            let word = word.as_ref().trim().to_lowercase();
            if !word.is_empty() && word.chars().all(char::is_alphabetic) {
                self.words.push_back(word);
            }
        }
        self.words.len() - before
    }

    pub fn next_word(&mut self) -> String {
        self.words
            .pop_front()
            .unwrap_or_else(|| DEFAULT_WORD.to_string())
    }

    pub fn needs_refill(&self) -> bool {
        self.words.len() <= self.low_water
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct GameState {
    words: Vec<WordEntity>,
    queue: WordQueue,
    score: u32,
    lives: u32,
    level: u32,
    since_spawn_ms: f64,
    spawn_interval_ms: f64,
    input: String,
    misses: u32,
    words_completed: u32,
    next_id: u64,
    game_over: bool,
    awaiting_words: bool,
}

impl GameState {
    pub fn new(queue: WordQueue) -> Self {
        Self {
            words: Vec::new(),
            queue,
            score: 0,
            lives: STARTING_LIVES,
            level: STARTING_LEVEL,
            // First tick spawns immediately.
            since_spawn_ms: f64::INFINITY,
            spawn_interval_ms: INITIAL_SPAWN_INTERVAL_MS,
            input: String::new(),
            misses: 0,
            words_completed: 0,
            next_id: 0,
            game_over: false,
            awaiting_words: false,
        }
    }

    /// While a word batch is in flight, an empty queue delays the next spawn
    /// instead of falling back to [`DEFAULT_WORD`].
    pub fn set_awaiting_words(&mut self, awaiting: bool) {
        self.awaiting_words = awaiting;
    }

    /// Advances the simulation by `dt`: spawn, fall, then bottom collisions.
    /// A finished game ignores ticks.
    pub fn tick<R: Rng>(&mut self, dt: Duration, rng: &mut R) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.game_over {
            return events;
        }

        let dt_ms = dt.as_secs_f64() * 1000.0;
        self.since_spawn_ms += dt_ms;
        let starved = self.awaiting_words && self.queue.is_empty();
        if self.since_spawn_ms > self.spawn_interval_ms && !starved {
            events.push(self.spawn_word(rng));
            self.since_spawn_ms = 0.0;
        }

        let dt_secs = dt.as_secs_f64();
        for word in &mut self.words {
            word.y += word.speed * dt_secs;
        }

        let mut escaped = Vec::new();
        self.words.retain(|w| {
            if w.y > BOTTOM_BOUNDARY {
                escaped.push((w.id, w.text.clone()));
                false
            } else {
                true
            }
        });

        if !escaped.is_empty() {
            let lost = escaped.len() as u32;
            for (id, text) in escaped {
                events.push(GameEvent::Escaped { id, text });
            }
            self.lives = self.lives.saturating_sub(lost);
            events.push(GameEvent::LifeLost {
                remaining: self.lives,
            });
            self.refresh_target();

            if self.lives == 0 {
                self.game_over = true;
                events.push(GameEvent::GameOver { score: self.score });
            }
        }

        events
    }

    /// Feeds one printable character into the input buffer. The first active
    /// word in spawn order whose text starts with the extended buffer wins.
    pub fn type_char(&mut self, ch: char) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.game_over {
            return events;
        }

        let mut candidate = self.input.clone();
        candidate.push(ch);

        match self.words.iter().position(|w| w.text.starts_with(&candidate)) {
            Some(idx) if self.words[idx].text == candidate => {
                let word = self.words.remove(idx);
                let points = word.text.chars().count() as u32 * POINTS_PER_CHAR;
                let old_score = self.score;
                self.score += points;
                self.words_completed += 1;
                self.input.clear();
                self.clear_typed();
                events.push(GameEvent::Completed {
                    id: word.id,
                    text: word.text,
                    points,
                });

                let crossed = self.score / POINTS_PER_LEVEL - old_score / POINTS_PER_LEVEL;
                if crossed > 0 {
                    self.level += crossed;
                    events.push(GameEvent::LevelUp { level: self.level });
                }
            }
            Some(idx) => {
                self.input = candidate;
                let typed = self.input.chars().count();
                for (i, word) in self.words.iter_mut().enumerate() {
                    word.typed = if i == idx { typed } else { 0 };
                }
            }
            None => {
                self.input.clear();
                self.clear_typed();
                self.misses += 1;
                events.push(GameEvent::Miss);
            }
        }

        events
    }

    pub fn backspace(&mut self) {
        if self.game_over {
            return;
        }
        self.input.pop();
        self.refresh_target();
    }

    fn spawn_word<R: Rng>(&mut self, rng: &mut R) -> GameEvent {
        let text = self.queue.next_word();
        let id = self.next_id;
        self.next_id += 1;

        self.words.push(WordEntity {
            id,
            text: text.clone(),
            x: rng.gen_range(MIN_SPAWN_X..=MAX_SPAWN_X),
            y: SPAWN_Y,
            speed: BASE_FALL_SPEED + FALL_SPEED_PER_LEVEL * self.level as f64,
            typed: 0,
        });

        self.spawn_interval_ms =
            (self.spawn_interval_ms - SPAWN_INTERVAL_STEP_MS).max(MIN_SPAWN_INTERVAL_MS);

        GameEvent::Spawned { id, text }
    }

    /// Re-points the typed highlight at the first word matching the buffer,
    /// dropping the buffer if nothing matches any more.
    fn refresh_target(&mut self) {
        self.clear_typed();
        if self.input.is_empty() {
            return;
        }
        let typed = self.input.chars().count();
        match self.words.iter_mut().find(|w| w.text.starts_with(&self.input)) {
            Some(word) => word.typed = typed,
            None => self.input.clear(),
        }
    }

    fn clear_typed(&mut self) {
        for word in &mut self.words {
            word.typed = 0;
        }
    }

    pub fn words(&self) -> &[WordEntity] {
        &self.words
    }

    pub fn queue(&self) -> &WordQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut WordQueue {
        &mut self.queue
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    pub fn spawn_interval_ms(&self) -> f64 {
        self.spawn_interval_ms
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            score: self.score,
            level: self.level,
            words_completed: self.words_completed,
            misses: self.misses,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    fn game_with(words: &[&str]) -> GameState {
        let mut queue = WordQueue::new(0);
        queue.push_batch(words.iter().copied());
        GameState::new(queue)
    }

    fn place(game: &mut GameState, text: &str, y: f64, speed: f64) -> u64 {
        let id = game.next_id;
        game.next_id += 1;
        game.words.push(WordEntity {
            id,
            text: text.to_string(),
            x: 50.0,
            y,
            speed,
            typed: 0,
        });
        id
    }

    fn type_str(game: &mut GameState, s: &str) -> Vec<GameEvent> {
        s.chars().flat_map(|ch| game.type_char(ch)).collect()
    }

    #[test]
    fn test_first_tick_spawns_above_field() {
        let mut game = game_with(&["alpha"]);
        let events = game.tick(Duration::ZERO, &mut rng());
        assert!(matches!(&events[0], GameEvent::Spawned { text, .. } if text == "alpha"));
        let word = &game.words()[0];
        assert_eq!(word.y, SPAWN_Y);
        assert!((MIN_SPAWN_X..=MAX_SPAWN_X).contains(&word.x));
    }

    #[test]
    fn test_no_spawn_before_interval() {
        let mut game = game_with(&["one", "two"]);
        let mut rng = rng();
        game.tick(Duration::from_millis(16), &mut rng);
        let events = game.tick(Duration::from_millis(500), &mut rng);
        assert!(events.is_empty());
        assert_eq!(game.words().len(), 1);
        let events = game.tick(Duration::from_millis(1500), &mut rng);
        assert!(events.iter().any(|e| matches!(e, GameEvent::Spawned { .. })));
    }

    #[test]
    fn test_spawn_interval_floors_at_800() {
        let mut game = game_with(&[]);
        let mut rng = rng();
        for _ in 0..130 {
            game.spawn_word(&mut rng);
        }
        assert_eq!(game.spawn_interval_ms(), MIN_SPAWN_INTERVAL_MS);
        game.spawn_word(&mut rng);
        assert_eq!(game.spawn_interval_ms(), MIN_SPAWN_INTERVAL_MS);
    }

    #[test]
    fn test_spawn_interval_steps_by_ten() {
        let mut game = game_with(&[]);
        let mut rng = rng();
        game.spawn_word(&mut rng);
        game.spawn_word(&mut rng);
        assert_eq!(game.spawn_interval_ms(), 1980.0);
    }

    #[test]
    fn test_empty_queue_spawns_default_word() {
        let mut game = game_with(&[]);
        game.tick(Duration::ZERO, &mut rng());
        assert_eq!(game.words()[0].text, DEFAULT_WORD);
    }

    #[test]
    fn test_empty_queue_waits_for_pending_batch() {
        let mut game = game_with(&[]);
        let mut rng = rng();
        game.set_awaiting_words(true);
        assert!(game.tick(Duration::from_millis(500), &mut rng).is_empty());
        assert!(game.words().is_empty());

        game.queue_mut().push_batch(["orbit"]);
        game.set_awaiting_words(false);
        let events = game.tick(Duration::ZERO, &mut rng);
        assert!(matches!(&events[0], GameEvent::Spawned { text, .. } if text == "orbit"));
    }

    #[test]
    fn test_rocket_scores_sixty() {
        let mut game = game_with(&[]);
        place(&mut game, "rocket", 10.0, 1.0);
        let events = type_str(&mut game, "rocket");
        assert_eq!(game.score(), 60);
        assert!(game.words().is_empty());
        assert_eq!(game.input(), "");
        assert!(events.contains(&GameEvent::Completed {
            id: 0,
            text: "rocket".to_string(),
            points: 60
        }));
    }

    #[test]
    fn test_partial_match_extends_input() {
        let mut game = game_with(&[]);
        place(&mut game, "rocket", 10.0, 1.0);
        type_str(&mut game, "roc");
        assert_eq!(game.input(), "roc");
        assert_eq!(game.words()[0].typed, 3);
        assert_eq!(game.words()[0].split_typed(), ("roc", "ket"));
    }

    #[test]
    fn test_no_match_resets_and_counts_miss() {
        let mut game = game_with(&[]);
        place(&mut game, "rocket", 10.0, 1.0);
        type_str(&mut game, "ro");
        let events = game.type_char('z');
        assert_eq!(events, vec![GameEvent::Miss]);
        assert_eq!(game.input(), "");
        assert_eq!(game.misses(), 1);
        assert_eq!(game.words()[0].typed, 0);
    }

    #[test]
    fn test_backspace_shrinks_input() {
        let mut game = game_with(&[]);
        place(&mut game, "rocket", 10.0, 1.0);
        type_str(&mut game, "roc");
        game.backspace();
        assert_eq!(game.input(), "ro");
        assert_eq!(game.words()[0].typed, 2);
    }

    #[test]
    fn test_shared_prefix_goes_to_oldest_word() {
        let mut game = game_with(&[]);
        let first = place(&mut game, "star", 10.0, 1.0);
        place(&mut game, "start", 20.0, 1.0);
        let events = type_str(&mut game, "star");
        assert!(matches!(&events[..], [GameEvent::Completed { id, .. }] if *id == first));
        assert_eq!(game.words().len(), 1);
        assert_eq!(game.words()[0].text, "start");
    }

    #[test]
    fn test_level_up_on_hundred_points() {
        let mut game = game_with(&[]);
        place(&mut game, "galaxy", 10.0, 1.0);
        place(&mut game, "cyber", 10.0, 1.0);
        type_str(&mut game, "galaxy");
        assert_eq!(game.level(), 1);
        let events = type_str(&mut game, "cyber");
        assert_eq!(game.score(), 110);
        assert_eq!(game.level(), 2);
        assert!(events.contains(&GameEvent::LevelUp { level: 2 }));
    }

    #[test]
    fn test_words_fall_monotonically() {
        let mut game = game_with(&["drift"]);
        let mut rng = rng();
        let mut last = f64::MIN;
        for _ in 0..20 {
            game.tick(Duration::from_millis(50), &mut rng);
            if let Some(word) = game.words().first() {
                assert!(word.y >= last);
                last = word.y;
            }
        }
    }

    #[test]
    fn test_escaped_words_cost_one_life_each() {
        let mut game = game_with(&[]);
        game.since_spawn_ms = 0.0;
        place(&mut game, "one", 99.5, 10.0);
        place(&mut game, "two", 99.9, 10.0);
        place(&mut game, "three", 10.0, 10.0);
        let events = game.tick(Duration::from_millis(100), &mut rng());
        assert_eq!(game.lives(), 1);
        assert_eq!(game.words().len(), 1);
        assert!(events.contains(&GameEvent::LifeLost { remaining: 1 }));
        assert!(!game.is_over());
    }

    #[test]
    fn test_game_over_reported_once() {
        let mut game = game_with(&[]);
        game.since_spawn_ms = 0.0;
        place(&mut game, "galaxy", 50.0, 1.0);
        type_str(&mut game, "galaxy");
        for text in ["a", "b", "c"] {
            place(&mut game, text, 100.0, 10.0);
        }
        let mut rng = rng();
        let events = game.tick(Duration::from_millis(100), &mut rng);
        assert!(events.contains(&GameEvent::GameOver { score: 60 }));
        assert!(game.is_over());
        assert_eq!(game.lives(), 0);

        let later = game.tick(Duration::from_secs(5), &mut rng);
        assert!(later.is_empty());
        assert!(game.type_char('x').is_empty());
    }

    #[test]
    fn test_escape_of_target_drops_input() {
        let mut game = game_with(&[]);
        game.since_spawn_ms = 0.0;
        place(&mut game, "rocket", 99.9, 10.0);
        place(&mut game, "comet", 10.0, 10.0);
        type_str(&mut game, "ro");
        game.tick(Duration::from_millis(100), &mut rng());
        assert_eq!(game.input(), "");
    }

    #[test]
    fn test_queue_filters_batch() {
        let mut queue = WordQueue::new(2);
        let added = queue.push_batch(["Rocket", "", "two words", "x1", " neon "]);
        assert_eq!(added, 2);
        assert!(queue.needs_refill());
        assert_eq!(queue.next_word(), "rocket");
        assert_eq!(queue.next_word(), "neon");
        assert_eq!(queue.next_word(), DEFAULT_WORD);
    }
}
