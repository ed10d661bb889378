use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use typeneon::engine::game::{
    BOTTOM_BOUNDARY, DEFAULT_WORD, GameEvent, GameState, SPAWN_Y, STARTING_LIVES, WordQueue,
};

fn game_with(words: &[&str]) -> GameState {
    let mut queue = WordQueue::new(2);
    queue.push_batch(words.iter().copied());
    GameState::new(queue)
}

fn type_word(game: &mut GameState, word: &str) -> Vec<GameEvent> {
    word.chars().flat_map(|ch| game.type_char(ch)).collect()
}

#[test]
fn typed_words_score_and_level_up() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut game = game_with(&["galaxy", "rocket"]);

    game.tick(Duration::ZERO, &mut rng);
    game.tick(Duration::from_millis(2100), &mut rng);
    assert_eq!(game.words().len(), 2);

    let events = type_word(&mut game, "galaxy");
    assert!(events.contains(&GameEvent::Completed {
        id: 0,
        text: "galaxy".to_string(),
        points: 60,
    }));
    assert_eq!(game.score(), 60);
    assert_eq!(game.level(), 1);

    let events = type_word(&mut game, "rocket");
    assert_eq!(game.score(), 120);
    assert!(events.contains(&GameEvent::LevelUp { level: 2 }));
    assert!(game.words().is_empty());
    assert!(game.input().is_empty());
}

#[test]
fn wrong_letter_is_a_miss_and_resets_input() {
    let mut rng = SmallRng::seed_from_u64(2);
    let mut game = game_with(&["neon"]);
    game.tick(Duration::ZERO, &mut rng);

    assert!(type_word(&mut game, "ne").is_empty());
    assert_eq!(game.words()[0].typed, 2);

    assert_eq!(game.type_char('x'), vec![GameEvent::Miss]);
    assert_eq!(game.misses(), 1);
    assert!(game.input().is_empty());
    assert_eq!(game.words()[0].typed, 0);
}

#[test]
fn empty_queue_spawns_default_word() {
    let mut rng = SmallRng::seed_from_u64(3);
    let mut game = GameState::new(WordQueue::new(5));
    let events = game.tick(Duration::ZERO, &mut rng);
    assert_eq!(
        events,
        vec![GameEvent::Spawned {
            id: 0,
            text: DEFAULT_WORD.to_string()
        }]
    );
    assert_eq!(game.words()[0].y, SPAWN_Y);
    assert!(game.queue().needs_refill());
}

#[test]
fn unattended_game_runs_out_of_lives_once() {
    let mut rng = SmallRng::seed_from_u64(4);
    let mut game = game_with(&[]);
    let mut game_overs = 0;
    let mut lives_lost = 0;

    // 100 simulated seconds at ~30 fps
    for _ in 0..3000 {
        for event in game.tick(Duration::from_millis(33), &mut rng) {
            match event {
                GameEvent::GameOver { score } => {
                    assert_eq!(score, 0);
                    game_overs += 1;
                }
                GameEvent::LifeLost { .. } => lives_lost += 1,
                _ => {}
            }
        }
    }

    assert!(game.is_over());
    assert_eq!(game_overs, 1);
    assert!(lives_lost >= 1 && lives_lost <= STARTING_LIVES);
    assert_eq!(game.lives(), 0);
    assert!(game.words().iter().all(|w| w.y <= BOTTOM_BOUNDARY));

    // Finished games ignore input and time
    assert!(game.type_char('n').is_empty());
    assert!(game.tick(Duration::from_secs(1), &mut rng).is_empty());
    assert_eq!(game.summary().score, 0);
}

#[test]
fn words_spawned_after_level_up_fall_faster() {
    let mut rng = SmallRng::seed_from_u64(5);
    let mut game = game_with(&["abcdefghij", "orbit"]);

    game.tick(Duration::ZERO, &mut rng);
    let slow = game.words()[0].speed;
    type_word(&mut game, "abcdefghij");
    assert_eq!(game.level(), 2);

    game.tick(Duration::from_secs(3), &mut rng);
    let fast = game.words()[0].speed;
    assert!(fast > slow);
}
