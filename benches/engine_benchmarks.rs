use std::time::{Duration, Instant};

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use typeneon::engine::game::{GameState, WordQueue};
use typeneon::engine::heatmap::KeyHeatmap;
use typeneon::engine::scoring::compute_stats;

fn make_text(len: usize) -> Vec<char> {
    let words = ["neon", "cyber", "pixel", "rocket", "galaxy"];
    words
        .iter()
        .cycle()
        .flat_map(|w| w.chars().chain(std::iter::once(' ')))
        .take(len)
        .collect()
}

fn bench_scoring(c: &mut Criterion) {
    let reference = make_text(600);
    let mut typed = reference.clone();
    // ~1 in 9 wrong
    for ch in typed.iter_mut().step_by(9) {
        *ch = 'x';
    }
    let start = Instant::now();
    let now = start + Duration::from_secs(90);

    c.bench_function("compute_stats (600 chars)", |b| {
        b.iter(|| compute_stats(black_box(&reference), black_box(&typed), Some(start), now))
    });
}

fn bench_heatmap(c: &mut Criterion) {
    let reference = make_text(500);

    c.bench_function("heatmap record 500 attempts", |b| {
        b.iter(|| {
            let mut heatmap = KeyHeatmap::new();
            for (i, &ch) in reference.iter().enumerate() {
                heatmap = heatmap.record_attempt(Some(ch), i % 7 != 0);
            }
            black_box(heatmap.weak_keys(2, 0.1))
        })
    });
}

fn bench_game_tick(c: &mut Criterion) {
    c.bench_function("arcade 1000 ticks", |b| {
        b.iter(|| {
            let mut rng = SmallRng::seed_from_u64(42);
            let mut queue = WordQueue::new(5);
            queue.push_batch(["neon", "cyber", "pixel", "rocket", "galaxy"]);
            let mut game = GameState::new(queue);
            for _ in 0..1000 {
                game.tick(black_box(Duration::from_millis(33)), &mut rng);
            }
            black_box(game.summary())
        })
    });
}

criterion_group!(benches, bench_scoring, bench_heatmap, bench_game_tick);
criterion_main!(benches);
