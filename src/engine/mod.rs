pub mod game;
pub mod heatmap;
pub mod scoring;

pub use game::{GameEvent, GameState, GameSummary, WordEntity, WordQueue};
pub use heatmap::{Heat, KeyHeatmap, KeyStat};
pub use scoring::{SessionStats, compute_stats};
