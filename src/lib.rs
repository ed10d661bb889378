// Library target for the integration tests and criterion benchmarks. The
// binary in main.rs drives the same modules through this crate.

pub mod app;
pub mod config;
pub mod engine;
pub mod event;
pub mod keyboard;
pub mod logging;
pub mod provider;
pub mod session;
pub mod ui;
