//! Headless mode for automated runs
//!
//! Runs a wand scenario without any graphical output, suitable for balance
//! checks and regression tests.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- --scenario scenario.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "wand": "apprentice",
//!   "max_duration_secs": 30,
//!   "random_seed": 42,
//!   "enemies": [{"name": "slime", "max_health": 30, "speed": 2.0}],
//!   "obstacles": [{"center": [4.0, 0.0], "radius": 1.0}]
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::ScenarioConfig;
pub use runner::{build_scenario_app, run_scenario, ScenarioResult};
