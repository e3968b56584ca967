//! wandcraft - headless wand-building simulation
//!
//! Loads a scenario, runs it to completion and prints the result as JSON.

use std::process::ExitCode;

use wandcraft::cli;
use wandcraft::headless::{run_scenario, ScenarioConfig};

fn main() -> ExitCode {
    let args = cli::parse_args();

    let mut config = match ScenarioConfig::load_from_file(&args.scenario) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(output) = args.output {
        config.output_path = Some(output.display().to_string());
    }
    if let Some(max_duration) = args.max_duration {
        config.max_duration_secs = max_duration;
    }
    if let Some(seed) = args.seed {
        config.random_seed = Some(seed);
    }
    if let Some(settings) = args.settings {
        config.settings_path = Some(settings.display().to_string());
    }

    let result = match run_scenario(&config, true) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Scenario failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&result) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize result: {}", e);
            ExitCode::FAILURE
        }
    }
}
