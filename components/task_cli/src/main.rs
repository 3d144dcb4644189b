//! Corten Task Runner CLI
//!
//! Entry point for the task runner. Parses CLI arguments, sets up logging
//! and delegates to the Runtime for execution.

use async_runtime::LoopConfig;
use clap::Parser as ClapParser;
use task_cli::{Cli, CliError, Runtime, Scenario};

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .parse_default_env()
        .init();

    if cli.list {
        for scenario in Scenario::ALL {
            println!("{:<14} {}", scenario.name(), scenario.description());
        }
        return;
    }

    let mut config = LoopConfig::default();
    if let Some(limit) = cli.turn_limit {
        config = config.with_turn_limit(limit);
    }
    let mut runtime = Runtime::new().with_config(config).with_steps(cli.steps);

    match runtime.run_named(&cli.scenario) {
        Ok(value) => println!("Resolved: {}", value),
        Err(CliError::Js(e)) => {
            println!("Rejected: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
