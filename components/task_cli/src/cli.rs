//! Command-line arguments

use clap::Parser;
use log::LevelFilter;

/// Run generator-driven tasks on the Corten event loop
#[derive(Parser, Debug)]
#[command(name = "corten-task", version, about)]
pub struct Cli {
    /// Scenario to run
    #[arg(short, long, default_value = "collect")]
    pub scenario: String,

    /// Number of suspensions in the `chain` scenario
    #[arg(long, default_value_t = 100)]
    pub steps: u16,

    /// Stop the event loop after this many turns
    #[arg(short, long)]
    pub turn_limit: Option<usize>,

    /// Log level; RUST_LOG takes precedence when set
    #[arg(long, default_value = "warn")]
    pub log_level: LevelFilter,

    /// List available scenarios and exit
    #[arg(short, long)]
    pub list: bool,
}
