use clap::Parser;
use std::path::PathBuf;

/// Argus: a maneuvering-target smoothing and gating harness.
///
/// Defines the command-line arguments of the `argus_sim` binary.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the scenario TOML file to run.
    #[arg(short, long, default_value = "assets/scenarios/default.toml")]
    pub scenario: PathBuf,

    /// Overrides the seed from the scenario file.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log every smoothing window, not just the summary.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}
