// argus_sim/src/main.rs

//! Runs one scenario and prints its summary.
//!
//! From this directory: `cargo run -- --scenario assets/scenarios/climbing_speed_up.toml --seed 7`

use anyhow::Context;
use argus_sim::prelude::*;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "info,argus_sim=debug,argus_core=debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = ScenarioConfig::load(&cli.scenario)
        .with_context(|| format!("could not load {}", cli.scenario.display()))?;
    if cli.seed.is_some() {
        config.simulation.seed = cli.seed;
    }

    let mut rng = SimulationRng::from_seed_option(config.simulation.seed);
    let summary = run_scenario(&config, &mut rng)?;

    println!("{}", summary.to_toml()?);
    Ok(())
}
