// argus_sim/src/simulation/mod.rs

pub mod config;
pub mod core;
pub mod runner;
pub mod sensor;
pub mod target;
pub mod tracker;
