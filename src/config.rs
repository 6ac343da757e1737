//! Command-line configuration for the Historia Lite server.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::simulation::SimulationConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "historia-lite", about = "Turn-based geopolitical simulation served over HTTP")]
pub struct ServerConfig {
    /// Address the HTTP API listens on
    #[arg(long, default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Directory holding save slots
    #[arg(long, default_value = "saves")]
    pub save_dir: PathBuf,

    /// Directory searched for custom scenario files (`<id>.json`)
    #[arg(long, default_value = "scenarios")]
    pub scenarios_dir: PathBuf,

    /// Scenario loaded at startup
    #[arg(long, default_value = "modern_2025")]
    pub scenario: String,

    /// Player country code; defaults to the scenario's suggestion
    #[arg(long)]
    pub player: Option<String>,

    /// Seed for every random roll in the simulation
    #[arg(long, default_value_t = 1_789)]
    pub seed: u64,

    /// Monthly probability of a random event per country
    #[arg(long, default_value_t = 0.04)]
    pub event_chance: f64,

    /// Maximum number of timeline entries kept in memory
    #[arg(long, default_value_t = 2_000)]
    pub timeline_capacity: usize,

    /// Advance one month automatically every N milliseconds
    #[arg(long)]
    pub tick_interval_ms: Option<u64>,
}

impl ServerConfig {
    pub fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            seed: self.seed,
            event_chance: self.event_chance.clamp(0.0, 1.0),
            timeline_capacity: self.timeline_capacity.max(1),
            save_dir: self.save_dir.clone(),
            scenarios_dir: self.scenarios_dir.clone(),
        }
    }

    pub fn tick_interval(&self) -> Option<Duration> {
        self.tick_interval_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}
