//! Snapshot structures exported via the API.

use serde::Serialize;

use crate::simulation::{CountryId, DiplomaticAction, RankingEntry, TimelineEvent};

#[derive(Debug, Clone, Serialize)]
pub struct WorldSummary {
    pub scenario: String,
    pub player: CountryId,
    pub year: i32,
    pub month: u8,
    pub date: String,
    pub months_elapsed: u64,
    pub countries: usize,
    pub blocs: usize,
    pub trade_agreements: usize,
    pub wars: usize,
    pub pending_scripted_events: usize,
    pub timeline_events: usize,
    pub top_powers: Vec<RankingEntry>,
}

/// What one call to `tick` or `advance` produced.
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub year: i32,
    pub month: u8,
    pub months_advanced: u32,
    pub yearly: bool,
    pub events: Vec<TimelineEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub start_year: i32,
    pub countries: Vec<CountryId>,
    pub builtin: bool,
}

/// Result of one diplomatic action, with the relation it left behind.
#[derive(Debug, Clone, Serialize)]
pub struct DiplomacyOutcome {
    pub action: DiplomaticAction,
    pub actor: CountryId,
    pub target: CountryId,
    pub relation: i32,
    /// Third parties whose relations changed as a side effect.
    pub affected: Vec<CountryId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlocTrade {
    pub bloc: String,
    pub members: Vec<CountryId>,
    pub volume: f64,
}
