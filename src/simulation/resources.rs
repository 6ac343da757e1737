//! Shared resources and world-level data structures.

use std::collections::BTreeMap;
use std::path::PathBuf;

use bevy_ecs::prelude::Resource;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::error::{HistoriaError, Result};
use crate::simulation::{Country, CountryId, clamp_relation};

/// Every country in play, keyed by code.
#[derive(Debug, Clone, Default, Resource, Serialize, Deserialize)]
pub struct Countries(pub BTreeMap<CountryId, Country>);

impl Countries {
    pub fn insert(&mut self, country: Country) {
        self.0.insert(country.id.clone(), country);
    }

    pub fn get(&self, id: &CountryId) -> Result<&Country> {
        self.0
            .get(id)
            .ok_or_else(|| HistoriaError::CountryNotFound(id.to_string()))
    }

    pub fn get_mut(&mut self, id: &CountryId) -> Result<&mut Country> {
        self.0
            .get_mut(id)
            .ok_or_else(|| HistoriaError::CountryNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &CountryId) -> bool {
        self.0.contains_key(id)
    }

    pub fn ids(&self) -> Vec<CountryId> {
        self.0.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Country> {
        self.0.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Country> {
        self.0.values_mut()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fails unless both countries exist and differ.
    pub fn ensure_pair(&self, a: &CountryId, b: &CountryId) -> Result<()> {
        if a == b {
            return Err(HistoriaError::invalid(format!(
                "{a} cannot target itself"
            )));
        }
        self.get(a)?;
        self.get(b)?;
        Ok(())
    }

    pub fn relation(&self, a: &CountryId, b: &CountryId) -> i32 {
        self.0.get(a).map(|c| c.relation(b)).unwrap_or(0)
    }

    /// Writes both sides of a relation and returns the clamped value.
    pub fn set_relation(&mut self, a: &CountryId, b: &CountryId, value: i32) -> Result<i32> {
        self.ensure_pair(a, b)?;
        let value = clamp_relation(value);
        self.get_mut(a)?.write_relation(b, value);
        self.get_mut(b)?.write_relation(a, value);
        Ok(value)
    }

    pub fn adjust_relation(&mut self, a: &CountryId, b: &CountryId, delta: i32) -> Result<i32> {
        let current = self.relation(a, b);
        self.set_relation(a, b, current.saturating_add(delta))
    }

    /// Number of countries sanctioning `target`.
    pub fn sanctions_received(&self, target: &CountryId) -> i32 {
        self.iter()
            .filter(|c| c.sanctions_against(target))
            .count() as i32
    }
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct WorldClock {
    pub year: i32,
    pub month: u8,
    pub months_elapsed: u64,
    pub start_year: i32,
}

impl WorldClock {
    pub fn new(year: i32, month: u8) -> Self {
        Self {
            year,
            month: month.clamp(1, 12),
            months_elapsed: 0,
            start_year: year,
        }
    }

    /// Moves one month forward. Returns true when a new year begins.
    pub fn advance(&mut self) -> bool {
        self.months_elapsed += 1;
        if self.month >= 12 {
            self.month = 1;
            self.year += 1;
            true
        } else {
            self.month += 1;
            false
        }
    }

    pub fn years_elapsed(&self) -> i32 {
        (self.months_elapsed / 12) as i32
    }

    pub fn is_quarter_end(&self) -> bool {
        self.month % 3 == 0
    }

    pub fn label(&self) -> String {
        let name = MONTH_NAMES
            .get(usize::from(self.month.saturating_sub(1)))
            .copied()
            .unwrap_or("?");
        format!("{} {}", name, self.year)
    }
}

impl Default for WorldClock {
    fn default() -> Self {
        Self::new(2025, 1)
    }
}

/// Id of the first timeline event recorded during the running tick.
#[derive(Debug, Clone, Copy, Default, Resource)]
pub struct TickCursor {
    pub first_event: u64,
}

/// Scenario choice and the player's seat.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct GameSettings {
    pub scenario_id: String,
    pub player: CountryId,
}

#[derive(Debug, Clone, Resource)]
pub struct SimulationConfig {
    pub seed: u64,
    pub event_chance: f64,
    pub timeline_capacity: usize,
    pub save_dir: PathBuf,
    pub scenarios_dir: PathBuf,
}

impl SimulationConfig {
    /// Deterministic RNG for one tick; `salt` separates independent rolls.
    pub fn rng_for(&self, months_elapsed: u64, salt: u64) -> SmallRng {
        SmallRng::seed_from_u64(
            self.seed
                ^ months_elapsed
                    .wrapping_mul(131)
                    .wrapping_add(salt.wrapping_mul(59)),
        )
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 1_789,
            event_chance: 0.04,
            timeline_capacity: 2_000,
            save_dir: PathBuf::from("saves"),
            scenarios_dir: PathBuf::from("scenarios"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{CountryStats, Region};

    fn pair() -> Countries {
        let mut countries = Countries::default();
        for code in ["AAA", "BBB"] {
            countries.insert(Country::new(
                code,
                code,
                Region::Asia,
                3,
                1_000_000,
                100.0,
                CountryStats::default(),
                "AAC",
            ));
        }
        countries
    }

    #[test]
    fn test_relations_are_symmetric_and_clamped() {
        let mut countries = pair();
        let (a, b) = (CountryId::new("AAA"), CountryId::new("BBB"));

        assert_eq!(countries.adjust_relation(&a, &b, 30).unwrap(), 30);
        assert_eq!(countries.relation(&b, &a), 30);

        assert_eq!(countries.adjust_relation(&b, &a, -500).unwrap(), -100);
        assert_eq!(countries.relation(&a, &b), -100);
    }

    #[test]
    fn test_relation_with_self_is_rejected() {
        let mut countries = pair();
        let a = CountryId::new("AAA");
        assert!(matches!(
            countries.adjust_relation(&a, &a, 5),
            Err(HistoriaError::InvalidAction(_))
        ));
        assert!(matches!(
            countries.adjust_relation(&a, &CountryId::new("ZZZ"), 5),
            Err(HistoriaError::CountryNotFound(_))
        ));
    }

    #[test]
    fn test_clock_rolls_over_year() {
        let mut clock = WorldClock::new(2025, 11);
        assert!(!clock.advance());
        assert_eq!(clock.month, 12);
        assert!(clock.is_quarter_end());
        assert!(clock.advance());
        assert_eq!((clock.year, clock.month), (2026, 1));
        assert_eq!(clock.months_elapsed, 2);
        assert_eq!(clock.label(), "January 2026");
    }
}
