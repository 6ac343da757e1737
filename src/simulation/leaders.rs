//! Heads of state, their traits and succession.

use std::collections::BTreeMap;

use bevy_ecs::prelude::Resource;
use rand::Rng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::error::{HistoriaError, Result};
use crate::simulation::{Countries, CountryId, Stat};

pub const SUCCESSION_AGE: u32 = 80;
pub const SUCCESSION_POPULARITY: i32 = 10;
pub const NEW_LEADER_AGE: u32 = 55;
pub const NEW_LEADER_POPULARITY: i32 = 50;
const ARCHIVE_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderTrait {
    Charismatic,
    Militarist,
    Reformer,
    Authoritarian,
    Diplomat,
    Technocrat,
}

impl LeaderTrait {
    pub const ALL: [LeaderTrait; 6] = [
        LeaderTrait::Charismatic,
        LeaderTrait::Militarist,
        LeaderTrait::Reformer,
        LeaderTrait::Authoritarian,
        LeaderTrait::Diplomat,
        LeaderTrait::Technocrat,
    ];

    /// Stat changes applied every year the leader is in office.
    pub fn stat_effects(&self) -> &'static [(Stat, i32)] {
        match self {
            LeaderTrait::Charismatic => &[(Stat::SoftPower, 1)],
            LeaderTrait::Militarist => &[(Stat::Military, 1)],
            LeaderTrait::Reformer => &[(Stat::Economy, 1)],
            LeaderTrait::Authoritarian => &[(Stat::Stability, 1), (Stat::Influence, -1)],
            LeaderTrait::Diplomat => &[],
            LeaderTrait::Technocrat => &[(Stat::Technology, 1)],
        }
    }

    /// Relation change with every other country per year.
    pub fn relation_effect(&self) -> i32 {
        match self {
            LeaderTrait::Diplomat => 1,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leader {
    pub id: u64,
    pub name: String,
    pub country: CountryId,
    pub title: String,
    pub age: u32,
    pub years_in_power: u32,
    pub popularity: i32,
    #[serde(default)]
    pub traits: Vec<LeaderTrait>,
}

impl Leader {
    fn must_step_down(&self) -> bool {
        self.age >= SUCCESSION_AGE || self.popularity <= SUCCESSION_POPULARITY
    }
}

/// A completed handover, for the timeline.
#[derive(Debug, Clone, Serialize)]
pub struct Succession {
    pub country: CountryId,
    pub outgoing: String,
    pub incoming: String,
    pub reason: String,
}

#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct LeaderRoster {
    current: BTreeMap<CountryId, Leader>,
    #[serde(default)]
    archive: Vec<Leader>,
    next_id: u64,
}

impl Default for LeaderRoster {
    fn default() -> Self {
        Self {
            current: BTreeMap::new(),
            archive: Vec::new(),
            next_id: 1,
        }
    }
}

impl LeaderRoster {
    pub fn leader_of(&self, country: &CountryId) -> Option<&Leader> {
        self.current.get(country)
    }

    pub fn get(&self, country: &CountryId) -> Result<&Leader> {
        self.current
            .get(country)
            .ok_or_else(|| HistoriaError::LeaderNotFound(country.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Leader> {
        self.current.values()
    }

    pub fn archive(&self) -> &[Leader] {
        &self.archive
    }

    /// Former leaders of one country, most recent first.
    pub fn history_of(&self, country: &CountryId) -> Vec<&Leader> {
        self.archive
            .iter()
            .rev()
            .filter(|l| &l.country == country)
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn install(
        &mut self,
        country: &CountryId,
        name: &str,
        title: &str,
        age: u32,
        years_in_power: u32,
        popularity: i32,
        traits: Vec<LeaderTrait>,
    ) -> &Leader {
        let leader = Leader {
            id: self.next_id,
            name: name.trim().to_string(),
            country: country.clone(),
            title: title.to_string(),
            age,
            years_in_power,
            popularity: popularity.clamp(0, 100),
            traits,
        };
        self.next_id += 1;
        if let Some(previous) = self.current.insert(country.clone(), leader) {
            self.archive.push(previous);
            if self.archive.len() > ARCHIVE_LIMIT {
                self.archive.remove(0);
            }
        }
        &self.current[country]
    }

    /// Swaps in a fresh leader. Returns the outgoing leader's name.
    pub fn replace(
        &mut self,
        countries: &Countries,
        country: &CountryId,
        name: &str,
        traits: Vec<LeaderTrait>,
    ) -> Result<String> {
        countries.get(country)?;
        if name.trim().is_empty() {
            return Err(HistoriaError::invalid("leader name must not be empty"));
        }
        let mut traits = traits;
        traits.sort();
        traits.dedup();
        let (outgoing, title) = self
            .current
            .get(country)
            .map(|l| (l.name.clone(), l.title.clone()))
            .unwrap_or_else(|| (String::from("vacancy"), String::from("Leader")));
        self.install(
            country,
            name,
            &title,
            NEW_LEADER_AGE,
            0,
            NEW_LEADER_POPULARITY,
            traits,
        );
        Ok(outgoing)
    }

    /// One year in office for every leader, then forced successions.
    pub fn yearly_update(
        &mut self,
        countries: &mut Countries,
        name_pool: &[&str],
        rng: &mut SmallRng,
    ) -> Vec<Succession> {
        let ids: Vec<CountryId> = self.current.keys().cloned().collect();
        let others = countries.ids();
        let mut handovers = Vec::new();

        for id in ids {
            let Ok(country) = countries.get_mut(&id) else {
                continue;
            };
            let stability = country.stat(Stat::Stability);
            let Some(leader) = self.current.get_mut(&id) else {
                continue;
            };
            leader.age += 1;
            leader.years_in_power += 1;
            leader.popularity = (leader.popularity + (stability - 50) / 10).clamp(0, 100);

            let mut relation_delta = 0;
            for t in &leader.traits {
                for (stat, delta) in t.stat_effects() {
                    country.adjust_stat(*stat, *delta);
                }
                relation_delta += t.relation_effect();
            }
            let step_down = leader.must_step_down().then(|| {
                let reason = if leader.age >= SUCCESSION_AGE {
                    "retired"
                } else {
                    "lost public support"
                };
                (leader.name.clone(), leader.title.clone(), reason)
            });

            if relation_delta != 0 {
                for other in others.iter().filter(|o| **o != id) {
                    let _ = countries.adjust_relation(&id, other, relation_delta);
                }
            }

            if let Some((outgoing, title, reason)) = step_down {
                let incoming = pick_name(name_pool, rng, &outgoing);
                let traits = vec![LeaderTrait::ALL[rng.gen_range(0..LeaderTrait::ALL.len())]];
                self.install(
                    &id,
                    &incoming,
                    &title,
                    NEW_LEADER_AGE,
                    0,
                    NEW_LEADER_POPULARITY,
                    traits,
                );
                handovers.push(Succession {
                    country: id.clone(),
                    outgoing,
                    incoming,
                    reason: reason.to_string(),
                });
            }
        }
        handovers
    }
}

fn pick_name(pool: &[&str], rng: &mut SmallRng, avoid: &str) -> String {
    let candidates: Vec<&&str> = pool.iter().filter(|n| **n != avoid).collect();
    if candidates.is_empty() {
        return format!("{avoid} II");
    }
    candidates[rng.gen_range(0..candidates.len())].to_string()
}
