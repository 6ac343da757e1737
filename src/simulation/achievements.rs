//! Player milestones.

use std::collections::BTreeMap;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::simulation::{Country, CreditRating, Stat, WorldClock};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AchievementCondition {
    YearsElapsed { years: i32 },
    StatAtLeast { stat: Stat, value: i32 },
    TierAtMost { tier: u8 },
    AlliancesAtLeast { count: usize },
    CreditRatingAtLeast { rating: CreditRating },
    RankAtMost { rank: usize },
    TradeVolumeAtLeast { volume: f64 },
    FoundedBloc,
    NuclearPower,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub points: u32,
    pub condition: AchievementCondition,
}

/// Everything an achievement condition can look at for one country.
pub struct Standing<'a> {
    pub country: &'a Country,
    pub years_elapsed: i32,
    pub credit_rating: CreditRating,
    pub overall_rank: Option<usize>,
    pub trade_volume: f64,
    pub founded_bloc: bool,
}

impl AchievementCondition {
    pub fn is_met(&self, standing: &Standing<'_>) -> bool {
        match self {
            AchievementCondition::YearsElapsed { years } => standing.years_elapsed >= *years,
            AchievementCondition::StatAtLeast { stat, value } => {
                standing.country.stat(*stat) >= *value
            }
            AchievementCondition::TierAtMost { tier } => standing.country.tier <= *tier,
            AchievementCondition::AlliancesAtLeast { count } => {
                standing.country.alliances.len() >= *count
            }
            AchievementCondition::CreditRatingAtLeast { rating } => {
                standing.credit_rating >= *rating
            }
            AchievementCondition::RankAtMost { rank } => {
                standing.overall_rank.is_some_and(|r| r <= *rank)
            }
            AchievementCondition::TradeVolumeAtLeast { volume } => {
                standing.trade_volume >= *volume
            }
            AchievementCondition::FoundedBloc => standing.founded_bloc,
            AchievementCondition::NuclearPower => standing.country.stat(Stat::Nuclear) > 0,
        }
    }
}

fn achievement(
    id: &str,
    name: &str,
    description: &str,
    points: u32,
    condition: AchievementCondition,
) -> Achievement {
    Achievement {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        points,
        condition,
    }
}

pub fn builtin_achievements() -> Vec<Achievement> {
    use AchievementCondition::*;
    vec![
        achievement(
            "first_decade",
            "First Decade",
            "Stay in power for ten years.",
            10,
            YearsElapsed { years: 10 },
        ),
        achievement(
            "atomic_club",
            "Atomic Club",
            "Develop a nuclear capability.",
            15,
            NuclearPower,
        ),
        achievement(
            "economic_miracle",
            "Economic Miracle",
            "Reach 80 economy.",
            20,
            StatAtLeast { stat: Stat::Economy, value: 80 },
        ),
        achievement(
            "iron_fist",
            "Iron Fist",
            "Reach 80 military.",
            15,
            StatAtLeast { stat: Stat::Military, value: 80 },
        ),
        achievement(
            "silicon_valley",
            "Silicon Valley",
            "Reach 85 technology.",
            20,
            StatAtLeast { stat: Stat::Technology, value: 85 },
        ),
        achievement(
            "bedrock",
            "Bedrock",
            "Reach 85 stability.",
            15,
            StatAtLeast { stat: Stat::Stability, value: 85 },
        ),
        achievement("great_power", "Great Power", "Climb to tier 2.", 25, TierAtMost { tier: 2 }),
        achievement("superpower", "Superpower", "Climb to tier 1.", 50, TierAtMost { tier: 1 }),
        achievement(
            "network_of_friends",
            "Network of Friends",
            "Hold five alliances at once.",
            15,
            AlliancesAtLeast { count: 5 },
        ),
        achievement(
            "triple_a",
            "Triple A",
            "Earn a AAA credit rating.",
            15,
            CreditRatingAtLeast { rating: CreditRating::AAA },
        ),
        achievement(
            "top_three",
            "Podium",
            "Rank in the top three overall.",
            30,
            RankAtMost { rank: 3 },
        ),
        achievement(
            "trading_empire",
            "Trading Empire",
            "Reach 500 billion in agreement trade.",
            20,
            TradeVolumeAtLeast { volume: 500.0 },
        ),
        achievement("architect", "Architect", "Found an economic bloc.", 10, FoundedBloc),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unlock {
    pub year: i32,
    pub month: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct AchievementStatus {
    pub id: String,
    pub name: String,
    pub description: String,
    pub points: u32,
    pub unlocked: Option<Unlock>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AchievementSummary {
    pub achievements: Vec<AchievementStatus>,
    pub unlocked: usize,
    pub points: u32,
    pub max_points: u32,
}

#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct AchievementBook {
    #[serde(skip, default = "builtin_achievements")]
    definitions: Vec<Achievement>,
    unlocked: BTreeMap<String, Unlock>,
}

impl Default for AchievementBook {
    fn default() -> Self {
        Self {
            definitions: builtin_achievements(),
            unlocked: BTreeMap::new(),
        }
    }
}

impl AchievementBook {
    pub fn definitions(&self) -> &[Achievement] {
        &self.definitions
    }

    /// Unlocks every newly met achievement and returns them.
    pub fn check(&mut self, standing: &Standing<'_>, clock: &WorldClock) -> Vec<Achievement> {
        let mut fresh = Vec::new();
        for def in &self.definitions {
            if self.unlocked.contains_key(&def.id) || !def.condition.is_met(standing) {
                continue;
            }
            self.unlocked.insert(
                def.id.clone(),
                Unlock {
                    year: clock.year,
                    month: clock.month,
                },
            );
            fresh.push(def.clone());
        }
        fresh
    }

    pub fn summary(&self) -> AchievementSummary {
        let achievements: Vec<AchievementStatus> = self
            .definitions
            .iter()
            .map(|def| AchievementStatus {
                id: def.id.clone(),
                name: def.name.clone(),
                description: def.description.clone(),
                points: def.points,
                unlocked: self.unlocked.get(&def.id).copied(),
            })
            .collect();
        let points = achievements
            .iter()
            .filter(|a| a.unlocked.is_some())
            .map(|a| a.points)
            .sum();
        AchievementSummary {
            unlocked: achievements.iter().filter(|a| a.unlocked.is_some()).count(),
            max_points: self.definitions.iter().map(|d| d.points).sum(),
            points,
            achievements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{CountryStats, Region};

    fn standing_for(country: &Country) -> Standing<'_> {
        Standing {
            country,
            years_elapsed: 0,
            credit_rating: CreditRating::A,
            overall_rank: Some(7),
            trade_volume: 0.0,
            founded_bloc: false,
        }
    }

    fn country() -> Country {
        Country::new(
            "AAA",
            "Testland",
            Region::Asia,
            3,
            1_000,
            100.0,
            CountryStats::new(82, 40, 50, 50, 50, 50, 50, 0),
            "AAC",
        )
    }

    #[test]
    fn test_builtin_table() {
        let defs = builtin_achievements();
        assert_eq!(defs.len(), 13);
        let mut ids: Vec<&str> = defs.iter().map(|d| d.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 13);
    }

    #[test]
    fn test_check_unlocks_once() {
        let country = country();
        let mut book = AchievementBook::default();
        let clock = WorldClock::new(2030, 1);

        let fresh = book.check(&standing_for(&country), &clock);
        let ids: Vec<&str> = fresh.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["economic_miracle"]);
        assert!(book.check(&standing_for(&country), &clock).is_empty());

        let summary = book.summary();
        assert_eq!(summary.unlocked, 1);
        assert_eq!(summary.points, 20);
        let status = summary
            .achievements
            .iter()
            .find(|a| a.id == "economic_miracle")
            .unwrap();
        assert_eq!(status.unlocked, Some(Unlock { year: 2030, month: 1 }));
    }

    #[test]
    fn test_conditions() {
        let mut country = country();
        country.stats.set(Stat::Nuclear, 5);
        let mut standing = standing_for(&country);
        standing.overall_rank = Some(3);
        standing.credit_rating = CreditRating::AAA;
        standing.founded_bloc = true;

        assert!(AchievementCondition::NuclearPower.is_met(&standing));
        assert!(AchievementCondition::RankAtMost { rank: 3 }.is_met(&standing));
        let rated = AchievementCondition::CreditRatingAtLeast { rating: CreditRating::AA };
        assert!(rated.is_met(&standing));
        assert!(AchievementCondition::FoundedBloc.is_met(&standing));
        assert!(!AchievementCondition::TierAtMost { tier: 2 }.is_met(&standing));
        assert!(!AchievementCondition::AlliancesAtLeast { count: 1 }.is_met(&standing));
    }
}
