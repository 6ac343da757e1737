//! Country records: identity, stats and bilateral state.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub const STAT_MIN: i32 = 0;
pub const STAT_MAX: i32 = 100;
pub const RELATION_MIN: i32 = -100;
pub const RELATION_MAX: i32 = 100;
pub const TIER_MIN: u8 = 1;
pub const TIER_MAX: u8 = 6;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CountryId(pub String);

impl<'de> Deserialize<'de> for CountryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

impl CountryId {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CountryId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    NorthAmerica,
    SouthAmerica,
    Europe,
    MiddleEast,
    Africa,
    Asia,
    Oceania,
}

impl Region {
    pub fn label(&self) -> &'static str {
        match self {
            Region::NorthAmerica => "North America",
            Region::SouthAmerica => "South America",
            Region::Europe => "Europe",
            Region::MiddleEast => "Middle East",
            Region::Africa => "Africa",
            Region::Asia => "Asia",
            Region::Oceania => "Oceania",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Economy,
    Military,
    Technology,
    Stability,
    Influence,
    Resources,
    SoftPower,
    Nuclear,
}

impl Stat {
    pub const ALL: [Stat; 8] = [
        Stat::Economy,
        Stat::Military,
        Stat::Technology,
        Stat::Stability,
        Stat::Influence,
        Stat::Resources,
        Stat::SoftPower,
        Stat::Nuclear,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Stat::Economy => "economy",
            Stat::Military => "military",
            Stat::Technology => "technology",
            Stat::Stability => "stability",
            Stat::Influence => "influence",
            Stat::Resources => "resources",
            Stat::SoftPower => "soft_power",
            Stat::Nuclear => "nuclear",
        }
    }
}

pub fn clamp_stat(value: i32) -> i32 {
    value.clamp(STAT_MIN, STAT_MAX)
}

pub fn clamp_relation(value: i32) -> i32 {
    value.clamp(RELATION_MIN, RELATION_MAX)
}

/// Core 0..100 indicators. Fields are private so every write is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryStats {
    economy: i32,
    military: i32,
    technology: i32,
    stability: i32,
    influence: i32,
    resources: i32,
    soft_power: i32,
    nuclear: i32,
}

impl CountryStats {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        economy: i32,
        military: i32,
        technology: i32,
        stability: i32,
        influence: i32,
        resources: i32,
        soft_power: i32,
        nuclear: i32,
    ) -> Self {
        Self {
            economy: clamp_stat(economy),
            military: clamp_stat(military),
            technology: clamp_stat(technology),
            stability: clamp_stat(stability),
            influence: clamp_stat(influence),
            resources: clamp_stat(resources),
            soft_power: clamp_stat(soft_power),
            nuclear: clamp_stat(nuclear),
        }
    }

    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Economy => self.economy,
            Stat::Military => self.military,
            Stat::Technology => self.technology,
            Stat::Stability => self.stability,
            Stat::Influence => self.influence,
            Stat::Resources => self.resources,
            Stat::SoftPower => self.soft_power,
            Stat::Nuclear => self.nuclear,
        }
    }

    pub fn set(&mut self, stat: Stat, value: i32) {
        let value = clamp_stat(value);
        match stat {
            Stat::Economy => self.economy = value,
            Stat::Military => self.military = value,
            Stat::Technology => self.technology = value,
            Stat::Stability => self.stability = value,
            Stat::Influence => self.influence = value,
            Stat::Resources => self.resources = value,
            Stat::SoftPower => self.soft_power = value,
            Stat::Nuclear => self.nuclear = value,
        }
    }

    /// Applies `delta` and returns the clamped result.
    pub fn adjust(&mut self, stat: Stat, delta: i32) -> i32 {
        self.set(stat, self.get(stat).saturating_add(delta));
        self.get(stat)
    }

    /// Incoming data may have skipped the constructor.
    pub fn normalized(self) -> Self {
        Self::new(
            self.economy,
            self.military,
            self.technology,
            self.stability,
            self.influence,
            self.resources,
            self.soft_power,
            self.nuclear,
        )
    }
}

impl Default for CountryStats {
    fn default() -> Self {
        Self::new(50, 30, 40, 50, 30, 40, 30, 0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
    pub region: Region,
    pub tier: u8,
    pub population: u64,
    pub gdp: f64,
    pub stats: CountryStats,
    pub currency: String,
    #[serde(default)]
    pub relations: BTreeMap<CountryId, i32>,
    #[serde(default)]
    pub alliances: BTreeSet<CountryId>,
    #[serde(default)]
    pub at_war: BTreeSet<CountryId>,
    /// Countries this country currently sanctions.
    #[serde(default)]
    pub sanctions: BTreeSet<CountryId>,
}

impl Country {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        region: Region,
        tier: u8,
        population: u64,
        gdp: f64,
        stats: CountryStats,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            id: CountryId::new(id),
            name: name.into(),
            region,
            tier: tier.clamp(TIER_MIN, TIER_MAX),
            population,
            gdp: gdp.max(0.0),
            stats,
            currency: currency.into(),
            relations: BTreeMap::new(),
            alliances: BTreeSet::new(),
            at_war: BTreeSet::new(),
            sanctions: BTreeSet::new(),
        }
    }

    pub fn stat(&self, stat: Stat) -> i32 {
        self.stats.get(stat)
    }

    pub fn adjust_stat(&mut self, stat: Stat, delta: i32) -> i32 {
        self.stats.adjust(stat, delta)
    }

    pub fn relation(&self, other: &CountryId) -> i32 {
        self.relations.get(other).copied().unwrap_or(0)
    }

    /// One-sided write; `Countries` keeps both sides in step.
    pub(crate) fn write_relation(&mut self, other: &CountryId, value: i32) {
        self.relations.insert(other.clone(), clamp_relation(value));
    }

    pub fn is_allied(&self, other: &CountryId) -> bool {
        self.alliances.contains(other)
    }

    pub fn is_at_war(&self, other: &CountryId) -> bool {
        self.at_war.contains(other)
    }

    pub fn sanctions_against(&self, other: &CountryId) -> bool {
        self.sanctions.contains(other)
    }

    pub fn war_count(&self) -> i32 {
        self.at_war.len() as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_clamp_on_write() {
        let mut stats = CountryStats::new(120, -5, 50, 50, 50, 50, 50, 0);
        assert_eq!(stats.get(Stat::Economy), 100);
        assert_eq!(stats.get(Stat::Military), 0);

        assert_eq!(stats.adjust(Stat::Stability, 70), 100);
        assert_eq!(stats.adjust(Stat::Stability, -250), 0);
        assert_eq!(stats.adjust(Stat::Nuclear, i32::MAX), 100);
    }

    #[test]
    fn test_country_id_normalizes_case() {
        assert_eq!(CountryId::new(" usa "), CountryId::new("USA"));
        assert_eq!(CountryId::from("fra").as_str(), "FRA");
        let parsed: CountryId = serde_json::from_str("\"deu\"").unwrap();
        assert_eq!(parsed.as_str(), "DEU");
    }

    #[test]
    fn test_relation_defaults_to_neutral() {
        let mut country = Country::new(
            "AAA",
            "Testland",
            Region::Europe,
            9,
            1_000,
            -3.0,
            CountryStats::default(),
            "TST",
        );
        assert_eq!(country.tier, TIER_MAX);
        assert_eq!(country.gdp, 0.0);
        assert_eq!(country.relation(&CountryId::new("BBB")), 0);

        country.write_relation(&CountryId::new("BBB"), 400);
        assert_eq!(country.relation(&CountryId::new("BBB")), RELATION_MAX);
    }
}
