//! Content tables for random world events and generated leaders.

use bevy_ecs::prelude::Resource;
use rand::Rng;
use rand::rngs::SmallRng;

use crate::simulation::{EventCategory, Stat};

#[derive(Debug, Clone)]
pub struct EventTemplate {
    pub key: &'static str,
    pub title: &'static str,
    pub category: EventCategory,
    pub weight: u32,
    pub importance: u8,
    pub effects: Vec<(Stat, i32)>,
    /// Percentage change applied to GDP.
    pub gdp_percent: f64,
    /// Relation change with one randomly drawn other country.
    pub incident: Option<i32>,
}

#[derive(Debug, Clone, Resource)]
pub struct WorldContent {
    pub event_templates: Vec<EventTemplate>,
    pub leader_names: Vec<&'static str>,
}

impl WorldContent {
    pub fn total_weight(&self) -> u32 {
        self.event_templates.iter().map(|t| t.weight).sum()
    }

    /// Weighted draw over the template table.
    pub fn pick_event(&self, rng: &mut SmallRng) -> Option<&EventTemplate> {
        let total = self.total_weight();
        if total == 0 {
            return None;
        }
        let mut roll = rng.gen_range(0..total);
        for template in &self.event_templates {
            if roll < template.weight {
                return Some(template);
            }
            roll -= template.weight;
        }
        None
    }

    pub fn template(&self, key: &str) -> Option<&EventTemplate> {
        self.event_templates.iter().find(|t| t.key == key)
    }
}

impl Default for WorldContent {
    fn default() -> Self {
        use Stat::*;

        let event_templates = vec![
            EventTemplate {
                key: "economic_boom",
                title: "Economic boom",
                category: EventCategory::Economy,
                weight: 14,
                importance: 2,
                effects: vec![(Economy, 3), (Stability, 1)],
                gdp_percent: 1.5,
                incident: None,
            },
            EventTemplate {
                key: "recession",
                title: "Recession",
                category: EventCategory::Economy,
                weight: 14,
                importance: 3,
                effects: vec![(Economy, -3), (Stability, -2)],
                gdp_percent: -2.0,
                incident: None,
            },
            EventTemplate {
                key: "protests",
                title: "Mass protests",
                category: EventCategory::Politics,
                weight: 14,
                importance: 2,
                effects: vec![(Stability, -4), (SoftPower, -1)],
                gdp_percent: 0.0,
                incident: None,
            },
            EventTemplate {
                key: "tech_breakthrough",
                title: "Technological breakthrough",
                category: EventCategory::Technology,
                weight: 10,
                importance: 3,
                effects: vec![(Technology, 3), (Economy, 1)],
                gdp_percent: 0.5,
                incident: None,
            },
            EventTemplate {
                key: "natural_disaster",
                title: "Natural disaster",
                category: EventCategory::Disaster,
                weight: 10,
                importance: 3,
                effects: vec![(Economy, -2), (Stability, -3), (Resources, -2)],
                gdp_percent: -1.0,
                incident: None,
            },
            EventTemplate {
                key: "diplomatic_incident",
                title: "Diplomatic incident",
                category: EventCategory::Diplomacy,
                weight: 14,
                importance: 2,
                effects: vec![(Influence, -1)],
                gdp_percent: 0.0,
                incident: Some(-10),
            },
            EventTemplate {
                key: "resource_discovery",
                title: "Resource discovery",
                category: EventCategory::Economy,
                weight: 8,
                importance: 3,
                effects: vec![(Resources, 5), (Economy, 2)],
                gdp_percent: 1.0,
                incident: None,
            },
            EventTemplate {
                key: "corruption_scandal",
                title: "Corruption scandal",
                category: EventCategory::Politics,
                weight: 16,
                importance: 2,
                effects: vec![(Stability, -3), (SoftPower, -2), (Influence, -1)],
                gdp_percent: 0.0,
                incident: None,
            },
        ];

        let leader_names = vec![
            "Alma Reyes",
            "Bruno Keller",
            "Chen Wei",
            "Dana Okafor",
            "Elias Novak",
            "Farah Haddad",
            "Gustav Lind",
            "Hana Sato",
            "Ivan Petrov",
            "Julia Costa",
            "Kwame Mensah",
            "Leila Rahimi",
            "Marco Bellini",
            "Nadia Kowalski",
            "Oscar Lindqvist",
            "Priya Nair",
            "Rafael Ortega",
            "Sofia Andersen",
            "Tomas Hruby",
            "Yara Mansour",
        ];

        Self {
            event_templates,
            leader_names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_table_covers_every_event_kind() {
        let content = WorldContent::default();
        assert_eq!(content.event_templates.len(), 8);
        assert_eq!(content.total_weight(), 100);
        assert_eq!(
            content.template("diplomatic_incident").and_then(|t| t.incident),
            Some(-10)
        );
    }

    #[test]
    fn test_weighted_pick_reaches_every_template() {
        let content = WorldContent::default();
        let mut rng = SmallRng::seed_from_u64(11);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..2_000 {
            if let Some(template) = content.pick_event(&mut rng) {
                seen.insert(template.key);
            }
        }
        assert_eq!(seen.len(), content.event_templates.len());
    }
}
