//! Random monthly world events drawn from the content table.

use bevy_ecs::prelude::*;
use rand::Rng;

use crate::simulation::{
    Countries, CountryId, EventDraft, SimulationConfig, Timeline, WorldClock, WorldContent,
};

const RANDOM_EVENT_SALT: u64 = 1;

pub fn random_event_system(
    clock: Res<WorldClock>,
    config: Res<SimulationConfig>,
    content: Res<WorldContent>,
    mut countries: ResMut<Countries>,
    mut timeline: ResMut<Timeline>,
) {
    if config.event_chance <= 0.0 {
        return;
    }
    let mut rng = config.rng_for(clock.months_elapsed, RANDOM_EVENT_SALT);
    let ids = countries.ids();

    for id in &ids {
        if !rng.gen_bool(config.event_chance.min(1.0)) {
            continue;
        }
        let Some(template) = content.pick_event(&mut rng) else {
            continue;
        };
        let Ok(country) = countries.get_mut(id) else {
            continue;
        };
        for (stat, delta) in &template.effects {
            country.adjust_stat(*stat, *delta);
        }
        if template.gdp_percent != 0.0 {
            country.gdp = (country.gdp * (1.0 + template.gdp_percent / 100.0)).max(0.0);
        }
        let name = country.name.clone();

        let mut draft = EventDraft::new(template.category, format!("{}: {}", template.title, name))
            .importance(template.importance)
            .country(id);

        if let Some(delta) = template.incident {
            let others: Vec<&CountryId> = ids.iter().filter(|other| *other != id).collect();
            if !others.is_empty() {
                let other = others[rng.gen_range(0..others.len())];
                if countries.adjust_relation(id, other, delta).is_ok() {
                    draft = draft
                        .country(other)
                        .description(format!("Relations with {other} fall by {}.", -delta));
                }
            }
        }
        timeline.record(&clock, draft);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::simulation::{Country, CountryStats, EventCategory, Region, Stat};

    fn world_with_chance(event_chance: f64) -> World {
        let defaults = WorldContent::default();
        let incident = defaults.template("diplomatic_incident").unwrap().clone();
        let content = WorldContent {
            event_templates: vec![incident],
            leader_names: defaults.leader_names.clone(),
        };

        let mut countries = Countries::default();
        for code in ["AAA", "BBB"] {
            countries.insert(Country::new(
                code,
                code,
                Region::Asia,
                3,
                1_000,
                100.0,
                CountryStats::default(),
                "X",
            ));
        }

        let mut world = World::new();
        world.insert_resource(WorldClock::new(2025, 5));
        world.insert_resource(SimulationConfig {
            seed: 3,
            event_chance,
            timeline_capacity: 20,
            save_dir: PathBuf::from("saves"),
            scenarios_dir: PathBuf::from("scenarios"),
        });
        world.insert_resource(content);
        world.insert_resource(countries);
        world.insert_resource(Timeline::new(20));
        world
    }

    fn run(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(random_event_system);
        schedule.run(world);
    }

    #[test]
    fn test_incident_sours_relations_with_another_country() {
        let mut world = world_with_chance(1.0);
        run(&mut world);

        // each of the two draws an incident against the only other country
        let countries = world.resource::<Countries>();
        assert_eq!(countries.relation(&"AAA".into(), &"BBB".into()), -20);
        assert_eq!(countries.get(&"AAA".into()).unwrap().stat(Stat::Influence), 29);

        let events = world.resource::<Timeline>().since(1);
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.category == EventCategory::Diplomacy));
        assert!(events.iter().all(|e| e.countries.len() == 2));
    }

    #[test]
    fn test_zero_chance_leaves_world_alone() {
        let mut world = world_with_chance(0.0);
        run(&mut world);
        assert_eq!(world.resource::<Timeline>().len(), 0);
        let countries = world.resource::<Countries>();
        assert_eq!(countries.relation(&"AAA".into(), &"BBB".into()), 0);
    }
}
