use bevy_ecs::prelude::*;

use crate::simulation::{
    Countries, EventCategory, EventDraft, Timeline, WorldClock, power_score, tier_for_score,
};

/// Moves each tier one step toward the tier its power score earns.
pub fn tier_system(
    clock: Res<WorldClock>,
    mut countries: ResMut<Countries>,
    mut timeline: ResMut<Timeline>,
) {
    for country in countries.iter_mut() {
        let target = tier_for_score(power_score(country));
        if target == country.tier {
            continue;
        }
        let previous = country.tier;
        country.tier = if target < previous { previous - 1 } else { previous + 1 };
        let verb = if country.tier < previous { "rises" } else { "falls" };
        timeline.record(
            &clock,
            EventDraft::new(
                EventCategory::Politics,
                format!("{} {verb} to tier {}", country.name, country.tier),
            )
            .importance(if country.tier <= 2 { 4 } else { 2 })
            .country(&country.id),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{Country, CountryStats, Region, TimelineQuery};

    fn run_once(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(tier_system);
        schedule.run(world);
    }

    #[test]
    fn test_tier_moves_one_step_and_is_recorded() {
        let mut countries = Countries::default();
        countries.insert(Country::new(
            "AAA",
            "Alpha",
            Region::Asia,
            3,
            1_000_000,
            500.0,
            CountryStats::new(80, 80, 80, 80, 80, 80, 80, 80),
            "AAC",
        ));
        // default stats score 37.5, which is already tier 4
        countries.insert(Country::new(
            "BBB",
            "Beta",
            Region::Asia,
            4,
            1_000_000,
            50.0,
            CountryStats::default(),
            "BBC",
        ));
        let mut world = World::new();
        world.insert_resource(WorldClock::new(2030, 1));
        world.insert_resource(countries);
        world.insert_resource(Timeline::new(50));

        run_once(&mut world);
        let countries = world.resource::<Countries>();
        assert_eq!(countries.get(&"AAA".into()).unwrap().tier, 2);
        assert_eq!(countries.get(&"BBB".into()).unwrap().tier, 4);

        let events = world.resource::<Timeline>().query(&TimelineQuery::default());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].category, EventCategory::Politics);
        assert_eq!(events[0].title, "Alpha rises to tier 2");
        assert_eq!(events[0].importance, 4);

        run_once(&mut world);
        run_once(&mut world);
        assert_eq!(world.resource::<Countries>().get(&"AAA".into()).unwrap().tier, 1);
        assert_eq!(world.resource::<Timeline>().len(), 2);
    }
}
