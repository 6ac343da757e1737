use bevy_ecs::prelude::*;

use crate::simulation::{Countries, Stat};

const TECH_GROWTH_ECONOMY: i32 = 60;
const TECH_DECLINE_ECONOMY: i32 = 25;

fn step_toward(current: i32, target: i32) -> i32 {
    (target - current).signum()
}

/// Yearly technology progress and slow drift of stability and military.
pub fn development_system(mut countries: ResMut<Countries>) {
    for country in countries.iter_mut() {
        let economy = country.stat(Stat::Economy);
        if economy >= TECH_GROWTH_ECONOMY {
            country.adjust_stat(Stat::Technology, 1);
        } else if economy < TECH_DECLINE_ECONOMY {
            country.adjust_stat(Stat::Technology, -1);
        }

        let stability = country.stat(Stat::Stability);
        country.adjust_stat(Stat::Stability, step_toward(stability, 50));

        let target = (economy as f64 * 0.8).round() as i32;
        let military = country.stat(Stat::Military);
        country.adjust_stat(Stat::Military, step_toward(military, target));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{Country, CountryStats, Region};

    #[test]
    fn test_rich_country_gains_technology_and_drifts() {
        let mut countries = Countries::default();
        countries.insert(Country::new(
            "AAA",
            "Alpha",
            Region::Asia,
            2,
            1,
            10.0,
            CountryStats::new(70, 40, 50, 60, 30, 40, 30, 0),
            "XXX",
        ));
        let mut world = World::new();
        world.insert_resource(countries);
        let mut schedule = Schedule::default();
        schedule.add_systems(development_system);
        schedule.run(&mut world);

        let country = world.resource::<Countries>().get(&"AAA".into()).unwrap().clone();
        assert_eq!(country.stat(Stat::Technology), 51);
        assert_eq!(country.stat(Stat::Stability), 59);
        // economy 70 pulls military toward 56
        assert_eq!(country.stat(Stat::Military), 41);
    }
}
