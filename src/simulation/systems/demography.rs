use bevy_ecs::prelude::*;

use crate::simulation::{Countries, Stat};

/// Yearly population change driven by stability and war.
pub fn demography_system(mut countries: ResMut<Countries>) {
    for country in countries.iter_mut() {
        let stability = country.stat(Stat::Stability) as f64;
        let rate = 0.01 + (stability - 50.0) * 0.0002 - 0.002 * country.war_count() as f64;
        country.population = (country.population as f64 * (1.0 + rate)).round().max(0.0) as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{Country, CountryStats, Region};

    #[test]
    fn test_stable_country_grows_one_percent() {
        let mut countries = Countries::default();
        countries.insert(Country::new(
            "AAA",
            "Alpha",
            Region::Europe,
            3,
            1_000_000,
            100.0,
            CountryStats::default(),
            "EUR",
        ));
        let mut world = World::new();
        world.insert_resource(countries);
        let mut schedule = Schedule::default();
        schedule.add_systems(demography_system);
        schedule.run(&mut world);

        let countries = world.resource::<Countries>();
        assert_eq!(countries.get(&"AAA".into()).unwrap().population, 1_010_000);
    }
}
