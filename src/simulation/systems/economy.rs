//! Monthly GDP growth and the quarterly cost of war.

use bevy_ecs::prelude::*;

use crate::simulation::{Countries, Country, Stat, WorldClock};

/// Annualized growth for one country.
pub fn growth_rate(country: &Country, sanctions_received: i32) -> f64 {
    0.02 + f64::from(country.stat(Stat::Economy) - 50) * 0.0004
        + f64::from(country.stat(Stat::Stability) - 50) * 0.0002
        - 0.01 * f64::from(country.war_count())
        - 0.005 * f64::from(sanctions_received)
}

pub fn economy_system(clock: Res<WorldClock>, mut countries: ResMut<Countries>) {
    let sanctions: Vec<i32> = countries
        .iter()
        .map(|c| countries.sanctions_received(&c.id))
        .collect();
    let quarter = clock.is_quarter_end();

    for (country, received) in countries.iter_mut().zip(sanctions) {
        let rate = growth_rate(country, received);
        country.gdp = (country.gdp * (1.0 + rate / 12.0)).max(0.0);

        if quarter {
            let wars = country.war_count();
            if wars > 0 {
                country.adjust_stat(Stat::Economy, -wars);
                country.adjust_stat(Stat::Stability, -wars);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{CountryId, CountryStats, Region};

    #[test]
    fn test_growth_rate_components() {
        let mut country = Country::new(
            "AAA",
            "A",
            Region::Asia,
            3,
            1,
            100.0,
            CountryStats::new(60, 50, 50, 40, 50, 50, 50, 0),
            "X",
        );
        // 0.02 + 0.004 - 0.002
        assert!((growth_rate(&country, 0) - 0.022).abs() < 1e-12);
        country.at_war.insert(CountryId::new("BBB"));
        assert!((growth_rate(&country, 2) - 0.002).abs() < 1e-12);
    }

    fn run_in_month(month: u8) -> Countries {
        let mut countries = Countries::default();
        for code in ["AAA", "BBB"] {
            countries.insert(Country::new(
                code,
                code,
                Region::Europe,
                3,
                1,
                100.0,
                CountryStats::default(),
                "X",
            ));
        }
        countries.get_mut(&"AAA".into()).unwrap().at_war.insert(CountryId::new("BBB"));
        countries.get_mut(&"BBB".into()).unwrap().at_war.insert(CountryId::new("AAA"));

        let mut world = World::new();
        world.insert_resource(WorldClock::new(2025, month));
        world.insert_resource(countries);
        let mut schedule = Schedule::default();
        schedule.add_systems(economy_system);
        schedule.run(&mut world);
        world.remove_resource::<Countries>().unwrap()
    }

    #[test]
    fn test_war_costs_economy_and_stability_each_quarter() {
        let countries = run_in_month(3);
        for code in ["AAA", "BBB"] {
            let country = countries.get(&code.into()).unwrap();
            assert_eq!(country.stat(Stat::Economy), 49);
            assert_eq!(country.stat(Stat::Stability), 49);
            // 1% a year while at war
            assert!((country.gdp - 100.0 * (1.0 + 0.01 / 12.0)).abs() < 1e-9);
        }

        let countries = run_in_month(2);
        let country = countries.get(&"AAA".into()).unwrap();
        assert_eq!(country.stat(Stat::Economy), 50);
        assert_eq!(country.stat(Stat::Stability), 50);
    }
}
