use bevy_ecs::prelude::*;
use tracing::{info, warn};

use crate::simulation::{
    Countries, DebtLedger, DebtTransition, EventCategory, EventDraft, Stat, Timeline, WorldClock,
};

const DEFAULT_STABILITY_HIT: i32 = -10;
const DEFAULT_CREDITOR_ANGER: i32 = -20;

/// Monthly interest, service and default handling.
pub fn debt_system(
    clock: Res<WorldClock>,
    mut countries: ResMut<Countries>,
    mut debts: ResMut<DebtLedger>,
    mut timeline: ResMut<Timeline>,
) {
    for debt in debts.0.values_mut() {
        let Ok(country) = countries.get(&debt.country) else {
            continue;
        };
        match DebtLedger::accrue_month(debt, country) {
            DebtTransition::Steady => {}
            DebtTransition::Defaulted => {
                let ratio = debt.ratio(country);
                warn!(country = %debt.country, ratio, "sovereign default");
                if let Ok(record) = countries.get_mut(&debt.country) {
                    record.adjust_stat(Stat::Stability, DEFAULT_STABILITY_HIT);
                }
                let mut draft = EventDraft::new(
                    EventCategory::Economy,
                    format!("{} defaults on its debt", debt.country),
                )
                .description(format!("Debt reached {ratio:.0}% of GDP."))
                .importance(5)
                .country(&debt.country);
                for creditor in debt.creditors.keys() {
                    let _ =
                        countries.adjust_relation(&debt.country, creditor, DEFAULT_CREDITOR_ANGER);
                    draft = draft.country(creditor);
                }
                timeline.record(&clock, draft);
            }
            DebtTransition::Recovered => {
                info!(country = %debt.country, "exited default");
                timeline.record(
                    &clock,
                    EventDraft::new(
                        EventCategory::Economy,
                        format!("{} exits default", debt.country),
                    )
                    .importance(3)
                    .country(&debt.country),
                );
            }
        }
    }
}

/// Yearly repricing of each debt to its current rating.
pub fn debt_rating_system(countries: Res<Countries>, mut debts: ResMut<DebtLedger>) {
    for debt in debts.0.values_mut() {
        if let Ok(country) = countries.get(&debt.country) {
            debt.interest_rate = debt.rating(country).interest_rate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{Country, CountryId, CountryStats, NationalDebt, Region, TimelineQuery};

    fn country(code: &str, gdp: f64) -> Country {
        Country::new(
            code,
            code,
            Region::Europe,
            3,
            1_000,
            gdp,
            CountryStats::new(50, 50, 50, 60, 50, 50, 50, 0),
            "EUR",
        )
    }

    #[test]
    fn test_default_hits_stability_creditors_and_timeline() {
        let (a, b, c) = (CountryId::new("AAA"), CountryId::new("BBB"), CountryId::new("CCC"));
        let mut countries = Countries::default();
        for code in ["AAA", "BBB", "CCC"] {
            countries.insert(country(code, 100.0));
        }
        countries.set_relation(&a, &b, 30).unwrap();
        countries.set_relation(&a, &c, 30).unwrap();

        let mut debt = NationalDebt::new(a.clone(), 260.0);
        debt.creditors.insert(b.clone(), 60.0);
        let mut ledger = DebtLedger::default();
        ledger.insert(debt);

        let mut world = World::new();
        world.insert_resource(WorldClock::new(2026, 4));
        world.insert_resource(countries);
        world.insert_resource(ledger);
        world.insert_resource(Timeline::new(20));
        let mut schedule = Schedule::default();
        schedule.add_systems(debt_system);
        schedule.run(&mut world);

        let countries = world.resource::<Countries>();
        assert_eq!(countries.get(&a).unwrap().stat(Stat::Stability), 50);
        assert_eq!(countries.relation(&a, &b), 10);
        assert_eq!(countries.relation(&a, &c), 30);
        assert!(world.resource::<DebtLedger>().get(&a).unwrap().defaulted);

        let events = world.resource::<Timeline>().query(&TimelineQuery::default());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].category, EventCategory::Economy);
        assert_eq!(events[0].importance, 5);
        assert!(events[0].involves(&b));

        // still above the recovery line: no second default
        schedule.run(&mut world);
        assert_eq!(world.resource::<Timeline>().len(), 1);
        assert_eq!(
            world.resource::<Countries>().get(&a).unwrap().stat(Stat::Stability),
            50
        );
    }
}
