use bevy_ecs::prelude::*;

use crate::simulation::Countries;

const ALLY_WARMING: i32 = 2;
const WAR_HOSTILITY: i32 = -5;
const SANCTION_STRAIN: i32 = -3;

/// Yearly relation drift for every unordered pair of countries.
pub fn diplomacy_drift_system(mut countries: ResMut<Countries>) {
    let ids = countries.ids();
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            let Ok(country) = countries.get(a) else {
                continue;
            };
            let current = country.relation(b);
            let mut delta = if country.is_allied(b) {
                ALLY_WARMING
            } else if country.is_at_war(b) {
                WAR_HOSTILITY
            } else {
                -current.signum()
            };
            if country.sanctions_against(b) {
                delta += SANCTION_STRAIN;
            }
            if countries.get(b).is_ok_and(|other| other.sanctions_against(a)) {
                delta += SANCTION_STRAIN;
            }
            if delta != 0 {
                let _ = countries.set_relation(a, b, current + delta);
            }
        }
    }
}
