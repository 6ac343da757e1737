use bevy_ecs::prelude::*;

use crate::simulation::{Countries, CurrencyManager};

pub fn currency_system(countries: Res<Countries>, mut currencies: ResMut<CurrencyManager>) {
    currencies.update_values(&countries);
}

/// Yearly recomputation of global reserve shares.
pub fn reserve_system(countries: Res<Countries>, mut currencies: ResMut<CurrencyManager>) {
    currencies.update_reserves(&countries);
}
