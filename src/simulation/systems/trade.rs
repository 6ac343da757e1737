use bevy_ecs::prelude::*;

use crate::simulation::{Countries, TradeLedger, WorldBlocs};

pub fn trade_system(
    countries: Res<Countries>,
    blocs: Res<WorldBlocs>,
    mut ledger: ResMut<TradeLedger>,
) {
    ledger.recompute(&countries, &blocs);
}
