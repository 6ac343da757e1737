use bevy_ecs::prelude::*;

use crate::simulation::{Countries, Stat, WorldBlocs};

/// Active blocs give their members a yearly economy bonus.
pub fn bloc_system(blocs: Res<WorldBlocs>, mut countries: ResMut<Countries>) {
    for bloc in blocs.iter().filter(|b| b.is_active()) {
        let bonus = bloc.kind.economy_bonus();
        for member in &bloc.members {
            if let Ok(country) = countries.get_mut(member) {
                country.adjust_stat(Stat::Economy, bonus);
            }
        }
    }
}
