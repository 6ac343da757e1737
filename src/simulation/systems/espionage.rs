use bevy_ecs::prelude::*;

use crate::simulation::EspionageManager;

/// Intelligence networks erode one level per month unless fed.
pub fn espionage_decay_system(mut espionage: ResMut<EspionageManager>) {
    espionage.decay();
}
