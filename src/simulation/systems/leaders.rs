use bevy_ecs::prelude::*;
use tracing::info;

use crate::simulation::{
    Countries, EventCategory, EventDraft, LeaderRoster, SimulationConfig, Timeline, WorldClock,
    WorldContent,
};

const SUCCESSION_SALT: u64 = 2;

/// Ages every leader, applies trait effects and handles successions.
pub fn leader_system(
    clock: Res<WorldClock>,
    config: Res<SimulationConfig>,
    content: Res<WorldContent>,
    mut roster: ResMut<LeaderRoster>,
    mut countries: ResMut<Countries>,
    mut timeline: ResMut<Timeline>,
) {
    let mut rng = config.rng_for(clock.months_elapsed, SUCCESSION_SALT);
    let handovers = roster.yearly_update(&mut countries, &content.leader_names, &mut rng);

    for succession in handovers {
        info!(
            country = %succession.country,
            outgoing = %succession.outgoing,
            incoming = %succession.incoming,
            reason = %succession.reason,
            "leader succession"
        );
        timeline.record(
            &clock,
            EventDraft::new(
                EventCategory::Politics,
                format!("{} takes power in {}", succession.incoming, succession.country),
            )
            .description(format!("{} {}.", succession.outgoing, succession.reason))
            .importance(3)
            .country(&succession.country),
        );
    }
}
