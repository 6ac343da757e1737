use bevy_ecs::prelude::*;
use tracing::warn;

use crate::simulation::{
    Countries, DebtLedger, Effect, EventCategory, EventDraft, ScriptedEvents, Timeline, WorldClock,
};

/// Fires scenario events scheduled for the current month.
pub fn scripted_event_system(
    clock: Res<WorldClock>,
    mut scripted: ResMut<ScriptedEvents>,
    mut countries: ResMut<Countries>,
    mut debts: ResMut<DebtLedger>,
    mut timeline: ResMut<Timeline>,
) {
    for event in scripted.0.iter_mut().filter(|e| e.is_due(&clock)) {
        event.fired = true;
        let mut involved = vec![event.country.clone()];
        for effect in &event.effects {
            if let Err(err) = effect.apply(&event.country, &mut countries, &mut debts) {
                warn!(title = %event.title, ?effect, error = %err, "scripted effect skipped");
            }
            if let Effect::AdjustRelation { other, .. }
            | Effect::FormAlliance { other }
            | Effect::DeclareWar { other }
            | Effect::MakePeace { other } = effect
            {
                if !involved.contains(other) {
                    involved.push(other.clone());
                }
            }
        }

        let mut draft = EventDraft::new(EventCategory::Scripted, event.title.clone())
            .description(event.description.clone())
            .importance(4);
        for country in &involved {
            draft = draft.country(country);
        }
        timeline.record(&clock, draft);
    }
}
