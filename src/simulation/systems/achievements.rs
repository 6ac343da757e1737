use bevy_ecs::prelude::*;
use tracing::info;

use crate::simulation::{
    AchievementBook, Countries, DebtLedger, EspionageManager, EventCategory, EventDraft,
    GameSettings, IntelContext, LeaderRoster, Standing, Timeline, TradeLedger, WorldBlocs,
    WorldClock,
};

/// Yearly check of the player's achievements.
#[allow(clippy::too_many_arguments)]
pub fn achievement_system(
    clock: Res<WorldClock>,
    settings: Res<GameSettings>,
    countries: Res<Countries>,
    blocs: Res<WorldBlocs>,
    espionage: Res<EspionageManager>,
    leaders: Res<LeaderRoster>,
    debts: Res<DebtLedger>,
    trade: Res<TradeLedger>,
    mut book: ResMut<AchievementBook>,
    mut timeline: ResMut<Timeline>,
) {
    let Ok(player) = countries.get(&settings.player) else {
        return;
    };
    let ctx = IntelContext {
        countries: &countries,
        blocs: &blocs,
        espionage: &espionage,
        leaders: &leaders,
        debts: &debts,
    };
    let standing = Standing {
        country: player,
        years_elapsed: clock.years_elapsed(),
        credit_rating: debts.rating_of(player),
        overall_rank: ctx.overall_rank(&player.id),
        trade_volume: trade.country_volume(&player.id),
        founded_bloc: blocs.founded_by(&player.id),
    };

    for achievement in book.check(&standing, &clock) {
        info!(id = %achievement.id, points = achievement.points, "achievement unlocked");
        timeline.record(
            &clock,
            EventDraft::new(
                EventCategory::Achievement,
                format!("Achievement unlocked: {}", achievement.name),
            )
            .description(achievement.description.clone())
            .importance(2)
            .country(&player.id),
        );
    }
}
