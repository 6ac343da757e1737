//! Colorized world pulse logging for quick CLI scanning.

use bevy_ecs::prelude::*;
use colored::{Color, Colorize};
use tracing::info;

use crate::simulation::{
    Countries, GameSettings, Sentiment, TickCursor, Timeline, TimelineEvent,
    WorldClock, category_color, format_number_commas, power_score, sentiment_color,
    sentiment_label, tier_label,
};

fn badge(label: &str, color: Color) -> String {
    format!("[{}]", label).color(color).to_string()
}

fn sentiment_tag(sentiment: Sentiment) -> String {
    badge(sentiment_label(sentiment), sentiment_color(sentiment))
}

fn importance_color(importance: u8) -> Color {
    match importance {
        5 => Color::BrightRed,
        4 => Color::Yellow,
        3 => Color::BrightWhite,
        _ => Color::BrightBlack,
    }
}

fn format_event_line(event: &TimelineEvent) -> String {
    let category_badge = badge(event.category.label(), category_color(event.category));
    let sentiment_badge = sentiment_tag(event.sentiment());
    let importance_badge = badge(
        &"*".repeat(event.importance as usize),
        importance_color(event.importance),
    );
    let countries = event
        .countries
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let country_badge = badge(&countries, Color::BrightBlue);
    let title = event.title.bold().to_string();

    let mut line = format!(
        "{} {} {} {} {}",
        category_badge, sentiment_badge, importance_badge, country_badge, title
    );
    if !event.description.is_empty() {
        line.push_str(&format!(" | {}", event.description.color(Color::BrightBlack)));
    }
    line
}

/// Monthly pulse: the date header and every event recorded this tick.
pub fn logging_system(
    clock: Res<WorldClock>,
    settings: Res<GameSettings>,
    countries: Res<Countries>,
    timeline: Res<Timeline>,
    cursor: Res<TickCursor>,
) {
    let header_line = format!(
        "{} {} {} {}",
        badge("World", Color::BrightWhite),
        badge(&clock.label(), Color::BrightCyan),
        badge(&format!("{} countries", countries.len()), Color::BrightBlack),
        badge(&format!("Player {}", settings.player), Color::BrightGreen),
    );

    let mut lines = vec![header_line];
    let fresh = timeline.since(cursor.first_event);
    if fresh.is_empty() {
        lines.push(
            "[Event] No new world events this month"
                .color(Color::BrightBlack)
                .to_string(),
        );
    }
    lines.extend(fresh.iter().map(format_event_line));

    info!("\n{}", lines.join("\n"));
}

/// Yearly summary with the three strongest countries.
pub fn yearly_logging_system(clock: Res<WorldClock>, countries: Res<Countries>) {
    let mut scored: Vec<_> = countries.iter().map(|c| (power_score(c), c)).collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));

    let mut lines = vec![format!(
        "{} {} {}",
        badge("Year", Color::BrightWhite),
        badge(&clock.year.to_string(), Color::BrightCyan),
        badge("Overall ranking", Color::BrightYellow),
    )];
    for (rank, (score, country)) in scored.iter().take(3).enumerate() {
        lines.push(format!(
            "{} {} {} score {:.1} | pop {} | gdp {:.0}",
            badge(&format!("#{}", rank + 1), Color::Yellow),
            country.name.bold(),
            badge(tier_label(country.tier), Color::BrightMagenta),
            score,
            format_number_commas(country.population),
            country.gdp,
        ));
    }

    info!("\n{}", lines.join("\n"));
}
