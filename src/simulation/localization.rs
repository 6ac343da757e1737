//! Display labels and terminal colors.

use colored::Color;

use crate::simulation::{EventCategory, Sentiment};

pub fn category_color(category: EventCategory) -> Color {
    match category {
        EventCategory::Diplomacy => Color::BrightCyan,
        EventCategory::War => Color::Red,
        EventCategory::Economy => Color::BrightYellow,
        EventCategory::Politics => Color::BrightMagenta,
        EventCategory::Disaster => Color::BrightRed,
        EventCategory::Technology => Color::BrightBlue,
        EventCategory::Espionage => Color::BrightBlack,
        EventCategory::Achievement => Color::BrightGreen,
        EventCategory::Scripted => Color::White,
    }
}

pub fn sentiment_label(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "positive",
        Sentiment::Neutral => "neutral",
        Sentiment::Negative => "negative",
    }
}

pub fn sentiment_color(sentiment: Sentiment) -> Color {
    match sentiment {
        Sentiment::Positive => Color::BrightGreen,
        Sentiment::Neutral => Color::Yellow,
        Sentiment::Negative => Color::BrightRed,
    }
}

pub fn tier_label(tier: u8) -> &'static str {
    match tier {
        1 => "superpower",
        2 => "great power",
        3 => "regional power",
        4 => "middle power",
        5 => "minor power",
        _ => "micro-state",
    }
}

pub fn format_number_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
