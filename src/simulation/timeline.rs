//! Structured history of everything notable that happened in the world.

use std::collections::VecDeque;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::simulation::{CountryId, WorldClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Diplomacy,
    War,
    Economy,
    Politics,
    Disaster,
    Technology,
    Espionage,
    Achievement,
    Scripted,
}

impl EventCategory {
    pub fn label(&self) -> &'static str {
        match self {
            EventCategory::Diplomacy => "Diplomacy",
            EventCategory::War => "War",
            EventCategory::Economy => "Economy",
            EventCategory::Politics => "Politics",
            EventCategory::Disaster => "Disaster",
            EventCategory::Technology => "Technology",
            EventCategory::Espionage => "Espionage",
            EventCategory::Achievement => "Achievement",
            EventCategory::Scripted => "Scripted",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: u64,
    pub year: i32,
    pub month: u8,
    pub category: EventCategory,
    pub countries: Vec<CountryId>,
    pub title: String,
    pub description: String,
    pub importance: u8,
}

impl TimelineEvent {
    pub fn involves(&self, country: &CountryId) -> bool {
        self.countries.contains(country)
    }

    pub fn sentiment(&self) -> Sentiment {
        match self.category {
            EventCategory::War | EventCategory::Disaster => Sentiment::Negative,
            EventCategory::Technology | EventCategory::Achievement => Sentiment::Positive,
            _ => Sentiment::Neutral,
        }
    }
}

/// Event about to be stamped and stored.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub category: EventCategory,
    pub countries: Vec<CountryId>,
    pub title: String,
    pub description: String,
    pub importance: u8,
}

impl EventDraft {
    pub fn new(category: EventCategory, title: impl Into<String>) -> Self {
        Self {
            category,
            countries: Vec::new(),
            title: title.into(),
            description: String::new(),
            importance: 2,
        }
    }

    pub fn country(mut self, country: &CountryId) -> Self {
        if !self.countries.contains(country) {
            self.countries.push(country.clone());
        }
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn importance(mut self, importance: u8) -> Self {
        self.importance = importance.clamp(1, 5);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelineQuery {
    pub country: Option<CountryId>,
    pub category: Option<EventCategory>,
    pub from_year: Option<i32>,
    pub to_year: Option<i32>,
    pub limit: Option<usize>,
}

impl TimelineQuery {
    fn matches(&self, event: &TimelineEvent) -> bool {
        self.country.as_ref().is_none_or(|c| event.involves(c))
            && self.category.is_none_or(|c| event.category == c)
            && self.from_year.is_none_or(|y| event.year >= y)
            && self.to_year.is_none_or(|y| event.year <= y)
    }
}

#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct Timeline {
    events: VecDeque<TimelineEvent>,
    capacity: usize,
    next_id: u64,
}

impl Timeline {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(256)),
            capacity: capacity.max(1),
            next_id: 1,
        }
    }

    pub fn record(&mut self, clock: &WorldClock, draft: EventDraft) -> &TimelineEvent {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        let event = TimelineEvent {
            id: self.next_id,
            year: clock.year,
            month: clock.month,
            category: draft.category,
            countries: draft.countries,
            title: draft.title,
            description: draft.description,
            importance: draft.importance,
        };
        self.next_id += 1;
        self.events.push_back(event);
        &self.events[self.events.len() - 1]
    }

    /// Id the next recorded event will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Events with an id greater or equal to `id`, oldest first.
    pub fn since(&self, id: u64) -> Vec<TimelineEvent> {
        self.events.iter().filter(|e| e.id >= id).cloned().collect()
    }

    /// Matching events, most recent first.
    pub fn query(&self, query: &TimelineQuery) -> Vec<TimelineEvent> {
        let limit = query.limit.unwrap_or(100);
        self.events
            .iter()
            .rev()
            .filter(|e| query.matches(e))
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.events.len() > self.capacity {
            self.events.pop_front();
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(2_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(year: i32) -> WorldClock {
        WorldClock::new(year, 6)
    }

    #[test]
    fn test_timeline_drops_oldest_at_capacity() {
        let mut timeline = Timeline::new(3);
        for i in 0..5 {
            timeline.record(
                &clock(2000 + i),
                EventDraft::new(EventCategory::Economy, format!("event {i}")),
            );
        }
        assert_eq!(timeline.len(), 3);
        let all = timeline.query(&TimelineQuery::default());
        assert_eq!(all[0].title, "event 4");
        assert_eq!(all[2].title, "event 2");
        assert_eq!(timeline.next_id(), 6);
    }

    #[test]
    fn test_query_filters_country_category_and_years() {
        let mut timeline = Timeline::new(50);
        let usa = CountryId::new("USA");
        let fra = CountryId::new("FRA");
        timeline.record(
            &clock(2025),
            EventDraft::new(EventCategory::War, "war").country(&usa).country(&fra),
        );
        timeline.record(
            &clock(2026),
            EventDraft::new(EventCategory::Economy, "boom").country(&fra),
        );
        timeline.record(
            &clock(2027),
            EventDraft::new(EventCategory::Economy, "bust").country(&usa),
        );

        let usa_events = timeline.query(&TimelineQuery {
            country: Some(usa.clone()),
            ..Default::default()
        });
        assert_eq!(usa_events.len(), 2);

        let economy_after_2026 = timeline.query(&TimelineQuery {
            category: Some(EventCategory::Economy),
            from_year: Some(2027),
            ..Default::default()
        });
        assert_eq!(economy_after_2026.len(), 1);
        assert_eq!(economy_after_2026[0].title, "bust");

        let limited = timeline.query(&TimelineQuery {
            limit: Some(1),
            ..Default::default()
        });
        assert_eq!(limited[0].title, "bust");
    }

    #[test]
    fn test_draft_importance_is_clamped() {
        let draft = EventDraft::new(EventCategory::Politics, "x").importance(9);
        assert_eq!(draft.importance, 5);
    }
}
