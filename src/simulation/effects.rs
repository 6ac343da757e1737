//! Scripted, date-triggered scenario events.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::{HistoriaError, Result};
use crate::simulation::{Countries, CountryId, DebtLedger, Stat, WorldClock};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    AdjustStat { stat: Stat, delta: i32 },
    AdjustRelation { other: CountryId, delta: i32 },
    FormAlliance { other: CountryId },
    DeclareWar { other: CountryId },
    MakePeace { other: CountryId },
    AddDebt { amount: f64 },
    ChangeGdp { percent: f64 },
}

impl Effect {
    pub fn apply(
        &self,
        country: &CountryId,
        countries: &mut Countries,
        debts: &mut DebtLedger,
    ) -> Result<()> {
        match self {
            Effect::AdjustStat { stat, delta } => {
                countries.get_mut(country)?.adjust_stat(*stat, *delta);
            }
            Effect::AdjustRelation { other, delta } => {
                countries.adjust_relation(country, other, *delta)?;
            }
            Effect::FormAlliance { other } => {
                // Scripted alliances skip the relation requirement.
                countries.ensure_pair(country, other)?;
                if countries.get(country)?.is_at_war(other) {
                    return Err(HistoriaError::invalid(format!("{country} and {other} are at war")));
                }
                countries.get_mut(country)?.alliances.insert(other.clone());
                countries.get_mut(other)?.alliances.insert(country.clone());
            }
            Effect::DeclareWar { other } => {
                if countries.get(country)?.is_allied(other) {
                    countries.break_alliance(country, other)?;
                }
                countries.declare_war(country, other)?;
            }
            Effect::MakePeace { other } => {
                countries.make_peace(country, other)?;
            }
            Effect::AddDebt { amount } => {
                countries.get(country)?;
                debts.add_unchecked(country, *amount);
            }
            Effect::ChangeGdp { percent } => {
                let record = countries.get_mut(country)?;
                record.gdp = (record.gdp * (1.0 + percent / 100.0)).max(0.0);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedEvent {
    pub year: i32,
    pub month: u8,
    pub country: CountryId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub effects: Vec<Effect>,
    #[serde(default)]
    pub fired: bool,
}

impl ScriptedEvent {
    pub fn is_due(&self, clock: &WorldClock) -> bool {
        !self.fired && self.year == clock.year && self.month == clock.month
    }
}

#[derive(Debug, Clone, Default, Resource, Serialize, Deserialize)]
pub struct ScriptedEvents(pub Vec<ScriptedEvent>);

impl ScriptedEvents {
    pub fn pending(&self) -> usize {
        self.0.iter().filter(|e| !e.fired).count()
    }
}
