//! Alliances, wars and sanctions between countries.

use serde::{Deserialize, Serialize};

use crate::error::{HistoriaError, Result};
use crate::simulation::{Countries, CountryId, Stat};

pub const ALLIANCE_MIN_RELATION: i32 = 30;
pub const ALLIANCE_BONUS: i32 = 10;
pub const BREAK_ALLIANCE_PENALTY: i32 = -20;
pub const WAR_RELATION_CEILING: i32 = -60;
pub const WAR_STABILITY_COST: i32 = -2;
pub const ALLY_OUTRAGE: i32 = -20;
pub const PEACE_RELATION: i32 = -20;
pub const SANCTION_PENALTY: i32 = -10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiplomaticAction {
    AdjustRelation,
    FormAlliance,
    BreakAlliance,
    DeclareWar,
    MakePeace,
    ImposeSanction,
    LiftSanction,
}

impl DiplomaticAction {
    pub fn label(&self) -> &'static str {
        match self {
            DiplomaticAction::AdjustRelation => "relations adjusted",
            DiplomaticAction::FormAlliance => "alliance formed",
            DiplomaticAction::BreakAlliance => "alliance broken",
            DiplomaticAction::DeclareWar => "war declared",
            DiplomaticAction::MakePeace => "peace signed",
            DiplomaticAction::ImposeSanction => "sanctions imposed",
            DiplomaticAction::LiftSanction => "sanctions lifted",
        }
    }
}

impl Countries {
    pub fn form_alliance(&mut self, a: &CountryId, b: &CountryId) -> Result<i32> {
        self.ensure_pair(a, b)?;
        let ca = self.get(a)?;
        if ca.is_at_war(b) {
            return Err(HistoriaError::invalid(format!("{a} and {b} are at war")));
        }
        if ca.is_allied(b) {
            return Err(HistoriaError::invalid(format!("{a} and {b} are already allied")));
        }
        let relation = ca.relation(b);
        if relation < ALLIANCE_MIN_RELATION {
            return Err(HistoriaError::invalid(format!(
                "relations between {a} and {b} are {relation}, need {ALLIANCE_MIN_RELATION}"
            )));
        }

        self.get_mut(a)?.alliances.insert(b.clone());
        self.get_mut(b)?.alliances.insert(a.clone());
        self.adjust_relation(a, b, ALLIANCE_BONUS)
    }

    pub fn break_alliance(&mut self, a: &CountryId, b: &CountryId) -> Result<i32> {
        self.ensure_pair(a, b)?;
        if !self.get(a)?.is_allied(b) {
            return Err(HistoriaError::invalid(format!("{a} and {b} are not allied")));
        }
        self.get_mut(a)?.alliances.remove(b);
        self.get_mut(b)?.alliances.remove(a);
        self.adjust_relation(a, b, BREAK_ALLIANCE_PENALTY)
    }

    /// Returns the allies of `b` that turned against `a`.
    pub fn declare_war(&mut self, a: &CountryId, b: &CountryId) -> Result<Vec<CountryId>> {
        self.ensure_pair(a, b)?;
        let ca = self.get(a)?;
        if ca.is_allied(b) {
            return Err(HistoriaError::invalid(format!(
                "{a} must break its alliance with {b} first"
            )));
        }
        if ca.is_at_war(b) {
            return Err(HistoriaError::invalid(format!("{a} and {b} are already at war")));
        }
        let relation = ca.relation(b).min(WAR_RELATION_CEILING);

        self.get_mut(a)?.at_war.insert(b.clone());
        self.get_mut(b)?.at_war.insert(a.clone());
        self.set_relation(a, b, relation)?;
        for side in [a, b] {
            self.get_mut(side)?.adjust_stat(Stat::Stability, WAR_STABILITY_COST);
        }

        let allies: Vec<CountryId> = self
            .get(b)?
            .alliances
            .iter()
            .filter(|ally| *ally != a)
            .cloned()
            .collect();
        for ally in &allies {
            self.adjust_relation(a, ally, ALLY_OUTRAGE)?;
        }
        Ok(allies)
    }

    pub fn make_peace(&mut self, a: &CountryId, b: &CountryId) -> Result<i32> {
        self.ensure_pair(a, b)?;
        if !self.get(a)?.is_at_war(b) {
            return Err(HistoriaError::invalid(format!("{a} and {b} are not at war")));
        }
        self.get_mut(a)?.at_war.remove(b);
        self.get_mut(b)?.at_war.remove(a);
        self.set_relation(a, b, PEACE_RELATION)
    }

    pub fn impose_sanction(&mut self, issuer: &CountryId, target: &CountryId) -> Result<i32> {
        self.ensure_pair(issuer, target)?;
        if !self.get_mut(issuer)?.sanctions.insert(target.clone()) {
            return Err(HistoriaError::invalid(format!(
                "{issuer} already sanctions {target}"
            )));
        }
        self.adjust_relation(issuer, target, SANCTION_PENALTY)
    }

    pub fn lift_sanction(&mut self, issuer: &CountryId, target: &CountryId) -> Result<i32> {
        self.ensure_pair(issuer, target)?;
        if !self.get_mut(issuer)?.sanctions.remove(target) {
            return Err(HistoriaError::invalid(format!(
                "{issuer} has no sanctions on {target}"
            )));
        }
        Ok(self.relation(issuer, target))
    }
}
