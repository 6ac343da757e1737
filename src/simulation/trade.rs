//! Bilateral trade volume and signed trade agreements.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::{HistoriaError, Result};
use crate::simulation::{Countries, CountryId, WorldBlocs};

const TRADE_SCALE: f64 = 0.05;
const BLOC_MULTIPLIER: f64 = 1.25;
const SANCTION_MULTIPLIER: f64 = 0.25;
const AGREEMENT_MULTIPLIER: f64 = 1.2;
const AGREEMENT_RELATION_BONUS: i32 = 5;

/// Annual trade between two countries, in billions.
pub fn trade_volume(
    countries: &Countries,
    blocs: &WorldBlocs,
    a: &CountryId,
    b: &CountryId,
) -> f64 {
    let (Ok(ca), Ok(cb)) = (countries.get(a), countries.get(b)) else {
        return 0.0;
    };
    if a == b || ca.is_at_war(b) {
        return 0.0;
    }

    let relation_factor = 1.0 + f64::from(ca.relation(b)) / 200.0;
    let mut volume = (ca.gdp * cb.gdp).sqrt() * TRADE_SCALE * relation_factor;
    if blocs.share_bloc(a, b) {
        volume *= BLOC_MULTIPLIER;
    }
    if ca.sanctions_against(b) || cb.sanctions_against(a) {
        volume *= SANCTION_MULTIPLIER;
    }
    volume.max(0.0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeAgreement {
    pub id: u64,
    pub parties: [CountryId; 2],
    pub signed_year: i32,
    pub volume: f64,
}

impl TradeAgreement {
    pub fn involves(&self, country: &CountryId) -> bool {
        self.parties.contains(country)
    }

    fn links(&self, a: &CountryId, b: &CountryId) -> bool {
        self.involves(a) && self.involves(b)
    }
}

#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
pub struct TradeLedger {
    agreements: Vec<TradeAgreement>,
    next_id: u64,
}

impl Default for TradeLedger {
    fn default() -> Self {
        Self {
            agreements: Vec::new(),
            next_id: 1,
        }
    }
}

impl TradeLedger {
    pub fn agreements(&self) -> &[TradeAgreement] {
        &self.agreements
    }

    pub fn sign(
        &mut self,
        countries: &mut Countries,
        blocs: &WorldBlocs,
        a: &CountryId,
        b: &CountryId,
        year: i32,
    ) -> Result<TradeAgreement> {
        countries.ensure_pair(a, b)?;
        if self.agreements.iter().any(|t| t.links(a, b)) {
            return Err(HistoriaError::invalid(format!(
                "{a} and {b} already have a trade agreement"
            )));
        }
        let ca = countries.get(a)?;
        if ca.is_at_war(b) {
            return Err(HistoriaError::invalid(format!("{a} and {b} are at war")));
        }
        if ca.relation(b) < 0 {
            return Err(HistoriaError::invalid(format!(
                "relations between {a} and {b} are too poor to trade"
            )));
        }

        countries.adjust_relation(a, b, AGREEMENT_RELATION_BONUS)?;
        let agreement = TradeAgreement {
            id: self.next_id,
            parties: [a.clone(), b.clone()],
            signed_year: year,
            volume: trade_volume(countries, blocs, a, b) * AGREEMENT_MULTIPLIER,
        };
        self.next_id += 1;
        self.agreements.push(agreement.clone());
        Ok(agreement)
    }

    pub fn country_volume(&self, country: &CountryId) -> f64 {
        self.agreements
            .iter()
            .filter(|t| t.involves(country))
            .map(|t| t.volume)
            .sum()
    }

    pub fn recompute(&mut self, countries: &Countries, blocs: &WorldBlocs) {
        for agreement in &mut self.agreements {
            let [a, b] = &agreement.parties;
            agreement.volume = trade_volume(countries, blocs, a, b) * AGREEMENT_MULTIPLIER;
        }
    }

    /// Seeds an agreement straight from scenario data.
    pub fn push_seeded(&mut self, a: CountryId, b: CountryId, year: i32) {
        self.agreements.push(TradeAgreement {
            id: self.next_id,
            parties: [a, b],
            signed_year: year,
            volume: 0.0,
        });
        self.next_id += 1;
    }
}
