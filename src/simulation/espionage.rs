//! Fog of war: how much one country can see of another.
//!
//! Every observer/target pair gets an intel score (0..100) built from a
//! handful of directional terms, so the score from A to B rarely matches the
//! score from B to A. Each country field carries a sensitivity threshold; the
//! margin between score and threshold decides the confidence the observer has
//! in that field, and the confidence decides how much the value is blurred.
//! Blurring is deterministic so repeated requests never leak the true value
//! through averaging.

use std::collections::BTreeMap;

use bevy_ecs::prelude::Resource;
use rand::Rng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::error::{HistoriaError, Result};
use crate::simulation::{
    Countries, Country, CountryId, CreditRating, DebtLedger, LeaderRoster, Region, Stat,
    WorldBlocs, debt_to_gdp,
};

pub const MAX_INVESTMENT: i32 = 30;
pub const OPERATION_GAIN: i32 = 10;
pub const DISCOVERY_PENALTY: i32 = -15;
const BASE_SCORE: i32 = 10;
const ALLIANCE_BONUS: i32 = 25;
const WARM_RELATION_BONUS: i32 = 10;
const COLD_RELATION_PENALTY: i32 = -10;
const SHARED_BLOC_BONUS: i32 = 10;
const SAME_REGION_BONUS: i32 = 5;
const WARTIME_BONUS: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Hidden,
    Low,
    Medium,
    High,
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntelField {
    Name,
    Region,
    Tier,
    Population,
    Leader,
    Currency,
    Alliances,
    Wars,
    CreditRating,
    SoftPower,
    Gdp,
    Economy,
    Influence,
    Resources,
    Technology,
    Military,
    Stability,
    Debt,
    Relations,
    Nuclear,
}

impl IntelField {
    pub const ALL: [IntelField; 20] = [
        IntelField::Name,
        IntelField::Region,
        IntelField::Tier,
        IntelField::Population,
        IntelField::Leader,
        IntelField::Currency,
        IntelField::Alliances,
        IntelField::Wars,
        IntelField::CreditRating,
        IntelField::SoftPower,
        IntelField::Gdp,
        IntelField::Economy,
        IntelField::Influence,
        IntelField::Resources,
        IntelField::Technology,
        IntelField::Military,
        IntelField::Stability,
        IntelField::Debt,
        IntelField::Relations,
        IntelField::Nuclear,
    ];

    /// Minimum intel score before anything about the field is visible.
    pub fn threshold(&self) -> i32 {
        match self {
            IntelField::Name
            | IntelField::Region
            | IntelField::Tier
            | IntelField::Population
            | IntelField::Leader
            | IntelField::Currency
            | IntelField::Alliances
            | IntelField::Wars
            | IntelField::CreditRating => 0,
            IntelField::SoftPower => 10,
            IntelField::Gdp => 15,
            IntelField::Economy | IntelField::Influence => 20,
            IntelField::Resources => 30,
            IntelField::Technology => 35,
            IntelField::Military => 40,
            IntelField::Stability => 45,
            IntelField::Debt => 50,
            IntelField::Relations => 55,
            IntelField::Nuclear => 60,
        }
    }

    pub fn for_stat(stat: Stat) -> Self {
        match stat {
            Stat::Economy => IntelField::Economy,
            Stat::Military => IntelField::Military,
            Stat::Technology => IntelField::Technology,
            Stat::Stability => IntelField::Stability,
            Stat::Influence => IntelField::Influence,
            Stat::Resources => IntelField::Resources,
            Stat::SoftPower => IntelField::SoftPower,
            Stat::Nuclear => IntelField::Nuclear,
        }
    }
}

pub fn confidence_for(score: i32, field: IntelField) -> Confidence {
    let threshold = field.threshold();
    if threshold == 0 {
        return Confidence::Exact;
    }
    let delta = score - threshold;
    if delta < 0 {
        Confidence::Hidden
    } else if delta < 15 {
        Confidence::Low
    } else if delta < 30 {
        Confidence::Medium
    } else if delta < 45 {
        Confidence::High
    } else {
        Confidence::Exact
    }
}

/// A possibly blurred number as seen by an observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntelValue {
    pub confidence: Confidence,
    pub estimate: Option<f64>,
    pub low: Option<f64>,
    pub high: Option<f64>,
}

impl IntelValue {
    pub fn exact(value: f64) -> Self {
        Self {
            confidence: Confidence::Exact,
            estimate: Some(value),
            low: Some(value),
            high: Some(value),
        }
    }

    pub fn hidden() -> Self {
        Self {
            confidence: Confidence::Hidden,
            estimate: None,
            low: None,
            high: None,
        }
    }

    /// Blurs a 0..100 stat to a step size tied to the confidence.
    pub fn obscure_stat(value: i32, confidence: Confidence) -> Self {
        let step = match confidence {
            Confidence::Exact => return Self::exact(f64::from(value)),
            Confidence::Hidden => return Self::hidden(),
            Confidence::High => 5.0,
            Confidence::Medium => 10.0,
            Confidence::Low => 25.0,
        };
        let estimate = (f64::from(value) / step).round() * step;
        Self {
            confidence,
            estimate: Some(estimate),
            low: Some((estimate - step).max(0.0)),
            high: Some((estimate + step).min(100.0)),
        }
    }

    /// Blurs an open-ended amount to a number of significant digits.
    pub fn obscure_amount(value: f64, confidence: Confidence) -> Self {
        let (digits, margin) = match confidence {
            Confidence::Exact => return Self::exact(value),
            Confidence::Hidden => return Self::hidden(),
            Confidence::High => (3, 0.10),
            Confidence::Medium => (2, 0.25),
            Confidence::Low => (1, 0.50),
        };
        let estimate = round_significant(value, digits);
        Self {
            confidence,
            estimate: Some(estimate),
            low: Some(estimate * (1.0 - margin)),
            high: Some(estimate * (1.0 + margin)),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.estimate.is_some()
    }
}

pub fn round_significant(value: f64, digits: i32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let shift = digits - 1 - magnitude;
    if shift >= 0 {
        let factor = 10f64.powi(shift);
        (value * factor).round() / factor
    } else {
        let factor = 10f64.powi(-shift);
        (value / factor).round() * factor
    }
}

/// Every term that went into one intel score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntelBreakdown {
    pub base: i32,
    pub technology: i32,
    pub reach: i32,
    pub counter_intel: i32,
    pub alliance: i32,
    pub relation: i32,
    pub shared_bloc: i32,
    pub region: i32,
    pub wartime: i32,
    pub investment: i32,
    pub total: i32,
}

impl IntelBreakdown {
    fn own_country() -> Self {
        Self {
            base: 100,
            technology: 0,
            reach: 0,
            counter_intel: 0,
            alliance: 0,
            relation: 0,
            shared_bloc: 0,
            region: 0,
            wartime: 0,
            investment: 0,
            total: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldConfidence {
    pub field: IntelField,
    pub threshold: i32,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Serialize)]
pub struct IntelReport {
    pub observer: CountryId,
    pub target: CountryId,
    pub score: i32,
    pub breakdown: IntelBreakdown,
    pub fields: Vec<FieldConfidence>,
}

/// A country as one observer perceives it.
#[derive(Debug, Clone, Serialize)]
pub struct CountryView {
    pub id: CountryId,
    pub name: String,
    pub region: Region,
    pub tier: u8,
    pub population: u64,
    pub leader: Option<String>,
    pub currency: String,
    pub alliances: Vec<CountryId>,
    pub at_war: Vec<CountryId>,
    pub credit_rating: CreditRating,
    pub intel_score: i32,
    pub gdp: IntelValue,
    pub debt_to_gdp: IntelValue,
    pub stats: BTreeMap<Stat, IntelValue>,
    pub relations: Option<BTreeMap<CountryId, IntelValue>>,
}

impl CountryView {
    pub fn stat(&self, stat: Stat) -> IntelValue {
        self.stats.get(&stat).copied().unwrap_or_else(IntelValue::hidden)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OperationOutcome {
    pub success: bool,
    pub discovered: bool,
    pub chance: f64,
    pub investment: i32,
    pub intel_score: i32,
}

/// Accumulated intelligence investments, observer -> target -> level.
#[derive(Debug, Clone, Default, Resource, Serialize, Deserialize)]
pub struct EspionageManager {
    investments: BTreeMap<CountryId, BTreeMap<CountryId, i32>>,
    operations_run: u64,
}

impl EspionageManager {
    pub fn investment(&self, observer: &CountryId, target: &CountryId) -> i32 {
        self.investments
            .get(observer)
            .and_then(|targets| targets.get(target))
            .copied()
            .unwrap_or(0)
    }

    /// Adds points to a network, capped at `MAX_INVESTMENT`. Returns the new level.
    pub fn add_investment(&mut self, observer: &CountryId, target: &CountryId, points: i32) -> i32 {
        let level = self
            .investments
            .entry(observer.clone())
            .or_default()
            .entry(target.clone())
            .or_insert(0);
        *level = (*level + points).clamp(0, MAX_INVESTMENT);
        *level
    }

    /// Monthly erosion of every network.
    pub fn decay(&mut self) {
        for targets in self.investments.values_mut() {
            for level in targets.values_mut() {
                *level -= 1;
            }
            targets.retain(|_, level| *level > 0);
        }
        self.investments.retain(|_, targets| !targets.is_empty());
    }

    pub fn operations_run(&self) -> u64 {
        self.operations_run
    }

    /// Spends economy to build a network. Costs one economy point per ten intel points.
    pub fn invest(
        &mut self,
        countries: &mut Countries,
        observer: &CountryId,
        target: &CountryId,
        points: i32,
    ) -> Result<i32> {
        countries.ensure_pair(observer, target)?;
        if !(1..=MAX_INVESTMENT).contains(&points) {
            return Err(HistoriaError::invalid(format!(
                "intel investment must be between 1 and {MAX_INVESTMENT} points"
            )));
        }
        let cost = (points + 9) / 10;
        countries.get_mut(observer)?.adjust_stat(Stat::Economy, -cost);
        Ok(self.add_investment(observer, target, points))
    }

    /// Success chance of a covert operation.
    pub fn operation_chance(observer: &Country, target: &Country) -> f64 {
        let tech_edge = f64::from(
            observer.stat(Stat::Technology) - target.stat(Stat::Technology),
        );
        let reach = f64::from(7 - i32::from(observer.tier));
        (0.3 + tech_edge * 0.01 + reach * 0.03).clamp(0.05, 0.95)
    }

    pub fn run_operation(
        &mut self,
        countries: &mut Countries,
        observer: &CountryId,
        target: &CountryId,
        rng: &mut SmallRng,
    ) -> Result<(bool, bool, f64)> {
        countries.ensure_pair(observer, target)?;
        let chance = Self::operation_chance(countries.get(observer)?, countries.get(target)?);
        self.operations_run += 1;

        let success = rng.gen_bool(chance);
        let mut discovered = false;
        if success {
            self.add_investment(observer, target, OPERATION_GAIN);
        } else if rng.gen_bool(0.5) {
            discovered = true;
            countries.adjust_relation(observer, target, DISCOVERY_PENALTY)?;
        }
        Ok((success, discovered, chance))
    }
}

/// Read-only bundle of everything the intel model looks at.
pub struct IntelContext<'a> {
    pub countries: &'a Countries,
    pub blocs: &'a WorldBlocs,
    pub espionage: &'a EspionageManager,
    pub leaders: &'a LeaderRoster,
    pub debts: &'a DebtLedger,
}

impl<'a> IntelContext<'a> {
    pub fn breakdown(&self, observer: &CountryId, target: &CountryId) -> Result<IntelBreakdown> {
        let o = self.countries.get(observer)?;
        let t = self.countries.get(target)?;
        if observer == target {
            return Ok(IntelBreakdown::own_country());
        }

        let technology = ((o.stat(Stat::Technology) - t.stat(Stat::Technology)) / 3).clamp(-10, 10);
        let reach = (7 - i32::from(o.tier)) * 4;
        let counter_intel = -(t.stat(Stat::Military) + t.stat(Stat::Technology)) / 20;
        let alliance = if o.is_allied(target) { ALLIANCE_BONUS } else { 0 };
        let relation_value = o.relation(target);
        let relation = if relation_value >= 50 {
            WARM_RELATION_BONUS
        } else if relation_value <= -50 {
            COLD_RELATION_PENALTY
        } else {
            0
        };
        let shared_bloc = if self.blocs.share_bloc(observer, target) {
            SHARED_BLOC_BONUS
        } else {
            0
        };
        let region = if o.region == t.region { SAME_REGION_BONUS } else { 0 };
        let wartime = if o.is_at_war(target) { WARTIME_BONUS } else { 0 };
        let investment = self.espionage.investment(observer, target);

        let total = (BASE_SCORE
            + technology
            + reach
            + counter_intel
            + alliance
            + relation
            + shared_bloc
            + region
            + wartime
            + investment)
            .clamp(0, 100);

        Ok(IntelBreakdown {
            base: BASE_SCORE,
            technology,
            reach,
            counter_intel,
            alliance,
            relation,
            shared_bloc,
            region,
            wartime,
            investment,
            total,
        })
    }

    pub fn score(&self, observer: &CountryId, target: &CountryId) -> Result<i32> {
        Ok(self.breakdown(observer, target)?.total)
    }

    pub fn confidence(
        &self,
        observer: &CountryId,
        target: &CountryId,
        field: IntelField,
    ) -> Result<Confidence> {
        if observer == target {
            return Ok(Confidence::Exact);
        }
        Ok(confidence_for(self.score(observer, target)?, field))
    }

    pub fn report(&self, observer: &CountryId, target: &CountryId) -> Result<IntelReport> {
        let breakdown = self.breakdown(observer, target)?;
        let own = observer == target;
        let fields = IntelField::ALL
            .iter()
            .map(|field| FieldConfidence {
                field: *field,
                threshold: field.threshold(),
                confidence: if own {
                    Confidence::Exact
                } else {
                    confidence_for(breakdown.total, *field)
                },
            })
            .collect();
        Ok(IntelReport {
            observer: observer.clone(),
            target: target.clone(),
            score: breakdown.total,
            breakdown,
            fields,
        })
    }

    pub fn view(&self, observer: &CountryId, target: &CountryId) -> Result<CountryView> {
        let country = self.countries.get(target)?;
        let score = self.score(observer, target)?;
        let own = observer == target;
        let confidence = |field: IntelField| {
            if own {
                Confidence::Exact
            } else {
                confidence_for(score, field)
            }
        };

        let stats = Stat::ALL
            .iter()
            .map(|stat| {
                let seen = confidence(IntelField::for_stat(*stat));
                (*stat, IntelValue::obscure_stat(country.stat(*stat), seen))
            })
            .collect();

        let ratio = debt_to_gdp(self.debts.total(target), country.gdp);
        let relations_confidence = confidence(IntelField::Relations);
        let relations = (relations_confidence != Confidence::Hidden).then(|| {
            country
                .relations
                .iter()
                .map(|(other, value)| {
                    (
                        other.clone(),
                        obscure_relation(*value, relations_confidence),
                    )
                })
                .collect()
        });

        Ok(CountryView {
            id: country.id.clone(),
            name: country.name.clone(),
            region: country.region,
            tier: country.tier,
            population: country.population,
            leader: self.leaders.leader_of(target).map(|l| l.name.clone()),
            currency: country.currency.clone(),
            alliances: country.alliances.iter().cloned().collect(),
            at_war: country.at_war.iter().cloned().collect(),
            credit_rating: self.debts.rating_of(country),
            intel_score: score,
            gdp: IntelValue::obscure_amount(country.gdp, confidence(IntelField::Gdp)),
            debt_to_gdp: IntelValue::obscure_amount(ratio, confidence(IntelField::Debt)),
            stats,
            relations,
        })
    }

    pub fn views(&self, observer: &CountryId) -> Result<Vec<CountryView>> {
        self.countries.get(observer)?;
        self.countries
            .iter()
            .map(|c| self.view(observer, &c.id))
            .collect()
    }
}

/// Relations live on -100..100; shift into stat space to reuse the stat buckets.
fn obscure_relation(value: i32, confidence: Confidence) -> IntelValue {
    if confidence == Confidence::Exact {
        return IntelValue::exact(f64::from(value));
    }
    let shifted = IntelValue::obscure_stat((value + 100) / 2, confidence);
    let back = |v: Option<f64>| v.map(|v| v * 2.0 - 100.0);
    IntelValue {
        confidence,
        estimate: back(shifted.estimate),
        low: back(shifted.low),
        high: back(shifted.high),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{BlocKind, CountryStats};
    use rand::SeedableRng;

    fn country(code: &str, tier: u8, region: Region, military: i32, technology: i32) -> Country {
        Country::new(
            code,
            code,
            region,
            tier,
            50_000_000,
            1_234.0,
            CountryStats::new(60, military, technology, 55, 40, 50, 45, 30),
            "CUR",
        )
    }

    struct Fixture {
        countries: Countries,
        blocs: WorldBlocs,
        espionage: EspionageManager,
        leaders: LeaderRoster,
        debts: DebtLedger,
    }

    impl Fixture {
        fn new() -> Self {
            let mut countries = Countries::default();
            countries.insert(country("BIG", 1, Region::NorthAmerica, 90, 90));
            countries.insert(country("MID", 3, Region::Europe, 50, 60));
            countries.insert(country("SML", 6, Region::Europe, 10, 20));
            Self {
                countries,
                blocs: WorldBlocs::default(),
                espionage: EspionageManager::default(),
                leaders: LeaderRoster::default(),
                debts: DebtLedger::default(),
            }
        }

        fn ctx(&self) -> IntelContext<'_> {
            IntelContext {
                countries: &self.countries,
                blocs: &self.blocs,
                espionage: &self.espionage,
                leaders: &self.leaders,
                debts: &self.debts,
            }
        }
    }

    fn id(code: &str) -> CountryId {
        CountryId::new(code)
    }

    #[test]
    fn test_score_is_asymmetric() {
        let fx = Fixture::new();
        let ctx = fx.ctx();
        // BIG -> SML: 10 + 10 (tech, capped) + 24 (reach) - 1 (counter) = 43
        assert_eq!(ctx.score(&id("BIG"), &id("SML")).unwrap(), 43);
        // SML -> BIG: 10 - 10 + 4 - 9 = -5, clamped to 0
        assert_eq!(ctx.score(&id("SML"), &id("BIG")).unwrap(), 0);
        assert_eq!(ctx.score(&id("MID"), &id("MID")).unwrap(), 100);
    }

    #[test]
    fn test_relationship_terms_raise_score() {
        let mut fx = Fixture::new();
        let before = fx.ctx().score(&id("MID"), &id("SML")).unwrap();
        // MID -> SML: 10 + 10 (tech 40/3 capped) + 16 + -1 + 5 (region) = 40
        assert_eq!(before, 40);

        fx.countries.get_mut(&id("MID")).unwrap().alliances.insert(id("SML"));
        fx.countries.get_mut(&id("SML")).unwrap().alliances.insert(id("MID"));
        fx.countries.set_relation(&id("MID"), &id("SML"), 60).unwrap();
        fx.blocs
            .create(&fx.countries, "Pact", BlocKind::FreeTrade, &id("MID"), &[id("SML")], 2025)
            .unwrap();
        fx.espionage.add_investment(&id("MID"), &id("SML"), 12);

        let breakdown = fx.ctx().breakdown(&id("MID"), &id("SML")).unwrap();
        assert_eq!(breakdown.alliance, 25);
        assert_eq!(breakdown.relation, 10);
        assert_eq!(breakdown.shared_bloc, 10);
        assert_eq!(breakdown.investment, 12);
        assert_eq!(breakdown.total, 97);
    }

    #[test]
    fn test_confidence_thresholds() {
        assert_eq!(confidence_for(0, IntelField::Population), Confidence::Exact);
        assert_eq!(confidence_for(39, IntelField::Military), Confidence::Hidden);
        assert_eq!(confidence_for(40, IntelField::Military), Confidence::Low);
        assert_eq!(confidence_for(55, IntelField::Military), Confidence::Medium);
        assert_eq!(confidence_for(70, IntelField::Military), Confidence::High);
        assert_eq!(confidence_for(85, IntelField::Military), Confidence::Exact);
        assert_eq!(confidence_for(100, IntelField::Nuclear), Confidence::High);
    }

    #[test]
    fn test_obscured_stat_range_contains_truth() {
        for value in 0..=100 {
            for confidence in [Confidence::Low, Confidence::Medium, Confidence::High] {
                let intel = IntelValue::obscure_stat(value, confidence);
                let (low, high) = (intel.low.unwrap(), intel.high.unwrap());
                assert!(low <= f64::from(value) && f64::from(value) <= high);
                assert!(low >= 0.0 && high <= 100.0);
            }
        }
        assert_eq!(IntelValue::obscure_stat(37, Confidence::Low).estimate, Some(25.0));
        assert_eq!(IntelValue::obscure_stat(37, Confidence::Medium).estimate, Some(40.0));
        assert_eq!(IntelValue::obscure_stat(37, Confidence::High).estimate, Some(35.0));
        assert!(!IntelValue::obscure_stat(37, Confidence::Hidden).is_visible());
    }

    #[test]
    fn test_obscured_amount_uses_significant_digits() {
        let intel = IntelValue::obscure_amount(27_361.0, Confidence::Medium);
        assert_eq!(intel.estimate, Some(27_000.0));
        assert_eq!(intel.low, Some(20_250.0));
        assert_eq!(intel.high, Some(33_750.0));
        assert_eq!(round_significant(0.04567, 2), 0.046);
        assert_eq!(IntelValue::obscure_amount(149.0, Confidence::Low).estimate, Some(100.0));
    }

    #[test]
    fn test_view_hides_sensitive_fields_from_weak_observer() {
        let fx = Fixture::new();
        let view = fx.ctx().view(&id("SML"), &id("BIG")).unwrap();
        assert_eq!(view.intel_score, 0);
        assert_eq!(view.population, 50_000_000);
        assert!(!view.stat(Stat::Military).is_visible());
        assert!(!view.stat(Stat::Nuclear).is_visible());
        assert!(!view.gdp.is_visible());
        assert!(view.relations.is_none());

        let own = fx.ctx().view(&id("BIG"), &id("BIG")).unwrap();
        assert_eq!(own.stat(Stat::Military), IntelValue::exact(90.0));
        assert_eq!(own.gdp.estimate, Some(1_234.0));
        assert!(own.relations.is_some());
    }

    #[test]
    fn test_invest_validates_and_costs_economy() {
        let mut fx = Fixture::new();
        assert!(fx.espionage.invest(&mut fx.countries, &id("MID"), &id("MID"), 5).is_err());
        assert!(fx.espionage.invest(&mut fx.countries, &id("MID"), &id("SML"), 0).is_err());
        assert!(fx.espionage.invest(&mut fx.countries, &id("MID"), &id("SML"), 31).is_err());

        assert_eq!(fx.espionage.invest(&mut fx.countries, &id("MID"), &id("SML"), 25).unwrap(), 25);
        assert_eq!(fx.countries.get(&id("MID")).unwrap().stat(Stat::Economy), 57);
        let capped = fx.espionage.invest(&mut fx.countries, &id("MID"), &id("SML"), 25);
        assert_eq!(capped.unwrap(), MAX_INVESTMENT);
    }

    #[test]
    fn test_decay_removes_exhausted_networks() {
        let mut manager = EspionageManager::default();
        manager.add_investment(&id("AAA"), &id("BBB"), 2);
        manager.add_investment(&id("AAA"), &id("CCC"), 1);
        manager.decay();
        assert_eq!(manager.investment(&id("AAA"), &id("BBB")), 1);
        assert_eq!(manager.investment(&id("AAA"), &id("CCC")), 0);
        manager.decay();
        assert!(manager.investments.is_empty());
    }

    #[test]
    fn test_operation_chance_bounds_and_determinism() {
        let fx = Fixture::new();
        let big = fx.countries.get(&id("BIG")).unwrap();
        let sml = fx.countries.get(&id("SML")).unwrap();
        assert_eq!(EspionageManager::operation_chance(big, sml), 0.95);
        assert_eq!(EspionageManager::operation_chance(sml, big), 0.05);

        let run = |seed: u64| {
            let mut fx = Fixture::new();
            let mut rng = SmallRng::seed_from_u64(seed);
            fx.espionage
                .run_operation(&mut fx.countries, &id("MID"), &id("SML"), &mut rng)
                .unwrap()
        };
        assert_eq!(run(7), run(7));
    }
}
