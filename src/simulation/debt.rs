//! National debt, credit ratings and interest.

use std::collections::BTreeMap;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::{HistoriaError, Result};
use crate::simulation::{Countries, Country, CountryId, Stat};

/// Share of GDP spent servicing debt each year.
pub const DEBT_SERVICE_SHARE: f64 = 0.03;
pub const DEFAULT_THRESHOLD: f64 = 250.0;
pub const RECOVERY_THRESHOLD: f64 = 150.0;
const UNRATEABLE_RATIO: f64 = 999.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CreditRating {
    D,
    CCC,
    B,
    BB,
    BBB,
    A,
    AA,
    AAA,
}

impl CreditRating {
    pub fn label(&self) -> &'static str {
        match self {
            CreditRating::AAA => "AAA",
            CreditRating::AA => "AA",
            CreditRating::A => "A",
            CreditRating::BBB => "BBB",
            CreditRating::BB => "BB",
            CreditRating::B => "B",
            CreditRating::CCC => "CCC",
            CreditRating::D => "D",
        }
    }

    /// Annual borrowing cost for this grade.
    pub fn interest_rate(&self) -> f64 {
        match self {
            CreditRating::AAA => 0.02,
            CreditRating::AA => 0.025,
            CreditRating::A => 0.03,
            CreditRating::BBB => 0.04,
            CreditRating::BB => 0.055,
            CreditRating::B => 0.075,
            CreditRating::CCC => 0.11,
            CreditRating::D => 0.15,
        }
    }

    fn downgraded(self) -> Self {
        match self {
            CreditRating::AAA => CreditRating::AA,
            CreditRating::AA => CreditRating::A,
            CreditRating::A => CreditRating::BBB,
            CreditRating::BBB => CreditRating::BB,
            CreditRating::BB => CreditRating::B,
            CreditRating::B | CreditRating::CCC => CreditRating::CCC,
            CreditRating::D => CreditRating::D,
        }
    }
}

pub fn debt_to_gdp(debt: f64, gdp: f64) -> f64 {
    if gdp <= 0.0 {
        return UNRATEABLE_RATIO;
    }
    debt / gdp * 100.0
}

pub fn credit_rating(ratio: f64, stability: i32, defaulted: bool) -> CreditRating {
    if defaulted {
        return CreditRating::D;
    }
    let base = if ratio < 30.0 {
        CreditRating::AAA
    } else if ratio < 60.0 {
        CreditRating::AA
    } else if ratio < 90.0 {
        CreditRating::A
    } else if ratio < 120.0 {
        CreditRating::BBB
    } else if ratio < 150.0 {
        CreditRating::BB
    } else if ratio < 200.0 {
        CreditRating::B
    } else {
        CreditRating::CCC
    };
    if stability < 30 { base.downgraded() } else { base }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NationalDebt {
    pub country: CountryId,
    pub total: f64,
    pub interest_rate: f64,
    #[serde(default)]
    pub creditors: BTreeMap<CountryId, f64>,
    #[serde(default)]
    pub defaulted: bool,
}

impl NationalDebt {
    pub fn new(country: CountryId, total: f64) -> Self {
        Self {
            country,
            total: total.max(0.0),
            interest_rate: CreditRating::A.interest_rate(),
            creditors: BTreeMap::new(),
            defaulted: false,
        }
    }

    pub fn ratio(&self, country: &Country) -> f64 {
        debt_to_gdp(self.total, country.gdp)
    }

    pub fn rating(&self, country: &Country) -> CreditRating {
        credit_rating(
            self.ratio(country),
            country.stat(Stat::Stability),
            self.defaulted,
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DebtSummary {
    pub country: CountryId,
    pub total: f64,
    pub gdp: f64,
    pub debt_to_gdp: f64,
    pub rating: CreditRating,
    pub interest_rate: f64,
    pub defaulted: bool,
    pub creditors: BTreeMap<CountryId, f64>,
}

/// Outcome of one month of interest and service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebtTransition {
    Steady,
    Defaulted,
    Recovered,
}

#[derive(Debug, Clone, Default, Resource, Serialize, Deserialize)]
pub struct DebtLedger(pub BTreeMap<CountryId, NationalDebt>);

impl DebtLedger {
    pub fn get(&self, country: &CountryId) -> Option<&NationalDebt> {
        self.0.get(country)
    }

    fn entry(&mut self, country: &CountryId) -> &mut NationalDebt {
        self.0
            .entry(country.clone())
            .or_insert_with(|| NationalDebt::new(country.clone(), 0.0))
    }

    pub fn insert(&mut self, debt: NationalDebt) {
        self.0.insert(debt.country.clone(), debt);
    }

    pub fn total(&self, country: &CountryId) -> f64 {
        self.0.get(country).map(|d| d.total).unwrap_or(0.0)
    }

    pub fn rating_of(&self, country: &Country) -> CreditRating {
        match self.0.get(&country.id) {
            Some(debt) => debt.rating(country),
            None => credit_rating(0.0, country.stat(Stat::Stability), false),
        }
    }

    pub fn summary(&self, countries: &Countries, country: &CountryId) -> Result<DebtSummary> {
        let record = countries.get(country)?;
        let debt = self
            .0
            .get(country)
            .cloned()
            .unwrap_or_else(|| NationalDebt::new(country.clone(), 0.0));
        Ok(DebtSummary {
            country: country.clone(),
            total: debt.total,
            gdp: record.gdp,
            debt_to_gdp: debt.ratio(record),
            rating: debt.rating(record),
            interest_rate: debt.interest_rate,
            defaulted: debt.defaulted,
            creditors: debt.creditors,
        })
    }

    pub fn borrow(
        &mut self,
        countries: &Countries,
        country: &CountryId,
        amount: f64,
        creditor: Option<&CountryId>,
    ) -> Result<f64> {
        countries.get(country)?;
        if !(amount.is_finite() && amount > 0.0) {
            return Err(HistoriaError::invalid("borrowed amount must be positive"));
        }
        if let Some(creditor) = creditor {
            countries.ensure_pair(country, creditor)?;
        }
        let debt = self.entry(country);
        if debt.defaulted {
            return Err(HistoriaError::invalid(format!(
                "{country} is in default and cannot borrow"
            )));
        }
        debt.total += amount;
        if let Some(creditor) = creditor {
            *debt.creditors.entry(creditor.clone()).or_insert(0.0) += amount;
        }
        Ok(debt.total)
    }

    pub fn repay(
        &mut self,
        countries: &Countries,
        country: &CountryId,
        amount: f64,
    ) -> Result<f64> {
        countries.get(country)?;
        let Some(debt) = self.0.get_mut(country) else {
            return Err(HistoriaError::invalid(format!("{country} has no debt to repay")));
        };
        if !(amount.is_finite() && amount > 0.0) || amount > debt.total {
            return Err(HistoriaError::invalid(format!(
                "repayment must be between 0 and {:.1}",
                debt.total
            )));
        }
        let share = amount / debt.total;
        debt.total -= amount;
        for held in debt.creditors.values_mut() {
            *held -= *held * share;
        }
        debt.creditors.retain(|_, held| *held > 1e-9);
        Ok(debt.total)
    }

    /// Adds debt without checks, for scripted effects.
    pub fn add_unchecked(&mut self, country: &CountryId, amount: f64) {
        let debt = self.entry(country);
        debt.total = (debt.total + amount).max(0.0);
    }

    /// One month of interest accrual and GDP-funded service.
    pub fn accrue_month(debt: &mut NationalDebt, country: &Country) -> DebtTransition {
        let interest = debt.total * debt.interest_rate / 12.0;
        let service = country.gdp * DEBT_SERVICE_SHARE / 12.0;
        debt.total = (debt.total + interest - service).max(0.0);

        let ratio = debt.ratio(country);
        if !debt.defaulted && ratio > DEFAULT_THRESHOLD {
            debt.defaulted = true;
            DebtTransition::Defaulted
        } else if debt.defaulted && ratio < RECOVERY_THRESHOLD {
            debt.defaulted = false;
            DebtTransition::Recovered
        } else {
            DebtTransition::Steady
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{CountryStats, Region};

    fn country(code: &str, gdp: f64, stability: i32) -> Country {
        Country::new(
            code,
            code,
            Region::Europe,
            3,
            1_000,
            gdp,
            CountryStats::new(50, 50, 50, stability, 50, 50, 50, 0),
            "EUR",
        )
    }

    #[test]
    fn test_rating_thresholds() {
        assert_eq!(credit_rating(0.0, 60, false), CreditRating::AAA);
        assert_eq!(credit_rating(29.9, 60, false), CreditRating::AAA);
        assert_eq!(credit_rating(30.0, 60, false), CreditRating::AA);
        assert_eq!(credit_rating(89.0, 60, false), CreditRating::A);
        assert_eq!(credit_rating(119.9, 60, false), CreditRating::BBB);
        assert_eq!(credit_rating(120.0, 60, false), CreditRating::BB);
        assert_eq!(credit_rating(199.0, 60, false), CreditRating::B);
        assert_eq!(credit_rating(200.0, 60, false), CreditRating::CCC);
        assert_eq!(credit_rating(10.0, 60, true), CreditRating::D);
    }

    #[test]
    fn test_instability_downgrades_one_notch() {
        assert_eq!(credit_rating(10.0, 29, false), CreditRating::AA);
        assert_eq!(credit_rating(130.0, 10, false), CreditRating::B);
        assert_eq!(credit_rating(400.0, 10, false), CreditRating::CCC);
        assert_eq!(credit_rating(10.0, 30, false), CreditRating::AAA);
    }

    #[test]
    fn test_ratio_handles_zero_gdp() {
        assert_eq!(debt_to_gdp(50.0, 200.0), 25.0);
        assert_eq!(debt_to_gdp(50.0, 0.0), UNRATEABLE_RATIO);
    }

    #[test]
    fn test_borrow_and_repay_track_creditors() {
        let mut countries = Countries::default();
        countries.insert(country("AAA", 1_000.0, 60));
        countries.insert(country("BBB", 1_000.0, 60));
        let (a, b) = (CountryId::new("AAA"), CountryId::new("BBB"));
        let mut ledger = DebtLedger::default();

        ledger.borrow(&countries, &a, 100.0, None).unwrap();
        ledger.borrow(&countries, &a, 100.0, Some(&b)).unwrap();
        assert_eq!(ledger.total(&a), 200.0);

        ledger.repay(&countries, &a, 100.0).unwrap();
        let debt = ledger.get(&a).unwrap();
        assert!((debt.total - 100.0).abs() < 1e-9);
        assert!((debt.creditors[&b] - 50.0).abs() < 1e-9);

        assert!(ledger.repay(&countries, &a, 500.0).is_err());
        assert!(ledger.borrow(&countries, &a, -1.0, None).is_err());
        assert!(ledger.borrow(&countries, &a, 10.0, Some(&a)).is_err());
    }

    #[test]
    fn test_monthly_accrual_defaults_and_recovers() {
        let record = country("AAA", 100.0, 60);
        let mut debt = NationalDebt::new(record.id.clone(), 260.0);
        debt.interest_rate = 0.12;
        assert_eq!(DebtLedger::accrue_month(&mut debt, &record), DebtTransition::Defaulted);
        assert!(debt.defaulted);
        assert_eq!(debt.rating(&record), CreditRating::D);

        // 260 + 2.6 interest - 0.25 service
        assert!((debt.total - 262.35).abs() < 1e-9);

        debt.total = 100.0;
        assert_eq!(DebtLedger::accrue_month(&mut debt, &record), DebtTransition::Recovered);
        assert!(!debt.defaulted);
    }

    #[test]
    fn test_rejected_repayment_leaves_ledger_untouched() {
        let mut countries = Countries::default();
        countries.insert(country("AAA", 100.0, 60));
        countries.insert(country("BBB", 100.0, 60));
        let (a, b) = (CountryId::new("AAA"), CountryId::new("BBB"));
        let mut ledger = DebtLedger::default();

        assert!(ledger.repay(&countries, &a, 10.0).is_err());
        assert!(ledger.get(&a).is_none());

        ledger.insert(NationalDebt::new(b.clone(), 40.0));
        assert!(ledger.repay(&countries, &b, 0.0).is_err());
        assert!(ledger.repay(&countries, &b, 41.0).is_err());
        assert_eq!(ledger.total(&b), 40.0);
        assert_eq!(ledger.0.len(), 1);
    }

    #[test]
    fn test_defaulted_country_cannot_borrow() {
        let mut countries = Countries::default();
        countries.insert(country("AAA", 100.0, 60));
        let a = CountryId::new("AAA");
        let mut ledger = DebtLedger::default();
        let mut debt = NationalDebt::new(a.clone(), 10.0);
        debt.defaulted = true;
        ledger.insert(debt);
        assert!(ledger.borrow(&countries, &a, 5.0, None).is_err());
    }
}
