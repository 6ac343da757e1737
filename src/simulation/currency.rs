//! Currencies, exchange values and reserve shares.

use std::collections::{BTreeMap, BTreeSet};

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::error::{HistoriaError, Result};
use crate::simulation::{Countries, CountryId, Stat};

pub const MIN_VALUE: f64 = 0.0001;
const RESERVE_PREMIUM: f64 = 1.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub issuers: BTreeSet<CountryId>,
    /// Reference units per unit of this currency.
    pub value: f64,
    #[serde(default)]
    pub reserve_share: f64,
    #[serde(default)]
    pub is_reference: bool,
}

impl Currency {
    pub fn new(code: &str, name: &str, value: f64) -> Self {
        Self {
            code: code.to_ascii_uppercase(),
            name: name.to_string(),
            issuers: BTreeSet::new(),
            value: value.max(MIN_VALUE),
            reserve_share: 0.0,
            is_reference: false,
        }
    }

    pub fn reference(code: &str, name: &str) -> Self {
        Self {
            is_reference: true,
            ..Self::new(code, name, 1.0)
        }
    }

    /// Mean of `economy*0.6 + stability*0.4` across issuers; 50 when nobody issues it.
    pub fn strength(&self, countries: &Countries) -> f64 {
        let scores: Vec<f64> = self
            .issuers
            .iter()
            .filter_map(|id| countries.get(id).ok())
            .map(|c| {
                f64::from(c.stat(Stat::Economy)) * 0.6 + f64::from(c.stat(Stat::Stability)) * 0.4
            })
            .collect();
        if scores.is_empty() {
            50.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub result: f64,
    pub rate: f64,
}

#[derive(Debug, Clone, Default, Resource, Serialize, Deserialize)]
pub struct CurrencyManager {
    currencies: BTreeMap<String, Currency>,
}

impl CurrencyManager {
    pub fn insert(&mut self, currency: Currency) {
        self.currencies.insert(currency.code.clone(), currency);
    }

    pub fn get(&self, code: &str) -> Result<&Currency> {
        self.currencies
            .get(&code.to_ascii_uppercase())
            .ok_or_else(|| HistoriaError::CurrencyNotFound(code.to_string()))
    }

    fn get_mut(&mut self, code: &str) -> Result<&mut Currency> {
        self.currencies
            .get_mut(&code.to_ascii_uppercase())
            .ok_or_else(|| HistoriaError::CurrencyNotFound(code.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Currency> {
        self.currencies.values()
    }

    pub fn reference(&self) -> Option<&Currency> {
        self.currencies.values().find(|c| c.is_reference)
    }

    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Result<Conversion> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(HistoriaError::invalid("amount must be a non-negative number"));
        }
        let source = self.get(from)?;
        let target = self.get(to)?;
        let rate = source.value / target.value;
        Ok(Conversion {
            from: source.code.clone(),
            to: target.code.clone(),
            amount,
            result: amount * rate,
            rate,
        })
    }

    /// Cuts the value by `percent`; issuers gain competitiveness and lose confidence.
    pub fn devalue(&mut self, countries: &mut Countries, code: &str, percent: f64) -> Result<f64> {
        if !(1.0..=50.0).contains(&percent) {
            return Err(HistoriaError::invalid("devaluation must be between 1 and 50 percent"));
        }
        let currency = self.get_mut(code)?;
        if currency.is_reference {
            return Err(HistoriaError::invalid(format!(
                "{} is the reference currency",
                currency.code
            )));
        }
        currency.value = (currency.value * (1.0 - percent / 100.0)).max(MIN_VALUE);
        let value = currency.value;
        for issuer in currency.issuers.iter() {
            if let Ok(country) = countries.get_mut(issuer) {
                country.adjust_stat(Stat::Economy, 1);
                country.adjust_stat(Stat::Stability, -1);
            }
        }
        Ok(value)
    }

    /// Moves `country` onto `code`. Returns the code it left.
    pub fn adopt(
        &mut self,
        countries: &mut Countries,
        country: &CountryId,
        code: &str,
    ) -> Result<String> {
        let code = self.get(code)?.code.clone();
        let record = countries.get_mut(country)?;
        if record.currency == code {
            return Err(HistoriaError::invalid(format!("{country} already uses {code}")));
        }
        let previous = std::mem::replace(&mut record.currency, code.clone());
        if let Ok(old) = self.get_mut(&previous) {
            old.issuers.remove(country);
        }
        self.get_mut(&code)?.issuers.insert(country.clone());
        Ok(previous)
    }

    /// Monthly drift of every floating currency toward its issuers' strength.
    pub fn update_values(&mut self, countries: &Countries) {
        for currency in self.currencies.values_mut() {
            if currency.is_reference {
                currency.value = 1.0;
                continue;
            }
            let strength = currency.strength(countries);
            currency.value = (currency.value * (1.0 + (strength - 50.0) / 6_000.0)).max(MIN_VALUE);
        }
    }

    pub fn update_reserves(&mut self, countries: &Countries) {
        let weights: Vec<(String, f64)> = self
            .currencies
            .values()
            .map(|currency| {
                let gdp: f64 = currency
                    .issuers
                    .iter()
                    .filter_map(|id| countries.get(id).ok())
                    .map(|c| c.gdp)
                    .sum();
                let mut weight = gdp * currency.strength(countries) / 100.0;
                if currency.is_reference {
                    weight *= RESERVE_PREMIUM;
                }
                (currency.code.clone(), weight)
            })
            .collect();
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        for (code, weight) in weights {
            if let Some(currency) = self.currencies.get_mut(&code) {
                currency.reserve_share = if total > 0.0 { weight / total * 100.0 } else { 0.0 };
            }
        }
    }

    /// Rebuilds issuer sets from each country's currency code.
    pub fn sync_issuers(&mut self, countries: &Countries) {
        for currency in self.currencies.values_mut() {
            currency.issuers.clear();
        }
        for country in countries.iter() {
            if let Some(currency) = self.currencies.get_mut(&country.currency) {
                currency.issuers.insert(country.id.clone());
            }
        }
    }
}
