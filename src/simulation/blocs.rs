use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{HistoriaError, Result};
use crate::simulation::{Countries, CountryId, trade_volume};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BlocKind {
    FreeTrade,
    CustomsUnion,
    MonetaryUnion,
}

impl BlocKind {
    /// Yearly economy bonus for every member of an active bloc.
    pub fn economy_bonus(&self) -> i32 {
        match self {
            BlocKind::FreeTrade | BlocKind::CustomsUnion => 1,
            BlocKind::MonetaryUnion => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BlocKind::FreeTrade => "Free trade area",
            BlocKind::CustomsUnion => "Customs union",
            BlocKind::MonetaryUnion => "Monetary union",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bloc {
    pub id: String,
    pub name: String,
    pub kind: BlocKind,
    pub members: BTreeSet<CountryId>,
    pub founder: CountryId,
    pub founded_year: i32,
    pub currency: Option<String>,
}

impl Bloc {
    pub fn is_active(&self) -> bool {
        self.members.len() >= 2
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaveOutcome {
    pub dissolved: bool,
    pub new_founder: Option<CountryId>,
}

#[derive(Debug, Clone, Resource, Serialize, Deserialize, Default)]
pub struct WorldBlocs {
    pub blocs: BTreeMap<String, Bloc>,
}

pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

impl WorldBlocs {
    pub fn get(&self, id: &str) -> Result<&Bloc> {
        self.blocs
            .get(id)
            .ok_or_else(|| HistoriaError::BlocNotFound(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bloc> {
        self.blocs.values()
    }

    pub fn share_bloc(&self, a: &CountryId, b: &CountryId) -> bool {
        self.blocs
            .values()
            .any(|bloc| bloc.members.contains(a) && bloc.members.contains(b))
    }

    /// Currency a monetary union binds `country` to, if any.
    pub fn union_currency(&self, country: &CountryId) -> Option<&str> {
        self.blocs
            .values()
            .filter(|bloc| bloc.members.contains(country))
            .find_map(|bloc| bloc.currency.as_deref())
    }

    fn check_union_currency(&self, country: &CountryId, code: &str) -> Result<()> {
        match self.union_currency(country) {
            Some(bound) if !bound.eq_ignore_ascii_case(code) => Err(HistoriaError::invalid(
                format!("{country} is bound to {bound} by a monetary union"),
            )),
            _ => Ok(()),
        }
    }

    pub fn founded_by(&self, country: &CountryId) -> bool {
        self.blocs.values().any(|bloc| &bloc.founder == country)
    }

    pub fn create(
        &mut self,
        countries: &Countries,
        name: &str,
        kind: BlocKind,
        founder: &CountryId,
        members: &[CountryId],
        year: i32,
    ) -> Result<Bloc> {
        let id = slugify(name);
        if id.is_empty() {
            return Err(HistoriaError::invalid("bloc name must contain letters or digits"));
        }
        if self.blocs.contains_key(&id) {
            return Err(HistoriaError::invalid(format!("bloc '{id}' already exists")));
        }
        let founder_country = countries.get(founder)?;

        let mut roster = BTreeSet::from([founder.clone()]);
        for member in members {
            countries.get(member)?;
            roster.insert(member.clone());
        }
        if roster.len() < 2 {
            return Err(HistoriaError::invalid("a bloc needs at least two members"));
        }
        for a in &roster {
            for b in &roster {
                if a < b && countries.get(a)?.is_at_war(b) {
                    return Err(HistoriaError::invalid(format!(
                        "{a} and {b} are at war"
                    )));
                }
            }
        }

        let currency = match kind {
            BlocKind::MonetaryUnion => Some(founder_country.currency.clone()),
            _ => None,
        };
        if let Some(code) = &currency {
            for member in &roster {
                self.check_union_currency(member, code)?;
            }
        }
        let bloc = Bloc {
            id: id.clone(),
            name: name.trim().to_string(),
            kind,
            members: roster,
            founder: founder.clone(),
            founded_year: year,
            currency,
        };
        self.blocs.insert(id, bloc.clone());
        Ok(bloc)
    }

    pub fn join(&mut self, countries: &Countries, id: &str, country: &CountryId) -> Result<&Bloc> {
        let candidate = countries.get(country)?;
        let bloc = self.get(id)?;
        if bloc.members.contains(country) {
            return Err(HistoriaError::invalid(format!("{country} is already in {id}")));
        }
        if let Some(enemy) = bloc.members.iter().find(|m| candidate.is_at_war(m)) {
            return Err(HistoriaError::invalid(format!(
                "{country} is at war with member {enemy}"
            )));
        }
        if let Some(code) = &bloc.currency {
            self.check_union_currency(country, code)?;
        }
        let total: i32 = bloc.members.iter().map(|m| candidate.relation(m)).sum();
        let mean = total as f64 / bloc.members.len().max(1) as f64;
        if mean < 0.0 {
            return Err(HistoriaError::invalid(format!(
                "{country} has hostile relations with {id} (mean {mean:.1})"
            )));
        }

        let bloc = self
            .blocs
            .get_mut(id)
            .ok_or_else(|| HistoriaError::BlocNotFound(id.to_string()))?;
        bloc.members.insert(country.clone());
        Ok(bloc)
    }

    pub fn leave(&mut self, id: &str, country: &CountryId) -> Result<LeaveOutcome> {
        let bloc = self
            .blocs
            .get_mut(id)
            .ok_or_else(|| HistoriaError::BlocNotFound(id.to_string()))?;
        if !bloc.members.remove(country) {
            return Err(HistoriaError::invalid(format!("{country} is not in {id}")));
        }

        if !bloc.is_active() {
            self.blocs.remove(id);
            return Ok(LeaveOutcome {
                dissolved: true,
                new_founder: None,
            });
        }

        let mut new_founder = None;
        if &bloc.founder == country {
            if let Some(next) = bloc.members.iter().next().cloned() {
                bloc.founder = next.clone();
                new_founder = Some(next);
            }
        }
        Ok(LeaveOutcome {
            dissolved: false,
            new_founder,
        })
    }

    /// Sum of pairwise trade volume between all members.
    pub fn bloc_trade_volume(&self, countries: &Countries, id: &str) -> Result<f64> {
        let bloc = self.get(id)?;
        let members: Vec<&CountryId> = bloc.members.iter().collect();
        let mut total = 0.0;
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                total += trade_volume(countries, self, a, b);
            }
        }
        Ok(total)
    }
}
