//! Power scores, tiers and observer-aware rankings.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::simulation::{
    Confidence, Country, CountryId, CountryView, IntelContext, IntelValue, Stat,
};

const WEIGHTS: [(Stat, f64); 8] = [
    (Stat::Economy, 0.25),
    (Stat::Military, 0.20),
    (Stat::Technology, 0.15),
    (Stat::Stability, 0.10),
    (Stat::Influence, 0.15),
    (Stat::SoftPower, 0.05),
    (Stat::Resources, 0.05),
    (Stat::Nuclear, 0.05),
];

pub fn weighted_score(value_of: impl Fn(Stat) -> f64) -> f64 {
    WEIGHTS.iter().map(|(stat, weight)| value_of(*stat) * weight).sum()
}

/// Weighted composite of every stat, 0..100.
pub fn power_score(country: &Country) -> f64 {
    weighted_score(|stat| f64::from(country.stat(stat)))
}

pub fn tier_for_score(score: f64) -> u8 {
    if score >= 70.0 {
        1
    } else if score >= 55.0 {
        2
    } else if score >= 42.0 {
        3
    } else if score >= 30.0 {
        4
    } else if score >= 18.0 {
        5
    } else {
        6
    }
}

/// Stand-in stat value when the observer cannot see the real one.
pub fn tier_estimate(tier: u8) -> f64 {
    match tier {
        1 => 85.0,
        2 => 70.0,
        3 => 55.0,
        4 => 40.0,
        5 => 25.0,
        _ => 10.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RankingCategory {
    #[default]
    Overall,
    Economy,
    Military,
    Technology,
    Stability,
    Influence,
    Gdp,
    Population,
}

impl RankingCategory {
    pub const ALL: [RankingCategory; 8] = [
        RankingCategory::Overall,
        RankingCategory::Economy,
        RankingCategory::Military,
        RankingCategory::Technology,
        RankingCategory::Stability,
        RankingCategory::Influence,
        RankingCategory::Gdp,
        RankingCategory::Population,
    ];

    fn stat(&self) -> Option<Stat> {
        match self {
            RankingCategory::Economy => Some(Stat::Economy),
            RankingCategory::Military => Some(Stat::Military),
            RankingCategory::Technology => Some(Stat::Technology),
            RankingCategory::Stability => Some(Stat::Stability),
            RankingCategory::Influence => Some(Stat::Influence),
            _ => None,
        }
    }

    fn true_value(&self, country: &Country) -> f64 {
        match self {
            RankingCategory::Overall => power_score(country),
            RankingCategory::Gdp => country.gdp,
            RankingCategory::Population => country.population as f64,
            other => other
                .stat()
                .map(|stat| f64::from(country.stat(stat)))
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingEntry {
    pub rank: usize,
    pub country: CountryId,
    pub name: String,
    pub tier: u8,
    pub value: f64,
    pub confidence: Confidence,
}

fn observed_value(
    category: RankingCategory,
    view: &CountryView,
    gdp_fallback: f64,
) -> (f64, Confidence) {
    let fallback = tier_estimate(view.tier);
    let estimate = |intel: IntelValue| intel.estimate.unwrap_or(fallback);
    match category {
        RankingCategory::Population => (view.population as f64, Confidence::Exact),
        RankingCategory::Gdp => (
            view.gdp.estimate.unwrap_or(gdp_fallback),
            view.gdp.confidence,
        ),
        RankingCategory::Overall => {
            let value = weighted_score(|stat| estimate(view.stat(stat)));
            // The blended value is only as trustworthy as its weakest input.
            let confidence = view
                .stats
                .values()
                .map(|intel| intel.confidence)
                .min()
                .unwrap_or(Confidence::Hidden);
            (value, confidence)
        }
        other => {
            let intel = other
                .stat()
                .map(|stat| view.stat(stat))
                .unwrap_or_else(IntelValue::hidden);
            (estimate(intel), intel.confidence)
        }
    }
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    })
}

fn assign_ranks(mut rows: Vec<(CountryId, String, u8, f64, Confidence)>) -> Vec<RankingEntry> {
    rows.sort_by(|a, b| b.3.total_cmp(&a.3).then_with(|| a.0.cmp(&b.0)));
    rows.into_iter()
        .enumerate()
        .map(|(i, (country, name, tier, value, confidence))| RankingEntry {
            rank: i + 1,
            country,
            name,
            tier,
            value,
            confidence,
        })
        .collect()
}

impl<'a> IntelContext<'a> {
    /// Ranks every country. Without an observer the true values are used.
    pub fn rankings(
        &self,
        category: RankingCategory,
        observer: Option<&CountryId>,
    ) -> Result<Vec<RankingEntry>> {
        let Some(observer) = observer else {
            let rows = self
                .countries
                .iter()
                .map(|c| {
                    (
                        c.id.clone(),
                        c.name.clone(),
                        c.tier,
                        category.true_value(c),
                        Confidence::Exact,
                    )
                })
                .collect();
            return Ok(assign_ranks(rows));
        };

        let views = self.views(observer)?;
        let mut visible_gdp: Vec<f64> = views.iter().filter_map(|v| v.gdp.estimate).collect();
        let gdp_fallback = median(&mut visible_gdp).unwrap_or(0.0);

        let rows = views
            .iter()
            .map(|view| {
                let (value, confidence) = observed_value(category, view, gdp_fallback);
                (view.id.clone(), view.name.clone(), view.tier, value, confidence)
            })
            .collect();
        Ok(assign_ranks(rows))
    }

    /// 1-based overall rank of `country` by true score.
    pub fn overall_rank(&self, country: &CountryId) -> Option<usize> {
        self.rankings(RankingCategory::Overall, None)
            .ok()?
            .into_iter()
            .find(|entry| &entry.country == country)
            .map(|entry| entry.rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{
        Countries, CountryStats, DebtLedger, EspionageManager, LeaderRoster, Region, WorldBlocs,
    };

    fn country(code: &str, tier: u8, gdp: f64, stat: i32) -> Country {
        Country::new(
            code,
            format!("{code} land"),
            Region::Africa,
            tier,
            1_000_000,
            gdp,
            CountryStats::new(stat, stat, stat, stat, stat, stat, stat, stat),
            "XXX",
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
        fn new(countries: Vec<Country>) -> Self {
            let mut table = Countries::default();
            for c in countries {
                table.insert(c);
            }
            Self {
                countries: table,
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

    #[test]
    fn test_power_score_weights_sum_to_one() {
        let total: f64 = WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!((power_score(&country("AAA", 3, 1.0, 60)) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(tier_for_score(70.0), 1);
        assert_eq!(tier_for_score(69.9), 2);
        assert_eq!(tier_for_score(55.0), 2);
        assert_eq!(tier_for_score(42.0), 3);
        assert_eq!(tier_for_score(30.0), 4);
        assert_eq!(tier_for_score(18.0), 5);
        assert_eq!(tier_for_score(17.9), 6);
        assert_eq!(tier_estimate(1), 85.0);
        assert_eq!(tier_estimate(6), 10.0);
    }

    #[test]
    fn test_true_ranking_orders_and_breaks_ties_by_id() {
        let fx = Fixture::new(vec![
            country("CCC", 3, 100.0, 50),
            country("AAA", 3, 100.0, 50),
            country("BBB", 2, 300.0, 70),
        ]);
        let ranking = fx.ctx().rankings(RankingCategory::Overall, None).unwrap();
        let order: Vec<&str> = ranking.iter().map(|e| e.country.as_str()).collect();
        assert_eq!(order, ["BBB", "AAA", "CCC"]);
        assert_eq!(
            ranking.iter().map(|e| e.rank).collect::<Vec<_>>(),
            [1, 2, 3]
        );
        assert_eq!(fx.ctx().overall_rank(&CountryId::new("CCC")), Some(3));
    }

    #[test]
    fn test_observer_ranking_uses_estimates_for_hidden_values() {
        // A tier-6 observer with no technology cannot see a fortress state's military.
        let mut observer = country("OBS", 6, 10.0, 0);
        observer.stats.set(Stat::Economy, 50);
        let fortress = country("FOR", 2, 500.0, 100);
        let fx = Fixture::new(vec![observer, fortress]);

        let ranking = fx
            .ctx()
            .rankings(RankingCategory::Military, Some(&CountryId::new("OBS")))
            .unwrap();
        let entry = ranking
            .iter()
            .find(|e| e.country.as_str() == "FOR")
            .unwrap();
        assert_eq!(entry.confidence, Confidence::Hidden);
        assert_eq!(entry.value, tier_estimate(2));

        let own = ranking.iter().find(|e| e.country.as_str() == "OBS").unwrap();
        assert_eq!(own.confidence, Confidence::Exact);
        assert_eq!(own.value, 0.0);
    }

    #[test]
    fn test_hidden_gdp_uses_median_of_visible_estimates() {
        let observer = country("OBS", 6, 10.0, 0);
        let fortress = country("FOR", 2, 500.0, 100);
        let fx = Fixture::new(vec![observer, fortress]);

        let ranking = fx
            .ctx()
            .rankings(RankingCategory::Gdp, Some(&CountryId::new("OBS")))
            .unwrap();
        let hidden = ranking.iter().find(|e| e.country.as_str() == "FOR").unwrap();
        // Only the observer's own GDP is visible, so the median is 10.
        assert_eq!(hidden.value, 10.0);
        assert_eq!(hidden.confidence, Confidence::Hidden);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&mut []), None);
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }
}
