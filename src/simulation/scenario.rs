//! Starting worlds: built-in scenarios and JSON scenario files.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HistoriaError, Result};
use crate::simulation::{
    BlocKind, Countries, Country, CountryId, CountryStats, Currency, CurrencyManager, DebtLedger,
    Effect, LeaderRoster, LeaderTrait, NationalDebt, Region, ScenarioInfo, ScriptedEvent,
    ScriptedEvents, Stat, TIER_MAX, TIER_MIN, TradeLedger, WorldBlocs, WorldClock,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationSeed {
    pub a: CountryId,
    pub b: CountryId,
    pub value: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderSeed {
    pub country: CountryId,
    pub name: String,
    pub title: String,
    pub age: u32,
    #[serde(default)]
    pub years_in_power: u32,
    pub popularity: i32,
    #[serde(default)]
    pub traits: Vec<LeaderTrait>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtSeed {
    pub country: CountryId,
    pub total: f64,
    #[serde(default)]
    pub creditors: Vec<(CountryId, f64)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlocSeed {
    pub name: String,
    pub kind: BlocKind,
    pub founder: CountryId,
    pub members: Vec<CountryId>,
    pub founded_year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start_year: i32,
    #[serde(default = "default_month")]
    pub start_month: u8,
    pub default_player: CountryId,
    pub countries: Vec<Country>,
    pub currencies: Vec<Currency>,
    #[serde(default)]
    pub relations: Vec<RelationSeed>,
    #[serde(default)]
    pub alliances: Vec<(CountryId, CountryId)>,
    #[serde(default)]
    pub wars: Vec<(CountryId, CountryId)>,
    /// Directed: issuer first.
    #[serde(default)]
    pub sanctions: Vec<(CountryId, CountryId)>,
    #[serde(default)]
    pub leaders: Vec<LeaderSeed>,
    #[serde(default)]
    pub debts: Vec<DebtSeed>,
    #[serde(default)]
    pub blocs: Vec<BlocSeed>,
    #[serde(default)]
    pub agreements: Vec<(CountryId, CountryId)>,
    #[serde(default)]
    pub scripted_events: Vec<ScriptedEvent>,
}

fn default_month() -> u8 {
    1
}

/// Every resource a scenario seeds, ready to be inserted into the world.
#[derive(Debug, Clone)]
pub struct ScenarioState {
    pub clock: WorldClock,
    pub countries: Countries,
    pub currencies: CurrencyManager,
    pub debts: DebtLedger,
    pub leaders: LeaderRoster,
    pub blocs: WorldBlocs,
    pub trade: TradeLedger,
    pub scripted: ScriptedEvents,
}

impl Scenario {
    pub fn info(&self, builtin: bool) -> ScenarioInfo {
        ScenarioInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            start_year: self.start_year,
            countries: self.countries.iter().map(|c| c.id.clone()).collect(),
            builtin,
        }
    }

    pub fn build(&self) -> Result<ScenarioState> {
        if self.countries.is_empty() {
            return Err(HistoriaError::invalid(format!("scenario '{}' has no countries", self.id)));
        }

        let mut countries = Countries::default();
        for country in &self.countries {
            let mut country = country.clone();
            country.stats = country.stats.normalized();
            country.tier = country.tier.clamp(TIER_MIN, TIER_MAX);
            country.gdp = country.gdp.max(0.0);
            country.alliances.clear();
            country.at_war.clear();
            country.sanctions.clear();
            countries.insert(country);
        }
        // Relations embedded in country records may be one-sided.
        for country in &self.countries {
            for (other, value) in &country.relations {
                if countries.contains(other) && other != &country.id {
                    countries.set_relation(&country.id, other, *value)?;
                } else {
                    countries.get_mut(&country.id)?.relations.remove(other);
                }
            }
        }
        for seed in &self.relations {
            countries.set_relation(&seed.a, &seed.b, seed.value)?;
        }
        for (a, b) in &self.alliances {
            countries.ensure_pair(a, b)?;
            countries.get_mut(a)?.alliances.insert(b.clone());
            countries.get_mut(b)?.alliances.insert(a.clone());
        }
        for (a, b) in &self.wars {
            countries.ensure_pair(a, b)?;
            countries.get_mut(a)?.at_war.insert(b.clone());
            countries.get_mut(b)?.at_war.insert(a.clone());
        }
        for (issuer, target) in &self.sanctions {
            countries.ensure_pair(issuer, target)?;
            countries.get_mut(issuer)?.sanctions.insert(target.clone());
        }

        let mut currencies = CurrencyManager::default();
        for currency in &self.currencies {
            currencies.insert(currency.clone());
        }
        for country in countries.iter() {
            currencies.get(&country.currency)?;
        }
        currencies.sync_issuers(&countries);

        let mut debts = DebtLedger::default();
        for seed in &self.debts {
            let record = countries.get(&seed.country)?;
            let mut debt = NationalDebt::new(seed.country.clone(), seed.total);
            for (creditor, amount) in &seed.creditors {
                countries.ensure_pair(&seed.country, creditor)?;
                debt.creditors.insert(creditor.clone(), *amount);
            }
            debt.interest_rate = debt.rating(record).interest_rate();
            debts.insert(debt);
        }

        let mut leaders = LeaderRoster::default();
        for seed in &self.leaders {
            countries.get(&seed.country)?;
            leaders.install(
                &seed.country,
                &seed.name,
                &seed.title,
                seed.age,
                seed.years_in_power,
                seed.popularity,
                seed.traits.clone(),
            );
        }

        let mut blocs = WorldBlocs::default();
        for seed in &self.blocs {
            blocs.create(
                &countries,
                &seed.name,
                seed.kind,
                &seed.founder,
                &seed.members,
                seed.founded_year,
            )?;
        }

        let mut trade = TradeLedger::default();
        for (a, b) in &self.agreements {
            countries.ensure_pair(a, b)?;
            trade.push_seeded(a.clone(), b.clone(), self.start_year);
        }
        trade.recompute(&countries, &blocs);

        let mut scripted = self.scripted_events.clone();
        for event in &mut scripted {
            countries.get(&event.country)?;
            event.fired = false;
        }

        debug!(
            scenario = %self.id,
            countries = countries.len(),
            blocs = blocs.iter().count(),
            "scenario built"
        );

        Ok(ScenarioState {
            clock: WorldClock::new(self.start_year, self.start_month),
            countries,
            currencies,
            debts,
            leaders,
            blocs,
            trade,
            scripted: ScriptedEvents(scripted),
        })
    }
}

pub const BUILTIN_SCENARIOS: [&str; 2] = ["modern_2025", "cold_war_1962"];

pub fn builtin_scenario(id: &str) -> Option<Scenario> {
    match id {
        "modern_2025" => Some(modern_2025()),
        "cold_war_1962" => Some(cold_war_1962()),
        _ => None,
    }
}

fn is_valid_scenario_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Built-ins first, then `<dir>/<id>.json`.
pub fn load_scenario(dir: &Path, id: &str) -> Result<Scenario> {
    if let Some(scenario) = builtin_scenario(id) {
        return Ok(scenario);
    }
    if !is_valid_scenario_id(id) {
        return Err(HistoriaError::ScenarioNotFound(id.to_string()));
    }
    let path = dir.join(format!("{id}.json"));
    if !path.is_file() {
        return Err(HistoriaError::ScenarioNotFound(id.to_string()));
    }
    let raw = fs::read_to_string(&path)?;
    let mut scenario: Scenario = serde_json::from_str(&raw)?;
    scenario.id = id.to_string();
    Ok(scenario)
}

pub fn list_scenarios(dir: &Path) -> Vec<ScenarioInfo> {
    let mut infos: Vec<ScenarioInfo> = BUILTIN_SCENARIOS
        .iter()
        .filter_map(|id| builtin_scenario(id))
        .map(|s| s.info(true))
        .collect();

    let Ok(entries) = fs::read_dir(dir) else {
        return infos;
    };
    let mut custom: Vec<ScenarioInfo> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .filter_map(|path| {
            let id = path.file_stem()?.to_str()?.to_string();
            if builtin_scenario(&id).is_some() {
                return None;
            }
            match load_scenario(dir, &id) {
                Ok(scenario) => Some(scenario.info(false)),
                Err(err) => {
                    debug!(scenario = %id, error = %err, "skipping unreadable scenario");
                    None
                }
            }
        })
        .collect();
    custom.sort_by(|a, b| a.id.cmp(&b.id));
    infos.extend(custom);
    infos
}

#[allow(clippy::too_many_arguments)]
fn nation(
    id: &str,
    name: &str,
    region: Region,
    tier: u8,
    population: u64,
    gdp: f64,
    stats: [i32; 8],
    currency: &str,
) -> Country {
    let [eco, mil, tech, stab, infl, res, soft, nuc] = stats;
    Country::new(
        id,
        name,
        region,
        tier,
        population,
        gdp,
        CountryStats::new(eco, mil, tech, stab, infl, res, soft, nuc),
        currency,
    )
}

fn id(code: &str) -> CountryId {
    CountryId::new(code)
}

fn pair(a: &str, b: &str) -> (CountryId, CountryId) {
    (id(a), id(b))
}

fn rel(a: &str, b: &str, value: i32) -> RelationSeed {
    RelationSeed {
        a: id(a),
        b: id(b),
        value,
    }
}

fn leader(
    country: &str,
    name: &str,
    title: &str,
    age: u32,
    popularity: i32,
    traits: &[LeaderTrait],
) -> LeaderSeed {
    LeaderSeed {
        country: id(country),
        name: name.to_string(),
        title: title.to_string(),
        age,
        years_in_power: 2,
        popularity,
        traits: traits.to_vec(),
    }
}

fn debt(country: &str, total: f64, creditors: &[(&str, f64)]) -> DebtSeed {
    DebtSeed {
        country: id(country),
        total,
        creditors: creditors.iter().map(|(c, a)| (id(c), *a)).collect(),
    }
}

fn scripted(
    year: i32,
    month: u8,
    country: &str,
    title: &str,
    description: &str,
    effects: Vec<Effect>,
) -> ScriptedEvent {
    ScriptedEvent {
        year,
        month,
        country: id(country),
        title: title.to_string(),
        description: description.to_string(),
        effects,
        fired: false,
    }
}

fn modern_2025() -> Scenario {
    use LeaderTrait::*;
    use Region::*;

    let countries = vec![
        nation(
            "USA",
            "United States",
            NorthAmerica,
            1,
            335_000_000,
            27_400.0,
            [82, 95, 90, 62, 92, 70, 88, 95],
            "USD",
        ),
        nation(
            "CHN",
            "China",
            Asia,
            1,
            1_410_000_000,
            17_800.0,
            [78, 85, 80, 70, 82, 65, 55, 70],
            "CNY",
        ),
        nation(
            "RUS",
            "Russia",
            Europe,
            2,
            144_000_000,
            2_000.0,
            [45, 80, 60, 50, 65, 90, 35, 95],
            "RUB",
        ),
        nation(
            "DEU",
            "Germany",
            Europe,
            2,
            84_000_000,
            4_450.0,
            [72, 45, 80, 72, 68, 35, 75, 0],
            "EUR",
        ),
        nation(
            "FRA",
            "France",
            Europe,
            2,
            68_000_000,
            3_050.0,
            [65, 60, 75, 58, 70, 35, 78, 60],
            "EUR",
        ),
        nation(
            "GBR",
            "United Kingdom",
            Europe,
            2,
            67_000_000,
            3_340.0,
            [64, 62, 78, 60, 72, 40, 80, 55],
            "GBP",
        ),
        nation(
            "JPN",
            "Japan",
            Asia,
            2,
            124_000_000,
            4_210.0,
            [66, 50, 85, 76, 60, 20, 74, 0],
            "JPY",
        ),
        nation(
            "IND",
            "India",
            Asia,
            2,
            1_430_000_000,
            3_730.0,
            [68, 70, 60, 60, 62, 60, 55, 45],
            "INR",
        ),
        nation(
            "BRA",
            "Brazil",
            SouthAmerica,
            3,
            216_000_000,
            2_170.0,
            [55, 45, 50, 52, 50, 80, 55, 0],
            "BRL",
        ),
        nation(
            "SAU",
            "Saudi Arabia",
            MiddleEast,
            3,
            36_000_000,
            1_100.0,
            [62, 55, 45, 65, 55, 95, 35, 0],
            "SAR",
        ),
        nation(
            "TUR",
            "Turkey",
            MiddleEast,
            3,
            85_000_000,
            1_110.0,
            [48, 60, 50, 48, 52, 40, 45, 0],
            "TRY",
        ),
        nation(
            "NGA",
            "Nigeria",
            Africa,
            4,
            223_000_000,
            360.0,
            [40, 35, 25, 38, 35, 75, 30, 0],
            "NGN",
        ),
    ];

    let mut usd = Currency::reference("USD", "US dollar");
    usd.reserve_share = 58.0;
    let currencies = vec![
        usd,
        Currency::new("CNY", "Renminbi", 0.14),
        Currency::new("RUB", "Russian ruble", 0.011),
        Currency::new("EUR", "Euro", 1.08),
        Currency::new("GBP", "Pound sterling", 1.27),
        Currency::new("JPY", "Japanese yen", 0.0067),
        Currency::new("INR", "Indian rupee", 0.012),
        Currency::new("BRL", "Brazilian real", 0.2),
        Currency::new("SAR", "Saudi riyal", 0.27),
        Currency::new("TRY", "Turkish lira", 0.031),
        Currency::new("NGN", "Nigerian naira", 0.00065),
    ];

    let relations = vec![
        rel("USA", "GBR", 85),
        rel("USA", "JPN", 80),
        rel("USA", "DEU", 70),
        rel("USA", "FRA", 65),
        rel("USA", "CHN", -35),
        rel("USA", "RUS", -70),
        rel("USA", "IND", 45),
        rel("USA", "SAU", 40),
        rel("USA", "BRA", 30),
        rel("USA", "TUR", 15),
        rel("CHN", "RUS", 60),
        rel("CHN", "JPN", -30),
        rel("CHN", "IND", -25),
        rel("CHN", "BRA", 40),
        rel("CHN", "SAU", 35),
        rel("CHN", "NGA", 35),
        rel("CHN", "DEU", 20),
        rel("RUS", "DEU", -55),
        rel("RUS", "FRA", -50),
        rel("RUS", "GBR", -65),
        rel("RUS", "JPN", -40),
        rel("RUS", "IND", 45),
        rel("RUS", "TUR", 10),
        rel("DEU", "FRA", 85),
        rel("DEU", "GBR", 60),
        rel("FRA", "GBR", 60),
        rel("GBR", "IND", 40),
        rel("JPN", "IND", 50),
        rel("BRA", "IND", 35),
        rel("SAU", "TUR", 5),
        rel("NGA", "GBR", 30),
    ];

    let leaders = vec![
        leader("USA", "Walter Hayes", "President", 71, 45, &[Charismatic, Militarist]),
        leader("CHN", "Liang Guofeng", "President", 70, 70, &[Authoritarian, Technocrat]),
        leader("RUS", "Arkady Volkov", "President", 72, 65, &[Authoritarian, Militarist]),
        leader("DEU", "Katrin Albrecht", "Chancellor", 59, 40, &[Reformer]),
        leader("FRA", "Julien Marchand", "President", 47, 35, &[Diplomat, Reformer]),
        leader("GBR", "Edward Lyle", "Prime Minister", 61, 42, &[Diplomat]),
        leader("JPN", "Kenji Morimoto", "Prime Minister", 67, 38, &[Technocrat]),
        leader("IND", "Raghav Mehta", "Prime Minister", 74, 68, &[Charismatic, Reformer]),
        leader("BRA", "Luiza Carvalho", "President", 63, 50, &[Charismatic]),
        leader("SAU", "Faisal Al-Harbi", "Crown Prince", 39, 60, &[Authoritarian, Reformer]),
        leader("TUR", "Murat Aksoy", "President", 70, 48, &[Authoritarian]),
        leader("NGA", "Chidi Okonkwo", "President", 72, 40, &[Diplomat]),
    ];

    let debts = vec![
        debt("USA", 33_500.0, &[("JPN", 1_100.0), ("CHN", 800.0)]),
        debt("CHN", 14_500.0, &[]),
        debt("RUS", 400.0, &[]),
        debt("DEU", 2_900.0, &[]),
        debt("FRA", 3_350.0, &[]),
        debt("GBR", 3_400.0, &[]),
        debt("JPN", 9_200.0, &[]),
        debt("IND", 3_100.0, &[]),
        debt("BRA", 1_600.0, &[("CHN", 40.0)]),
        debt("SAU", 300.0, &[]),
        debt("TUR", 370.0, &[]),
        debt("NGA", 140.0, &[("CHN", 5.0)]),
    ];

    let blocs = vec![
        BlocSeed {
            name: "European Union".into(),
            kind: BlocKind::MonetaryUnion,
            founder: id("DEU"),
            members: vec![id("FRA")],
            founded_year: 1993,
        },
        BlocSeed {
            name: "BRICS".into(),
            kind: BlocKind::FreeTrade,
            founder: id("BRA"),
            members: vec![id("RUS"), id("IND"), id("CHN")],
            founded_year: 2009,
        },
    ];

    let scripted_events = vec![
        scripted(
            2025,
            7,
            "IND",
            "G20 summit in New Delhi",
            "Hosting the summit lifts India's profile.",
            vec![
                Effect::AdjustStat { stat: Stat::Influence, delta: 3 },
                Effect::AdjustRelation { other: id("USA"), delta: 5 },
                Effect::AdjustRelation { other: id("CHN"), delta: 5 },
            ],
        ),
        scripted(
            2026,
            3,
            "FRA",
            "Snap legislative election",
            "A hung parliament stalls reforms.",
            vec![
                Effect::AdjustStat { stat: Stat::Stability, delta: -4 },
            ],
        ),
        scripted(
            2027,
            1,
            "SAU",
            "Oil price collapse",
            "Brent falls below forty dollars.",
            vec![
                Effect::ChangeGdp { percent: -6.0 },
                Effect::AdjustStat { stat: Stat::Economy, delta: -4 },
                Effect::AddDebt { amount: 60.0 },
            ],
        ),
    ];

    Scenario {
        id: "modern_2025".into(),
        name: "Modern World 2025".into(),
        description: "Twelve major powers in a multipolar world of sanctions, blocs and debt."
            .into(),
        start_year: 2025,
        start_month: 1,
        default_player: id("FRA"),
        countries,
        currencies,
        relations,
        alliances: vec![
            pair("USA", "GBR"),
            pair("USA", "JPN"),
            pair("USA", "DEU"),
            pair("USA", "FRA"),
            pair("DEU", "FRA"),
            pair("GBR", "FRA"),
            pair("GBR", "DEU"),
            pair("USA", "TUR"),
        ],
        wars: vec![],
        sanctions: vec![
            pair("USA", "RUS"),
            pair("DEU", "RUS"),
            pair("FRA", "RUS"),
            pair("GBR", "RUS"),
            pair("JPN", "RUS"),
        ],
        leaders,
        debts,
        blocs,
        agreements: vec![
            pair("USA", "JPN"),
            pair("USA", "GBR"),
            pair("CHN", "BRA"),
            pair("CHN", "DEU"),
            pair("CHN", "SAU"),
            pair("IND", "GBR"),
            pair("RUS", "IND"),
        ],
        scripted_events,
    }
}

fn cold_war_1962() -> Scenario {
    use LeaderTrait::*;
    use Region::*;

    let countries = vec![
        nation(
            "USA",
            "United States",
            NorthAmerica,
            1,
            187_000_000,
            600.0,
            [85, 92, 88, 70, 90, 75, 85, 90],
            "USD",
        ),
        nation(
            "SOV",
            "Soviet Union",
            Europe,
            1,
            221_000_000,
            350.0,
            [62, 92, 78, 68, 85, 90, 55, 85],
            "SUR",
        ),
        nation(
            "GBR",
            "United Kingdom",
            Europe,
            2,
            53_000_000,
            80.0,
            [60, 60, 70, 65, 70, 40, 72, 50],
            "GBP",
        ),
        nation(
            "FRA",
            "France",
            Europe,
            2,
            47_000_000,
            75.0,
            [62, 58, 65, 55, 65, 40, 70, 25],
            "FRF",
        ),
        nation(
            "CHN",
            "People's Republic of China",
            Asia,
            3,
            670_000_000,
            50.0,
            [30, 65, 30, 40, 50, 70, 30, 0],
            "CNY",
        ),
        nation(
            "CUB",
            "Cuba",
            NorthAmerica,
            5,
            7_000_000,
            4.0,
            [25, 30, 20, 45, 25, 35, 40, 0],
            "CUP",
        ),
    ];

    let currencies = vec![
        Currency::reference("USD", "US dollar"),
        Currency::new("SUR", "Soviet ruble", 1.11),
        Currency::new("GBP", "Pound sterling", 2.8),
        Currency::new("FRF", "New franc", 0.2),
        Currency::new("CNY", "Renminbi", 0.41),
        Currency::new("CUP", "Cuban peso", 1.0),
    ];

    let relations = vec![
        rel("USA", "SOV", -80),
        rel("USA", "GBR", 85),
        rel("USA", "FRA", 55),
        rel("USA", "CHN", -70),
        rel("USA", "CUB", -90),
        rel("SOV", "CUB", 75),
        rel("SOV", "CHN", 5),
        rel("SOV", "GBR", -60),
        rel("SOV", "FRA", -50),
        rel("GBR", "FRA", 50),
        rel("CHN", "CUB", 30),
    ];

    let scripted_events = vec![
        scripted(
            1962,
            10,
            "USA",
            "Missiles discovered in Cuba",
            "Reconnaissance flights confirm launch sites; a naval quarantine follows.",
            vec![
                Effect::AdjustRelation { other: id("SOV"), delta: -15 },
                Effect::AdjustRelation { other: id("CUB"), delta: -10 },
                Effect::AdjustStat { stat: Stat::Stability, delta: -3 },
            ],
        ),
        scripted(
            1962,
            11,
            "SOV",
            "Missiles withdrawn",
            "A secret bargain ends the standoff.",
            vec![
                Effect::AdjustRelation { other: id("USA"), delta: 10 },
                Effect::AdjustStat { stat: Stat::Influence, delta: -2 },
            ],
        ),
        scripted(
            1963,
            8,
            "USA",
            "Partial test ban treaty",
            "Atmospheric nuclear tests are banned.",
            vec![
                Effect::AdjustRelation { other: id("SOV"), delta: 10 },
                Effect::AdjustRelation { other: id("GBR"), delta: 5 },
            ],
        ),
    ];

    Scenario {
        id: "cold_war_1962".into(),
        name: "Cold War 1962".into(),
        description: "Two superpowers on the brink in the year of the Cuban missile crisis.".into(),
        start_year: 1962,
        start_month: 1,
        default_player: id("USA"),
        countries,
        currencies,
        relations,
        alliances: vec![
            pair("USA", "GBR"),
            pair("USA", "FRA"),
            pair("GBR", "FRA"),
            pair("SOV", "CUB"),
        ],
        wars: vec![],
        sanctions: vec![pair("USA", "CUB")],
        leaders: vec![
            leader("USA", "John Kennedy", "President", 45, 70, &[Charismatic, Diplomat]),
            leader("SOV", "Nikita Khrushchev", "First Secretary", 68, 55, &[Militarist, Reformer]),
            leader("GBR", "Harold Macmillan", "Prime Minister", 68, 50, &[Diplomat]),
            leader("FRA", "Charles de Gaulle", "President", 72, 65, &[Charismatic, Authoritarian]),
            leader("CHN", "Mao Zedong", "Chairman", 69, 60, &[Authoritarian]),
            leader("CUB", "Fidel Castro", "Prime Minister", 36, 75, &[Charismatic, Militarist]),
        ],
        debts: vec![
            debt("USA", 300.0, &[]),
            debt("SOV", 40.0, &[]),
            debt("GBR", 75.0, &[("USA", 4.0)]),
            debt("FRA", 30.0, &[]),
            debt("CHN", 5.0, &[("SOV", 1.5)]),
            debt("CUB", 2.0, &[("SOV", 1.0)]),
        ],
        blocs: vec![BlocSeed {
            name: "Comecon".into(),
            kind: BlocKind::CustomsUnion,
            founder: id("SOV"),
            members: vec![id("CUB")],
            founded_year: 1949,
        }],
        agreements: vec![pair("USA", "GBR"), pair("GBR", "FRA"), pair("SOV", "CUB")],
        scripted_events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_scenarios_build() {
        let modern = builtin_scenario("modern_2025").unwrap().build().unwrap();
        assert_eq!(modern.countries.len(), 12);
        assert_eq!(modern.clock.year, 2025);
        assert!(modern.blocs.get("european-union").is_ok());
        assert!(modern.leaders.leader_of(&id("USA")).is_some());
        assert_eq!(modern.scripted.pending(), 3);
        assert!(modern.trade.agreements().iter().all(|t| t.volume > 0.0));

        let cold = builtin_scenario("cold_war_1962").unwrap().build().unwrap();
        assert_eq!(cold.countries.len(), 6);
        assert_eq!(cold.countries.relation(&id("CUB"), &id("USA")), -90);
        assert!(cold.countries.get(&id("SOV")).unwrap().is_allied(&id("CUB")));
    }

    #[test]
    fn test_no_builtin_country_starts_in_default() {
        for name in BUILTIN_SCENARIOS {
            let state = builtin_scenario(name).unwrap().build().unwrap();
            for country in state.countries.iter() {
                if let Some(debt) = state.debts.get(&country.id) {
                    let ratio = debt.ratio(country);
                    assert!(ratio < crate::simulation::DEFAULT_THRESHOLD, "{}", country.id);
                }
            }
        }
    }

    #[test]
    fn test_custom_scenario_round_trips_through_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut custom = builtin_scenario("cold_war_1962").unwrap();
        custom.name = "Berlin 1961".into();
        let json = serde_json::to_string_pretty(&custom).unwrap();
        std::fs::write(dir.path().join("berlin.json"), json).unwrap();

        let loaded = load_scenario(dir.path(), "berlin").unwrap();
        assert_eq!(loaded.id, "berlin");
        assert_eq!(loaded.name, "Berlin 1961");
        assert!(loaded.build().is_ok());

        let listed = list_scenarios(dir.path());
        assert_eq!(listed.len(), 3);
        assert!(listed.iter().any(|s| s.id == "berlin" && !s.builtin));

        assert!(matches!(
            load_scenario(dir.path(), "../etc"),
            Err(HistoriaError::ScenarioNotFound(_))
        ));
        assert!(matches!(
            load_scenario(dir.path(), "missing"),
            Err(HistoriaError::ScenarioNotFound(_))
        ));
    }

    #[test]
    fn test_hand_edited_tier_and_gdp_are_clamped() {
        let mut scenario = builtin_scenario("cold_war_1962").unwrap();
        scenario.countries[0].tier = 0;
        scenario.countries[0].gdp = -50.0;
        scenario.countries[1].tier = 9;
        let (first, second) = (scenario.countries[0].id.clone(), scenario.countries[1].id.clone());

        let state = scenario.build().unwrap();
        let first = state.countries.get(&first).unwrap();
        assert_eq!(first.tier, TIER_MIN);
        assert_eq!(first.gdp, 0.0);
        assert_eq!(state.countries.get(&second).unwrap().tier, TIER_MAX);
    }

    #[test]
    fn test_unknown_currency_is_rejected() {
        let mut scenario = builtin_scenario("cold_war_1962").unwrap();
        scenario.currencies.retain(|c| c.code != "CUP");
        assert!(matches!(
            scenario.build(),
            Err(HistoriaError::CurrencyNotFound(_))
        ));
    }
}
