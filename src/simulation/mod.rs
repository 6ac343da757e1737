use std::path::PathBuf;

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::Schedule;
use bevy_ecs::system::{RunSystemOnce, SystemState};
use tracing::{debug, info};

use crate::error::{HistoriaError, Result};

pub mod achievements;
pub mod blocs;
pub mod country;
pub mod currency;
pub mod debt;
pub mod diplomacy;
pub mod effects;
pub mod espionage;
pub mod leaders;
pub mod localization;
pub mod observer;
pub mod persistence;
pub mod ranking;
pub mod resources;
pub mod scenario;
pub mod systems;
pub mod timeline;
pub mod trade;
pub mod world;

pub use achievements::*;
pub use blocs::*;
pub use country::*;
pub use currency::*;
pub use debt::*;
pub use diplomacy::*;
pub use effects::*;
pub use espionage::*;
pub use leaders::*;
pub use localization::*;
pub use observer::*;
pub use persistence::*;
pub use ranking::*;
pub use resources::*;
pub use scenario::*;
pub use systems::*;
pub use timeline::*;
pub use trade::*;
pub use world::*;

pub const MAX_ADVANCE_MONTHS: u32 = 120;
const OPERATION_SALT: u64 = 1_000;

/// The whole game: one ECS world plus the schedules that move it forward.
pub struct HistoriaWorld {
    world: World,
    monthly: Schedule,
    yearly: Schedule,
    store: SaveStore,
}

impl HistoriaWorld {
    pub fn new(config: SimulationConfig, scenario: &str, player: Option<&str>) -> Result<Self> {
        let store = SaveStore::new(config.save_dir.clone());
        let mut world = World::default();
        world.insert_resource(config);
        world.insert_resource(WorldContent::default());
        world.insert_resource(TickCursor::default());

        let mut monthly = Schedule::default();
        monthly.add_systems(
            (
                scripted_event_system,
                economy_system,
                currency_system,
                debt_system,
                random_event_system,
                espionage_decay_system,
                logging_system,
            )
                .chain(),
        );

        let mut yearly = Schedule::default();
        yearly.add_systems(
            (
                demography_system,
                development_system,
                diplomacy_drift_system,
                bloc_system,
                trade_system,
                leader_system,
                reserve_system,
                debt_rating_system,
                tier_system,
                achievement_system,
                yearly_logging_system,
            )
                .chain(),
        );

        let mut sim = Self {
            world,
            monthly,
            yearly,
            store,
        };
        sim.new_game(scenario, player)?;
        Ok(sim)
    }

    fn config(&self) -> &SimulationConfig {
        self.world.resource::<SimulationConfig>()
    }

    fn intel(&self) -> IntelContext<'_> {
        IntelContext {
            countries: self.world.resource::<Countries>(),
            blocs: self.world.resource::<WorldBlocs>(),
            espionage: self.world.resource::<EspionageManager>(),
            leaders: self.world.resource::<LeaderRoster>(),
            debts: self.world.resource::<DebtLedger>(),
        }
    }

    fn record(&mut self, draft: EventDraft) {
        let clock = self.world.resource::<WorldClock>().clone();
        self.world.resource_mut::<Timeline>().record(&clock, draft);
    }

    pub fn player(&self) -> CountryId {
        self.world.resource::<GameSettings>().player.clone()
    }

    pub fn clock(&self) -> &WorldClock {
        self.world.resource::<WorldClock>()
    }

    pub fn countries(&self) -> &Countries {
        self.world.resource::<Countries>()
    }

    /// The requested observer, or the player when none is given.
    fn resolve_observer(&self, observer: Option<&str>) -> Result<CountryId> {
        let id = match observer {
            Some(code) if !code.trim().is_empty() => CountryId::new(code),
            _ => self.player(),
        };
        self.countries().get(&id)?;
        Ok(id)
    }

    /// Replaces every game resource with a freshly built scenario.
    pub fn new_game(&mut self, scenario_id: &str, player: Option<&str>) -> Result<WorldSummary> {
        let scenario = load_scenario(&self.config().scenarios_dir, scenario_id)?;
        let state = scenario.build()?;
        let player = player
            .map(CountryId::new)
            .unwrap_or_else(|| scenario.default_player.clone());
        state.countries.get(&player)?;

        let capacity = self.config().timeline_capacity;
        let ScenarioState {
            clock,
            countries,
            currencies,
            debts,
            leaders,
            blocs,
            trade,
            scripted,
        } = state;
        self.world.insert_resource(GameSettings {
            scenario_id: scenario.id.clone(),
            player: player.clone(),
        });
        self.world.insert_resource(clock);
        self.world.insert_resource(countries);
        self.world.insert_resource(currencies);
        self.world.insert_resource(debts);
        self.world.insert_resource(leaders);
        self.world.insert_resource(blocs);
        self.world.insert_resource(trade);
        self.world.insert_resource(scripted);
        self.world.insert_resource(EspionageManager::default());
        self.world.insert_resource(Timeline::new(capacity));
        self.world.insert_resource(AchievementBook::default());
        self.world.insert_resource(TickCursor::default());

        self.record(
            EventDraft::new(EventCategory::Scripted, format!("{} begins", scenario.name))
                .description(scenario.description.clone())
                .importance(3)
                .country(&player),
        );
        info!(
            scenario = %scenario.id,
            player = %player,
            date = %self.clock().label(),
            "new game started"
        );
        Ok(self.summary())
    }

    /// One month; the yearly schedule follows when the clock reaches January.
    pub fn tick(&mut self) -> TickReport {
        let first_event = self.world.resource::<Timeline>().next_id();
        self.world.resource_mut::<TickCursor>().first_event = first_event;
        let new_year = self.world.resource_mut::<WorldClock>().advance();

        self.monthly.run(&mut self.world);
        if new_year {
            self.yearly.run(&mut self.world);
        }

        let clock = self.clock();
        TickReport {
            year: clock.year,
            month: clock.month,
            months_advanced: 1,
            yearly: new_year,
            events: self.world.resource::<Timeline>().since(first_event),
        }
    }

    pub fn advance(&mut self, months: u32) -> Result<TickReport> {
        if !(1..=MAX_ADVANCE_MONTHS).contains(&months) {
            return Err(HistoriaError::invalid(format!(
                "months must be between 1 and {MAX_ADVANCE_MONTHS}"
            )));
        }
        let mut yearly = false;
        let mut events = Vec::new();
        for _ in 0..months {
            let report = self.tick();
            yearly |= report.yearly;
            events.extend(report.events);
        }
        let clock = self.clock();
        Ok(TickReport {
            year: clock.year,
            month: clock.month,
            months_advanced: months,
            yearly,
            events,
        })
    }

    pub fn summary(&self) -> WorldSummary {
        let clock = self.clock();
        let settings = self.world.resource::<GameSettings>();
        let countries = self.countries();
        // Seen through the player's intel.
        let mut top_powers = self
            .intel()
            .rankings(RankingCategory::Overall, Some(&settings.player))
            .unwrap_or_default();
        top_powers.truncate(5);

        WorldSummary {
            scenario: settings.scenario_id.clone(),
            player: settings.player.clone(),
            year: clock.year,
            month: clock.month,
            date: clock.label(),
            months_elapsed: clock.months_elapsed,
            countries: countries.len(),
            blocs: self.world.resource::<WorldBlocs>().iter().count(),
            trade_agreements: self.world.resource::<TradeLedger>().agreements().len(),
            wars: countries.iter().map(|c| c.at_war.len()).sum::<usize>() / 2,
            pending_scripted_events: self.world.resource::<ScriptedEvents>().pending(),
            timeline_events: self.world.resource::<Timeline>().len(),
            top_powers,
        }
    }

    // --- fog of war ---

    pub fn views(&self, observer: Option<&str>) -> Result<Vec<CountryView>> {
        let observer = self.resolve_observer(observer)?;
        self.intel().views(&observer)
    }

    pub fn view(&self, target: &str, observer: Option<&str>) -> Result<CountryView> {
        let observer = self.resolve_observer(observer)?;
        self.intel().view(&observer, &CountryId::new(target))
    }

    pub fn intel_report(&self, target: &str, observer: Option<&str>) -> Result<IntelReport> {
        let observer = self.resolve_observer(observer)?;
        self.intel().report(&observer, &CountryId::new(target))
    }

    pub fn invest_intel(
        &mut self,
        observer: &str,
        target: &str,
        points: i32,
    ) -> Result<IntelReport> {
        let (observer, target) = (CountryId::new(observer), CountryId::new(target));
        let level = {
            let mut state: SystemState<(ResMut<EspionageManager>, ResMut<Countries>)> =
                SystemState::new(&mut self.world);
            let (mut espionage, mut countries) = state.get_mut(&mut self.world);
            espionage.invest(&mut countries, &observer, &target, points)?
        };
        debug!(observer = %observer, target = %target, points, level, "intel investment");
        self.intel().report(&observer, &target)
    }

    pub fn run_operation(&mut self, observer: &str, target: &str) -> Result<OperationOutcome> {
        let (observer, target) = (CountryId::new(observer), CountryId::new(target));
        let months = self.clock().months_elapsed;
        let counter = self.world.resource::<EspionageManager>().operations_run();
        let mut rng = self.config().rng_for(months, OPERATION_SALT + counter);

        let (success, discovered, chance) = {
            let mut state: SystemState<(ResMut<EspionageManager>, ResMut<Countries>)> =
                SystemState::new(&mut self.world);
            let (mut espionage, mut countries) = state.get_mut(&mut self.world);
            espionage.run_operation(&mut countries, &observer, &target, &mut rng)?
        };
        if discovered {
            self.record(
                EventDraft::new(
                    EventCategory::Espionage,
                    format!("{observer} agents exposed in {target}"),
                )
                .description("A failed covert operation strains relations.")
                .importance(3)
                .country(&observer)
                .country(&target),
            );
        }
        info!(
            observer = %observer,
            target = %target,
            success,
            discovered,
            chance,
            "covert operation"
        );

        Ok(OperationOutcome {
            success,
            discovered,
            chance,
            investment: self.world.resource::<EspionageManager>().investment(&observer, &target),
            intel_score: self.intel().score(&observer, &target)?,
        })
    }

    pub fn rankings(
        &self,
        category: RankingCategory,
        observer: Option<&str>,
    ) -> Result<Vec<RankingEntry>> {
        let observer = self.resolve_observer(observer)?;
        self.intel().rankings(category, Some(&observer))
    }

    // --- diplomacy ---

    pub fn diplomacy(
        &mut self,
        action: DiplomaticAction,
        actor: &str,
        target: &str,
        delta: Option<i32>,
    ) -> Result<DiplomacyOutcome> {
        let (a, b) = (CountryId::new(actor), CountryId::new(target));
        let (affected, category, importance) = {
            let mut countries = self.world.resource_mut::<Countries>();
            match action {
                DiplomaticAction::AdjustRelation => {
                    let delta = delta
                        .filter(|d| (-100..=100).contains(d))
                        .ok_or_else(|| {
                            HistoriaError::invalid("delta between -100 and 100 is required")
                        })?;
                    countries.adjust_relation(&a, &b, delta)?;
                    (Vec::new(), EventCategory::Diplomacy, 1)
                }
                DiplomaticAction::FormAlliance => {
                    countries.form_alliance(&a, &b)?;
                    (Vec::new(), EventCategory::Diplomacy, 3)
                }
                DiplomaticAction::BreakAlliance => {
                    countries.break_alliance(&a, &b)?;
                    (Vec::new(), EventCategory::Diplomacy, 3)
                }
                DiplomaticAction::DeclareWar => {
                    let allies = countries.declare_war(&a, &b)?;
                    (allies, EventCategory::War, 5)
                }
                DiplomaticAction::MakePeace => {
                    countries.make_peace(&a, &b)?;
                    (Vec::new(), EventCategory::War, 4)
                }
                DiplomaticAction::ImposeSanction => {
                    countries.impose_sanction(&a, &b)?;
                    (Vec::new(), EventCategory::Diplomacy, 2)
                }
                DiplomaticAction::LiftSanction => {
                    countries.lift_sanction(&a, &b)?;
                    (Vec::new(), EventCategory::Diplomacy, 2)
                }
            }
        };

        let mut draft = EventDraft::new(category, format!("{a} / {b}: {}", action.label()))
            .importance(importance)
            .country(&a)
            .country(&b);
        if !affected.is_empty() {
            let names: Vec<&str> = affected.iter().map(CountryId::as_str).collect();
            let names = names.join(", ");
            draft = draft.description(format!("Allies of {b} turn against {a}: {names}."));
        }
        self.record(draft);
        info!(action = action.label(), actor = %a, target = %b, "diplomatic action");

        Ok(DiplomacyOutcome {
            action,
            relation: self.countries().relation(&a, &b),
            actor: a,
            target: b,
            affected,
        })
    }

    // --- blocs and trade ---

    pub fn blocs(&self) -> Vec<Bloc> {
        self.world.resource::<WorldBlocs>().iter().cloned().collect()
    }

    /// Founds a bloc; a monetary union moves every member to the founder's currency.
    pub fn create_bloc(
        &mut self,
        name: &str,
        kind: BlocKind,
        founder: &str,
        members: &[String],
    ) -> Result<Bloc> {
        let founder = CountryId::new(founder);
        let members: Vec<CountryId> = members.iter().map(|m| CountryId::new(m.as_str())).collect();
        let year = self.clock().year;
        let bloc = {
            let mut state: SystemState<(
                ResMut<WorldBlocs>,
                ResMut<Countries>,
                ResMut<CurrencyManager>,
            )> = SystemState::new(&mut self.world);
            let (mut blocs, mut countries, mut currencies) = state.get_mut(&mut self.world);
            if kind == BlocKind::MonetaryUnion {
                currencies.get(&countries.get(&founder)?.currency)?;
            }
            let bloc = blocs.create(&countries, name, kind, &founder, &members, year)?;
            if let Some(code) = &bloc.currency {
                adopt_union_currency(&mut countries, &mut currencies, &bloc.members, code)?;
            }
            bloc
        };

        let mut draft = EventDraft::new(EventCategory::Diplomacy, format!("{} founded", bloc.name))
            .description(format!("{} led by {founder}.", kind.label()))
            .importance(3);
        for member in &bloc.members {
            draft = draft.country(member);
        }
        self.record(draft);
        Ok(bloc)
    }

    pub fn join_bloc(&mut self, id: &str, country: &str) -> Result<Bloc> {
        let country = CountryId::new(country);
        let bloc = {
            let mut state: SystemState<(
                ResMut<WorldBlocs>,
                ResMut<Countries>,
                ResMut<CurrencyManager>,
            )> = SystemState::new(&mut self.world);
            let (mut blocs, mut countries, mut currencies) = state.get_mut(&mut self.world);
            if let Some(code) = &blocs.get(id)?.currency {
                currencies.get(code)?;
            }
            let bloc = blocs.join(&countries, id, &country)?.clone();
            if let Some(code) = &bloc.currency {
                adopt_union_currency(&mut countries, &mut currencies, [&country], code)?;
            }
            bloc
        };
        self.record(
            EventDraft::new(
                EventCategory::Diplomacy,
                format!("{country} joins {}", bloc.name),
            )
            .importance(2)
            .country(&country),
        );
        Ok(bloc)
    }

    pub fn leave_bloc(&mut self, id: &str, country: &str) -> Result<LeaveOutcome> {
        let country = CountryId::new(country);
        let name = self.world.resource::<WorldBlocs>().get(id)?.name.clone();
        let outcome = self.world.resource_mut::<WorldBlocs>().leave(id, &country)?;
        let (title, importance) = if outcome.dissolved {
            (format!("{name} dissolves after {country} leaves"), 4)
        } else {
            (format!("{country} leaves {name}"), 2)
        };
        self.record(
            EventDraft::new(EventCategory::Diplomacy, title)
                .importance(importance)
                .country(&country),
        );
        Ok(outcome)
    }

    pub fn bloc_trade(&self, id: &str) -> Result<BlocTrade> {
        let blocs = self.world.resource::<WorldBlocs>();
        let bloc = blocs.get(id)?;
        Ok(BlocTrade {
            bloc: bloc.id.clone(),
            members: bloc.members.iter().cloned().collect(),
            volume: blocs.bloc_trade_volume(self.countries(), id)?,
        })
    }

    pub fn trade_agreements(&self) -> Vec<TradeAgreement> {
        self.world.resource::<TradeLedger>().agreements().to_vec()
    }

    pub fn sign_agreement(&mut self, a: &str, b: &str) -> Result<TradeAgreement> {
        let (a, b) = (CountryId::new(a), CountryId::new(b));
        let year = self.clock().year;
        let agreement = {
            let mut state: SystemState<(ResMut<TradeLedger>, ResMut<Countries>, Res<WorldBlocs>)> =
                SystemState::new(&mut self.world);
            let (mut ledger, mut countries, blocs) = state.get_mut(&mut self.world);
            ledger.sign(&mut countries, &blocs, &a, &b, year)?
        };
        self.record(
            EventDraft::new(EventCategory::Economy, format!("{a} and {b} sign a trade agreement"))
                .description(format!("Expected volume {:.1}.", agreement.volume))
                .importance(2)
                .country(&a)
                .country(&b),
        );
        Ok(agreement)
    }

    // --- currencies and debt ---

    pub fn currencies(&self) -> Vec<Currency> {
        self.world.resource::<CurrencyManager>().iter().cloned().collect()
    }

    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Result<Conversion> {
        self.world.resource::<CurrencyManager>().convert(amount, from, to)
    }

    pub fn devalue(&mut self, code: &str, percent: f64) -> Result<Currency> {
        let currency = {
            let mut state: SystemState<(ResMut<CurrencyManager>, ResMut<Countries>)> =
                SystemState::new(&mut self.world);
            let (mut currencies, mut countries) = state.get_mut(&mut self.world);
            currencies.devalue(&mut countries, code, percent)?;
            currencies.get(code)?.clone()
        };
        let mut draft = EventDraft::new(
            EventCategory::Economy,
            format!("{} devalued by {percent:.0}%", currency.code),
        )
        .importance(3);
        for issuer in &currency.issuers {
            draft = draft.country(issuer);
        }
        self.record(draft);
        Ok(currency)
    }

    pub fn adopt_currency(&mut self, country: &str, code: &str) -> Result<Currency> {
        let country = CountryId::new(country);
        let union = self
            .world
            .resource::<WorldBlocs>()
            .union_currency(&country)
            .map(str::to_string);
        if let Some(union_code) = union.filter(|u| !u.eq_ignore_ascii_case(code)) {
            return Err(HistoriaError::invalid(format!(
                "{country} is bound to {union_code} by a monetary union"
            )));
        }
        let (previous, currency) = {
            let mut state: SystemState<(ResMut<CurrencyManager>, ResMut<Countries>)> =
                SystemState::new(&mut self.world);
            let (mut currencies, mut countries) = state.get_mut(&mut self.world);
            let previous = currencies.adopt(&mut countries, &country, code)?;
            (previous, currencies.get(code)?.clone())
        };
        self.record(
            EventDraft::new(
                EventCategory::Economy,
                format!("{country} switches from {previous} to {}", currency.code),
            )
            .importance(2)
            .country(&country),
        );
        Ok(currency)
    }

    pub fn debt_summary(&self, country: &str) -> Result<DebtSummary> {
        self.world
            .resource::<DebtLedger>()
            .summary(self.countries(), &CountryId::new(country))
    }

    pub fn borrow(
        &mut self,
        country: &str,
        amount: f64,
        creditor: Option<&str>,
    ) -> Result<DebtSummary> {
        let id = CountryId::new(country);
        let creditor = creditor.map(CountryId::new);
        {
            let mut state: SystemState<(ResMut<DebtLedger>, Res<Countries>)> =
                SystemState::new(&mut self.world);
            let (mut debts, countries) = state.get_mut(&mut self.world);
            debts.borrow(&countries, &id, amount, creditor.as_ref())?;
        }
        debug!(country = %id, amount, "debt issued");
        self.debt_summary(country)
    }

    pub fn repay(&mut self, country: &str, amount: f64) -> Result<DebtSummary> {
        let id = CountryId::new(country);
        {
            let mut state: SystemState<(ResMut<DebtLedger>, Res<Countries>)> =
                SystemState::new(&mut self.world);
            let (mut debts, countries) = state.get_mut(&mut self.world);
            debts.repay(&countries, &id, amount)?;
        }
        debug!(country = %id, amount, "debt repaid");
        self.debt_summary(country)
    }

    // --- timeline, achievements, leaders ---

    pub fn timeline(&self, query: &TimelineQuery) -> Vec<TimelineEvent> {
        self.world.resource::<Timeline>().query(query)
    }

    /// Checks the player's achievements now and lists them all.
    pub fn achievements(&mut self) -> AchievementSummary {
        self.world.run_system_once(achievement_system);
        self.world.resource::<AchievementBook>().summary()
    }

    pub fn leaders(&self) -> Vec<Leader> {
        self.world.resource::<LeaderRoster>().iter().cloned().collect()
    }

    pub fn leader(&self, country: &str) -> Result<Leader> {
        let roster = self.world.resource::<LeaderRoster>();
        roster.get(&CountryId::new(country)).cloned()
    }

    pub fn replace_leader(
        &mut self,
        country: &str,
        name: &str,
        traits: Vec<LeaderTrait>,
    ) -> Result<Leader> {
        let id = CountryId::new(country);
        let outgoing = {
            let mut state: SystemState<(ResMut<LeaderRoster>, Res<Countries>)> =
                SystemState::new(&mut self.world);
            let (mut roster, countries) = state.get_mut(&mut self.world);
            roster.replace(&countries, &id, name, traits)?
        };
        let leader = self.leader(country)?;
        self.record(
            EventDraft::new(
                EventCategory::Politics,
                format!("{} replaces {outgoing} in {id}", leader.name),
            )
            .importance(3)
            .country(&id),
        );
        Ok(leader)
    }

    pub fn scenarios(&self) -> Vec<ScenarioInfo> {
        list_scenarios(&self.config().scenarios_dir)
    }

    // --- persistence ---

    pub fn snapshot(&self) -> SaveGame {
        SaveGame {
            version: SAVE_FORMAT_VERSION,
            settings: self.world.resource::<GameSettings>().clone(),
            clock: self.clock().clone(),
            countries: self.countries().clone(),
            espionage: self.world.resource::<EspionageManager>().clone(),
            currencies: self.world.resource::<CurrencyManager>().clone(),
            debts: self.world.resource::<DebtLedger>().clone(),
            blocs: self.world.resource::<WorldBlocs>().clone(),
            trade: self.world.resource::<TradeLedger>().clone(),
            timeline: self.world.resource::<Timeline>().clone(),
            achievements: self.world.resource::<AchievementBook>().clone(),
            leaders: self.world.resource::<LeaderRoster>().clone(),
            scripted: self.world.resource::<ScriptedEvents>().clone(),
        }
    }

    fn restore(&mut self, game: SaveGame) {
        let mut timeline = game.timeline;
        timeline.set_capacity(self.config().timeline_capacity);
        self.world.insert_resource(game.settings);
        self.world.insert_resource(game.clock);
        self.world.insert_resource(game.countries);
        self.world.insert_resource(game.espionage);
        self.world.insert_resource(game.currencies);
        self.world.insert_resource(game.debts);
        self.world.insert_resource(game.blocs);
        self.world.insert_resource(game.trade);
        self.world.insert_resource(timeline);
        self.world.insert_resource(game.achievements);
        self.world.insert_resource(game.leaders);
        self.world.insert_resource(game.scripted);
        self.world.insert_resource(TickCursor::default());
    }

    pub fn save(&self, slot: &str) -> Result<PathBuf> {
        self.store.save(slot, &self.snapshot())
    }

    pub fn load(&mut self, slot: &str) -> Result<WorldSummary> {
        let game = self.store.load(slot)?;
        self.restore(game);
        Ok(self.summary())
    }

    pub fn list_saves(&self) -> Result<Vec<SaveSlotInfo>> {
        self.store.list()
    }

    pub fn delete_save(&self, slot: &str) -> Result<()> {
        self.store.delete(slot)
    }
}

fn adopt_union_currency<'a>(
    countries: &mut Countries,
    currencies: &mut CurrencyManager,
    members: impl IntoIterator<Item = &'a CountryId>,
    code: &str,
) -> Result<()> {
    for member in members {
        if !countries.get(member)?.currency.eq_ignore_ascii_case(code) {
            currencies.adopt(countries, member, code)?;
        }
    }
    Ok(())
}
