//! JSON-over-HTTP router around the shared simulation.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::error::HistoriaError;
use crate::simulation::{
    AchievementSummary, Bloc, BlocKind, BlocTrade, Conversion, CountryView, Currency,
    DebtSummary, DiplomacyOutcome, DiplomaticAction, HistoriaWorld, IntelReport, Leader,
    LeaderTrait, LeaveOutcome, OperationOutcome, RankingCategory, RankingEntry, SaveSlotInfo,
    ScenarioInfo, TickReport, TimelineEvent, TimelineQuery, TradeAgreement, WorldSummary,
};

pub type AppState = Arc<Mutex<HistoriaWorld>>;

/// Domain error rendered as `{"error": "..."}` with a matching status.
#[derive(Debug)]
pub struct ApiError(pub HistoriaError);

impl From<HistoriaError> for ApiError {
    fn from(err: HistoriaError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            err if err.is_not_found() => StatusCode::NOT_FOUND,
            HistoriaError::InvalidAction(_) | HistoriaError::IncompatibleSave { .. } => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        } else {
            debug!(status = status.as_u16(), error = %self.0, "request rejected");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

// --- request bodies and query strings ---

#[derive(Debug, Deserialize)]
pub struct NewGameRequest {
    pub scenario: Option<String>,
    pub player: Option<String>,
}

fn one_month() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct TickRequest {
    #[serde(default = "one_month")]
    pub months: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct ObserverQuery {
    pub observer: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RankingQuery {
    #[serde(default)]
    pub category: RankingCategory,
    pub observer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InvestRequest {
    pub observer: String,
    pub target: String,
    pub points: i32,
}

#[derive(Debug, Deserialize)]
pub struct OperationRequest {
    pub observer: String,
    pub target: String,
}

#[derive(Debug, Deserialize)]
pub struct DiplomacyRequest {
    pub action: DiplomaticAction,
    pub actor: String,
    pub target: String,
    pub delta: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBlocRequest {
    pub name: String,
    pub kind: BlocKind,
    pub founder: String,
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CountryRequest {
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub struct SignRequest {
    pub a: String,
    pub b: String,
}

#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct DevalueRequest {
    pub percent: f64,
}

#[derive(Debug, Deserialize)]
pub struct DebtRequest {
    pub amount: f64,
    pub creditor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceLeaderRequest {
    pub name: String,
    #[serde(default)]
    pub traits: Vec<LeaderTrait>,
}

#[derive(Debug, Serialize)]
pub struct SavedSlot {
    pub slot: String,
    pub path: PathBuf,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/world", get(world_summary))
        .route("/api/world/new", post(new_game))
        .route("/api/world/tick", post(tick))
        .route("/api/countries", get(list_countries))
        .route("/api/countries/:id", get(country))
        .route("/api/countries/:id/intel", get(intel_report))
        .route("/api/espionage/invest", post(invest_intel))
        .route("/api/espionage/operation", post(run_operation))
        .route("/api/rankings", get(rankings))
        .route("/api/diplomacy", post(diplomacy))
        .route("/api/blocs", get(list_blocs).post(create_bloc))
        .route("/api/blocs/:id/join", post(join_bloc))
        .route("/api/blocs/:id/leave", post(leave_bloc))
        .route("/api/blocs/:id/trade", get(bloc_trade))
        .route("/api/trade/agreements", get(list_agreements).post(sign_agreement))
        .route("/api/currencies", get(list_currencies))
        .route("/api/currencies/convert", get(convert_currency))
        .route("/api/currencies/:code/devalue", post(devalue_currency))
        .route("/api/currencies/:code/adopt", post(adopt_currency))
        .route("/api/debt/:id", get(debt_summary))
        .route("/api/debt/:id/borrow", post(borrow))
        .route("/api/debt/:id/repay", post(repay))
        .route("/api/timeline", get(timeline))
        .route("/api/achievements", get(achievements))
        .route("/api/leaders", get(list_leaders))
        .route("/api/leaders/:country", get(leader))
        .route("/api/leaders/:country/replace", post(replace_leader))
        .route("/api/scenarios", get(list_scenarios))
        .route("/api/saves", get(list_saves))
        .route("/api/saves/:slot", post(save_game).delete(delete_save))
        .route("/api/saves/:slot/load", post(load_game))
        .with_state(state)
}

// --- world ---

pub async fn world_summary(State(state): State<AppState>) -> Json<WorldSummary> {
    Json(state.lock().await.summary())
}

pub async fn new_game(
    State(state): State<AppState>,
    Json(req): Json<NewGameRequest>,
) -> ApiResult<WorldSummary> {
    let mut world = state.lock().await;
    let scenario = match req.scenario {
        Some(id) => id,
        None => world.summary().scenario,
    };
    Ok(Json(world.new_game(&scenario, req.player.as_deref())?))
}

pub async fn tick(
    State(state): State<AppState>,
    Json(req): Json<TickRequest>,
) -> ApiResult<TickReport> {
    Ok(Json(state.lock().await.advance(req.months)?))
}

// --- fog of war ---

pub async fn list_countries(
    State(state): State<AppState>,
    Query(q): Query<ObserverQuery>,
) -> ApiResult<Vec<CountryView>> {
    Ok(Json(state.lock().await.views(q.observer.as_deref())?))
}

pub async fn country(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<ObserverQuery>,
) -> ApiResult<CountryView> {
    Ok(Json(state.lock().await.view(&id, q.observer.as_deref())?))
}

pub async fn intel_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<ObserverQuery>,
) -> ApiResult<IntelReport> {
    Ok(Json(state.lock().await.intel_report(&id, q.observer.as_deref())?))
}

pub async fn invest_intel(
    State(state): State<AppState>,
    Json(req): Json<InvestRequest>,
) -> ApiResult<IntelReport> {
    let mut world = state.lock().await;
    Ok(Json(world.invest_intel(&req.observer, &req.target, req.points)?))
}

pub async fn run_operation(
    State(state): State<AppState>,
    Json(req): Json<OperationRequest>,
) -> ApiResult<OperationOutcome> {
    let mut world = state.lock().await;
    Ok(Json(world.run_operation(&req.observer, &req.target)?))
}

pub async fn rankings(
    State(state): State<AppState>,
    Query(q): Query<RankingQuery>,
) -> ApiResult<Vec<RankingEntry>> {
    Ok(Json(state.lock().await.rankings(q.category, q.observer.as_deref())?))
}

// --- diplomacy, blocs, trade ---

pub async fn diplomacy(
    State(state): State<AppState>,
    Json(req): Json<DiplomacyRequest>,
) -> ApiResult<DiplomacyOutcome> {
    let mut world = state.lock().await;
    Ok(Json(world.diplomacy(req.action, &req.actor, &req.target, req.delta)?))
}

pub async fn list_blocs(State(state): State<AppState>) -> Json<Vec<Bloc>> {
    Json(state.lock().await.blocs())
}

pub async fn create_bloc(
    State(state): State<AppState>,
    Json(req): Json<CreateBlocRequest>,
) -> ApiResult<Bloc> {
    let mut world = state.lock().await;
    Ok(Json(world.create_bloc(&req.name, req.kind, &req.founder, &req.members)?))
}

pub async fn join_bloc(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CountryRequest>,
) -> ApiResult<Bloc> {
    Ok(Json(state.lock().await.join_bloc(&id, &req.country)?))
}

pub async fn leave_bloc(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CountryRequest>,
) -> ApiResult<LeaveOutcome> {
    Ok(Json(state.lock().await.leave_bloc(&id, &req.country)?))
}

pub async fn bloc_trade(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<BlocTrade> {
    Ok(Json(state.lock().await.bloc_trade(&id)?))
}

pub async fn list_agreements(State(state): State<AppState>) -> Json<Vec<TradeAgreement>> {
    Json(state.lock().await.trade_agreements())
}

pub async fn sign_agreement(
    State(state): State<AppState>,
    Json(req): Json<SignRequest>,
) -> ApiResult<TradeAgreement> {
    Ok(Json(state.lock().await.sign_agreement(&req.a, &req.b)?))
}

// --- currencies and debt ---

pub async fn list_currencies(State(state): State<AppState>) -> Json<Vec<Currency>> {
    Json(state.lock().await.currencies())
}

pub async fn convert_currency(
    State(state): State<AppState>,
    Query(q): Query<ConvertQuery>,
) -> ApiResult<Conversion> {
    Ok(Json(state.lock().await.convert(q.amount, &q.from, &q.to)?))
}

pub async fn devalue_currency(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<DevalueRequest>,
) -> ApiResult<Currency> {
    Ok(Json(state.lock().await.devalue(&code, req.percent)?))
}

pub async fn adopt_currency(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(req): Json<CountryRequest>,
) -> ApiResult<Currency> {
    Ok(Json(state.lock().await.adopt_currency(&req.country, &code)?))
}

pub async fn debt_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DebtSummary> {
    Ok(Json(state.lock().await.debt_summary(&id)?))
}

pub async fn borrow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<DebtRequest>,
) -> ApiResult<DebtSummary> {
    let mut world = state.lock().await;
    Ok(Json(world.borrow(&id, req.amount, req.creditor.as_deref())?))
}

pub async fn repay(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<DebtRequest>,
) -> ApiResult<DebtSummary> {
    Ok(Json(state.lock().await.repay(&id, req.amount)?))
}

// --- history and people ---

pub async fn timeline(
    State(state): State<AppState>,
    Query(q): Query<TimelineQuery>,
) -> Json<Vec<TimelineEvent>> {
    Json(state.lock().await.timeline(&q))
}

pub async fn achievements(State(state): State<AppState>) -> Json<AchievementSummary> {
    Json(state.lock().await.achievements())
}

pub async fn list_leaders(State(state): State<AppState>) -> Json<Vec<Leader>> {
    Json(state.lock().await.leaders())
}

pub async fn leader(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> ApiResult<Leader> {
    Ok(Json(state.lock().await.leader(&country)?))
}

pub async fn replace_leader(
    State(state): State<AppState>,
    Path(country): Path<String>,
    Json(req): Json<ReplaceLeaderRequest>,
) -> ApiResult<Leader> {
    let mut world = state.lock().await;
    Ok(Json(world.replace_leader(&country, &req.name, req.traits)?))
}

pub async fn list_scenarios(State(state): State<AppState>) -> Json<Vec<ScenarioInfo>> {
    Json(state.lock().await.scenarios())
}

// --- saves ---

pub async fn list_saves(State(state): State<AppState>) -> ApiResult<Vec<SaveSlotInfo>> {
    Ok(Json(state.lock().await.list_saves()?))
}

pub async fn save_game(
    State(state): State<AppState>,
    Path(slot): Path<String>,
) -> ApiResult<SavedSlot> {
    let path = state.lock().await.save(&slot)?;
    Ok(Json(SavedSlot { slot, path }))
}

pub async fn load_game(
    State(state): State<AppState>,
    Path(slot): Path<String>,
) -> ApiResult<WorldSummary> {
    Ok(Json(state.lock().await.load(&slot)?))
}

pub async fn delete_save(
    State(state): State<AppState>,
    Path(slot): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.lock().await.delete_save(&slot)?;
    Ok(StatusCode::NO_CONTENT)
}
