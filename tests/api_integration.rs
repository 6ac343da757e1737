//! Handler-level tests: each handler is called directly with its extractors.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tokio::sync::Mutex;

use historia_lite::api::{
    self, AppState, ConvertQuery, CountryRequest, DiplomacyRequest, InvestRequest,
    NewGameRequest, ObserverQuery, RankingQuery, TickRequest,
};
use historia_lite::simulation::{
    CountryId, DiplomaticAction, HistoriaWorld, RankingCategory, SimulationConfig, TimelineQuery,
};
use tempfile::TempDir;

fn state(dir: &TempDir) -> AppState {
    let config = SimulationConfig {
        seed: 7,
        event_chance: 0.0,
        timeline_capacity: 200,
        save_dir: dir.path().join("saves"),
        scenarios_dir: dir.path().join("scenarios"),
    };
    let world = HistoriaWorld::new(config, "modern_2025", None).unwrap();
    Arc::new(Mutex::new(world))
}

#[tokio::test]
async fn test_world_summary_and_tick() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir);

    let Json(summary) = api::world_summary(State(state.clone())).await;
    assert_eq!(summary.player, CountryId::new("FRA"));

    let Json(report) = api::tick(State(state.clone()), Json(TickRequest { months: 3 }))
        .await
        .unwrap();
    assert_eq!(report.months_advanced, 3);
    assert_eq!(report.month, 4);

    let err = api::tick(State(state.clone()), Json(TickRequest { months: 500 }))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tick_body_defaults_to_one_month() {
    let req: TickRequest = serde_json::from_str("{}").unwrap();
    assert_eq!(req.months, 1);
}

#[tokio::test]
async fn test_unknown_country_maps_to_not_found() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir);

    let err = api::country(
        State(state.clone()),
        Path("XXX".to_string()),
        Query(ObserverQuery::default()),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_observer_defaults_to_player() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir);

    let Json(by_default) = api::country(
        State(state.clone()),
        Path("usa".to_string()),
        Query(ObserverQuery::default()),
    )
    .await
    .unwrap();
    let Json(explicit) = api::country(
        State(state.clone()),
        Path("USA".to_string()),
        Query(ObserverQuery {
            observer: Some("FRA".to_string()),
        }),
    )
    .await
    .unwrap();
    assert_eq!(by_default.intel_score, explicit.intel_score);
    assert_eq!(by_default.gdp, explicit.gdp);

    let Json(views) = api::list_countries(State(state.clone()), Query(ObserverQuery::default()))
        .await
        .unwrap();
    assert_eq!(views.len(), 12);
}

#[tokio::test]
async fn test_invest_then_rankings() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir);

    let Json(report) = api::invest_intel(
        State(state.clone()),
        Json(InvestRequest {
            observer: "FRA".to_string(),
            target: "RUS".to_string(),
            points: 20,
        }),
    )
    .await
    .unwrap();
    assert_eq!(report.breakdown.investment, 20);

    let Json(ranking) = api::rankings(
        State(state.clone()),
        Query(RankingQuery {
            category: RankingCategory::Military,
            observer: None,
        }),
    )
    .await
    .unwrap();
    assert_eq!(ranking.len(), 12);
    assert!(ranking.iter().enumerate().all(|(i, entry)| entry.rank == i + 1));
}

#[tokio::test]
async fn test_diplomacy_rejection_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir);

    let err = api::diplomacy(
        State(state.clone()),
        Json(DiplomacyRequest {
            action: DiplomaticAction::FormAlliance,
            actor: "FRA".to_string(),
            target: "DEU".to_string(),
            delta: None,
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    let body = r#"{"action":"impose_sanction","actor":"fra","target":"chn"}"#;
    let request: DiplomacyRequest = serde_json::from_str(body).unwrap();
    let Json(outcome) = api::diplomacy(State(state.clone()), Json(request)).await.unwrap();
    assert_eq!(outcome.relation, -10);
}

#[tokio::test]
async fn test_bloc_join_and_currency_conversion() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir);

    let Json(bloc) = api::join_bloc(
        State(state.clone()),
        Path("brics".to_string()),
        Json(CountryRequest {
            country: "NGA".to_string(),
        }),
    )
    .await
    .unwrap();
    assert!(bloc.members.contains(&CountryId::new("NGA")));

    let Json(trade) = api::bloc_trade(State(state.clone()), Path("brics".to_string()))
        .await
        .unwrap();
    assert_eq!(trade.members.len(), 5);
    assert!(trade.volume > 0.0);

    let Json(conversion) = api::convert_currency(
        State(state.clone()),
        Query(ConvertQuery {
            from: "EUR".to_string(),
            to: "USD".to_string(),
            amount: 100.0,
        }),
    )
    .await
    .unwrap();
    assert!((conversion.result - 108.0).abs() < 1e-9);

    let err = api::bloc_trade(State(state.clone()), Path("nato".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_new_game_and_saves() {
    let dir = TempDir::new().unwrap();
    let state = state(&dir);

    let Json(summary) = api::new_game(
        State(state.clone()),
        Json(NewGameRequest {
            scenario: Some("cold_war_1962".to_string()),
            player: None,
        }),
    )
    .await
    .unwrap();
    assert_eq!(summary.player, CountryId::new("USA"));

    let Json(saved) = api::save_game(State(state.clone()), Path("crisis".to_string()))
        .await
        .unwrap();
    assert!(saved.path.is_file());

    let Json(slots) = api::list_saves(State(state.clone())).await.unwrap();
    assert_eq!(slots[0].scenario, "cold_war_1962");

    let status = api::delete_save(State(state.clone()), Path("crisis".to_string()))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let err = api::load_game(State(state.clone()), Path("crisis".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);

    let Json(events) = api::timeline(
        State(state.clone()),
        Query(TimelineQuery {
            country: Some("USA".into()),
            ..Default::default()
        }),
    )
    .await;
    assert!(!events.is_empty());
}
