use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::sync::{Mutex, Notify};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use historia_lite::api;
use historia_lite::config::ServerConfig;
use historia_lite::simulation::HistoriaWorld;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("historia_lite=info,tower_http=warn")),
        )
        .init();

    let config = ServerConfig::parse();
    let world = HistoriaWorld::new(
        config.simulation_config(),
        &config.scenario,
        config.player.as_deref(),
    )
    .with_context(|| format!("failed to start scenario '{}'", config.scenario))?;

    let state: api::AppState = Arc::new(Mutex::new(world));
    let shutdown_notify = Arc::new(Notify::new());

    // Optional real-time clock; the API can always advance time by hand.
    let ticker = config.tick_interval().map(|period| {
        let state = state.clone();
        let notify = shutdown_notify.clone();
        info!(period_ms = period.as_millis() as u64, "auto-tick enabled");
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let report = state.lock().await.tick();
                        debug!(
                            year = report.year,
                            month = report.month,
                            events = report.events.len(),
                            "auto tick"
                        );
                    },
                    _ = notify.notified() => break,
                }
            }
        })
    });

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(addr = %config.bind, scenario = %config.scenario, "historia lite listening");

    let notify_for_shutdown = shutdown_notify.clone();
    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
            notify_for_shutdown.notify_one();
        })
        .await
        .context("http server failed")?;

    if let Some(handle) = ticker {
        handle.await.context("auto-tick task panicked")?;
    }
    info!("historia lite stopped");
    Ok(())
}
