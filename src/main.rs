// Main entry point - Dependency injection, CLI and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::{Router, routing::get};
use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::estimation_service::EstimationService;
use crate::application::history_service::{DEFAULT_HISTORY_POINTS, HistoryService};
use crate::application::indicator_light::IndicatorLight;
use crate::application::indicator_service::IndicatorService;
use crate::application::polling_service::{PollingControl, PollingService};
use crate::infrastructure::config::{AppConfig, DEFAULT_CONFIG_PATH, load_app_config};
use crate::infrastructure::csv_store::CsvEmissionStore;
use crate::infrastructure::log_light::LogLight;
use crate::infrastructure::openweather_client::OpenWeatherClient;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    archive_history, get_control, get_history, get_snapshot, health_check, put_control,
};

#[derive(Parser)]
#[command(name = "co2-ampel", version, about = "Estimates the CO2 intensity of the grid from live weather")]
struct Cli {
    /// Config file, extension optional
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the polling loop, the indicator and the HTTP API (default)
    Serve,
    /// Run a single estimation cycle and print it
    Once,
    /// Print the latest stored records
    History {
        #[arg(long, default_value_t = DEFAULT_HISTORY_POINTS)]
        points: usize,
    },
    /// Move the stored history into a backup file
    Archive,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = load_app_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(CsvEmissionStore::new(config.store.path.clone()));
    let history_service = HistoryService::new(repository.clone());

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, repository, history_service).await,
        Command::Once => {
            let estimation = estimation_service(&config, repository)?;
            let snapshot = estimation.run_cycle().await?;
            let light = LogLight::new(config.indicator.clone());
            IndicatorService::new(Arc::new(light)).apply(&snapshot)?;

            let mix = snapshot.mix;
            println!("time:         {}", snapshot.timestamp.format("%Y-%m-%d %H:%M:%S"));
            println!("onshore:      {:.2} GW", mix.onshore);
            println!("offshore:     {:.2} GW", mix.offshore);
            println!("solar:        {:.2} GW", mix.solar);
            println!("conventional: {:.2} GW", mix.conventional);
            println!("total:        {:.2} GW", mix.total);
            println!("emission:     {:.1} gCO2/kWh", snapshot.g_co2_per_kwh);
            Ok(())
        }
        Command::History { points } => {
            let series = history_service.latest(points).await?;
            println!("time,onshore,offshore,solar,conventional,total,gCO2_per_kWh");
            for i in 0..series.len() {
                println!(
                    "{},{:.3},{:.3},{:.3},{:.3},{:.3},{:.1}",
                    series.time[i].format("%Y-%m-%d %H:%M:%S"),
                    series.onshore[i],
                    series.offshore[i],
                    series.solar[i],
                    series.conventional[i],
                    series.total[i],
                    series.g_co2_per_kwh[i]
                );
            }
            Ok(())
        }
        Command::Archive => {
            let backup = history_service.archive().await?;
            println!("{}", backup.display());
            Ok(())
        }
    }
}

fn estimation_service(
    config: &AppConfig,
    repository: Arc<CsvEmissionStore>,
) -> anyhow::Result<EstimationService> {
    let api_key = config.weather.resolve_api_key()?;
    let weather = Arc::new(OpenWeatherClient::new(&config.weather, api_key)?);

    Ok(EstimationService::new(
        weather,
        repository,
        config.sites.clone(),
        config.estimation.clone(),
        config.indicator.clone(),
    ))
}

async fn serve(
    config: AppConfig,
    repository: Arc<CsvEmissionStore>,
    history_service: HistoryService,
) -> anyhow::Result<()> {
    tracing::info!("Appending records to {}", repository.path().display());

    // Create services (application layer)
    let estimation = estimation_service(&config, repository)?;
    let polling_service = PollingService::new(
        estimation,
        PollingControl {
            running: config.polling.autostart,
            interval_minutes: config.polling.interval_minutes,
        },
    );

    let light = Arc::new(LogLight::new(config.indicator.clone()));
    let indicator_service = IndicatorService::new(light.clone());

    let snapshots = polling_service.subscribe();
    let indicator_task = tokio::spawn(async move { indicator_service.run(snapshots).await });
    let poller = polling_service.clone();
    let polling_task = tokio::spawn(async move { poller.run().await });

    // Create application state
    let state = Arc::new(AppState {
        polling_service,
        history_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/snapshot", get(get_snapshot))
        .route("/history", get(get_history))
        .route("/control", get(get_control).put(put_control))
        .route("/archive", axum::routing::post(archive_history))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    tracing::info!("Starting co2-ampel service on {}", config.server.bind);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    polling_task.abort();
    indicator_task.abort();
    light.clear()?;
    tracing::info!("Stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
