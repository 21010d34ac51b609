//! # plannerd: house mode planner daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialize tracing
//! - Open the schedule store selected in the configuration
//! - Construct the schedule service and the sync loop
//! - Build the axum router and serve it
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use planner_adapter_home_assistant::HomeAssistantSink;
use planner_adapter_http_axum::state::AppState;
use planner_adapter_storage_json::JsonFileScheduleStore;
use planner_adapter_storage_sqlite_sqlx::SqliteScheduleStore;
use planner_app::ports::{ScheduleStore, SystemClock};
use planner_app::services::ScheduleService;
use planner_app::sync_loop::SyncLoop;

use crate::config::{Config, StorageBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .with_target(true)
        .init();

    match config.storage.backend {
        StorageBackend::Sqlite => {
            let db = planner_adapter_storage_sqlite_sqlx::Config {
                database_url: config.storage.database_url.clone(),
            }
            .build()
            .await?;
            run(config, SqliteScheduleStore::new(db.pool().clone())).await
        }
        StorageBackend::Json => {
            let store = JsonFileScheduleStore::new(&config.storage.json_path);
            run(config, store).await
        }
    }
}

async fn run<S>(config: Config, store: S) -> Result<(), Box<dyn std::error::Error>>
where
    S: ScheduleStore + Send + Sync + 'static,
{
    let vocabulary = Arc::new(config.vocabulary()?);
    let holidays = Arc::new(config.holidays()?);
    let store = Arc::new(store);

    let schedule_service = Arc::new(ScheduleService::new(
        Arc::clone(&store),
        Arc::clone(&vocabulary),
        Arc::clone(&holidays),
    ));
    if config.schedule.seed_default_phases {
        schedule_service.seed_defaults_if_empty().await?;
    }

    let sink = HomeAssistantSink::new(config.home_assistant.clone())?;
    let sync_loop = SyncLoop::new(
        store,
        sink,
        SystemClock,
        vocabulary,
        holidays,
        config.sync.settings(),
    );
    let sync_status = sync_loop.subscribe();
    let task = if config.sync.enabled {
        sync_loop.start(config.sync.interval()).await
    } else {
        sync_loop.disable("sync disabled in configuration");
        None
    };

    let state = AppState::from_arcs(schedule_service, sync_status);
    let app = planner_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "plannerd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(task) = task {
        task.stop().await;
    }
    tracing::info!("plannerd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "unable to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
