//! API server entry point.

use api::config::{Config, LogFormat};
use domain::InMemoryEventBus;
use metrics_exporter_prometheus::PrometheusHandle;
use relay::OutboxRelay;
use sqlx::postgres::PgPoolOptions;
use store::{InMemorySeatStore, PostgresSeatStore, SeatStore};
use tokio::signal;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Serves the API over `store` until shutdown, with the outbox relay running
/// alongside.
async fn serve<S>(config: Config, store: S, metrics_handle: PrometheusHandle)
where
    S: SeatStore + Clone + 'static,
{
    let bus = InMemoryEventBus::new();
    let state = api::create_default_state(store.clone(), bus.clone());
    let app = api::create_app(state, metrics_handle);

    // Outbox relay for events the post-commit publish could not deliver
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let relay = OutboxRelay::new(store, bus);
    let interval = config.relay_interval;
    let batch = config.relay_batch_size;
    let relay_task = tokio::spawn(async move {
        relay.run(interval, batch, shutdown_rx).await;
    });

    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    let _ = shutdown_tx.send(true);
    if let Err(e) = relay_task.await {
        tracing::error!(error = %e, "outbox relay task failed");
    }

    tracing::info!("server shut down gracefully");
}

#[tokio::main]
async fn main() {
    // 1. Load configuration and initialize tracing
    let config = Config::from_env();
    init_tracing(&config);

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Pick the seat store and serve
    match config.database_url.clone() {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(&url)
                .await
                .expect("failed to connect to PostgreSQL");
            let store = PostgresSeatStore::new(pool);
            store
                .run_migrations()
                .await
                .expect("failed to run migrations");
            tracing::info!("using PostgreSQL seat store");
            serve(config, store, metrics_handle).await;
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory seat store");
            serve(config, InMemorySeatStore::new(), metrics_handle).await;
        }
    }
}
