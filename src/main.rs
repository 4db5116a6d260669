//!
//! StayHaven booking service: REST API for vacation rental bookings.
//! Reads configuration from TOML file (~/.config/stayhaven/config.toml).

use std::sync::Arc;
use std::time::{Duration, Instant};

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use stayhaven::application::services::{BookingService, BookingServiceConfig};
use stayhaven::config::AppConfig;
use stayhaven::domain::property::PropertySnapshot;
use stayhaven::infrastructure::database::migrator::Migrator;
use stayhaven::infrastructure::{InMemoryPropertyDirectory, SandboxPaymentProcessor};
use stayhaven::notifications::{LogNotifier, NotificationDispatcher};
use stayhaven::shared::shutdown::ShutdownCoordinator;
use stayhaven::{
    create_api_router, default_config_path, init_database, DatabaseConfig, SeaOrmBookingRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("STAYHAVEN_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting StayHaven booking service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus metrics recorder: {}", e))?;
    info!("Prometheus metrics recorder installed");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.url.clone(),
    };
    info!("Database: {}", db_config.url);

    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Wire up services ───────────────────────────────────────
    let bookings = Arc::new(SeaOrmBookingRepository::new(db.clone()));

    let properties = Arc::new(InMemoryPropertyDirectory::new());
    for seed in &app_cfg.properties {
        properties.upsert(PropertySnapshot::from(seed));
    }
    info!("Loaded {} properties from config", properties.len());

    let payments = Arc::new(SandboxPaymentProcessor::new());
    let notifications = NotificationDispatcher::new(Arc::new(LogNotifier));

    let service = Arc::new(BookingService::new(
        bookings,
        properties,
        payments,
        notifications,
        BookingServiceConfig {
            rates: (&app_cfg.pricing).into(),
            payment_timeout: Duration::from_secs(app_cfg.payment.timeout_secs),
        },
    ));

    // ── Shutdown coordination ──────────────────────────────────
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();
    shutdown.start_signal_listener();

    // ── REST API server ────────────────────────────────────────
    let api_router = create_api_router(
        service,
        db.clone(),
        prometheus_handle,
        Arc::new(Instant::now()),
    );

    let api_addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    let api_shutdown = shutdown_signal.clone();
    axum::serve(
        listener,
        api_router.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        api_shutdown.wait().await;
        info!("REST API server received shutdown signal");
    })
    .await?;

    // ── Final cleanup ──────────────────────────────────────────
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("StayHaven booking service shutdown complete");
    Ok(())
}
