//! EV booking engine service shell
//!
//! Loads configuration, wires the repositories, service and sweeper, and
//! runs the lifecycle sweeps until shutdown. An API layer mounts
//! [`BookingService`] on top of the same wiring.

use std::sync::Arc;

use tracing::{error, info};

use ev_booking::shared::shutdown::listen_for_shutdown_signals;
use ev_booking::{
    create_event_bus, default_config_path, start_completion_task, start_expiry_task, AppConfig,
    BookingService, BookingSweeper, InMemoryBookingRepository, InMemoryStationRepository,
    ShutdownSignal, SystemClock,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("EV_BOOKING_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let config = match AppConfig::load(&config_path) {
        Ok(cfg) => {
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

    info!("Starting EV booking engine...");

    // ── Wiring ─────────────────────────────────────────────────
    let bookings = Arc::new(InMemoryBookingRepository::new());
    let stations = Arc::new(InMemoryStationRepository::new());
    let clock = Arc::new(SystemClock);
    let event_bus = create_event_bus();

    let _service = Arc::new(BookingService::new(
        bookings.clone(),
        stations,
        clock.clone(),
        event_bus.clone(),
        config.booking.clone(),
    ));

    // ── Background sweeps ──────────────────────────────────────
    let shutdown = ShutdownSignal::new();
    let sweeper = Arc::new(BookingSweeper::new(
        bookings,
        clock,
        event_bus,
        config.booking.clone(),
    ));
    start_expiry_task(sweeper.clone(), shutdown.clone());
    start_completion_task(sweeper, shutdown.clone());

    tokio::spawn(listen_for_shutdown_signals(shutdown.clone()));

    info!(
        payment_timeout_minutes = config.booking.payment_timeout_minutes,
        cancellation_deadline_hours = config.booking.cancellation_deadline_hours,
        "Booking engine running"
    );

    shutdown.wait().await;
    info!("Booking engine stopped");
    Ok(())
}
