//! Barberflow server binary.
//!
//! Wires the in-memory store, event bus, broadcast hub, and email
//! notifier behind the REST and WebSocket surface, then serves until
//! SIGINT or SIGTERM.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use barberflow::adapters::email::{BookingNotifier, NoopMailer, ResendMailer};
use barberflow::adapters::events::{
    IdempotentHandler, InMemoryEventBus, InMemoryProcessedEventStore,
};
use barberflow::adapters::http::{api_router, AppState};
use barberflow::adapters::realtime::{BroadcastHub, RealtimeState};
use barberflow::adapters::store::InMemoryStore;
use barberflow::application::{
    AppointmentService, CatalogService, EventProducer, InventoryService, SalesService,
    ShopService, UserService,
};
use barberflow::config::AppConfig;
use barberflow::domain::events::{EventKind, ALL_EVENT_KINDS};
use barberflow::ports::{EventSubscriber, Mailer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let store = Arc::new(InMemoryStore::default());
    let bus = Arc::new(InMemoryEventBus::new());

    // Fan every published event out to connected WebSocket sessions.
    let hub = Arc::new(BroadcastHub::new(config.realtime.queue_capacity));
    bus.subscribe_all(ALL_EVENT_KINDS, hub.clone());

    // Booking notifications, deduplicated by event id so a redelivered
    // event never emails the shop twice.
    let mailer: Arc<dyn Mailer> = if config.email.is_enabled() {
        Arc::new(ResendMailer::new(&config.email))
    } else {
        tracing::info!("no Resend API key configured, booking emails disabled");
        Arc::new(NoopMailer)
    };
    let notifier = BookingNotifier::new(store.clone(), mailer);
    let processed = Arc::new(InMemoryProcessedEventStore::new());
    bus.subscribe(
        EventKind::AppointmentUpdate,
        Arc::new(IdempotentHandler::new(notifier, processed)),
    );

    let producer = EventProducer::new(bus.clone());
    let state = AppState {
        appointments: Arc::new(AppointmentService::new(store.clone(), producer.clone())),
        users: Arc::new(UserService::new(store.clone(), producer.clone())),
        catalog: Arc::new(CatalogService::new(store.clone(), producer.clone())),
        inventory: Arc::new(InventoryService::new(store.clone(), producer.clone())),
        sales: Arc::new(SalesService::new(
            store.clone(),
            store.clone(),
            producer.clone(),
        )),
        shop: Arc::new(ShopService::new(store.clone(), producer)),
    };
    let realtime = RealtimeState::new(hub.clone(), config.realtime.heartbeat_timeout());

    let app = api_router(state, realtime, &config.server);
    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "barberflow listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Closes every session queue so clients reconnect and resync
    // against whatever comes up next.
    hub.shutdown().await;
    tracing::info!("shutdown complete");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone()));
    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => tracing::error!(error = %err, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
