//! LMS Server - Library Management Record Service

use std::{net::SocketAddr, sync::Arc, time::Duration};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lms_server::{
    api,
    config::{AppConfig, LoggingConfig, StoreBackend},
    repository::Repository,
    services::Services,
    store::{Connector, MemoryStore, MongoStore, RecordStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    init_tracing(&config.logging);

    tracing::info!("Starting LMS Server v{}", env!("CARGO_PKG_VERSION"));

    // Open the store and start supervising its connection
    let store: Arc<dyn RecordStore> = match config.database.backend {
        StoreBackend::Mongodb => {
            Arc::new(MongoStore::new(&config.database.url, &config.database.name).await?)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; records are lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let connector = Connector::new();
    let connection = connector.monitor();
    let heartbeat = Duration::from_secs(config.database.heartbeat_secs.max(1));
    connector.spawn(store.clone(), heartbeat);

    // Do not accept traffic before the store answers
    if !connection.is_connected() {
        tracing::info!("Waiting for store connection");
    }
    connection.ready().await;

    let repository = Repository::new(store);
    repository.ensure_indexes().await?;

    // Create application state
    let state = AppState {
        services: Arc::new(Services::new(repository)),
        connection,
    };

    // Build router
    let app = api::create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("lms_server={},tower_http=debug", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
