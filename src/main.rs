use adtrack::api::{self, AppState};
use adtrack::config::{Config, StoreBackend};
use adtrack::repositories::{EventStore, JsonFileStore, MemoryStore};

use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adtrack=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting adtrack v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let store: Arc<dyn EventStore> = match config.store_backend {
        StoreBackend::File => {
            info!("Recording events to {}", config.data_file.display());
            Arc::new(JsonFileStore::new(&config.data_file))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory event store; events are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    info!(
        "Earnings policy {:?}, {} configured rates, fallback {:.2}",
        config.earnings_policy,
        config.rates.len(),
        config.rates.fallback()
    );

    let app = api::build_router(AppState::new(&config, store))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.bind_addr();
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
