mod clock;
mod config;
mod error;
mod routes;
mod services;
mod state;
mod store;

use std::sync::Arc;

use crate::clock::SystemClock;
use crate::config::AppConfig;
use crate::store::FileStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env().expect("invalid configuration");
    let store = FileStore::open(config.data_dir.clone())
        .await
        .expect("data directory init failed");
    tracing::info!(data_dir = %store.dir().display(), "local store opened");

    let clock = SystemClock::new(config.utc_offset);
    let state = state::AppState::new(Arc::new(store), Arc::new(clock), &config.profile_pet_id);

    if config.seed_demo {
        match state.pets.seed().await {
            Ok(true) => tracing::info!("demo pet seeded"),
            Ok(false) => {}
            Err(e) => tracing::error!(error = %e, "demo seed failed"),
        }
    }

    // A remembered session that fails to load leaves the user signed out.
    if let Err(e) = state.auth.restore().await {
        tracing::warn!(error = %e, "session restore failed");
    }
    if let Err(e) = state.profile.lock().await.load(&state.pets).await {
        tracing::warn!(error = %e, "initial profile load failed");
    }

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "healthy-paws listening");
    axum::serve(listener, app).await.expect("server failed");
}
