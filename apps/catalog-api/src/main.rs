use axum_helpers::{cors_layer_from_env, create_production_app};
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod api;
mod app;
mod config;
mod openapi;
mod seed;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);
    observability::init_metrics()?;

    info!(
        environment = config.environment.as_str(),
        simulate_latency = config.features.simulate_latency,
        simulate_errors = config.features.simulate_errors,
        "Starting {} v{}",
        config.app.name,
        config.app.version
    );

    let server = config.server.clone();
    let cors = cors_layer_from_env(&config.environment)?;
    let state = AppState::from_config(config).await?;
    let router = app::build_router(&state, cors);

    create_production_app(router, &server, async move {
        if state.db.is_some() {
            info!("Closing MongoDB connections");
        }
        drop(state);
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}
