use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use overtime_engine::api::{AppState, create_router};
use overtime_engine::config::ConfigLoader;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let use_json = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()) == "json";

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,overtime_engine=debug".into());

    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let config_dir =
        std::env::var("OVERTIME_CONFIG_DIR").unwrap_or_else(|_| "./config/default".to_string());
    let config = ConfigLoader::load(&config_dir).map_err(|e| {
        tracing::error!(config_dir = %config_dir, "Configuration error: {}", e);
        e
    })?;

    let bind_address = std::env::var("BIND_ADDRESS")
        .unwrap_or_else(|_| config.server().bind_address.clone());

    tracing::info!(
        config_dir = %config_dir,
        employees = config.employees().len(),
        credit_cutoff = %config.policy().credit_cutoff,
        "Configuration loaded"
    );

    let app = create_router(AppState::new(config));

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!("Listening on {}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
