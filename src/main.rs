use advisor_service::{build_app, run_server, AppConfig, AppState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AppConfig::from_env();
    if config.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; every query will report a configuration error");
    }
    info!(mode = ?config.mode, model = %config.model, "starting finance advisor");

    let app = build_app(AppState::from_config(&config));
    run_server(app, config.listen_addr).await?;
    Ok(())
}
