pub mod advisor;
pub mod api;
pub mod config;
pub mod error;
pub mod postprocess;
pub mod prompt;
pub mod stream;
pub mod upstream;

use std::net::SocketAddr;

use axum::Router;
use tracing::info;

pub use advisor::Advisor;
pub use config::{AdvisorMode, AppConfig};
pub use error::{AdvisorError, UpstreamError};
pub use postprocess::{Advice, Lang};
pub use upstream::CompletionClient;

#[derive(Clone)]
pub struct AppState {
    pub advisor: Advisor,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        let client = CompletionClient::new(
            config.api_key.clone(),
            config.base_url.clone(),
            config.model.clone(),
        );
        Self {
            advisor: Advisor::new(client, config.mode),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    api::router(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "advisor listening");
    axum::serve(listener, app).await
}
