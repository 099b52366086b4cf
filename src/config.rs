use std::env;
use std::net::{Ipv4Addr, SocketAddr};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const LISTEN_PORT: u16 = 5000;

/// Which upstream integration serves `GET /query`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdvisorMode {
    #[default]
    Sync,
    Stream,
}

impl AdvisorMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sync" => Some(Self::Sync),
            "stream" | "streaming" => Some(Self::Stream),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub mode: AdvisorMode,
    pub listen_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|value| !value.trim().is_empty());

        let base_url = env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let model = env::var("OPENAI_MODEL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let mode = env::var("ADVISOR_MODE")
            .ok()
            .and_then(|value| AdvisorMode::parse(&value))
            .unwrap_or_default();

        Self {
            api_key,
            base_url,
            model,
            mode,
            listen_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, LISTEN_PORT)),
        }
    }
}
