use tracing::info;

use crate::config::AdvisorMode;
use crate::error::AdvisorError;
use crate::postprocess::{finalize, Advice, Lang};
use crate::upstream::CompletionClient;

pub const EMPTY_QUERY_MESSAGE: &str = "कृपया कोई प्रश्न लिखें।";
pub const SERVER_ERROR_MESSAGE: &str = "⚠️ Sorry—server error. Please try again.";
pub const CONFIG_ERROR_MESSAGE: &str = "⚠️ AI service configuration error.";

/// Answers finance questions in either integration mode.
#[derive(Clone)]
pub struct Advisor {
    client: CompletionClient,
    mode: AdvisorMode,
}

impl Advisor {
    pub fn new(client: CompletionClient, mode: AdvisorMode) -> Self {
        Self { client, mode }
    }

    pub fn mode(&self) -> AdvisorMode {
        self.mode
    }

    pub async fn answer(&self, query: Option<&str>) -> Result<Advice, AdvisorError> {
        match self.mode {
            AdvisorMode::Sync => self.answer_sync(query).await,
            AdvisorMode::Stream => self.answer_streaming(query).await,
        }
    }

    /// Blocking-style call. A missing query is forwarded as-is.
    pub async fn answer_sync(&self, query: Option<&str>) -> Result<Advice, AdvisorError> {
        let raw = self.client.complete(query).await?;
        let advice = finalize(&raw);
        info!(model = self.client.model(), lang = ?advice.lang, "answered query");
        Ok(advice)
    }

    /// Streamed call. Missing or empty queries are answered locally.
    pub async fn answer_streaming(&self, query: Option<&str>) -> Result<Advice, AdvisorError> {
        let Some(query) = query.filter(|q| !q.is_empty()) else {
            return Ok(Advice::new(EMPTY_QUERY_MESSAGE, Lang::Hi));
        };
        let raw = self.client.stream(query).await?;
        let advice = finalize(&raw);
        info!(model = self.client.model(), lang = ?advice.lang, "answered streamed query");
        Ok(advice)
    }

    /// Caller-facing message for a failed answer. Only sync mode reports detail.
    pub fn failure_advice(&self, err: &AdvisorError) -> Advice {
        let message = match (self.mode, err) {
            (AdvisorMode::Sync, AdvisorError::MissingApiKey) => CONFIG_ERROR_MESSAGE.to_string(),
            (AdvisorMode::Sync, AdvisorError::Upstream(inner)) => {
                format!("⚠️ AI service error: {inner}")
            }
            _ => SERVER_ERROR_MESSAGE.to_string(),
        };
        Advice::new(message, Lang::En)
    }
}
