use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AdvisorError, UpstreamError};
use crate::prompt::{FINANCE_INSTRUCTIONS, MAX_OUTPUT_TOKENS, TEMPERATURE};
use crate::stream::{SseDecoder, StreamAccumulator};

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: Option<&'a str>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct StreamRequest<'a> {
    model: &'a str,
    instructions: &'a str,
    input: &'a str,
    max_output_tokens: u32,
    stream: bool,
}

/// Completion service client, built once per process and shared by every request.
#[derive(Clone)]
pub struct CompletionClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl CompletionClient {
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn api_key(&self) -> Result<&str, AdvisorError> {
        self.api_key.as_deref().ok_or(AdvisorError::MissingApiKey)
    }

    /// Issues one chat completion and waits for the whole text.
    /// A missing query is sent as a null user turn.
    pub async fn complete(&self, query: Option<&str>) -> Result<String, AdvisorError> {
        let api_key = self.api_key()?;
        let payload = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: Some(FINANCE_INSTRUCTIONS),
                },
                ChatMessage {
                    role: "user",
                    content: query,
                },
            ],
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(UpstreamError::Send)?;
        let response = ensure_success(response).await?;

        let body = response.text().await.map_err(UpstreamError::Body)?;
        let parsed: ChatResponse = serde_json::from_str(&body).map_err(UpstreamError::from)?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(UpstreamError::NoChoices)?;
        choice.message.content.ok_or(AdvisorError::EmptyCompletion)
    }

    /// Issues one streamed response and accumulates its text deltas.
    pub async fn stream(&self, query: &str) -> Result<String, AdvisorError> {
        let api_key = self.api_key()?;
        let payload = StreamRequest {
            model: &self.model,
            instructions: FINANCE_INSTRUCTIONS,
            input: query,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            stream: true,
        };

        let mut acc = StreamAccumulator::new();
        acc.begin();

        let response = self
            .http
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| acc.fail(UpstreamError::Send(err)))?;
        let mut response = ensure_success(response)
            .await
            .map_err(|err| acc.fail(err))?;

        let mut decoder = SseDecoder::default();
        while !acc.is_completed() {
            let chunk = response
                .chunk()
                .await
                .map_err(|err| acc.fail(UpstreamError::Body(err)))?;
            let Some(chunk) = chunk else {
                break;
            };
            for data in decoder.push(&chunk) {
                acc.apply_data(&data)?;
                if acc.is_completed() {
                    break;
                }
            }
        }

        if !acc.is_completed() {
            if let Some(data) = decoder.finish() {
                acc.apply_data(&data)?;
            }
            debug!("completion stream ended without an end event");
        }

        Ok(acc.finish()?)
    }
}

async fn ensure_success(response: Response) -> Result<Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unable to read response body>".to_string());
    Err(UpstreamError::Status { status, body })
}
