//! OpenAI-compatible chat-completions adapter.
//!
//! Works with any endpoint that speaks the `/chat/completions` protocol
//! (OpenAI, vLLM, LM Studio, Ollama's compatibility layer, ...).

use super::types::{self, ChatRequest, ChatResponse};
use crate::config::FileProviderConfig;
use async_trait::async_trait;
use synclab_application::ports::agent_completion::{
    AgentCompletion, ReconcileRequest, ReconcileResponse, TurnRequest, TurnResponse,
};
use synclab_domain::ProviderFailure;
use tracing::debug;

pub struct OpenAiCompatibleCompletion {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: Option<f32>,
}

impl OpenAiCompatibleCompletion {
    /// Build the adapter. The API key is read from the configured
    /// environment variable once, here.
    pub fn from_config(config: &FileProviderConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key(),
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn post(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderFailure> {
        let Some(api_key) = &self.api_key else {
            return Err(ProviderFailure::MissingCredential);
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(
            model = %self.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Calling chat completions"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(convert_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(types::status_failure(status.as_u16(), &body));
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| ProviderFailure::malformed(e.to_string()))
    }
}

fn convert_transport_error(err: reqwest::Error) -> ProviderFailure {
    if err.is_timeout() {
        ProviderFailure::Timeout
    } else {
        ProviderFailure::transport(err.to_string())
    }
}

#[async_trait]
impl AgentCompletion for OpenAiCompatibleCompletion {
    async fn run(&self, request: &TurnRequest) -> Result<TurnResponse, ProviderFailure> {
        let body = types::turn_request(&self.model, self.temperature, request);
        let response = self.post(&body).await?;
        types::parse_turn_response(response)
    }

    async fn reconcile(
        &self,
        request: &ReconcileRequest,
    ) -> Result<ReconcileResponse, ProviderFailure> {
        let body = types::reconcile_request(&self.model, self.temperature, request);
        let response = self.post(&body).await?;
        types::parse_reconcile_response(response)
    }

    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}
