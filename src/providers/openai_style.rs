use super::LLMProvider;
use crate::conversation::Message;
use crate::core::error::SitegenError;
use crate::providers::base_client::BaseApiClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatCompletionMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    #[serde(default)]
    content: Option<String>,
}

/// Client for any endpoint speaking the OpenAI chat-completions protocol.
#[derive(Clone)]
pub struct OpenAIStyleProvider {
    client: BaseApiClient,
    model: String,
    temperature: f32,
}

impl OpenAIStyleProvider {
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        temperature: f32,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Self {
        Self {
            client: BaseApiClient::new(base_url, api_key, extra_headers),
            model,
            temperature,
        }
    }
}

#[async_trait]
impl LLMProvider for OpenAIStyleProvider {
    async fn complete(&self, messages: &[Message]) -> Result<String, SitegenError> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| ChatCompletionMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            temperature: self.temperature,
        };

        tracing::info!(
            endpoint = self.client.endpoint(),
            model = %self.model,
            messages = messages.len(),
            "requesting completion"
        );
        let started = Instant::now();

        let response = self
            .client
            .send_request("chat/completions", &payload)
            .await?;

        let response_body = response.text().await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&response_body)
            .map_err(|e| SitegenError::Completion(format!("Malformed API response: {}", e)))?;

        let Some(choice) = parsed.choices.into_iter().next() else {
            return Err(SitegenError::Completion(
                "No choices in API response".to_string(),
            ));
        };

        tracing::info!(elapsed_ms = started.elapsed().as_millis() as u64, "completion received");

        Ok(choice.message.content.unwrap_or_default().trim().to_string())
    }

    fn model(&self) -> &str {
        &self.model
    }
}
