use crate::conversation::Message;
use crate::core::error::SitegenError;
use async_trait::async_trait;

/// A chat-completion backend. The whole conversation is sent on every call.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Returns the first choice's content, trimmed.
    async fn complete(&self, messages: &[Message]) -> Result<String, SitegenError>;

    fn model(&self) -> &str;
}

pub mod base_client;
pub mod cached;
pub mod factory;
pub mod openai_style;
