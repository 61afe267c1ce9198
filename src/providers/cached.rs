use super::LLMProvider;
use crate::conversation::Message;
use crate::core::error::SitegenError;
use async_trait::async_trait;
use moka::sync::Cache;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

/// De-duplicates identical requests for a short window.
///
/// Keyed by a hash of the model name and the serialized conversation. Only
/// successful replies are kept.
pub struct CachedProvider {
    inner: Arc<dyn LLMProvider>,
    replies: Cache<u64, String>,
}

impl CachedProvider {
    const MAX_ENTRIES: u64 = 256;

    pub fn new(inner: Arc<dyn LLMProvider>, ttl: Duration) -> Self {
        Self {
            inner,
            replies: Cache::builder()
                .max_capacity(Self::MAX_ENTRIES)
                .time_to_live(ttl)
                .build(),
        }
    }

    fn key(&self, messages: &[Message]) -> Result<u64, SitegenError> {
        let serialized = serde_json::to_vec(messages)?;
        let mut hasher = DefaultHasher::new();
        self.inner.model().hash(&mut hasher);
        serialized.hash(&mut hasher);
        Ok(hasher.finish())
    }
}

#[async_trait]
impl LLMProvider for CachedProvider {
    async fn complete(&self, messages: &[Message]) -> Result<String, SitegenError> {
        let key = self.key(messages)?;
        if let Some(reply) = self.replies.get(&key) {
            tracing::debug!(key, "completion served from cache");
            return Ok(reply);
        }

        let reply = self.inner.complete(messages).await?;
        self.replies.insert(key, reply.clone());
        Ok(reply)
    }

    fn model(&self) -> &str {
        self.inner.model()
    }
}
