use crate::config::{Provider, ResolvedProvider};
use crate::core::error::SitegenError;
use crate::providers::{LLMProvider, openai_style::OpenAIStyleProvider};
use std::collections::HashMap;
use std::sync::Arc;

type ProviderCreator =
    Box<dyn Fn(&ResolvedProvider, String) -> Arc<dyn LLMProvider> + Send + Sync>;

pub struct ProviderFactory {
    creators: HashMap<Provider, ProviderCreator>,
}

impl ProviderFactory {
    pub fn new() -> Self {
        let mut creators = HashMap::new();

        creators.insert(
            Provider::OpenAI,
            Box::new(|config: &ResolvedProvider, api_key: String| {
                Arc::new(OpenAIStyleProvider::new(
                    config.base_url.clone(),
                    api_key,
                    config.model.clone(),
                    config.temperature,
                    None,
                )) as Arc<dyn LLMProvider>
            }) as ProviderCreator,
        );

        creators.insert(
            Provider::OpenRouter,
            Box::new(|config: &ResolvedProvider, api_key: String| {
                let headers = HashMap::from([
                    (
                        "HTTP-Referer".to_string(),
                        "https://github.com/sitegen/sitegen".to_string(),
                    ),
                    ("X-Title".to_string(), "sitegen".to_string()),
                ]);
                Arc::new(OpenAIStyleProvider::new(
                    config.base_url.clone(),
                    api_key,
                    config.model.clone(),
                    config.temperature,
                    Some(headers),
                )) as Arc<dyn LLMProvider>
            }) as ProviderCreator,
        );

        creators.insert(
            Provider::DeepSeek,
            Box::new(|config: &ResolvedProvider, api_key: String| {
                Arc::new(OpenAIStyleProvider::new(
                    config.base_url.clone(),
                    api_key,
                    config.model.clone(),
                    config.temperature,
                    None,
                )) as Arc<dyn LLMProvider>
            }) as ProviderCreator,
        );

        Self { creators }
    }

    pub fn create(&self, config: &ResolvedProvider) -> Result<Arc<dyn LLMProvider>, SitegenError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            SitegenError::Config(format!(
                "{} must be set from config or environment variable",
                config.provider.api_key_env()
            ))
        })?;

        self.creators
            .get(&config.provider)
            .map(|creator| creator(config, api_key))
            .ok_or_else(|| {
                SitegenError::Config(format!("Provider not found: {:?}", config.provider))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(provider: Provider, api_key: Option<&str>) -> ResolvedProvider {
        ResolvedProvider {
            provider,
            base_url: provider.default_base_url().to_string(),
            api_key: api_key.map(str::to_string),
            model: provider.default_model().to_string(),
            temperature: 0.1,
        }
    }

    #[test]
    fn builds_every_provider() {
        let factory = ProviderFactory::new();
        for provider in [Provider::OpenAI, Provider::OpenRouter, Provider::DeepSeek] {
            let built = factory.create(&resolved(provider, Some("key"))).unwrap();
            assert_eq!(built.model(), provider.default_model());
        }
    }

    #[test]
    fn missing_key_names_the_variable() {
        let err = ProviderFactory::new()
            .create(&resolved(Provider::DeepSeek, None))
            .err()
            .unwrap();
        match err {
            SitegenError::Config(msg) => assert!(msg.contains("DEEPSEEK_API_KEY")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
