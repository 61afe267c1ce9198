use crate::core::error::SitegenError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DATABASE_URL_ENV: &str = "SITEGEN_DATABASE_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAI,
    OpenRouter,
    DeepSeek,
}

impl Provider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Some(Provider::OpenAI),
            "openrouter" => Some(Provider::OpenRouter),
            "deepseek" => Some(Provider::DeepSeek),
            _ => None,
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::OpenAI => "https://api.openai.com/v1",
            Provider::OpenRouter => "https://openrouter.ai/api/v1",
            Provider::DeepSeek => "https://api.deepseek.com/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAI => "gpt-3.5-turbo",
            Provider::OpenRouter => "openai/gpt-3.5-turbo",
            Provider::DeepSeek => "deepseek-chat",
        }
    }

    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::OpenRouter => "OPENROUTER_API_KEY",
            Provider::DeepSeek => "DEEPSEEK_API_KEY",
        }
    }
}

impl Default for Provider {
    fn default() -> Self {
        Provider::OpenAI
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub temperature: f32,
    /// Seconds an identical conversation is answered from memory; 0 disables it.
    pub cache_ttl_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            cache_ttl_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub database_url: Option<String>,
    pub listing_ttl_secs: u64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            listing_ttl_secs: 600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8501".to_string(),
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Config {
    pub active_provider: Option<Provider>,
    #[serde(default)]
    pub providers: HashMap<Provider, ProviderConfig>,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Provider settings after CLI, environment and file have been merged.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProvider {
    pub provider: Provider,
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".sitegen")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Loads the config at `path`, or at the default location. The default
    /// file is written out with defaults the first time it is missing.
    pub fn load(path: Option<&Path>) -> Result<Config, SitegenError> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(SitegenError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::read(path);
        }

        let path = Self::config_path();
        if path.exists() {
            return Self::read(&path);
        }

        let config = Config::default();
        if let Err(e) = config.save(&path) {
            tracing::debug!("could not write default config to {}: {}", path.display(), e);
        }
        Ok(config)
    }

    fn read(path: &Path) -> Result<Config, SitegenError> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
            .map_err(|e| SitegenError::Config(format!("Parse {}: {}", path.display(), e)))
    }

    pub fn parse(contents: &str) -> Result<Config, SitegenError> {
        Ok(serde_yml::from_str::<Config>(contents)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SitegenError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yml::to_string(self)?;
        fs::write(path, yaml_content)?;
        Ok(())
    }

    pub fn resolve_provider(
        &self,
        cli_provider: Option<&str>,
        cli_model: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<ResolvedProvider, SitegenError> {
        let provider = match cli_provider {
            Some(name) => Provider::from_str(name)
                .ok_or_else(|| SitegenError::Config(format!("Unsupported provider: {}", name)))?,
            None => self.active_provider.unwrap_or_default(),
        };

        let file = self.providers.get(&provider).cloned().unwrap_or_default();

        let api_key = env(provider.api_key_env())
            .filter(|k| !k.trim().is_empty())
            .or(file.api_key);
        let base_url = file
            .base_url
            .unwrap_or_else(|| provider.default_base_url().to_string());
        let model = cli_model
            .map(str::to_string)
            .or(file.model)
            .unwrap_or_else(|| provider.default_model().to_string());

        Ok(ResolvedProvider {
            provider,
            base_url,
            api_key,
            model,
            temperature: self.completion.temperature,
        })
    }

    pub fn resolve_database_url(
        &self,
        cli: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Option<String> {
        cli.map(str::to_string)
            .or_else(|| env(DATABASE_URL_ENV))
            .or_else(|| self.gallery.database_url.clone())
            .filter(|url| !url.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse("{}").unwrap();
        assert_eq!(config.completion.temperature, 0.1);
        assert_eq!(config.completion.cache_ttl_secs, 10);
        assert_eq!(config.gallery.listing_ttl_secs, 600);
        assert_eq!(config.server.bind, "127.0.0.1:8501");
        assert!(config.gallery.database_url.is_none());
    }

    #[test]
    fn file_settings_are_read() {
        let yaml = r#"
active_provider: openrouter
providers:
  openrouter:
    api_key: from-file
    model: some/model
completion:
  temperature: 0.0
gallery:
  database_url: sqlite://sites.db
"#;
        let config = Config::parse(yaml).unwrap();
        let resolved = config.resolve_provider(None, None, no_env).unwrap();

        assert_eq!(resolved.provider, Provider::OpenRouter);
        assert_eq!(resolved.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(resolved.api_key.as_deref(), Some("from-file"));
        assert_eq!(resolved.model, "some/model");
        assert_eq!(resolved.temperature, 0.0);
        assert_eq!(
            config.resolve_database_url(None, no_env).as_deref(),
            Some("sqlite://sites.db")
        );
    }

    #[test]
    fn cli_and_env_override_file() {
        let yaml = r#"
providers:
  openai:
    api_key: from-file
    model: file-model
gallery:
  database_url: sqlite://file.db
"#;
        let config = Config::parse(yaml).unwrap();
        let env = |name: &str| match name {
            "OPENAI_API_KEY" => Some("from-env".to_string()),
            DATABASE_URL_ENV => Some("sqlite://env.db".to_string()),
            _ => None,
        };

        let resolved = config
            .resolve_provider(Some("OpenAI"), Some("cli-model"), env)
            .unwrap();
        assert_eq!(resolved.api_key.as_deref(), Some("from-env"));
        assert_eq!(resolved.model, "cli-model");

        assert_eq!(
            config.resolve_database_url(None, env).as_deref(),
            Some("sqlite://env.db")
        );
        assert_eq!(
            config
                .resolve_database_url(Some("sqlite://cli.db"), env)
                .as_deref(),
            Some("sqlite://cli.db")
        );
    }

    #[test]
    fn defaults_without_any_source() {
        let resolved = Config::default().resolve_provider(None, None, no_env).unwrap();
        assert_eq!(resolved.provider, Provider::OpenAI);
        assert_eq!(resolved.model, "gpt-3.5-turbo");
        assert!(resolved.api_key.is_none());
        assert!(Config::default().resolve_database_url(None, no_env).is_none());
    }

    #[test]
    fn unknown_provider_is_a_config_error() {
        let err = Config::default()
            .resolve_provider(Some("nope"), None, no_env)
            .unwrap_err();
        assert!(matches!(err, SitegenError::Config(_)));
    }
}
