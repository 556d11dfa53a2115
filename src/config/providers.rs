use anyhow::Result;
use model_provider::ProviderConfig;

use rag_types::RagError;

use super::{ApiCredentials, AppConfig};

fn resolve_base_url(provider: &str, configured: Option<&String>) -> Result<String> {
    match configured {
        Some(url) => Ok(url.clone()),
        None => model_provider::default_base_url(provider)
            .map(str::to_string)
            .ok_or_else(|| {
                RagError::InvalidConfig(format!(
                    "no base_url configured and no default known for provider '{}'",
                    provider
                ))
                .into()
            }),
    }
}

impl AppConfig {
    /// 解析 LLM 服务配置
    pub fn llm_provider_config(&self, credentials: &ApiCredentials) -> Result<ProviderConfig> {
        let llm = &self.llm;
        let base_url = resolve_base_url(&llm.provider, llm.base_url.as_ref())?;

        let mut config =
            ProviderConfig::new(&llm.provider, credentials.api_key(), base_url, &llm.model);
        config.temperature = Some(llm.temperature);
        config.max_tokens = llm.max_tokens;
        config.timeout_secs = llm.timeout_secs;
        Ok(config)
    }

    /// 解析 embedding 服务配置
    pub fn embed_provider_config(&self, credentials: &ApiCredentials) -> Result<ProviderConfig> {
        let embedding = &self.embedding;
        let base_url = resolve_base_url(&embedding.provider, embedding.base_url.as_ref())?;

        let mut config = ProviderConfig::new(
            &embedding.provider,
            credentials.api_key(),
            base_url,
            &embedding.model,
        );
        config.dimension = embedding.dimension;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(config: &AppConfig) -> ApiCredentials {
        ApiCredentials::resolve(config, |_| Some("sk-test".to_string())).unwrap()
    }

    #[test]
    fn test_llm_config_carries_key_and_settings() {
        let config = AppConfig::default();

        let llm = config.llm_provider_config(&creds(&config)).unwrap();

        assert_eq!(llm.provider_name, "openai");
        assert_eq!(llm.api_key, "sk-test");
        assert_eq!(llm.base_url, "https://api.openai.com/v1");
        assert_eq!(llm.model, "gpt-3.5-turbo");
        assert_eq!(llm.temperature, Some(0.5));
        assert_eq!(llm.max_tokens, None);
    }

    #[test]
    fn test_embed_config_uses_custom_base_url() {
        let mut config = AppConfig::default();
        config.embedding.base_url = Some("http://proxy.local/v1".to_string());
        config.embedding.dimension = Some(256);

        let embed = config.embed_provider_config(&creds(&config)).unwrap();

        assert_eq!(embed.base_url, "http://proxy.local/v1");
        assert_eq!(embed.dimension, Some(256));
        assert_eq!(embed.model, "text-embedding-ada-002");
    }

    #[test]
    fn test_unknown_provider_without_base_url_fails() {
        let mut config = AppConfig::default();
        config.llm.provider = "desconocido".to_string();

        assert!(config.llm_provider_config(&creds(&config)).is_err());
    }
}
