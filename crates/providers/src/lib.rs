mod common;
mod config;
mod error;
mod traits;

// 各供应商模块（feature gated）
#[cfg(feature = "ollama")]
mod ollama;
#[cfg(feature = "openai")]
mod openai;

pub use config::ProviderConfig;
pub use error::ProviderError;
pub use traits::{ChatProvider, EmbedProvider};

/// 供应商是否需要 API key
pub fn requires_api_key(provider_name: &str) -> bool {
    provider_name != "ollama"
}

/// 供应商默认 API 地址
pub fn default_base_url(provider_name: &str) -> Option<&'static str> {
    match provider_name {
        #[cfg(feature = "openai")]
        "openai" => Some(openai::DEFAULT_BASE_URL),
        #[cfg(feature = "ollama")]
        "ollama" => Some(ollama::DEFAULT_BASE_URL),
        _ => None,
    }
}

/// 创建 Embedding Provider
pub fn create_embed_provider(config: &ProviderConfig) -> anyhow::Result<Box<dyn EmbedProvider>> {
    match config.provider_name.as_str() {
        #[cfg(feature = "openai")]
        "openai" => openai::embed::create(config),
        #[cfg(feature = "ollama")]
        "ollama" => ollama::embed::create(config),
        other => anyhow::bail!("Unknown or disabled embed provider: {}", other),
    }
}

/// 创建 Chat Provider
pub fn create_chat_provider(config: &ProviderConfig) -> anyhow::Result<Box<dyn ChatProvider>> {
    match config.provider_name.as_str() {
        #[cfg(feature = "openai")]
        "openai" => openai::chat::create(config),
        #[cfg(feature = "ollama")]
        "ollama" => ollama::chat::create(config),
        other => anyhow::bail!("Unknown or disabled chat provider: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider_is_rejected() {
        let config = ProviderConfig::new("anthropic", "key", "https://example.com", "m");
        let err = create_chat_provider(&config).err().unwrap();
        assert!(err.to_string().contains("anthropic"));
    }

    #[cfg(feature = "openai")]
    #[test]
    fn test_openai_requires_key() {
        let config = ProviderConfig::new("openai", "", openai::DEFAULT_BASE_URL, "gpt-3.5-turbo");
        assert!(create_chat_provider(&config).is_err());
        assert!(create_embed_provider(&config).is_err());
        assert!(requires_api_key("openai"));
    }

    #[cfg(feature = "ollama")]
    #[test]
    fn test_ollama_works_without_key() {
        let config = ProviderConfig::new("ollama", "", ollama::DEFAULT_BASE_URL, "llama3");
        assert!(create_chat_provider(&config).is_ok());
        assert!(!requires_api_key("ollama"));
    }
}
