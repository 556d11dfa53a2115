//! OpenAI Embedding

use anyhow::Result;

use crate::common::OpenaiCompatibleEmbed;
use crate::config::ProviderConfig;
use crate::traits::EmbedProvider;

pub fn create(config: &ProviderConfig) -> Result<Box<dyn EmbedProvider>> {
    if config.api_key.is_empty() {
        anyhow::bail!("OpenAI embed provider requires an API key");
    }
    Ok(Box::new(OpenaiCompatibleEmbed::new(config)?))
}
