//! OpenAI Chat Completion

use anyhow::Result;

use crate::common::OpenaiCompatibleChat;
use crate::config::ProviderConfig;
use crate::traits::ChatProvider;

pub fn create(config: &ProviderConfig) -> Result<Box<dyn ChatProvider>> {
    if config.api_key.is_empty() {
        anyhow::bail!("OpenAI chat provider requires an API key");
    }
    Ok(Box::new(OpenaiCompatibleChat::new(config)?))
}
