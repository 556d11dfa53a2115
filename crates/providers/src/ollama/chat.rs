//! Ollama 本地 Chat（OpenAI 兼容格式）

use anyhow::Result;

use crate::common::OpenaiCompatibleChat;
use crate::config::ProviderConfig;
use crate::traits::ChatProvider;

pub fn create(config: &ProviderConfig) -> Result<Box<dyn ChatProvider>> {
    Ok(Box::new(OpenaiCompatibleChat::new(config)?))
}
