//! OpenAI 兼容格式实现（供 OpenAI、Ollama 使用）

use anyhow::{Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::traits::{ChatProvider, EmbedProvider};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// 文本规范化：合并空白字符
pub(crate) fn normalize_for_embedding(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").to_string()
}

/// 空 key 时不发送 Authorization 头（本地 Ollama 不需要）
fn with_auth(request: RequestBuilder, api_key: &str) -> RequestBuilder {
    if api_key.is_empty() {
        request
    } else {
        request.header("Authorization", format!("Bearer {}", api_key))
    }
}

async fn ensure_success(
    response: reqwest::Response,
    service: &'static str,
) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    tracing::error!("{} API error ({}): {}", service, status, body);
    Err(ProviderError::Api {
        service,
        status,
        body,
    }
    .into())
}

/// OpenAI 兼容格式 Embed
pub struct OpenaiCompatibleEmbed {
    client: Client,
    api_key: String,
    model: String,
    url: String,
    dimension: Option<usize>,
}

#[derive(Debug, Serialize)]
struct OpenaiEmbedRequest {
    model: String,
    input: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct OpenaiEmbedResponse {
    data: Vec<OpenaiEmbedData>,
}

#[derive(Debug, Deserialize)]
struct OpenaiEmbedData {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

impl OpenaiCompatibleEmbed {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        tracing::info!(
            "Created {} embed provider: model={}, base_url={}",
            config.provider_name,
            config.model,
            config.base_url
        );

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            url: config.endpoint("embeddings"),
            dimension: config.dimension,
        })
    }
}

#[async_trait]
impl EmbedProvider for OpenaiCompatibleEmbed {
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        self.encode_batch(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ProviderError::EmptyResponse {
                    service: "Embed",
                    what: "embedding",
                }
                .into()
            })
    }

    async fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let normalized: Vec<String> = texts.iter().map(|t| normalize_for_embedding(t)).collect();

        let request = OpenaiEmbedRequest {
            model: self.model.clone(),
            input: normalized,
            dimensions: self.dimension,
        };

        let response = with_auth(self.client.post(&self.url), &self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send embedding request")?;
        let response = ensure_success(response, "Embed").await?;

        let embed_response: OpenaiEmbedResponse = response
            .json()
            .await
            .context("Failed to parse embedding response")?;

        let mut data = embed_response.data;
        if data.len() != texts.len() {
            return Err(ProviderError::Malformed {
                service: "Embed",
                reason: format!("expected {} embeddings, got {}", texts.len(), data.len()),
            }
            .into());
        }
        // API 按 index 标注顺序，缺失时保持返回顺序
        data.sort_by_key(|d| d.index.unwrap_or(usize::MAX));

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimension(&self) -> Option<usize> {
        self.dimension
    }
}

/// OpenAI 兼容格式 Chat Completion
pub struct OpenaiCompatibleChat {
    client: Client,
    api_key: String,
    model: String,
    url: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl OpenaiCompatibleChat {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        tracing::info!(
            "Created {} chat provider: model={}, base_url={}",
            config.provider_name,
            config.model,
            config.base_url
        );

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            url: config.endpoint("chat/completions"),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl ChatProvider for OpenaiCompatibleChat {
    async fn chat(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = with_auth(self.client.post(&self.url), &self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send LLM request")?;
        let response = ensure_success(response, "LLM").await?;

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse LLM response")?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                ProviderError::EmptyResponse {
                    service: "LLM",
                    what: "choices",
                }
                .into()
            })
    }

    fn model(&self) -> &str {
        &self.model
    }
}
