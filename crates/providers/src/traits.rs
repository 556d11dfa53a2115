//! Provider Traits

use anyhow::Result;
use async_trait::async_trait;

/// Embedding Provider Trait
#[async_trait]
pub trait EmbedProvider: Send + Sync {
    /// 编码单个文本
    async fn encode(&self, text: &str) -> Result<Vec<f32>>;

    /// 批量编码文本，返回顺序与输入一致
    async fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// 获取配置的向量维度（未配置时为 None）
    fn dimension(&self) -> Option<usize>;
}

/// Chat Completion Provider Trait
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// 单轮对话，返回模型回复文本
    async fn chat(&self, prompt: &str) -> Result<String>;

    /// 模型名称（日志用）
    fn model(&self) -> &str;
}
