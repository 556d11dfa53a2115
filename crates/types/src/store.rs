use anyhow::Result;
use async_trait::async_trait;

use crate::models::{NodeWithScore, TextNode};

/// 已生成向量的节点（向量由外部 EmbedProvider 生成）
#[derive(Debug, Clone)]
pub struct EmbeddedNode {
    pub node: TextNode,
    pub embedding: Vec<f32>,
}

/// 向量存储的统一接口
///
/// 任何存储实现（内存、本地、远程）都应该实现这个 trait
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// 获取向量维度（空存储返回 None）
    fn dimension(&self) -> Option<usize>;

    /// 获取节点总数
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 批量插入
    async fn insert_batch(&mut self, nodes: Vec<EmbeddedNode>) -> Result<()>;

    /// 向量搜索，按相似度降序返回前 `top_k` 个
    async fn search_by_vector(&self, vector: &[f32], top_k: usize) -> Result<Vec<NodeWithScore>>;
}
