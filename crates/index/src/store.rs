use anyhow::Result;
use async_trait::async_trait;
use std::cmp::Ordering;

use rag_types::{EmbeddedNode, NodeWithScore, VectorStore};

/// 内存向量存储
#[derive(Debug, Default)]
pub struct SimpleVectorStore {
    nodes: Vec<EmbeddedNode>,
    dimension: Option<usize>,
}

impl SimpleVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 所有节点，按插入顺序
    pub fn nodes(&self) -> impl Iterator<Item = &EmbeddedNode> {
        self.nodes.iter()
    }
}

/// 余弦相似度；任一向量为零向量时返回 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[async_trait]
impl VectorStore for SimpleVectorStore {
    fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    async fn insert_batch(&mut self, nodes: Vec<EmbeddedNode>) -> Result<()> {
        let Some(first) = nodes.first() else {
            return Ok(());
        };
        let expected = self.dimension.unwrap_or(first.embedding.len());
        if expected == 0 {
            anyhow::bail!("Empty embedding for node {}", first.node.id);
        }

        // 先整批校验，失败时存储保持不变
        for node in &nodes {
            if node.embedding.len() != expected {
                anyhow::bail!(
                    "Vector dimension mismatch: expected {}, got {}",
                    expected,
                    node.embedding.len()
                );
            }
        }

        self.dimension = Some(expected);
        self.nodes.extend(nodes);
        Ok(())
    }

    async fn search_by_vector(&self, vector: &[f32], top_k: usize) -> Result<Vec<NodeWithScore>> {
        if let Some(expected) = self.dimension {
            if vector.len() != expected {
                anyhow::bail!(
                    "Query vector dimension mismatch: expected {}, got {}",
                    expected,
                    vector.len()
                );
            }
        }

        let mut scored: Vec<(usize, f32)> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (i, cosine_similarity(vector, &n.embedding)))
            .collect();

        // 稳定排序：同分时保持插入顺序
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(i, score)| NodeWithScore::new(self.nodes[i].node.clone(), Some(score)))
            .collect())
    }
}
