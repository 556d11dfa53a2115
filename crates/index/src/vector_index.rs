use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::sync::Arc;

use model_provider::EmbedProvider;
use rag_types::{Document, EmbeddedNode, NodeWithScore, RagError, VectorStore};

use crate::splitter::SentenceSplitter;
use crate::store::SimpleVectorStore;

pub const DEFAULT_EMBED_BATCH_SIZE: usize = 10;

/// 向量索引：文档切分 + 向量化 + 内存存储
///
/// 构建后只读，检索时用同一个 EmbedProvider 编码查询。
pub struct VectorStoreIndex {
    store: SimpleVectorStore,
    embed_provider: Arc<dyn EmbedProvider>,
}

impl VectorStoreIndex {
    /// 从文档集合构建索引
    pub async fn from_documents(
        documents: &[Document],
        embed_provider: Arc<dyn EmbedProvider>,
        splitter: &SentenceSplitter,
        batch_size: usize,
    ) -> Result<Self> {
        if documents.is_empty() {
            return Err(RagError::EmptyIndex.into());
        }

        let nodes = splitter.split_documents(documents);
        if nodes.is_empty() {
            return Err(RagError::EmptyIndex.into());
        }
        tracing::debug!(
            "Split {} documents into {} nodes (chunk_size={}, overlap={})",
            documents.len(),
            nodes.len(),
            splitter.chunk_size(),
            splitter.chunk_overlap()
        );

        let mut store = SimpleVectorStore::new();
        for batch in nodes.chunks(batch_size.max(1)) {
            let texts: Vec<&str> = batch.iter().map(|n| n.text.as_str()).collect();
            let embeddings = embed_provider
                .encode_batch(&texts)
                .await
                .context("Failed to embed document chunks")?;

            if embeddings.len() != batch.len() {
                anyhow::bail!(
                    "Embed provider returned {} vectors for {} chunks",
                    embeddings.len(),
                    batch.len()
                );
            }

            let embedded = batch
                .iter()
                .cloned()
                .zip(embeddings)
                .map(|(node, embedding)| EmbeddedNode { node, embedding })
                .collect();
            store.insert_batch(embedded).await?;
        }

        Ok(Self {
            store,
            embed_provider,
        })
    }

    /// 检索与查询最相似的前 `top_k` 个节点
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<NodeWithScore>> {
        let query_vector = self
            .embed_provider
            .encode(query)
            .await
            .context("Failed to embed query")?;
        self.store.search_by_vector(&query_vector, top_k).await
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// 索引中出现过的源文件
    pub fn source_files(&self) -> BTreeSet<String> {
        self.store
            .nodes()
            .map(|n| n.node.metadata.file_path.clone())
            .collect()
    }
}

impl std::fmt::Debug for VectorStoreIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorStoreIndex")
            .field("nodes", &self.store.len())
            .field("dimension", &self.store.dimension())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rag_types::DocumentMetadata;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 词袋哈希向量，结果确定
    struct HashEmbed {
        calls: AtomicUsize,
    }

    impl HashEmbed {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn vector(text: &str) -> Vec<f32> {
            let mut v = vec![0.0; 32];
            for word in text.split_whitespace() {
                let word = word.to_lowercase();
                let bucket = word.bytes().map(|b| b as usize).sum::<usize>() % 32;
                v[bucket] += 1.0;
            }
            // 全零向量的余弦相似度无意义
            v[0] += 0.01;
            v
        }
    }

    #[async_trait]
    impl EmbedProvider for HashEmbed {
        async fn encode(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Self::vector(text))
        }

        async fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|t| Self::vector(t)).collect())
        }

        fn dimension(&self) -> Option<usize> {
            Some(32)
        }
    }

    /// 少返回一个向量
    struct ShortEmbed;

    #[async_trait]
    impl EmbedProvider for ShortEmbed {
        async fn encode(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0])
        }

        async fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            Ok(vec![vec![1.0]; texts.len().saturating_sub(1)])
        }

        fn dimension(&self) -> Option<usize> {
            None
        }
    }

    fn page(text: &str, page: usize) -> Document {
        Document::new(
            text,
            DocumentMetadata {
                file_path: "Programas/vox.pdf".to_string(),
                file_name: "vox.pdf".to_string(),
                page_label: Some(page.to_string()),
                tool_name: None,
            },
        )
    }

    fn splitter() -> SentenceSplitter {
        SentenceSplitter::new(64, 4).unwrap()
    }

    #[tokio::test]
    async fn test_build_and_retrieve() {
        let embed = Arc::new(HashEmbed::new());
        let docs = vec![
            page("energia nuclear centrales prolongar vida util", 1),
            page("vivienda alquiler jovenes ayudas", 2),
            page("sanidad publica listas de espera", 3),
        ];

        let index = VectorStoreIndex::from_documents(&docs, embed.clone(), &splitter(), 2)
            .await
            .unwrap();

        assert_eq!(index.len(), 3);
        // 3 个节点、批大小 2 → 2 次批量调用
        assert_eq!(embed.calls.load(Ordering::SeqCst), 2);

        let results = index.retrieve("energia nuclear", 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].text().contains("nuclear"));
        assert_eq!(results[0].node.metadata.page_label.as_deref(), Some("1"));
        assert_eq!(
            index.source_files().into_iter().collect::<Vec<_>>(),
            vec!["Programas/vox.pdf".to_string()]
        );
    }

    #[tokio::test]
    async fn test_empty_documents_are_rejected() {
        let err = VectorStoreIndex::from_documents(&[], Arc::new(HashEmbed::new()), &splitter(), 10)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RagError>(),
            Some(RagError::EmptyIndex)
        ));
    }

    #[tokio::test]
    async fn test_short_embedding_batch_fails() {
        let docs = vec![page("uno", 1), page("dos", 2)];
        let result =
            VectorStoreIndex::from_documents(&docs, Arc::new(ShortEmbed), &splitter(), 10).await;
        assert!(result.is_err());
    }
}
