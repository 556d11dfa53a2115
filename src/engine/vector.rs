use anyhow::Result;
use async_trait::async_trait;

use rag_index::VectorStoreIndex;
use rag_types::Response;

use super::QueryEngine;
use crate::llm::ResponseSynthesizer;

/// 单个索引上的检索问答
pub struct RetrieverQueryEngine {
    index: VectorStoreIndex,
    similarity_top_k: usize,
    synthesizer: ResponseSynthesizer,
}

impl RetrieverQueryEngine {
    pub fn new(
        index: VectorStoreIndex,
        similarity_top_k: usize,
        synthesizer: ResponseSynthesizer,
    ) -> Self {
        Self {
            index,
            similarity_top_k,
            synthesizer,
        }
    }
}

#[async_trait]
impl QueryEngine for RetrieverQueryEngine {
    async fn query(&self, query: &str) -> Result<Response> {
        let nodes = self.index.retrieve(query, self.similarity_top_k).await?;
        tracing::debug!(
            "Retrieved {} nodes (top_k={})",
            nodes.len(),
            self.similarity_top_k
        );
        self.synthesizer.synthesize(query, nodes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{HashEmbed, ScriptedChat};
    use rag_index::SentenceSplitter;
    use rag_types::{Document, DocumentMetadata};
    use std::sync::Arc;

    fn doc(text: &str) -> Document {
        Document::new(
            text,
            DocumentMetadata {
                file_path: "Programas/pp.pdf".to_string(),
                file_name: "pp.pdf".to_string(),
                page_label: Some("1".to_string()),
                tool_name: None,
            },
        )
    }

    async fn engine(chat: Arc<ScriptedChat>, top_k: usize) -> RetrieverQueryEngine {
        let docs = vec![
            doc("energia nuclear centrales prolongar"),
            doc("vivienda alquiler jovenes"),
            doc("sanidad publica listas espera"),
        ];
        let splitter = SentenceSplitter::new(64, 4).unwrap();
        let embed = Arc::new(HashEmbed::new());
        let index = VectorStoreIndex::from_documents(&docs, embed, &splitter, 10)
            .await
            .unwrap();
        RetrieverQueryEngine::new(index, top_k, ResponseSynthesizer::new(chat, 12000))
    }

    #[tokio::test]
    async fn test_query_retrieves_top_k_and_synthesizes() {
        let chat = Arc::new(ScriptedChat::new(|_| "El PP apuesta por la nuclear.".to_string()));
        let engine = engine(chat.clone(), 2).await;

        let response = engine.query("energia nuclear").await.unwrap();

        assert_eq!(response.text, "El PP apuesta por la nuclear.");
        assert_eq!(response.source_nodes.len(), 2);
        assert!(response.source_nodes[0].text().contains("nuclear"));
        assert!(response.sub_answers.is_empty());
        assert_eq!(chat.calls(), 1);
    }

    #[tokio::test]
    async fn test_repeated_queries_are_not_cached() {
        let chat = Arc::new(ScriptedChat::new(|_| "respuesta".to_string()));
        let engine = engine(chat.clone(), 1).await;

        let first = engine.query("vivienda").await.unwrap();
        let second = engine.query("vivienda").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(chat.calls(), 2);
    }
}
