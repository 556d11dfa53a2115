use anyhow::{Context, Result};
use rag_types::{Document, RagError, TextNode};
use text_splitter::{ChunkConfig, TextSplitter};
use tiktoken_rs::CoreBPE;

pub const DEFAULT_CHUNK_SIZE: usize = 1024;
pub const DEFAULT_CHUNK_OVERLAP: usize = 20;

/// 按 token 计数、优先在句子边界切分的文本切分器
pub struct SentenceSplitter {
    splitter: TextSplitter<CoreBPE>,
    chunk_size: usize,
    chunk_overlap: usize,
}

impl SentenceSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 || chunk_overlap >= chunk_size {
            return Err(RagError::InvalidConfig(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                chunk_overlap, chunk_size
            ))
            .into());
        }

        let tokenizer = tiktoken_rs::cl100k_base().context("Failed to load cl100k tokenizer")?;
        let chunk_config = ChunkConfig::new(chunk_size)
            .with_sizer(tokenizer)
            .with_overlap(chunk_overlap)
            .map_err(|e| RagError::InvalidConfig(format!("Invalid chunk config: {}", e)))?;

        Ok(Self {
            splitter: TextSplitter::new(chunk_config),
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// 切分单个文档，空白块会被丢弃
    pub fn split_document(&self, document: &Document) -> Vec<TextNode> {
        self.splitter
            .chunks(&document.text)
            .filter(|chunk| !chunk.trim().is_empty())
            .map(|chunk| TextNode::from_document(document, chunk))
            .collect()
    }

    /// 按文档顺序切分
    pub fn split_documents(&self, documents: &[Document]) -> Vec<TextNode> {
        documents
            .iter()
            .flat_map(|doc| self.split_document(doc))
            .collect()
    }
}

impl std::fmt::Debug for SentenceSplitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceSplitter")
            .field("chunk_size", &self.chunk_size)
            .field("chunk_overlap", &self.chunk_overlap)
            .finish()
    }
}
