//! RAG Index - 内存向量索引
//!
//! 本 crate 实现 VectorStore trait（内存存储），并提供文档切分与
//! 从文档构建索引的流程。索引只在单次进程内有效，不做持久化。

mod splitter;
mod store;
mod vector_index;

pub use splitter::SentenceSplitter;
pub use store::{cosine_similarity, SimpleVectorStore};
pub use vector_index::VectorStoreIndex;
