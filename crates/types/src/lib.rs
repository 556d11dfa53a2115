//! RAG Types - 文档、节点、响应等公共类型与 trait 定义
//!
//! 本 crate 不依赖任何重型库，供 loader、index、engine 各层共享。

mod error;
mod models;
mod store;

pub use error::RagError;
pub use models::{
    Document, DocumentMetadata, NodeWithScore, Response, SubQuestion, SubQuestionAnswer,
    TextNode, ToolMetadata,
};
pub use store::{EmbeddedNode, VectorStore};
