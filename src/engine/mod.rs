//! 查询引擎：单索引检索问答与子问题编排

mod sub_question;
mod vector;

use anyhow::Result;
use async_trait::async_trait;

use rag_types::Response;

pub use sub_question::SubQuestionQueryEngine;
pub use vector::RetrieverQueryEngine;

/// 文本进、Response 出
#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn query(&self, query: &str) -> Result<Response>;
}
