//! 流水线装配：凭证 → provider → 每个党派一个索引工具 → 子问题引擎

mod ask;

use anyhow::{Context, Result};
use std::sync::Arc;

use model_provider::{create_chat_provider, create_embed_provider, ChatProvider, EmbedProvider};
use rag_index::{SentenceSplitter, VectorStoreIndex};
use rag_types::Response;

use crate::config::{ApiCredentials, AppConfig};
use crate::engine::{QueryEngine, RetrieverQueryEngine, SubQuestionQueryEngine};
use crate::llm::{LlmQuestionGenerator, ResponseSynthesizer};
use crate::loader::load_file;
use crate::tools::{QueryEngineTool, ToolRegistry};
use crate::ui::Output;

pub use ask::{ask, AskOptions};

/// 一次运行共享的模型客户端
#[derive(Clone)]
pub struct Providers {
    pub embed: Arc<dyn EmbedProvider>,
    pub chat: Arc<dyn ChatProvider>,
}

impl Providers {
    /// 按配置创建 HTTP 客户端；凭证必须已解析
    pub fn from_config(config: &AppConfig, credentials: &ApiCredentials) -> Result<Self> {
        let embed = create_embed_provider(&config.embed_provider_config(credentials)?)
            .context("Failed to create embedding provider")?;
        let chat = create_chat_provider(&config.llm_provider_config(credentials)?)
            .context("Failed to create chat provider")?;

        tracing::info!(
            "Providers ready: embedding={}/{}, llm={}/{}",
            config.embedding.provider,
            config.embedding.model,
            config.llm.provider,
            chat.model()
        );

        Ok(Self {
            embed: Arc::from(embed),
            chat: Arc::from(chat),
        })
    }
}

/// 按党派表顺序构建工具：加载 → 建索引 → 包装成查询引擎
pub async fn build_registry(
    config: &AppConfig,
    providers: &Providers,
    output: &Output,
) -> Result<ToolRegistry> {
    let splitter =
        SentenceSplitter::new(config.chunking.chunk_size, config.chunking.chunk_overlap)?;

    let mut tools = Vec::with_capacity(config.parties.len());
    for party in &config.parties {
        output.status("Loading", &party.path.display().to_string());
        let documents = load_file(&party.path)
            .with_context(|| format!("Failed to load documents for '{}'", party.name))?;

        output.status(
            "Indexing",
            &format!("{} ({} documents)", party.name, documents.len()),
        );
        let index = VectorStoreIndex::from_documents(
            &documents,
            providers.embed.clone(),
            &splitter,
            config.embedding.batch_size,
        )
        .await
        .with_context(|| format!("Failed to build index for '{}'", party.name))?;
        tracing::debug!("Index for '{}': {:?}", party.name, index);

        let engine = RetrieverQueryEngine::new(
            index,
            config.retrieval.similarity_top_k,
            ResponseSynthesizer::new(providers.chat.clone(), config.synthesis.max_context_chars),
        );
        tools.push(QueryEngineTool::new(
            &party.name,
            &party.description,
            Arc::new(engine),
        ));
    }

    ToolRegistry::new(tools)
}

/// 执行一次完整查询
///
/// 凭证在 `connect` 之前解析，缺少 key 时不会创建任何客户端。
pub async fn run<L, C>(
    config: &AppConfig,
    lookup: L,
    connect: C,
    query: &str,
    output: &Output,
) -> Result<Response>
where
    L: Fn(&str) -> Option<String>,
    C: FnOnce(&AppConfig, &ApiCredentials) -> Result<Providers>,
{
    config.validate()?;
    let credentials = ApiCredentials::resolve(config, lookup)?;
    let providers = connect(config, &credentials)?;

    let registry = build_registry(config, &providers, output).await?;
    output.status("Loaded", &format!("{} tools: {}", registry.len(), registry.names().join(", ")));

    let engine = SubQuestionQueryEngine::new(
        registry,
        Box::new(LlmQuestionGenerator::new(providers.chat.clone())),
        ResponseSynthesizer::new(providers.chat.clone(), config.synthesis.max_context_chars),
        config.sub_question.max_sub_questions,
    );

    output.status("Querying", query);
    engine.query(query).await
}
