use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rag_types::RagError;

const CONFIG_FILE_NAME: &str = "elecciones.toml";

const DEFAULT_QUERY: &str = "Si soy progresista en lo social, y liberal en lo economico... \
     cual es el partido que mejor se adapta a mis ideales?";

/// 一个政党的纲领文档及其工具描述
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PartyConfig {
    /// 工具名（如 "programa_pp"），规划器据此路由子问题
    pub name: String,
    pub path: PathBuf,
    pub description: String,
}

impl PartyConfig {
    fn manifesto(name: &str, path: &str, party: &str) -> Self {
        Self {
            name: name.to_string(),
            path: PathBuf::from(path),
            description: format!(
                "Proporciona informacion sobre el programa electoral del partido politico {} \
                 para las elecciones generales de 2023",
                party
            ),
        }
    }
}

fn default_parties() -> Vec<PartyConfig> {
    vec![
        PartyConfig::manifesto(
            "programa_pp",
            "Programas/programa_electoral_pp_23j_feijoo_2023.pdf",
            "PP",
        ),
        PartyConfig::manifesto(
            "programa_psoe",
            "Programas/PROGRAMA_ELECTORAL-GENERALES-2023.pdf",
            "PSOE",
        ),
        PartyConfig::manifesto(
            "programa_sumar",
            "Programas/SUMAR_Un-Programa-para-ti.pdf",
            "SUMAR",
        ),
        PartyConfig::manifesto("programa_vox", "Programas/Programa-VOX-2023.pdf", "VOX"),
    ]
}

/// LLM 服务配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    /// 为空时使用供应商默认地址
    pub base_url: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// 为空表示不限制输出长度
    pub max_tokens: Option<u32>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_llm_model(),
            base_url: None,
            temperature: default_temperature(),
            max_tokens: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_llm_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f32 {
    0.5
}

fn default_timeout_secs() -> u64 {
    60
}

/// Embedding 服务配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    pub base_url: Option<String>,

    /// 仅支持可变维度的模型需要设置
    pub dimension: Option<usize>,

    /// 每次请求编码的文本块数量（默认: 10）
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_embedding_model(),
            base_url: None,
            dimension: None,
            batch_size: default_batch_size(),
        }
    }
}

fn default_embedding_model() -> String {
    "text-embedding-ada-002".to_string()
}

fn default_batch_size() -> usize {
    10
}

/// 检索配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrievalConfig {
    /// 每个子问题检索的片段数（默认: 3）
    #[serde(default = "default_similarity_top_k")]
    pub similarity_top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            similarity_top_k: default_similarity_top_k(),
        }
    }
}

fn default_similarity_top_k() -> usize {
    3
}

/// 切分配置（单位: token）
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

fn default_chunk_size() -> usize {
    1024
}

fn default_chunk_overlap() -> usize {
    20
}

/// 答案合成配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SynthesisConfig {
    /// 单次 prompt 中上下文的最大字符数，超出后逐块 refine（默认: 12000）
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            max_context_chars: default_max_context_chars(),
        }
    }
}

fn default_max_context_chars() -> usize {
    12_000
}

/// 子问题拆解配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubQuestionConfig {
    /// 最多执行的子问题数（默认: 8）
    #[serde(default = "default_max_sub_questions")]
    pub max_sub_questions: usize,
}

impl Default for SubQuestionConfig {
    fn default() -> Self {
        Self {
            max_sub_questions: default_max_sub_questions(),
        }
    }
}

fn default_max_sub_questions() -> usize {
    8
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// 存放 API key 的环境变量名（默认: OPENAI_KEY）
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// 命令行未给出问题时使用
    #[serde(default = "default_query")]
    pub query: String,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub embedding: EmbeddingConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,

    #[serde(default)]
    pub chunking: ChunkingConfig,

    #[serde(default)]
    pub synthesis: SynthesisConfig,

    #[serde(default)]
    pub sub_question: SubQuestionConfig,

    /// 政党表，顺序即工具注册顺序
    #[serde(default = "default_parties")]
    pub parties: Vec<PartyConfig>,
}

fn default_api_key_env() -> String {
    "OPENAI_KEY".to_string()
}

fn default_query() -> String {
    DEFAULT_QUERY.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            query: default_query(),
            llm: LlmConfig::default(),
            embedding: EmbeddingConfig::default(),
            retrieval: RetrievalConfig::default(),
            chunking: ChunkingConfig::default(),
            synthesis: SynthesisConfig::default(),
            sub_question: SubQuestionConfig::default(),
            parties: default_parties(),
        }
    }
}

impl AppConfig {
    /// 全局配置目录：~/.elecciones/
    pub fn global_config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".elecciones")
    }

    /// 本地配置文件：./elecciones.toml
    pub fn local_config_path() -> PathBuf {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(CONFIG_FILE_NAME)
    }

    /// 加载配置：
    /// - 指定路径：必须存在
    /// - 未指定：优先本地配置，其次全局配置，最后内置默认值
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::load_from_path(path)?,
            None => {
                let local = Self::local_config_path();
                let global = Self::global_config_dir().join("config.toml");
                if local.exists() {
                    Self::load_from_path(&local)?
                } else if global.exists() {
                    Self::load_from_path(&global)?
                } else {
                    tracing::debug!("No config file found, using built-in defaults");
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// 从指定路径加载配置文件
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RagError::InvalidConfig(format!(
                "configuration not found at: {}",
                path.display()
            ))
            .into());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| RagError::InvalidConfig(format!("{}: {}", path.display(), e)))?;

        tracing::debug!("Loaded app config from: {}", path.display());
        tracing::debug!("LLM: {}/{}", config.llm.provider, config.llm.model);
        tracing::debug!(
            "Embedding: {}/{}",
            config.embedding.provider,
            config.embedding.model
        );

        Ok(config)
    }

    /// 校验配置的一致性
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(RagError::InvalidConfig(msg).into()) };

        if self.parties.is_empty() {
            return invalid("at least one party must be configured".to_string());
        }

        let mut seen = HashSet::new();
        for party in &self.parties {
            if party.name.trim().is_empty() {
                return invalid("party name must not be empty".to_string());
            }
            if !seen.insert(party.name.as_str()) {
                return invalid(format!("duplicate party name: {}", party.name));
            }
        }

        if self.retrieval.similarity_top_k == 0 {
            return invalid("retrieval.similarity_top_k must be at least 1".to_string());
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return invalid(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            ));
        }
        if self.embedding.batch_size == 0 {
            return invalid("embedding.batch_size must be at least 1".to_string());
        }
        if self.sub_question.max_sub_questions == 0 {
            return invalid("sub_question.max_sub_questions must be at least 1".to_string());
        }

        Ok(())
    }

    /// 是否有服务需要 API key
    pub fn requires_api_key(&self) -> bool {
        model_provider::requires_api_key(&self.llm.provider)
            || model_provider::requires_api_key(&self.embedding.provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_four_manifestos() {
        let config = AppConfig::default();

        let names: Vec<&str> = config.parties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "programa_pp",
                "programa_psoe",
                "programa_sumar",
                "programa_vox"
            ]
        );
        assert!(config.parties[3].description.contains("VOX"));
        assert_eq!(config.api_key_env, "OPENAI_KEY");
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
        assert_eq!(config.llm.temperature, 0.5);
        assert_eq!(config.llm.max_tokens, None);
        assert_eq!(config.retrieval.similarity_top_k, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();

        assert_eq!(config.parties.len(), 4);
        assert_eq!(config.chunking.chunk_size, 1024);
        assert_eq!(config.chunking.chunk_overlap, 20);
        assert_eq!(config.embedding.batch_size, 10);
        assert_eq!(config.sub_question.max_sub_questions, 8);
        assert!(config.query.starts_with("Si soy progresista"));
    }

    #[test]
    fn test_parse_custom_parties() {
        let toml_str = r#"
api_key_env = "MY_KEY"
query = "Que proponen sobre energia nuclear?"

[llm]
provider = "ollama"
model = "llama3"
temperature = 0.0

[retrieval]
similarity_top_k = 5

[[parties]]
name = "programa_pp"
path = "pp.pdf"
description = "PP"

[[parties]]
name = "programa_psoe"
path = "psoe.pdf"
description = "PSOE"
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.api_key_env, "MY_KEY");
        assert_eq!(config.llm.provider, "ollama");
        assert_eq!(config.embedding.provider, "openai");
        assert_eq!(config.retrieval.similarity_top_k, 5);
        assert_eq!(config.parties.len(), 2);
        assert_eq!(config.parties[1].path, PathBuf::from("psoe.pdf"));
        assert!(config.requires_api_key());
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let mut config = AppConfig::default();
        config.parties[1].name = "programa_pp".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate party name"));
        assert!(err.downcast_ref::<RagError>().unwrap().is_config());
    }

    #[test]
    fn test_validate_rejects_bad_chunking() {
        let mut config = AppConfig::default();
        config.chunking.chunk_overlap = config.chunking.chunk_size;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.parties.clear();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.retrieval.similarity_top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/elecciones.toml"))).unwrap_err();
        assert!(err.downcast_ref::<RagError>().unwrap().is_config());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[chunking]\nchunk_size = 512\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.chunking.chunk_size, 512);
        assert_eq!(config.chunking.chunk_overlap, 20);
    }

    #[test]
    fn test_ollama_only_needs_no_key() {
        let mut config = AppConfig::default();
        config.llm.provider = "ollama".to_string();
        config.embedding.provider = "ollama".to_string();
        assert!(!config.requires_api_key());
    }
}
