mod app_config;
mod credentials;
mod providers;

pub use app_config::{
    AppConfig, ChunkingConfig, EmbeddingConfig, LlmConfig, PartyConfig, RetrievalConfig,
    SubQuestionConfig, SynthesisConfig,
};
pub use credentials::{load_dotenv, ApiCredentials};
