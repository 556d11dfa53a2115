pub mod chat;
pub mod embed;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
