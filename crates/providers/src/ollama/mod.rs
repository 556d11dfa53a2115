pub mod chat;
pub mod embed;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";
