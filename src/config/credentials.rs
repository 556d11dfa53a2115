use anyhow::Result;
use std::fmt;

use rag_types::RagError;

use super::AppConfig;

/// 从 `.env` 补充环境变量；文件不存在时忽略
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Failed to read .env file: {}", e),
    }
}

/// 已解析的 API 凭证，显式传给各 provider
#[derive(Clone)]
pub struct ApiCredentials {
    api_key: Option<String>,
}

impl ApiCredentials {
    /// 通过 `lookup` 读取 `config.api_key_env`
    ///
    /// 需要 key 的服务缺少 key 时立即报配置错误，此时尚未创建任何客户端。
    pub fn resolve<F>(config: &AppConfig, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(&config.api_key_env)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        if api_key.is_none() && config.requires_api_key() {
            return Err(RagError::MissingApiKey {
                var: config.api_key_env.clone(),
            }
            .into());
        }

        Ok(Self { api_key })
    }

    pub fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}
