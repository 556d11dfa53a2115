/// Provider 配置
///
/// API key 由调用方显式传入，客户端不读取任何全局状态。
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider_name: String,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// 仅 embed 使用；None 表示使用模型默认维度
    pub dimension: Option<usize>,
    /// 仅 chat 使用
    pub temperature: Option<f32>,
    /// 仅 chat 使用；None 表示不限制
    pub max_tokens: Option<u32>,
    pub timeout_secs: u64,
}

impl ProviderConfig {
    pub fn new(
        provider_name: impl Into<String>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider_name: provider_name.into(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            dimension: None,
            temperature: None,
            max_tokens: None,
            timeout_secs: 60,
        }
    }

    /// 去掉末尾的 `/`，方便拼接 endpoint
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}
