use thiserror::Error;

/// 流水线错误分类
///
/// 各层用 `anyhow` 传播，需要区分类别时通过 `downcast_ref::<RagError>()` 判断。
#[derive(Debug, Error)]
pub enum RagError {
    /// 缺少 API key（在任何网络调用之前报出）
    #[error("missing API key: environment variable {var} is not set or empty")]
    MissingApiKey { var: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// 输入文件不存在、不可读或解析失败
    #[error("failed to load {path}: {reason}")]
    Load { path: String, reason: String },

    /// 子问题规划或答案合成失败
    #[error("sub-question planning failed: {0}")]
    Plan(String),

    #[error("cannot build an index from an empty document set")]
    EmptyIndex,
}

impl RagError {
    pub fn load(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::MissingApiKey { .. } | Self::InvalidConfig(_))
    }
}
