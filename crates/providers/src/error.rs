use thiserror::Error;

/// 模型服务调用错误
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{service} API error ({status}): {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} response has no {what}")]
    EmptyResponse {
        service: &'static str,
        what: &'static str,
    },

    #[error("{service} response malformed: {reason}")]
    Malformed {
        service: &'static str,
        reason: String,
    },
}
