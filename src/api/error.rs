use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("后端请求失败: {0}")]
    Http(#[from] reqwest::Error),
    #[error("解析后端响应失败: {0}")]
    Json(#[from] serde_json::Error),
    #[error("后端 {endpoint} 返回状态 {status}: {body}")]
    ApiStatus {
        endpoint: String,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("{0}")]
    Rejected(String),
    #[error("后端响应结构异常: {0}")]
    Schema(String),
}
