use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use crate::ports::keys::KeyGenerationError;

/// 统一的错误类型
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// 密钥生成失败
    #[error("Key generation error: {0}")]
    KeyGeneration(#[from] KeyGenerationError),

    /// SQLx 数据库错误
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// 仓库未找到
    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    /// 仓库已存在
    #[error("Repository already exists: {0}")]
    RepositoryExists(String),

    /// 该主机没有克隆地址模板，且未提供地址
    #[error("No clone URL template for host {0}; a url must be supplied")]
    MissingCloneUrl(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    /// 解析错误
    #[error("Parse error: {0}")]
    Parse(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    Internal(String),

    /// Anyhow 错误兼容
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// 用于 Axum 的错误响应实现
impl IntoResponse for RepoError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            RepoError::RepositoryNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            RepoError::RepositoryExists(_) => (StatusCode::CONFLICT, self.to_string()),
            RepoError::MissingCloneUrl(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            RepoError::Parse(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            RepoError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            RepoError::KeyGeneration(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Key generation failed".to_string()),
            RepoError::Sqlx(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string()),
        };

        tracing::error!("Request error: {}", self);

        (status, message).into_response()
    }
}

/// 从字符串创建配置错误
impl From<String> for RepoError {
    fn from(s: String) -> Self {
        RepoError::Config(s)
    }
}

/// 从 &str 创建配置错误
impl From<&str> for RepoError {
    fn from(s: &str) -> Self {
        RepoError::Config(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (RepoError::RepositoryNotFound("x".into()), StatusCode::NOT_FOUND),
            (RepoError::RepositoryExists("x".into()), StatusCode::CONFLICT),
            (RepoError::MissingCloneUrl("custom".into()), StatusCode::BAD_REQUEST),
            (RepoError::Parse("bad".into()), StatusCode::BAD_REQUEST),
            (RepoError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                RepoError::KeyGeneration(KeyGenerationError::Rsa(rsa::Error::Internal)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_startup_context_keeps_cause() {
        use anyhow::Context;

        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let err: RepoError = Err::<(), _>(io)
            .context("failed to bind 127.0.0.1:3000")
            .unwrap_err()
            .into();

        assert!(matches!(err, RepoError::Other(_)));
        assert_eq!(err.to_string(), "failed to bind 127.0.0.1:3000");
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
