use thiserror::Error;

use crate::utils::AppError;

/// 服务器启动/运行期错误（非 HTTP 响应错误）
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库错误: {0}")]
    Database(String),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

impl From<AppError> for ServerError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::Database(msg) => ServerError::Database(msg),
            other => ServerError::Internal(anyhow::anyhow!(other)),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
