use thiserror::Error;

#[derive(Debug, Error)]
pub enum JoblyError {
    /// 调用方提供的数据不合法（空的更新内容、非法字段名、越界的值等）
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// 操作时引用的记录不存在
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Unsupported database URL: {0}")]
    UnsupportedDatabase(String),
}

impl JoblyError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, JoblyError::NotFound(_))
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, JoblyError::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, JoblyError>;
