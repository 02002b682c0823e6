use crate::domain::error::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("corrupt data: {0}")]
    CorruptData(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("export I/O error: {0}")]
    ExportIo(#[source] std::io::Error),
}

impl AppError {
    /// Domain層のNotFoundかどうか。ホスト側のメッセージ切り替えに使う。
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Domain(DomainError::NotFound(_)))
    }
}
