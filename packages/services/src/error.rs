use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("AI request failed: {0}")]
    Ai(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}
