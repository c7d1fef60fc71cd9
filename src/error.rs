use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Status not found: {0}")]
    StatusNotFound(String),

    #[error("Column order does not match the board's statuses: {0}")]
    OrderMismatch(String),

    #[error("Drag not permitted: {0}")]
    DragNotPermitted(String),

    #[error("Remote rejected request ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
