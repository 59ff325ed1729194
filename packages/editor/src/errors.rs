//! Error types for the editor

use labelforge_model::{ElementId, ModelError};
use labelforge_services::ServiceError;
use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid {command} payload: {reason}")]
    InvalidPayload {
        command: &'static str,
        reason: String,
    },

    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    #[error("Element {element_id} does not support {action}")]
    Unsupported {
        element_id: ElementId,
        action: &'static str,
    },

    #[error("Element {element_id} is missing {field}")]
    MissingField {
        element_id: ElementId,
        field: &'static str,
    },

    #[error("Edit session is closed")]
    SessionClosed,

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
