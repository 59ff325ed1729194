use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid template JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template document must be a JSON array, found {found}")]
    NotAList { found: &'static str },

    #[error("Unknown element type: {0}")]
    UnknownElementType(String),

    #[error("Element type '{0}' cannot be created by drag and drop")]
    NotDroppable(String),
}

impl ModelError {
    pub fn not_a_list(value: &serde_json::Value) -> Self {
        let found = match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "a boolean",
            serde_json::Value::Number(_) => "a number",
            serde_json::Value::String(_) => "a string",
            serde_json::Value::Object(_) => "an object",
            serde_json::Value::Array(_) => "an array",
        };
        Self::NotAList { found }
    }
}
