use thiserror::Error;

pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("malformed footer: {0}")]
    MalformedFooter(String),
    #[error("unknown type: {0}")]
    UnknownType(serde_json::Value),
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),
}

impl SchemaError {
    pub fn malformed(message: impl Into<String>) -> Self {
        SchemaError::MalformedFooter(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        SchemaError::InvalidSchema(message.into())
    }

    pub fn unknown(node: &serde_json::Value) -> Self {
        SchemaError::UnknownType(node.clone())
    }

    /// Whether the error was raised by the byte source rather than by its content.
    pub fn is_transport(&self) -> bool {
        matches!(self, SchemaError::Io(_) | SchemaError::ObjectStore(_))
    }
}
