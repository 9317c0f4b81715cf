use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Serialization error for '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

impl PersistError {
    pub(crate) fn serialization(key: &str, source: serde_json::Error) -> Self {
        Self::Serialization {
            key: key.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PersistError>;
