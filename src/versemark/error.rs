use crate::reference::Reference;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VersemarkError {
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Reference not found in corpus: {0}")]
    NotFound(Reference),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, VersemarkError>;
