//! Todo store errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access `{0}`: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("corrupt store file `{0}`: {1}")]
    Corrupt(PathBuf, #[source] serde_json::Error),

    #[error("failed to serialize todos: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("not found")]
    NotFound,

    #[error("Maximum number of todos ({0}) reached. Please delete some todos first.")]
    Full(usize),
}
