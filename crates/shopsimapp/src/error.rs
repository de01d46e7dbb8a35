use crate::model::RecordId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid {type_name}: {reason}")]
    InvalidEntity {
        type_name: &'static str,
        reason: String,
    },

    #[error("{type_name} with ID {id} already exists")]
    DuplicateKey { type_name: &'static str, id: RecordId },

    #[error("{type_name} not found: {detail}")]
    NotFound {
        type_name: &'static str,
        detail: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

impl StoreError {
    pub fn invalid(type_name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidEntity {
            type_name,
            reason: reason.into(),
        }
    }

    pub fn not_found(type_name: &'static str, detail: impl Into<String>) -> Self {
        Self::NotFound {
            type_name,
            detail: detail.into(),
        }
    }

    /// True for the I/O class of failures (file system or encoding).
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Serialization(_))
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
