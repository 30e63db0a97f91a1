//! Error types for target access and batch operations.

use cad_model::{EntityKey, ExternalId, ModelError, ViewId};
use cad_store::StoreError;
use thiserror::Error;

/// Failure reported by the rendering target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("object {id} is locked")]
    Locked { id: ExternalId },

    #[error("object {id} does not exist")]
    NotFound { id: ExternalId },

    #[error("view {view} does not exist")]
    ViewNotFound { view: ViewId },

    #[error("a transaction is already open")]
    TransactionActive,

    #[error("no transaction is open")]
    NoTransaction,

    #[error("{0}")]
    Failed(String),
}

impl TargetError {
    /// Whether the failure concerns a single object only, so a batch can
    /// skip that object and carry on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Locked { .. } | Self::NotFound { .. })
    }
}

pub type TargetResult<T> = std::result::Result<T, TargetError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Target(#[from] TargetError),

    /// A batch hit a non-recoverable failure; nothing it wrote was kept.
    #[error("'{operation}' failed and was rolled back")]
    BatchFailed {
        operation: &'static str,
        #[source]
        source: TargetError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("{0} is not part of the hierarchy")]
    UnknownEntity(EntityKey),
}

impl CoreError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Target(e) => format!("The drawing could not be read: {e}."),
            Self::BatchFailed { operation, source } => {
                format!("{operation} failed ({source}). No changes were made.")
            }
            Self::Store(e) => e.user_message(),
            Self::Model(e) => format!("Invalid value: {e}."),
            Self::UnknownEntity(key) => format!("The {} is no longer loaded.", key.kind()),
        }
    }

    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Target(_) | Self::UnknownEntity(_) => {
                Some("Refresh the layer list and try again.".into())
            }
            Self::BatchFailed { .. } => Some("Check that the view is editable and try again.".into()),
            Self::Store(e) => e.suggestion(),
            Self::Model(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
