//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Storage error: {0}")]
    Store(#[from] sheetedit_common::CommonError),

    #[error("Another edit is already in progress")]
    EditInProgress,

    #[error("Edit record does not belong to the open edit")]
    StaleEdit,

    #[error("Edit record has no after-snapshot")]
    UnfinishedEdit,

    #[error("Session is closed")]
    SessionClosed,

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Responder failed: {0}")]
    Responder(String),
}
