//! Error types for the preference core

use thiserror::Error;

/// Failures raised by a storage backend.
///
/// These never leave `PreferenceStore`; they are logged and translated into
/// "use the default" or "persistence skipped".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage is unavailable")]
    Unavailable,

    #[error("Storage read failed: {0}")]
    Read(String),

    #[error("Storage write failed: {0}")]
    Write(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("Unknown syntax preference: {0}")]
    UnknownPreference(String),

    #[error("A tab group needs at least one variant")]
    EmptyTabGroup,

    #[error("Invalid tab group transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}
