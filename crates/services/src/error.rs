//! Shared error types for the services crate.

use thiserror::Error;

use storage::document::DocumentError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ProgressService` mutations.
///
/// Inputs are typed, so the only failures left are the storage medium
/// refusing a read-for-update or a write.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Encode(#[from] DocumentError),
}

/// Errors emitted by review sessions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReviewSessionError {
    #[error("no words to review")]
    Empty,
    #[error("review session already completed")]
    Completed,
    #[error(transparent)]
    Progress(#[from] ProgressServiceError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
