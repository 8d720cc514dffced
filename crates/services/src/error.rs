//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{CatalogueError, ScoreError};

/// Errors emitted by quiz session services.
///
/// Session transitions themselves never fail; these only surface while
/// opening a session or summarizing one.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),
    #[error(transparent)]
    Summary(#[from] ScoreError),
}
