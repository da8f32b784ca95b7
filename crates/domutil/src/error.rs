//! Error types for the facade operations.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, UtilError>;

#[derive(Debug, Error)]
pub enum UtilError {
    /// Soft not-found: the resolution diagnostic already named the target.
    #[error("Target not found: {0}")]
    TargetNotFound(String),

    #[error(transparent)]
    Dom(#[from] dom::DomError),
}
