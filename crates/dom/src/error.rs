//! Error types for document-tree operations.
//!
//! Simple, flat error hierarchy. No over-engineering.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(u32),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Markup parse error: {0}")]
    ParseError(String),

    #[error("Invalid insertion: {0}")]
    InvalidInsertion(String),
}
