//! Error types for registry operations.

use thiserror::Error;

/// Errors that can occur when registering or creating metadata kinds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No factory is registered for the type tag.
    #[error("unregistered metadata type: {0}")]
    UnknownType(String),

    /// Type tags must be non-empty.
    #[error("metadata type name cannot be empty")]
    EmptyTypeName,

    /// The factory builds values that report a different type tag.
    #[error("factory registered as {registered} produces values of type {produced}")]
    FactoryMismatch { registered: String, produced: String },
}

/// Convenience type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
