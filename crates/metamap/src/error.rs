use metamap_registry::RegistryError;
use metamap_types::ValueError;
use thiserror::Error;

/// Errors from metadata map operations.
#[derive(Debug, Error)]
pub enum MapError {
    /// Metadata names must be non-empty.
    #[error("metadata name cannot be an empty string")]
    EmptyName,

    /// Values must carry a non-empty type tag.
    #[error("metadata {name} has an empty type name")]
    EmptyTypeName { name: String },

    /// A name may only be rebound to a value of the same type.
    #[error("cannot assign value of type {offered} to metadata attribute {name} of type {existing}")]
    TypeMismatch {
        name: String,
        existing: String,
        offered: String,
    },

    /// No entry is bound to the name.
    #[error("metadata not found: {name}")]
    NotFound { name: String },

    /// The value is aliased by a shallow copy and cannot be mutated in place.
    #[error("metadata {name} is shared with another map; replace it with insert instead")]
    SharedValue { name: String },

    /// The entry count does not fit the wire format's `u32`.
    #[error("too many metadata entries to serialize: {0}")]
    TooManyEntries(usize),

    /// A length read from the stream is above the configured limit.
    #[error("{what} length {len} exceeds limit {max}")]
    LimitExceeded {
        what: &'static str,
        len: u32,
        max: u32,
    },

    /// A value failed to encode or decode.
    #[error(transparent)]
    Value(#[from] ValueError),

    /// The registry could not build a value.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl MapError {
    /// Returns `true` for a truncated or unparseable stream.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Value(ValueError::MalformedStream { .. }))
    }
}

/// Result alias for map operations.
pub type MapResult<T> = Result<T, MapError>;
