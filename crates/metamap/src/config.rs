use serde::{Deserialize, Serialize};

/// What `read` does with an entry whose type tag is not registered.
///
/// In both cases the payload is consumed so the stream stays aligned, and a
/// warning is logged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTypePolicy {
    /// Drop the entry from the map.
    Discard,
    /// Keep the entry as an [`UnknownMetadata`](metamap_types::UnknownMetadata)
    /// so a later write re-emits the original bytes.
    Retain,
}

impl Default for UnknownTypePolicy {
    fn default() -> Self {
        Self::Discard
    }
}

/// Options for reading a metadata map from a stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// Handling of unregistered type tags.
    pub unknown_types: UnknownTypePolicy,
    /// Maximum length in bytes of a name or type tag (default: 64 KiB).
    pub max_string_len: u32,
    /// Maximum size in bytes of a single value payload (default: 256 MiB).
    pub max_value_size: u32,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            unknown_types: UnknownTypePolicy::default(),
            max_string_len: 64 * 1024,
            max_value_size: 256 * 1024 * 1024,
        }
    }
}

impl ReadOptions {
    /// Default limits, keeping unknown-typed entries in the map.
    pub fn retain_unknown() -> Self {
        Self {
            unknown_types: UnknownTypePolicy::Retain,
            ..Default::default()
        }
    }
}
