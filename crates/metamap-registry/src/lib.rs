//! Value registry for metamap.
//!
//! Readers learn which concrete [`Metadata`](metamap_types::Metadata) kind a
//! type tag names by asking a registry. The registry is an ordinary object
//! that the caller builds up front and passes into every read; there is no
//! process-global state.
//!
//! # Modules
//!
//! - [`error`] — Error types for registry operations
//! - [`traits`] — The [`TypeRegistry`] lookup trait used by readers
//! - [`registry`] — [`MetadataRegistry`], a factory map keyed by type tag

pub mod error;
pub mod registry;
pub mod traits;

pub use error::{RegistryError, Result};
pub use registry::{Factory, MetadataRegistry};
pub use traits::TypeRegistry;
