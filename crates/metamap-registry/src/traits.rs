//! The [`TypeRegistry`] trait: the lookup capability handed to readers.

use metamap_types::Metadata;

use crate::error::Result;

/// Resolves type tags to default-constructed metadata values.
///
/// Lookups take `&self`. Any mutation an implementation offers must take
/// `&mut self`, so registration cannot overlap a read that borrows the
/// registry.
pub trait TypeRegistry {
    /// Returns `true` if `type_name` can be constructed.
    fn is_registered(&self, type_name: &str) -> bool;

    /// Build a default value of kind `type_name`.
    ///
    /// Fails with [`RegistryError::UnknownType`](crate::RegistryError::UnknownType)
    /// if the tag is not registered.
    fn create(&self, type_name: &str) -> Result<Box<dyn Metadata>>;
}
