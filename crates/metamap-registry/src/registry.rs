//! [`MetadataRegistry`]: a factory map keyed by type tag.

use std::collections::HashMap;
use std::fmt;

use metamap_types::{
    BoolMetadata, DoubleMetadata, FloatMetadata, Int32Metadata, Int64Metadata, MetaValue,
    Metadata, StringMetadata, TypedMetadata, Vec3DMetadata, Vec3IMetadata, Vec3SMetadata,
};
use tracing::debug;

use crate::error::{RegistryError, Result};
use crate::traits::TypeRegistry;

/// Zero-argument constructor for a default metadata value.
pub type Factory = Box<dyn Fn() -> Box<dyn Metadata> + Send + Sync>;

/// Registry of metadata kinds.
///
/// Populate it once (usually with [`with_builtins`](Self::with_builtins)
/// plus any application kinds), then share it by reference with readers.
/// Re-registering a tag replaces its factory: last write wins.
#[derive(Default)]
pub struct MetadataRegistry {
    factories: HashMap<String, Factory>,
}

impl MetadataRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in metadata kind.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtins();
        registry
    }

    /// Register the built-in kinds (bool, int32, int64, float, double,
    /// string, vec3i, vec3s, vec3d).
    pub fn register_builtins(&mut self) {
        self.register_default::<BoolMetadata>();
        self.register_default::<Int32Metadata>();
        self.register_default::<Int64Metadata>();
        self.register_default::<FloatMetadata>();
        self.register_default::<DoubleMetadata>();
        self.register_default::<StringMetadata>();
        self.register_default::<Vec3IMetadata>();
        self.register_default::<Vec3SMetadata>();
        self.register_default::<Vec3DMetadata>();
    }

    /// Register the kind for a [`MetaValue`] payload type.
    pub fn register_type<T: MetaValue>(&mut self) {
        self.register_default::<TypedMetadata<T>>();
    }

    /// Register `factory` under `type_name`.
    ///
    /// The factory is called once to check that it builds values tagged
    /// `type_name`. On error the registry is unchanged.
    pub fn register<F>(&mut self, type_name: impl Into<String>, factory: F) -> Result<()>
    where
        F: Fn() -> Box<dyn Metadata> + Send + Sync + 'static,
    {
        let type_name = type_name.into();
        if type_name.is_empty() {
            return Err(RegistryError::EmptyTypeName);
        }
        let sample = factory();
        if sample.type_name() != type_name {
            return Err(RegistryError::FactoryMismatch {
                registered: type_name,
                produced: sample.type_name().to_string(),
            });
        }
        if self.factories.insert(type_name.clone(), Box::new(factory)).is_some() {
            debug!(type_name = %type_name, "replaced metadata factory");
        }
        Ok(())
    }

    /// Remove a kind. Returns `true` if it was registered.
    pub fn unregister(&mut self, type_name: &str) -> bool {
        self.factories.remove(type_name).is_some()
    }

    /// Remove every kind.
    pub fn clear(&mut self) {
        self.factories.clear();
    }

    /// Registered type tags in sorted order.
    pub fn registered_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    // Statically typed kinds always report their own tag, so the checked
    // path in `register` cannot fail here.
    fn register_default<M: Metadata + Default>(&mut self) {
        let type_name = M::default().type_name().to_string();
        self.factories
            .insert(type_name, Box::new(|| Box::new(M::default()) as Box<dyn Metadata>));
    }
}

impl TypeRegistry for MetadataRegistry {
    fn is_registered(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    fn create(&self, type_name: &str) -> Result<Box<dyn Metadata>> {
        let factory = self
            .factories
            .get(type_name)
            .ok_or_else(|| RegistryError::UnknownType(type_name.to_string()))?;
        Ok(factory())
    }
}

impl fmt::Debug for MetadataRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataRegistry")
            .field("types", &self.registered_types())
            .finish()
    }
}
