//! [`MetaMap`]: an ordered, type-stable map from names to metadata values.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use metamap_types::{MetaValue, Metadata, TypedMetadata};

use crate::error::{MapError, MapResult};

/// How a map slot holds its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ownership {
    /// Only this map references the value.
    Exclusive,
    /// The value is aliased by another map (via [`MetaMap::copy_shallow`]) or
    /// by a handle from [`MetaMap::get_shared`]. It is read-only until the
    /// slot is replaced.
    Shared,
}

/// Named metadata values attached to a host object.
///
/// Entries iterate in ascending name order; serialization and `Display`
/// follow that order. A name, once bound, only accepts values of the same
/// type tag through [`insert`](Self::insert).
///
/// Slots hold `Arc<dyn Metadata>`. Values are exclusively owned unless a
/// shallow copy or a [`get_shared`](Self::get_shared) handle aliases them.
/// Replacement and removal only touch this map's slot and are always safe
/// with respect to aliases; in-place mutation through
/// [`metadata_mut`](Self::metadata_mut) is refused on shared slots.
#[derive(Debug, Default)]
pub struct MetaMap {
    entries: BTreeMap<String, Arc<dyn Metadata>>,
}

impl MetaMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to a copy of `value`.
    ///
    /// Fails without modifying the map if `name` is empty, if `value` has an
    /// empty type tag, or if `name` is already bound to a value with a
    /// different type tag. Replacing a same-typed value swaps
    /// a new instance into the slot; aliases of the old instance keep it.
    pub fn insert(&mut self, name: &str, value: &dyn Metadata) -> MapResult<()> {
        if name.is_empty() {
            return Err(MapError::EmptyName);
        }
        if value.type_name().is_empty() {
            return Err(MapError::EmptyTypeName {
                name: name.to_string(),
            });
        }
        if let Some(existing) = self.entries.get(name) {
            if existing.type_name() != value.type_name() {
                return Err(MapError::TypeMismatch {
                    name: name.to_string(),
                    existing: existing.type_name().to_string(),
                    offered: value.type_name().to_string(),
                });
            }
        }
        self.entries.insert(name.to_string(), Arc::from(value.copy()));
        Ok(())
    }

    /// Bind `name` to a plain payload value.
    pub fn insert_value<T: MetaValue>(&mut self, name: &str, value: T) -> MapResult<()> {
        self.insert(name, &TypedMetadata::new(value))
    }

    /// Remove `name`. Returns `true` if it was present; absent names are a
    /// no-op.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, name: &str) -> Option<&dyn Metadata> {
        self.entries.get(name).map(|value| &**value)
    }

    /// A shared handle to the value. While the handle lives the slot reports
    /// [`Ownership::Shared`].
    pub fn get_shared(&self, name: &str) -> Option<Arc<dyn Metadata>> {
        self.entries.get(name).cloned()
    }

    /// The payload stored under `name`.
    ///
    /// Fails with `NotFound` if absent and `TypeMismatch` if the entry holds
    /// a different kind.
    pub fn value<T: MetaValue>(&self, name: &str) -> MapResult<&T> {
        let meta = self.get(name).ok_or_else(|| MapError::NotFound {
            name: name.to_string(),
        })?;
        meta.downcast_ref::<TypedMetadata<T>>()
            .map(TypedMetadata::value)
            .ok_or_else(|| MapError::TypeMismatch {
                name: name.to_string(),
                existing: meta.type_name().to_string(),
                offered: T::TYPE_NAME.to_string(),
            })
    }

    /// Mutable access to an exclusively owned value.
    ///
    /// Fails with `SharedValue` if the value is aliased; use
    /// [`insert`](Self::insert) to replace it instead.
    pub fn metadata_mut(&mut self, name: &str) -> MapResult<&mut dyn Metadata> {
        let slot = self.entries.get_mut(name).ok_or_else(|| MapError::NotFound {
            name: name.to_string(),
        })?;
        Arc::get_mut(slot).ok_or_else(|| MapError::SharedValue {
            name: name.to_string(),
        })
    }

    /// Mutable access to an exclusively owned payload.
    pub fn value_mut<T: MetaValue>(&mut self, name: &str) -> MapResult<&mut T> {
        let meta = self.metadata_mut(name)?;
        let existing = meta.type_name().to_string();
        match meta.downcast_mut::<TypedMetadata<T>>() {
            Some(typed) => Ok(typed.value_mut()),
            None => Err(MapError::TypeMismatch {
                name: name.to_string(),
                existing,
                offered: T::TYPE_NAME.to_string(),
            }),
        }
    }

    pub fn ownership(&self, name: &str) -> Option<Ownership> {
        self.entries.get(name).map(|value| {
            if Arc::strong_count(value) > 1 {
                Ownership::Shared
            } else {
                Ownership::Exclusive
            }
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Metadata)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), &**value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// A map whose slots alias this map's value instances.
    pub fn copy_shallow(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }

    /// A map with an independent copy of every value.
    pub fn copy_deep(&self) -> Self {
        let mut copy = Self::new();
        copy.extend_copies(self);
        copy
    }

    // Keys in `source` are unique and non-empty and `self` holds none of
    // them yet, so this is `insert` without the checks that cannot fail.
    fn extend_copies(&mut self, source: &Self) {
        for (name, value) in &source.entries {
            self.entries.insert(name.clone(), Arc::from(value.copy()));
        }
    }
}

/// Cloning is a deep copy.
impl Clone for MetaMap {
    fn clone(&self) -> Self {
        self.copy_deep()
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.extend_copies(source);
    }
}

/// Equal names in the same order, with the same type tags and byte-identical
/// payloads.
impl PartialEq for MetaMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((a_name, a), (b_name, b))| a_name == b_name && a.same_value(b))
    }
}

impl fmt::Display for MetaMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MetaMap:")?;
        for (name, value) in self.iter() {
            writeln!(f, "    {name} = {value}")?;
        }
        Ok(())
    }
}
