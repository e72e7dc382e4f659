//! Binary encoding of a [`MetaMap`].
//!
//! Stream format (all integers little-endian):
//! ```text
//! [4 bytes: entry count (u32)]
//! per entry, in name order:
//!   [u32 len][name bytes]
//!   [u32 len][type tag bytes]
//!   [u32 size][value body]
//! ```
//! The size prefix on the value body lets a reader skip a payload whose type
//! tag it cannot construct.

use std::io::{Read, Write};

use metamap_registry::TypeRegistry;
use metamap_types::{wire, Metadata, UnknownMetadata, ValueError};
use tracing::{debug, warn};

use crate::config::{ReadOptions, UnknownTypePolicy};
use crate::error::{MapError, MapResult};
use crate::map::MetaMap;

/// An entry whose type tag was not registered with the reader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownEntry {
    pub name: String,
    pub type_name: String,
    /// Size in bytes of the skipped payload body.
    pub size: usize,
    /// Whether the entry was kept in the map as [`UnknownMetadata`].
    pub retained: bool,
}

/// Outcome of [`MetaMap::read`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadSummary {
    /// Entry count declared by the stream.
    pub declared: u32,
    /// Distinct map slots filled. A name repeated in the stream with the
    /// same type counts once; its last value wins.
    pub inserted: usize,
    /// Entries with unregistered type tags, in stream order.
    pub unknown: Vec<UnknownEntry>,
}

impl ReadSummary {
    /// Returns `true` if every declared entry was materialized with a
    /// registered type.
    pub fn is_complete(&self) -> bool {
        self.unknown.is_empty()
    }
}

impl MetaMap {
    /// Serialize every entry in name order.
    pub fn write(&self, w: &mut dyn Write) -> MapResult<()> {
        let count =
            u32::try_from(self.len()).map_err(|_| MapError::TooManyEntries(self.len()))?;
        wire::write_u32(w, count)?;
        for (name, value) in self.iter() {
            wire::write_string(w, name)?;
            wire::write_string(w, value.type_name())?;
            wire::write_bytes(w, &value.encode_value()?)?;
        }
        debug!(count, "metadata map written");
        Ok(())
    }

    /// Serialize to a new buffer.
    pub fn to_bytes(&self) -> MapResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.write(&mut buf)?;
        Ok(buf)
    }

    /// Replace the contents of this map with entries read from `r`, using
    /// default [`ReadOptions`].
    pub fn read<R>(&mut self, r: &mut dyn Read, registry: &R) -> MapResult<ReadSummary>
    where
        R: TypeRegistry + ?Sized,
    {
        self.read_with(r, registry, &ReadOptions::default())
    }

    /// Replace the contents of this map with entries read from `r`.
    ///
    /// The map is cleared first. Entries with registered type tags are built
    /// through `registry` and inserted. Entries with unregistered tags have
    /// their payload consumed, are logged, and are handled per
    /// [`ReadOptions::unknown_types`].
    ///
    /// Any other failure aborts the read immediately. The map then holds
    /// only the entries read before the failure.
    pub fn read_with<R>(
        &mut self,
        r: &mut dyn Read,
        registry: &R,
        options: &ReadOptions,
    ) -> MapResult<ReadSummary>
    where
        R: TypeRegistry + ?Sized,
    {
        self.clear();

        let declared = wire::read_u32(r)?;
        let mut summary = ReadSummary {
            declared,
            ..Default::default()
        };

        for _ in 0..declared {
            let name = read_field(r, "metadata name", options.max_string_len)?;
            let type_name = read_field(r, "metadata type name", options.max_string_len)?;
            if type_name.is_empty() {
                return Err(ValueError::malformed(format!(
                    "empty type name for metadata {name}"
                ))
                .into());
            }
            let fresh = !self.contains(&name);

            if registry.is_registered(&type_name) {
                let mut value = registry.create(&type_name)?;
                read_payload(r, &mut *value, options.max_value_size)?;
                self.insert(&name, &*value)?;
                summary.inserted += usize::from(fresh);
                continue;
            }

            let mut value = UnknownMetadata::new(type_name.as_str());
            read_payload(r, &mut value, options.max_value_size)?;
            let retained = options.unknown_types == UnknownTypePolicy::Retain;
            warn!(
                name = %name,
                type_name = %type_name,
                size = value.bytes().len(),
                retained,
                "cannot read metadata of unregistered type"
            );
            if retained {
                self.insert(&name, &value)?;
                summary.inserted += usize::from(fresh);
            }
            summary.unknown.push(UnknownEntry {
                name,
                type_name,
                size: value.bytes().len(),
                retained,
            });
        }

        debug!(
            declared,
            inserted = summary.inserted,
            unknown = summary.unknown.len(),
            "metadata map read"
        );
        Ok(summary)
    }

    /// Build a map from a serialized buffer with default [`ReadOptions`].
    pub fn from_bytes<R>(bytes: &[u8], registry: &R) -> MapResult<Self>
    where
        R: TypeRegistry + ?Sized,
    {
        let mut map = Self::new();
        let mut cursor = bytes;
        map.read(&mut cursor, registry)?;
        Ok(map)
    }
}

fn read_field(r: &mut dyn Read, what: &'static str, max: u32) -> MapResult<String> {
    let len = wire::read_u32(r)?;
    if len > max {
        return Err(MapError::LimitExceeded { what, len, max });
    }
    let bytes = wire::read_exact_vec(r, len)?;
    Ok(wire::decode_utf8(bytes)?)
}

// The map owns the payload frame on both sides: `write` pairs with this
// around `encode_value`/`decode_value`, whatever `Metadata::write` does.
fn read_payload(r: &mut dyn Read, value: &mut dyn Metadata, max: u32) -> MapResult<()> {
    let size = wire::read_u32(r)?;
    if size > max {
        return Err(MapError::LimitExceeded {
            what: "metadata value",
            len: size,
            max,
        });
    }
    let body = wire::read_exact_vec(r, size)?;
    value.decode_value(&body)?;
    Ok(())
}
