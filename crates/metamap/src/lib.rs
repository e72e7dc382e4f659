//! Named, type-stable metadata attached to a host object.
//!
//! A [`MetaMap`] binds names to polymorphic [`Metadata`] values and
//! serializes them to a self-describing binary stream. Readers resolve type
//! tags through an injected [`TypeRegistry`]; payloads of unregistered types
//! are skipped intact, so older readers can load streams written by newer
//! writers.
//!
//! # Example
//!
//! ```
//! use metamap::{MetaMap, MetadataRegistry};
//!
//! let mut map = MetaMap::new();
//! map.insert_value("radius", 4.5f64).unwrap();
//! let bytes = map.to_bytes().unwrap();
//!
//! let registry = MetadataRegistry::with_builtins();
//! let decoded = MetaMap::from_bytes(&bytes, &registry).unwrap();
//! assert_eq!(*decoded.value::<f64>("radius").unwrap(), 4.5);
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod map;

pub use codec::{ReadSummary, UnknownEntry};
pub use config::{ReadOptions, UnknownTypePolicy};
pub use error::{MapError, MapResult};
pub use map::{MetaMap, Ownership};

pub use metamap_registry::{MetadataRegistry, RegistryError, TypeRegistry};
pub use metamap_types::{
    BoolMetadata, DoubleMetadata, FloatMetadata, Int32Metadata, Int64Metadata, MetaValue,
    Metadata, StringMetadata, TypedMetadata, UnknownMetadata, ValueError, Vec3DMetadata,
    Vec3IMetadata, Vec3SMetadata,
};

#[cfg(test)]
mod tests {
    use std::io::{Seek, SeekFrom, Write};
    use std::sync::{Arc, Mutex};

    use metamap_types::wire;
    use proptest::prelude::*;

    use super::*;

    fn registry() -> MetadataRegistry {
        MetadataRegistry::with_builtins()
    }

    fn sample() -> MetaMap {
        let mut map = MetaMap::new();
        map.insert_value("radius", 4.5f64).unwrap();
        map.insert_value("name", String::from("sphere")).unwrap();
        map.insert_value("voxels", 1_000_000i64).unwrap();
        map.insert_value("center", [1i32, 2, 3]).unwrap();
        map
    }

    fn triples(map: &MetaMap) -> Vec<(String, String, String)> {
        map.iter()
            .map(|(name, value)| {
                (name.to_string(), value.type_name().to_string(), value.to_string())
            })
            .collect()
    }

    #[test]
    fn write_then_read_reconstructs_triples() {
        let map = sample();
        let bytes = map.to_bytes().unwrap();
        let decoded = MetaMap::from_bytes(&bytes, &registry()).unwrap();
        assert_eq!(triples(&decoded), triples(&map));
    }

    #[test]
    fn empty_name_insert_leaves_bytes_identical() {
        let mut map = sample();
        let before = map.to_bytes().unwrap();
        let err = map.insert("", &StringMetadata::new("v".into())).unwrap_err();
        assert!(matches!(err, MapError::EmptyName));
        assert_eq!(map.to_bytes().unwrap(), before);
    }

    #[test]
    fn rebinding_to_other_type_is_rejected() {
        let mut map = sample();
        let err = map
            .insert("radius", &StringMetadata::new("x".into()))
            .unwrap_err();
        assert!(matches!(err, MapError::TypeMismatch { .. }));
        assert!(map.to_string().contains("    radius = 4.5\n"));
    }

    #[test]
    fn same_type_rebind_replaces_only_that_entry() {
        let mut map = sample();
        let before = triples(&map);
        map.insert("radius", &DoubleMetadata::new(9.0)).unwrap();
        let after = triples(&map);

        assert_eq!(after.len(), before.len());
        for (old, new) in before.iter().zip(&after) {
            if old.0 == "radius" {
                assert_eq!(new.2, "9");
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn removing_missing_name_changes_nothing() {
        let mut map = sample();
        let before = map.to_bytes().unwrap();
        assert!(!map.remove("missing"));
        assert_eq!(map.to_bytes().unwrap(), before);
    }

    #[test]
    fn deep_copy_isolated_in_both_directions() {
        let mut map = sample();
        let mut copy = map.copy_deep();

        copy.insert_value("radius", 1.0f64).unwrap();
        assert_eq!(*map.value::<f64>("radius").unwrap(), 4.5);

        map.insert_value("name", String::from("cube")).unwrap();
        assert_eq!(copy.value::<String>("name").unwrap(), "sphere");
    }

    #[test]
    fn shallow_copy_replacement_is_not_shared() {
        let mut map = sample();
        let mut alias = map.copy_shallow();
        assert_eq!(triples(&alias), triples(&map));

        alias.insert_value("radius", 2.0f64).unwrap();
        assert_eq!(*map.value::<f64>("radius").unwrap(), 4.5);

        map.insert_value("voxels", 8i64).unwrap();
        assert_eq!(*alias.value::<i64>("voxels").unwrap(), 1_000_000);
    }

    #[test]
    fn unknown_entry_is_skipped_before_known_entry() {
        let mut bytes = Vec::new();
        wire::write_u32(&mut bytes, 2).unwrap();
        wire::write_string(&mut bytes, "aaa_future").unwrap();
        wire::write_string(&mut bytes, "mat4d").unwrap();
        wire::write_bytes(&mut bytes, &[7u8; 128]).unwrap();
        wire::write_string(&mut bytes, "zzz_known").unwrap();
        wire::write_string(&mut bytes, "string").unwrap();
        wire::write_bytes(&mut bytes, b"still aligned").unwrap();

        let mut map = MetaMap::new();
        let summary = map.read(&mut bytes.as_slice(), &registry()).unwrap();

        assert_eq!(summary.unknown.len(), 1);
        assert_eq!(summary.unknown[0].name, "aaa_future");
        assert_eq!(summary.unknown[0].type_name, "mat4d");
        assert!(!map.contains("aaa_future"));
        assert_eq!(map.value::<String>("zzz_known").unwrap(), "still aligned");
        assert_eq!(map.len(), 1);
    }

    /// Collects formatted log output so tests can inspect diagnostics.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn unknown_type_emits_warning() {
        let mut map = sample();
        map.insert("legacy", &UnknownMetadata::with_bytes("half", vec![0, 60]))
            .unwrap();
        let bytes = map.to_bytes().unwrap();

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let decoded = tracing::subscriber::with_default(subscriber, || {
            MetaMap::from_bytes(&bytes, &registry()).unwrap()
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"), "no warning logged: {output}");
        assert!(output.contains("cannot read metadata of unregistered type"));
        assert!(output.contains("legacy"));
        assert!(output.contains("half"));
        assert!(!decoded.contains("legacy"));
        assert_eq!(decoded.len(), 4);
    }

    #[test]
    fn file_backed_stream_roundtrip() {
        let mut file = tempfile::tempfile().unwrap();
        let map = sample();
        map.write(&mut file).unwrap();
        // Trailing data after the map belongs to the host object.
        file.write_all(b"host").unwrap();

        file.seek(SeekFrom::Start(0)).unwrap();
        let mut decoded = MetaMap::new();
        decoded.read(&mut file, &registry()).unwrap();
        assert_eq!(decoded, map);

        let mut rest = String::new();
        std::io::Read::read_to_string(&mut file, &mut rest).unwrap();
        assert_eq!(rest, "host");
    }

    #[derive(Clone, Debug)]
    enum AnyValue {
        Bool(bool),
        Int32(i32),
        Int64(i64),
        Float(f32),
        Double(f64),
        Str(String),
        Vec3I([i32; 3]),
        Vec3D([f64; 3]),
    }

    fn any_value() -> impl Strategy<Value = AnyValue> {
        prop_oneof![
            any::<bool>().prop_map(AnyValue::Bool),
            any::<i32>().prop_map(AnyValue::Int32),
            any::<i64>().prop_map(AnyValue::Int64),
            any::<f32>().prop_map(AnyValue::Float),
            any::<f64>().prop_map(AnyValue::Double),
            ".{0,24}".prop_map(AnyValue::Str),
            any::<[i32; 3]>().prop_map(AnyValue::Vec3I),
            any::<[f64; 3]>().prop_map(AnyValue::Vec3D),
        ]
    }

    fn build_map(entries: &[(String, AnyValue)]) -> MetaMap {
        let mut map = MetaMap::new();
        for (name, value) in entries {
            // Names repeat with different types; the map keeps the first type.
            let _ = match value.clone() {
                AnyValue::Bool(v) => map.insert_value(name, v),
                AnyValue::Int32(v) => map.insert_value(name, v),
                AnyValue::Int64(v) => map.insert_value(name, v),
                AnyValue::Float(v) => map.insert_value(name, v),
                AnyValue::Double(v) => map.insert_value(name, v),
                AnyValue::Str(v) => map.insert_value(name, v),
                AnyValue::Vec3I(v) => map.insert_value(name, v),
                AnyValue::Vec3D(v) => map.insert_value(name, v),
            };
        }
        map
    }

    proptest! {
        #[test]
        fn generated_maps_roundtrip(
            entries in proptest::collection::vec(("[a-z]{1,6}", any_value()), 0..12)
        ) {
            let map = build_map(&entries);
            let bytes = map.to_bytes().unwrap();
            let decoded = MetaMap::from_bytes(&bytes, &registry()).unwrap();

            prop_assert_eq!(decoded.len(), map.len());
            prop_assert_eq!(&decoded, &map);
            prop_assert_eq!(decoded.to_bytes().unwrap(), bytes);
        }
    }
}
