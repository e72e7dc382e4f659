//! Built-in metadata kinds.
//!
//! A [`MetaValue`] is a plain Rust payload type with a static type tag and a
//! body encoding. [`TypedMetadata`] lifts any `MetaValue` into a
//! [`Metadata`] trait object, so adding a new kind means implementing
//! `MetaValue` and registering it.

use std::any::Any;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ValueError, ValueResult};
use crate::metadata::Metadata;
use crate::wire;

/// A payload type that can be stored as metadata.
pub trait MetaValue: Clone + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Type tag written to the wire. Must be non-empty and unique per kind.
    const TYPE_NAME: &'static str;

    /// Encode the payload body.
    fn encode(&self) -> ValueResult<Vec<u8>>;

    /// Decode a payload body produced by [`encode`](MetaValue::encode).
    fn decode(body: &[u8]) -> ValueResult<Self>;

    /// Human-readable rendering used by `Display`.
    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    /// Anything other than the zero value counts as set.
    fn is_truthy(&self) -> bool {
        *self != Self::default()
    }
}

/// A [`Metadata`] holding a single [`MetaValue`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypedMetadata<T: MetaValue> {
    value: T,
}

impl<T: MetaValue> TypedMetadata<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn set_value(&mut self, value: T) {
        self.value = value;
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: MetaValue> From<T> for TypedMetadata<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: MetaValue> fmt::Display for TypedMetadata<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.render(f)
    }
}

impl<T: MetaValue> Metadata for TypedMetadata<T> {
    fn type_name(&self) -> &str {
        T::TYPE_NAME
    }

    fn copy(&self) -> Box<dyn Metadata> {
        Box::new(self.clone())
    }

    fn encode_value(&self) -> ValueResult<Vec<u8>> {
        self.value.encode()
    }

    fn decode_value(&mut self, body: &[u8]) -> ValueResult<()> {
        self.value = T::decode(body)?;
        Ok(())
    }

    fn as_bool(&self) -> bool {
        self.value.is_truthy()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub type BoolMetadata = TypedMetadata<bool>;
pub type Int32Metadata = TypedMetadata<i32>;
pub type Int64Metadata = TypedMetadata<i64>;
pub type FloatMetadata = TypedMetadata<f32>;
pub type DoubleMetadata = TypedMetadata<f64>;
pub type StringMetadata = TypedMetadata<String>;
pub type Vec3IMetadata = TypedMetadata<[i32; 3]>;
pub type Vec3SMetadata = TypedMetadata<[f32; 3]>;
pub type Vec3DMetadata = TypedMetadata<[f64; 3]>;

fn encode_fixed<T: Serialize>(value: &T) -> ValueResult<Vec<u8>> {
    bincode::serialize(value).map_err(|e| ValueError::Serialization(e.to_string()))
}

fn decode_fixed<T>(body: &[u8], type_name: &str) -> ValueResult<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    let expected = bincode::serialized_size(&T::default())
        .map_err(|e| ValueError::Serialization(e.to_string()))?;
    if body.len() as u64 != expected {
        return Err(ValueError::malformed(format!(
            "{type_name} payload must be {expected} bytes, got {}",
            body.len()
        )));
    }
    bincode::deserialize(body)
        .map_err(|e| ValueError::malformed(format!("invalid {type_name} payload: {e}")))
}

macro_rules! scalar_value {
    ($ty:ty, $name:literal) => {
        impl MetaValue for $ty {
            const TYPE_NAME: &'static str = $name;

            fn encode(&self) -> ValueResult<Vec<u8>> {
                encode_fixed(self)
            }

            fn decode(body: &[u8]) -> ValueResult<Self> {
                decode_fixed(body, $name)
            }

            fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self)
            }
        }
    };
}

macro_rules! vec3_value {
    ($ty:ty, $name:literal) => {
        impl MetaValue for [$ty; 3] {
            const TYPE_NAME: &'static str = $name;

            fn encode(&self) -> ValueResult<Vec<u8>> {
                encode_fixed(self)
            }

            fn decode(body: &[u8]) -> ValueResult<Self> {
                decode_fixed(body, $name)
            }

            fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "[{}, {}, {}]", self[0], self[1], self[2])
            }
        }
    };
}

scalar_value!(bool, "bool");
scalar_value!(i32, "int32");
scalar_value!(i64, "int64");
scalar_value!(f32, "float");
scalar_value!(f64, "double");
vec3_value!(i32, "vec3i");
vec3_value!(f32, "vec3s");
vec3_value!(f64, "vec3d");

// Strings carry no inner length: the payload size already delimits them.
impl MetaValue for String {
    const TYPE_NAME: &'static str = "string";

    fn encode(&self) -> ValueResult<Vec<u8>> {
        Ok(self.as_bytes().to_vec())
    }

    fn decode(body: &[u8]) -> ValueResult<Self> {
        wire::decode_utf8(body.to_vec())
    }

    fn render(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}
