use std::any::Any;
use std::fmt;
use std::io::{Read, Write};

use crate::error::ValueResult;
use crate::wire;

/// A polymorphic, self-describing metadata value.
///
/// Implementors only provide the payload *body* through [`encode_value`] and
/// [`decode_value`]. The framing in [`write`] and [`read`] prefixes the body
/// with its `u32` size, which is what lets a reader that does not know the
/// type tag skip the payload and stay aligned with the rest of the stream.
/// Map streams apply this same frame themselves around the body methods, so
/// an overridden `write`/`read` does not change what a map writes or reads.
///
/// [`encode_value`]: Metadata::encode_value
/// [`decode_value`]: Metadata::decode_value
/// [`write`]: Metadata::write
/// [`read`]: Metadata::read
pub trait Metadata: fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// The stable, non-empty type tag written to the wire and used as the
    /// registry key.
    fn type_name(&self) -> &str;

    /// A new, independently owned instance with the same payload.
    fn copy(&self) -> Box<dyn Metadata>;

    /// Encode the payload body (without the size prefix).
    fn encode_value(&self) -> ValueResult<Vec<u8>>;

    /// Replace this instance's payload by decoding `body`.
    ///
    /// On error the previous payload is kept.
    fn decode_value(&mut self, body: &[u8]) -> ValueResult<()>;

    /// Whether the value is "set": non-zero, non-empty, or `true`.
    fn as_bool(&self) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Size in bytes of the encoded payload body.
    fn size(&self) -> ValueResult<u32> {
        wire::wire_len(self.encode_value()?.len())
    }

    /// Serialize as `[u32 size][body]`.
    fn write(&self, w: &mut dyn Write) -> ValueResult<()> {
        let body = self.encode_value()?;
        wire::write_bytes(w, &body)
    }

    /// Deserialize a `[u32 size][body]` payload, overwriting this value.
    ///
    /// Exactly `4 + size` bytes are consumed when the stream is long enough,
    /// even if the body then fails to decode.
    fn read(&mut self, r: &mut dyn Read) -> ValueResult<()> {
        let size = wire::read_u32(r)?;
        let body = wire::read_exact_vec(r, size)?;
        self.decode_value(&body)
    }

    /// Same type tag and byte-identical encoded payload.
    fn same_value(&self, other: &dyn Metadata) -> bool {
        if self.type_name() != other.type_name() {
            return false;
        }
        match (self.encode_value(), other.encode_value()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl Clone for Box<dyn Metadata> {
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl dyn Metadata {
    /// Downcast to a concrete metadata type.
    pub fn downcast_ref<T: Metadata>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutable downcast to a concrete metadata type.
    pub fn downcast_mut<T: Metadata>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Returns `true` if the concrete type is `T`.
    pub fn is<T: Metadata>(&self) -> bool {
        self.as_any().is::<T>()
    }
}
