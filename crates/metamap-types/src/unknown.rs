use std::any::Any;
use std::fmt;

use crate::error::ValueResult;
use crate::metadata::Metadata;

/// Bytes of the payload shown by `Display` before eliding the rest.
const DISPLAY_PREFIX: usize = 16;

/// Opaque fallback for a type tag the reader cannot construct.
///
/// Holds the original type tag and the raw payload body exactly as read, and
/// writes them back unchanged. Built without a registry lookup, so it can
/// consume any framed payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnknownMetadata {
    type_name: String,
    bytes: Vec<u8>,
}

impl UnknownMetadata {
    /// An empty placeholder for `type_name`.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            bytes: Vec::new(),
        }
    }

    pub fn with_bytes(type_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            type_name: type_name.into(),
            bytes,
        }
    }

    /// The raw payload body.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl fmt::Display for UnknownMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self.bytes.len().min(DISPLAY_PREFIX);
        write!(
            f,
            "<{}: {} bytes {}",
            self.type_name,
            self.bytes.len(),
            hex::encode(&self.bytes[..shown])
        )?;
        if shown < self.bytes.len() {
            f.write_str("...")?;
        }
        f.write_str(">")
    }
}

impl Metadata for UnknownMetadata {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn copy(&self) -> Box<dyn Metadata> {
        Box::new(self.clone())
    }

    fn encode_value(&self) -> ValueResult<Vec<u8>> {
        Ok(self.bytes.clone())
    }

    fn decode_value(&mut self, body: &[u8]) -> ValueResult<()> {
        self.bytes = body.to_vec();
        Ok(())
    }

    fn as_bool(&self) -> bool {
        !self.bytes.is_empty()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
