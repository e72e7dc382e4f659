use thiserror::Error;

/// Errors produced while encoding or decoding a metadata value.
#[derive(Debug, Error)]
pub enum ValueError {
    /// The stream ended early or a payload could not be parsed.
    #[error("malformed stream: {reason}")]
    MalformedStream { reason: String },

    /// A payload body could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The underlying stream failed.
    #[error("I/O error: {0}")]
    Io(std::io::Error),
}

impl ValueError {
    /// Shorthand for a [`ValueError::MalformedStream`] with the given reason.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedStream {
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for ValueError {
    fn from(err: std::io::Error) -> Self {
        // A short read is a truncated stream, not a device failure.
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::MalformedStream {
                reason: "unexpected end of stream".into(),
            }
        } else {
            Self::Io(err)
        }
    }
}

/// Result alias for value operations.
pub type ValueResult<T> = Result<T, ValueError>;
