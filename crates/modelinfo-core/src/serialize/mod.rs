//! CBOR payload encoding for persisted records.
//!
//! Every decode is bounded: callers pass the largest payload they accept.
//! Layout decisions live in `crate::codec`.

#[cfg(test)]
mod tests;

use serde::{Serialize, de::DeserializeOwned};
use std::{
    fmt,
    panic::{AssertUnwindSafe, catch_unwind},
};
use thiserror::Error as ThisError;

///
/// SerializeError
///

#[derive(Debug, ThisError)]
pub enum SerializeError {
    #[error("cbor encode failed: {0}")]
    Encode(String),

    #[error("cbor decode failed: {0}")]
    Decode(String),

    #[error("cbor payload of {len} bytes exceeds limit {max_bytes}")]
    TooLarge { len: usize, max_bytes: usize },
}

impl SerializeError {
    /// Label that does not depend on backend message text.
    #[must_use]
    pub const fn kind(&self) -> SerializeErrorKind {
        match self {
            Self::Encode(_) => SerializeErrorKind::Encode,
            Self::Decode(_) => SerializeErrorKind::Decode,
            Self::TooLarge { .. } => SerializeErrorKind::TooLarge,
        }
    }
}

///
/// SerializeErrorKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SerializeErrorKind {
    Encode,
    Decode,
    TooLarge,
}

impl SerializeErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Encode => "encode",
            Self::Decode => "decode",
            Self::TooLarge => "too_large",
        }
    }
}

impl fmt::Display for SerializeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encode a value as CBOR.
pub fn to_cbor<T>(value: &T) -> Result<Vec<u8>, SerializeError>
where
    T: Serialize,
{
    serde_cbor::to_vec(value).map_err(|err| SerializeError::Encode(err.to_string()))
}

/// Decode CBOR produced by [`to_cbor`], rejecting payloads over `max_bytes`.
///
/// A panic inside the decoder is reported as a decode error.
pub fn from_cbor<T>(bytes: &[u8], max_bytes: usize) -> Result<T, SerializeError>
where
    T: DeserializeOwned,
{
    if bytes.len() > max_bytes {
        return Err(SerializeError::TooLarge {
            len: bytes.len(),
            max_bytes,
        });
    }

    match catch_unwind(AssertUnwindSafe(|| serde_cbor::from_slice(bytes))) {
        Ok(decoded) => decoded.map_err(|err| SerializeError::Decode(err.to_string())),
        Err(_) => Err(SerializeError::Decode("decoder panicked".to_string())),
    }
}
