use crate::{
    descriptor::DescriptorError, info::InvalidDescriptorError, serialize::SerializeError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured error with a stable classification, returned at the codec
/// boundary. Record constructors return the narrower
/// [`InvalidDescriptorError`] directly.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    #[must_use]
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct a codec-origin corruption error.
    pub(crate) fn codec_corruption(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Corruption, ErrorOrigin::Codec, message)
    }

    /// Construct a serialize-origin internal error.
    pub(crate) fn serialize_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Serialize, message)
    }

    #[must_use]
    pub(crate) fn with_detail(mut self, detail: ErrorDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self.class, ErrorClass::InvalidArgument)
    }

    #[must_use]
    pub const fn is_corruption(&self) -> bool {
        matches!(self.class, ErrorClass::Corruption)
    }

    /// Return the descriptor rejection carried by this error, if any.
    #[must_use]
    pub const fn invalid_descriptor(&self) -> Option<&InvalidDescriptorError> {
        match &self.detail {
            Some(ErrorDetail::InvalidDescriptor(err)) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

impl From<InvalidDescriptorError> for InternalError {
    fn from(err: InvalidDescriptorError) -> Self {
        Self::new(
            ErrorClass::InvalidArgument,
            ErrorOrigin::Record,
            err.to_string(),
        )
        .with_detail(ErrorDetail::InvalidDescriptor(err))
    }
}

impl From<DescriptorError> for InternalError {
    fn from(err: DescriptorError) -> Self {
        Self::new(
            ErrorClass::InvalidArgument,
            ErrorOrigin::Descriptor,
            err.to_string(),
        )
        .with_detail(ErrorDetail::Descriptor(err))
    }
}

impl From<SerializeError> for InternalError {
    fn from(err: SerializeError) -> Self {
        Self::serialize_internal(err.to_string())
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Descriptor(DescriptorError),

    #[error("{0}")]
    InvalidDescriptor(InvalidDescriptorError),
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Corruption,
    Internal,
    InvalidArgument,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Corruption => "corruption",
            Self::Internal => "internal",
            Self::InvalidArgument => "invalid_argument",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Codec,
    Descriptor,
    Record,
    Serialize,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Codec => "codec",
            Self::Descriptor => "descriptor",
            Self::Record => "record",
            Self::Serialize => "serialize",
        };
        write!(f, "{label}")
    }
}
