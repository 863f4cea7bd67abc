//! Persisted record layouts.
//!
//! Two layouts exist and both are CBOR maps:
//! - current: `notifTypes`, `name`, `description`, `notificationDescriptor`
//! - legacy: the same plus a `currClass` tag kept for old readers
//!
//! The layout written is fixed per [`RecordCodec`]. Decoding accepts either
//! layout and ignores the tag.


use crate::{
    LEGACY_CLASS_TAG,
    descriptor::Descriptor,
    error::{ErrorDetail, InternalError},
    info::{ModelNotificationInfo, NotifTypes, NotificationInfo},
    serialize::{SerializeError, from_cbor, to_cbor},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error as ThisError;
use tracing::debug;

const OP_DECODE: &str = "RecordCodec::decode";

/// Largest persisted record accepted by a default codec.
pub const DEFAULT_MAX_RECORD_BYTES: usize = 64 * 1024;

///
/// SerialForm
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SerialForm {
    #[default]
    Current,
    #[serde(alias = "1.0")]
    Legacy,
}

impl SerialForm {
    /// Historical property value that selects the legacy layout.
    pub const LEGACY_PROPERTY_VALUE: &'static str = "1.0";

    /// Resolve a form from the historical property value.
    ///
    /// `"1.0"` (or `"legacy"`) selects the legacy layout; anything else,
    /// including no value at all, selects the current layout.
    #[must_use]
    pub fn from_property(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(Self::LEGACY_PROPERTY_VALUE) => Self::Legacy,
            Some(v) if v.eq_ignore_ascii_case("legacy") => Self::Legacy,
            _ => Self::Current,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Legacy => "legacy",
        }
    }

    #[must_use]
    pub const fn is_legacy(self) -> bool {
        matches!(self, Self::Legacy)
    }
}

impl fmt::Display for SerialForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// UnknownSerialForm
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("unknown serial form '{0}': expected 'current', 'legacy' or '1.0'")]
pub struct UnknownSerialForm(pub String);

impl FromStr for SerialForm {
    type Err = UnknownSerialForm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "current" => Ok(Self::Current),
            "legacy" | Self::LEGACY_PROPERTY_VALUE => Ok(Self::Legacy),
            _ => Err(UnknownSerialForm(s.to_string())),
        }
    }
}

///
/// RecordCodec
///
/// Encodes records in one configured layout and decodes either layout.
/// Decoded records are re-validated, so they hold the same descriptor
/// guarantees as records built in memory.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RecordCodec {
    form: SerialForm,
    max_bytes: usize,
}

impl RecordCodec {
    #[must_use]
    pub const fn new(form: SerialForm) -> Self {
        Self {
            form,
            max_bytes: DEFAULT_MAX_RECORD_BYTES,
        }
    }

    /// Override the decode size limit.
    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use]
    pub const fn form(&self) -> SerialForm {
        self.form
    }

    #[must_use]
    pub const fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Encode a record in this codec's layout.
    pub fn encode(&self, record: &ModelNotificationInfo) -> Result<Vec<u8>, InternalError> {
        let out = RecordOut {
            notif_types: record.notif_types(),
            name: record.name(),
            description: record.description(),
            notification_descriptor: record.descriptor_ref(),
            curr_class: self.form.is_legacy().then_some(LEGACY_CLASS_TAG),
        };

        let bytes = to_cbor(&out)?;
        debug!(
            form = %self.form,
            record = record.name(),
            len = bytes.len(),
            "encoded record"
        );

        Ok(bytes)
    }

    /// Decode a record written in either layout.
    pub fn decode(&self, bytes: &[u8]) -> Result<ModelNotificationInfo, InternalError> {
        let wire: RecordIn = from_cbor(bytes, self.max_bytes).map_err(map_deserialize_error)?;

        if let Some(tag) = &wire.curr_class {
            debug!(tag = tag.as_str(), "ignoring legacy class tag");
        }

        let info = NotificationInfo::new(wire.notif_types, wire.name, wire.description);
        let descriptor = Some(wire.notification_descriptor);
        let record = ModelNotificationInfo::assemble(info, descriptor, OP_DECODE).map_err(|err| {
            InternalError::codec_corruption(format!("record decode failed: {err}"))
                .with_detail(ErrorDetail::InvalidDescriptor(err))
        })?;

        debug!(form = %self.form, record = record.name(), "decoded record");

        Ok(record)
    }
}

impl Default for RecordCodec {
    fn default() -> Self {
        Self::new(SerialForm::default())
    }
}

// Convert format-level deserialize errors into codec classification.
fn map_deserialize_error(source: SerializeError) -> InternalError {
    let message = match &source {
        SerializeError::TooLarge { len, max_bytes } => {
            format!("record decode failed: payload size {len} exceeds limit {max_bytes}")
        }
        _ => format!("record decode failed: {}", source.kind()),
    };

    InternalError::codec_corruption(message)
}

///
/// RecordOut
///

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordOut<'a> {
    notif_types: &'a NotifTypes,
    name: &'a str,
    description: &'a str,
    notification_descriptor: &'a Descriptor,

    #[serde(skip_serializing_if = "Option::is_none")]
    curr_class: Option<&'static str>,
}

///
/// RecordIn
///

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordIn {
    notif_types: NotifTypes,
    name: String,
    description: String,
    notification_descriptor: Descriptor,

    #[serde(default)]
    curr_class: Option<String>,
}
