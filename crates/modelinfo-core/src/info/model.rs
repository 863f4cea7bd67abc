use crate::{
    DEFAULT_SEVERITY, NOTIFICATION_DESCRIPTOR_TYPE, RECORD_TYPE_NAME,
    descriptor::{Descriptor, field},
    info::{
        NotifTypes, NotificationInfo,
        validate::{InvalidDescriptorError, check_descriptor},
    },
};
use std::fmt;
use tracing::trace;

const OP_CONSTRUCT: &str = "ModelNotificationInfo::with_descriptor";
const OP_FROM_PARTS: &str = "ModelNotificationInfo::from_parts";
const OP_SET: &str = "ModelNotificationInfo::set_descriptor";
const OP_VALIDATE: &str = "ModelNotificationInfo::validate_descriptor";

///
/// ModelNotificationInfo
///
/// Notification identity paired with an owned descriptor.
///
/// The stored descriptor always names this record (ignoring case), has
/// descriptor type `notification`, and carries `displayName` and
/// `severity`. It is only ever replaced whole, and callers only ever see
/// copies of it.
///

#[derive(Debug, Eq, PartialEq)]
pub struct ModelNotificationInfo {
    info: NotificationInfo,
    descriptor: Descriptor,
}

impl ModelNotificationInfo {
    /// Build a record carrying the default descriptor.
    pub fn new<I, S>(notif_types: I, name: impl Into<String>, description: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let info = NotificationInfo::new(notif_types, name, description);
        trace!(record = info.name(), "building record with default descriptor");

        let descriptor = default_descriptor(info.name());

        Self { info, descriptor }
    }

    /// Build a record from an optional descriptor.
    ///
    /// `None` selects the default descriptor. A supplied descriptor is
    /// validated against `name` and stored with defaults applied.
    pub fn with_descriptor<I, S>(
        notif_types: I,
        name: impl Into<String>,
        description: impl Into<String>,
        descriptor: Option<Descriptor>,
    ) -> Result<Self, InvalidDescriptorError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let info = NotificationInfo::new(notif_types, name, description);

        Self::assemble(info, descriptor, OP_CONSTRUCT)
    }

    /// Build a record from an existing identity and an optional descriptor.
    pub fn from_parts(
        info: NotificationInfo,
        descriptor: Option<Descriptor>,
    ) -> Result<Self, InvalidDescriptorError> {
        Self::assemble(info, descriptor, OP_FROM_PARTS)
    }

    // Rejections name `operation` as the caller.
    pub(crate) fn assemble(
        info: NotificationInfo,
        descriptor: Option<Descriptor>,
        operation: &'static str,
    ) -> Result<Self, InvalidDescriptorError> {
        let descriptor = apply_descriptor(info.name(), descriptor, operation)?;

        Ok(Self { info, descriptor })
    }

    /// Copy-construct from another record.
    #[must_use]
    pub fn from_info(other: &Self) -> Self {
        trace!(record = other.name(), "copying record");

        Self {
            info: other.info.clone(),
            descriptor: other.descriptor(),
        }
    }

    #[must_use]
    pub const fn info(&self) -> &NotificationInfo {
        &self.info
    }

    #[must_use]
    pub const fn notif_types(&self) -> &NotifTypes {
        self.info.notif_types()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.info.name()
    }

    #[must_use]
    pub fn description(&self) -> &str {
        self.info.description()
    }

    /// Return a copy of the stored descriptor.
    #[must_use]
    pub fn descriptor(&self) -> Descriptor {
        trace!(record = self.name(), "copying descriptor out");

        self.descriptor.clone()
    }

    /// Borrow the stored descriptor.
    #[must_use]
    pub const fn descriptor_ref(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Replace the stored descriptor.
    ///
    /// Same rules as [`Self::with_descriptor`]. On rejection the stored
    /// descriptor is left unchanged.
    pub fn set_descriptor(
        &mut self,
        descriptor: Option<Descriptor>,
    ) -> Result<(), InvalidDescriptorError> {
        self.descriptor = apply_descriptor(self.name(), descriptor, OP_SET)?;

        Ok(())
    }

    /// Check a descriptor against this record without storing it.
    pub fn validate_descriptor(
        &self,
        descriptor: Option<&Descriptor>,
    ) -> Result<(), InvalidDescriptorError> {
        let result = check_descriptor(self.name(), descriptor, OP_VALIDATE);
        trace!(
            record = self.name(),
            invalid_field = result.as_ref().err().map_or("none", |e| e.reason.as_str()),
            "validated descriptor"
        );

        result
    }

    #[must_use]
    pub fn is_valid_descriptor(&self, descriptor: Option<&Descriptor>) -> bool {
        self.validate_descriptor(descriptor).is_ok()
    }
}

impl Clone for ModelNotificationInfo {
    fn clone(&self) -> Self {
        Self::from_info(self)
    }
}

impl fmt::Display for ModelNotificationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{RECORD_TYPE_NAME}: {} ; Description: {} ; Descriptor: {} ; Types: {}",
            self.name(),
            self.description(),
            self.descriptor,
            self.notif_types().joined(),
        )
    }
}

// default_descriptor
fn default_descriptor(name: &str) -> Descriptor {
    let mut descriptor = Descriptor::new();
    descriptor.put(field::DESCRIPTOR_TYPE, NOTIFICATION_DESCRIPTOR_TYPE);
    descriptor.put(field::NAME, name);
    descriptor.put(field::DISPLAY_NAME, name);
    descriptor.put(field::SEVERITY, DEFAULT_SEVERITY);

    descriptor
}

// apply_defaults
// fills displayName and severity when absent
fn apply_defaults(name: &str, mut descriptor: Descriptor) -> Descriptor {
    if !descriptor.contains(field::DISPLAY_NAME) {
        descriptor.put(field::DISPLAY_NAME, name);
    }
    if !descriptor.contains(field::SEVERITY) {
        descriptor.put(field::SEVERITY, DEFAULT_SEVERITY);
    }

    descriptor
}

// apply_descriptor
// resolves the descriptor a record should store, or rejects it
fn apply_descriptor(
    name: &str,
    descriptor: Option<Descriptor>,
    operation: &'static str,
) -> Result<Descriptor, InvalidDescriptorError> {
    let Some(descriptor) = descriptor else {
        trace!(record = name, operation, "no descriptor supplied, using defaults");

        return Ok(default_descriptor(name));
    };

    if let Err(err) = check_descriptor(name, Some(&descriptor), operation) {
        trace!(
            record = name,
            operation,
            invalid_field = err.reason.as_str(),
            "descriptor rejected"
        );

        return Err(err);
    }

    trace!(record = name, operation, "descriptor accepted");

    Ok(apply_defaults(name, descriptor))
}
