use crate::{
    NOTIFICATION_DESCRIPTOR_TYPE,
    descriptor::{Descriptor, DescriptorViolation, eq_ignore_case, field},
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InvalidReason
///
/// Which descriptor check rejected the descriptor. Checks run in
/// declaration order and the first failure wins.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum InvalidReason {
    NullDescriptor,
    InvalidDescriptor,
    Name,
    DescriptorType,
}

impl InvalidReason {
    /// Stable label for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NullDescriptor => "nullDescriptor",
            Self::InvalidDescriptor => "invalidDescriptor",
            Self::Name => "name",
            Self::DescriptorType => "descriptorType",
        }
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// InvalidDescriptorError
///
/// A supplied descriptor failed validation against its record.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("invalid descriptor passed to {operation} for '{record}': invalid field is {reason}")]
pub struct InvalidDescriptorError {
    pub reason: InvalidReason,
    pub operation: &'static str,
    pub record: String,

    /// Self-check failure, present when `reason` is `InvalidDescriptor`.
    pub violation: Option<DescriptorViolation>,
}

impl InvalidDescriptorError {
    #[must_use]
    pub const fn reason(&self) -> InvalidReason {
        self.reason
    }
}

// check_descriptor
// runs the ordered checks for a descriptor offered to record `name`
pub(super) fn check_descriptor(
    name: &str,
    descriptor: Option<&Descriptor>,
    operation: &'static str,
) -> Result<(), InvalidDescriptorError> {
    let reject = |reason, violation| InvalidDescriptorError {
        reason,
        operation,
        record: name.to_string(),
        violation,
    };

    let Some(descriptor) = descriptor else {
        return Err(reject(InvalidReason::NullDescriptor, None));
    };

    if let Err(violation) = descriptor.validate() {
        return Err(reject(InvalidReason::InvalidDescriptor, Some(violation)));
    }

    // self-check guarantees both identity fields are text
    let descriptor_name = descriptor.text(field::NAME).unwrap_or_default();
    if !eq_ignore_case(descriptor_name, name) {
        return Err(reject(InvalidReason::Name, None));
    }

    let descriptor_type = descriptor.text(field::DESCRIPTOR_TYPE).unwrap_or_default();
    if !eq_ignore_case(descriptor_type, NOTIFICATION_DESCRIPTOR_TYPE) {
        return Err(reject(InvalidReason::DescriptorType, None));
    }

    Ok(())
}
