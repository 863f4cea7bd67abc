//! Core runtime for modelinfo: descriptors, notification metadata records,
//! descriptor validation, and the persisted record codec.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod codec;
pub mod descriptor;
pub mod error;
pub mod info;
pub mod serialize;

///
/// CONSTANTS
///

/// Descriptor type every notification descriptor must carry.
pub const NOTIFICATION_DESCRIPTOR_TYPE: &str = "notification";

/// Severity applied when a descriptor does not specify one.
pub const DEFAULT_SEVERITY: &str = "6";

/// Type label used when rendering a record.
pub const RECORD_TYPE_NAME: &str = "ModelNotificationInfo";

/// Class tag written by the legacy persisted layout.
///
/// Read back but never interpreted.
pub const LEGACY_CLASS_TAG: &str = "ModelMBeanNotificationInfo";

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, codecs, or serializers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        descriptor::{Descriptor, FieldValue},
        info::{ModelNotificationInfo, NotifTypes, NotificationInfo},
    };
}
