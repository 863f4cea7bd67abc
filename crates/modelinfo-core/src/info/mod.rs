//! Notification metadata records.
//!
//! [`NotificationInfo`] carries the immutable identity of a notification
//! (types, name, description). [`ModelNotificationInfo`] adds an owned
//! [`Descriptor`](crate::descriptor::Descriptor) that always agrees with
//! that identity.

mod model;
mod validate;

#[cfg(test)]
mod tests;

pub use model::ModelNotificationInfo;
pub use validate::{InvalidDescriptorError, InvalidReason};

use derive_more::{Deref, IntoIterator};
use serde::{Deserialize, Serialize};

///
/// NotifTypes
///
/// Ordered notification types advertised by a record, such as
/// `jmx.attribute.change`. Serializes identically to `Vec<String>`.
///

#[repr(transparent)]
#[derive(
    Clone, Debug, Default, Deref, Deserialize, Eq, Hash, IntoIterator, PartialEq, Serialize,
)]
#[serde(transparent)]
pub struct NotifTypes(Vec<String>);

impl NotifTypes {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub const fn from_vec(types: Vec<String>) -> Self {
        Self(types)
    }

    /// Render the types joined by `", "`.
    #[must_use]
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }
}

impl<S: Into<String>> FromIterator<S> for NotifTypes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

///
/// NotificationInfo
///
/// Base notification identity. Immutable after construction.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct NotificationInfo {
    notif_types: NotifTypes,
    name: String,
    description: String,
}

impl NotificationInfo {
    pub fn new<I, S>(notif_types: I, name: impl Into<String>, description: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            notif_types: notif_types.into_iter().collect(),
            name: name.into(),
            description: description.into(),
        }
    }

    #[must_use]
    pub const fn notif_types(&self) -> &NotifTypes {
        &self.notif_types
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}
