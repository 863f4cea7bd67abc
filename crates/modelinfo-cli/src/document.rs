//! JSON record documents accepted and produced by the CLI.

use anyhow::{Context, Result};
use modelinfo_core::{descriptor::Descriptor, info::ModelNotificationInfo};
use serde::{Deserialize, Serialize};

///
/// RecordDocument
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RecordDocument {
    #[serde(default)]
    pub notif_types: Vec<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<Descriptor>,
}

impl RecordDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("record document is not valid JSON")
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to render record document")
    }

    /// Build the record this document describes.
    pub fn into_record(self) -> Result<ModelNotificationInfo> {
        let record = ModelNotificationInfo::with_descriptor(
            self.notif_types,
            self.name,
            self.description,
            self.descriptor,
        )?;

        Ok(record)
    }

    #[must_use]
    pub fn from_record(record: &ModelNotificationInfo) -> Self {
        Self {
            notif_types: record.notif_types().to_vec(),
            name: record.name().to_string(),
            description: record.description().to_string(),
            descriptor: Some(record.descriptor()),
        }
    }
}

/// Build a descriptor from `--field name=value` arguments.
pub fn descriptor_from_args(fields: &[String]) -> Result<Option<Descriptor>> {
    if fields.is_empty() {
        return Ok(None);
    }

    let descriptor = Descriptor::from_fields(fields).context("invalid --field argument")?;

    Ok(Some(descriptor))
}
