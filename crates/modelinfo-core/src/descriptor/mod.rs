//! Descriptors: extensible, case-insensitive key/value metadata.
//!
//! Field names are matched ignoring case for lookup, replacement, equality
//! and ordering. The spelling used when a field was last set is kept for
//! rendering and persistence.

mod value;


pub use value::FieldValue;

use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};
use std::{collections::BTreeMap, fmt};
use thiserror::Error as ThisError;

///
/// Well-known field names
///

pub mod field {
    pub const NAME: &str = "name";
    pub const DESCRIPTOR_TYPE: &str = "descriptorType";
    pub const DISPLAY_NAME: &str = "displayName";
    pub const SEVERITY: &str = "severity";
    pub const VISIBILITY: &str = "visibility";
    pub const LOG: &str = "log";
    pub const CURRENCY_TIME_LIMIT: &str = "currencyTimeLimit";
}

/// Compare two strings ignoring case, one char at a time.
///
/// Strings of different char length never match.
#[must_use]
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b
        || (a.chars().count() == b.chars().count()
            && a.chars().zip(b.chars()).all(|(x, y)| fold_char(x) == fold_char(y)))
}

// Fold every char independently, so the key keeps the input's char length.
fn fold_case(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

// Upper then lower. An expanding uppercase (ß) keeps the char; an
// expanding lowercase (İ) keeps its base letter.
fn fold_char(c: char) -> char {
    let upper = single(c.to_uppercase()).unwrap_or(c);

    upper.to_lowercase().next().unwrap_or(upper)
}

fn single(mut chars: impl Iterator<Item = char>) -> Option<char> {
    let first = chars.next()?;

    chars.next().is_none().then_some(first)
}

///
/// DescriptorError
///
/// Raised when a field name or a `name=value` entry cannot be stored.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum DescriptorError {
    #[error("descriptor field name must not be blank")]
    BlankFieldName,

    #[error("descriptor field '{name}' appears more than once ignoring case")]
    DuplicateField { name: String },

    #[error("malformed descriptor field '{entry}': expected name=value")]
    MalformedField { entry: String },
}

///
/// DescriptorViolation
///
/// First self-check failure found by [`Descriptor::validate`].
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum DescriptorViolation {
    #[error("descriptor field '{field}' is blank")]
    BlankField { field: &'static str },

    #[error("descriptor field '{field}' has illegal value '{value}'")]
    IllegalValue { field: &'static str, value: String },

    #[error("descriptor field '{field}' is missing")]
    MissingField { field: &'static str },

    #[error("descriptor field '{field}' must be text")]
    NonTextField { field: &'static str },
}

///
/// Descriptor
///

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(try_from = "BTreeMap<String, FieldValue>")]
pub struct Descriptor {
    // keyed by case-folded field name
    fields: BTreeMap<String, Field>,
}

#[derive(Clone, Debug)]
struct Field {
    name: String,
    value: FieldValue,
}

impl Descriptor {
    /// Create an empty descriptor.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Build a descriptor from `name=value` entries.
    ///
    /// Values are stored as text. An entry with an empty value leaves the
    /// field unset, removing any earlier entry for the same name.
    pub fn from_fields<I, S>(entries: I) -> Result<Self, DescriptorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut descriptor = Self::new();

        for entry in entries {
            let entry = entry.as_ref();
            let Some((name, value)) = entry.split_once('=') else {
                return Err(DescriptorError::MalformedField {
                    entry: entry.to_string(),
                });
            };

            if value.is_empty() {
                check_field_name(name)?;
                descriptor.remove_field(name);
            } else {
                descriptor.set_field(name, value)?;
            }
        }

        Ok(descriptor)
    }

    /// Builder form of [`Self::set_field`].
    pub fn with_field(
        mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<Self, DescriptorError> {
        self.set_field(name, value)?;

        Ok(self)
    }

    /// Set a field, replacing any existing field whose name matches
    /// ignoring case.
    pub fn set_field(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), DescriptorError> {
        check_field_name(name)?;
        self.put(name, value);

        Ok(())
    }

    // Store a field under a known-good name.
    pub(crate) fn put(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.fields.insert(
            fold_case(name),
            Field {
                name: name.to_string(),
                value: value.into(),
            },
        );
    }

    /// Remove a field, returning its value if it was present.
    pub fn remove_field(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(&fold_case(name)).map(|f| f.value)
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(&fold_case(name)).map(|f| &f.value)
    }

    /// Return a field's value when it is present and textual.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(FieldValue::as_text)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(&fold_case(name))
    }

    /// Field names in descriptor order, with their stored spelling.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.values().map(|f| f.name.as_str())
    }

    /// Iterate `(name, value)` pairs in descriptor order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.values().map(|f| (f.name.as_str(), &f.value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Run the descriptor's self-check.
    ///
    /// `name` and `descriptorType` must be non-blank text. Known optional
    /// fields must hold legal values when present.
    pub fn validate(&self) -> Result<(), DescriptorViolation> {
        self.require_text(field::NAME)?;
        self.require_text(field::DESCRIPTOR_TYPE)?;

        self.check_int_range(field::SEVERITY, 0, 6)?;
        self.check_int_range(field::VISIBILITY, 1, 4)?;
        self.check_int_range(field::CURRENCY_TIME_LIMIT, -1, i64::MAX)?;

        if let Some(value) = self.field(field::LOG)
            && value.as_bool().is_none()
        {
            return Err(DescriptorViolation::IllegalValue {
                field: field::LOG,
                value: value.to_string(),
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    fn require_text(&self, name: &'static str) -> Result<(), DescriptorViolation> {
        match self.field(name) {
            None => Err(DescriptorViolation::MissingField { field: name }),
            Some(FieldValue::Text(s)) if s.trim().is_empty() => {
                Err(DescriptorViolation::BlankField { field: name })
            }
            Some(FieldValue::Text(_)) => Ok(()),
            Some(_) => Err(DescriptorViolation::NonTextField { field: name }),
        }
    }

    fn check_int_range(
        &self,
        name: &'static str,
        min: i64,
        max: i64,
    ) -> Result<(), DescriptorViolation> {
        let Some(value) = self.field(name) else {
            return Ok(());
        };

        match value.as_int() {
            Some(n) if (min..=max).contains(&n) => Ok(()),
            _ => Err(DescriptorViolation::IllegalValue {
                field: name,
                value: value.to_string(),
            }),
        }
    }
}

fn check_field_name(name: &str) -> Result<(), DescriptorError> {
    if name.trim().is_empty() {
        return Err(DescriptorError::BlankFieldName);
    }

    Ok(())
}

impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .all(|(key, f)| other.fields.get(key).is_some_and(|o| o.value == f.value))
    }
}

impl Eq for Descriptor {}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }

            if value.is_text() {
                write!(f, "{name}={value}")?;
            } else {
                write!(f, "{name}=({value})")?;
            }
        }

        Ok(())
    }
}

impl Serialize for Descriptor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }

        map.end()
    }
}

impl TryFrom<BTreeMap<String, FieldValue>> for Descriptor {
    type Error = DescriptorError;

    fn try_from(entries: BTreeMap<String, FieldValue>) -> Result<Self, Self::Error> {
        let mut descriptor = Self::new();

        for (name, value) in entries {
            if descriptor.contains(&name) {
                return Err(DescriptorError::DuplicateField { name });
            }
            descriptor.set_field(&name, value)?;
        }

        Ok(descriptor)
    }
}
