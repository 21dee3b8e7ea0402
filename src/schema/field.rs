//! Field-level descriptors and value checks.

use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ValidationError;

/// Primitive shape of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Boolean,
    Number,
    /// ISO 8601 timestamp carried as a JSON string.
    Datetime,
    Array,
    Object,
}

impl FieldType {
    /// Human-readable expectation, used in violation messages.
    pub fn expected(&self) -> &'static str {
        match self {
            FieldType::String => "a string",
            FieldType::Boolean => "a boolean",
            FieldType::Number => "a number",
            FieldType::Datetime => "an ISO 8601 datetime string",
            FieldType::Array => "an array",
            FieldType::Object => "an object",
        }
    }

    /// Check a (non-null) JSON value against this type.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Number => value.is_number(),
            FieldType::Datetime => value
                .as_str()
                .map(|s| DateTime::parse_from_rfc3339(s).is_ok())
                .unwrap_or(false),
            FieldType::Array => value.is_array(),
            FieldType::Object => value.is_object(),
        }
    }
}

/// Descriptor for one field of an entity as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub kind: FieldType,
    /// The server may return `null` for this field.
    #[serde(default)]
    pub nullable: bool,
    /// The server may omit this field entirely (e.g. format-dependent
    /// fields like `html` that only appear when requested).
    #[serde(default)]
    pub optional: bool,
}

impl FieldSpec {
    /// Validate a value present in a response payload.
    pub fn check(&self, field: &str, value: &Value) -> Result<(), ValidationError> {
        if value.is_null() {
            if self.nullable {
                return Ok(());
            }
            return Err(ValidationError::FieldType {
                field: field.to_string(),
                expected: self.kind.expected().to_string(),
            });
        }
        if !self.kind.matches(value) {
            return Err(ValidationError::FieldType {
                field: field.to_string(),
                expected: self.kind.expected().to_string(),
            });
        }
        Ok(())
    }
}

/// Descriptor for one field of a create/update payload.
#[derive(Debug, Clone, Deserialize)]
pub struct WritableField {
    #[serde(rename = "type")]
    pub kind: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub nullable: bool,
}

impl WritableField {
    pub fn check(&self, field: &str, value: &Value) -> Result<(), ValidationError> {
        if value.is_null() {
            if self.nullable {
                return Ok(());
            }
            return Err(ValidationError::FieldType {
                field: field.to_string(),
                expected: self.kind.expected().to_string(),
            });
        }
        if !self.kind.matches(value) {
            return Err(ValidationError::FieldType {
                field: field.to_string(),
                expected: self.kind.expected().to_string(),
            });
        }
        Ok(())
    }
}
