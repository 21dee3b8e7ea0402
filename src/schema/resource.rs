//! Resource-level schemas: entity shape, identity routing, includable
//! relations and writable payload subsets.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use super::field::{FieldSpec, WritableField};
use crate::error::ValidationError;

/// Shape of one entity as returned by the API.
///
/// Declared fields are checked for presence and type; undeclared fields the
/// server adds are passed through untouched, so a server-side addition does
/// not break the client.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceSchema {
    pub fields: BTreeMap<String, FieldSpec>,
}

impl ResourceSchema {
    /// Declared field names, in stable order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(|s| s.as_str()).collect()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Validate one entity object from a response payload.
    ///
    /// When `selected_fields` is non-empty the response was narrowed with a
    /// `fields` parameter and only those fields are expected.
    pub fn check_entity(
        &self,
        entity: &Value,
        selected_fields: &[String],
    ) -> Result<(), ValidationError> {
        let Some(obj) = entity.as_object() else {
            return Err(ValidationError::FieldType {
                field: "<entity>".to_string(),
                expected: "an object".to_string(),
            });
        };
        for (name, spec) in &self.fields {
            if !selected_fields.is_empty() && !selected_fields.iter().any(|f| f == name) {
                continue;
            }
            match obj.get(name) {
                Some(value) => spec.check(name, value)?,
                None if spec.optional => {}
                // Narrowed responses must still carry what was asked for.
                None => return Err(ValidationError::MissingField(name.clone())),
            }
        }
        Ok(())
    }
}

/// Identity field kinds that can address a single entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityKind {
    Id,
    Slug,
    Email,
}

impl IdentityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityKind::Id => "id",
            IdentityKind::Slug => "slug",
            IdentityKind::Email => "email",
        }
    }
}

/// One concrete identity value. Exactly one kind per read/delete call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Id(String),
    Slug(String),
    Email(String),
}

impl Identity {
    pub fn kind(&self) -> IdentityKind {
        match self {
            Identity::Id(_) => IdentityKind::Id,
            Identity::Slug(_) => IdentityKind::Slug,
            Identity::Email(_) => IdentityKind::Email,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Identity::Id(v) | Identity::Slug(v) | Identity::Email(v) => v,
        }
    }
}

/// The identity kinds a resource accepts (e.g. posts: id or slug; members:
/// id or email).
#[derive(Debug, Clone, Deserialize)]
pub struct IdentitySchema {
    pub accepts: Vec<IdentityKind>,
}

impl IdentitySchema {
    /// Pre-flight check of an identity value against this schema.
    pub fn check(&self, resource: &str, identity: &Identity) -> Result<(), ValidationError> {
        if identity.value().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if !self.accepts.contains(&identity.kind()) {
            return Err(ValidationError::InvalidIdentity(
                identity.kind().as_str().to_string(),
                resource.to_string(),
            ));
        }
        Ok(())
    }
}

/// Relation names that may be requested alongside the base fields.
/// Selecting one expands the field universe filters and ordering may
/// reference.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncludeSchema {
    #[serde(default)]
    pub relations: Vec<String>,
}

impl IncludeSchema {
    pub fn contains(&self, name: &str) -> bool {
        self.relations.iter().any(|r| r == name)
    }
}

/// Everything the framework needs to know about one resource: entity
/// shape, identity routing, includable relations and the writable payload
/// shapes. Supplied at composition time, immutable afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaSet {
    pub schema: ResourceSchema,
    pub identity: IdentitySchema,
    #[serde(default)]
    pub include: IncludeSchema,
    /// Absent when the resource cannot be created through the API.
    #[serde(default)]
    pub create: Option<CreateSchema>,
    /// Absent means "create shape with every field optional".
    #[serde(default)]
    pub update: Option<CreateSchema>,
}

impl SchemaSet {
    /// The effective update schema: the declared one, or the create shape
    /// with every field optional.
    pub fn update_schema(&self) -> Option<CreateSchema> {
        self.update
            .clone()
            .or_else(|| self.create.as_ref().map(CreateSchema::partial))
    }
}

/// Writable subset of fields for creation (and, via [`Self::partial`], the
/// default update shape).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSchema {
    pub fields: BTreeMap<String, WritableField>,
    /// Pairs of fields that must not be supplied together.
    #[serde(default)]
    pub exclusive: Vec<(String, String)>,
}

impl CreateSchema {
    /// Validate a caller-supplied payload. Returns the validated object
    /// containing only declared fields; unknown fields are rejected rather
    /// than silently dropped.
    pub fn check_payload(&self, data: &Value) -> Result<Map<String, Value>, ValidationError> {
        let Some(obj) = data.as_object() else {
            return Err(ValidationError::FieldType {
                field: "<payload>".to_string(),
                expected: "an object".to_string(),
            });
        };
        for key in obj.keys() {
            if !self.fields.contains_key(key) {
                return Err(ValidationError::UnknownField {
                    field: key.clone(),
                    context: "payload".to_string(),
                });
            }
        }
        for (a, b) in &self.exclusive {
            if obj.contains_key(a) && obj.contains_key(b) {
                return Err(ValidationError::ExclusiveFields(a.clone(), b.clone()));
            }
        }
        let mut out = Map::new();
        for (name, spec) in &self.fields {
            match obj.get(name) {
                Some(value) => {
                    spec.check(name, value)?;
                    out.insert(name.clone(), value.clone());
                }
                None if spec.required => {
                    return Err(ValidationError::MissingField(name.clone()));
                }
                None => {}
            }
        }
        Ok(out)
    }

    /// The same shape with every field optional - the fallback update
    /// schema when a resource declares no dedicated one.
    pub fn partial(&self) -> CreateSchema {
        CreateSchema {
            fields: self
                .fields
                .iter()
                .map(|(name, spec)| {
                    let mut spec = spec.clone();
                    spec.required = false;
                    (name.clone(), spec)
                })
                .collect(),
            exclusive: self.exclusive.clone(),
        }
    }
}
