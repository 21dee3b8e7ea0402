//! Runtime schema descriptors.
//!
//! A resource is described declaratively: the shape of one entity as
//! returned by the API ([`ResourceSchema`]), the identity fields that can
//! address a single entity ([`IdentitySchema`]), the relations that may be
//! requested alongside the base fields ([`IncludeSchema`]) and the writable
//! subsets for creation and update ([`CreateSchema`]). Descriptors are
//! deserialized from the embedded declarations in `src/resources/` and are
//! immutable once built.

mod field;
mod resource;

pub use field::{FieldSpec, FieldType, WritableField};
pub use resource::{
    CreateSchema, Identity, IdentityKind, IdentitySchema, IncludeSchema, ResourceSchema,
    SchemaSet,
};
