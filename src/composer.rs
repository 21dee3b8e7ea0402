//! Resource composer: binds one resource's schema set and credentials into
//! the browse/read/add/edit/delete surface.

use std::sync::Arc;

use serde_json::Value;

use crate::client::{Credentials, HttpTransport};
use crate::envelope::ApiOutcome;
use crate::error::{ClientError, ValidationError};
use crate::fetchers::{BasicFetcher, BrowseFetcher, DeleteFetcher, MutationFetcher, ReadFetcher};
use crate::query::BrowseParams;
use crate::registry;
use crate::schema::{Identity, SchemaSet};

/// Names of the composer's operations, for capability-subset views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Browse,
    Read,
    Add,
    Edit,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Browse => "browse",
            Operation::Read => "read",
            Operation::Add => "add",
            Operation::Edit => "edit",
            Operation::Delete => "delete",
        }
    }
}

/// Ready-to-use client surface for one resource. Stateless across calls:
/// the only state is the immutable schema/credential binding established
/// here.
#[derive(Clone)]
pub struct ApiComposer {
    resource: String,
    set: Arc<SchemaSet>,
    credentials: Credentials,
    transport: HttpTransport,
}

impl ApiComposer {
    /// Bind an explicit schema set. Most callers go through
    /// [`ApiComposer::for_resource`] instead.
    pub fn new(
        resource: impl Into<String>,
        set: SchemaSet,
        credentials: Credentials,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            resource: resource.into(),
            set: Arc::new(set),
            credentials,
            transport: HttpTransport::new()?,
        })
    }

    /// Bind one of the embedded resource declarations (posts, members,
    /// tags, authors).
    pub fn for_resource(resource: &str, credentials: Credentials) -> Result<Self, ClientError> {
        let set = registry::get_resource(resource)
            .ok_or_else(|| ValidationError::UnknownResource(resource.to_string()))?;
        Self::new(resource, set.clone(), credentials)
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    fn base(&self) -> BasicFetcher {
        BasicFetcher::new(
            self.resource.clone(),
            self.set.clone(),
            self.credentials.clone(),
            self.transport.clone(),
        )
    }

    /// Single-shot retrieval of a singleton resource (e.g. settings) that
    /// has no identity or paging: one GET of the resource root, validated
    /// as one entity.
    pub async fn fetch(&self) -> Result<ApiOutcome<Value>, ClientError> {
        self.base().fetch().await
    }

    /// Multi-entity listing. Parameters are validated here, before any
    /// request exists.
    pub fn browse(&self, params: Option<BrowseParams>) -> Result<BrowseFetcher, ValidationError> {
        let params = params.unwrap_or_default();
        params.check(&self.set.schema, &self.set.include)?;
        Ok(BrowseFetcher::new(self.base(), params))
    }

    /// Single-entity retrieval by identity.
    pub fn read(&self, identity: Identity) -> Result<ReadFetcher, ValidationError> {
        self.set.identity.check(&self.resource, &identity)?;
        Ok(ReadFetcher::new(self.base(), identity))
    }

    /// Single-entity retrieval with field/include narrowing applied to the
    /// request.
    pub fn read_with(
        &self,
        identity: Identity,
        fields: &[&str],
        include: &[&str],
    ) -> Result<ReadFetcher, ValidationError> {
        self.set.identity.check(&self.resource, &identity)?;
        for field in fields {
            if !self.set.schema.has_field(field) {
                return Err(ValidationError::UnknownField {
                    field: field.to_string(),
                    context: "fields".to_string(),
                });
            }
        }
        for relation in include {
            if !self.set.include.contains(relation) {
                return Err(ValidationError::UnknownInclude(relation.to_string()));
            }
        }
        Ok(ReadFetcher::new(self.base(), identity)
            .with_fields(fields.iter().map(|s| s.to_string()).collect())
            .with_include(include.iter().map(|s| s.to_string()).collect()))
    }

    /// Create an entity. Fails fast when the resource registers no create
    /// schema.
    pub async fn add(&self, data: &Value) -> Result<ApiOutcome<Value>, ClientError> {
        self.add_with_options(data, &[]).await
    }

    /// Create with extra query options (e.g. `source=html`).
    pub async fn add_with_options(
        &self,
        data: &Value,
        options: &[(&str, &str)],
    ) -> Result<ApiOutcome<Value>, ClientError> {
        let create = self
            .set
            .create
            .as_ref()
            .ok_or_else(|| ValidationError::MissingSchema {
                resource: self.resource.clone(),
                schema: "create".to_string(),
            })?;
        let payload = create.check_payload(data)?;
        let options = options
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        MutationFetcher::create(self.base(), payload, options)
            .submit()
            .await
    }

    /// Update an entity by id. A payload that validates to zero fields is
    /// a pre-flight no-op error, never sent to the network.
    pub async fn edit(&self, id: &str, data: &Value) -> Result<ApiOutcome<Value>, ClientError> {
        if id.is_empty() {
            return Err(ValidationError::EmptyId.into());
        }
        let update = self
            .set
            .update_schema()
            .ok_or_else(|| ValidationError::MissingSchema {
                resource: self.resource.clone(),
                schema: "update".to_string(),
            })?;
        let payload = update.check_payload(data)?;
        if payload.is_empty() {
            return Err(ValidationError::EmptyEdit.into());
        }
        MutationFetcher::update(self.base(), id.to_string(), payload)
            .submit()
            .await
    }

    /// Delete an entity by id.
    pub async fn delete(&self, id: &str) -> Result<ApiOutcome<()>, ClientError> {
        if id.is_empty() {
            return Err(ValidationError::EmptyId.into());
        }
        DeleteFetcher::new(self.base(), id.to_string())
            .submit()
            .await
    }

    /// Capability-subset view exposing only the selected operations, for
    /// call sites that should not see the full surface.
    pub fn access(&self, operations: &[Operation]) -> ComposerView {
        ComposerView {
            composer: self.clone(),
            allowed: operations.to_vec(),
        }
    }
}

/// Restricted view over a composer. Invoking an operation that was not
/// selected is a pre-flight error; nothing is sent.
#[derive(Clone)]
pub struct ComposerView {
    composer: ApiComposer,
    allowed: Vec<Operation>,
}

impl ComposerView {
    pub fn exposes(&self, operation: Operation) -> bool {
        self.allowed.contains(&operation)
    }

    fn guard(&self, operation: Operation) -> Result<(), ValidationError> {
        if self.exposes(operation) {
            Ok(())
        } else {
            Err(ValidationError::OperationNotExposed(
                operation.as_str().to_string(),
            ))
        }
    }

    pub fn browse(&self, params: Option<BrowseParams>) -> Result<BrowseFetcher, ValidationError> {
        self.guard(Operation::Browse)?;
        self.composer.browse(params)
    }

    pub fn read(&self, identity: Identity) -> Result<ReadFetcher, ValidationError> {
        self.guard(Operation::Read)?;
        self.composer.read(identity)
    }

    pub async fn add(&self, data: &Value) -> Result<ApiOutcome<Value>, ClientError> {
        self.guard(Operation::Add)?;
        self.composer.add(data).await
    }

    pub async fn edit(&self, id: &str, data: &Value) -> Result<ApiOutcome<Value>, ClientError> {
        self.guard(Operation::Edit)?;
        self.composer.edit(id, data).await
    }

    pub async fn delete(&self, id: &str) -> Result<ApiOutcome<()>, ClientError> {
        self.guard(Operation::Delete)?;
        self.composer.delete(id).await
    }
}
