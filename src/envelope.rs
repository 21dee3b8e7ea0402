//! Response envelope validation.
//!
//! Every API response is one of two shapes: `{ [resource]: ... , meta? }`
//! on success or `{ errors: [{type, message}, ...] }` on failure. The
//! presence of `errors` is the sole discriminator. Anything that is neither
//! shape, or a success payload that does not match the declared schema, is
//! a contract violation ([`ClientError::Contract`]) - never coerced into a
//! business outcome.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ClientError;
use crate::schema::ResourceSchema;

/// One server-declared error, carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

/// Business outcome of a request: exactly one of the two, callers must
/// branch on the tag before touching the payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome<T> {
    Success(T),
    Failure(Vec<ApiError>),
}

impl<T> ApiOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, ApiOutcome::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            ApiOutcome::Success(data) => Some(data),
            ApiOutcome::Failure(_) => None,
        }
    }

    pub fn errors(&self) -> &[ApiError] {
        match self {
            ApiOutcome::Success(_) => &[],
            ApiOutcome::Failure(errors) => errors,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiOutcome<U> {
        match self {
            ApiOutcome::Success(data) => ApiOutcome::Success(f(data)),
            ApiOutcome::Failure(errors) => ApiOutcome::Failure(errors),
        }
    }
}

/// Paging metadata from `meta.pagination`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    /// `None` when the request asked for `limit=all`.
    pub limit: Option<u64>,
    pub pages: u64,
    pub total: u64,
    pub next: Option<u64>,
    pub prev: Option<u64>,
}

/// Extract the server-declared failure, if the envelope carries one.
/// A present-but-malformed `errors` list is a contract violation.
fn declared_failure(raw: &Value, resource: &str) -> Result<Option<Vec<ApiError>>, ClientError> {
    let Some(errors) = raw.get("errors") else {
        return Ok(None);
    };
    let parsed: Vec<ApiError> = serde_json::from_value(errors.clone()).map_err(|e| {
        ClientError::contract(resource, format!("malformed errors list: {e}"))
    })?;
    Ok(Some(parsed))
}

/// Validate a browse envelope into a sequence of entities.
pub fn parse_collection(
    raw: &Value,
    resource: &str,
    schema: &ResourceSchema,
    selected_fields: &[String],
) -> Result<ApiOutcome<Vec<Value>>, ClientError> {
    if let Some(errors) = declared_failure(raw, resource)? {
        return Ok(ApiOutcome::Failure(errors));
    }
    let payload = raw
        .get(resource)
        .and_then(|v| v.as_array())
        .ok_or_else(|| {
            ClientError::contract(resource, format!("missing '{resource}' array in envelope"))
        })?;
    for entity in payload {
        schema
            .check_entity(entity, selected_fields)
            .map_err(|e| ClientError::contract(resource, e.to_string()))?;
    }
    Ok(ApiOutcome::Success(payload.clone()))
}

/// Validate a read/mutation envelope into a single entity. The server may
/// wrap the entity in a one-element array or return it bare.
pub fn parse_single(
    raw: &Value,
    resource: &str,
    schema: &ResourceSchema,
    selected_fields: &[String],
) -> Result<ApiOutcome<Value>, ClientError> {
    if let Some(errors) = declared_failure(raw, resource)? {
        return Ok(ApiOutcome::Failure(errors));
    }
    let payload = raw.get(resource).ok_or_else(|| {
        ClientError::contract(resource, format!("missing '{resource}' in envelope"))
    })?;
    let entity = match payload {
        Value::Array(items) => items.first().ok_or_else(|| {
            ClientError::contract(resource, "empty entity array in envelope")
        })?,
        Value::Object(_) => payload,
        _ => {
            return Err(ClientError::contract(
                resource,
                format!("'{resource}' is neither an entity nor an entity array"),
            ))
        }
    };
    schema
        .check_entity(entity, selected_fields)
        .map_err(|e| ClientError::contract(resource, e.to_string()))?;
    Ok(ApiOutcome::Success(entity.clone()))
}

/// Validate a deletion response. Deletions carry no entity payload; an
/// empty or minimal body is success, a declared `errors` list is failure.
pub fn parse_deletion(raw: &Value, resource: &str) -> Result<ApiOutcome<()>, ClientError> {
    if let Some(errors) = declared_failure(raw, resource)? {
        return Ok(ApiOutcome::Failure(errors));
    }
    match raw {
        Value::Null => Ok(ApiOutcome::Success(())),
        Value::Object(map) if !map.contains_key("errors") => Ok(ApiOutcome::Success(())),
        _ => Err(ClientError::contract(
            resource,
            "unexpected deletion response body",
        )),
    }
}

/// Read `meta.pagination` from a raw envelope. Absent metadata is fine -
/// not every response is paged.
pub fn pagination(raw: &Value) -> Option<Pagination> {
    let meta = raw.get("meta")?.get("pagination")?;
    Some(Pagination {
        page: meta.get("page")?.as_u64()?,
        limit: meta.get("limit").and_then(|v| v.as_u64()),
        pages: meta.get("pages")?.as_u64()?,
        total: meta.get("total")?.as_u64()?,
        next: meta.get("next").and_then(|v| v.as_u64()),
        prev: meta.get("prev").and_then(|v| v.as_u64()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> ResourceSchema {
        serde_json::from_value(json!({
            "fields": {
                "id": {"type": "string"},
                "title": {"type": "string"}
            }
        }))
        .unwrap()
    }

    #[test]
    fn success_envelope_yields_success() {
        let raw = json!({
            "posts": [
                {"id": "1", "title": "A"},
                {"id": "2", "title": "B"}
            ],
            "meta": {"pagination": {"page": 1, "limit": 15, "pages": 1, "total": 2, "next": null, "prev": null}}
        });
        let outcome = parse_collection(&raw, "posts", &schema(), &[]).unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.success().unwrap().len(), 2);
    }

    #[test]
    fn errors_envelope_yields_failure_verbatim() {
        let raw = json!({
            "errors": [{"type": "NotFoundError", "message": "Post not found."}]
        });
        let outcome = parse_collection(&raw, "posts", &schema(), &[]).unwrap();
        assert_eq!(
            outcome.errors(),
            &[ApiError {
                kind: "NotFoundError".to_string(),
                message: "Post not found.".to_string()
            }]
        );
    }

    #[test]
    fn schema_drift_is_contract_not_failure() {
        let raw = json!({"posts": [{"id": 7, "title": "A"}]});
        let err = parse_collection(&raw, "posts", &schema(), &[]).unwrap_err();
        assert!(matches!(err, ClientError::Contract { .. }));
    }

    #[test]
    fn neither_shape_is_contract() {
        let raw = json!({"unexpected": true});
        assert!(matches!(
            parse_collection(&raw, "posts", &schema(), &[]).unwrap_err(),
            ClientError::Contract { .. }
        ));
        let raw = json!({"errors": "boom"});
        assert!(matches!(
            parse_collection(&raw, "posts", &schema(), &[]).unwrap_err(),
            ClientError::Contract { .. }
        ));
    }

    #[test]
    fn single_accepts_array_of_one_or_bare_object() {
        let wrapped = json!({"posts": [{"id": "1", "title": "A"}]});
        let bare = json!({"posts": {"id": "1", "title": "A"}});
        for raw in [wrapped, bare] {
            let outcome = parse_single(&raw, "posts", &schema(), &[]).unwrap();
            assert_eq!(outcome.success().unwrap()["id"], "1");
        }
    }

    #[test]
    fn deletion_tolerates_empty_body() {
        assert!(parse_deletion(&Value::Null, "posts").unwrap().is_success());
        assert!(parse_deletion(&json!({}), "posts").unwrap().is_success());
        let failed = parse_deletion(
            &json!({"errors": [{"type": "NotFoundError", "message": "gone"}]}),
            "posts",
        )
        .unwrap();
        assert!(!failed.is_success());
    }

    #[test]
    fn pagination_metadata_is_extracted() {
        let raw = json!({
            "posts": [],
            "meta": {"pagination": {"page": 2, "limit": 15, "pages": 4, "total": 50, "next": 3, "prev": 1}}
        });
        let meta = pagination(&raw).unwrap();
        assert_eq!(meta.page, 2);
        assert_eq!(meta.next, Some(3));
        assert_eq!(meta.prev, Some(1));
        assert!(pagination(&json!({"posts": []})).is_none());
    }
}
