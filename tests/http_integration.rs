//! Integration tests for the composer and fetchers using wiremock.
//!
//! These tests verify end-to-end behavior against mocked endpoints:
//! envelope discrimination, identity routing, pagination traversal and the
//! pre-flight guards that must keep invalid input off the network.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ghost_api::{
    ApiComposer, ApiOutcome, BrowseParams, ClientError, Credentials, Identity, Limit,
    StaticTokenProvider, ValidationError,
};

fn content_composer(server: &MockServer, resource: &str) -> ApiComposer {
    let credentials = Credentials::content(&server.uri(), "test-key").unwrap();
    ApiComposer::for_resource(resource, credentials).unwrap()
}

fn admin_composer(server: &MockServer, resource: &str) -> ApiComposer {
    let provider = Arc::new(StaticTokenProvider::new("test-token"));
    let credentials = Credentials::admin(&server.uri(), provider).unwrap();
    ApiComposer::for_resource(resource, credentials).unwrap()
}

fn post(id: &str, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "slug": title.to_lowercase(),
        "featured": false,
        "feature_image": null,
        "visibility": "public",
        "created_at": "2023-01-15T10:30:00.000Z",
        "updated_at": null,
        "published_at": "2023-01-15T10:30:00.000Z"
    })
}

fn page_meta(page: u64, pages: u64, next: Option<u64>) -> serde_json::Value {
    json!({
        "pagination": {
            "page": page,
            "limit": 2,
            "pages": pages,
            "total": pages * 2,
            "next": next,
            "prev": if page > 1 { json!(page - 1) } else { json!(null) }
        }
    })
}

mod browse_tests {
    use super::*;

    /// A plain browse returns validated entities and carries the key param
    #[tokio::test]
    async fn browse_success_returns_entities() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ghost/api/content/posts/"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "posts": [post("1", "First"), post("2", "Second")],
                "meta": page_meta(1, 1, None)
            })))
            .mount(&server)
            .await;

        let posts = content_composer(&server, "posts");
        let outcome = posts.browse(None).unwrap().fetch().await.unwrap();

        let entities = outcome.success().expect("should be success");
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0]["title"], "First");
    }

    /// Following `next` visits pages 1..N exactly once, in order, and
    /// terminates when the server declares no next page
    #[tokio::test]
    async fn pagination_visits_every_page_in_order() {
        let server = MockServer::start().await;

        // Specific pages first: wiremock picks the first matching mock.
        Mock::given(method("GET"))
            .and(path("/ghost/api/content/posts/"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "posts": [post("3", "C"), post("4", "D")],
                "meta": page_meta(2, 3, Some(3))
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/ghost/api/content/posts/"))
            .and(query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "posts": [post("5", "E"), post("6", "F")],
                "meta": page_meta(3, 3, None)
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/ghost/api/content/posts/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "posts": [post("1", "A"), post("2", "B")],
                "meta": page_meta(1, 3, Some(2))
            })))
            .mount(&server)
            .await;

        let posts = content_composer(&server, "posts");
        let mut cursor = posts
            .browse(Some(BrowseParams::new().limit(Limit::Count(2))))
            .unwrap()
            .paginate()
            .await
            .unwrap();

        let mut ids = Vec::new();
        let mut pages_seen = Vec::new();
        loop {
            let page = cursor.current.clone().success().expect("page should succeed");
            ids.extend(page.iter().map(|p| p["id"].as_str().unwrap().to_string()));
            pages_seen.push(cursor.meta.as_ref().unwrap().page);
            match cursor.next().await.unwrap() {
                Some(next) => cursor = next,
                None => break,
            }
        }

        assert_eq!(pages_seen, vec![1, 2, 3]);
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
    }

    /// A declared next page that does not fit a page number is schema
    /// drift, not something to truncate and chase
    #[tokio::test]
    async fn oversized_next_page_is_a_contract_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ghost/api/content/posts/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "posts": [post("1", "A")],
                "meta": {
                    "pagination": {
                        "page": 1,
                        "limit": 1,
                        "pages": 2,
                        "total": 2,
                        "next": 4_294_967_296u64,
                        "prev": null
                    }
                }
            })))
            .mount(&server)
            .await;

        let posts = content_composer(&server, "posts");
        let err = posts.browse(None).unwrap().paginate().await.unwrap_err();
        assert!(matches!(err, ClientError::Contract { .. }));
    }

    /// A filter referencing an unknown field never reaches the network
    #[tokio::test]
    async fn invalid_filter_sends_no_request() {
        let server = MockServer::start().await;

        let posts = content_composer(&server, "posts");
        let err = posts
            .browse(Some(BrowseParams::new().filter("color:red")))
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownField { .. }));

        assert!(server.received_requests().await.unwrap().is_empty());
    }

    /// A server-declared failure comes back as a Failure outcome, not an
    /// error, even on an HTTP error status
    #[tokio::test]
    async fn errors_envelope_is_a_failure_outcome() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ghost/api/content/posts/"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "errors": [{"type": "NotFoundError", "message": "Resource not found."}]
            })))
            .mount(&server)
            .await;

        let posts = content_composer(&server, "posts");
        let outcome = posts.browse(None).unwrap().fetch().await.unwrap();

        assert!(!outcome.is_success());
        assert_eq!(outcome.errors()[0].kind, "NotFoundError");
    }

    /// An envelope that is neither shape is a contract error, never a
    /// fabricated outcome
    #[tokio::test]
    async fn malformed_envelope_is_a_contract_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ghost/api/content/posts/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"weird": true})))
            .mount(&server)
            .await;

        let posts = content_composer(&server, "posts");
        let err = posts.browse(None).unwrap().fetch().await.unwrap_err();
        assert!(matches!(err, ClientError::Contract { .. }));
    }

    /// A body that is not JSON at all is also a contract error
    #[tokio::test]
    async fn non_json_body_is_a_contract_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ghost/api/content/posts/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let posts = content_composer(&server, "posts");
        let err = posts.browse(None).unwrap().fetch().await.unwrap_err();
        assert!(matches!(err, ClientError::Contract { .. }));
    }
}

mod read_tests {
    use super::*;

    /// Identity {slug} targets the slug-based route
    #[tokio::test]
    async fn slug_identity_routes_to_slug_path() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ghost/api/content/posts/slug/hello-world/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "posts": [post("1", "Hello-World")]
            })))
            .mount(&server)
            .await;

        let posts = content_composer(&server, "posts");
        let outcome = posts
            .read(Identity::Slug("hello-world".into()))
            .unwrap()
            .fetch()
            .await
            .unwrap();
        assert_eq!(outcome.success().unwrap()["id"], "1");
    }

    /// Identity {id} targets the id-based route on the same base URL
    #[tokio::test]
    async fn id_identity_routes_to_id_path() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ghost/api/content/posts/abc123/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "posts": [post("abc123", "Hello")]
            })))
            .mount(&server)
            .await;

        let posts = content_composer(&server, "posts");
        let outcome = posts
            .read(Identity::Id("abc123".into()))
            .unwrap()
            .fetch()
            .await
            .unwrap();
        assert_eq!(outcome.success().unwrap()["id"], "abc123");
    }

    /// Field/include narrowing reaches the query string, and the narrowed
    /// response only has to carry what was asked for
    #[tokio::test]
    async fn narrowed_read_sends_fields_and_include() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ghost/api/content/posts/1/"))
            .and(query_param("fields", "title,slug"))
            .and(query_param("include", "authors"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "posts": [{
                    "title": "Hello",
                    "slug": "hello",
                    "authors": [{"id": "a1", "name": "Ada"}]
                }]
            })))
            .mount(&server)
            .await;

        let posts = content_composer(&server, "posts");
        let outcome = posts
            .read_with(Identity::Id("1".into()), &["title", "slug"], &["authors"])
            .unwrap()
            .fetch()
            .await
            .unwrap();
        assert_eq!(outcome.success().unwrap()["slug"], "hello");
    }

    /// Requesting rendered formats adds the formats query parameter
    #[tokio::test]
    async fn format_selector_is_sent() {
        let server = MockServer::start().await;

        let mut entity = post("1", "Hello");
        entity["html"] = json!("<p>Hello</p>");

        Mock::given(method("GET"))
            .and(path("/ghost/api/content/posts/1/"))
            .and(query_param("formats", "html"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"posts": [entity]})),
            )
            .mount(&server)
            .await;

        let posts = content_composer(&server, "posts");
        let outcome = posts
            .read(Identity::Id("1".into()))
            .unwrap()
            .formats(&["html"])
            .fetch()
            .await
            .unwrap();
        assert_eq!(outcome.success().unwrap()["html"], "<p>Hello</p>");
    }
}

mod mutation_tests {
    use super::*;

    /// add with a valid payload wraps it on the wire and returns the
    /// created entity; admin requests carry the Ghost token header
    #[tokio::test]
    async fn add_creates_and_returns_entity() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ghost/api/admin/posts/"))
            .and(header("Authorization", "Ghost test-token"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "posts": [post("new-id", "T")]
            })))
            .mount(&server)
            .await;

        let posts = admin_composer(&server, "posts");
        let outcome = posts.add(&json!({"title": "T"})).await.unwrap();

        let entity = outcome.success().expect("should be success");
        assert_eq!(entity["title"], "T");

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body, json!({"posts": [{"title": "T"}]}));
    }

    /// add with a missing required field is rejected before any request
    #[tokio::test]
    async fn add_missing_required_field_is_pre_flight() {
        let server = MockServer::start().await;

        let posts = admin_composer(&server, "posts");
        let err = posts.add(&json!({})).await.unwrap_err();

        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::MissingField(ref f)) if f == "title"
        ));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    /// The members exclusive pair is enforced at validation time
    #[tokio::test]
    async fn exclusive_create_fields_are_pre_flight() {
        let server = MockServer::start().await;

        let members = admin_composer(&server, "members");
        let err = members
            .add(&json!({
                "email": "ada@example.com",
                "newsletters": [{"name": "Weekly"}],
                "subscribed": true
            }))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::ExclusiveFields(_, _))
        ));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    /// edit targets PUT {id}/ and falls back to the partial create schema
    #[tokio::test]
    async fn edit_puts_to_id_segment() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/ghost/api/admin/posts/abc/"))
            .and(header("Authorization", "Ghost test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "posts": [post("abc", "T2")]
            })))
            .mount(&server)
            .await;

        let posts = admin_composer(&server, "posts");
        let outcome = posts.edit("abc", &json!({"title": "T2"})).await.unwrap();
        assert_eq!(outcome.success().unwrap()["title"], "T2");
    }

    /// edit with a payload that validates to zero fields never hits the
    /// network
    #[tokio::test]
    async fn empty_edit_is_pre_flight() {
        let server = MockServer::start().await;

        let posts = admin_composer(&server, "posts");
        let err = posts.edit("abc", &json!({})).await.unwrap_err();

        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::EmptyEdit)
        ));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}

mod delete_tests {
    use super::*;

    /// Deletion tolerates an empty success body
    #[tokio::test]
    async fn delete_with_empty_body_succeeds() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/ghost/api/admin/posts/abc/"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let posts = admin_composer(&server, "posts");
        let outcome = posts.delete("abc").await.unwrap();
        assert!(outcome.is_success());
    }

    /// Deletion failures carry the server's errors verbatim
    #[tokio::test]
    async fn delete_failure_is_an_outcome() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/ghost/api/admin/posts/gone/"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "errors": [{"type": "NotFoundError", "message": "Post not found."}]
            })))
            .mount(&server)
            .await;

        let posts = admin_composer(&server, "posts");
        let outcome = posts.delete("gone").await.unwrap();
        assert_eq!(outcome.errors()[0].message, "Post not found.");
    }
}

mod singleton_tests {
    use super::*;

    /// Singleton resources are fetched from the bare resource root and may
    /// come back as a bare object rather than a one-element array
    #[tokio::test]
    async fn settings_fetch_from_resource_root() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ghost/api/content/settings/"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "settings": {
                    "title": "My Site",
                    "description": "Notes",
                    "logo": null,
                    "icon": null,
                    "accent_color": "#ff1a75",
                    "cover_image": null,
                    "locale": "en",
                    "timezone": "Etc/UTC"
                }
            })))
            .mount(&server)
            .await;

        let settings = content_composer(&server, "settings");
        let outcome = settings.fetch().await.unwrap();
        assert_eq!(outcome.success().unwrap()["title"], "My Site");
    }
}

mod view_tests {
    use super::*;
    use ghost_api::Operation;

    /// A capability-subset view blocks unexposed operations pre-flight
    #[tokio::test]
    async fn view_blocks_unexposed_operations() {
        let server = MockServer::start().await;

        let posts = content_composer(&server, "posts");
        let view = posts.access(&[Operation::Browse, Operation::Read]);

        assert!(view.browse(None).is_ok());
        let err = view.delete("abc").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::OperationNotExposed(_))
        ));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
