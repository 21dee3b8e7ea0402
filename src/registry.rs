//! Resource registry - embedded schema declarations.
//!
//! The per-resource schema sets (entity shape, identity fields, includable
//! relations, create/update shapes) are plain JSON compiled into the binary
//! and parsed once on first access. New resources are added by dropping a
//! declaration into `src/resources/` without touching the framework.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::schema::SchemaSet;

/// Embedded declaration files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[
    include_str!("resources/posts.json"),
    include_str!("resources/members.json"),
    include_str!("resources/taxonomy.json"),
    include_str!("resources/settings.json"),
];

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
struct ResourceConfig {
    #[serde(default)]
    resources: HashMap<String, SchemaSet>,
}

static REGISTRY: OnceLock<HashMap<String, SchemaSet>> = OnceLock::new();

/// Get the resource registry (parses the embedded JSON on first access).
fn get_registry() -> &'static HashMap<String, SchemaSet> {
    REGISTRY.get_or_init(|| {
        let mut resources = HashMap::new();
        for content in RESOURCE_FILES {
            let partial: ResourceConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            resources.extend(partial.resources);
        }
        resources
    })
}

/// Get a schema set by resource name.
pub fn get_resource(name: &str) -> Option<&'static SchemaSet> {
    get_registry().get(name)
}

/// All declared resource names.
pub fn all_resource_names() -> Vec<&'static str> {
    get_registry().keys().map(|s| s.as_str()).collect()
}
