//! Provider Registry - Load attribute schemas from JSON
//!
//! This module loads the provider, resource and data-source schemas from an
//! embedded JSON file and provides lookup functions for the dispatcher and
//! the planner.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Embedded schema file (compiled into the binary)
const SCHEMA_FILE: &str = include_str!("../resources/provider.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Number,
    Bool,
    List,
    Map,
    /// List of nested configuration blocks
    BlockList,
}

/// Attribute definition from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeDef {
    #[serde(rename = "type")]
    pub kind: AttributeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub computed: bool,
    #[serde(default)]
    pub force_new: bool,
    #[serde(default)]
    pub sensitive: bool,
    /// Value assumed when the attribute is not configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

impl AttributeDef {
    /// Attributes the server alone decides
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.required && !self.optional
    }
}

/// Schema of a resource or data source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDef {
    #[serde(default)]
    pub description: String,
    pub attributes: BTreeMap<String, AttributeDef>,
}

impl SchemaDef {
    pub fn attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.attributes.get(name)
    }

    /// Required attributes that are absent, null or empty in `config`
    pub fn missing_required(&self, config: &Value) -> Vec<String> {
        self.attributes
            .iter()
            .filter(|(_, def)| def.required)
            .filter(|(name, _)| is_unset(config.get(name.as_str())))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// List attributes in `config` whose length falls outside `min_items..=max_items`
    pub fn out_of_bounds(&self, config: &Value) -> Vec<String> {
        let mut problems = Vec::new();
        for (name, def) in &self.attributes {
            let Some(Value::Array(items)) = config.get(name.as_str()) else {
                continue;
            };
            let count = items.len();
            if let Some(min) = def.min_items.filter(|min| count < *min) {
                problems.push(format!("{} needs at least {} items, got {}", name, min, count));
            }
            if let Some(max) = def.max_items.filter(|max| count > *max) {
                problems.push(format!("{} takes at most {} items, got {}", name, max, count));
            }
        }
        problems
    }
}

fn is_unset(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        _ => false,
    }
}

/// Root structure of resources/provider.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSchema {
    pub provider: SchemaDef,
    #[serde(default)]
    pub resources: BTreeMap<String, SchemaDef>,
    #[serde(default)]
    pub data_sources: BTreeMap<String, SchemaDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ProviderSchema> = OnceLock::new();

/// Get the provider schema (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ProviderSchema {
    REGISTRY.get_or_init(|| {
        serde_json::from_str(SCHEMA_FILE)
            .unwrap_or_else(|e| panic!("Failed to parse embedded provider schema: {}", e))
    })
}

/// Get a resource schema by type name
pub fn get_resource(type_name: &str) -> Option<&'static SchemaDef> {
    get_registry().resources.get(type_name)
}

/// Get a data-source schema by type name
pub fn get_data_source(type_name: &str) -> Option<&'static SchemaDef> {
    get_registry().data_sources.get(type_name)
}
