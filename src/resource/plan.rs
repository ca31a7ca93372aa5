//! Change planning
//!
//! Compares prior state with the proposed configuration attribute by
//! attribute and reports which changes can be applied in place and which
//! force the resource to be replaced.

use super::diagnostic::Diagnostic;
use super::registry::{self, AttributeDef, AttributeType};
use crate::tmc::meta::Labels;
use crate::translate::labels::changed_keys;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Plan {
    /// Changed attributes that force destroy and recreate
    pub requires_replace: Vec<String>,
    /// Changed attributes that can be updated in place
    pub in_place: Vec<String>,
}

impl Plan {
    pub fn has_changes(&self) -> bool {
        !self.requires_replace.is_empty() || !self.in_place.is_empty()
    }

    pub fn replaces(&self) -> bool {
        !self.requires_replace.is_empty()
    }
}

/// Plan the transition of `type_name` from `prior` to `proposed`
pub fn plan(type_name: &str, prior: &Value, proposed: &Value) -> Result<Plan, Diagnostic> {
    let schema = registry::get_resource(type_name)
        .ok_or_else(|| Diagnostic::error("Unknown resource type", type_name))?;

    let mut plan = Plan::default();
    for (name, def) in &schema.attributes {
        if def.is_computed_only() {
            continue;
        }

        let before = effective(def, prior.get(name));
        let after = effective(def, proposed.get(name));
        if attribute_equal(def, &before, &after) {
            continue;
        }

        if def.force_new {
            plan.requires_replace.push(name.clone());
        } else {
            plan.in_place.push(name.clone());
        }
    }

    tracing::debug!(
        "Plan for {}: replace={:?} in_place={:?}",
        type_name,
        plan.requires_replace,
        plan.in_place
    );
    Ok(plan)
}

/// Attribute value with its default applied and empty collections folded to null
fn effective(def: &AttributeDef, value: Option<&Value>) -> Value {
    let value = match value {
        None | Some(Value::Null) => def.default.clone().unwrap_or(Value::Null),
        Some(v) => v.clone(),
    };

    let empty = match &value {
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    };

    if !empty {
        value
    } else if value.is_string() {
        def.default.clone().unwrap_or(Value::Null)
    } else {
        Value::Null
    }
}

fn attribute_equal(def: &AttributeDef, before: &Value, after: &Value) -> bool {
    if def.kind == AttributeType::Map {
        return changed_keys(&label_map(before), &label_map(after)).is_empty();
    }
    before == after
}

fn label_map(value: &Value) -> Labels {
    serde_json::from_value(value.clone()).unwrap_or_default()
}
