//! Shape translation between flat resource configuration and TMC wire records
//!
//! Each submodule owns the flat configuration of one resource kind together
//! with its outbound (`to_*`) and inbound (`apply_*`) translation. Outbound
//! translation injects defaults and wraps singleton values; inbound
//! translation unwraps them again so a read does not report drift.
//!
//! # Module Structure
//!
//! - [`aws`] / [`vsphere`] - workload cluster topologies
//! - [`nodepool`] - flat AWS node pool
//! - [`management_cluster`] - provider-type enumeration
//! - [`scan`] - scan type selection
//! - [`metadata`] - namespaces, workspaces and cluster groups
//! - [`labels`] - label diffing that ignores server-injected keys

pub mod aws;
pub mod labels;
pub mod management_cluster;
pub mod metadata;
pub mod nodepool;
pub mod scan;
pub mod vsphere;

use crate::tmc::error::{Result, TmcError};

/// Pod CIDR used when the configuration leaves it unset
pub const DEFAULT_POD_CIDR: &str = "192.168.0.0/16";
/// Service CIDR used when the configuration leaves it unset
pub const DEFAULT_SERVICE_CIDR: &str = "10.96.0.0/12";

/// Wrap a scalar into the one-element list the wire expects
pub fn wrap_singleton<T>(value: T) -> Vec<T> {
    vec![value]
}

/// Take the scalar back out of a one-element list
///
/// Extra elements are ignored; an empty list yields `None`.
pub fn unwrap_singleton<T>(values: &[T]) -> Option<&T> {
    values.first()
}

/// Check a resource name against `^[a-z0-9][a-z0-9-]*$`
pub fn validate_name(field: &str, name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_lowercase() || first.is_ascii_digit() => {
            chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(TmcError::validation(format!(
            "{} '{}' should contain only lowercase letters, numbers or hyphens and should begin with either a letter or a number",
            field, name
        )))
    }
}

/// Reject an empty required attribute
pub fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TmcError::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Node counts travel as decimal strings
pub fn encode_node_count(count: u32) -> String {
    count.to_string()
}

/// Parse a wire node count; an empty string is zero
pub fn parse_node_count(value: &str) -> Result<u32> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse()
        .map_err(|_| TmcError::decode(format!("invalid worker node count '{}'", value)))
}

/// Value of an optional CIDR attribute with its default applied
pub fn cidr_or_default(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}
