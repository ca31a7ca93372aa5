//! Cluster inspection scans
//!
//! Scans are created without a name; the server assigns one and returns it
//! in the response.

use super::client::ApiObject;
use super::identity::FullName;
use super::meta::{Metadata, Status};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Exactly one of the fields is set; each carries an empty object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lite_spec: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cis_spec: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conformance_spec: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scan {
    pub full_name: FullName,
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub spec: ScanSpec,
    #[serde(default, skip_serializing)]
    pub status: Status,
}

impl ApiObject for Scan {
    const KIND: &'static str = "scan";
    const SCOPED_CREATE: bool = true;

    fn collection_segments(name: &FullName) -> Vec<String> {
        vec![
            "clusters".to_string(),
            name.cluster_segment().to_string(),
            "inspection".to_string(),
            "scans".to_string(),
        ]
    }

    fn full_name(&self) -> &FullName {
        &self.full_name
    }

    fn meta(&self) -> &Metadata {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Metadata {
        &mut self.meta
    }
}
