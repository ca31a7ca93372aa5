//! Object metadata shared by every TMC resource

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// String-to-string label map
pub type Labels = BTreeMap<String, String>;

/// `meta` block of a TMC object
///
/// `uid`, `resourceVersion` and `creationTime` are owned by the server. The
/// client only sends `resourceVersion` back on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Labels>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
}

impl Metadata {
    /// Client-owned metadata for an outbound record
    pub fn declared(description: &str, labels: &Labels) -> Self {
        Self {
            description: (!description.is_empty()).then(|| description.to_string()),
            labels: (!labels.is_empty()).then(|| labels.clone()),
            ..Default::default()
        }
    }

    /// Drop every server-owned field before a create
    pub fn strip_server_fields(&mut self) {
        self.uid = None;
        self.resource_version = None;
        self.creation_time = None;
    }

    pub fn description_or_default(&self) -> String {
        self.description.clone().unwrap_or_default()
    }

    pub fn labels_or_default(&self) -> Labels {
        self.labels.clone().unwrap_or_default()
    }
}

/// Server-computed `status` block; never sent back
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub registration_url: Option<String>,
}
