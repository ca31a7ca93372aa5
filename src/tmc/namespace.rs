//! Kubernetes namespaces managed through TMC

use super::client::{ApiObject, Resources, TmcClient};
use super::identity::FullName;
use super::meta::{Metadata, Status};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceSpec {
    #[serde(default)]
    pub workspace_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Namespace {
    pub full_name: FullName,
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub spec: NamespaceSpec,
    #[serde(default, skip_serializing)]
    pub status: Status,
}

impl ApiObject for Namespace {
    const KIND: &'static str = "namespace";
    const SCOPED_CREATE: bool = true;

    fn collection_segments(name: &FullName) -> Vec<String> {
        vec![
            "clusters".to_string(),
            name.cluster_segment().to_string(),
            "namespaces".to_string(),
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

impl TmcClient {
    pub fn namespaces(&self) -> Resources<'_, Namespace> {
        self.resources()
    }
}
