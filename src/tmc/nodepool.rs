//! Node pools of AWS workload clusters

use super::client::{ApiObject, Resources, TmcClient};
use super::identity::FullName;
use super::meta::{Labels, Metadata, Status};
use serde::{Deserialize, Serialize};

/// `spec.tkgAws` of a node pool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsNodeSpec {
    #[serde(default)]
    pub instance_type: String,
    #[serde(default)]
    pub availability_zone: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePoolSpec {
    /// Labels applied to the cloud instances
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub cloud_labels: Labels,
    /// Labels applied to the Kubernetes nodes
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub node_labels: Labels,
    /// Encoded as a decimal string on the wire
    #[serde(default)]
    pub worker_node_count: String,
    #[serde(default)]
    pub tkg_aws: AwsNodeSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePool {
    pub full_name: FullName,
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub spec: NodePoolSpec,
    #[serde(default, skip_serializing)]
    pub status: Status,
}

impl ApiObject for NodePool {
    const KIND: &'static str = "nodepool";

    fn collection_segments(name: &FullName) -> Vec<String> {
        vec![
            "clusters".to_string(),
            name.cluster_segment().to_string(),
            "nodepools".to_string(),
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
    pub fn nodepools(&self) -> Resources<'_, NodePool> {
        self.resources()
    }
}
