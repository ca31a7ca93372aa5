//! Management clusters
//!
//! Registering a management cluster only creates the TMC record; the server
//! answers with a registration URL that the operator applies to the actual
//! cluster.

use super::client::{ApiObject, Resources, TmcClient};
use super::identity::FullName;
use super::meta::{Metadata, Status};
use serde::{Deserialize, Serialize};

/// Kubernetes distribution backing a management cluster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum KubernetesProviderType {
    Tkg,
    TkgService,
    TkgHosted,
    #[default]
    Unspecified,
}

impl KubernetesProviderType {
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Tkg => "VMWARE_TANZU_KUBERNETES_GRID",
            Self::TkgService => "VMWARE_TANZU_KUBERNETES_GRID_SERVICE",
            Self::TkgHosted => "VMWARE_TANZU_KUBERNETES_GRID_HOSTED",
            Self::Unspecified => "KUBERNETES_PROVIDER_UNSPECIFIED",
        }
    }
}

/// Unknown wire values decode as `Unspecified`
impl From<String> for KubernetesProviderType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "VMWARE_TANZU_KUBERNETES_GRID" => Self::Tkg,
            "VMWARE_TANZU_KUBERNETES_GRID_SERVICE" => Self::TkgService,
            "VMWARE_TANZU_KUBERNETES_GRID_HOSTED" => Self::TkgHosted,
            _ => Self::Unspecified,
        }
    }
}

impl From<KubernetesProviderType> for &'static str {
    fn from(value: KubernetesProviderType) -> Self {
        value.wire_name()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementClusterSpec {
    #[serde(default)]
    pub kubernetes_provider_type: KubernetesProviderType,
    #[serde(default)]
    pub default_cluster_group: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagementCluster {
    pub full_name: FullName,
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub spec: ManagementClusterSpec,
    #[serde(default, skip_serializing)]
    pub status: Status,
}

impl ApiObject for ManagementCluster {
    const KIND: &'static str = "managementCluster";

    fn collection_segments(_name: &FullName) -> Vec<String> {
        vec!["managementclusters".to_string()]
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
    pub fn management_clusters(&self) -> Resources<'_, ManagementCluster> {
        self.resources()
    }
}
