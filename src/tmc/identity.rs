//! Resource identity
//!
//! Every TMC object is addressed by a composite `fullName`. Which parts are
//! populated depends on the kind: a management cluster only has a name, a
//! node pool carries the whole chain.

use serde::{Deserialize, Serialize};

/// Query parameter carrying the management cluster scope
pub const MANAGEMENT_CLUSTER_PARAM: &str = "fullName.managementClusterName";
/// Query parameter carrying the provisioner scope
pub const PROVISIONER_PARAM: &str = "fullName.provisionerName";

/// Composite identifier of a remote object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_cluster_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
    #[serde(default)]
    pub name: String,
}

impl FullName {
    /// Identity of an org-level object (management cluster, workspace, ...)
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Identity of a workload cluster
    pub fn cluster(name: &str, management_cluster: &str, provisioner: &str) -> Self {
        Self {
            management_cluster_name: non_empty(management_cluster),
            provisioner_name: non_empty(provisioner),
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Identity of an object living inside a workload cluster
    pub fn in_cluster(
        name: &str,
        cluster: &str,
        management_cluster: &str,
        provisioner: &str,
    ) -> Self {
        Self {
            cluster_name: non_empty(cluster),
            ..Self::cluster(name, management_cluster, provisioner)
        }
    }

    /// Scope query parameters for the management cluster and provisioner
    pub fn scope_params(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::new();
        if let Some(mc) = self.management_cluster_name.as_deref() {
            params.push((MANAGEMENT_CLUSTER_PARAM, mc));
        }
        if let Some(p) = self.provisioner_name.as_deref() {
            params.push((PROVISIONER_PARAM, p));
        }
        params
    }

    /// Name of the parent cluster, empty when unset
    pub fn cluster_segment(&self) -> &str {
        self.cluster_name.as_deref().unwrap_or_default()
    }
}

impl std::fmt::Display for FullName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts = [
            self.management_cluster_name.as_deref(),
            self.provisioner_name.as_deref(),
            self.cluster_name.as_deref(),
            Some(self.name.as_str()),
        ];
        let joined: Vec<&str> = parts.into_iter().flatten().filter(|p| !p.is_empty()).collect();
        write!(f, "{}", joined.join("/"))
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
