//! TMC workload clusters
//!
//! Wire representation of `cluster` objects. The provider-specific topology
//! is a closed variant: a cluster is either provisioned on AWS (`tkgAws`) or
//! through the vSphere TKG service (`tkgServiceVsphere`).

use super::client::{unwrap_object, ApiObject, Resources, TmcClient};
use super::error::{Result, TmcError};
use super::identity::FullName;
use super::meta::{Metadata, Status};
use serde::{Deserialize, Serialize};

/// One entry of an AWS CIDR list: `{"cidrBlocks": "10.0.0.0/16"}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CidrBlock {
    #[serde(default)]
    pub cidr_blocks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsDistribution {
    #[serde(default)]
    pub provisioner_credential_name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsClusterNetwork {
    #[serde(default)]
    pub pods: Vec<CidrBlock>,
    #[serde(default)]
    pub services: Vec<CidrBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vpc {
    #[serde(default)]
    pub cidr_block: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsProviderNetwork {
    #[serde(default)]
    pub vpc: Vpc,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsNetwork {
    #[serde(default)]
    pub cluster: AwsClusterNetwork,
    #[serde(default)]
    pub provider: AwsProviderNetwork,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsSecurity {
    #[serde(default)]
    pub ssh_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsSettings {
    #[serde(default)]
    pub network: AwsNetwork,
    #[serde(default)]
    pub security: AwsSecurity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsControlPlane {
    #[serde(default)]
    pub availability_zones: Vec<String>,
    #[serde(default)]
    pub instance_type: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub high_availability: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsTopology {
    #[serde(default)]
    pub control_plane: AwsControlPlane,
}

/// `spec.tkgAws`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TkgAwsSpec {
    #[serde(default)]
    pub distribution: AwsDistribution,
    #[serde(default)]
    pub settings: AwsSettings,
    #[serde(default)]
    pub topology: AwsTopology,
}

/// vSphere CIDR list: `{"cidrBlocks": ["10.0.0.0/16"]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CidrList {
    #[serde(default)]
    pub cidr_blocks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VsphereNetwork {
    #[serde(default)]
    pub pods: CidrList,
    #[serde(default)]
    pub services: CidrList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VsphereSettings {
    #[serde(default)]
    pub network: VsphereNetwork,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VsphereDistribution {
    #[serde(default)]
    pub version: String,
}

/// VM sizing shared by the control plane and node pools
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VsphereNodeSpec {
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub storage_class: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VsphereNodePoolSpec {
    /// Encoded as a decimal string on the wire
    #[serde(default)]
    pub worker_node_count: String,
    #[serde(default)]
    pub tkg_service_vsphere: VsphereNodeSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodePoolInfo {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VsphereNodePool {
    #[serde(default)]
    pub spec: VsphereNodePoolSpec,
    #[serde(default)]
    pub info: NodePoolInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VsphereTopology {
    #[serde(default)]
    pub control_plane: VsphereNodeSpec,
    #[serde(default)]
    pub node_pools: Vec<VsphereNodePool>,
}

/// `spec.tkgServiceVsphere`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TkgVsphereSpec {
    #[serde(default)]
    pub settings: VsphereSettings,
    #[serde(default)]
    pub distribution: VsphereDistribution,
    #[serde(default)]
    pub topology: VsphereTopology,
}

/// Provider-specific topology of a cluster
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderSpec {
    Aws(TkgAwsSpec),
    Vsphere(TkgVsphereSpec),
}

/// Cluster `spec`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawClusterSpec", into = "RawClusterSpec")]
pub struct ClusterSpec {
    pub cluster_group_name: String,
    pub provider: Option<ProviderSpec>,
}

impl ClusterSpec {
    pub fn aws(&self) -> Option<&TkgAwsSpec> {
        match &self.provider {
            Some(ProviderSpec::Aws(spec)) => Some(spec),
            _ => None,
        }
    }

    pub fn vsphere(&self) -> Option<&TkgVsphereSpec> {
        match &self.provider {
            Some(ProviderSpec::Vsphere(spec)) => Some(spec),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClusterSpec {
    #[serde(default)]
    cluster_group_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tkg_aws: Option<TkgAwsSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tkg_service_vsphere: Option<TkgVsphereSpec>,
}

impl TryFrom<RawClusterSpec> for ClusterSpec {
    type Error = String;

    fn try_from(raw: RawClusterSpec) -> std::result::Result<Self, Self::Error> {
        let provider = match (raw.tkg_aws, raw.tkg_service_vsphere) {
            (Some(_), Some(_)) => {
                return Err("cluster spec carries both tkgAws and tkgServiceVsphere".to_string())
            }
            (Some(aws), None) => Some(ProviderSpec::Aws(aws)),
            (None, Some(vsphere)) => Some(ProviderSpec::Vsphere(vsphere)),
            (None, None) => None,
        };

        Ok(Self {
            cluster_group_name: raw.cluster_group_name,
            provider,
        })
    }
}

impl From<ClusterSpec> for RawClusterSpec {
    fn from(spec: ClusterSpec) -> Self {
        let (tkg_aws, tkg_service_vsphere) = match spec.provider {
            Some(ProviderSpec::Aws(aws)) => (Some(aws), None),
            Some(ProviderSpec::Vsphere(vsphere)) => (None, Some(vsphere)),
            None => (None, None),
        };

        Self {
            cluster_group_name: spec.cluster_group_name,
            tkg_aws,
            tkg_service_vsphere,
        }
    }
}

/// A TMC workload cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub full_name: FullName,
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub spec: ClusterSpec,
    #[serde(default, skip_serializing)]
    pub status: Status,
}

impl ApiObject for Cluster {
    const KIND: &'static str = "cluster";

    fn collection_segments(_name: &FullName) -> Vec<String> {
        vec!["clusters".to_string()]
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

#[derive(Debug, Deserialize)]
struct AdminKubeConfig {
    #[serde(default)]
    kubeconfig: Option<String>,
}

impl TmcClient {
    /// Typed accessor for workload clusters
    pub fn clusters(&self) -> Resources<'_, Cluster> {
        self.resources()
    }

    /// Fetch the admin kubeconfig of a workload cluster
    pub async fn admin_kubeconfig(&self, cluster: &FullName) -> Result<String> {
        let segments = vec![
            "clusters".to_string(),
            cluster.name.clone(),
            "adminkubeconfig".to_string(),
        ];
        let url = self.api_url(&segments, &cluster.scope_params());
        let body = self.get(&url).await?;

        let config: AdminKubeConfig = serde_json::from_value(body)?;
        config
            .kubeconfig
            .ok_or_else(|| TmcError::decode("response is missing the 'kubeconfig' field"))
    }
}

/// Decode a `{"cluster": {...}}` body
pub fn decode_cluster(body: serde_json::Value) -> Result<Cluster> {
    unwrap_object(Cluster::KIND, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_aws_spec_round_trips_through_wire_form() {
        let body = json!({
            "cluster": {
                "fullName": {"name": "c1", "managementClusterName": "aws-hosted", "provisionerName": "p"},
                "meta": {"uid": "c:01", "resourceVersion": "3"},
                "spec": {
                    "clusterGroupName": "default",
                    "tkgAws": {
                        "distribution": {"region": "us-east-1", "version": "1.21", "provisionerCredentialName": "cred"},
                        "topology": {"controlPlane": {"availabilityZones": ["us-east-1a"], "instanceType": "m5.large"}}
                    }
                },
                "status": {"phase": "READY"}
            }
        });

        let cluster = decode_cluster(body).unwrap();
        let aws = cluster.spec.aws().expect("aws topology");
        assert_eq!(aws.distribution.region, "us-east-1");
        assert!(cluster.spec.vsphere().is_none());
        assert_eq!(cluster.status.phase.as_deref(), Some("READY"));

        let out = serde_json::to_value(&cluster).unwrap();
        assert!(out.get("status").is_none());
        assert_eq!(out["spec"]["clusterGroupName"], "default");
        assert!(out["spec"].get("tkgServiceVsphere").is_none());
    }

    #[test]
    fn test_spec_with_both_providers_fails_to_decode() {
        let body = json!({
            "cluster": {
                "fullName": {"name": "c1"},
                "spec": {"tkgAws": {}, "tkgServiceVsphere": {}}
            }
        });
        assert!(matches!(decode_cluster(body), Err(TmcError::Decode { .. })));
    }

    #[test]
    fn test_spec_without_provider_decodes() {
        let body = json!({
            "cluster": {"fullName": {"name": "attached"}, "spec": {"clusterGroupName": "g"}}
        });
        let cluster = decode_cluster(body).unwrap();
        assert!(cluster.spec.provider.is_none());
    }
}
