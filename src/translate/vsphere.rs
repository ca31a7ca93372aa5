//! vSphere TKG service clusters (`tmc_vsphere_cluster`)

use super::labels::labels_changed;
use super::{
    cidr_or_default, encode_node_count, parse_node_count, require, unwrap_singleton,
    validate_name, wrap_singleton, DEFAULT_POD_CIDR, DEFAULT_SERVICE_CIDR,
};
use crate::tmc::cluster::{
    CidrList, Cluster, ClusterSpec, NodePoolInfo, ProviderSpec, TkgVsphereSpec,
    VsphereDistribution, VsphereNetwork, VsphereNodePool, VsphereNodePoolSpec, VsphereNodeSpec,
    VsphereSettings, VsphereTopology,
};
use crate::tmc::error::{Result, TmcError};
use crate::tmc::identity::FullName;
use crate::tmc::meta::{Labels, Metadata};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlPlaneSpec {
    pub class: String,
    pub storage_class: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VsphereNodePoolConfig {
    pub nodepool_name: String,
    pub worker_node_count: u32,
    pub node_class: String,
    pub node_storage_class: String,
}

/// Flat configuration of a vSphere cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VsphereClusterConfig {
    pub name: String,
    pub management_cluster: String,
    pub provisioner_name: String,
    pub cluster_group: String,
    pub description: String,
    pub labels: Labels,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_cidrblock: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_cidrblock: Option<String>,
    /// Exactly one element
    pub control_plane_spec: Vec<ControlPlaneSpec>,
    /// At least one element
    pub nodepool: Vec<VsphereNodePoolConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl VsphereClusterConfig {
    pub fn identity(&self) -> FullName {
        FullName::cluster(&self.name, &self.management_cluster, &self.provisioner_name)
    }

    pub fn validate(&self) -> Result<()> {
        validate_name("name", &self.name)?;
        require("management_cluster", &self.management_cluster)?;
        require("provisioner_name", &self.provisioner_name)?;
        require("cluster_group", &self.cluster_group)?;

        if self.control_plane_spec.len() != 1 {
            return Err(TmcError::validation(format!(
                "control_plane_spec must contain exactly one block, got {}",
                self.control_plane_spec.len()
            )));
        }
        if self.nodepool.is_empty() {
            return Err(TmcError::validation(
                "nodepool must contain at least one block",
            ));
        }
        for pool in &self.nodepool {
            validate_name("nodepool_name", &pool.nodepool_name)?;
        }
        Ok(())
    }

    pub fn mutable_changed(&self, other: &Self) -> bool {
        self.description != other.description
            || self.cluster_group != other.cluster_group
            || labels_changed(&self.labels, &other.labels)
    }
}

fn to_node_pool(pool: &VsphereNodePoolConfig) -> VsphereNodePool {
    VsphereNodePool {
        spec: VsphereNodePoolSpec {
            worker_node_count: encode_node_count(pool.worker_node_count),
            tkg_service_vsphere: VsphereNodeSpec {
                class: pool.node_class.clone(),
                storage_class: pool.node_storage_class.clone(),
            },
        },
        info: NodePoolInfo {
            name: pool.nodepool_name.clone(),
        },
    }
}

fn from_node_pool(pool: &VsphereNodePool) -> Result<VsphereNodePoolConfig> {
    Ok(VsphereNodePoolConfig {
        nodepool_name: pool.info.name.clone(),
        worker_node_count: parse_node_count(&pool.spec.worker_node_count)?,
        node_class: pool.spec.tkg_service_vsphere.class.clone(),
        node_storage_class: pool.spec.tkg_service_vsphere.storage_class.clone(),
    })
}

/// Flat configuration to wire record
pub fn to_cluster(config: &VsphereClusterConfig) -> Result<Cluster> {
    config.validate()?;

    let control_plane = unwrap_singleton(&config.control_plane_spec)
        .map(|cp| VsphereNodeSpec {
            class: cp.class.clone(),
            storage_class: cp.storage_class.clone(),
        })
        .unwrap_or_default();

    let spec = TkgVsphereSpec {
        settings: VsphereSettings {
            network: VsphereNetwork {
                pods: CidrList {
                    cidr_blocks: wrap_singleton(cidr_or_default(
                        config.pod_cidrblock.as_deref(),
                        DEFAULT_POD_CIDR,
                    )),
                },
                services: CidrList {
                    cidr_blocks: wrap_singleton(cidr_or_default(
                        config.service_cidrblock.as_deref(),
                        DEFAULT_SERVICE_CIDR,
                    )),
                },
            },
        },
        distribution: VsphereDistribution {
            version: config.version.clone(),
        },
        topology: VsphereTopology {
            control_plane,
            node_pools: config.nodepool.iter().map(to_node_pool).collect(),
        },
    };

    let mut meta = Metadata::declared(&config.description, &config.labels);
    meta.resource_version = config.resource_version.clone();

    Ok(Cluster {
        full_name: config.identity(),
        meta,
        spec: ClusterSpec {
            cluster_group_name: config.cluster_group.clone(),
            provider: Some(ProviderSpec::Vsphere(spec)),
        },
        ..Default::default()
    })
}

/// Write the flat view of `cluster` into `config`
pub fn apply_cluster(config: &mut VsphereClusterConfig, cluster: &Cluster) -> Result<()> {
    let vsphere = cluster.spec.vsphere().ok_or_else(|| {
        TmcError::decode(format!(
            "cluster '{}' does not carry a vSphere topology",
            cluster.full_name.name
        ))
    })?;

    config.resource_version = cluster.meta.resource_version.clone();
    config.description = cluster.meta.description_or_default();
    config.labels = cluster.meta.labels_or_default();
    config.cluster_group = cluster.spec.cluster_group_name.clone();
    config.version = vsphere.distribution.version.clone();

    let network = &vsphere.settings.network;
    config.pod_cidrblock = unwrap_singleton(&network.pods.cidr_blocks).cloned();
    config.service_cidrblock = unwrap_singleton(&network.services.cidr_blocks).cloned();

    let control_plane = &vsphere.topology.control_plane;
    config.control_plane_spec = vec![ControlPlaneSpec {
        class: control_plane.class.clone(),
        storage_class: control_plane.storage_class.clone(),
    }];

    config.nodepool = vsphere
        .topology
        .node_pools
        .iter()
        .map(from_node_pool)
        .collect::<Result<Vec<_>>>()?;

    Ok(())
}
