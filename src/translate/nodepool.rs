//! AWS node pools (`tmc_aws_nodepool`)

use super::{encode_node_count, parse_node_count, require, validate_name};
use crate::tmc::error::Result;
use crate::tmc::identity::FullName;
use crate::tmc::meta::{Labels, Metadata};
use crate::tmc::nodepool::{AwsNodeSpec, NodePool, NodePoolSpec};
use serde::{Deserialize, Serialize};

/// Flat configuration of an AWS node pool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsNodePoolConfig {
    pub name: String,
    pub cluster_name: String,
    pub management_cluster: String,
    pub provisioner_name: String,
    pub description: String,
    pub node_labels: Labels,
    pub cloud_labels: Labels,
    pub worker_node_count: u32,
    pub availability_zone: String,
    pub instance_type: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl AwsNodePoolConfig {
    pub fn identity(&self) -> FullName {
        FullName::in_cluster(
            &self.name,
            &self.cluster_name,
            &self.management_cluster,
            &self.provisioner_name,
        )
    }

    pub fn validate(&self) -> Result<()> {
        validate_name("name", &self.name)?;
        require("cluster_name", &self.cluster_name)?;
        require("management_cluster", &self.management_cluster)?;
        require("provisioner_name", &self.provisioner_name)
    }

    /// Only the worker count can be changed in place
    pub fn mutable_changed(&self, other: &Self) -> bool {
        self.worker_node_count != other.worker_node_count
    }
}

pub fn to_nodepool(config: &AwsNodePoolConfig) -> Result<NodePool> {
    config.validate()?;

    let mut meta = Metadata::declared(&config.description, &Labels::new());
    meta.resource_version = config.resource_version.clone();

    Ok(NodePool {
        full_name: config.identity(),
        meta,
        spec: NodePoolSpec {
            cloud_labels: config.cloud_labels.clone(),
            node_labels: config.node_labels.clone(),
            worker_node_count: encode_node_count(config.worker_node_count),
            tkg_aws: AwsNodeSpec {
                instance_type: config.instance_type.clone(),
                availability_zone: config.availability_zone.clone(),
                version: config.version.clone(),
            },
        },
        ..Default::default()
    })
}

pub fn apply_nodepool(config: &mut AwsNodePoolConfig, pool: &NodePool) -> Result<()> {
    config.resource_version = pool.meta.resource_version.clone();
    config.description = pool.meta.description_or_default();
    config.cloud_labels = pool.spec.cloud_labels.clone();
    config.node_labels = pool.spec.node_labels.clone();
    config.worker_node_count = parse_node_count(&pool.spec.worker_node_count)?;
    config.instance_type = pool.spec.tkg_aws.instance_type.clone();
    config.availability_zone = pool.spec.tkg_aws.availability_zone.clone();
    config.version = pool.spec.tkg_aws.version.clone();
    Ok(())
}
