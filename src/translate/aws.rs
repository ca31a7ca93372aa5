//! AWS workload clusters (`tmc_aws_cluster`)

use super::labels::labels_changed;
use super::{
    cidr_or_default, require, unwrap_singleton, validate_name, wrap_singleton, DEFAULT_POD_CIDR,
    DEFAULT_SERVICE_CIDR,
};
use crate::tmc::cluster::{
    AwsClusterNetwork, AwsControlPlane, AwsDistribution, AwsNetwork, AwsProviderNetwork,
    AwsSecurity, AwsSettings, AwsTopology, CidrBlock, Cluster, ClusterSpec, ProviderSpec,
    TkgAwsSpec, Vpc,
};
use crate::tmc::error::{Result, TmcError};
use crate::tmc::identity::FullName;
use crate::tmc::meta::{Labels, Metadata};
use serde::{Deserialize, Serialize};

/// Flat configuration of an AWS cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsClusterConfig {
    pub name: String,
    pub management_cluster: String,
    pub provisioner_name: String,
    pub cluster_group: String,
    pub description: String,
    pub labels: Labels,
    pub region: String,
    pub version: String,
    pub credential_name: String,
    pub availability_zones: Vec<String>,
    pub instance_type: String,
    pub vpc_cidrblock: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_cidrblock: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_cidrblock: Option<String>,
    pub ssh_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl AwsClusterConfig {
    pub fn identity(&self) -> FullName {
        FullName::cluster(&self.name, &self.management_cluster, &self.provisioner_name)
    }

    pub fn validate(&self) -> Result<()> {
        validate_name("name", &self.name)?;
        require("management_cluster", &self.management_cluster)?;
        require("provisioner_name", &self.provisioner_name)?;
        require("cluster_group", &self.cluster_group)?;
        validate_zone_count(self.availability_zones.len())
    }

    /// Whether any in-place updatable attribute differs from `other`
    pub fn mutable_changed(&self, other: &Self) -> bool {
        self.description != other.description
            || self.cluster_group != other.cluster_group
            || labels_changed(&self.labels, &other.labels)
    }
}

/// A control plane spans one zone (development) or three (highly available)
pub fn validate_zone_count(count: usize) -> Result<()> {
    match count {
        1 | 3 => Ok(()),
        n => Err(TmcError::validation(format!(
            "number of availability_zones must be either 1 for a development cluster or 3 for a highly available cluster, got {}",
            n
        ))),
    }
}

/// Flat configuration to wire record
pub fn to_cluster(config: &AwsClusterConfig) -> Result<Cluster> {
    config.validate()?;

    let zones = config.availability_zones.clone();
    let high_availability = zones.len() > 1;

    let spec = TkgAwsSpec {
        distribution: AwsDistribution {
            provisioner_credential_name: config.credential_name.clone(),
            region: config.region.clone(),
            version: config.version.clone(),
        },
        settings: AwsSettings {
            network: AwsNetwork {
                cluster: AwsClusterNetwork {
                    pods: wrap_singleton(CidrBlock {
                        cidr_blocks: cidr_or_default(
                            config.pod_cidrblock.as_deref(),
                            DEFAULT_POD_CIDR,
                        ),
                    }),
                    services: wrap_singleton(CidrBlock {
                        cidr_blocks: cidr_or_default(
                            config.service_cidrblock.as_deref(),
                            DEFAULT_SERVICE_CIDR,
                        ),
                    }),
                },
                provider: AwsProviderNetwork {
                    vpc: Vpc {
                        cidr_block: config.vpc_cidrblock.clone(),
                    },
                },
            },
            security: AwsSecurity {
                ssh_key: config.ssh_key.clone(),
            },
        },
        topology: AwsTopology {
            control_plane: AwsControlPlane {
                availability_zones: zones,
                instance_type: config.instance_type.clone(),
                high_availability,
            },
        },
    };

    let mut meta = Metadata::declared(&config.description, &config.labels);
    meta.resource_version = config.resource_version.clone();

    Ok(Cluster {
        full_name: config.identity(),
        meta,
        spec: ClusterSpec {
            cluster_group_name: config.cluster_group.clone(),
            provider: Some(ProviderSpec::Aws(spec)),
        },
        ..Default::default()
    })
}

/// Write the flat view of `cluster` into `config`
pub fn apply_cluster(config: &mut AwsClusterConfig, cluster: &Cluster) -> Result<()> {
    let aws = cluster.spec.aws().ok_or_else(|| {
        TmcError::decode(format!(
            "cluster '{}' does not carry an AWS topology",
            cluster.full_name.name
        ))
    })?;

    config.resource_version = cluster.meta.resource_version.clone();
    config.description = cluster.meta.description_or_default();
    config.labels = cluster.meta.labels_or_default();
    config.cluster_group = cluster.spec.cluster_group_name.clone();

    config.region = aws.distribution.region.clone();
    config.version = aws.distribution.version.clone();
    config.credential_name = aws.distribution.provisioner_credential_name.clone();
    config.availability_zones = aws.topology.control_plane.availability_zones.clone();
    config.instance_type = aws.topology.control_plane.instance_type.clone();
    config.vpc_cidrblock = aws.settings.network.provider.vpc.cidr_block.clone();
    config.ssh_key = aws.settings.security.ssh_key.clone();

    let network = &aws.settings.network.cluster;
    config.pod_cidrblock = unwrap_singleton(&network.pods).map(|b| b.cidr_blocks.clone());
    config.service_cidrblock =
        unwrap_singleton(&network.services).map(|b| b.cidr_blocks.clone());

    Ok(())
}
