//! Resource kinds
//!
//! Binds each engine-facing type name to its configuration, wire record and
//! translation functions.

use super::lifecycle::ResourceKind;
use crate::tmc::client::ApiObject;
use crate::tmc::cluster::Cluster;
use crate::tmc::cluster_group::ClusterGroup;
use crate::tmc::error::Result;
use crate::tmc::identity::FullName;
use crate::tmc::management_cluster::ManagementCluster;
use crate::tmc::namespace::Namespace;
use crate::tmc::nodepool::NodePool;
use crate::tmc::scan::Scan;
use crate::tmc::workspace::Workspace;
use crate::translate::aws::{self, AwsClusterConfig};
use crate::translate::management_cluster::{self, ManagementClusterConfig};
use crate::translate::metadata::{self, ClusterGroupConfig, NamespaceConfig, WorkspaceConfig};
use crate::translate::nodepool::{self, AwsNodePoolConfig};
use crate::translate::scan::{self, ScanConfig};
use crate::translate::vsphere::{self, VsphereClusterConfig};

pub struct AwsClusterKind;

impl ResourceKind for AwsClusterKind {
    type Config = AwsClusterConfig;
    type Object = Cluster;
    const TYPE_NAME: &'static str = "tmc_aws_cluster";

    fn identity(config: &Self::Config) -> FullName {
        config.identity()
    }

    fn to_object(config: &Self::Config) -> Result<Self::Object> {
        aws::to_cluster(config)
    }

    fn apply_object(config: &mut Self::Config, object: &Self::Object) -> Result<()> {
        aws::apply_cluster(config, object)
    }

    fn mutable_changed(prior: &Self::Config, proposed: &Self::Config) -> bool {
        prior.mutable_changed(proposed)
    }

    fn resource_version(config: &Self::Config) -> Option<String> {
        config.resource_version.clone()
    }

    fn mark_updated(config: &mut Self::Config, timestamp: String) {
        config.last_updated = Some(timestamp);
    }
}

pub struct VsphereClusterKind;

impl ResourceKind for VsphereClusterKind {
    type Config = VsphereClusterConfig;
    type Object = Cluster;
    const TYPE_NAME: &'static str = "tmc_vsphere_cluster";

    fn identity(config: &Self::Config) -> FullName {
        config.identity()
    }

    fn to_object(config: &Self::Config) -> Result<Self::Object> {
        vsphere::to_cluster(config)
    }

    fn apply_object(config: &mut Self::Config, object: &Self::Object) -> Result<()> {
        vsphere::apply_cluster(config, object)
    }

    fn mutable_changed(prior: &Self::Config, proposed: &Self::Config) -> bool {
        prior.mutable_changed(proposed)
    }

    fn resource_version(config: &Self::Config) -> Option<String> {
        config.resource_version.clone()
    }

    fn mark_updated(config: &mut Self::Config, timestamp: String) {
        config.last_updated = Some(timestamp);
    }
}

pub struct AwsNodePoolKind;

impl ResourceKind for AwsNodePoolKind {
    type Config = AwsNodePoolConfig;
    type Object = NodePool;
    const TYPE_NAME: &'static str = "tmc_aws_nodepool";

    fn identity(config: &Self::Config) -> FullName {
        config.identity()
    }

    fn to_object(config: &Self::Config) -> Result<Self::Object> {
        nodepool::to_nodepool(config)
    }

    fn apply_object(config: &mut Self::Config, object: &Self::Object) -> Result<()> {
        nodepool::apply_nodepool(config, object)
    }

    fn mutable_changed(prior: &Self::Config, proposed: &Self::Config) -> bool {
        prior.mutable_changed(proposed)
    }

    fn resource_version(config: &Self::Config) -> Option<String> {
        config.resource_version.clone()
    }

    fn mark_updated(config: &mut Self::Config, timestamp: String) {
        config.last_updated = Some(timestamp);
    }
}

pub struct NamespaceKind;

impl ResourceKind for NamespaceKind {
    type Config = NamespaceConfig;
    type Object = Namespace;
    const TYPE_NAME: &'static str = "tmc_namespace";

    fn identity(config: &Self::Config) -> FullName {
        config.identity()
    }

    fn to_object(config: &Self::Config) -> Result<Self::Object> {
        metadata::to_namespace(config)
    }

    fn apply_object(config: &mut Self::Config, object: &Self::Object) -> Result<()> {
        metadata::apply_namespace(config, object)
    }
}

pub struct ManagementClusterKind;

impl ResourceKind for ManagementClusterKind {
    type Config = ManagementClusterConfig;
    type Object = ManagementCluster;
    const TYPE_NAME: &'static str = "tmc_management_cluster";

    fn identity(config: &Self::Config) -> FullName {
        config.identity()
    }

    fn to_object(config: &Self::Config) -> Result<Self::Object> {
        management_cluster::to_management_cluster(config)
    }

    fn apply_object(config: &mut Self::Config, object: &Self::Object) -> Result<()> {
        management_cluster::apply_management_cluster(config, object)
    }
}

pub struct ScanKind;

impl ResourceKind for ScanKind {
    type Config = ScanConfig;
    type Object = Scan;
    const TYPE_NAME: &'static str = "tmc_cluster_scan";

    fn identity(config: &Self::Config) -> FullName {
        config.identity()
    }

    fn to_object(config: &Self::Config) -> Result<Self::Object> {
        scan::to_scan(config)
    }

    fn apply_object(config: &mut Self::Config, object: &Self::Object) -> Result<()> {
        scan::apply_scan(config, object)
    }

    /// Scans are identified by their server-assigned name
    fn local_id(object: &Self::Object) -> Option<String> {
        let name = &object.full_name().name;
        (!name.is_empty()).then(|| name.clone())
    }
}

pub struct WorkspaceKind;

impl ResourceKind for WorkspaceKind {
    type Config = WorkspaceConfig;
    type Object = Workspace;
    const TYPE_NAME: &'static str = "tmc_workspace";

    fn identity(config: &Self::Config) -> FullName {
        config.identity()
    }

    fn to_object(config: &Self::Config) -> Result<Self::Object> {
        metadata::to_workspace(config)
    }

    fn apply_object(config: &mut Self::Config, object: &Self::Object) -> Result<()> {
        metadata::apply_workspace(config, object)
    }

    fn mutable_changed(prior: &Self::Config, proposed: &Self::Config) -> bool {
        prior.mutable_changed(proposed)
    }

    fn resource_version(config: &Self::Config) -> Option<String> {
        config.resource_version.clone()
    }

    fn mark_updated(config: &mut Self::Config, timestamp: String) {
        config.last_updated = Some(timestamp);
    }
}

pub struct ClusterGroupKind;

impl ResourceKind for ClusterGroupKind {
    type Config = ClusterGroupConfig;
    type Object = ClusterGroup;
    const TYPE_NAME: &'static str = "tmc_cluster_group";

    fn identity(config: &Self::Config) -> FullName {
        config.identity()
    }

    fn to_object(config: &Self::Config) -> Result<Self::Object> {
        metadata::to_cluster_group(config)
    }

    fn apply_object(config: &mut Self::Config, object: &Self::Object) -> Result<()> {
        metadata::apply_cluster_group(config, object)
    }

    fn mutable_changed(prior: &Self::Config, proposed: &Self::Config) -> bool {
        prior.mutable_changed(proposed)
    }

    fn resource_version(config: &Self::Config) -> Option<String> {
        config.resource_version.clone()
    }

    fn mark_updated(config: &mut Self::Config, timestamp: String) {
        config.last_updated = Some(timestamp);
    }
}
