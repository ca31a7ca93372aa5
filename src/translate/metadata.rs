//! Kinds whose spec is (almost) nothing but metadata: namespaces, workspaces
//! and cluster groups

use super::labels::labels_changed;
use super::{require, validate_name};
use crate::tmc::cluster_group::ClusterGroup;
use crate::tmc::error::Result;
use crate::tmc::identity::FullName;
use crate::tmc::meta::{Labels, Metadata};
use crate::tmc::namespace::{Namespace, NamespaceSpec};
use crate::tmc::workspace::Workspace;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamespaceConfig {
    pub name: String,
    pub cluster_name: String,
    pub management_cluster: String,
    pub provisioner_name: String,
    pub description: String,
    pub labels: Labels,
    pub workspace_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
}

impl NamespaceConfig {
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
        require("workspace_name", &self.workspace_name)
    }
}

pub fn to_namespace(config: &NamespaceConfig) -> Result<Namespace> {
    config.validate()?;

    Ok(Namespace {
        full_name: config.identity(),
        meta: Metadata::declared(&config.description, &config.labels),
        spec: NamespaceSpec {
            workspace_name: config.workspace_name.clone(),
        },
        ..Default::default()
    })
}

pub fn apply_namespace(config: &mut NamespaceConfig, namespace: &Namespace) -> Result<()> {
    config.resource_version = namespace.meta.resource_version.clone();
    config.description = namespace.meta.description_or_default();
    config.labels = namespace.meta.labels_or_default();
    config.workspace_name = namespace.spec.workspace_name.clone();
    Ok(())
}

/// Shared flat shape of workspaces and cluster groups
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataOnlyConfig {
    pub name: String,
    pub description: String,
    pub labels: Labels,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

pub type WorkspaceConfig = MetadataOnlyConfig;
pub type ClusterGroupConfig = MetadataOnlyConfig;

impl MetadataOnlyConfig {
    pub fn identity(&self) -> FullName {
        FullName::named(&self.name)
    }

    pub fn validate(&self) -> Result<()> {
        validate_name("name", &self.name)
    }

    pub fn mutable_changed(&self, other: &Self) -> bool {
        self.description != other.description || labels_changed(&self.labels, &other.labels)
    }

    fn to_meta(&self) -> Metadata {
        let mut meta = Metadata::declared(&self.description, &self.labels);
        meta.resource_version = self.resource_version.clone();
        meta
    }

    fn apply_meta(&mut self, meta: &Metadata) {
        self.resource_version = meta.resource_version.clone();
        self.description = meta.description_or_default();
        self.labels = meta.labels_or_default();
    }
}

pub fn to_workspace(config: &WorkspaceConfig) -> Result<Workspace> {
    config.validate()?;
    Ok(Workspace {
        full_name: config.identity(),
        meta: config.to_meta(),
    })
}

pub fn apply_workspace(config: &mut WorkspaceConfig, workspace: &Workspace) -> Result<()> {
    config.apply_meta(&workspace.meta);
    Ok(())
}

pub fn to_cluster_group(config: &ClusterGroupConfig) -> Result<ClusterGroup> {
    config.validate()?;
    Ok(ClusterGroup {
        full_name: config.identity(),
        meta: config.to_meta(),
    })
}

pub fn apply_cluster_group(config: &mut ClusterGroupConfig, group: &ClusterGroup) -> Result<()> {
    config.apply_meta(&group.meta);
    Ok(())
}
