//! Management clusters (`tmc_management_cluster`)

use super::{require, validate_name};
use crate::tmc::error::{Result, TmcError};
use crate::tmc::identity::FullName;
use crate::tmc::management_cluster::{
    KubernetesProviderType, ManagementCluster, ManagementClusterSpec,
};
use crate::tmc::meta::{Labels, Metadata};
use serde::{Deserialize, Serialize};

/// Short names accepted in configuration
const PROVIDER_TYPES: &[(&str, KubernetesProviderType)] = &[
    ("tkg", KubernetesProviderType::Tkg),
    ("tkgservice", KubernetesProviderType::TkgService),
    ("tkghosted", KubernetesProviderType::TkgHosted),
    ("other", KubernetesProviderType::Unspecified),
];

/// Configured short name to provider type
pub fn parse_provider_type(short: &str) -> Result<KubernetesProviderType> {
    PROVIDER_TYPES
        .iter()
        .find(|(name, _)| *name == short)
        .map(|(_, kind)| *kind)
        .ok_or_else(|| {
            TmcError::validation(format!(
                "invalid kubernetes_provider_type '{}'. it can be one of tkg, tkgservice, tkghosted or other",
                short
            ))
        })
}

/// Provider type back to its configured short name
pub fn provider_type_name(kind: KubernetesProviderType) -> &'static str {
    match kind {
        KubernetesProviderType::Tkg => "tkg",
        KubernetesProviderType::TkgService => "tkgservice",
        KubernetesProviderType::TkgHosted => "tkghosted",
        KubernetesProviderType::Unspecified => "other",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagementClusterConfig {
    pub name: String,
    pub description: String,
    pub labels: Labels,
    pub kubernetes_provider_type: String,
    pub default_cluster_group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
}

impl ManagementClusterConfig {
    pub fn identity(&self) -> FullName {
        FullName::named(&self.name)
    }

    pub fn validate(&self) -> Result<()> {
        validate_name("name", &self.name)?;
        require("default_cluster_group", &self.default_cluster_group)?;
        parse_provider_type(&self.kubernetes_provider_type).map(|_| ())
    }
}

pub fn to_management_cluster(config: &ManagementClusterConfig) -> Result<ManagementCluster> {
    config.validate()?;

    Ok(ManagementCluster {
        full_name: config.identity(),
        meta: Metadata::declared(&config.description, &config.labels),
        spec: ManagementClusterSpec {
            kubernetes_provider_type: parse_provider_type(&config.kubernetes_provider_type)?,
            default_cluster_group: config.default_cluster_group.clone(),
        },
        ..Default::default()
    })
}

pub fn apply_management_cluster(
    config: &mut ManagementClusterConfig,
    cluster: &ManagementCluster,
) -> Result<()> {
    config.resource_version = cluster.meta.resource_version.clone();
    config.description = cluster.meta.description_or_default();
    config.labels = cluster.meta.labels_or_default();
    config.kubernetes_provider_type =
        provider_type_name(cluster.spec.kubernetes_provider_type).to_string();
    config.default_cluster_group = cluster.spec.default_cluster_group.clone();
    config.registration_url = cluster.status.registration_url.clone();
    Ok(())
}
