//! Read-only data sources
//!
//! Lookups by identity reuse the resource kinds. A lookup that finds
//! nothing is an error, not an empty result.

use super::diagnostic::{Diagnostic, Operation};
use super::kinds::{
    AwsClusterKind, AwsNodePoolKind, ClusterGroupKind, ManagementClusterKind, NamespaceKind,
    WorkspaceKind,
};
use super::lifecycle::{Lifecycle, ResourceKind, ResourceState};
use crate::tmc::client::TmcClient;
use crate::tmc::error::TmcError;
use crate::tmc::identity::FullName;
use crate::tmc::meta::Labels;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `tmc_cluster_groups`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterGroupsQuery {
    pub labels: Labels,
    pub names: Vec<String>,
    pub ids: Vec<String>,
}

/// `tmc_aws_data_protection_credential`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialQuery {
    pub name: String,
    pub provider: String,
    pub capability: String,
    pub account_id: String,
    pub iam_role_arn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// `tmc_cluster_admin_kubeconfig`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KubeconfigQuery {
    pub cluster_name: String,
    pub management_cluster: String,
    pub provisioner_name: String,
    pub kubeconfig: String,
}

/// Fresh id for data sources that do not map to a single remote object
fn synthetic_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn parse_query<T: DeserializeOwned>(type_name: &str, query: Value) -> Result<T, Diagnostic> {
    serde_json::from_value(query).map_err(|e| {
        Diagnostic::error(
            format!("Invalid configuration for {}", type_name),
            e.to_string(),
        )
    })
}

fn to_value<T: Serialize>(type_name: &str, state: &T) -> Result<Value, Diagnostic> {
    serde_json::to_value(state).map_err(|e| {
        Diagnostic::error(format!("Failed to encode {}", type_name), e.to_string())
    })
}

async fn lookup<K: ResourceKind>(
    client: &TmcClient,
    type_name: &str,
    query: Value,
) -> Result<Value, Diagnostic> {
    let config: K::Config = parse_query(type_name, query)?;
    let state = Lifecycle::<K>::new(client).lookup(&config).await.map_err(|mut d| {
        d.summary = format!("Failed to read {}", type_name);
        d
    })?;
    to_value(type_name, &state)
}

/// Read the data source `type_name` configured by `query`
pub async fn read_data_source(
    client: &TmcClient,
    type_name: &str,
    query: Value,
) -> Result<Value, Diagnostic> {
    tracing::debug!("read_data_source: type={}", type_name);

    match type_name {
        "tmc_aws_cluster" | "tmc_cluster" => {
            lookup::<AwsClusterKind>(client, type_name, query).await
        }
        "tmc_aws_nodepool" => lookup::<AwsNodePoolKind>(client, type_name, query).await,
        "tmc_namespace" => lookup::<NamespaceKind>(client, type_name, query).await,
        "tmc_management_cluster" => {
            lookup::<ManagementClusterKind>(client, type_name, query).await
        }
        "tmc_workspace" => lookup::<WorkspaceKind>(client, type_name, query).await,
        "tmc_cluster_group" => lookup::<ClusterGroupKind>(client, type_name, query).await,
        "tmc_cluster_groups" => {
            let query: ClusterGroupsQuery = parse_query(type_name, query)?;
            let state = read_cluster_groups(client, query).await?;
            to_value(type_name, &state)
        }
        "tmc_aws_data_protection_credential" => {
            let query: CredentialQuery = parse_query(type_name, query)?;
            let state = read_credential(client, query).await?;
            to_value(type_name, &state)
        }
        "tmc_cluster_admin_kubeconfig" => {
            let query: KubeconfigQuery = parse_query(type_name, query)?;
            let state = read_admin_kubeconfig(client, query).await?;
            to_value(type_name, &state)
        }
        _ => Err(Diagnostic::error("Unknown data source type", type_name)),
    }
}

pub async fn read_cluster_groups(
    client: &TmcClient,
    mut query: ClusterGroupsQuery,
) -> Result<ResourceState<ClusterGroupsQuery>, Diagnostic> {
    let groups = client
        .list_cluster_groups(&query.labels)
        .await
        .map_err(|e| {
            Diagnostic::from_error("tmc_cluster_groups", Operation::Read, "cluster groups", &e)
        })?;

    query.names = groups.iter().map(|g| g.full_name.name.clone()).collect();
    query.ids = groups
        .iter()
        .map(|g| g.meta.uid.clone().unwrap_or_default())
        .collect();

    Ok(ResourceState::new(Some(synthetic_id()), query))
}

pub async fn read_credential(
    client: &TmcClient,
    mut query: CredentialQuery,
) -> Result<ResourceState<CredentialQuery>, Diagnostic> {
    let fail = |e: &TmcError| {
        Diagnostic::from_error(
            "tmc_aws_data_protection_credential",
            Operation::Read,
            &query.name,
            e,
        )
    };

    let credential = client
        .account_credentials()
        .get(&FullName::named(&query.name))
        .await
        .map_err(|e| fail(&e))?;
    let id = credential
        .meta
        .uid
        .clone()
        .ok_or_else(|| fail(&TmcError::decode("credential carries no uid")))?;

    let spec = &credential.spec;
    query.provider = spec.meta.provider.clone();
    query.capability = spec.capability.clone();
    query.account_id = spec.data.aws_credential.account_id.clone();
    query.iam_role_arn = spec.data.aws_credential.iam_role.arn.clone();
    query.status = credential.status.phase.clone();

    Ok(ResourceState::new(Some(id), query))
}

pub async fn read_admin_kubeconfig(
    client: &TmcClient,
    mut query: KubeconfigQuery,
) -> Result<ResourceState<KubeconfigQuery>, Diagnostic> {
    let cluster = FullName::cluster(
        &query.cluster_name,
        &query.management_cluster,
        &query.provisioner_name,
    );

    query.kubeconfig = client.admin_kubeconfig(&cluster).await.map_err(|e| {
        Diagnostic::from_error(
            "tmc_cluster_admin_kubeconfig",
            Operation::Read,
            &cluster.to_string(),
            &e,
        )
    })?;

    Ok(ResourceState::new(Some(synthetic_id()), query))
}
