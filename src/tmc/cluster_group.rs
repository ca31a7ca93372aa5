//! Cluster groups

use super::client::{ApiObject, TmcClient};
use super::error::Result;
use super::identity::FullName;
use super::meta::{Labels, Metadata};
use serde::{Deserialize, Serialize};

/// A cluster group carries metadata only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterGroup {
    pub full_name: FullName,
    #[serde(default)]
    pub meta: Metadata,
}

impl ClusterGroup {
    /// Whether every entry of `selector` is present with the same value
    pub fn matches_labels(&self, selector: &Labels) -> bool {
        let labels = self.meta.labels.as_ref();
        selector
            .iter()
            .all(|(k, v)| labels.and_then(|l| l.get(k)) == Some(v))
    }
}

impl ApiObject for ClusterGroup {
    const KIND: &'static str = "clusterGroup";

    fn collection_segments(_name: &FullName) -> Vec<String> {
        vec!["clustergroups".to_string()]
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

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClusterGroupList {
    #[serde(default)]
    cluster_groups: Vec<ClusterGroup>,
}

impl TmcClient {
    /// List the cluster groups of the organization carrying all `selector` labels
    pub async fn list_cluster_groups(&self, selector: &Labels) -> Result<Vec<ClusterGroup>> {
        let url = self.api_url(&["clustergroups".to_string()], &[]);
        let body = self.get(&url).await?;

        let list: ClusterGroupList = if body.is_null() {
            ClusterGroupList::default()
        } else {
            serde_json::from_value(body)?
        };

        Ok(list
            .cluster_groups
            .into_iter()
            .filter(|g| g.matches_labels(selector))
            .collect())
    }
}
