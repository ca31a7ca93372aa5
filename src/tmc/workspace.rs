//! Workspaces group namespaces across clusters

use super::client::{ApiObject, Resources, TmcClient};
use super::identity::FullName;
use super::meta::Metadata;
use serde::{Deserialize, Serialize};

/// A workspace carries metadata only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub full_name: FullName,
    #[serde(default)]
    pub meta: Metadata,
}

impl ApiObject for Workspace {
    const KIND: &'static str = "workspace";

    fn collection_segments(_name: &FullName) -> Vec<String> {
        vec!["workspaces".to_string()]
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

impl TmcClient {
    pub fn workspaces(&self) -> Resources<'_, Workspace> {
        self.resources()
    }
}
