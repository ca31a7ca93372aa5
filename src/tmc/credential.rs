//! Account credentials
//!
//! Only AWS data-protection credentials are modelled. They are looked up,
//! never managed, by this provider.

use super::client::{ApiObject, Resources, TmcClient};
use super::identity::FullName;
use super::meta::{Metadata, Status};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialMeta {
    #[serde(default)]
    pub provider: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IamRole {
    #[serde(default)]
    pub arn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsCredential {
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub iam_role: IamRole,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialData {
    #[serde(default)]
    pub aws_credential: AwsCredential,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CredentialSpec {
    #[serde(default)]
    pub meta: CredentialMeta,
    #[serde(default)]
    pub capability: String,
    #[serde(default)]
    pub data: CredentialData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub full_name: FullName,
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub spec: CredentialSpec,
    #[serde(default, skip_serializing)]
    pub status: Status,
}

impl ApiObject for Credential {
    const KIND: &'static str = "credential";

    fn collection_segments(_name: &FullName) -> Vec<String> {
        vec!["account".to_string(), "credentials".to_string()]
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
    pub fn account_credentials(&self) -> Resources<'_, Credential> {
        self.resources()
    }
}
