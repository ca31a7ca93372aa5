//! Cluster inspection scans (`tmc_cluster_scan`)

use super::require;
use crate::tmc::error::{Result, TmcError};
use crate::tmc::identity::FullName;
use crate::tmc::scan::{Scan, ScanSpec};
use serde::{Deserialize, Serialize};
use serde_json::Map;

/// Kind of inspection to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanType {
    Lite,
    Cis,
    Conformance,
}

impl ScanType {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "lite" => Ok(Self::Lite),
            "cis" => Ok(Self::Cis),
            "conformance" => Ok(Self::Conformance),
            other => Err(TmcError::validation(format!(
                "unsupported scan type '{}'. supported scan types are lite, cis and conformance",
                other
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lite => "lite",
            Self::Cis => "cis",
            Self::Conformance => "conformance",
        }
    }

    pub fn to_spec(self) -> ScanSpec {
        let mut spec = ScanSpec::default();
        match self {
            Self::Lite => spec.lite_spec = Some(Map::new()),
            Self::Cis => spec.cis_spec = Some(Map::new()),
            Self::Conformance => spec.conformance_spec = Some(Map::new()),
        }
        spec
    }

    /// Recover the type from whichever spec key the server returned
    pub fn from_spec(spec: &ScanSpec) -> Option<Self> {
        if spec.lite_spec.is_some() {
            Some(Self::Lite)
        } else if spec.cis_spec.is_some() {
            Some(Self::Cis)
        } else if spec.conformance_spec.is_some() {
            Some(Self::Conformance)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Assigned by the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub cluster_name: String,
    pub management_cluster: String,
    pub provisioner_name: String,
    #[serde(rename = "type")]
    pub scan_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
}

impl ScanConfig {
    pub fn identity(&self) -> FullName {
        FullName::in_cluster(
            self.name.as_deref().unwrap_or_default(),
            &self.cluster_name,
            &self.management_cluster,
            &self.provisioner_name,
        )
    }

    pub fn validate(&self) -> Result<()> {
        require("cluster_name", &self.cluster_name)?;
        require("management_cluster", &self.management_cluster)?;
        require("provisioner_name", &self.provisioner_name)?;
        ScanType::parse(&self.scan_type).map(|_| ())
    }
}

pub fn to_scan(config: &ScanConfig) -> Result<Scan> {
    config.validate()?;

    Ok(Scan {
        full_name: config.identity(),
        spec: ScanType::parse(&config.scan_type)?.to_spec(),
        ..Default::default()
    })
}

pub fn apply_scan(config: &mut ScanConfig, scan: &Scan) -> Result<()> {
    if !scan.full_name.name.is_empty() {
        config.name = Some(scan.full_name.name.clone());
    }
    if let Some(kind) = ScanType::from_spec(&scan.spec) {
        config.scan_type = kind.as_str().to_string();
    }
    config.phase = scan.status.phase.clone();
    Ok(())
}
