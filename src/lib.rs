//! Declarative provider for Tanzu Mission Control
//!
//! Reconciles declared clusters, node pools, namespaces, management clusters,
//! workspaces, cluster groups and scans against the TMC REST API.
//!
//! - [`tmc`] - remote resource client
//! - [`translate`] - flat configuration to nested wire records and back
//! - [`resource`] - generic lifecycle, schemas and request dispatch
//! - [`config`] - provider settings and client construction

pub mod config;
pub mod resource;
pub mod tmc;
pub mod translate;

/// Version injected at compile time via TMC_PROVIDER_VERSION env var (set by
/// CI/CD), or "dev" for local builds.
pub const VERSION: &str = match option_env!("TMC_PROVIDER_VERSION") {
    Some(v) => v,
    None => "dev",
};
