//! TMC API interaction module
//!
//! This module provides the remote resource client for Tanzu Mission Control:
//! authentication, the HTTP layer, the error taxonomy and one typed accessor
//! per object kind.
//!
//! # Module Structure
//!
//! - [`auth`] - API token exchange and access-token caching
//! - [`client`] - Main TMC client and the generic CRUD accessor
//! - [`http`] - HTTP utilities for REST API calls
//! - [`error`] - Error taxonomy shared with the lifecycle layer
//! - [`identity`] / [`meta`] - `fullName` and `meta` blocks of every object
//! - one module per object kind
//!
//! # Example
//!
//! ```ignore
//! use crate::tmc::client::TmcClient;
//! use crate::tmc::identity::FullName;
//!
//! async fn example(client: &TmcClient) -> crate::tmc::error::Result<()> {
//!     let id = FullName::cluster("c1", "aws-hosted", "my-provisioner");
//!     let cluster = client.clusters().get(&id).await?;
//!     println!("{:?}", cluster.status.phase);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod cluster;
pub mod cluster_group;
pub mod credential;
pub mod error;
pub mod http;
pub mod identity;
pub mod management_cluster;
pub mod meta;
pub mod namespace;
pub mod nodepool;
pub mod scan;
pub mod workspace;
