//! Resource abstraction layer
//!
//! This module maps declared resource configuration onto TMC objects. One
//! generic lifecycle serves every resource kind; the attribute schemas the
//! engine sees are loaded from embedded JSON at compile time.
//!
//! # Architecture
//!
//! - [`registry`] - Loads and caches attribute schemas from embedded JSON
//! - [`lifecycle`] - Generic create/read/update/delete over a [`ResourceKind`]
//! - [`kinds`] - One [`ResourceKind`] per engine-facing type name
//! - [`plan`] - Replace vs. in-place classification of changes
//! - [`data_source`] - Read-only lookups
//! - [`dispatch`] - Maps type names and operations to the typed lifecycle
//!
//! # Resource Definitions
//!
//! Schemas live in `src/resources/provider.json`: provider settings,
//! resources and data sources, each attribute flagged required, optional,
//! computed, force_new or sensitive.
//!
//! # Example
//!
//! ```ignore
//! use crate::resource::{kinds::WorkspaceKind, Lifecycle};
//! use crate::translate::metadata::WorkspaceConfig;
//!
//! async fn ensure_workspace(client: &TmcClient) -> Result<(), Diagnostic> {
//!     let planned = WorkspaceConfig { name: "platform".into(), ..Default::default() };
//!     let state = Lifecycle::<WorkspaceKind>::new(client).create(&planned).await?;
//!     println!("created {:?}", state.id);
//!     Ok(())
//! }
//! ```

pub mod data_source;
pub mod diagnostic;
pub mod dispatch;
pub mod kinds;
pub mod lifecycle;
pub mod plan;
pub mod registry;

pub use diagnostic::{Diagnostic, Operation, Severity};
pub use dispatch::{dispatch, dispatch_data_source, plan_resource, Request, Response};
pub use lifecycle::{Lifecycle, ResourceKind, ResourceState};
pub use registry::{get_data_source, get_registry, get_resource};
