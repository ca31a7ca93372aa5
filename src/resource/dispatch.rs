//! Request Dispatch
//!
//! Maps engine requests (type name + operation + JSON documents) onto the
//! typed lifecycle of the matching resource kind.

use super::data_source;
use super::diagnostic::{Diagnostic, Operation, Severity};
use super::kinds::{
    AwsClusterKind, AwsNodePoolKind, ClusterGroupKind, ManagementClusterKind, NamespaceKind,
    ScanKind, VsphereClusterKind, WorkspaceKind,
};
use super::lifecycle::{Lifecycle, ResourceKind, ResourceState};
use super::plan::{self, Plan};
use super::registry::{self, SchemaDef};
use crate::tmc::client::TmcClient;
use crate::tmc::error::ErrorCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One engine request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Request {
    pub type_name: String,
    /// Prior state (read, update, delete, plan)
    #[serde(default)]
    pub prior: Option<Value>,
    /// Planned or proposed configuration (create, update, plan, data source query)
    #[serde(default)]
    pub config: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Response {
    fn state(state: Value) -> Self {
        Self {
            state: Some(state),
            ..Default::default()
        }
    }

    fn failed(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
            ..Default::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

fn document(type_name: &str, what: &str, value: Option<Value>) -> Result<Value, Diagnostic> {
    value.ok_or_else(|| {
        Diagnostic::error(
            format!("Missing {} for {}", what, type_name),
            format!("the request does not carry a '{}' document", what),
        )
    })
}

fn parse<T: DeserializeOwned>(type_name: &str, value: Value) -> Result<T, Diagnostic> {
    serde_json::from_value(value).map_err(|e| {
        Diagnostic::error(format!("Invalid document for {}", type_name), e.to_string())
    })
}

fn encode<T: Serialize>(type_name: &str, value: &T) -> Result<Value, Diagnostic> {
    serde_json::to_value(value)
        .map_err(|e| Diagnostic::error(format!("Failed to encode {}", type_name), e.to_string()))
}

/// Reject `config` before any request when it breaks the attribute schema
fn check_config(
    type_name: &str,
    schema: Option<&SchemaDef>,
    config: &Value,
) -> Result<(), Diagnostic> {
    let Some(schema) = schema else {
        return Ok(());
    };

    let mut problems = Vec::new();
    let missing = schema.missing_required(config);
    if !missing.is_empty() {
        problems.push(format!("missing required attributes: {}", missing.join(", ")));
    }
    problems.extend(schema.out_of_bounds(config));
    if problems.is_empty() {
        return Ok(());
    }

    let mut diagnostic = Diagnostic::error(
        format!("Invalid configuration for {}", type_name),
        problems.join("; "),
    );
    diagnostic.code = Some(ErrorCode::Validation);
    Err(diagnostic)
}

async fn run<K: ResourceKind>(
    client: &TmcClient,
    op: Operation,
    request: Request,
) -> Result<Response, Diagnostic> {
    let type_name = K::TYPE_NAME;
    let lifecycle = Lifecycle::<K>::new(client);

    match op {
        Operation::Create => {
            let config = document(type_name, "config", request.config)?;
            check_config(type_name, registry::get_resource(type_name), &config)?;
            let planned: K::Config = parse(type_name, config)?;
            let state = lifecycle.create(&planned).await?;
            Ok(Response::state(encode(type_name, &state)?))
        }
        Operation::Read => {
            let prior: ResourceState<K::Config> =
                parse(type_name, document(type_name, "prior", request.prior)?)?;
            let state = lifecycle.read(&prior).await?;

            let mut response = Response::state(encode(type_name, &state)?);
            if prior.exists() && !state.exists() {
                response.diagnostics.push(Diagnostic {
                    severity: Severity::Warning,
                    summary: format!("{} no longer exists", type_name),
                    detail: format!(
                        "{} was removed outside of this provider and has been dropped from state",
                        K::identity(&state.config)
                    ),
                    code: Some(ErrorCode::NotFound),
                });
            }
            Ok(response)
        }
        Operation::Update => {
            let prior: ResourceState<K::Config> =
                parse(type_name, document(type_name, "prior", request.prior)?)?;
            let config = document(type_name, "config", request.config)?;
            check_config(type_name, registry::get_resource(type_name), &config)?;
            let planned: K::Config = parse(type_name, config)?;
            let state = lifecycle.update(&prior, &planned).await?;
            Ok(Response::state(encode(type_name, &state)?))
        }
        Operation::Delete => {
            let prior: ResourceState<K::Config> =
                parse(type_name, document(type_name, "prior", request.prior)?)?;
            let state = lifecycle.delete(&prior).await?;
            Ok(Response::state(encode(type_name, &state)?))
        }
        Operation::Plan => plan_request(request),
    }
}

fn plan_request(request: Request) -> Result<Response, Diagnostic> {
    let prior = request.prior.unwrap_or(Value::Null);
    let proposed = document(&request.type_name, "config", request.config)?;
    let plan = plan::plan(&request.type_name, &prior, &proposed)?;
    Ok(Response {
        plan: Some(plan),
        ..Default::default()
    })
}

/// Plan a change without contacting TMC
pub fn plan_resource(request: Request) -> Response {
    plan_request(request).unwrap_or_else(Response::failed)
}

/// Execute `op` for the resource named in `request`
pub async fn dispatch(client: &TmcClient, op: Operation, request: Request) -> Response {
    tracing::debug!("dispatch: type={}, op={}", request.type_name, op.verb());

    let result = match request.type_name.as_str() {
        "tmc_aws_cluster" => run::<AwsClusterKind>(client, op, request).await,
        "tmc_vsphere_cluster" => run::<VsphereClusterKind>(client, op, request).await,
        "tmc_aws_nodepool" => run::<AwsNodePoolKind>(client, op, request).await,
        "tmc_namespace" => run::<NamespaceKind>(client, op, request).await,
        "tmc_management_cluster" => run::<ManagementClusterKind>(client, op, request).await,
        "tmc_cluster_scan" => run::<ScanKind>(client, op, request).await,
        "tmc_workspace" => run::<WorkspaceKind>(client, op, request).await,
        "tmc_cluster_group" => run::<ClusterGroupKind>(client, op, request).await,
        other => Err(Diagnostic::error("Unknown resource type", other)),
    };

    result.unwrap_or_else(Response::failed)
}

/// Read the data source named in `request`
pub async fn dispatch_data_source(client: &TmcClient, request: Request) -> Response {
    let type_name = request.type_name.as_str();
    let query = request.config.unwrap_or_else(|| Value::Object(Default::default()));
    if let Err(diagnostic) = check_config(type_name, registry::get_data_source(type_name), &query) {
        return Response::failed(diagnostic);
    }

    match data_source::read_data_source(client, type_name, query).await {
        Ok(state) => Response::state(state),
        Err(diagnostic) => Response::failed(diagnostic),
    }
}
