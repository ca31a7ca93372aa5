//! End-to-end lifecycle tests through the request dispatcher
//!
//! Each test drives `dispatch` with engine-shaped JSON documents against a
//! wiremock TMC and checks both the resulting state and what went over the
//! wire.

use serde_json::{json, Value};
use std::time::Duration;
use tmc_provider::resource::{dispatch, dispatch_data_source, Operation, Request, Severity};
use tmc_provider::tmc::auth::TmcCredentials;
use tmc_provider::tmc::client::TmcClient;
use tmc_provider::tmc::error::ErrorCode;
use tmc_provider::tmc::http::TmcHttpClient;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, Respond, ResponseTemplate};

fn client(server: &MockServer) -> TmcClient {
    TmcClient::new(
        &server.uri(),
        TmcCredentials::access_token("test-token"),
        TmcHttpClient::new(Duration::from_secs(5)).unwrap(),
    )
    .unwrap()
}

/// Answers with the request body, stamped with server-owned metadata
struct Echo {
    kind: &'static str,
    uid: &'static str,
    version: &'static str,
}

impl Respond for Echo {
    fn respond(&self, request: &wiremock::Request) -> ResponseTemplate {
        let mut body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        if let Some(object) = body.get_mut(self.kind) {
            object["meta"]["uid"] = json!(self.uid);
            object["meta"]["resourceVersion"] = json!(self.version);
            object["meta"]["labels"]["tmc.cloud.vmware.com/creator"] = json!("someone");
        }
        ResponseTemplate::new(200).set_body_json(body)
    }
}

fn aws_config(zones: &[&str]) -> Value {
    json!({
        "name": "c1",
        "management_cluster": "aws-hosted",
        "provisioner_name": "prov",
        "cluster_group": "default",
        "description": "dev cluster",
        "labels": {"team": "platform"},
        "region": "us-west-2",
        "version": "1.21.2-1-amazon2",
        "credential_name": "aws-cred",
        "availability_zones": zones,
        "instance_type": "m5.large",
        "vpc_cidrblock": "10.0.0.0/16",
        "ssh_key": "ops"
    })
}

fn aws_state(id: &str, version: Option<&str>) -> Value {
    let mut state = aws_config(&["us-west-2a"]);
    state["id"] = json!(id);
    state["pod_cidrblock"] = json!("192.168.0.0/16");
    state["service_cidrblock"] = json!("10.96.0.0/12");
    if let Some(version) = version {
        state["resource_version"] = json!(version);
    }
    state
}

fn request(type_name: &str, prior: Option<Value>, config: Option<Value>) -> Request {
    Request {
        type_name: type_name.to_string(),
        prior,
        config,
    }
}

async fn sent_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| !r.body.is_empty())
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

/// Test module for cluster creation
mod create_tests {
    use super::*;

    #[tokio::test]
    async fn test_single_zone_cluster_gets_default_cidrs_without_ha() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1alpha1/clusters"))
            .respond_with(Echo {
                kind: "cluster",
                uid: "c:01",
                version: "1",
            })
            .expect(1)
            .mount(&server)
            .await;

        let response = dispatch(
            &client(&server),
            Operation::Create,
            request("tmc_aws_cluster", None, Some(aws_config(&["us-west-2a"]))),
        )
        .await;

        assert!(!response.has_errors(), "{:?}", response.diagnostics);
        let state = response.state.unwrap();
        assert_eq!(state["id"], "c:01");
        assert_eq!(state["resource_version"], "1");
        assert_eq!(state["pod_cidrblock"], "192.168.0.0/16");
        assert_eq!(state["service_cidrblock"], "10.96.0.0/12");

        let body = &sent_bodies(&server).await[0];
        let aws = &body["cluster"]["spec"]["tkgAws"];
        assert_eq!(body["cluster"]["spec"]["clusterGroupName"], "default");
        assert_eq!(
            aws["settings"]["network"]["cluster"]["pods"][0]["cidrBlocks"],
            "192.168.0.0/16"
        );
        assert_eq!(
            aws["topology"]["controlPlane"]["availabilityZones"],
            json!(["us-west-2a"])
        );
        assert!(aws["topology"]["controlPlane"].get("highAvailability").is_none());
        assert!(body["cluster"]["meta"].get("uid").is_none());
    }

    #[tokio::test]
    async fn test_three_zone_cluster_is_highly_available() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1alpha1/clusters"))
            .and(body_partial_json(json!({
                "cluster": {"spec": {"tkgAws": {"topology": {"controlPlane": {"highAvailability": true}}}}}
            })))
            .respond_with(Echo {
                kind: "cluster",
                uid: "c:02",
                version: "1",
            })
            .expect(1)
            .mount(&server)
            .await;

        let response = dispatch(
            &client(&server),
            Operation::Create,
            request(
                "tmc_aws_cluster",
                None,
                Some(aws_config(&["us-west-2a", "us-west-2b", "us-west-2c"])),
            ),
        )
        .await;

        assert!(!response.has_errors(), "{:?}", response.diagnostics);
        assert_eq!(response.state.unwrap()["id"], "c:02");
    }

    #[tokio::test]
    async fn test_two_zones_fail_before_any_request() {
        let server = MockServer::start().await;

        let response = dispatch(
            &client(&server),
            Operation::Create,
            request(
                "tmc_aws_cluster",
                None,
                Some(aws_config(&["us-west-2a", "us-west-2b"])),
            ),
        )
        .await;

        assert!(response.has_errors());
        assert_eq!(response.diagnostics[0].code, Some(ErrorCode::Validation));
        assert_eq!(response.diagnostics[0].summary, "Failed to create tmc_aws_cluster");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_required_attribute_fails_before_any_request() {
        let server = MockServer::start().await;

        let mut config = aws_config(&["us-west-2a"]);
        config["ssh_key"] = json!("");

        let response = dispatch(
            &client(&server),
            Operation::Create,
            request("tmc_aws_cluster", None, Some(config)),
        )
        .await;

        assert!(response.has_errors());
        assert!(response.diagnostics[0].detail.contains("ssh_key"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scan_id_is_server_assigned_name() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1alpha1/clusters/c1/inspection/scans"))
            .and(query_param("fullName.managementClusterName", "attached"))
            .and(body_partial_json(json!({"scan": {"spec": {"liteSpec": {}}}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "scan": {
                    "fullName": {"clusterName": "c1", "name": "scan-7f2c"},
                    "spec": {"liteSpec": {}},
                    "status": {"phase": "PENDING"}
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = dispatch(
            &client(&server),
            Operation::Create,
            request(
                "tmc_cluster_scan",
                None,
                Some(json!({
                    "cluster_name": "c1",
                    "management_cluster": "attached",
                    "provisioner_name": "attached",
                    "type": "lite"
                })),
            ),
        )
        .await;

        assert!(!response.has_errors(), "{:?}", response.diagnostics);
        let state = response.state.unwrap();
        assert_eq!(state["id"], "scan-7f2c");
        assert_eq!(state["name"], "scan-7f2c");
        assert_eq!(state["phase"], "PENDING");
    }

    #[tokio::test]
    async fn test_unknown_type_is_error() {
        let server = MockServer::start().await;
        let response = dispatch(
            &client(&server),
            Operation::Create,
            request("tmc_gke_cluster", None, Some(json!({}))),
        )
        .await;
        assert!(response.has_errors());
        assert_eq!(response.diagnostics[0].summary, "Unknown resource type");
    }
}

/// Test module for read and delete
mod read_delete_tests {
    use super::*;

    #[tokio::test]
    async fn test_read_of_vanished_cluster_clears_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1alpha1/clusters/c1"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"code": 5})))
            .expect(1)
            .mount(&server)
            .await;

        let response = dispatch(
            &client(&server),
            Operation::Read,
            request("tmc_aws_cluster", Some(aws_state("c:01", Some("3"))), None),
        )
        .await;

        assert!(!response.has_errors());
        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics[0].severity, Severity::Warning);
        let state = response.state.unwrap();
        assert!(state.get("id").is_none());
        assert_eq!(state["name"], "c1");
    }

    #[tokio::test]
    async fn test_read_absorbs_remote_changes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1alpha1/clusters/c1"))
            .and(query_param("fullName.provisionerName", "prov"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cluster": {
                    "fullName": {"managementClusterName": "aws-hosted", "provisionerName": "prov", "name": "c1"},
                    "meta": {
                        "uid": "c:01",
                        "resourceVersion": "9",
                        "description": "changed in the console",
                        "labels": {"team": "platform", "tmc.cloud.vmware.com/creator": "someone"}
                    },
                    "spec": {
                        "clusterGroupName": "default",
                        "tkgAws": {
                            "distribution": {"provisionerCredentialName": "aws-cred", "region": "us-west-2", "version": "1.21.2-1-amazon2"},
                            "settings": {
                                "network": {
                                    "cluster": {"pods": [{"cidrBlocks": "172.20.0.0/16"}], "services": [{"cidrBlocks": "10.96.0.0/12"}]},
                                    "provider": {"vpc": {"cidrBlock": "10.0.0.0/16"}}
                                },
                                "security": {"sshKey": "ops"}
                            },
                            "topology": {"controlPlane": {"availabilityZones": ["us-west-2a"], "instanceType": "m5.xlarge"}}
                        }
                    }
                }
            })))
            .mount(&server)
            .await;

        let response = dispatch(
            &client(&server),
            Operation::Read,
            request("tmc_aws_cluster", Some(aws_state("c:01", Some("3"))), None),
        )
        .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        let state = response.state.unwrap();
        assert_eq!(state["id"], "c:01");
        assert_eq!(state["resource_version"], "9");
        assert_eq!(state["description"], "changed in the console");
        assert_eq!(state["instance_type"], "m5.xlarge");
        assert_eq!(state["pod_cidrblock"], "172.20.0.0/16");
    }

    #[tokio::test]
    async fn test_delete_of_missing_object_succeeds() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/v1alpha1/workspaces/ws"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let response = dispatch(
            &client(&server),
            Operation::Delete,
            request("tmc_workspace", Some(json!({"id": "ws:01", "name": "ws"})), None),
        )
        .await;

        assert!(!response.has_errors());
        assert!(response.state.unwrap().get("id").is_none());
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_diagnostic() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/v1alpha1/workspaces/ws"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "denied"})))
            .mount(&server)
            .await;

        let response = dispatch(
            &client(&server),
            Operation::Delete,
            request("tmc_workspace", Some(json!({"id": "ws:01", "name": "ws"})), None),
        )
        .await;

        assert!(response.has_errors());
        assert_eq!(response.diagnostics[0].code, Some(ErrorCode::Forbidden));
        assert!(response.state.is_none());
    }
}

/// Test module for in-place updates
mod update_tests {
    use super::*;

    #[tokio::test]
    async fn test_no_mutable_change_sends_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let prior = aws_state("c:01", Some("3"));
        let mut planned = prior.clone();
        planned["labels"]["tmc.cloud.vmware.com/creator"] = json!("someone");

        let response = dispatch(
            &client(&server),
            Operation::Update,
            request("tmc_aws_cluster", Some(prior.clone()), Some(planned)),
        )
        .await;

        assert!(!response.has_errors());
        assert_eq!(response.state.unwrap(), prior);
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_version_is_fetched_before_put() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1alpha1/clusters/c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cluster": {
                    "fullName": {"name": "c1"},
                    "meta": {"uid": "c:01", "resourceVersion": "5"},
                    "spec": {"clusterGroupName": "default"}
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("PUT"))
            .and(path("/v1alpha1/clusters/c1"))
            .and(query_param("fullName.managementClusterName", "aws-hosted"))
            .and(body_partial_json(json!({
                "cluster": {"meta": {"resourceVersion": "5", "description": "now in prod"}}
            })))
            .respond_with(Echo {
                kind: "cluster",
                uid: "c:01",
                version: "6",
            })
            .expect(1)
            .mount(&server)
            .await;

        let prior = aws_state("c:01", None);
        let mut planned = prior.clone();
        planned["description"] = json!("now in prod");

        let response = dispatch(
            &client(&server),
            Operation::Update,
            request("tmc_aws_cluster", Some(prior), Some(planned)),
        )
        .await;

        assert!(!response.has_errors(), "{:?}", response.diagnostics);
        let state = response.state.unwrap();
        assert_eq!(state["resource_version"], "6");
        assert_eq!(state["description"], "now in prod");
        assert!(state["last_updated"].is_string());
    }

    #[tokio::test]
    async fn test_stale_version_is_conflict() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/v1alpha1/workspaces/ws"))
            .and(body_partial_json(json!({"workspace": {"meta": {"resourceVersion": "2"}}})))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(json!({"message": "object has been modified"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let prior = json!({"id": "ws:01", "name": "ws", "resource_version": "2"});
        let planned = json!({"name": "ws", "labels": {"env": "prod"}});

        let response = dispatch(
            &client(&server),
            Operation::Update,
            request("tmc_workspace", Some(prior), Some(planned)),
        )
        .await;

        assert!(response.has_errors());
        let diagnostic = &response.diagnostics[0];
        assert_eq!(diagnostic.code, Some(ErrorCode::Conflict));
        assert_eq!(diagnostic.summary, "Failed to update tmc_workspace");
        assert!(diagnostic.detail.contains("object has been modified"));
        assert!(response.state.is_none());
    }

    #[tokio::test]
    async fn test_nodepool_scale_is_in_place() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/v1alpha1/clusters/c1/nodepools/np1"))
            .and(body_partial_json(json!({"nodepool": {"spec": {"workerNodeCount": "5"}}})))
            .respond_with(Echo {
                kind: "nodepool",
                uid: "np:01",
                version: "4",
            })
            .expect(1)
            .mount(&server)
            .await;

        let prior = json!({
            "id": "np:01",
            "name": "np1",
            "cluster_name": "c1",
            "management_cluster": "aws-hosted",
            "provisioner_name": "prov",
            "worker_node_count": 3,
            "availability_zone": "us-west-2a",
            "instance_type": "m5.large",
            "version": "1.21.2-1-amazon2",
            "resource_version": "3"
        });
        let mut planned = prior.clone();
        planned["worker_node_count"] = json!(5);

        let response = dispatch(
            &client(&server),
            Operation::Update,
            request("tmc_aws_nodepool", Some(prior), Some(planned)),
        )
        .await;

        assert!(!response.has_errors(), "{:?}", response.diagnostics);
        let state = response.state.unwrap();
        assert_eq!(state["worker_node_count"], 5);
        assert_eq!(state["resource_version"], "4");
    }
}

/// Test module for data sources
mod data_source_tests {
    use super::*;

    #[tokio::test]
    async fn test_query_without_scope_sends_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(0)
            .mount(&server)
            .await;

        let response = dispatch_data_source(
            &client(&server),
            request("tmc_aws_nodepool", None, Some(json!({"name": "np1"}))),
        )
        .await;

        assert!(response.state.is_none());
        let diagnostic = &response.diagnostics[0];
        assert_eq!(diagnostic.code, Some(ErrorCode::Validation));
        assert_eq!(diagnostic.summary, "Invalid configuration for tmc_aws_nodepool");
        assert!(diagnostic.detail.contains("cluster_name"));
        assert!(diagnostic.detail.contains("management_cluster"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_aws_cluster_lookup_is_flat() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1alpha1/clusters/c1"))
            .and(query_param("fullName.managementClusterName", "aws-hosted"))
            .and(query_param("fullName.provisionerName", "prov"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cluster": {
                    "fullName": {
                        "managementClusterName": "aws-hosted",
                        "provisionerName": "prov",
                        "name": "c1"
                    },
                    "meta": {"uid": "c:01", "resourceVersion": "2"},
                    "spec": {
                        "clusterGroupName": "default",
                        "tkgAws": {
                            "distribution": {
                                "region": "us-east-1",
                                "version": "1.21",
                                "provisionerCredentialName": "cred"
                            },
                            "topology": {
                                "controlPlane": {
                                    "availabilityZones": ["us-east-1a"],
                                    "instanceType": "m5.large"
                                }
                            }
                        }
                    }
                }
            })))
            .expect(2)
            .mount(&server)
            .await;

        let query = json!({
            "name": "c1",
            "management_cluster": "aws-hosted",
            "provisioner_name": "prov"
        });
        for type_name in ["tmc_aws_cluster", "tmc_cluster"] {
            let response = dispatch_data_source(
                &client(&server),
                request(type_name, None, Some(query.clone())),
            )
            .await;

            assert!(!response.has_errors(), "{:?}", response.diagnostics);
            let state = response.state.unwrap();
            assert_eq!(state["id"], "c:01");
            assert_eq!(state["cluster_group"], "default");
            assert_eq!(state["region"], "us-east-1");
            assert_eq!(state["credential_name"], "cred");
            assert_eq!(state["availability_zones"], json!(["us-east-1a"]));
        }
    }

    #[tokio::test]
    async fn test_lookup_of_missing_object_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1alpha1/workspaces/ghost"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let response = dispatch_data_source(
            &client(&server),
            request("tmc_workspace", None, Some(json!({"name": "ghost"}))),
        )
        .await;

        assert!(response.has_errors());
        assert_eq!(response.diagnostics[0].code, Some(ErrorCode::NotFound));
        assert_eq!(response.diagnostics[0].summary, "Failed to read tmc_workspace");
    }

    #[tokio::test]
    async fn test_management_cluster_provider_type_uses_short_name() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1alpha1/managementclusters/mc1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "managementCluster": {
                    "fullName": {"name": "mc1"},
                    "meta": {"uid": "mc:01"},
                    "spec": {"kubernetesProviderType": "VMWARE_TANZU_KUBERNETES_GRID_SERVICE", "defaultClusterGroup": "default"},
                    "status": {"registrationUrl": "https://example.invalid/register"}
                }
            })))
            .mount(&server)
            .await;

        let response = dispatch_data_source(
            &client(&server),
            request("tmc_management_cluster", None, Some(json!({"name": "mc1"}))),
        )
        .await;

        assert!(!response.has_errors(), "{:?}", response.diagnostics);
        let state = response.state.unwrap();
        assert_eq!(state["id"], "mc:01");
        assert_eq!(state["kubernetes_provider_type"], "tkgservice");
        assert_eq!(state["default_cluster_group"], "default");
        assert_eq!(state["registration_url"], "https://example.invalid/register");
    }

    #[tokio::test]
    async fn test_cluster_groups_filtered_by_labels() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1alpha1/clustergroups"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "clusterGroups": [
                    {"fullName": {"name": "prod-a"}, "meta": {"uid": "cg:1", "labels": {"env": "prod", "team": "a"}}},
                    {"fullName": {"name": "dev-a"}, "meta": {"uid": "cg:2", "labels": {"env": "dev"}}},
                    {"fullName": {"name": "prod-b"}, "meta": {"uid": "cg:3", "labels": {"env": "prod"}}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = dispatch_data_source(
            &client(&server),
            request("tmc_cluster_groups", None, Some(json!({"labels": {"env": "prod"}}))),
        )
        .await;

        assert!(!response.has_errors(), "{:?}", response.diagnostics);
        let state = response.state.unwrap();
        assert_eq!(state["names"], json!(["prod-a", "prod-b"]));
        assert_eq!(state["ids"], json!(["cg:1", "cg:3"]));
        assert!(uuid::Uuid::parse_str(state["id"].as_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_data_protection_credential() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1alpha1/account/credentials/dp-cred"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "credential": {
                    "fullName": {"name": "dp-cred"},
                    "meta": {"uid": "cred:01"},
                    "spec": {
                        "meta": {"provider": "AWS_EC2"},
                        "capability": "DATA_PROTECTION",
                        "data": {"awsCredential": {"accountId": "123456789012", "iamRole": {"arn": "arn:aws:iam::123456789012:role/dp"}}}
                    },
                    "status": {"phase": "VALID"}
                }
            })))
            .mount(&server)
            .await;

        let response = dispatch_data_source(
            &client(&server),
            request(
                "tmc_aws_data_protection_credential",
                None,
                Some(json!({"name": "dp-cred"})),
            ),
        )
        .await;

        assert!(!response.has_errors(), "{:?}", response.diagnostics);
        let state = response.state.unwrap();
        assert_eq!(state["id"], "cred:01");
        assert_eq!(state["capability"], "DATA_PROTECTION");
        assert_eq!(state["account_id"], "123456789012");
        assert_eq!(state["iam_role_arn"], "arn:aws:iam::123456789012:role/dp");
        assert_eq!(state["status"], "VALID");
    }
}
