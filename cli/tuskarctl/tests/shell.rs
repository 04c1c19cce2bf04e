//! End-to-end CLI tests against a mocked Tuskar service.
//!
//! The binary is driven through `assert_cmd` in token mode, pointed at a
//! `wiremock` server via `TUSKAR_URL`/`OS_AUTH_TOKEN`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AUTH_ENV_VARS: &[&str] = &[
    "OS_USERNAME",
    "OS_PASSWORD",
    "OS_TENANT_ID",
    "OS_TENANT_NAME",
    "OS_AUTH_URL",
    "OS_AUTH_TOKEN",
    "TUSKAR_URL",
    "TUSKAR_API_VERSION",
    "TUSKARCLIENT_DEBUG",
];

fn tuskar() -> Command {
    let mut cmd = Command::cargo_bin("tuskar").expect("binary built");
    for var in AUTH_ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn tuskar_at(server: &MockServer) -> Command {
    let mut cmd = tuskar();
    cmd.env("TUSKAR_URL", server.uri());
    cmd.env("OS_AUTH_TOKEN", "tok");
    cmd
}

#[tokio::test(flavor = "multi_thread")]
async fn plan_create_prints_a_property_table() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/plans"))
        .and(header("X-Auth-Token", "tok"))
        .and(body_json(json!({"name": "myplan", "description": "desc"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "uuid": "u1",
            "name": "myplan",
            "description": "desc",
            "roles": [],
            "parameters": [],
        })))
        .expect(1)
        .mount(&server)
        .await;

    tuskar_at(&server)
        .args(["plan", "create", "myplan", "-d", "desc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("uuid"))
        .stdout(predicate::str::contains("u1"))
        .stdout(predicate::str::contains("myplan"))
        .stdout(predicate::str::contains("desc"));
}

#[tokio::test(flavor = "multi_thread")]
async fn plan_show_suppresses_parameters_without_long() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/plans/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uuid": "u1",
            "name": "myplan",
            "roles": [{"uuid": "r1", "name": "Compute"}],
            "parameters": [{"name": "compute-1::Image", "value": "overcloud-full"}],
        })))
        .mount(&server)
        .await;

    tuskar_at(&server)
        .args(["plan", "show", "u1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Compute"))
        .stdout(predicate::str::contains(
            "Parameter output suppressed. Use --long to display them.",
        ))
        .stdout(predicate::str::contains("overcloud-full").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn plan_show_long_displays_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/plans/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uuid": "u1",
            "name": "myplan",
            "roles": [{"uuid": "r1", "name": "Compute"}],
            "parameters": [{"name": "compute-1::Image", "value": "overcloud-full"}],
        })))
        .mount(&server)
        .await;

    tuskar_at(&server)
        .args(["plan", "show", "u1", "--long"])
        .assert()
        .success()
        .stdout(predicate::str::contains("compute-1::Image=overcloud-full"));
}

#[tokio::test(flavor = "multi_thread")]
async fn plan_show_format_json_prints_the_raw_resource() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/plans/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uuid": "u1",
            "name": "myplan",
            "roles": [],
            "parameters": [{"name": "compute-1::Image", "value": "overcloud-full"}],
        })))
        .mount(&server)
        .await;

    // JSON output carries the full resource, suppression notice included
    // for tables only.
    tuskar_at(&server)
        .args(["plan", "show", "u1", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"uuid\": \"u1\""))
        .stdout(predicate::str::contains("overcloud-full"))
        .stdout(predicate::str::contains("Parameter output suppressed").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn plan_set_with_unknown_role_aborts_before_update() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/plans/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uuid": "u1",
            "name": "myplan",
            "roles": [{"uuid": "r1", "name": "Compute"}],
            "parameters": [],
        })))
        .mount(&server)
        .await;

    // No PATCH mock is mounted: reaching it would fail the command with a
    // connection-level refusal rather than the expected lookup error.
    tuskar_at(&server)
        .args(["plan", "set", "u1", "-F", "Storage=baremetal"])
        .assert()
        .success()
        .stderr(predicate::str::contains("role 'Storage' not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn plan_download_writes_templates_into_nested_directories() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/plans/u1/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "plan.yaml": "heat_template_version: 1",
            "environments/common.yaml": "parameters: {}",
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("templates");
    // Pre-existing contents must be replaced.
    std::fs::create_dir_all(&output_dir).unwrap();
    std::fs::write(output_dir.join("stale.yaml"), "old").unwrap();

    tuskar_at(&server)
        .args(["plan", "download", "u1", "-O"])
        .arg(&output_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "The following templates will be written:",
        ));

    assert_eq!(
        std::fs::read_to_string(output_dir.join("plan.yaml")).unwrap(),
        "heat_template_version: 1"
    );
    assert_eq!(
        std::fs::read_to_string(output_dir.join("environments/common.yaml")).unwrap(),
        "parameters: {}"
    );
    assert!(!output_dir.join("stale.yaml").exists());
}

#[test]
fn missing_username_is_reported_before_any_network_call() {
    tuskar()
        .args(["plan", "list"])
        .assert()
        // Known command errors keep the non-error exit path.
        .success()
        .stderr(predicate::str::contains(
            "You must provide username via either --os-username or env[OS_USERNAME]",
        ));
}

#[test]
fn missing_tenant_is_reported_as_an_alternative() {
    tuskar()
        .args(["plan", "list"])
        .env("OS_USERNAME", "admin")
        .env("OS_PASSWORD", "secret")
        .env("OS_AUTH_URL", "http://keystone:5000/v2.0")
        .assert()
        .success()
        .stderr(predicate::str::contains("--os-tenant-name"))
        .stderr(predicate::str::contains("--os-tenant-id"));
}

#[test]
fn token_mode_without_urls_names_both_flags() {
    tuskar()
        .args(["plan", "list"])
        .env("OS_AUTH_TOKEN", "tok")
        .assert()
        .success()
        .stderr(predicate::str::contains("--tuskar-url"))
        .stderr(predicate::str::contains("--os-auth-url"));
}

#[test]
fn unsupported_api_version_is_a_command_error() {
    tuskar()
        .args(["plan", "list", "--tuskar-api-version", "1"])
        .env("OS_AUTH_TOKEN", "tok")
        .env("TUSKAR_URL", "http://tuskar:8585")
        .assert()
        .success()
        .stderr(predicate::str::contains("Unsupported API version '1'"));
}

#[test]
fn usage_errors_exit_with_code_two() {
    tuskar().arg("plan").assert().code(2);
    tuskar().assert().code(2);
}

#[test]
fn version_subcommand_prints_the_client_version() {
    tuskar()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tuskar"));
}
