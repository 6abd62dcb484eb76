//! End-to-end tests for the `sapcli gcts` commands.
//!
//! Each test runs the binary against a scripted local HTTP server and checks
//! stdout, stderr, the exit status and the requests the server received.

#[allow(dead_code)]
mod common;
use common::prelude::*;
use common::CSRF_TOKEN;

const URL: &str = "https://github.com/org/demo.git";

fn already_exists() -> serde_json::Value {
    json!({
        "errorLog": [{"message": "Repository already exists"}],
        "log": [{"message": "20200923111743: Error action CREATE_REPOSITORY Repository already exists"}],
        "exception": "Cannot create"
    })
}

#[test]
fn test_gcts_help() {
    let mut cmd = cargo_bin_cmd!("sapcli");
    cmd.arg("gcts")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("repolist"))
        .stdout(predicate::str::contains("clone"))
        .stdout(predicate::str::contains("checkout"))
        .stdout(predicate::str::contains("commit"));
}

#[test]
fn test_config_without_list_is_rejected() {
    let mut cmd = cargo_bin_cmd!("sapcli");
    cmd.args(["gcts", "config", "demo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid command line options"))
        .stderr(predicate::str::contains("sapcli gcts config --help"));
}

#[test]
fn test_missing_host() {
    let mut cmd = cargo_bin_cmd!("sapcli");
    cmd.env_remove("SAP_ASHOST")
        .args(["gcts", "repolist"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No application server host given"));
}

#[test]
fn test_repolist() {
    let server = TestServer::start();
    server.json(
        "GET",
        "repository",
        200,
        json!({"result": [
            {"name": "demo", "branch": "main", "currentCommit": "abc123",
             "status": "READY", "vsid": "6IT", "url": URL},
            {"name": "other", "branch": "dev", "currentCommit": "def456",
             "status": "CREATED", "vsid": "6IT", "url": "https://example.com/other.git"}
        ]}),
    );

    server
        .sapcli()
        .args(["gcts", "repolist"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Name  | Branch | Commit | Status  | vSID | URL"))
        .stdout(predicate::str::contains("demo  | main   | abc123 | READY   | 6IT  | https://github.com/org/demo.git"))
        .stdout(predicate::str::contains("other | dev    | def456 | CREATED | 6IT  | https://example.com/other.git"));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query, "sap-client=001");
    assert_eq!(requests[0].header("accept"), Some("application/json"));
    assert!(requests[0].header("authorization").unwrap().starts_with("Basic "));
}

#[test]
fn test_clone() {
    let server = TestServer::start();
    server
        .json(
            "POST",
            "repository",
            200,
            json!({"repository": {"name": "demo", "status": "CREATED"}}),
        )
        .json("POST", "repository/demo/clone", 200, json!({"result": {}}))
        .json(
            "GET",
            "repository/demo",
            200,
            json!({"result": {"name": "demo", "status": "READY", "branch": "main",
                              "currentCommit": "abc123", "url": URL}}),
        );

    server
        .sapcli()
        .args(["gcts", "clone", URL, "--vcs-token", "ghp_secret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cloned repository:"))
        .stdout(predicate::str::contains(" URL   : https://github.com/org/demo.git"))
        .stdout(predicate::str::contains(" branch: main"))
        .stdout(predicate::str::contains(" HEAD  : abc123"));

    let requests = server.requests();
    let create = &requests[0];
    assert_eq!(create.path, "repository");
    assert_eq!(create.header("x-csrf-token"), Some(CSRF_TOKEN));

    let body = create.json();
    assert_eq!(body["repository"], "demo");
    assert_eq!(body["data"]["vsid"], "6IT");
    assert_eq!(body["data"]["role"], "SOURCE");
    assert_eq!(body["data"]["type"], "GITHUB");
    assert_eq!(
        body["data"]["config"],
        json!([
            {"key": "CLIENT_VCS_AUTH_TOKEN", "value": "ghp_secret"},
            {"key": "VCS_TARGET_DIR", "value": "src/"}
        ])
    );

    assert_eq!(requests[1].path, "repository/demo/clone");
    assert_eq!(requests[2].path, "repository/demo");
}

#[test]
fn test_clone_already_exists_dumps_messages() {
    let server = TestServer::start();
    server.json("POST", "repository", 500, already_exists());

    server
        .sapcli()
        .args(["gcts", "clone", URL, "zdemo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error Log:\n  Repository already exists"))
        .stderr(predicate::str::contains("Log:\n  20200923111743: Error action"))
        .stderr(predicate::str::contains("Exception:\n  Cannot create"))
        .stderr(predicate::str::contains("gCTS exception: Cannot create"));

    assert_eq!(server.requests().len(), 1);
}

#[test]
fn test_clone_no_fail_exists_skips_cloned_repository() {
    let server = TestServer::start();
    server.json("POST", "repository", 500, already_exists()).json(
        "GET",
        "repository/demo",
        200,
        json!({"result": {"name": "demo", "status": "READY", "branch": "main",
                          "currentCommit": "abc123", "url": URL}}),
    );

    server
        .sapcli()
        .args(["gcts", "clone", URL, "--no-fail-exists"])
        .assert()
        .success()
        .stdout(predicate::str::contains(" branch: main"));

    assert!(server
        .requests()
        .iter()
        .all(|r| r.path != "repository/demo/clone"));
}

#[test]
fn test_config_list() {
    let server = TestServer::start();
    server.json(
        "GET",
        "repository/demo",
        200,
        json!({"result": {"name": "demo", "config": [
            {"key": "VCS_TARGET_DIR", "value": "src/"},
            {"key": "CLIENT_VCS_CONNTYPE", "value": "ssl"}
        ]}}),
    );

    server
        .sapcli()
        .args(["gcts", "config", "-l", "demo"])
        .assert()
        .success()
        .stdout("CLIENT_VCS_CONNTYPE=ssl\nVCS_TARGET_DIR=src/\n");
}

#[test]
fn test_delete_not_exists() {
    let server = TestServer::start();
    server.json(
        "DELETE",
        "repository/demo",
        500,
        json!({"exception": "No relation between system and repository"}),
    );

    server
        .sapcli()
        .args(["gcts", "delete", "demo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Exception:\n  Repository does not exist"));
}

#[test]
fn test_delete() {
    let server = TestServer::start();
    server.json("DELETE", "repository/demo", 200, json!({}));

    server
        .sapcli()
        .args(["gcts", "delete", "demo"])
        .assert()
        .success()
        .stdout("The repository \"demo\" has been deleted\n");
}

#[test]
fn test_checkout() {
    let server = TestServer::start();
    server
        .json(
            "GET",
            "repository/demo",
            200,
            json!({"result": {"name": "demo", "branch": "main"}}),
        )
        .json(
            "GET",
            "repository/demo/branches/main/switch",
            200,
            json!({"result": {"fromCommit": "111", "toCommit": "222"}}),
        );

    server
        .sapcli()
        .args(["gcts", "checkout", "demo", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "The repository \"demo\" has been set to the branch \"feature\"",
        ))
        .stdout(predicate::str::contains("(main:111) -> (feature:222)"));

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].query, "sap-client=001&branch=feature");
}

#[test]
fn test_log() {
    let server = TestServer::start();
    server.json(
        "GET",
        "repository/demo/getCommit",
        200,
        json!({"commits": [
            {"id": "222", "author": "Jane Doe", "authorMail": "jane@example.com",
             "date": "2024-01-02", "message": "Second"},
            {"id": "111", "author": "Jane Doe", "authorMail": "jane@example.com",
             "date": "2024-01-01", "message": "First"}
        ]}),
    );

    server
        .sapcli()
        .args(["gcts", "log", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "commit 222\nAuthor: Jane Doe <jane@example.com>\nDate:   2024-01-02\n\n    Second\n\ncommit 111",
        ));
}

#[test]
fn test_pull() {
    let server = TestServer::start();
    server.json(
        "GET",
        "repository/demo/pullByCommit",
        200,
        json!({"fromCommit": "111", "toCommit": "222"}),
    );

    server
        .sapcli()
        .args(["gcts", "pull", "demo"])
        .assert()
        .success()
        .stdout("The repository \"demo\" has been pulled\n111 -> 222\n");
}

#[test]
fn test_commit_default_message() {
    let server = TestServer::start();
    server.json("POST", "repository/demo/commit", 200, json!({}));

    server
        .sapcli()
        .args(["gcts", "commit", "demo", "NPLK900001"])
        .assert()
        .success()
        .stdout("The transport \"NPLK900001\" has been committed\n");

    let body = server.requests()[0].json();
    assert_eq!(body["message"], "Transport NPLK900001");
    assert_eq!(body["objects"], json!([{"object": "NPLK900001", "type": "TRANSPORT"}]));
    assert!(body.get("description").is_none());
}

#[test]
fn test_user_set_credentials() {
    let server = TestServer::start();
    server.json("POST", "user/credentials", 200, json!({}));

    server
        .sapcli()
        .args(["gcts", "user", "set-credentials", "-a", "https://api.github.com/v3", "-t", "ghp_x"])
        .assert()
        .success();

    let body = server.requests()[0].json();
    assert_eq!(body["endpoint"], "https://api.github.com/v3");
    assert_eq!(body["token"], "ghp_x");
    assert_eq!(body["type"], "token");
}

#[test]
fn test_repo_set_url_unchanged() {
    let server = TestServer::start();
    server.json(
        "GET",
        "repository/demo",
        200,
        json!({"result": {"name": "demo", "url": URL}}),
    );

    server
        .sapcli()
        .args(["gcts", "repo", "set-url", "demo", URL])
        .assert()
        .success()
        .stdout(predicate::str::contains("already uses the URL"));

    assert_eq!(server.requests().len(), 1);
}

#[test]
fn test_non_json_error_is_not_dumped() {
    let server = TestServer::start();
    server.text("GET", "repository", 500, "Internal Server Error");

    server
        .sapcli()
        .args(["gcts", "repolist"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("GET repository failed with HTTP 500"))
        .stderr(predicate::str::contains("Internal Server Error"))
        .stderr(predicate::str::contains("Exception:").not());
}

#[test]
fn test_unauthorized_hint() {
    let server = TestServer::start();
    server.text("GET", "repository", 401, "Unauthorized");

    server
        .sapcli()
        .args(["gcts", "repolist"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("hint: Check --user and --password"));
}

#[test]
fn test_unreachable_server_hint() {
    let mut cmd = cargo_bin_cmd!("sapcli");
    cmd.env_remove("SAP_CLIENT")
        .args(["--ashost", "127.0.0.1", "--ssl", "no"])
        .args(["--port", &unused_port().to_string()])
        .args(["gcts", "repolist"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot reach http://127.0.0.1:"))
        .stderr(predicate::str::contains("hint: Check --ashost and --port"));
}
