use assert_cmd::Command;
use predicates::prelude::*;

fn jns() -> Command {
    Command::cargo_bin("jns").unwrap()
}

#[test]
fn help_lists_the_subcommands() {
    jns()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("abort"))
        .stdout(predicate::str::contains("connect"))
        .stdout(predicate::str::contains("alias"));
}

#[test]
fn build_requires_a_job_argument() {
    jns().arg("build").assert().failure();
}

#[test]
fn commands_refuse_to_run_without_a_configured_server() {
    let tmp = tempfile::tempdir().unwrap();
    jns()
        .arg("list")
        .env("JNS_CONFIG_DIR", tmp.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("jns connect"));
}

#[test]
fn alias_list_is_empty_without_settings() {
    let tmp = tempfile::tempdir().unwrap();
    jns()
        .args(["alias", "list"])
        .env("JNS_CONFIG_DIR", tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn alias_add_and_list_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    jns()
        .args(["alias", "add", "deploy", "https://jenkins.example.com/job/deploy/"])
        .env("JNS_CONFIG_DIR", tmp.path())
        .assert()
        .success();
    jns()
        .args(["alias", "list"])
        .env("JNS_CONFIG_DIR", tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "deploy -> https://jenkins.example.com/job/deploy",
        ));
}

#[test]
fn alias_add_rejects_plain_names() {
    let tmp = tempfile::tempdir().unwrap();
    jns()
        .args(["alias", "add", "deploy", "not-a-url"])
        .env("JNS_CONFIG_DIR", tmp.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("expected a job URL"));
}

#[test]
fn alias_remove_of_a_missing_alias_fails() {
    let tmp = tempfile::tempdir().unwrap();
    jns()
        .args(["alias", "remove", "ghost"])
        .env("JNS_CONFIG_DIR", tmp.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn list_renders_jobs_and_numbers_them() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/view/all/api/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"jobs": [
                {"name": "deploy", "url": "http://j/job/deploy/", "color": "blue",
                 "_class": "org.jenkinsci.plugins.workflow.job.WorkflowJob"},
                {"name": "nightly", "url": "http://j/job/nightly/", "color": "red",
                 "_class": "hudson.model.FreeStyleProject"}
            ]}"#,
        )
        .create();

    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join("config.toml"),
        format!(
            "server = \"{}\"\nusername = \"kim\"\ntoken = \"t\"\n",
            server.url()
        ),
    )
    .unwrap();

    jns()
        .arg("list")
        .env("JNS_CONFIG_DIR", tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("nightly"));

    let mapping = std::fs::read_to_string(tmp.path().join("mapping")).unwrap();
    assert!(mapping.starts_with("1;deploy;"));
    assert!(mapping.contains("2;nightly;"));
}

#[test]
fn ai_test_requires_configuration() {
    let tmp = tempfile::tempdir().unwrap();
    jns()
        .args(["ai", "test"])
        .env("JNS_CONFIG_DIR", tmp.path())
        .assert()
        .failure()
        .code(6)
        .stderr(predicate::str::contains("jns ai configure"));
}
