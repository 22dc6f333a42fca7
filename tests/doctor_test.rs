//! Integration tests for `rpmbatch doctor`

mod common;

use common::{stdout_json, TestProject};

#[test]
fn test_doctor_lists_rpm_tools() {
    let project = TestProject::new();
    let output = project
        .command()
        .args(["--json", "doctor"])
        .output()
        .expect("Failed to execute rpmbatch doctor");

    // Exit status depends on the host tooling, the report shape does not
    let doc = stdout_json(&output);
    let names: Vec<&str> = doc["tools"]
        .as_array()
        .expect("tools")
        .iter()
        .map(|c| c["tool"].as_str().expect("tool"))
        .collect();
    for tool in ["rpmspec", "rpmbuild", "spectool", "yum-builddep"] {
        assert!(names.contains(&tool), "missing {tool} in {names:?}");
    }
}

#[test]
fn test_doctor_reports_invalid_config() {
    let project = TestProject::new();
    project.create_file("bad.toml", "[build\njobs = ");
    let output = project
        .command()
        .env("RPMBATCH_CONFIG", project.path().join("bad.toml"))
        .arg("doctor")
        .output()
        .expect("Failed to execute rpmbatch doctor");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("configuration"), "stderr: {stderr}");
}
