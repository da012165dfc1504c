use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

const ACME_EXPORT: &str = r#"{
    "realm": "Acme",
    "roles": {
        "realm": [
            { "name": "admin", "composite": true, "composites": { "realm": ["viewer"] } },
            { "name": "viewer" }
        ],
        "client": {
            "billing-app": [{ "name": "invoice.read" }]
        }
    },
    "groups": [{ "name": "staff", "subGroups": [{ "name": "ops" }] }]
}"#;

const ACME_SCHEMA: &str = "definition user {}
definition group {
    relation member: user
    relation parent: group
}
definition realm {
    relation admin: user
    relation viewer: user
    permission admin = viewer
}
definition billing_app {
    relation invoice_read: user
}
";

fn kc2spicedb() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_kc2spicedb"));
    cmd.env_remove("OPENAI_API_KEY").env_remove("RUST_LOG");
    cmd
}

fn write_export(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn help_lists_options() {
    kc2spicedb()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--no-llm"))
        .stdout(predicate::str::contains("--jobs"))
        .stdout(predicate::str::contains("--output"));
}

#[test]
fn missing_input_is_usage_error() {
    kc2spicedb()
        .assert()
        .failure()
        .stderr(predicate::str::contains("INPUT"));
}

#[test]
fn single_file_writes_sibling_schema() {
    let temp_dir = TempDir::new().unwrap();
    write_export(temp_dir.path(), "acme.json", ACME_EXPORT);

    kc2spicedb()
        .args(["--no-llm"])
        .arg(temp_dir.path().join("acme.json"))
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Processing complete. Successful: 1, Failed: 0.",
        ));

    let schema = fs::read_to_string(temp_dir.path().join("acme.zed")).unwrap();
    assert_eq!(schema, ACME_SCHEMA);
}

#[test]
fn single_file_honours_output_path() {
    let temp_dir = TempDir::new().unwrap();
    write_export(temp_dir.path(), "acme.json", ACME_EXPORT);
    let output = temp_dir.path().join("schemas/custom.zed");

    kc2spicedb()
        .args(["--no-llm", "-o"])
        .arg(&output)
        .arg(temp_dir.path().join("acme.json"))
        .assert()
        .success();

    assert_eq!(fs::read_to_string(output).unwrap(), ACME_SCHEMA);
    assert!(!temp_dir.path().join("acme.zed").exists());
}

#[test]
fn directory_input_writes_into_output_directory() {
    let temp_dir = TempDir::new().unwrap();
    let input_dir = temp_dir.path().join("exports");
    let output_dir = temp_dir.path().join("schemas");
    fs::create_dir(&input_dir).unwrap();
    write_export(&input_dir, "acme.json", ACME_EXPORT);
    write_export(&input_dir, "empty.JSON", "{}");
    write_export(&input_dir, "notes.txt", "not an export");

    kc2spicedb()
        .args(["--no-llm", "--jobs", "2", "-o"])
        .arg(&output_dir)
        .arg(&input_dir)
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Processing complete. Successful: 2, Failed: 0.",
        ));

    assert_eq!(
        fs::read_to_string(output_dir.join("acme.zed")).unwrap(),
        ACME_SCHEMA
    );
    assert_eq!(
        fs::read_to_string(output_dir.join("empty.zed")).unwrap(),
        "definition user {}\n"
    );
    assert!(!output_dir.join("notes.zed").exists());
}

#[test]
fn multiple_inputs_default_to_current_directory() {
    let temp_dir = TempDir::new().unwrap();
    let work_dir = temp_dir.path().join("work");
    fs::create_dir(&work_dir).unwrap();
    write_export(temp_dir.path(), "acme.json", ACME_EXPORT);
    write_export(temp_dir.path(), "globex.json", r#"{ "id": "globex-id" }"#);

    kc2spicedb()
        .current_dir(&work_dir)
        .arg("--no-llm")
        .arg(temp_dir.path().join("acme.json"))
        .arg(temp_dir.path().join("globex.json"))
        .assert()
        .success();

    assert!(work_dir.join("acme.zed").exists());
    assert!(work_dir.join("globex.zed").exists());
}

#[test]
fn malformed_file_fails_without_stopping_others() {
    let temp_dir = TempDir::new().unwrap();
    let output_dir = temp_dir.path().join("out");
    write_export(temp_dir.path(), "acme.json", ACME_EXPORT);
    write_export(temp_dir.path(), "broken.json", "{ \"realm\": ");

    kc2spicedb()
        .args(["--no-llm", "-o"])
        .arg(&output_dir)
        .arg(temp_dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("broken.json"))
        .stderr(predicate::str::contains(
            "Processing complete. Successful: 1, Failed: 1.",
        ));

    assert!(output_dir.join("acme.zed").exists());
    assert!(!output_dir.join("broken.zed").exists());
}

#[test]
fn multiple_inputs_reject_file_output() {
    let temp_dir = TempDir::new().unwrap();
    write_export(temp_dir.path(), "acme.json", ACME_EXPORT);
    write_export(temp_dir.path(), "globex.json", "{}");
    let existing = temp_dir.path().join("schema.zed");
    fs::write(&existing, "").unwrap();

    kc2spicedb()
        .args(["--no-llm", "-o"])
        .arg(&existing)
        .arg(temp_dir.path().join("acme.json"))
        .arg(temp_dir.path().join("globex.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("must be a directory"));
}

#[test]
fn colliding_output_names_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    for dir in ["one", "two"] {
        fs::create_dir(temp_dir.path().join(dir)).unwrap();
        write_export(&temp_dir.path().join(dir), "realm.json", "{}");
    }

    kc2spicedb()
        .args(["--no-llm", "-o"])
        .arg(temp_dir.path().join("out"))
        .arg(temp_dir.path().join("one/realm.json"))
        .arg(temp_dir.path().join("two/realm.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("would both write"));
}

#[test]
fn empty_directory_has_no_inputs() {
    let temp_dir = TempDir::new().unwrap();

    kc2spicedb()
        .arg("--no-llm")
        .arg(temp_dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No valid input files found"));
}

#[test]
fn zero_jobs_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    write_export(temp_dir.path(), "acme.json", ACME_EXPORT);

    kc2spicedb()
        .args(["--no-llm", "--jobs", "0"])
        .arg(temp_dir.path().join("acme.json"))
        .assert()
        .failure();

    assert!(!temp_dir.path().join("acme.zed").exists());
}

#[test]
fn unreachable_llm_falls_back_to_deterministic_schema() {
    let temp_dir = TempDir::new().unwrap();
    write_export(temp_dir.path(), "acme.json", ACME_EXPORT);

    kc2spicedb()
        .args([
            "--api-base-url",
            "http://127.0.0.1:9/v1",
            "--api-key",
            "test-key",
            "--timeout-secs",
            "5",
        ])
        .arg(temp_dir.path().join("acme.json"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Falling back"));

    let schema = fs::read_to_string(temp_dir.path().join("acme.zed")).unwrap();
    assert_eq!(schema, ACME_SCHEMA);
}

#[test]
fn llm_mode_without_api_key_warns_and_falls_back() {
    let temp_dir = TempDir::new().unwrap();
    write_export(temp_dir.path(), "acme.json", ACME_EXPORT);

    kc2spicedb()
        .args(["--backend", "completion"])
        .arg(temp_dir.path().join("acme.json"))
        .assert()
        .success()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));

    assert_eq!(
        fs::read_to_string(temp_dir.path().join("acme.zed")).unwrap(),
        ACME_SCHEMA
    );
}

#[test]
fn unknown_backend_is_usage_error() {
    let temp_dir = TempDir::new().unwrap();
    write_export(temp_dir.path(), "acme.json", ACME_EXPORT);

    kc2spicedb()
        .args(["--backend", "gpt-4"])
        .arg(temp_dir.path().join("acme.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown backend"));
}
