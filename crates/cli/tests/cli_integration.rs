use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

const SCHEMA: &str = r#"{
    "format-version": 1,
    "items": [
        { "kind": "option", "short": "v", "long": "verbose", "description": "Chatty output" },
        { "kind": "option", "short": "o", "long": "output", "takes-value": true },
        { "kind": "argument", "name": "input", "description": "File to read" },
        { "kind": "command", "name": "get",
          "parser": { "items": [{ "kind": "argument", "name": "key" }] } },
        { "kind": "command", "name": "run" }
    ]
}"#;

fn make_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before UNIX_EPOCH")
        .as_nanos();
    let pid = std::process::id();
    let dir = std::env::temp_dir().join(format!("argmodel-integ-{prefix}-{pid}-{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn write_schema(prefix: &str) -> (PathBuf, PathBuf) {
    let dir = make_temp_dir(prefix);
    let path = dir.join("argmodel.json");
    fs::write(&path, SCHEMA).expect("failed to write schema");
    (dir, path)
}

fn argmodel() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_argmodel"));
    cmd.env_remove("ARGMODEL_SCHEMA").env_remove("RUST_LOG");
    cmd
}

fn assert_success(out: &Output, what: &str) {
    assert!(
        out.status.success(),
        "{what} failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
}

#[test]
fn help_works() {
    let out = argmodel()
        .arg("--help")
        .output()
        .expect("failed to run argmodel --help");
    assert_success(&out, "argmodel --help");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("argmodel") && stdout.contains("parse") && stdout.contains("usage"),
        "unexpected help output:\n{stdout}"
    );
}

#[test]
fn parse_prints_model_as_json() {
    let (dir, schema) = write_schema("parse-json");

    let out = argmodel()
        .arg("parse")
        .arg("--schema")
        .arg(&schema)
        .args(["--", "-vo", "out.txt", "in.txt", "get", "name"])
        .output()
        .expect("failed to run argmodel parse");
    assert_success(&out, "argmodel parse");

    let model: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("stdout is not JSON");
    assert_eq!(model["arguments"]["input"], "in.txt");
    assert_eq!(model["options"][0]["long"], "verbose");
    assert_eq!(model["options"][1]["value"], "out.txt");
    assert_eq!(model["command"]["name"], "get");
    assert_eq!(model["command"]["model"]["arguments"]["key"], "name");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn parse_error_exits_with_status_two() {
    let (dir, schema) = write_schema("parse-error");

    let out = argmodel()
        .arg("parse")
        .arg("--schema")
        .arg(&schema)
        .args(["--", "-v"])
        .output()
        .expect("failed to run argmodel parse");
    assert_eq!(out.status.code(), Some(2), "unexpected status: {}", out.status);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("missing arguments: <input>"),
        "unexpected stderr:\n{stderr}"
    );
    assert!(
        stderr.contains("usage: [-v] [-o <output>] <input> [get | run]"),
        "unexpected stderr:\n{stderr}"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn ignore_unknown_flag_drops_trailing_tokens() {
    let (dir, schema) = write_schema("ignore-unknown");

    let strict = argmodel()
        .arg("parse")
        .arg("--schema")
        .arg(&schema)
        .args(["--", "in.txt", "run", "get"])
        .output()
        .expect("failed to run argmodel parse");
    assert_eq!(strict.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&strict.stderr).contains("unknown argument: get"));

    let lenient = argmodel()
        .arg("parse")
        .arg("--schema")
        .arg(&schema)
        .arg("--ignore-unknown")
        .args(["--", "in.txt", "run", "get"])
        .output()
        .expect("failed to run argmodel parse");
    assert_success(&lenient, "argmodel parse --ignore-unknown");
    let model: serde_json::Value =
        serde_json::from_slice(&lenient.stdout).expect("stdout is not JSON");
    assert_eq!(model["command"]["name"], "run");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn help_token_prints_usage() {
    let (dir, schema) = write_schema("help-token");

    let out = argmodel()
        .arg("parse")
        .arg("--schema")
        .arg(&schema)
        .args(["--", "--help"])
        .output()
        .expect("failed to run argmodel parse");
    assert_success(&out, "argmodel parse -- --help");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("Syntax:\n"), "unexpected usage:\n{stdout}");
    assert!(stdout.contains("\n<input>\nFile to read\n"), "unexpected usage:\n{stdout}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn schema_path_comes_from_environment() {
    let (dir, schema) = write_schema("env-schema");

    let out = argmodel()
        .env("ARGMODEL_SCHEMA", &schema)
        .arg("usage")
        .output()
        .expect("failed to run argmodel usage");
    assert_success(&out, "argmodel usage");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("-v\nChatty output\n"),
        "unexpected usage:\n{stdout}"
    );
    assert!(stdout.contains("\nget <key>\n"), "unexpected usage:\n{stdout}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn check_rejects_conflicting_declarations() {
    let dir = make_temp_dir("check-invalid");
    let schema = dir.join("bad.json");
    fs::write(
        &schema,
        r#"{ "items": [
            { "kind": "option", "short": "a" },
            { "kind": "option", "short": "a", "long": "again" }
        ] }"#,
    )
    .expect("failed to write schema");

    let out = argmodel()
        .arg("check")
        .arg("--schema")
        .arg(&schema)
        .output()
        .expect("failed to run argmodel check");
    assert_eq!(out.status.code(), Some(1), "unexpected status: {}", out.status);
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("option key '-a' is declared more than once"),
        "unexpected stderr:\n{stderr}"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn init_then_check_succeeds() {
    let dir = make_temp_dir("init-check");

    let out = argmodel()
        .arg("init")
        .arg(&dir)
        .output()
        .expect("failed to run argmodel init");
    assert_success(&out, "argmodel init");
    assert!(dir.join("argmodel.json").is_file(), "argmodel.json not created");

    let again = argmodel()
        .arg("init")
        .arg(&dir)
        .output()
        .expect("failed to run argmodel init");
    assert!(!again.status.success(), "second init should refuse to overwrite");

    let out = argmodel()
        .current_dir(&dir)
        .arg("check")
        .output()
        .expect("failed to run argmodel check");
    assert_success(&out, "argmodel check");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("syntax: [-v] <input>"),
        "unexpected stderr:\n{stderr}"
    );

    let _ = fs::remove_dir_all(&dir);
}
