//! CLI integration tests for compose.
//!
//! These tests write catalog files into a temporary project and run the
//! binary against them.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

const LOGGING: &str = r#"
[[part]]
type = "app::logging::Logger"
shared = true
on-activation = "on_ready"

[[part.exports]]
contract = "app::logging::ILogger"

[[part.imports]]
member = "sinks"
contract = "composition::Lazy<app::logging::Sink, app::logging::SinkMeta>"
cardinality = "zero-or-more"

[[part.imports]]
member = "clock"
contract = "app::Clock"
creation-policy = "shared"

[[part]]
type = "app::logging::ConsoleSink"

[[part.exports]]
contract = "app::logging::Sink"
metadata = { Channel = "console" }
"#;

const WEB: &str = r#"
[[part]]
type = "app::web::RequestHandler"
sharing-boundary = "request"

[[part.imports]]
member = "sessions"
contract = "composition::ExportFactory<app::web::Session>"
factory-sharing-boundaries = ["request"]

[[part.imports]]
member = "clock"
contract = "app::Clock"
"#;

/// Get the compose binary command, isolated from the user's global config.
fn compose(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("compose").unwrap();
    cmd.env("HOME", home);
    cmd
}

/// Create a project with the logging and web catalogs.
fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("catalog")).unwrap();
    fs::write(tmp.path().join("catalog/logging.parts.toml"), LOGGING).unwrap();
    fs::write(tmp.path().join("catalog/web.parts.toml"), WEB).unwrap();
    tmp
}

fn write_config(root: &Path, contents: &str) {
    fs::create_dir_all(root.join(".compose")).unwrap();
    fs::write(root.join(".compose/config.toml"), contents).unwrap();
}

// ============================================================================
// compose inspect
// ============================================================================

#[test]
fn test_inspect_lists_all_parts() {
    let tmp = project();

    compose(tmp.path())
        .arg("inspect")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("app::logging::Logger (Logger)"))
        .stdout(predicate::str::contains("app::logging::ConsoleSink (ConsoleSink)"))
        .stdout(predicate::str::contains("sharing: shared within `request`"))
        .stdout(predicate::str::contains(
            "sinks: composition::Lazy<app::logging::Sink, app::logging::SinkMeta> [lazy, zero-or-more]",
        ));
}

#[test]
fn test_inspect_single_part_as_json() {
    let tmp = project();

    let output = compose(tmp.path())
        .args(["inspect", "catalog", "--part", "Logger", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let parts = json.as_array().unwrap();
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0]["qualified_id"], "app::logging::Logger");
    assert_eq!(parts[0]["sharing"]["scope"], "root");
    assert_eq!(parts[0]["on_activation"], "app::logging::Logger.on_ready()");
}

#[test]
fn test_inspect_single_file() {
    let tmp = project();

    compose(tmp.path())
        .args(["inspect", "catalog/web.parts.toml"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("RequestHandler"))
        .stdout(predicate::str::contains("Logger").not());
}

#[test]
fn test_inspect_unknown_part_fails() {
    let tmp = project();

    compose(tmp.path())
        .args(["inspect", "--part", "Nope"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no part matches `Nope`"));
}

#[test]
fn test_inspect_fails_without_catalog() {
    let tmp = TempDir::new().unwrap();

    compose(tmp.path())
        .arg("inspect")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no `*.parts.toml` files found"));
}

#[test]
fn test_inspect_reports_parse_errors() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("broken.parts.toml"), "[[part]]\ntype = \n").unwrap();

    compose(tmp.path())
        .args(["--no-color", "inspect"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse catalog"))
        .stderr(predicate::str::contains("composition::catalog::parse"));
}

#[test]
fn test_inspect_reports_invalid_declarations() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("bad.parts.toml"),
        r#"
[[part]]
type = "app::Api"

[[part.imports]]
member = "store"
contract = "app::Store"
creation-policy = "shared"
factory-sharing-boundaries = ["request"]
"#,
    )
    .unwrap();

    compose(tmp.path())
        .arg("inspect")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to build part `app::Api`"))
        .stderr(predicate::str::contains("invalid import on member `store`"));
}

// ============================================================================
// compose imports
// ============================================================================

#[test]
fn test_imports_equivalent_groups() {
    let tmp = project();

    compose(tmp.path())
        .args(["imports", "--equivalent"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("app::Clock [direct, exactly-one] (2 sites)"))
        .stdout(predicate::str::contains("app::logging::Logger.clock"))
        .stdout(predicate::str::contains("app::web::RequestHandler.clock"))
        .stdout(predicate::str::contains("sessions").not());
}

#[test]
fn test_imports_json_uses_configured_format() {
    let tmp = project();
    write_config(tmp.path(), "[output]\nformat = \"json\"\n");

    let output = compose(tmp.path())
        .arg("imports")
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 3);
}

// ============================================================================
// compose check
// ============================================================================

#[test]
fn test_check_clean_catalog() {
    let tmp = project();

    compose(tmp.path())
        .arg("check")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "checked 3 part(s), 4 import(s): 0 error(s), 0 warning(s)",
        ));
}

#[test]
fn test_check_warnings_and_deny_warnings() {
    let tmp = project();
    fs::write(
        tmp.path().join("catalog/audit.parts.toml"),
        "[[part]]\ntype = \"app::audit::Logger\"\n",
    )
    .unwrap();

    compose(tmp.path())
        .args(["--no-color", "check"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: part id `Logger` is shared by 2 parts"));

    compose(tmp.path())
        .args(["check", "--deny-warnings"])
        .current_dir(tmp.path())
        .assert()
        .failure();
}

#[test]
fn test_check_errors_fail() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("api.parts.toml"),
        r#"
[[part]]
type = "app::Api"

[[part.imports]]
member = "store"
contract = "composition::Lazy<app::A, app::B, app::C>"
"#,
    )
    .unwrap();

    compose(tmp.path())
        .args(["--no-color", "check"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "error: `composition::Lazy` takes one or two type arguments",
        ));
}

#[test]
fn test_check_configured_wrapper() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("api.parts.toml"),
        r#"
[[part]]
type = "app::Api"

[[part.imports]]
member = "store"
contract = "app::Lazy<app::Store>"
"#,
    )
    .unwrap();

    compose(tmp.path())
        .args(["--no-color", "check", "--deny-warnings"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("`app::Lazy` looks like a wrapper"));

    write_config(tmp.path(), "[wrappers]\nlazy = [\"app::Lazy\"]\n");

    compose(tmp.path())
        .args(["check", "--deny-warnings"])
        .current_dir(tmp.path())
        .assert()
        .success();

    compose(tmp.path())
        .args(["inspect", "--json"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"wrapper\": \"lazy\""));
}

#[test]
fn test_check_notes_need_verbose() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("api.parts.toml"),
        r#"
[[part]]
type = "app::Api"

[[part.imports]]
member = "primary"
contract = "app::Store"

[[part.imports]]
member = "secondary"
contract = "app::Store"
"#,
    )
    .unwrap();

    compose(tmp.path())
        .args(["--no-color", "check", "api.parts.toml"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("note:").not());

    compose(tmp.path())
        .args(["--no-color", "--verbose", "check", "api.parts.toml"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "note: part `app::Api` imports `app::Store",
        ))
        .stderr(predicate::str::contains("api.parts.toml\n"))
        .stderr(predicate::str::contains("  = members: primary, secondary"));
}
