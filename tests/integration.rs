use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn docstore_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("docstore");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[storage]
path = "{}/storage"

[server]
bind = "127.0.0.1:7332"
"#,
        root.display()
    );

    let config_path = config_dir.join("docstore.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_docstore(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = docstore_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run docstore binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn create(config_path: &Path, title: &str, content: &str) -> Value {
    let (stdout, stderr, success) = run_docstore(
        config_path,
        &["create", "--title", title, "--content", content, "--json"],
    );
    assert!(success, "create failed: stdout={}, stderr={}", stdout, stderr);
    serde_json::from_str(&stdout).unwrap()
}

#[test]
fn test_create_then_get() {
    let (_tmp, config_path) = setup_test_env();

    let created = create(&config_path, "Alpha", "alpha content");
    let id = created["id"].as_str().unwrap();

    let (stdout, stderr, success) = run_docstore(&config_path, &["get", id, "--json"]);
    assert!(success, "get failed: stdout={}, stderr={}", stdout, stderr);
    let fetched: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(fetched, created);

    let (stdout, _, success) = run_docstore(&config_path, &["get", id]);
    assert!(success);
    assert!(stdout.contains("alpha content"));
    assert!(stdout.contains("title:        Alpha"));
}

#[test]
fn test_files_written_to_configured_storage() {
    let (tmp, config_path) = setup_test_env();
    let created = create(&config_path, "Alpha", "alpha");
    let id = created["id"].as_str().unwrap();

    let storage = tmp.path().join("storage");
    assert!(storage.join("documents").join(format!("{}.json", id)).is_file());
    assert!(storage.join("index.json").is_file());
}

#[test]
fn test_list_most_recent_first() {
    let (_tmp, config_path) = setup_test_env();

    let first = create(&config_path, "First", "1");
    let second = create(&config_path, "Second", "2");

    let (stdout, _, success) = run_docstore(&config_path, &["list", "--json"]);
    assert!(success);
    let listed: Vec<Value> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["id"], second["id"]);
    assert_eq!(listed[1]["id"], first["id"]);

    let (stdout, _, success) = run_docstore(&config_path, &["list"]);
    assert!(success);
    assert!(stdout.contains("2 document(s)"));
}

#[test]
fn test_empty_list() {
    let (_tmp, config_path) = setup_test_env();
    let (stdout, _, success) = run_docstore(&config_path, &["list"]);
    assert!(success);
    assert!(stdout.contains("No documents."));
}

#[test]
fn test_get_missing_fails() {
    let (_tmp, config_path) = setup_test_env();
    let (_, stderr, success) = run_docstore(&config_path, &["get", "document_nope"]);
    assert!(!success);
    assert!(stderr.contains("not found"), "stderr={}", stderr);
}

#[test]
fn test_update_moves_document_to_top() {
    let (_tmp, config_path) = setup_test_env();

    let first = create(&config_path, "First", "1");
    let _second = create(&config_path, "Second", "2");
    let id = first["id"].as_str().unwrap();

    let (stdout, stderr, success) = run_docstore(
        &config_path,
        &["update", id, "--title", "First (edited)", "--json"],
    );
    assert!(success, "update failed: stdout={}, stderr={}", stdout, stderr);
    let updated: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(updated["title"], "First (edited)");
    assert_eq!(updated["content"], "1");
    assert_eq!(updated["created_at"], first["created_at"]);

    let (stdout, _, _) = run_docstore(&config_path, &["list", "--json"]);
    let listed: Vec<Value> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(listed[0]["id"], first["id"]);
    assert_eq!(listed[0]["title"], "First (edited)");
}

#[test]
fn test_update_requires_a_field() {
    let (_tmp, config_path) = setup_test_env();
    let created = create(&config_path, "Alpha", "a");
    let id = created["id"].as_str().unwrap();

    let (_, stderr, success) = run_docstore(&config_path, &["update", id]);
    assert!(!success);
    assert!(stderr.contains("nothing to update"));
}

#[test]
fn test_reindex_restores_listing() {
    let (tmp, config_path) = setup_test_env();
    create(&config_path, "Alpha", "a");
    create(&config_path, "Beta", "b");

    fs::remove_file(tmp.path().join("storage").join("index.json")).unwrap();
    let (stdout, _, _) = run_docstore(&config_path, &["list", "--json"]);
    let listed: Vec<Value> = serde_json::from_str(&stdout).unwrap();
    assert!(listed.is_empty());

    let (stdout, stderr, success) = run_docstore(&config_path, &["reindex"]);
    assert!(success, "reindex failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("indexed 2 document(s)"));

    let (stdout, _, _) = run_docstore(&config_path, &["list", "--json"]);
    let listed: Vec<Value> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(listed.len(), 2);
}

#[test]
fn test_invalid_config_is_rejected() {
    let (_tmp, config_path) = setup_test_env();
    fs::write(&config_path, "[storage]\npath = \"\"\n").unwrap();
    let (_, stderr, success) = run_docstore(&config_path, &["list"]);
    assert!(!success);
    assert!(stderr.contains("storage.path"));
}
