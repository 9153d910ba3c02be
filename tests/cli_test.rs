use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn routelens() -> Command {
    Command::new(env!("CARGO_BIN_EXE_routelens"))
}

fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, contents).expect("write file");
}

fn seed_project(root: &Path) {
    write_file(
        root,
        "routes/users.js",
        r#"
            app.get('/:id', (req, res) => {});
            app.post('/', (req, res) => { req.body = { name: 'anna' }; });
        "#,
    );
}

#[test]
fn scan_writes_a_postman_collection() {
    let temp = TempDir::new().expect("tempdir");
    seed_project(temp.path());
    let out = temp.path().join("collection.json");

    let status = routelens()
        .args(["scan", "--root"])
        .arg(temp.path())
        .args(["--framework", "express", "--receiver", "app", "--out"])
        .arg(&out)
        .status()
        .expect("run routelens");
    assert!(status.success());

    let written = fs::read_to_string(&out).expect("collection file");
    let collection: serde_json::Value = serde_json::from_str(&written).expect("valid JSON");
    assert_eq!(
        collection["info"]["schema"],
        "https://schema.getpostman.com/json/collection/v2.1.0/collection.json"
    );
    assert_eq!(collection["item"][0]["name"], "users");
    assert_eq!(collection["item"][0]["item"].as_array().map(|i| i.len()), Some(2));
}

#[test]
fn scan_json_reports_counts_on_stdout() {
    let temp = TempDir::new().expect("tempdir");
    seed_project(temp.path());

    let output = routelens()
        .args(["scan", "--json", "--dry-run", "--root"])
        .arg(temp.path())
        .output()
        .expect("run routelens");
    assert!(output.status.success());

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(report["type"], "Scan");
    assert_eq!(report["endpoints"], 2);
    assert_eq!(report["resources"], serde_json::json!(["users"]));
    assert_eq!(report["collection_file"], serde_json::Value::Null);
}

#[test]
fn dry_run_writes_no_file() {
    let temp = TempDir::new().expect("tempdir");
    seed_project(temp.path());
    let out = temp.path().join("collection.json");

    let status = routelens()
        .args(["scan", "--dry-run", "--root"])
        .arg(temp.path())
        .arg("--out")
        .arg(&out)
        .status()
        .expect("run routelens");
    assert!(status.success());
    assert!(!out.exists());
}

#[test]
fn sync_without_credentials_fails() {
    let temp = TempDir::new().expect("tempdir");
    seed_project(temp.path());

    let output = routelens()
        .args(["sync", "--root"])
        .arg(temp.path())
        .env_remove("POSTMAN_API_KEY")
        .output()
        .expect("run routelens");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("API key"), "stderr was: {stderr}");
}

#[test]
fn sync_reads_api_key_from_environment() {
    let temp = TempDir::new().expect("tempdir");
    seed_project(temp.path());

    // Key present via the environment, workspace id still missing: the
    // failure must be about the workspace id, proving the key was accepted.
    let output = routelens()
        .args(["sync", "--root"])
        .arg(temp.path())
        .env("POSTMAN_API_KEY", "pk-test")
        .output()
        .expect("run routelens");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("workspace id"), "stderr was: {stderr}");
    assert!(!stderr.contains("API key"), "stderr was: {stderr}");
}

#[test]
fn config_file_drives_the_scan() {
    let temp = TempDir::new().expect("tempdir");
    seed_project(temp.path());
    let out = temp.path().join("from_config.json");

    let config = serde_json::json!({
        "directoryToScan": temp.path(),
        "framework": "express",
        "objectInstance": "app",
        "baseUrl": "https://api.example.com",
        "postmanCollectionFile": out,
        "collectionName": "Example API",
    });
    let config_path = temp.path().join("routelens.json");
    fs::write(&config_path, config.to_string()).expect("write config");

    let status = routelens()
        .arg("scan")
        .arg("--config")
        .arg(&config_path)
        .status()
        .expect("run routelens");
    assert!(status.success());

    let written = fs::read_to_string(&out).expect("collection file");
    let collection: serde_json::Value = serde_json::from_str(&written).expect("valid JSON");
    assert_eq!(collection["info"]["name"], "Example API");
    let url = collection["item"][0]["item"][0]["request"]["url"]
        .as_str()
        .expect("request url");
    assert!(url.starts_with("https://api.example.com/users"), "url was: {url}");
}
