use pretty_assertions::assert_eq;
use routelens::{normalize, EndpointDiscovery, Framework, HttpMethod};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, contents).expect("write file");
}

#[test]
fn imported_handler_end_to_end() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path();

    write_file(
        root,
        "routes/orders.js",
        r#"
            const { confirmOrder } = require('../handlers/orders');
            app.post('/:id/confirm', confirmOrder);
        "#,
    );
    write_file(
        root,
        "handlers/orders.js",
        r#"
            /**
             * Confirms a pending order.
             */
            exports.confirmOrder = (req, res) => {
                req.body = { qty, note };
                res.send('ok');
            };
        "#,
    );

    let discovery = EndpointDiscovery::new(Framework::Express, "app");
    let endpoints = discovery.discover(root).expect("discover");

    assert_eq!(endpoints.len(), 1);
    let endpoint = &endpoints[0];
    assert_eq!(endpoint.method, HttpMethod::Post);
    assert_eq!(endpoint.path, "/orders/:id/confirm");
    assert_eq!(endpoint.resource_name, "orders");
    assert_eq!(endpoint.query_parameters.len(), 1);
    assert_eq!(endpoint.query_parameters[0].key, "id");
    assert_eq!(
        serde_json::Value::Object(endpoint.body.clone()),
        serde_json::json!({ "qty": "value of qty", "note": "value of note" })
    );
    assert_eq!(endpoint.description.as_deref(), Some("Confirms a pending order."));
    assert_eq!(endpoint.handler_name.as_deref(), Some("confirmOrder"));
}

#[test]
fn inline_and_imported_handlers_infer_the_same_metadata() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path();

    write_file(
        root,
        "routes/a.js",
        r#"
            app.post('/save', (req, res) => {
                const { title, tags } = req.body;
            });
        "#,
    );
    write_file(
        root,
        "routes/b.js",
        r#"
            import { handler } from './shared';
            app.post('/save', handler);
        "#,
    );
    write_file(
        root,
        "routes/shared.js",
        r#"
            export const handler = (req, res) => {
                const { title, tags } = req.body;
            };
        "#,
    );

    let discovery = EndpointDiscovery::new(Framework::Express, "app");
    let endpoints = discovery.discover(root).expect("discover");

    let inline = endpoints
        .iter()
        .find(|e| e.resource_name == "a")
        .expect("inline endpoint");
    let imported = endpoints
        .iter()
        .find(|e| e.resource_name == "b")
        .expect("imported endpoint");

    assert_eq!(inline.body, imported.body);
    assert_eq!(inline.description, imported.description);
    assert_eq!(
        serde_json::Value::Object(inline.body.clone()),
        serde_json::json!({ "title": null, "tags": null })
    );
}

#[test]
fn version_directories_group_with_unversioned_files() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path();

    write_file(root, "routes/users.js", "app.get('/all', h);");
    write_file(root, "routes/v2/users.js", "app.get('/all', h);");

    let discovery = EndpointDiscovery::new(Framework::Express, "app");
    let endpoints = discovery.discover(root).expect("discover");
    assert_eq!(endpoints.len(), 2);

    let paths: Vec<&str> = endpoints.iter().map(|e| e.path.as_str()).collect();
    assert!(paths.contains(&"/users/all"));
    assert!(paths.contains(&"/v2/users/all"));

    let groups = normalize::group_by_resource(endpoints);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "users");
    assert_eq!(groups[0].endpoints.len(), 2);
}

#[test]
fn index_files_register_unprefixed_paths() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path();
    write_file(root, "routes/index.js", "app.get('/health', h);");

    let discovery = EndpointDiscovery::new(Framework::Express, "app");
    let endpoints = discovery.discover(root).expect("discover");
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].path, "/health");
}

#[test]
fn unresolvable_handler_still_emits_a_record() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path();
    write_file(root, "routes/ghosts.js", "app.delete('/:id', vanished);");

    let discovery = EndpointDiscovery::new(Framework::Express, "app");
    let endpoints = discovery.discover(root).expect("discover");

    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].method, HttpMethod::Delete);
    assert!(endpoints[0].body.is_empty());
    assert!(endpoints[0].description.is_none());
    assert!(endpoints[0].handler_name.is_none());
}

#[test]
fn missing_scan_root_is_an_error() {
    let discovery = EndpointDiscovery::new(Framework::Express, "app");
    let err = discovery
        .discover(Path::new("/definitely/not/a/real/root"))
        .expect_err("should fail");
    assert!(matches!(err, routelens::Error::Scan { .. }));
}

#[test]
fn malformed_file_is_skipped_not_fatal() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path();
    write_file(root, "routes/broken.js", "const = = {");
    write_file(root, "routes/good.js", "app.get('/ok', h);");

    let discovery = EndpointDiscovery::new(Framework::Express, "app");
    let endpoints = discovery.discover(root).expect("discover");
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].path, "/good/ok");
}

#[test]
fn node_modules_are_excluded_by_default() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path();
    write_file(root, "node_modules/lib/routes.js", "app.get('/hidden', h);");
    write_file(root, "routes/users.js", "app.get('/all', h);");

    let discovery = EndpointDiscovery::new(Framework::Express, "app");
    let endpoints = discovery.discover(root).expect("discover");
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].resource_name, "users");
}

#[test]
fn rescans_are_deterministic() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path();
    write_file(root, "routes/users.js", "app.get('/:id', h); app.post('/', h);");
    write_file(root, "routes/orders.js", "app.put('/:id', h);");

    let discovery = EndpointDiscovery::new(Framework::Express, "app");
    let first = discovery.discover(root).expect("first scan");
    let second = discovery.discover(root).expect("second scan");

    let first_json = serde_json::to_value(&first).expect("serialize");
    let second_json = serde_json::to_value(&second).expect("serialize");
    assert_eq!(first_json, second_json);
}

#[test]
fn circular_reexports_terminate_as_unresolved() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path();
    write_file(
        root,
        "routes/loop.js",
        r#"
            const { spin } = require('./a');
            app.get('/spin', spin);
        "#,
    );
    write_file(root, "routes/a.js", "module.exports = require('./b');");
    write_file(root, "routes/b.js", "module.exports = require('./a');");

    let discovery = EndpointDiscovery::new(Framework::Express, "app");
    let endpoints = discovery.discover(root).expect("discover must terminate");
    assert_eq!(endpoints.len(), 1);
    assert!(endpoints[0].body.is_empty());
}

#[test]
fn middleware_chain_uses_last_resolvable_handler() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path();
    write_file(
        root,
        "routes/items.js",
        r#"
            const auth = (req, res, next) => { next(); };
            const createItem = (req, res) => {
                req.body = { sku: 'A-1' };
            };
            app.post('/', auth, createItem);
        "#,
    );

    let discovery = EndpointDiscovery::new(Framework::Express, "app");
    let endpoints = discovery.discover(root).expect("discover");
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0].handler_name.as_deref(), Some("createItem"));
    assert_eq!(
        serde_json::Value::Object(endpoints[0].body.clone()),
        serde_json::json!({ "sku": "A-1" })
    );
}

#[test]
fn headers_include_literal_options_and_default() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path();
    write_file(
        root,
        "routes/secure.js",
        "app.get('/ping', { Authorization: 'Bearer token' }, h);",
    );

    let discovery = EndpointDiscovery::new(Framework::Express, "app");
    let endpoints = discovery.discover(root).expect("discover");
    assert_eq!(endpoints.len(), 1);
    let headers = &endpoints[0].headers;
    assert_eq!(headers.len(), 2);
    assert_eq!(headers[0].key, "Authorization");
    assert_eq!(headers[1].key, "Content-Type");
    assert_eq!(headers[1].value, "application/json");
}

#[test]
fn duplicate_header_keys_are_preserved_in_order() {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path();
    write_file(
        root,
        "routes/feeds.js",
        "app.get('/latest', { Accept: 'application/json', Accept: 'text/plain' }, h);",
    );

    let discovery = EndpointDiscovery::new(Framework::Express, "app");
    let endpoints = discovery.discover(root).expect("discover");
    assert_eq!(endpoints.len(), 1);

    let pairs: Vec<(&str, &str)> = endpoints[0]
        .headers
        .iter()
        .map(|h| (h.key.as_str(), h.value.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Accept", "application/json"),
            ("Accept", "text/plain"),
            ("Content-Type", "application/json"),
        ]
    );
}
