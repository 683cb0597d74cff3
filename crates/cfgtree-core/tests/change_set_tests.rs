use cfgtree_core::{change_me, ConfigTree, SharedTree, TreeConfig, TreeError, Value};
use cfgtree_model::{changes_load, Action, Change, JsonPayloadParser, ParseOptions};
use cfgtree_test_utils::{leaf, server_payload, site_payload};
use pretty_assertions::assert_eq;
use std::io::Write;

const PAYLOAD: &str = r#"{
    "status": "ok",
    "errors": [],
    "config": [{
        "file": "nginx.conf",
        "status": "ok",
        "errors": [],
        "parsed": [
            {"directive": "server", "line": 1, "args": [], "block": [
                {"directive": "listen", "line": 2, "args": ["80"]},
                {"directive": "server_name", "line": 3, "args": ["example.com"]}
            ]}
        ]
    }]
}"#;

const EDITS: &str = r#"[
    {"action": "append", "path": "/server", "directives": [
        {"directive": "location", "args": ["/api"], "block": [
            {"directive": "proxy_pass", "args": ["http://backend"]}
        ]}
    ]},
    {"action": 4, "path": "/server/server_name"},
    {"Act": 1, "Path": "/server/listen", "Directives": [
        {"directive": "listen", "args": ["443", "ssl"]}
    ]}
]"#;

#[test]
fn test_failing_change_reports_index_and_keeps_earlier_effects() {
    let mut tree = ConfigTree::new(server_payload());

    let err = tree
        .change_set(vec![
            Change::insert("/server/listen", vec![leaf("server_name", &["a.test"])]),
            Change::delete("/server/missing"),
        ])
        .unwrap_err();

    match &err {
        TreeError::Change { index, path, source } => {
            assert_eq!(*index, 1);
            assert_eq!(path, "/server/missing");
            assert!(matches!(**source, TreeError::PathNotFound { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(tree.get("/server/server_name").unwrap(), Value::Args("a.test".into()));
}

#[test]
fn test_change_set_stops_at_first_failure() {
    let mut tree = ConfigTree::new(server_payload());

    let err = tree
        .change_set(vec![
            Change::delete("/server/listen"),
            Change::delete("/server/listen"),
            Change::append("/server", vec![leaf("never", &[])]),
        ])
        .unwrap_err();

    assert!(matches!(err, TreeError::Change { index: 1, .. }));
    assert!(tree.lookup("/server/never").is_err());
}

#[test]
fn test_unknown_actions_are_rejected() {
    let mut tree = ConfigTree::new(server_payload());
    let changes = changes_load(r#"[{"action": "rename", "path": "/server"}]"#.as_bytes()).unwrap();
    assert_eq!(changes[0].action, Action::Unknown);

    let err = tree.change_set(changes).unwrap_err();

    assert!(matches!(
        err.root(),
        TreeError::UnsupportedAction {
            action: Action::Unknown,
            ..
        }
    ));
}

#[test]
fn test_change_set_from_json_edits() {
    let payload = JsonPayloadParser::new()
        .parse_str(PAYLOAD, &ParseOptions::default())
        .unwrap();
    let mut tree = ConfigTree::new(payload);
    let changes = changes_load(EDITS.as_bytes()).unwrap();

    assert_eq!(tree.change_set(changes).unwrap(), 3);

    assert_eq!(tree.get("/server/listen").unwrap(), Value::Args("80".into()));
    assert_eq!(
        tree.get("/server/location %2Fapi/proxy_pass").unwrap(),
        Value::Args("http://backend".into())
    );
    assert!(tree.lookup("/server/server_name").is_err());
    assert_eq!(tree.node("/server").unwrap().children().len(), 3);
}

#[test]
fn test_dump_after_change_does_not_alter_result() {
    let config = TreeConfig::default().with_dump_after_change(true);
    let mut tree = ConfigTree::with_config(site_payload(), config);

    let applied = tree.change_set(vec![Change::delete("/user")]).unwrap();

    assert_eq!(applied, 1);
    assert_eq!(tree.dump().len(), 13);
}

#[test]
fn test_shared_tree_change_set() {
    let shared = SharedTree::new(ConfigTree::new(server_payload()));

    shared
        .change_set(vec![Change::append("/server", vec![leaf("root", &["/srv"])])])
        .unwrap();
    let err = shared.change_set(vec![Change::delete("/nope")]).unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(
        shared.read(|tree| tree.get("/server/root").map(|v| v.to_string())).unwrap(),
        "/srv"
    );
}

#[test]
fn test_change_me_renders_edited_config() {
    let dir = tempfile::tempdir().unwrap();
    let conf = dir.path().join("payload.json");
    let edit = dir.path().join("edits.json");
    std::fs::File::create(&conf).unwrap().write_all(PAYLOAD.as_bytes()).unwrap();
    std::fs::File::create(&edit).unwrap().write_all(EDITS.as_bytes()).unwrap();

    let mut out = Vec::new();
    let tree = change_me(
        &JsonPayloadParser::new(),
        &conf,
        &edit,
        &ParseOptions::default(),
        TreeConfig::default(),
        &mut out,
    )
    .unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "server {\n    listen 443 ssl;\n    listen 80;\n    location /api {\n        proxy_pass http://backend;\n    }\n}\n"
    );
    assert_eq!(tree.get("/server/listen").unwrap(), Value::Args("80".into()));
}

#[test]
fn test_change_me_reports_missing_edit_file() {
    let dir = tempfile::tempdir().unwrap();
    let conf = dir.path().join("payload.json");
    std::fs::write(&conf, PAYLOAD).unwrap();

    let mut out = Vec::<u8>::new();
    let err = change_me(
        &JsonPayloadParser::new(),
        &conf,
        &dir.path().join("missing.json"),
        &ParseOptions::default(),
        TreeConfig::default(),
        &mut out,
    )
    .unwrap_err();

    assert!(matches!(err, TreeError::Changes(_)));
    assert!(out.is_empty());
}

#[test]
fn test_change_me_reports_bad_payload() {
    let dir = tempfile::tempdir().unwrap();
    let conf = dir.path().join("payload.json");
    std::fs::write(&conf, "{not json").unwrap();

    let err = change_me(
        &JsonPayloadParser::new(),
        &conf,
        &conf,
        &ParseOptions::default(),
        TreeConfig::default(),
        &mut Vec::<u8>::new(),
    )
    .unwrap_err();

    assert!(matches!(err, TreeError::Parse(_)));
}
