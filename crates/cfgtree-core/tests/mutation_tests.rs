use cfgtree_core::{ConfigTree, Match, TreeError, Value};
use cfgtree_index::{PathIndex, WalkBack};
use cfgtree_model::Directive;
use cfgtree_test_utils::{
    block, leaf, nested_shared_include_payload, server_payload, shared_include_payload, single, site_payload,
};
use pretty_assertions::assert_eq;

fn entries(index: &PathIndex) -> Vec<(String, WalkBack)> {
    index
        .entries()
        .into_iter()
        .map(|(path, record)| (path.to_string(), record.clone()))
        .collect()
}

fn assert_index_fresh(tree: &ConfigTree) {
    let fresh = PathIndex::build(tree.payload(), tree.config().key_policy());
    assert_eq!(entries(tree.index()), entries(&fresh));
}

#[test]
fn test_append_then_delete_scenario() {
    let mut tree = ConfigTree::new(server_payload());

    tree.append("/server", vec![leaf("proxy_pass", &["backend"])]).unwrap();
    assert_eq!(tree.get("/server/proxy_pass").unwrap(), Value::Args("backend".into()));

    tree.delete("/server/listen").unwrap();
    assert!(matches!(
        tree.lookup("/server/listen"),
        Err(TreeError::PathNotFound { .. })
    ));
    assert_eq!(tree.get("/server/proxy_pass").unwrap(), Value::Args("backend".into()));
    assert_eq!(tree.lookup("/server/proxy_pass").unwrap().offset, 0);
    assert_index_fresh(&tree);
}

#[test]
fn test_insert_keeps_target_addressable() {
    let mut tree = ConfigTree::new(site_payload());
    let before = tree.lookup("/http/sendfile").unwrap().clone();

    tree.insert("/http/sendfile", vec![leaf("tcp_nopush", &["on"]), leaf("tcp_nodelay", &["on"])])
        .unwrap();

    let after = tree.lookup("/http/sendfile").unwrap();
    assert_eq!(after.node, before.node);
    assert_eq!(after.offset, before.offset + 2);
    assert_eq!(tree.lookup("/http/tcp_nopush").unwrap().offset, before.offset);
    assert_eq!(tree.get("/http/tcp_nodelay").unwrap(), Value::Args("on".into()));
    assert_index_fresh(&tree);
}

#[test]
fn test_insert_at_top_level_rebuilds() {
    let mut tree = ConfigTree::new(site_payload());

    tree.insert("/user", vec![leaf("worker_processes", &["auto"])]).unwrap();

    assert_eq!(tree.lookup("/worker_processes").unwrap().offset, 1);
    assert_eq!(tree.lookup("/user").unwrap().offset, 2);
    assert_index_fresh(&tree);
}

#[test]
fn test_insert_into_included_unit() {
    let mut tree = ConfigTree::new(site_payload());

    tree.insert("/http/types", vec![leaf("default_type", &["application/octet-stream"])])
        .unwrap();

    let record = tree.lookup("/http/default_type").unwrap();
    assert_eq!(record.ancestors, vec![1]);
    assert_eq!(record.offset, 0);
    assert_eq!(tree.lookup("/http/types").unwrap().offset, 1);
    assert_eq!(tree.payload().config[1].parsed.len(), 2);
    assert_index_fresh(&tree);
}

#[test]
fn test_append_makes_last_child() {
    let mut tree = ConfigTree::new(site_payload());
    let extra = block("location", &["/static"], vec![leaf("root", &["/srv/static"])]);

    tree.append("/http/server", vec![extra.clone()]).unwrap();

    let server = tree.node("/http/server").unwrap();
    assert_eq!(server.children().last(), Some(&extra));
    assert_eq!(
        tree.get("/http/server/location %2Fstatic/root").unwrap(),
        Value::Args("/srv/static".into())
    );
    assert_index_fresh(&tree);
}

#[test]
fn test_delete_leaves_siblings() {
    let mut tree = ConfigTree::new(site_payload());
    let api = tree.lookup("/http/server/location %2Fapi").unwrap().clone();

    tree.delete("/http/server/location %2F").unwrap();

    assert!(tree.lookup("/http/server/location %2F").is_err());
    assert!(tree.lookup("/http/server/location %2F/root").is_err());
    let moved = tree.lookup("/http/server/location %2Fapi").unwrap();
    assert_eq!(moved.node, api.node);
    assert_eq!(moved.offset, api.offset - 1);
    assert_index_fresh(&tree);
}

#[test]
fn test_insert_then_delete_restores_document() {
    let mut tree = ConfigTree::new(site_payload());

    tree.insert("/http/sendfile", vec![leaf("gzip", &["on"])]).unwrap();
    tree.delete("/http/gzip").unwrap();

    assert_eq!(tree.payload(), &site_payload());
    assert_index_fresh(&tree);
}

#[test]
fn test_collision_last_write_wins() {
    let mut tree = ConfigTree::new(site_payload());

    // the included server shadows the inline one
    assert_eq!(tree.get("/http/server/listen").unwrap(), Value::Args("8080".into()));

    tree.delete("/http/server").unwrap();

    assert_eq!(tree.get("/http/server/listen").unwrap(), Value::Args("80".into()));
    assert_eq!(
        tree.get("/http/server/server_name").unwrap(),
        Value::Args("example.com".into())
    );
    assert!(tree.payload().config[2].parsed.is_empty());
    assert_eq!(tree.payload().config[0].parsed[3].children().len(), 4);
    assert_index_fresh(&tree);
}

#[test]
fn test_collision_nodes_both_stay_in_document() {
    let mut tree = ConfigTree::new(server_payload());

    tree.append("/server", vec![leaf("listen", &["443"])]).unwrap();

    assert_eq!(tree.get("/server/listen").unwrap(), Value::Args("443".into()));
    assert_eq!(tree.node("/server").unwrap().children().len(), 2);
    assert_eq!(tree.index().len(), 2);
}

#[test]
fn test_shared_include_rebuilds_every_site() {
    let mut tree = ConfigTree::new(shared_include_payload());
    assert!(tree.lookup("/stream/resolver").is_ok());

    tree.insert("/http/resolver", vec![leaf("resolver_timeout", &["5s"])])
        .unwrap();

    assert!(tree.lookup("/http/resolver_timeout").is_ok());
    assert!(tree.lookup("/stream/resolver_timeout").is_ok());
    assert_eq!(tree.lookup("/stream/resolver").unwrap().offset, 1);
    assert_eq!(tree.lookup("/stream/if $bad").unwrap().offset, 2);
    assert_index_fresh(&tree);

    tree.delete("/stream/if $bad").unwrap();
    assert!(tree.lookup("/http/if $bad/return").is_err());
    assert_index_fresh(&tree);
}

#[test]
fn test_apply_appends_to_every_match() {
    let mut tree = ConfigTree::new(site_payload());

    let matched = tree
        .apply("/http/server/location", &Match::named("location"), &[leaf("expires", &["1h"])])
        .unwrap();

    assert_eq!(matched, 2);
    assert!(tree.lookup("/http/server/location %2F/expires").is_ok());
    assert!(tree.lookup("/http/server/location %2Fapi/expires").is_ok());
    assert_index_fresh(&tree);
}

#[test]
fn test_apply_with_closure_and_nested_matches() {
    let mut tree = ConfigTree::new(site_payload());
    let blocks = |d: &Directive| d.name() == "http" || d.name() == "server";

    let matched = tree.apply("/http", &blocks, &[leaf("gzip", &["on"])]).unwrap();

    assert_eq!(matched, 2);
    assert_eq!(tree.get("/http/gzip").unwrap(), Value::Args("on".into()));
    assert_eq!(tree.get("/http/server/gzip").unwrap(), Value::Args("on".into()));
    assert_index_fresh(&tree);
}

#[test]
fn test_apply_by_child_value() {
    let mut tree = ConfigTree::new(site_payload());
    let admin = Match::named("server").and(Match::containing("server_name", ["admin.example.com"]));

    let matched = tree.apply("", &admin, &[leaf("allow", &["10.0.0.0/8"])]).unwrap();

    assert_eq!(matched, 1);
    assert_eq!(tree.payload().config[2].parsed[0].children().len(), 3);
    assert_index_fresh(&tree);
}

#[test]
fn test_apply_without_matches_changes_nothing() {
    let mut tree = ConfigTree::new(site_payload());

    let matched = tree
        .apply("/events", &Match::named("server"), &[leaf("x", &[])])
        .unwrap();

    assert_eq!(matched, 0);
    assert_eq!(tree.payload(), &site_payload());
}

#[test]
fn test_nested_shared_include_rebuilds_every_site() {
    let mut tree = ConfigTree::new(nested_shared_include_payload());
    let listen = tree.lookup("/stream/server/listen").unwrap().node;

    tree.insert("/http/server/listen", vec![leaf("root", &["/srv"])])
        .unwrap();

    assert_eq!(tree.get("/stream/server/root").unwrap(), Value::Args("/srv".into()));
    assert_eq!(tree.lookup("/stream/server/listen").unwrap().offset, 1);
    assert_eq!(tree.node("/stream/server/listen").unwrap().id(), listen);
    assert_index_fresh(&tree);

    tree.delete("/stream/server/root").unwrap();

    assert!(tree.get("/http/server/root").unwrap_err().is_not_found());
    assert_eq!(tree.get("/http/server/listen").unwrap(), Value::Args("80".into()));
    assert_index_fresh(&tree);
}

#[test]
fn test_delete_exposes_shadowed_sibling() {
    let mut tree = ConfigTree::new(single(vec![block(
        "server",
        &[],
        vec![leaf("listen", &["80"]), leaf("listen", &["443"])],
    )]));
    assert_eq!(tree.get("/server/listen").unwrap(), Value::Args("443".into()));

    tree.delete("/server/listen").unwrap();

    assert_eq!(tree.get("/server/listen").unwrap(), Value::Args("80".into()));
    assert_index_fresh(&tree);

    tree.delete("/server/listen").unwrap();

    assert!(matches!(
        tree.get("/server/listen"),
        Err(TreeError::PathNotFound { .. })
    ));
    assert_eq!(tree.node("/server").unwrap().children().len(), 0);
}
