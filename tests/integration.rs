//! Integration tests for the cfgtree library
//!
//! These tests drive documents through the public API the way an
//! application would: load from disk, query, filter and assign.

use cfgtree::*;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

const CLUSTER: &str = r#"
cluster:
  _meta:
    Env: prod
  name: main
  node:
    - _meta: {role: primary}
      host: db1.internal
      port: 5432
      tags: [ssd, eu]
    - _meta: {role: replica}
      host: db2.internal
      port: 5433
      tags: []
    - _meta: {role: replica}
      host: db3.internal
      port: 5434
      tags: [hdd]
worker:
  - _meta: {role: batch}
    threads: 4
  - _meta: {role: stream}
    threads: 8
    enabled: true
"#;

fn load_cluster() -> Document {
    DocumentLoader::new().load_str(CLUSTER).unwrap()
}

#[test]
fn test_complete_workflow() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("cluster.yaml");
    fs::write(&file_path, CLUSTER).unwrap();

    let mut document = DocumentLoader::new().load_file(&file_path).unwrap();
    assert_eq!(document.count_groups(), 3);

    // Nested groups and sibling offsets
    assert_eq!(document.query_string("cluster.name").unwrap(), "main");
    assert_eq!(
        document.query_string("cluster.node.host").unwrap(),
        "db1.internal"
    );
    assert_eq!(document.query_int("cluster.node[2].port").unwrap(), 5434);
    assert_eq!(document.query_int("worker[1].threads").unwrap(), 8);
    assert!(document.query_bool("worker[1].enabled").unwrap());

    // Array fields
    assert_eq!(
        document.query_string("cluster.node.tags[1]").unwrap(),
        "eu"
    );
    assert_eq!(
        document.query("cluster.node[0].tags").unwrap(),
        Found::Array(vec![Scalar::from("ssd"), Scalar::from("eu")])
    );
    assert_eq!(
        document.query("cluster.node[1].tags").unwrap(),
        Found::Array(Vec::new())
    );

    // Metadata filters
    let replicas = document.get_nodes("[role:replica]");
    assert!(replicas.is_empty(), "filters only see top-level groups");
    let streams = document.get_nodes("[role:stream]");
    assert_eq!(streams.len(), 1);
    assert_eq!(streams[0].get_meta("role"), Some("stream"));
    assert_eq!(document.get_nodes("[env:prod]").len(), 1);

    // Assignment lands in the first same-named group
    document.set_value("worker.threads", 16i64).unwrap();
    assert_eq!(document.query_int("worker.threads").unwrap(), 16);
    assert_eq!(document.query_int("worker[1].threads").unwrap(), 8);
    assert_eq!(document.count_groups(), 3);

    // A new flat group is appended
    document.set_value("logging.level", "debug").unwrap();
    assert_eq!(document.count_groups(), 4);
    assert_eq!(document.query_string("logging.level").unwrap(), "debug");
}

#[test]
fn test_missing_addresses() {
    let document = load_cluster();

    assert_eq!(document.query("cluster.absent"), Err(Miss::NotFound));
    assert_eq!(document.query("nowhere.port"), Err(Miss::NotFound));
    assert_eq!(document.query("worker[5].threads"), Err(Miss::NotFound));
    assert_eq!(
        document.query("cluster.node.tags[9]"),
        Err(Miss::IndexOutOfRange { index: 9, len: 2 })
    );
    // cluster is not part of a repeated run
    assert_eq!(document.query("cluster[0].name"), Err(Miss::NotFound));
    assert_eq!(document.query(""), Err(Miss::NotFound));

    let err = document.query_int("cluster.absent").unwrap_err();
    assert!(err.is_miss());
    assert!(matches!(err, CfgTreeError::NotFound { .. }));

    let err = document.query_int("cluster.name").unwrap_err();
    assert!(matches!(err, CfgTreeError::TypeConversion { .. }));
}

#[test]
fn test_group_results_and_mutation_errors() {
    let mut document = load_cluster();

    let node = document.query("cluster.node[1]").unwrap();
    let group = node.as_group().unwrap();
    assert_eq!(group.identifier(), "node");
    assert!(group.is_repeated());
    assert_eq!(group.get_meta("role"), Some("replica"));

    let err = document.set_value("cluster.node", "x").unwrap_err();
    assert!(matches!(err, CfgTreeError::InvalidMutation { .. }));

    let err = document.set_value("nodot", "x").unwrap_err();
    assert!(matches!(err, CfgTreeError::InvalidPath { .. }));
}

#[test]
fn test_cache_follows_writes() {
    let mut document = load_cluster();

    assert_eq!(document.query_string("worker.threads").unwrap(), "4");
    assert!(document.cached_queries() > 0);

    document.set_value("worker.threads", "6").unwrap();
    assert_eq!(document.cached_queries(), 0);
    assert_eq!(document.query_int("worker.threads").unwrap(), 6);

    let mut legacy = Document::with_options(DocumentOptions {
        cache_policy: CachePolicy::Retain,
        ..Default::default()
    });
    legacy.set_value("app.mode", "a").unwrap();
    // the miss recorded before the first write is still served
    assert!(legacy.query_string("app.mode").unwrap_err().is_miss());
    legacy.reset_cache();
    assert_eq!(legacy.query_string("app.mode").unwrap(), "a");
    legacy.set_value("app.mode", "b").unwrap();
    assert_eq!(legacy.query_string("app.mode").unwrap(), "a");
    legacy.reset_cache();
    assert_eq!(legacy.query_string("app.mode").unwrap(), "b");
}

#[test]
fn test_markdown_and_multiple_files() {
    let temp_dir = TempDir::new().unwrap();
    let conf_dir = temp_dir.path().join("conf");
    fs::create_dir_all(conf_dir.join("nested")).unwrap();

    fs::write(
        conf_dir.join("site.md"),
        "---\nsite:\n  title: Docs\n  authors: [ana, bo]\n---\n# Body\n",
    )
    .unwrap();
    fs::write(conf_dir.join("plain.md"), "# No front matter\n").unwrap();
    fs::write(conf_dir.join("nested/app.yml"), "app:\n  port: 80\n").unwrap();
    fs::write(conf_dir.join("notes.txt"), "ignored").unwrap();
    fs::write(conf_dir.join(".hidden.yaml"), "x:\n  y: 1\n").unwrap();

    let files = FileResolver::new().resolve_paths(&[&conf_dir]).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["app.yml", "plain.md", "site.md"]);

    let loader = DocumentLoader::new();
    let documents: Vec<Document> = files
        .iter()
        .map(|f| loader.load_file(f).unwrap())
        .collect();

    assert_eq!(documents[0].query_int("app.port").unwrap(), 80);
    assert_eq!(documents[1].count_groups(), 0);
    assert_eq!(documents[2].query_string("site.authors[1]").unwrap(), "bo");
}
