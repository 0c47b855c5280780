//! Integration tests for tree manifests: loading fixtures, addressing nodes
//! and aggregating by position.

use std::path::PathBuf;

use infotree::application::{resolve_node_path, Aggregate, AggregateKind, ApplicationError, TreeManifest};
use infotree::cli::commands::load_tree;
use infotree::cli::CliError;
use infotree::domain::{AttrValue, Record, Tree, TreeConvert};
use infotree::exitcode;
use infotree::util::testing;
use rstest::{fixture, rstest};

fn resource(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources/trees")
        .join(name)
}

#[fixture]
fn model() -> Tree {
    testing::init_test_setup();
    TreeManifest::load(&resource("model.toml"))
        .unwrap()
        .build()
        .unwrap()
}

fn run(tree: &Tree, kind: AggregateKind, attr: Option<&str>) -> Vec<String> {
    let aggregate = Aggregate::new(kind, attr.map(String::from)).unwrap();
    tree.sync_aggregate(None, |position, records| aggregate.apply(position, records))
        .unwrap()
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[rstest]
fn given_model_manifest_when_built_then_renders_first_records(model: Tree) {
    assert_eq!(model.tag(), "model");
    assert_eq!(model.node_count(), 5);
    let expected = "\
encoder
├── attn
│   └── head-0
├── Empty
└── width: 32";
    assert_eq!(model.to_string(), expected);
    model.validate().unwrap();
}

#[rstest]
fn given_model_manifest_when_rendered_full_then_shows_every_record(model: Tree) {
    let full = model.to_tree_string(&Default::default()).to_string();
    let first_line = full.lines().next().unwrap();
    assert_eq!(
        first_line,
        "label: encoder, dropout: 0.1, width: 512 <-> label: encoder-norm, width: 512"
    );
    assert!(full.contains("└── Empty List") || full.contains("├── Empty List"));
}

#[rstest]
fn given_model_manifest_when_loaded_then_attributes_are_typed(model: Tree) {
    let attn = resolve_node_path(&model, "0").unwrap();
    let records: Vec<&Record> = model.info(attn).unwrap().iter().collect();
    assert_eq!(records.len(), 3);
    assert_eq!(records[1].attr("act"), Some(&AttrValue::Text("relu".into())));
    assert_eq!(records[1].attr("width"), Some(&AttrValue::Int(128)));
    assert_eq!(records[2].attr("width"), None);
}

#[rstest]
#[case("", "encoder")]
#[case("0", "attn")]
#[case("0.0", "head-0")]
#[case("2", "width: 32")]
fn given_node_path_when_resolved_then_finds_node(
    model: Tree,
    #[case] path: &str,
    #[case] expected: &str,
) {
    let id = resolve_node_path(&model, path).unwrap();
    assert_eq!(model.node(id).unwrap().to_string(), expected);
}

#[rstest]
#[case("3")]
#[case("0.1")]
#[case("x")]
fn given_bad_node_path_when_resolved_then_node_path_error(model: Tree, #[case] path: &str) {
    assert!(matches!(
        resolve_node_path(&model, path),
        Err(ApplicationError::NodePath { .. })
    ));
}

#[rstest]
fn given_model_when_counting_by_position_then_groups_shrink(model: Tree) {
    assert_eq!(run(&model, AggregateKind::Count, None), vec!["4", "3", "1"]);
}

#[rstest]
fn given_model_when_listing_labels_by_position_then_unlabelled_show_dash(model: Tree) {
    assert_eq!(
        run(&model, AggregateKind::Labels, None),
        vec![
            "[encoder, attn, head-0, -]",
            "[encoder-norm, attn-out, proj-out]",
            "[attn-drop]",
        ]
    );
}

#[rstest]
#[case(AggregateKind::Sum, vec!["864", "656", "0"])]
#[case(AggregateKind::Max, vec!["512", "512", "-"])]
#[case(AggregateKind::Min, vec!["32", "16", "-"])]
fn given_model_when_aggregating_width_then_skips_records_without_it(
    model: Tree,
    #[case] kind: AggregateKind,
    #[case] expected: Vec<&str>,
) {
    assert_eq!(run(&model, kind, Some("width")), expected);
}

#[rstest]
fn given_subtree_start_when_aggregating_then_only_subtree_counts(model: Tree) {
    let attn = resolve_node_path(&model, "0").unwrap();
    let aggregate = Aggregate::new(AggregateKind::Sum, Some("width".into())).unwrap();
    let sums = model
        .sync_aggregate(Some(attn), |position, records| {
            aggregate.apply(position, records).unwrap()
        })
        .unwrap();
    assert_eq!(sums, vec!["320", "128", "0"]);
}

#[test]
fn given_single_node_manifest_when_built_then_root_has_no_parent() {
    let tree = TreeManifest::load(&resource("single.toml"))
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(tree.node_count(), 1);
    assert_eq!(tree.find_parent(tree.root()), None);
    assert_eq!(tree.to_string(), "only");
}

#[test]
fn given_malformed_manifest_when_loaded_then_manifest_error() {
    let err = TreeManifest::load(&resource("broken.toml")).unwrap_err();
    match err {
        ApplicationError::Manifest { path, .. } => assert!(path.ends_with("broken.toml")),
        other => panic!("expected manifest error, got {:?}", other),
    }
    let cli_err = load_tree(resource("broken.toml").to_str().unwrap()).unwrap_err();
    assert_eq!(cli_err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_missing_manifest_when_loading_tree_then_invalid_args() {
    let err = load_tree("tests/resources/trees/does-not-exist.toml").unwrap_err();
    assert!(matches!(err, CliError::InvalidArgs(_)));
    assert_eq!(err.exit_code(), exitcode::USAGE);
}
