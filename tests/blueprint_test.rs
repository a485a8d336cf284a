//! Tests for building module trees from TOML blueprints

use std::fs;
use std::path::Path;

use rstest::rstest;
use tempfile::TempDir;

use modtree::application::{ApplicationError, Blueprint};
use modtree::util::testing;
use modtree::{Mode, Module};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

const RESOURCES: &str = "tests/resources/blueprints";

fn load(file: &str) -> Blueprint {
    Blueprint::load(&Path::new(RESOURCES).join(file)).expect("load blueprint")
}

// ============================================================
// Loading and building
// ============================================================

#[test]
fn given_network_blueprint_when_building_then_counts_match() {
    let net = load("network.toml").build().unwrap();

    assert_eq!(net.kind(), "Network");
    assert_eq!(net.modules().len(), 2);
    assert_eq!(net.parameters().len(), 1 + 7 + 12);

    let named = net.named_parameters();
    assert_eq!(
        named["parameter_a"].value(),
        &Some(toml::Value::Integer(40))
    );
    assert_eq!(
        named["module_b.parameter_b"].value(),
        &Some(toml::Value::Integer(100))
    );
    assert_eq!(named["module_b.extra_parameter_9"].value(), &None);
    assert!(!named.contains_key("module_a.non_parameter"));
}

#[test]
fn given_fields_in_blueprint_when_building_then_stored_as_fields() {
    let net = load("network.toml").build().unwrap();
    let layer = net.node().module("module_a").unwrap();
    assert_eq!(
        layer.node().field("non_parameter").unwrap(),
        &Some(toml::Value::Integer(10))
    );
}

#[test]
fn given_nested_blueprint_when_building_then_paths_are_dotted() {
    let root = load("nested.toml").build().unwrap();

    let paths: Vec<String> = root
        .named_parameters()
        .keys()
        .map(str::to_string)
        .collect();
    assert_eq!(paths, vec!["a", "M1.p", "M1.q", "M1.M2.extra_0"]);

    let named = root.named_parameters();
    assert!(named["M1.p"].is_trainable());
    assert!(!named["M1.q"].is_trainable());
    assert_eq!(
        named["M1.M2.extra_0"].value(),
        &Some(toml::Value::Integer(100))
    );
}

#[test]
fn given_nested_blueprint_when_eval_then_every_node_switches() {
    let mut root = load("nested.toml").build().unwrap();
    root.eval();
    assert_eq!(root.mode(), Mode::Eval);
    assert!(root
        .named_modules()
        .iter()
        .all(|(_, m)| m.mode() == Mode::Eval));
}

#[test]
fn given_nested_blueprint_when_repr_then_uses_declared_kinds() {
    let root = load("nested.toml").build().unwrap();
    assert_eq!(root.repr(), "R(\n  (M1): Block(\n    (M2): Inner()\n  )\n)");
}

#[test]
fn given_child_without_kind_when_building_then_default_kind_is_used() {
    let bp = Blueprint::from_toml_str(
        r#"
[[modules]]
name = "child"
"#,
    )
    .unwrap();
    let root = bp.build().unwrap();
    assert_eq!(root.repr(), "Module(\n  (child): Module()\n)");
}

#[test]
fn given_repeated_name_when_building_then_later_entry_replaces_earlier() {
    let bp = Blueprint::from_toml_str(
        r#"
[[parameters]]
name = "extra_0"
value = 1

[[repeat]]
prefix = "extra_"
count = 2
value = 2
"#,
    )
    .unwrap();
    let root = bp.build().unwrap();
    let named = root.named_parameters();
    assert_eq!(named.len(), 2);
    assert_eq!(named["extra_0"].value(), &Some(toml::Value::Integer(2)));
}

#[test]
fn given_blueprint_in_temp_dir_when_loading_then_reads_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tiny.toml");
    fs::write(&path, "kind = \"Tiny\"\n[[parameters]]\nname = \"w\"\nvalue = 0.5\n").unwrap();

    let tiny = Blueprint::load(&path).unwrap().build().unwrap();
    assert_eq!(tiny.kind(), "Tiny");
    assert_eq!(
        tiny.named_parameters()["w"].value(),
        &Some(toml::Value::Float(0.5))
    );
}

// ============================================================
// Errors
// ============================================================

#[test]
fn given_dotted_name_when_building_then_invalid_name_names_the_module() {
    let result = load("dotted_name.toml").build();
    match result {
        Err(ApplicationError::InvalidName { module, name, .. }) => {
            assert_eq!(module, "m1");
            assert_eq!(name, "w.b");
        }
        other => panic!("expected InvalidName, got {other:?}"),
    }
}

#[rstest]
#[case("[[parameters]]\nname = \"\"\n")]
#[case("[[fields]]\nname = \"a.b\"\nvalue = 1\n")]
#[case("[[modules]]\nname = \"x.y\"\n")]
#[case("[[repeat]]\nprefix = \"\"\ncount = 0\n[[modules]]\nname = \"\"\n")]
fn given_bad_name_when_building_then_rejected(#[case] content: &str) {
    let bp = Blueprint::from_toml_str(content).unwrap();
    assert!(matches!(
        bp.build(),
        Err(ApplicationError::InvalidName { .. })
    ));
}

#[test]
fn given_malformed_blueprint_when_loading_then_blueprint_error_with_path() {
    let result = Blueprint::load(&Path::new(RESOURCES).join("malformed.toml"));
    match result {
        Err(ApplicationError::Blueprint { path, .. }) => {
            assert!(path.ends_with("malformed.toml"));
        }
        other => panic!("expected Blueprint error, got {other:?}"),
    }
}

#[rstest]
#[case("[[parameters]]\nname = \"w\"\nvalue = 1\ntrainble = false\n")]
#[case("[[parameter]]\nname = \"lost\"\n")]
#[case("[[modules]]\nname = \"m\"\nknd = \"Layer\"\n")]
#[case("[[modules]]\nname = \"m\"\n  [[modules.parameters]]\n  name = \"w\"\n  trainble = false\n")]
fn given_misspelled_key_when_parsing_then_blueprint_error(#[case] content: &str) {
    let result = Blueprint::from_toml_str(content);
    assert!(
        matches!(result, Err(ApplicationError::Blueprint { .. })),
        "expected Blueprint error, got {result:?}"
    );
}

#[test]
fn given_named_root_when_building_then_rejected() {
    let bp = Blueprint::from_toml_str("name = \"top\"\nkind = \"Net\"\n").unwrap();
    assert!(matches!(
        bp.build(),
        Err(ApplicationError::InvalidName { module, .. }) if module == "<root>"
    ));
}

#[test]
fn given_missing_file_when_loading_then_not_found() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");
    assert!(matches!(
        Blueprint::load(&missing),
        Err(ApplicationError::NotFound(p)) if p == missing
    ));
}
