//! # Substitution Unit Tests / 变量替换单元测试
//!
//! Tests for `%name` replacement over configuration trees.
//!
//! 测试配置树上的 `%name` 替换。

use box_matrix::config::{Config, ConfigTree};
use box_matrix::core::substitution::{SubstitutionMap, substitute, substitute_str};
use serde_yaml::Value;

fn subs(pairs: &[(&str, &str)]) -> SubstitutionMap {
    pairs.iter().copied().collect()
}

#[test]
fn test_replaces_every_occurrence() {
    let map = subs(&[("ver", "1.2")]);
    assert_eq!(substitute_str("v%ver and %ver", &map), "v1.2 and 1.2");
}

#[test]
fn test_unknown_tokens_are_left_alone() {
    let map = subs(&[("ver", "1.2")]);
    assert_eq!(substitute_str("%other stays", &map), "%other stays");
}

#[test]
fn test_empty_value_removes_token() {
    let map = subs(&[("flags", "")]);
    assert_eq!(substitute_str("make %flags test", &map), "make  test");
}

#[test]
fn test_keys_apply_in_definition_order() {
    // The value inserted for `a` is visible to `b`, but not the other way round.
    let forward = subs(&[("a", "%b"), ("b", "x")]);
    assert_eq!(substitute_str("%a", &forward), "x");

    let backward = subs(&[("b", "x"), ("a", "%b")]);
    assert_eq!(substitute_str("%a", &backward), "%b");
}

/// A key is replaced in a single pass, so a value mentioning its own key
/// is inserted as is rather than expanded again.
#[test]
fn test_self_referencing_value_is_not_expanded_again() {
    let map = subs(&[("a", "%a%a")]);
    assert_eq!(substitute_str("%a", &map), "%a%a");
    assert_eq!(substitute_str("x %a y", &map), "x %a%a y");
}

#[test]
fn test_redefinition_keeps_position() {
    let mut map = SubstitutionMap::new();
    map.insert("a", "1");
    map.insert("b", "2");
    map.insert("a", "3");

    let pairs: Vec<(&str, &str)> = map.iter().collect();
    assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    assert_eq!(map.get("a"), Some("3"));
    assert_eq!(map.len(), 2);
}

#[test]
fn test_prefix_key_matches_inside_longer_token() {
    let map = subs(&[("a", "X")]);
    assert_eq!(substitute_str("%ab", &map), "Xb");
}

#[test]
fn test_recurses_into_sequences_and_mappings_but_not_keys() {
    let value: Value = serde_yaml::from_str(
        r#"
"%key":
  - "%val"
  - nested: "%val"
  - 3
"#,
    )
    .unwrap();
    let result = substitute(&value, &subs(&[("key", "K"), ("val", "V")]));
    let expected: Value = serde_yaml::from_str(
        r#"
"%key":
  - "V"
  - nested: "V"
  - 3
"#,
    )
    .unwrap();
    assert_eq!(result, expected);
}

#[test]
fn test_tree_substitution_is_pure() {
    let tree = ConfigTree::from_yaml_str("t1:\n  box: \"%box\"\n").unwrap();
    let substituted = tree.substitute(&subs(&[("box", "debian")]));

    assert_ne!(tree, substituted);
    let original = Config::from_tree(&tree).unwrap();
    assert_eq!(original.get("t1").unwrap().box_name.as_deref(), Some("%box"));
    let config = Config::from_tree(&substituted).unwrap();
    assert_eq!(config.get("t1").unwrap().box_name.as_deref(), Some("debian"));
}

#[test]
fn test_substitution_can_rename_facet_references() {
    let tree = ConfigTree::from_yaml_str(
        r#"
.fast: {}
t1:
  box: ubuntu
  using: ".%mode"
"#,
    )
    .unwrap();
    let config = Config::from_tree(&tree.substitute(&subs(&[("mode", "fast")]))).unwrap();
    assert_eq!(config.get("t1").unwrap().using, vec![".fast"]);
}
