//! # Config Module Unit Tests / Config 模块单元测试
//!
//! Tests for loading, typing and validating configuration trees.
//!
//! 测试配置树的加载、类型化和验证。

use box_matrix::config::{Config, ConfigTree, EntryKind, load_config_tree};
use box_matrix::core::error::ConfigError;
use std::fs;
use tempfile::tempdir;

fn config(yaml: &str) -> Result<Config, ConfigError> {
    Config::from_tree(&ConfigTree::from_yaml_str(yaml).unwrap())
}

#[cfg(test)]
mod parsing_tests {
    use super::*;

    #[test]
    fn test_entry_kinds_follow_name_prefix() {
        let config = config(
            r#"
.base: {}
t1:
  box: ubuntu
"#,
        )
        .unwrap();

        assert_eq!(config.get(".base").unwrap().kind, EntryKind::Fragment);
        assert_eq!(config.get("t1").unwrap().kind, EntryKind::Setup);
        assert_eq!(config.setups().count(), 1);
    }

    #[test]
    fn test_scalar_fields_become_single_item_lists() {
        let config = config(
            r#"
t1:
  box: ubuntu
  using: .base
  install: "apt-get install -y make"
  script: make test
.base: {}
"#,
        )
        .unwrap();
        let entry = config.get("t1").unwrap();

        assert_eq!(entry.using, vec![".base"]);
        assert_eq!(entry.install, vec!["apt-get install -y make"]);
        assert_eq!(entry.script, vec!["make test"]);
        assert!(entry.customize.is_empty());
    }

    #[test]
    fn test_missing_env_defaults_to_one_empty_line() {
        let config = config("t1:\n  box: ubuntu\n").unwrap();
        assert_eq!(config.get("t1").unwrap().env, vec![String::new()]);
    }

    #[test]
    fn test_explicit_empty_env_is_kept() {
        let config = config("t1:\n  box: ubuntu\n  env: []\n").unwrap();
        assert!(config.get("t1").unwrap().env.is_empty());
    }

    #[test]
    fn test_numbers_and_bools_are_read_as_strings() {
        let config = config("t1:\n  box: 42\n  env: [1, true]\n").unwrap();
        let entry = config.get("t1").unwrap();
        assert_eq!(entry.box_name.as_deref(), Some("42"));
        assert_eq!(entry.env, vec!["1", "true"]);
    }

    #[test]
    fn test_setups_keep_declaration_order() {
        let config = config(
            r#"
zeta: { box: a }
alpha: { box: b }
.frag: {}
mid: { box: c }
"#,
        )
        .unwrap();
        let names: Vec<&str> = config.setups().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_empty_document_is_an_empty_config() {
        let tree = ConfigTree::from_yaml_str("  \n").unwrap();
        assert!(tree.is_empty());
        assert_eq!(Config::from_tree(&tree).unwrap().entries().len(), 0);
    }
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn test_fragment_with_box_is_rejected() {
        let err = config(".base:\n  box: ubuntu\n").unwrap_err();
        assert_eq!(err, ConfigError::FragmentHasBox(".base".to_string()));
    }

    #[test]
    fn test_fragment_check_runs_before_entry_parsing() {
        // `broken` is a setup without a box, declared first.
        let err = config("broken: {}\n.base:\n  box: ubuntu\n").unwrap_err();
        assert_eq!(err, ConfigError::FragmentHasBox(".base".to_string()));
    }

    #[test]
    fn test_setup_without_box_is_rejected() {
        let err = config("t1:\n  script: make\n").unwrap_err();
        assert_eq!(err, ConfigError::MissingBox("t1".to_string()));
    }

    #[test]
    fn test_non_mapping_root_is_rejected() {
        let err = ConfigTree::from_yaml_str("- a\n- b\n").unwrap_err();
        assert!(err.to_string().contains("must be a mapping"));
    }

    #[test]
    fn test_non_mapping_entry_is_rejected() {
        let err = config("t1: just a string\n").unwrap_err();
        assert_eq!(err, ConfigError::InvalidEntry("t1".to_string()));
    }

    #[test]
    fn test_nested_list_field_is_rejected() {
        let err = config("t1:\n  box: ubuntu\n  env: [[A=1]]\n").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidField {
                entry: "t1".to_string(),
                field: "env".to_string(),
            }
        );
    }

    #[test]
    fn test_non_string_name_is_rejected() {
        let err = config("1:\n  box: ubuntu\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidName(_)));
    }
}

#[cfg(test)]
mod loading_tests {
    use super::*;

    #[test]
    fn test_load_yaml_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("matrix.yml");
        fs::write(&path, "t1:\n  box: ubuntu\n").unwrap();

        let tree = load_config_tree(&path).unwrap();
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_load_toml_file_keeps_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("matrix.toml");
        fs::write(
            &path,
            r#"
[zeta]
box = "ubuntu"
env = ["X=1", "X=2"]

[".base"]
install = ["echo A"]

[alpha]
box = "debian"
using = ".base"
"#,
        )
        .unwrap();

        let config = Config::from_tree(&load_config_tree(&path).unwrap()).unwrap();
        let names: Vec<&str> = config.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", ".base", "alpha"]);
        assert_eq!(config.get("zeta").unwrap().env, vec!["X=1", "X=2"]);
        assert_eq!(config.get("alpha").unwrap().using, vec![".base"]);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.yml");
        let err = load_config_tree(&path).unwrap_err();
        assert!(format!("{err:#}").contains("absent.yml"));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.yml");
        fs::write(&path, "t1: [unclosed\n").unwrap();
        assert!(load_config_tree(&path).is_err());
    }
}
