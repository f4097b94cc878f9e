//! # Configuration Module / 配置模块
//!
//! A configuration file maps entry names to entry bodies. Names starting with
//! [`FRAGMENT_MARKER`] are fragments: reusable facets that are never run on
//! their own. Every other name is a setup, which must name the box it
//! provisions.
//!
//! 配置文件将条目名称映射到条目内容。以 [`FRAGMENT_MARKER`] 开头的名称是片段：
//! 可复用的 facet，从不单独运行。其他名称都是 setup，必须指定其要配置的 box。
//!
//! The raw [`ConfigTree`] is what the substitution pass works on. Once
//! substituted it is turned into a typed [`Config`], where each [`Entry`]
//! carries its [`EntryKind`].

use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::core::error::ConfigError;
use crate::core::substitution::{self, SubstitutionMap};

/// Names starting with this character are fragments.
/// 以此字符开头的名称是片段。
pub const FRAGMENT_MARKER: char = '.';

/// Configuration file looked up when none is given on the command line.
pub const DEFAULT_CONFIG: &str = ".box-matrix.yml";

const BOX_FIELD: &str = "box";

/// The untyped configuration document, in declaration order.
/// 未类型化的配置文档，保持声明顺序。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    root: Mapping,
}

impl ConfigTree {
    /// Wraps an already parsed document. A null document is an empty tree.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Mapping(root) => Ok(Self { root }),
            _ => Err(ConfigError::InvalidRoot),
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_yaml::from_str(text).context("invalid YAML configuration")?;
        Ok(Self::from_value(value)?)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(text).context("invalid TOML configuration")?;
        let value = serde_yaml::to_value(table).context("unrepresentable TOML configuration")?;
        Ok(Self::from_value(value)?)
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.root
    }

    /// Returns a new tree with `subs` applied to every string leaf.
    /// 返回一棵新树，其中每个字符串叶子都应用了 `subs`。
    pub fn substitute(&self, subs: &SubstitutionMap) -> ConfigTree {
        let root = self
            .root
            .iter()
            .map(|(name, body)| (name.clone(), substitution::substitute(body, subs)))
            .collect();
        ConfigTree { root }
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

/// Reads a configuration file. `.toml` files are parsed as TOML, everything
/// else as YAML.
///
/// 读取配置文件。`.toml` 文件按 TOML 解析，其他文件按 YAML 解析。
pub fn load_config_tree(path: &Path) -> Result<ConfigTree> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration {}", path.display()))?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let tree = if is_toml {
        ConfigTree::from_toml_str(&text)
    } else {
        ConfigTree::from_yaml_str(&text)
    };
    tree.with_context(|| format!("failed to load configuration {}", path.display()))
}

/// Whether an entry is a reusable fragment or a runnable setup.
/// 条目是可复用的片段还是可运行的 setup。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Fragment,
    Setup,
}

impl EntryKind {
    pub fn of(name: &str) -> Self {
        if name.starts_with(FRAGMENT_MARKER) {
            EntryKind::Fragment
        } else {
            EntryKind::Setup
        }
    }
}

/// A typed configuration entry.
/// 类型化的配置条目。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
    /// Box name or image reference. Always set for setups, never for fragments.
    pub box_name: Option<String>,
    /// Facets composed before this entry, in order.
    pub using: Vec<String>,
    /// Environment variants; one is picked per run. Defaults to a single empty line.
    pub env: Vec<String>,
    /// Steps run as the provisioning user.
    pub install: Vec<String>,
    /// Steps run as the unprivileged user.
    pub script: Vec<String>,
    /// Provider customization arguments.
    pub customize: Vec<String>,
}

impl Entry {
    pub fn is_fragment(&self) -> bool {
        self.kind == EntryKind::Fragment
    }

    pub fn is_setup(&self) -> bool {
        self.kind == EntryKind::Setup
    }

    fn parse(name: String, body: &Value) -> Result<Self, ConfigError> {
        let empty = Mapping::new();
        let fields = match body {
            Value::Null => &empty,
            Value::Mapping(fields) => fields,
            _ => return Err(ConfigError::InvalidEntry(name)),
        };
        let kind = EntryKind::of(&name);

        let box_name = match fields.get(BOX_FIELD) {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                scalar_to_string(value).ok_or_else(|| ConfigError::InvalidField {
                    entry: name.clone(),
                    field: BOX_FIELD.to_string(),
                })?,
            ),
        };
        if kind == EntryKind::Setup && box_name.is_none() {
            return Err(ConfigError::MissingBox(name));
        }

        let using = string_list(&name, fields, "using")?.unwrap_or_default();
        let env = string_list(&name, fields, "env")?.unwrap_or_else(|| vec![String::new()]);
        let install = string_list(&name, fields, "install")?.unwrap_or_default();
        let script = string_list(&name, fields, "script")?.unwrap_or_default();
        let customize = string_list(&name, fields, "customize")?.unwrap_or_default();

        Ok(Entry {
            name,
            kind,
            box_name,
            using,
            env,
            install,
            script,
            customize,
        })
    }
}

/// Reads a field holding either one scalar or a sequence of scalars.
/// A missing or null field is `None`.
fn string_list(entry: &str, fields: &Mapping, field: &str) -> Result<Option<Vec<String>>, ConfigError> {
    let invalid = || ConfigError::InvalidField {
        entry: entry.to_string(),
        field: field.to_string(),
    };
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Sequence(items)) => items
            .iter()
            .map(|item| scalar_to_string(item).ok_or_else(invalid))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(value) => scalar_to_string(value).map(|s| Some(vec![s])).ok_or_else(invalid),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// The validated, typed configuration.
/// 经过验证的类型化配置。
#[derive(Debug, Clone, Default)]
pub struct Config {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl Config {
    /// Types and validates a (substituted) tree.
    ///
    /// The fragment check runs over the whole tree first, so a fragment
    /// declaring a box is reported even when another entry is malformed.
    ///
    /// 对（已替换的）树进行类型化和验证。
    pub fn from_tree(tree: &ConfigTree) -> Result<Self, ConfigError> {
        let mut named = Vec::with_capacity(tree.len());
        for (key, body) in tree.as_mapping() {
            let name = match key {
                Value::String(name) => name.clone(),
                other => return Err(ConfigError::InvalidName(describe_key(other))),
            };
            named.push((name, body));
        }

        for (name, body) in &named {
            if EntryKind::of(name) == EntryKind::Fragment
                && body.as_mapping().is_some_and(|m| m.contains_key(BOX_FIELD))
            {
                return Err(ConfigError::FragmentHasBox(name.clone()));
            }
        }

        let mut config = Config::default();
        for (name, body) in named {
            let entry = Entry::parse(name, body)?;
            config.index.insert(entry.name.clone(), config.entries.len());
            config.entries.push(entry);
        }
        log::debug!(
            "loaded {} entries ({} setups)",
            config.entries.len(),
            config.setups().count()
        );
        Ok(config)
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// All entries in declaration order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Runnable entries in declaration order.
    pub fn setups(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|entry| entry.is_setup())
    }
}

fn describe_key(key: &Value) -> String {
    match serde_yaml::to_string(key) {
        Ok(text) => text.trim().to_string(),
        Err(_) => format!("{key:?}"),
    }
}
