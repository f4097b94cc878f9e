//! # Substitution Engine / 变量替换引擎
//!
//! Replaces `%name` tokens in every string leaf of a configuration tree.
//! The pass is flat: each key is replaced once, in the order the keys were
//! defined, and the text a replacement inserts is never rescanned for the
//! same key. Later keys do see text inserted by earlier ones, and a key that
//! is a prefix of another (`%a`, `%ab`) also matches inside the longer token.
//!
//! 替换配置树中每个字符串叶子里的 `%name` 标记。
//! 这是一次扁平的处理：每个键按定义顺序只替换一次，
//! 替换插入的文本不会被同一个键再次扫描。

use serde_yaml::{Mapping, Value};

/// Ordered `name -> replacement` definitions, applied in insertion order.
/// 有序的 `名称 -> 替换值` 定义，按插入顺序应用。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionMap {
    pairs: Vec<(String, String)>,
}

impl SubstitutionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition. Redefining a name keeps its original position and
    /// replaces its value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(n, _)| *n == name) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SubstitutionMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = SubstitutionMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

/// Applies every definition to a single string.
/// 将所有定义应用到单个字符串。
pub fn substitute_str(text: &str, subs: &SubstitutionMap) -> String {
    let mut result = text.to_string();
    for (name, value) in subs.iter() {
        let token = format!("%{name}");
        if result.contains(&token) {
            result = result.replace(&token, value);
        }
    }
    result
}

/// Returns a copy of `value` with every reachable string scalar substituted.
/// Mapping keys and non-string scalars are copied unchanged.
///
/// 返回 `value` 的副本，其中每个可达的字符串标量都已被替换。
/// 映射的键和非字符串标量保持不变。
pub fn substitute(value: &Value, subs: &SubstitutionMap) -> Value {
    if subs.is_empty() {
        return value.clone();
    }
    match value {
        Value::String(s) => Value::String(substitute_str(s, subs)),
        Value::Sequence(items) => {
            Value::Sequence(items.iter().map(|item| substitute(item, subs)).collect())
        }
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .iter()
                .map(|(k, v)| (k.clone(), substitute(v, subs)))
                .collect::<Mapping>(),
        ),
        Value::Tagged(tagged) => {
            let mut tagged = tagged.clone();
            tagged.value = substitute(&tagged.value, subs);
            Value::Tagged(tagged)
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
    }
}
