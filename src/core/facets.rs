//! # Facet Resolver / Facet 解析器
//!
//! A setup is composed from the facets named in its `using` list, in the
//! order they are listed, followed by the setup itself. Composition is one
//! level deep: the `using` list of a composed facet is not followed.
//!
//! 一个 setup 由其 `using` 列表中按顺序列出的 facet 组成，最后是 setup 本身。
//! 组合只有一层：被组合的 facet 自身的 `using` 列表不会被展开。

use crate::core::config::{Config, Entry};
use crate::core::error::ConfigError;
use crate::core::vm::BASE_BOXES;

/// The ordered facets composing one setup. The setup is always last.
/// 组成一个 setup 的有序 facet 列表。setup 总是在最后。
#[derive(Debug, Clone)]
pub struct FacetChain<'a> {
    facets: Vec<&'a Entry>,
}

impl<'a> FacetChain<'a> {
    /// The setup this chain was resolved for.
    pub fn setup(&self) -> &'a Entry {
        // `resolve` always pushes the setup, so the chain is never empty.
        self.facets[self.facets.len() - 1]
    }

    pub fn facets(&self) -> &[&'a Entry] {
        &self.facets
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Entry> + '_ {
        self.facets.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.facets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// The image reference to provision, with base-box aliases resolved.
    pub fn box_ref(&self) -> &'a str {
        resolve_box(self.setup().box_name.as_deref().unwrap_or_default())
    }
}

/// Resolves the facet chain of `setup_name`.
///
/// # Errors
/// * [`ConfigError::UnknownSetup`] if no setup has this name.
/// * [`ConfigError::UnknownFacet`] if a `using` entry does not exist.
///
/// 解析 `setup_name` 的 facet 链。
pub fn resolve<'a>(config: &'a Config, setup_name: &str) -> Result<FacetChain<'a>, ConfigError> {
    let setup = config
        .get(setup_name)
        .filter(|entry| entry.is_setup())
        .ok_or_else(|| ConfigError::UnknownSetup(setup_name.to_string()))?;

    let mut facets = Vec::with_capacity(setup.using.len() + 1);
    for facet_name in &setup.using {
        let facet = config
            .get(facet_name)
            .ok_or_else(|| ConfigError::UnknownFacet {
                setup: setup.name.clone(),
                facet: facet_name.clone(),
            })?;
        facets.push(facet);
    }
    facets.push(setup);

    log::trace!(
        "{} resolves to [{}]",
        setup.name,
        facets.iter().map(|f| f.name.as_str()).collect::<Vec<_>>().join(", ")
    );
    Ok(FacetChain { facets })
}

/// Maps a base-box alias to its image reference, or returns `name` unchanged.
/// 将基础 box 别名映射到其镜像引用，否则原样返回 `name`。
pub fn resolve_box(name: &str) -> &str {
    BASE_BOXES.get(name).copied().unwrap_or(name)
}
