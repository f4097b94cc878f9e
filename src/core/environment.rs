//! # Environment Expander / 环境展开器
//!
//! Each facet of a chain offers a list of environment variants. A run picks
//! one variant per facet, so the runs of a setup are the Cartesian product of
//! those lists. Combinations are numbered in odometer order, the last facet
//! varying fastest; combination `i` becomes run `"{setup}-{i}"`.
//!
//! 链中的每个 facet 提供一个环境变体列表。每次运行为每个 facet 选择一个变体，
//! 因此一个 setup 的所有运行就是这些列表的笛卡尔积。组合按里程表顺序编号，
//! 最后一个 facet 变化最快；第 `i` 个组合对应运行 `"{setup}-{i}"`。

use crate::core::facets::FacetChain;

/// One environment line per facet, in chain order.
/// 每个 facet 一行环境设置，按链的顺序排列。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination<'a> {
    pub index: usize,
    pub lines: Vec<&'a str>,
}

/// The lazily evaluated product of a chain's environment lists.
/// 链中环境列表的惰性笛卡尔积。
#[derive(Debug, Clone)]
pub struct Combinations<'a> {
    axes: Vec<&'a [String]>,
    len: usize,
}

/// Expands the environment variants of `chain`.
pub fn expand<'a>(chain: &FacetChain<'a>) -> Combinations<'a> {
    Combinations::new(chain.iter().map(|facet| facet.env.as_slice()).collect())
}

impl<'a> Combinations<'a> {
    fn new(axes: Vec<&'a [String]>) -> Self {
        let len = axes
            .iter()
            .try_fold(1usize, |acc, axis| acc.checked_mul(axis.len()))
            .unwrap_or(usize::MAX);
        Self { axes, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns combination `index` without walking the ones before it.
    pub fn get(&self, index: usize) -> Option<Combination<'a>> {
        if index >= self.len {
            return None;
        }
        let mut rest = index;
        let mut lines = vec![""; self.axes.len()];
        for (slot, axis) in lines.iter_mut().zip(self.axes.iter().copied()).rev() {
            *slot = axis[rest % axis.len()].as_str();
            rest /= axis.len();
        }
        Some(Combination { index, lines })
    }

    /// Iterates all combinations in order. Each call starts over.
    pub fn iter(&self) -> CombinationIter<'_, 'a> {
        CombinationIter {
            combinations: self,
            counters: vec![0; self.axes.len()],
            next_index: 0,
        }
    }
}

impl<'c, 'a> IntoIterator for &'c Combinations<'a> {
    type Item = Combination<'a>;
    type IntoIter = CombinationIter<'c, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Odometer over a [`Combinations`] set.
pub struct CombinationIter<'c, 'a> {
    combinations: &'c Combinations<'a>,
    counters: Vec<usize>,
    next_index: usize,
}

impl<'a> Iterator for CombinationIter<'_, 'a> {
    type Item = Combination<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_index >= self.combinations.len {
            return None;
        }
        let axes = &self.combinations.axes;
        let lines = self
            .counters
            .iter()
            .zip(axes.iter().copied())
            .map(|(&i, axis)| axis[i].as_str())
            .collect();
        let combination = Combination {
            index: self.next_index,
            lines,
        };

        self.next_index += 1;
        for (counter, axis) in self.counters.iter_mut().zip(axes.iter()).rev() {
            *counter += 1;
            if *counter < axis.len() {
                break;
            }
            *counter = 0;
        }
        Some(combination)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.combinations.len - self.next_index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CombinationIter<'_, '_> {}
