//! # Execution Planner Module / 执行计划模块
//!
//! This module turns a validated configuration into the ordered list of runs
//! to execute: setups are filtered by name, their facet chains resolved and
//! their environment combinations expanded, and a script is synthesized for
//! every combination.
//!
//! Planning happens in full before the first run starts, so a configuration
//! error anywhere in the matrix is reported before any machine is touched.
//!
//! 此模块将经过验证的配置转换为有序的待执行运行列表：
//! 按名称过滤 setup、解析其 facet 链、展开其环境组合，并为每个组合合成脚本。
//! 规划在第一次运行开始之前全部完成，因此矩阵中任何位置的配置错误
//! 都会在触及任何虚拟机之前被报告。

use regex::Regex;

use crate::core::config::Config;
use crate::core::environment;
use crate::core::error::ConfigError;
use crate::core::facets;
use crate::core::models::Run;
use crate::core::script;

/// Filter used when none is given: every setup runs.
pub const DEFAULT_FILTER: &str = ".*";

/// Represents a complete execution plan for a matrix.
/// 表示矩阵的完整执行计划。
#[derive(Debug, Default)]
pub struct ExecutionPlan {
    /// Runs in execution order: setups in declaration order, then
    /// combinations in cross-product order.
    /// 按执行顺序排列的运行。
    pub runs: Vec<Run>,
    /// Setups whose name matched the filter.
    /// 名称匹配过滤器的 setup 数量。
    pub matched_setups: usize,
    /// Setups skipped because their name did not match.
    /// 因名称不匹配而被跳过的 setup 数量。
    pub filtered_setups: usize,
    /// Matched setups that expand to zero runs (an empty `env` list).
    /// 展开后没有任何运行的匹配 setup（空的 `env` 列表）。
    pub empty_setups: Vec<String>,
}

/// Compiles a setup filter. The pattern must match at the start of a
/// setup name.
///
/// The pattern is compiled on its own before it is anchored, so unbalanced
/// input such as `x)|(?:y` is rejected instead of closing the anchoring
/// group and matching anywhere.
///
/// 编译 setup 过滤器。模式必须从 setup 名称的开头开始匹配。
/// 模式在加锚点之前先单独编译，因此不平衡的输入会被拒绝。
pub fn setup_filter(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(pattern)?;
    Regex::new(&format!("^(?:{pattern})"))
}

/// Creates the execution plan for `config`, keeping setups matched by `filter`.
///
/// # Errors
/// Any [`ConfigError`] from facet resolution.
///
/// 为 `config` 创建执行计划，只保留被 `filter` 匹配的 setup。
pub fn plan_execution(config: &Config, filter: &Regex) -> Result<ExecutionPlan, ConfigError> {
    let mut plan = ExecutionPlan::default();

    for setup in config.setups() {
        if !filter.is_match(&setup.name) {
            plan.filtered_setups += 1;
            continue;
        }
        plan.matched_setups += 1;

        let chain = facets::resolve(config, &setup.name)?;
        let combinations = environment::expand(&chain);
        if combinations.is_empty() {
            plan.empty_setups.push(setup.name.clone());
            continue;
        }

        let box_ref = chain.box_ref();
        for combination in &combinations {
            let script = script::synthesize(&chain, &combination);
            let env = combination.lines.iter().map(|line| line.to_string()).collect();
            plan.runs
                .push(Run::new(&setup.name, combination.index, box_ref, env, script));
        }
        log::debug!(
            "{}: {} facets, {} runs on {}",
            setup.name,
            chain.len(),
            combinations.len(),
            box_ref
        );
    }

    Ok(plan)
}
