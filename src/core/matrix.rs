//! # Matrix Orchestrator / 矩阵编排器
//!
//! Runs a whole configuration: substitutes definitions, validates and plans
//! the matrix, then executes every run one after another. Run failures are
//! counted and the matrix carries on; configuration errors abort before any
//! machine is touched.
//!
//! 运行整个配置：替换定义、验证并规划矩阵，然后依次执行每次运行。
//! 运行失败会被计数且矩阵继续执行；配置错误会在触及任何虚拟机之前中止。

use colored::*;
use regex::Regex;
use std::path::PathBuf;
use std::time::Instant;

use crate::core::config::{Config, ConfigTree};
use crate::core::descriptor::DescriptorTemplate;
use crate::core::error::ConfigError;
use crate::core::execution::{RunContext, execute_run};
use crate::core::models::RunResult;
use crate::core::planner::{self, DEFAULT_FILTER, ExecutionPlan};
use crate::core::substitution::SubstitutionMap;
use crate::core::vm::VmProvider;
use crate::infra::t;

/// Inputs of a matrix invocation besides the configuration itself.
/// 除配置本身之外的矩阵调用输入。
#[derive(Debug, Clone)]
pub struct MatrixOptions {
    /// Only setups whose name matches run.
    pub filter: Regex,
    pub substitutions: SubstitutionMap,
    /// Keep failed machines alive for inspection.
    pub retain: bool,
    pub template: DescriptorTemplate,
    /// Where scripts, descriptors and VM state live.
    pub workdir: PathBuf,
}

impl Default for MatrixOptions {
    fn default() -> Self {
        Self {
            filter: planner::setup_filter(DEFAULT_FILTER).expect("default filter is valid"),
            substitutions: SubstitutionMap::new(),
            retain: false,
            template: DescriptorTemplate::default(),
            workdir: PathBuf::from("."),
        }
    }
}

/// The outcome of a matrix invocation.
/// 矩阵调用的结果。
#[derive(Debug, Default)]
pub struct MatrixReport {
    /// One result per run, in execution order.
    pub results: Vec<RunResult>,
    pub filtered_setups: usize,
    pub empty_setups: Vec<String>,
}

impl MatrixReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn errors(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    pub fn successes(&self) -> usize {
        self.total() - self.errors()
    }

    /// `(errors, total)`.
    pub fn counts(&self) -> (usize, usize) {
        (self.errors(), self.total())
    }

    pub fn failures(&self) -> impl Iterator<Item = &RunResult> {
        self.results.iter().filter(|r| r.is_failure())
    }
}

/// Validates and plans the matrix without running anything.
/// 验证并规划矩阵，但不运行任何内容。
pub fn plan_matrix(tree: &ConfigTree, options: &MatrixOptions) -> Result<ExecutionPlan, ConfigError> {
    let tree = tree.substitute(&options.substitutions);
    let config = Config::from_tree(&tree)?;
    planner::plan_execution(&config, &options.filter)
}

/// Runs every matching setup in every environment combination.
///
/// # Errors
/// A [`ConfigError`] if the configuration is invalid. Run failures are not
/// errors; they are recorded in the returned report.
///
/// 在每个环境组合中运行每个匹配的 setup。
pub async fn run_matrix(
    tree: &ConfigTree,
    options: &MatrixOptions,
    provider: &dyn VmProvider,
) -> Result<MatrixReport, ConfigError> {
    let plan = plan_matrix(tree, options)?;

    println!(
        "{}",
        t!(
            "run.plan_summary",
            runs = plan.runs.len(),
            setups = plan.matched_setups,
            filtered = plan.filtered_setups
        )
        .cyan()
    );
    for name in &plan.empty_setups {
        println!("{}", t!("run.setup_without_runs", name = name).yellow());
    }

    let ctx = RunContext {
        workdir: &options.workdir,
        template: &options.template,
        retain: options.retain,
    };

    let mut report = MatrixReport {
        results: Vec::with_capacity(plan.runs.len()),
        filtered_setups: plan.filtered_setups,
        empty_setups: plan.empty_setups,
    };
    let total = plan.runs.len();

    for (position, run) in plan.runs.into_iter().enumerate() {
        println!(
            "{}",
            t!(
                "run.starting",
                current = position + 1,
                total = total,
                id = &run.id,
                image = &run.box_ref
            )
            .blue()
        );

        let start_time = Instant::now();
        let outcome = execute_run(&run, &ctx, provider).await;
        let duration = start_time.elapsed();
        let seconds = format!("{:.2}", duration.as_secs_f64());

        match &outcome {
            Ok(()) => println!(
                "{}",
                t!("run.passed", id = &run.id, duration = &seconds).green()
            ),
            Err(e) => {
                log::error!("{}: {e}", run.id);
                println!(
                    "{}",
                    t!("run.failed", id = &run.id, duration = &seconds).red()
                );
            }
        }

        let result = RunResult::from_outcome(run, outcome, duration, options.retain);
        if result.is_retained() {
            println!(
                "{}",
                t!(
                    "run.retained",
                    id = result.run_id(),
                    path = options.workdir.display()
                )
                .yellow()
            );
        }
        report.results.push(result);
    }

    Ok(report)
}
