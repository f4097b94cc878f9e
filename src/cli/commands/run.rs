//! # Run Command Module / 运行命令模块
//!
//! This module implements the matrix run for the box-matrix CLI: it loads
//! the configuration and the descriptor template, runs every matching setup
//! and prints the reports.
//!
//! 此模块实现 box-matrix CLI 的矩阵运行：加载配置和描述文件模板，
//! 运行每个匹配的 setup 并打印报告。

use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::PathBuf;

use crate::{
    core::{
        config::load_config_tree,
        descriptor::DescriptorTemplate,
        matrix::{MatrixOptions, run_matrix},
        planner,
    },
    infra::{t, vagrant::Vagrant},
    reporting::{generate_html_report, print_failure_details, print_summary},
};

/// Arguments of a matrix run, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config: String,
    pub filter: String,
    pub definitions: Vec<(String, String)>,
    pub keep: bool,
    pub vagrant_file: Option<String>,
    pub workdir: String,
    pub vagrant: String,
    pub html: Option<String>,
    pub quiet: bool,
}

/// Executes the run command with the provided arguments.
///
/// # Returns
/// The number of failed runs, clamped to 255, to be used as the exit status.
pub async fn execute(options: RunOptions, locale: &str) -> Result<u8> {
    let config_path = expand_path(&options.config)?;
    println!(
        "{}",
        t!("loading_config", locale = locale, path = config_path.display())
    );
    let tree = load_config_tree(&config_path)?;

    let filter = planner::setup_filter(&options.filter)
        .with_context(|| t!("invalid_filter", locale = locale, pattern = &options.filter).to_string())?;

    let template = match &options.vagrant_file {
        Some(path) => DescriptorTemplate::load(&expand_path(path)?)?,
        None => DescriptorTemplate::default(),
    };

    let workdir = expand_path(&options.workdir)?;
    fs::create_dir_all(&workdir)
        .with_context(|| t!("workdir_create_failed", locale = locale, path = workdir.display()).to_string())?;

    let matrix_options = MatrixOptions {
        filter,
        substitutions: options.definitions.into_iter().collect(),
        retain: options.keep,
        template,
        workdir,
    };
    let provider = Vagrant::new(options.vagrant).echo(!options.quiet);

    let report = run_matrix(&tree, &matrix_options, &provider)
        .await
        .with_context(|| t!("config_invalid", locale = locale).to_string())?;

    print_summary(&report, locale);
    print_failure_details(&report, locale);

    if let Some(html) = &options.html {
        let report_path = expand_path(html)?;
        println!(
            "\n{}",
            t!("html_report.generating", locale = locale, path = report_path.display())
        );
        if let Err(e) = generate_html_report(&report, &report_path, locale) {
            eprintln!("{} {:#}", t!("html_report.failed", locale = locale).red(), e);
        }
    }

    Ok(u8::try_from(report.errors()).unwrap_or(u8::MAX))
}

/// Expands `~` and environment variables in a path argument.
fn expand_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path).with_context(|| format!("failed to expand path: {path}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}
