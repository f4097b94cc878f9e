//! # Console Reporting Module / 控制台报告模块
//!
//! Prints the per-run summary table, the details of failed runs and the
//! final success count.
//!
//! 打印每次运行的摘要表格、失败运行的详细信息以及最终的成功计数。

use colored::*;

use crate::core::matrix::MatrixReport;
use crate::core::models::RunResult;
use crate::infra::t;

/// Prints a formatted summary of the matrix to the console, ending with the
/// `"N out of M successful runs"` line.
///
/// 在控制台打印格式化的矩阵摘要，以 `"N out of M successful runs"` 行结尾。
///
/// # Output Format / 输出格式
/// ```text
/// --- Matrix Summary ---
///   - Passed     | t1-0                       | ubuntu                         |      12.31s
///   - Failed     | t1-1                       | ubuntu                         |       8.02s
///
/// 1 out of 2 successful runs
/// ```
pub fn print_summary(report: &MatrixReport, locale: &str) {
    if !report.results.is_empty() {
        println!("\n{}", t!("summary.banner", locale = locale).bold());
    }

    for result in &report.results {
        let status_str = result.get_status_str(locale);
        let status_colored = match result {
            RunResult::Passed { .. } => status_str.green(),
            RunResult::Failed { retained: true, .. } => status_str.yellow(),
            RunResult::Failed { .. } => status_str.red(),
        };
        println!(
            "  - {:<10} | {:<26} | {:<30} | {:>10}",
            status_colored,
            result.run_id(),
            result.run().box_ref,
            format!("{:.2?}", result.get_duration())
        );
    }

    let line = t!(
        "summary.final",
        locale = locale,
        successes = report.successes(),
        total = report.total()
    );
    if report.errors() == 0 {
        println!("\n{}", line.green().bold());
    } else {
        println!("\n{}", line.red().bold());
    }
}

/// Prints what went wrong in each failed run: the error, the environment it
/// ran with and the captured backend output.
///
/// 打印每次失败运行的问题：错误、运行时的环境以及捕获的后端输出。
pub fn print_failure_details(report: &MatrixReport, locale: &str) {
    let failures: Vec<_> = report.failures().collect();
    if failures.is_empty() {
        return;
    }

    println!("\n{}", t!("summary.failure_banner", locale = locale).red().bold());
    println!("{}", "-".repeat(80));

    for (i, result) in failures.iter().enumerate() {
        let RunResult::Failed {
            run,
            message,
            output,
            ..
        } = result
        else {
            continue;
        };
        println!(
            "[{}/{}] {} '{}'",
            i + 1,
            failures.len(),
            t!("summary.failure_header", locale = locale).red(),
            run.id.cyan()
        );
        println!("  {message}");

        let env: Vec<&str> = run
            .env
            .iter()
            .map(String::as_str)
            .filter(|line| !line.is_empty())
            .collect();
        if !env.is_empty() {
            println!("  {} {}", t!("summary.environment", locale = locale).yellow(), env.join("; "));
        }
        if !output.trim().is_empty() {
            println!("\n--- {} ---\n", t!("summary.backend_log", locale = locale).yellow());
            println!("{}", output.trim_end());
        }
        println!("\n{}", "-".repeat(80));
    }
}
