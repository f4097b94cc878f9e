//! # HTML Reporting Module / HTML 报告模块
//!
//! Renders a standalone HTML page with the matrix totals and one row per run.
//! Failed runs carry their error message and captured backend output in a
//! collapsible block.
//!
//! 渲染一个独立的 HTML 页面，包含矩阵总计和每次运行的一行。
//! 失败的运行在可折叠块中附带其错误消息和捕获的后端输出。

use anyhow::{Context, Result};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;

use crate::core::matrix::MatrixReport;
use crate::core::models::RunResult;
use crate::infra::t;

const HTML_STYLE: &str = r#"
body { font-family: sans-serif; margin: 2em; color: #222; }
.summary-container { display: flex; gap: 2em; margin-bottom: 1.5em; }
.summary-item { display: flex; flex-direction: column; align-items: center; }
.summary-item .count { font-size: 2em; font-weight: bold; }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid #ddd; padding: 0.4em 0.8em; text-align: left; vertical-align: top; }
.status-passed { color: #1a7f37; }
.status-failed { color: #cf222e; }
.status-retained { color: #9a6700; }
.duration-cell { text-align: right; }
pre.output-content { background: #f6f8fa; padding: 0.8em; overflow-x: auto; }
"#;

/// Writes the HTML report of `report` to `output_path`.
///
/// 将 `report` 的 HTML 报告写入 `output_path`。
///
/// # Errors / 错误
/// Fails if the file cannot be written.
/// 如果无法写入文件则失败。
pub fn generate_html_report(report: &MatrixReport, output_path: &Path, locale: &str) -> Result<()> {
    let markup = render_report(report, locale);
    fs::write(output_path, markup.into_string())
        .with_context(|| format!("failed to write HTML report {}", output_path.display()))
}

/// Renders the report page.
/// 渲染报告页面。
pub fn render_report(report: &MatrixReport, locale: &str) -> Markup {
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let retained = report.results.iter().filter(|r| r.is_retained()).count();

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("html_report.title", locale = locale)) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (t!("html_report.main_header", locale = locale)) }
                p { (t!("html_report.generated_at", locale = locale, time = &generated_at)) }
                div class="summary-container" {
                    (summary_item(report.total(), &t!("html_report.summary.total", locale = locale), ""))
                    (summary_item(report.successes(), &t!("html_report.summary.passed", locale = locale), "status-passed"))
                    (summary_item(report.errors(), &t!("html_report.summary.failed", locale = locale), "status-failed"))
                    (summary_item(retained, &t!("html_report.summary.retained", locale = locale), "status-retained"))
                }
                table {
                    thead {
                        tr {
                            th { (t!("html_report.table.run", locale = locale)) }
                            th { (t!("html_report.table.box", locale = locale)) }
                            th { (t!("html_report.table.environment", locale = locale)) }
                            th { (t!("html_report.table.status", locale = locale)) }
                            th class="duration-cell" { (t!("html_report.table.duration", locale = locale)) }
                        }
                    }
                    tbody {
                        @for result in &report.results {
                            (result_row(result, locale))
                        }
                    }
                }
            }
        }
    }
}

fn summary_item(count: usize, label: &str, class: &str) -> Markup {
    html! {
        div class="summary-item" {
            span class={ "count " (class) } { (count) }
            span class="label" { (label) }
        }
    }
}

fn result_row(result: &RunResult, locale: &str) -> Markup {
    let run = result.run();
    let env = run
        .env
        .iter()
        .filter(|line| !line.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("; ");

    html! {
        tr {
            td { code { (run.id) } }
            td { (run.box_ref) }
            td { code { (env) } }
            td class=(result.get_status_class()) {
                (result.get_status_str(locale))
                @if let RunResult::Failed { message, output, .. } = result {
                    details {
                        summary { (t!("html_report.toggle_output", locale = locale)) }
                        pre class="output-content" {
                            (message) "\n\n" (output)
                        }
                    }
                }
            }
            td class="duration-cell" { (format!("{:.2}s", result.get_duration().as_secs_f64())) }
        }
    }
}
