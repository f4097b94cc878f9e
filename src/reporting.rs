//! # Reporting Module / 报告模块
//!
//! This module handles the display of matrix results: colorful summaries
//! printed to the console and an optional standalone HTML report.
//!
//! 此模块处理矩阵结果的展示：打印到控制台的彩色摘要以及可选的独立 HTML 报告。

pub mod console;
pub mod html;

// Re-export common reporting functions
pub use console::{print_failure_details, print_summary};
pub use html::generate_html_report;
