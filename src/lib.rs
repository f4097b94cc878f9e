//! # box-matrix Library / box-matrix 库
//!
//! This library provides the core functionality for the box-matrix tool,
//! a test matrix orchestrator that provisions one throwaway virtual machine
//! for every combination of box, facet chain and environment.
//!
//! 此库为 box-matrix 工具提供核心功能，
//! 这是一个测试矩阵编排器，为 box、facet 链和环境的每种组合配置一台一次性虚拟机。
//!
//! ## Modules / 模块
//!
//! - `core` - Configuration model, matrix planning and the run lifecycle
//! - `infra` - Process execution, file system helpers and the Vagrant backend
//! - `reporting` - Console and HTML reports
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 配置模型、矩阵规划和运行生命周期
//! - `infra` - 进程执行、文件系统辅助函数和 Vagrant 后端
//! - `reporting` - 控制台和 HTML 报告
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use crate::core::config;
pub use crate::core::matrix;
pub use crate::core::models;

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");

/// Picks the user interface language: an explicit choice if one was made,
/// otherwise the system locale, matched first in full ("zh-CN"), then by
/// language ("en" from "en-US"), falling back to "en".
///
/// 选择用户界面语言：如果有显式选择则使用它，否则使用系统区域设置，
/// 先完整匹配（"zh-CN"），再按语言匹配（"en-US" 中的 "en"），最后回退到 "en"。
pub fn select_locale(requested: Option<&str>) -> String {
    let locale = requested
        .map(str::to_string)
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    if available_locales.contains(&locale.as_str()) {
        return locale;
    }
    locale
        .split(['-', '_'])
        .next()
        .and_then(|lang| available_locales.iter().find(|l| l.eq_ignore_ascii_case(lang)))
        .map(|lang| lang.to_string())
        .unwrap_or_else(|| "en".to_string())
}
