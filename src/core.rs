//! # Core Module / 核心模块
//!
//! This module contains the configuration resolution and execution engine
//! of box-matrix: configuration loading, substitution, facet composition,
//! environment expansion, script synthesis, and the run lifecycle.
//!
//! 此模块包含 box-matrix 的配置解析与执行引擎：
//! 配置加载、变量替换、facet 组合、环境展开、脚本合成以及运行生命周期。

pub mod config;
pub mod descriptor;
pub mod environment;
pub mod error;
pub mod execution;
pub mod facets;
pub mod matrix;
pub mod models;
pub mod planner;
pub mod script;
pub mod substitution;
pub mod vm;

// Re-exports
pub use config::{Config, ConfigTree};
pub use error::{ConfigError, RunError};
pub use matrix::{MatrixOptions, MatrixReport, run_matrix};
pub use models::{Run, RunResult};
