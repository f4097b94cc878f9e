//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for box-matrix,
//! including child process execution, file system helpers and the
//! Vagrant backend, plus i18n support.
//!
//! 此模块为 box-matrix 提供基础设施服务，
//! 包括子进程执行、文件系统辅助函数和 Vagrant 后端，以及国际化支持。

pub mod command;
pub mod fs;
pub mod vagrant;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
