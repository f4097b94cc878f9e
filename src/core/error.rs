//! # Error Types / 错误类型
//!
//! Configuration errors are fatal and abort the whole invocation before any
//! virtual machine is touched. Run errors are isolated to a single run and
//! only ever turn into an error-count increment.
//!
//! 配置错误是致命的，会在触及任何虚拟机之前中止整个调用。
//! 运行错误仅限于单次运行，只会使错误计数加一。

use std::path::PathBuf;
use thiserror::Error;

use crate::core::vm::BackendError;

/// Errors raised while loading, validating or resolving the configuration tree.
/// 加载、验证或解析配置树时产生的错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The requested setup does not exist, or names a fragment.
    #[error("unknown setup '{0}'")]
    UnknownSetup(String),

    /// A `using` list references an entry that does not exist.
    #[error("setup '{setup}' uses unknown facet '{facet}'")]
    UnknownFacet { setup: String, facet: String },

    /// Fragments are never provisioned, so they may not name a box.
    #[error("fragment '{0}' cannot have a 'box' field")]
    FragmentHasBox(String),

    /// Every setup must name the box it provisions.
    #[error("setup '{0}' has no 'box' field")]
    MissingBox(String),

    #[error("configuration root must be a mapping of entries")]
    InvalidRoot,

    #[error("entry names must be strings, found {0}")]
    InvalidName(String),

    #[error("entry '{0}' must be a mapping")]
    InvalidEntry(String),

    /// A field holds something other than a scalar or a sequence of scalars.
    #[error("field '{field}' of entry '{entry}' must be a string or a sequence of strings")]
    InvalidField { entry: String, field: String },
}

/// Errors that end a single run. The matrix carries on with the next run.
/// 结束单次运行的错误。矩阵会继续执行下一次运行。
#[derive(Error, Debug)]
pub enum RunError {
    /// A transient artifact could not be written before bring-up.
    #[error("failed to write {}: {source}", .path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("provisioning failed: {0}")]
    ProvisioningFailed(#[source] BackendError),

    /// Provisioning succeeded but the machine could not be destroyed.
    #[error("teardown failed: {0}")]
    TeardownFailed(#[source] BackendError),
}

impl RunError {
    /// Backend output captured for this failure, if any.
    /// 此次失败捕获的后端输出（如果有）。
    pub fn output(&self) -> Option<&str> {
        match self {
            RunError::ProvisioningFailed(e) | RunError::TeardownFailed(e) => e.output(),
            RunError::Artifact { .. } => None,
        }
    }
}
