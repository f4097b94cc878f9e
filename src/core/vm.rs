//! # VM Lifecycle Interface / 虚拟机生命周期接口
//!
//! The engine drives virtual machines through this narrow interface only.
//! A provider hands out one handle per run; the handle brings the machine up
//! from a descriptor file and tears it down again.
//!
//! 引擎仅通过这个窄接口驱动虚拟机。
//! 提供者为每次运行分配一个句柄；句柄根据描述文件启动虚拟机并再次销毁它。

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Short box names understood without a full image reference.
/// Unknown names are used verbatim as the image reference.
/// 无需完整镜像引用即可识别的短 box 名称。未知名称将原样用作镜像引用。
pub static BASE_BOXES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("ubuntu-Lucid32", "http://files.vagrantup.com/lucid32.box"),
        ("ubuntu-lucid32", "http://files.vagrantup.com/lucid32.box"),
        ("ubuntu-lucid64", "http://files.vagrantup.com/lucid64.box"),
        ("ubuntu-precise32", "http://files.vagrantup.com/precise32.box"),
        ("ubuntu-precise64", "http://files.vagrantup.com/precise64.box"),
    ])
});

/// Failure reported by a VM backend.
/// 虚拟机后端报告的失败。
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend ran but reported failure, e.g. a provisioning script
    /// exiting non-zero.
    #[error("`{command}` finished with {status}")]
    Exit {
        command: String,
        status: String,
        output: String,
    },
}

impl BackendError {
    /// Captured output of the failed backend command.
    pub fn output(&self) -> Option<&str> {
        match self {
            BackendError::Exit { output, .. } => Some(output),
            BackendError::Spawn { .. } => None,
        }
    }
}

/// One virtual machine, as seen by a single run.
/// 单次运行所见的一台虚拟机。
#[async_trait]
pub trait VmHandle: Send + Sync {
    /// Creates and boots the machine described by `descriptor`, running the
    /// provisioning script when `provision` is set.
    async fn bring_up(&self, descriptor: &Path, provision: bool) -> Result<(), BackendError>;

    /// Destroys the machine and its backend-side state.
    async fn teardown(&self) -> Result<(), BackendError>;
}

/// Source of VM handles bound to a working directory.
/// 绑定到工作目录的虚拟机句柄来源。
pub trait VmProvider: Send + Sync {
    fn acquire(&self, workdir: &Path) -> Box<dyn VmHandle>;
}
