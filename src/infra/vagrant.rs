//! # Vagrant Backend / Vagrant 后端
//!
//! Implements the VM lifecycle interface by driving the `vagrant` command
//! line tool inside the working directory of the matrix.
//!
//! 通过在矩阵的工作目录中驱动 `vagrant` 命令行工具来实现虚拟机生命周期接口。

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::process::Command;

use crate::core::descriptor::DESCRIPTOR_FILE;
use crate::core::vm::{BackendError, VmHandle, VmProvider};
use crate::infra::command::{display_command, spawn_and_capture};

/// Program used unless overridden.
pub const DEFAULT_PROGRAM: &str = "vagrant";

/// Environment variable naming the descriptor file Vagrant reads.
pub const VAGRANTFILE_VAR: &str = "VAGRANT_VAGRANTFILE";

/// Hands out [`VagrantMachine`] handles.
/// 分配 [`VagrantMachine`] 句柄。
#[derive(Debug, Clone)]
pub struct Vagrant {
    program: String,
    echo: bool,
}

impl Default for Vagrant {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl Vagrant {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            echo: true,
        }
    }

    /// Whether backend output is printed live in addition to being captured.
    pub fn echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }
}

impl VmProvider for Vagrant {
    fn acquire(&self, workdir: &Path) -> Box<dyn VmHandle> {
        Box::new(VagrantMachine {
            program: self.program.clone(),
            root: workdir.to_path_buf(),
            descriptor: Mutex::new(OsString::from(DESCRIPTOR_FILE)),
            echo: self.echo,
        })
    }
}

/// The machine described by the `Vagrantfile` of one working directory.
/// 由某个工作目录中的 `Vagrantfile` 描述的虚拟机。
///
/// Every command it runs names the descriptor through `VAGRANT_VAGRANTFILE`,
/// so a value exported by the caller never redirects `destroy` elsewhere.
#[derive(Debug)]
pub struct VagrantMachine {
    program: String,
    root: PathBuf,
    /// File name of the descriptor inside `root`; set again by `bring_up`.
    descriptor: Mutex<OsString>,
    echo: bool,
}

impl VagrantMachine {
    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .current_dir(&self.root)
            .env(VAGRANTFILE_VAR, self.descriptor_name())
            .kill_on_drop(true);
        cmd
    }

    fn descriptor_name(&self) -> OsString {
        self.descriptor
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    async fn run(&self, cmd: Command) -> Result<(), BackendError> {
        let command = display_command(&cmd);
        log::debug!("running `{command}` in {}", self.root.display());
        let (status, output) = spawn_and_capture(cmd, self.echo).await;
        let status = status.map_err(|source| BackendError::Spawn {
            command: command.clone(),
            source,
        })?;
        if status.success() {
            Ok(())
        } else {
            Err(BackendError::Exit {
                command,
                status: status.to_string(),
                output,
            })
        }
    }
}

#[async_trait]
impl VmHandle for VagrantMachine {
    async fn bring_up(&self, descriptor: &Path, provision: bool) -> Result<(), BackendError> {
        let provision_flag = if provision { "--provision" } else { "--no-provision" };
        if let Some(name) = descriptor.file_name() {
            *self
                .descriptor
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()) = name.to_os_string();
        }
        self.run(self.command(&["up", provision_flag])).await
    }

    async fn teardown(&self) -> Result<(), BackendError> {
        self.run(self.command(&["destroy", "-f"])).await
    }
}
