// Shared test helpers for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use box_matrix::config::ConfigTree;
use box_matrix::core::descriptor::STATE_DIR;
use box_matrix::core::vm::{BackendError, VmHandle, VmProvider};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A backend call observed by [`RecordingProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    BringUp { descriptor: PathBuf, provision: bool },
    Teardown,
}

/// A VM provider that records every call and never starts a machine.
/// Bring-up fails for every descriptor whose box line matches `failing_box`,
/// and teardown fails when `teardown_fails` is set.
#[derive(Debug, Clone, Default)]
pub struct RecordingProvider {
    pub calls: Arc<Mutex<Vec<Call>>>,
    /// Snapshot of the workdir file names taken at bring-up time.
    pub seen_files: Arc<Mutex<Vec<Vec<String>>>>,
    pub failing_box: Option<String>,
    pub teardown_fails: bool,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(box_name: &str) -> Self {
        Self {
            failing_box: Some(box_name.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn teardown_count(&self) -> usize {
        self.calls().iter().filter(|c| **c == Call::Teardown).count()
    }

    pub fn bring_up_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::BringUp { .. }))
            .count()
    }
}

impl VmProvider for RecordingProvider {
    fn acquire(&self, workdir: &Path) -> Box<dyn VmHandle> {
        Box::new(RecordingMachine {
            provider: self.clone(),
            workdir: workdir.to_path_buf(),
        })
    }
}

struct RecordingMachine {
    provider: RecordingProvider,
    workdir: PathBuf,
}

#[async_trait]
impl VmHandle for RecordingMachine {
    async fn bring_up(&self, descriptor: &Path, provision: bool) -> Result<(), BackendError> {
        self.provider.calls.lock().unwrap().push(Call::BringUp {
            descriptor: descriptor.to_path_buf(),
            provision,
        });
        let mut names: Vec<String> = std::fs::read_dir(&self.workdir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        self.provider.seen_files.lock().unwrap().push(names);
        // Like a real backend, leave machine state next to the descriptor.
        std::fs::create_dir_all(self.workdir.join(STATE_DIR)).unwrap();

        let text = std::fs::read_to_string(descriptor).unwrap_or_default();
        match &self.provider.failing_box {
            Some(name) if text.contains(&format!("config.vm.box = \"{name}\"")) => {
                Err(BackendError::Exit {
                    command: "vagrant up --provision".to_string(),
                    status: "exit status: 1".to_string(),
                    output: "provisioning script failed".to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    async fn teardown(&self) -> Result<(), BackendError> {
        self.provider.calls.lock().unwrap().push(Call::Teardown);
        if self.provider.teardown_fails {
            return Err(BackendError::Exit {
                command: "vagrant destroy -f".to_string(),
                status: "exit status: 1".to_string(),
                output: "machine is locked".to_string(),
            });
        }
        Ok(())
    }
}

/// Parses a YAML configuration used by a test.
pub fn tree(yaml: &str) -> ConfigTree {
    ConfigTree::from_yaml_str(yaml).expect("test configuration should parse")
}

/// The configuration of the end-to-end scenario: one fragment and one
/// setup expanding to two runs.
pub const SCENARIO_A: &str = r#"
.base:
  install: ["echo A"]
t1:
  box: ubuntu
  using: .base
  env: ["X=1", "X=2"]
  script: ["run-tests"]
"#;

/// Lists the file names in `dir`, sorted.
pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Name of the log a fake backend appends its invocations to.
pub const BACKEND_LOG: &str = "backend-calls.log";

/// Writes an executable shell script standing in for the `vagrant` program.
///
/// Every invocation appends one line to `dir/BACKEND_LOG`: the arguments,
/// then the `VAGRANT_VAGRANTFILE` it saw. `body` runs afterwards, inside the
/// work directory the backend was started in.
///
/// 写入一个代替 `vagrant` 程序的可执行 shell 脚本。
/// 每次调用都会在 `dir/BACKEND_LOG` 中追加一行：参数以及它看到的 `VAGRANT_VAGRANTFILE`。
pub fn fake_backend(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake-vagrant");
    let log = dir.join(BACKEND_LOG);
    let script = format!(
        "#!/bin/sh\necho \"$* VAGRANT_VAGRANTFILE=$VAGRANT_VAGRANTFILE\" >> '{}'\n{body}\n",
        log.display()
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// The invocations recorded by [`fake_backend`] in `dir`, oldest first.
pub fn backend_calls(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join(BACKEND_LOG))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
