//! # Run Execution Module / 运行执行模块
//!
//! Drives a single run through its VM lifecycle:
//!
//! `Init → ScriptWritten → DescriptorWritten → Provisioning → {Succeeded, Failed} → CleanedUp | Retained`
//!
//! A run that provisions successfully is always torn down. A failed run is
//! either torn down as well or, when retention is requested, left running
//! together with its script and descriptor so it can be inspected.
//!
//! 驱动单次运行完成其虚拟机生命周期。
//! 配置成功的运行总是会被销毁。失败的运行要么同样被销毁，
//! 要么在请求保留时连同脚本和描述文件一起保留，以便检查。

use std::path::{Path, PathBuf};

use crate::core::descriptor::{DESCRIPTOR_FILE, DescriptorTemplate, STATE_DIR};
use crate::core::error::RunError;
use crate::core::models::{Run, RunState};
use crate::core::vm::VmProvider;
use crate::infra::fs::discard;

/// Everything a run needs besides the run itself.
/// 单次运行除自身之外所需的一切。
#[derive(Debug, Clone, Copy)]
pub struct RunContext<'a> {
    /// Directory holding the script, the descriptor and the VM state.
    pub workdir: &'a Path,
    pub template: &'a DescriptorTemplate,
    /// Keep a failed machine alive instead of destroying it.
    pub retain: bool,
}

/// Paths of the transient artifacts of one run.
struct Artifacts {
    script: PathBuf,
    descriptor: PathBuf,
    state_dir: PathBuf,
}

impl Artifacts {
    fn new(run: &Run, workdir: &Path) -> Self {
        Self {
            script: workdir.join(run.script_file()),
            descriptor: workdir.join(DESCRIPTOR_FILE),
            state_dir: workdir.join(STATE_DIR),
        }
    }

    /// Removes the script and the descriptor. The state directory goes too
    /// unless the machine may still exist, in which case the backend needs it
    /// to find the machine again.
    fn clean(&self, machine_gone: bool) {
        discard(&self.script);
        discard(&self.descriptor);
        if machine_gone {
            discard(&self.state_dir);
        } else {
            log::warn!(
                "keeping {} since the machine may still be running",
                self.state_dir.display()
            );
        }
    }
}

fn enter(run: &Run, state: &mut RunState, next: RunState) {
    log::debug!("{}: {} -> {}", run.id, state, next);
    *state = next;
}

/// Executes one run against a VM provider.
///
/// # Errors
/// * [`RunError::Artifact`] if the script or descriptor cannot be written;
///   the machine is never touched in that case.
/// * [`RunError::ProvisioningFailed`] if bring-up or provisioning fails.
/// * [`RunError::TeardownFailed`] if a successfully provisioned machine
///   cannot be destroyed.
///
/// 针对虚拟机提供者执行单次运行。
pub async fn execute_run(
    run: &Run,
    ctx: &RunContext<'_>,
    provider: &dyn VmProvider,
) -> Result<(), RunError> {
    let mut state = RunState::Init;
    let artifacts = Artifacts::new(run, ctx.workdir);

    std::fs::write(&artifacts.script, &run.script.body).map_err(|source| RunError::Artifact {
        path: artifacts.script.clone(),
        source,
    })?;
    enter(run, &mut state, RunState::ScriptWritten);

    // Stale state from an earlier, interrupted run must not leak into this one.
    discard(&artifacts.descriptor);
    discard(&artifacts.state_dir);

    let descriptor = ctx
        .template
        .render(&run.box_ref, &run.script.customize, &run.script_file());
    if let Err(source) = std::fs::write(&artifacts.descriptor, descriptor) {
        if !ctx.retain {
            artifacts.clean(true);
        }
        return Err(RunError::Artifact {
            path: artifacts.descriptor.clone(),
            source,
        });
    }
    enter(run, &mut state, RunState::DescriptorWritten);

    let machine = provider.acquire(ctx.workdir);
    enter(run, &mut state, RunState::Provisioning);

    match machine.bring_up(&artifacts.descriptor, true).await {
        Ok(()) => {
            enter(run, &mut state, RunState::Succeeded);
            let teardown = machine.teardown().await;
            artifacts.clean(teardown.is_ok());
            enter(run, &mut state, RunState::CleanedUp);
            teardown.map_err(RunError::TeardownFailed)
        }
        Err(error) => {
            enter(run, &mut state, RunState::Failed);
            if ctx.retain {
                log::info!(
                    "{}: keeping the machine and {} for inspection",
                    run.id,
                    artifacts.script.display()
                );
                enter(run, &mut state, RunState::Retained);
            } else {
                let teardown = machine.teardown().await;
                if let Err(e) = &teardown {
                    log::warn!("{}: teardown after failed provisioning failed: {e}", run.id);
                }
                artifacts.clean(teardown.is_ok());
                enter(run, &mut state, RunState::CleanedUp);
            }
            Err(RunError::ProvisioningFailed(error))
        }
    }
}
