//! # Data Models Module / 数据模型模块
//!
//! This module defines the run-level data structures shared by the planner,
//! the executor and the reporters: the planned [`Run`], the states it moves
//! through, and the final [`RunResult`].
//!
//! 此模块定义了规划器、执行器和报告器共享的运行级数据结构：
//! 规划好的 [`Run`]、它经历的状态以及最终的 [`RunResult`]。

use std::fmt;
use std::time::Duration;

use crate::core::error::RunError;
use crate::core::script::ProvisionScript;
use crate::infra::t;

/// One planned execution: a setup, one environment combination and the
/// script synthesized for them.
///
/// 一次规划好的执行：一个 setup、一个环境组合以及为它们合成的脚本。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// `"{setup}-{index}"`; also names the script file.
    /// `"{setup}-{index}"`；同时也是脚本文件的名称。
    pub id: String,
    pub setup: String,
    /// Position of the combination in cross-product order.
    pub index: usize,
    /// Image reference after base-box alias resolution.
    pub box_ref: String,
    /// The environment line picked for each facet, in chain order.
    pub env: Vec<String>,
    pub script: ProvisionScript,
}

impl Run {
    pub fn new(
        setup: &str,
        index: usize,
        box_ref: &str,
        env: Vec<String>,
        script: ProvisionScript,
    ) -> Self {
        Self {
            id: format!("{setup}-{index}"),
            setup: setup.to_string(),
            index,
            box_ref: box_ref.to_string(),
            env,
            script,
        }
    }

    /// File name of the transient provisioning script.
    pub fn script_file(&self) -> String {
        format!("{}.sh", self.id)
    }
}

/// The lifecycle states of a run.
/// 运行的生命周期状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    ScriptWritten,
    DescriptorWritten,
    Provisioning,
    Succeeded,
    Failed,
    /// Transient files removed and the machine destroyed.
    CleanedUp,
    /// Machine and files left in place for inspection.
    Retained,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Enumerates the possible reasons for a run failure.
/// 枚举运行失败的可能原因。
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FailureReason {
    /// The script or descriptor could not be written.
    /// 无法写入脚本或描述文件。
    Artifact,
    /// Bring-up or the provisioning script failed.
    /// 启动或配置脚本失败。
    Provisioning,
    /// The machine provisioned fine but could not be destroyed.
    /// 虚拟机配置成功但无法销毁。
    Teardown,
}

impl From<&RunError> for FailureReason {
    fn from(error: &RunError) -> Self {
        match error {
            RunError::Artifact { .. } => FailureReason::Artifact,
            RunError::ProvisioningFailed(_) => FailureReason::Provisioning,
            RunError::TeardownFailed(_) => FailureReason::Teardown,
        }
    }
}

/// Represents the final result of a single run.
/// 表示单次运行的最终结果。
#[derive(Debug, Clone)]
pub enum RunResult {
    Passed {
        run: Run,
        duration: Duration,
    },
    Failed {
        run: Run,
        reason: FailureReason,
        /// The error message, with its causes.
        message: String,
        /// Captured backend output, empty when there is none.
        output: String,
        duration: Duration,
        /// Whether the machine was kept alive for inspection.
        retained: bool,
    },
}

impl RunResult {
    /// Builds the result of a finished run.
    pub fn from_outcome(
        run: Run,
        outcome: Result<(), RunError>,
        duration: Duration,
        retain: bool,
    ) -> Self {
        match outcome {
            Ok(()) => RunResult::Passed { run, duration },
            Err(error) => {
                let reason = FailureReason::from(&error);
                RunResult::Failed {
                    run,
                    reason,
                    message: error.to_string(),
                    output: error.output().unwrap_or_default().to_string(),
                    duration,
                    // Only provisioning failures leave a live machine behind.
                    retained: retain && reason == FailureReason::Provisioning,
                }
            }
        }
    }

    pub fn run(&self) -> &Run {
        match self {
            RunResult::Passed { run, .. } | RunResult::Failed { run, .. } => run,
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run().id
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, RunResult::Failed { .. })
    }

    pub fn is_retained(&self) -> bool {
        matches!(self, RunResult::Failed { retained: true, .. })
    }

    pub fn get_duration(&self) -> Duration {
        match self {
            RunResult::Passed { duration, .. } | RunResult::Failed { duration, .. } => *duration,
        }
    }

    pub fn get_output(&self) -> &str {
        match self {
            RunResult::Passed { .. } => "",
            RunResult::Failed { output, .. } => output,
        }
    }

    /// Gets the status of the run as a localized string for display.
    /// 以本地化字符串形式获取运行状态以供显示。
    pub fn get_status_str(&self, locale: &str) -> String {
        match self {
            RunResult::Passed { .. } => t!("report.status_passed", locale = locale).to_string(),
            RunResult::Failed { retained: true, .. } => {
                t!("report.status_retained", locale = locale).to_string()
            }
            RunResult::Failed { .. } => t!("report.status_failed", locale = locale).to_string(),
        }
    }

    /// CSS class of the status cell in the HTML report.
    pub fn get_status_class(&self) -> &'static str {
        match self {
            RunResult::Passed { .. } => "status-passed",
            RunResult::Failed { retained: true, .. } => "status-retained",
            RunResult::Failed { .. } => "status-failed",
        }
    }
}
