//! Run-status records produced by the execution engine.
//!
//! The engine never derives or validates statuses itself; records arrive from
//! an external poller or stream and are mirrored onto nodes by the
//! [`ExecutionOverlay`].

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

mod overlay;

pub use overlay::ExecutionOverlay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    #[default]
    Default,
    Scheduled,
    InProgress,
    Completed,
    Failed,
    Canceled,
    Terminated,
    Paused,
    TimedOut,
}

impl ExecutionStatus {
    /// The task will not change status again in this run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::Completed
                | ExecutionStatus::Failed
                | ExecutionStatus::Canceled
                | ExecutionStatus::Terminated
                | ExecutionStatus::TimedOut
        )
    }

    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::Scheduled | ExecutionStatus::InProgress | ExecutionStatus::Paused
        )
    }
}

/// One status record for one task of one workflow run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionTask {
    #[serde(alias = "referenceTaskName")]
    pub task_reference_name: String,
    #[serde(
        default,
        alias = "workflowInstanceId",
        skip_serializing_if = "Option::is_none"
    )]
    pub instance_id: Option<String>,
    #[serde(default)]
    pub status: ExecutionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iteration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_for_incompletion: Option<String>,
}

impl ExecutionTask {
    pub fn new(reference: impl Into<String>, status: ExecutionStatus) -> Self {
        Self {
            task_reference_name: reference.into(),
            instance_id: None,
            status,
            task_id: None,
            iteration: None,
            start_time: None,
            end_time: None,
            update_time: None,
            output_data: None,
            reason_for_incompletion: None,
        }
    }

    pub fn with_instance(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = Some(instance_id.into());
        self
    }

    pub fn with_update_time(mut self, update_time: i64) -> Self {
        self.update_time = Some(update_time);
        self
    }

    /// Latest timestamp the record carries.
    pub fn last_activity(&self) -> Option<i64> {
        self.update_time.or(self.end_time).or(self.start_time)
    }
}

static ITERATION_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)__(\d+)$").expect("iteration suffix pattern"));

/// Splits a loop-iteration reference (`http_x__3`) into its task reference
/// and iteration number.
pub fn split_iteration(reference: &str) -> (&str, Option<u32>) {
    let Some(captures) = ITERATION_SUFFIX.captures(reference) else {
        return (reference, None);
    };
    match (captures.get(1), captures[2].parse().ok()) {
        (Some(base), Some(iteration)) => (base.as_str(), Some(iteration)),
        _ => (reference, None),
    }
}

/// An external feed of status records, polled on the caller's cadence.
pub trait ExecutionSource {
    /// Records that arrived since the previous poll.
    fn poll(&mut self) -> Vec<ExecutionTask>;
}

impl ExecutionSource for Vec<ExecutionTask> {
    fn poll(&mut self) -> Vec<ExecutionTask> {
        std::mem::take(self)
    }
}
