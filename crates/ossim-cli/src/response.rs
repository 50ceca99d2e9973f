//! Response wire format and encoding.
//!
//! Field names are camelCase. Process indices are rendered as `P<i>` labels.

use clap::ValueEnum;
use ossim_core::{
    DeadlockReport, DetectionAction, DetectionTrace, PageId, ReferenceTrace, SafetyTrace,
};
use serde::Serialize;

use crate::error::CliError;

/// Label for process `index`.
pub fn process_label(index: usize) -> String {
    format!("P{index}")
}

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON text
    #[default]
    Json,
    /// CBOR binary
    Cbor,
}

/// Response for any mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    /// `BANKER` result
    Banker(SafetyResponse),
    /// `DEADLOCK` result
    Deadlock(DeadlockResponse),
    /// `DEADLOCK_MATRIX` result
    Detection(DetectionResponse),
    /// `MEMORY` result
    Memory(MemoryResponse),
}

impl Response {
    /// Encode the whole response. JSON is pretty-printed unless `compact`.
    pub fn encode(&self, format: OutputFormat, compact: bool) -> Result<Vec<u8>, CliError> {
        let mut out = Vec::new();
        match format {
            OutputFormat::Json if compact => serde_json::to_writer(&mut out, self)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut out, self)?;
                out.push(b'\n');
            },
            OutputFormat::Cbor => ciborium::into_writer(self, &mut out)?,
        }
        Ok(out)
    }
}

/// One Banker's admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyStepResponse {
    /// Admitted process label
    pub process: String,
    /// Work vector before release
    pub work_before: Vec<i64>,
    /// Work vector after release
    pub work_after: Vec<i64>,
}

/// Banker's result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyResponse {
    /// Whether a safe sequence exists
    pub safe: bool,
    /// Admission order; empty when unsafe
    pub safe_sequence: Vec<String>,
    /// Admissions, including partial progress of an unsafe run
    pub steps: Vec<SafetyStepResponse>,
    /// Processes never admitted
    pub blocked: Vec<String>,
}

impl From<&SafetyTrace> for SafetyResponse {
    fn from(trace: &SafetyTrace) -> Self {
        Self {
            safe: trace.safe,
            safe_sequence: trace.safe_sequence.iter().map(|&p| process_label(p)).collect(),
            steps: trace
                .steps
                .iter()
                .map(|step| SafetyStepResponse {
                    process: process_label(step.process),
                    work_before: step.work_before.clone(),
                    work_after: step.work_after.clone(),
                })
                .collect(),
            blocked: trace.blocked().into_iter().map(process_label).collect(),
        }
    }
}

/// Graph detection result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadlockResponse {
    /// Whether a cycle was found
    pub deadlock: bool,
    /// Closed cycle, empty if none
    pub cycle: Vec<String>,
}

impl From<DeadlockReport> for DeadlockResponse {
    fn from(report: DeadlockReport) -> Self {
        Self { deadlock: report.deadlock, cycle: report.cycle }
    }
}

/// One visit during matrix detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionStepResponse {
    /// Visited process label
    pub process: String,
    /// Whether the request fit
    pub can_run: bool,
    /// `EXECUTED` or `WAITING`
    pub action: &'static str,
    /// Work vector on entry
    pub work_before: Vec<i64>,
    /// Work vector on exit
    pub work_after: Vec<i64>,
}

/// Matrix detection result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResponse {
    /// Whether any process is deadlocked
    pub deadlock: bool,
    /// Deadlocked process labels
    pub deadlocked_processes: Vec<String>,
    /// Every visit, pass by pass
    pub steps: Vec<DetectionStepResponse>,
}

impl From<&DetectionTrace> for DetectionResponse {
    fn from(trace: &DetectionTrace) -> Self {
        Self {
            deadlock: trace.deadlock,
            deadlocked_processes: trace.deadlocked.iter().map(|&p| process_label(p)).collect(),
            steps: trace
                .steps
                .iter()
                .map(|step| DetectionStepResponse {
                    process: process_label(step.process),
                    can_run: step.can_run,
                    action: match step.action {
                        DetectionAction::Executed => "EXECUTED",
                        DetectionAction::Waiting => "WAITING",
                    },
                    work_before: step.work_before.clone(),
                    work_after: step.work_after.clone(),
                })
                .collect(),
        }
    }
}

/// One page reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryStepResponse {
    /// Referenced page
    pub page: PageId,
    /// `HIT` or `MISS`
    pub status: &'static str,
    /// Frame contents after the reference
    pub frames: Vec<PageId>,
    /// Page displaced by this reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evicted: Option<PageId>,
    /// Owning process for multi-process requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process: Option<u32>,
}

/// Page replacement result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryResponse {
    /// Policy used
    pub algorithm: &'static str,
    /// Frame count
    pub frames: usize,
    /// Number of misses
    pub page_faults: usize,
    /// Number of hits
    pub hits: usize,
    /// Hits over references
    pub hit_ratio: f64,
    /// One record per reference
    pub steps: Vec<MemoryStepResponse>,
}

impl From<&ReferenceTrace> for MemoryResponse {
    fn from(trace: &ReferenceTrace) -> Self {
        Self {
            algorithm: trace.policy.name(),
            frames: trace.frame_count,
            page_faults: trace.page_faults,
            hits: trace.hits,
            hit_ratio: trace.hit_ratio(),
            steps: trace
                .steps
                .iter()
                .map(|step| MemoryStepResponse {
                    page: step.page,
                    status: step.status.name(),
                    frames: step.frames.clone(),
                    evicted: step.evicted,
                    process: step.process,
                })
                .collect(),
        }
    }
}
