//! Request wire format.
//!
//! A request names an engine in `mode` and carries that engine's input in
//! the matching section. Sections for other modes are ignored.
//!
//! ```json
//! { "mode": "MEMORY", "memory": { "frames": 3, "algorithm": "LRU", "references": [1, 2, 1] } }
//! ```

use std::{fmt, str::FromStr};

use ossim_core::PageId;
use serde::Deserialize;

use crate::error::CliError;

/// Engine selected by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Banker's safety check
    Banker,
    /// Cycle detection over an allocation graph
    Deadlock,
    /// Matrix deadlock detection for counted resources
    DeadlockMatrix,
    /// Page replacement replay
    Memory,
}

impl Mode {
    /// Canonical wire name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Banker => "BANKER",
            Self::Deadlock => "DEADLOCK",
            Self::DeadlockMatrix => "DEADLOCK_MATRIX",
            Self::Memory => "MEMORY",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BANKER" => Ok(Self::Banker),
            "DEADLOCK" => Ok(Self::Deadlock),
            "DEADLOCK_MATRIX" => Ok(Self::DeadlockMatrix),
            "MEMORY" => Ok(Self::Memory),
            _ => Err(CliError::UnknownMode(s.to_string())),
        }
    }
}

/// Top-level request.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    /// Engine name, parsed with [`Mode::from_str`]
    pub mode: String,
    /// Input for `BANKER`
    #[serde(default)]
    pub banker: Option<BankerRequest>,
    /// Input for `DEADLOCK`
    #[serde(default)]
    pub deadlock: Option<DeadlockRequest>,
    /// Input for `DEADLOCK_MATRIX`
    #[serde(default)]
    pub detection: Option<DetectionRequest>,
    /// Input for `MEMORY`
    #[serde(default)]
    pub memory: Option<MemoryRequest>,
}

impl Request {
    /// Decode a request from JSON bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self, CliError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Banker's input. Declared counts are optional and checked when present.
#[derive(Debug, Clone, Deserialize)]
pub struct BankerRequest {
    /// Declared number of processes
    #[serde(default)]
    pub processes: Option<usize>,
    /// Declared number of resource types
    #[serde(default)]
    pub resources: Option<usize>,
    /// Free instances per resource type
    pub available: Vec<i64>,
    /// Maximum demand per process
    #[serde(alias = "max")]
    pub maximum: Vec<Vec<i64>>,
    /// Current allocation per process
    pub allocation: Vec<Vec<i64>>,
}

/// One directed edge.
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeRequest {
    /// Source node
    pub from: String,
    /// Destination node
    pub to: String,
}

/// Allocation graph input.
#[derive(Debug, Clone, Deserialize)]
pub struct DeadlockRequest {
    /// Edges in insertion order
    pub edges: Vec<EdgeRequest>,
}

/// Matrix detection input.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionRequest {
    /// Free instances per resource type
    pub available: Vec<i64>,
    /// Current allocation per process
    pub allocation: Vec<Vec<i64>>,
    /// Outstanding request per process
    pub request: Vec<Vec<i64>>,
}

/// Reference string owned by one process.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessRequest {
    /// Process identifier
    pub pid: u32,
    /// Referenced pages in order
    pub pages: Vec<PageId>,
}

/// Page replacement input.
///
/// Either `references` (a single string) or `processes` (several strings
/// sharing the frame pool) is used; giving `processes` alongside a non-empty
/// `references` is rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryRequest {
    /// Number of frames; values below 1 are rejected by the engine
    pub frames: i64,
    /// Policy name (`FIFO`, `LRU`, `OPTIMAL`)
    pub algorithm: String,
    /// Single reference string
    #[serde(default)]
    pub references: Vec<PageId>,
    /// Per-process reference strings
    #[serde(default)]
    pub processes: Option<Vec<ProcessRequest>>,
}
