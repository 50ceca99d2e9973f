//! Routes a request to its engine.

use ossim_core::{
    Limits, Policy, ProcessReferences, ResourceGraph, ResourceState, deadlock::matrix, paging,
};

use crate::{
    error::CliError,
    request::{BankerRequest, DeadlockRequest, DetectionRequest, MemoryRequest, Mode, Request},
    response::{DeadlockResponse, DetectionResponse, MemoryResponse, Response, SafetyResponse},
};

/// Run the engine selected by `request.mode`.
///
/// Nothing is returned unless the engine completed; any validation failure
/// surfaces as an error with no partial response.
pub fn dispatch(request: &Request, limits: &Limits) -> Result<Response, CliError> {
    let mode: Mode = request.mode.parse()?;
    tracing::info!(%mode, "dispatching request");

    let missing = |section| CliError::MissingSection { mode, section };

    match mode {
        Mode::Banker => {
            let input = request.banker.as_ref().ok_or_else(|| missing("banker"))?;
            banker(input, limits).map(Response::Banker)
        },
        Mode::Deadlock => {
            let input = request.deadlock.as_ref().ok_or_else(|| missing("deadlock"))?;
            deadlock(input, limits).map(Response::Deadlock)
        },
        Mode::DeadlockMatrix => {
            let input = request.detection.as_ref().ok_or_else(|| missing("detection"))?;
            detection(input, limits).map(Response::Detection)
        },
        Mode::Memory => {
            let input = request.memory.as_ref().ok_or_else(|| missing("memory"))?;
            memory(input, limits).map(Response::Memory)
        },
    }
}

fn banker(input: &BankerRequest, limits: &Limits) -> Result<SafetyResponse, CliError> {
    let state = ResourceState::with_dimensions(
        input.processes.unwrap_or(input.maximum.len()),
        input.resources.unwrap_or(input.available.len()),
        input.available.clone(),
        input.maximum.clone(),
        input.allocation.clone(),
        limits,
    )?;

    let trace = state.check_safety();
    tracing::info!(safe = trace.safe, sequence = ?trace.safe_sequence, "banker complete");
    Ok(SafetyResponse::from(&trace))
}

fn deadlock(input: &DeadlockRequest, limits: &Limits) -> Result<DeadlockResponse, CliError> {
    let graph =
        ResourceGraph::from_edges(input.edges.iter().map(|e| (e.from.as_str(), e.to.as_str())));

    let report = graph.detect_with_limits(limits)?;
    tracing::info!(deadlock = report.deadlock, cycle = ?report.cycle, "deadlock check complete");
    Ok(report.into())
}

fn detection(input: &DetectionRequest, limits: &Limits) -> Result<DetectionResponse, CliError> {
    let trace =
        matrix::detect_with_limits(&input.available, &input.allocation, &input.request, limits)?;
    tracing::info!(deadlocked = ?trace.deadlocked, "matrix detection complete");
    Ok(DetectionResponse::from(&trace))
}

fn memory(input: &MemoryRequest, limits: &Limits) -> Result<MemoryResponse, CliError> {
    let policy: Policy = input.algorithm.parse()?;
    // negative counts fold into the same error as zero
    let frames = usize::try_from(input.frames).unwrap_or(0);

    let trace = match &input.processes {
        Some(_) if !input.references.is_empty() => return Err(CliError::AmbiguousReferences),
        Some(processes) => {
            let processes: Vec<ProcessReferences> = processes
                .iter()
                .map(|p| ProcessReferences { pid: p.pid, pages: p.pages.clone() })
                .collect();
            paging::simulate_processes(&processes, frames, policy, limits)?
        },
        None => paging::simulate_with_limits(&input.references, frames, policy, limits)?,
    };

    tracing::info!(
        %policy,
        frames,
        hits = trace.hits,
        page_faults = trace.page_faults,
        "memory simulation complete"
    );
    Ok(MemoryResponse::from(&trace))
}
