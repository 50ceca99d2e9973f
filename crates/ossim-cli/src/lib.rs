//! Thin dispatcher over the ossim engines.
//!
//! Reads a JSON request, selects an engine by its `mode` field, runs it with
//! the configured [`Limits`](ossim_core::Limits), and encodes the result as
//! JSON or CBOR. All decoding and encoding lives here; the engines never see
//! serialized data.
//!
//! # Modes
//!
//! | mode | section | engine |
//! |------|---------|--------|
//! | `BANKER` | `banker` | Banker's safety check |
//! | `DEADLOCK` | `deadlock` | graph cycle detection |
//! | `DEADLOCK_MATRIX` | `detection` | matrix deadlock detection |
//! | `MEMORY` | `memory` | page replacement replay |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod dispatch;
pub mod error;
pub mod request;
pub mod response;

pub use dispatch::dispatch;
pub use error::CliError;
pub use request::{Mode, Request};
pub use response::{OutputFormat, Response};

/// Decode, dispatch and encode in one call.
///
/// Returns the complete encoded response or an error; never a prefix.
pub fn handle(
    input: &[u8],
    limits: &ossim_core::Limits,
    format: OutputFormat,
    compact: bool,
) -> Result<Vec<u8>, CliError> {
    let request = Request::from_json(input)?;
    dispatch(&request, limits)?.encode(format, compact)
}
