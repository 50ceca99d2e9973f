//! Dispatcher error types.
//!
//! Wraps engine validation errors together with the adapter's own failures
//! (reading input, decoding the request, encoding the response).

use ossim_core::{ErrorClass, InputError};
use thiserror::Error;

use crate::request::Mode;

/// Errors raised while handling one request.
#[derive(Error, Debug)]
pub enum CliError {
    /// Reading the request or writing the response failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The request is not valid JSON or does not match the request shape.
    #[error("invalid request: {0}")]
    Json(#[from] serde_json::Error),

    /// CBOR encoding of the response failed.
    #[error("cbor encoding failed: {0}")]
    Cbor(String),

    /// The `mode` field names no known engine.
    #[error("unknown mode: {0:?}")]
    UnknownMode(String),

    /// The section for the selected mode is absent.
    #[error("mode {mode} requires a {section:?} section")]
    MissingSection {
        /// Selected mode
        mode: Mode,
        /// Name of the missing section
        section: &'static str,
    },

    /// A `memory` section carries both a non-empty `references` string and a
    /// `processes` list.
    #[error("memory section must carry either references or processes, not both")]
    AmbiguousReferences,

    /// The engine rejected the workload.
    #[error(transparent)]
    Input(#[from] InputError),
}

impl CliError {
    /// Whether the request itself is at fault (as opposed to the
    /// environment).
    ///
    /// Everything except I/O failures is a request error: resubmitting the
    /// same request will fail the same way.
    pub fn is_request_error(&self) -> bool {
        !matches!(self, Self::Io(_))
    }

    /// Shape/value classification for engine errors; `None` for adapter
    /// errors.
    pub fn input_class(&self) -> Option<ErrorClass> {
        match self {
            Self::Input(err) => Some(err.class()),
            Self::UnknownMode(_) | Self::MissingSection { .. } | Self::AmbiguousReferences => {
                Some(ErrorClass::Shape)
            },
            Self::Io(_) | Self::Json(_) | Self::Cbor(_) => None,
        }
    }
}

impl<E: std::fmt::Debug> From<ciborium::ser::Error<E>> for CliError {
    fn from(err: ciborium::ser::Error<E>) -> Self {
        Self::Cbor(format!("{err:?}"))
    }
}
