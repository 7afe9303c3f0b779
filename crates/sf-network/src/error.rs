//! Error types for solver interaction and topology resolution.

use std::path::PathBuf;

use sf_core::SfError;
use thiserror::Error;

use crate::index::ElementKind;

/// Errors raised while loading, configuring, or reading a solver network.
///
/// Everything except `Solver` and `Load` means the network definition does not
/// look like an intake station model; those abort the scenario.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Failed to load network definition {path}: {message}")]
    Load { path: PathBuf, message: String },

    #[error("{kind} '{id}' not found in network definition")]
    MissingElement { kind: ElementKind, id: String },

    #[error("Duplicate {kind} identifier '{id}'")]
    DuplicateElement { kind: ElementKind, id: String },

    #[error(
        "Network matches no known topology: neither '{simplified}' nor '{subdivided}' link present"
    )]
    UnknownTopology {
        simplified: &'static str,
        subdivided: &'static str,
    },

    #[error("Solver error: {message}")]
    Solver { message: String },

    #[error("Malformed solver output: {what}")]
    SeriesShape { what: String },

    #[error(transparent)]
    Core(#[from] SfError),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
