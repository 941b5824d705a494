//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert them into
//! `FleetError` via `From` impls or wrap `FleetError` as one variant.

use thiserror::Error;

use crate::{AgentId, VertexId};

/// The top-level error type for `fleet-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("vertex {0} not found")]
    VertexNotFound(VertexId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `fleet-*` crates.
pub type FleetResult<T> = Result<T, FleetError>;
