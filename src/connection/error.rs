//! Error definitions for connections and dispatch.

use thiserror::Error;

/// Transport-level failures raised by a connection.
///
/// These are the only errors the dispatcher treats as retryable: they mean the
/// node was unreachable, not that it answered with an error.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The request could not be delivered (refused, reset, DNS, broken pipe).
    #[error("transport error: {0}")]
    Transport(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out after {0} ms")]
    Timeout(u64),
}

/// Errors that can occur during pool operations.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Transient connection failure. Absorbed by the dispatcher until every
    /// node is exhausted; only surfaces from a bare connection.
    #[error("connection failed: {0}")]
    Connection(#[from] ConnectionError),

    /// The node responded, but with a non-success status. Not retryable.
    #[error("node returned HTTP {status}")]
    NodeResponse { status: u16, body: String },

    /// The request could not be built (bad path or parameters). Not retryable.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Every node was tried and failed with a connection error.
    #[error("tried all connections, no active nodes found")]
    AllNodesFailed {
        #[source]
        last: ConnectionError,
    },

    /// No node was eligible for dispatch.
    #[error("no active nodes found")]
    NoActiveNodes,

    /// The dispatch was aborted by an external cancellation signal.
    #[error("dispatch cancelled")]
    Cancelled,
}

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;
