//! Connection abstraction.
//!
//! # Data Flow
//! ```text
//! caller → LoadBalancedDispatcher (implements Connection)
//!     → selects a NodeHandle
//!     → NodeHandle.connection (some Connection implementation)
//!     → HTTP request against one backend node
//! ```
//!
//! # Design Decisions
//! - Trait object seam so pools can mix implementations (HTTP, mocks)
//! - Errors are tagged: transient connection failures vs node responses
//! - Query parameters are an ordered pair list, preserved on the wire
//! - Stream bodies are buffered so an attempt can be replayed on retry

pub mod error;

pub use error::{ConnectionError, PoolError, PoolResult};

use async_trait::async_trait;
use bytes::Bytes;

/// A single backend node capable of serving request/response operations.
///
/// Implemented by [`crate::http::HttpConnection`] for real backends and by
/// [`crate::load_balancer::LoadBalancedDispatcher`] itself, so a whole pool is
/// substitutable anywhere one connection is expected.
#[async_trait]
pub trait Connection: Send + Sync {
    /// POST a string body to a relative path.
    async fn post(&self, path: &str, body: &str) -> PoolResult<String>;

    /// POST a buffered byte body with an explicit content type and query parameters.
    async fn post_stream(
        &self,
        path: &str,
        content_type: &str,
        content: Bytes,
        query_params: &[(String, String)],
    ) -> PoolResult<String>;

    /// GET a relative path with query parameters.
    async fn get(&self, path: &str, query_params: &[(String, String)]) -> PoolResult<String>;
}
