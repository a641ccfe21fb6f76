//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! dispatcher and connections produce:
//!     → logging.rs (structured log events, request IDs)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → Log aggregation (stdout, file, remote)
//!     → Whatever metrics recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON optional) for machine parsing
//! - Request ID flows through every dispatch log line
//! - Metrics are cheap (atomic increments behind the facade)

pub mod logging;
pub mod metrics;
