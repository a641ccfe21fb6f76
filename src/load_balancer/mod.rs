//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! caller invokes post/post_stream/get on the dispatcher
//!     → dispatcher.rs walks nodes in stored order
//!     → node.rs (eligibility: active, or quarantine period elapsed)
//!     → attempt against the node's connection, up to max_retries attempts
//!     → success: mark node active, return result
//!     → transient failure: quarantine node, try next
//!     → all exhausted: aggregate error wrapping the last seen failure
//! ```
//!
//! # Design Decisions
//! - Node order is priority order; selection is deterministic, not randomized
//! - Quarantine re-check is lazy (evaluated at dispatch time, no timers)
//! - Per-node state is atomics; dispatch calls are never serialized

pub mod dispatcher;
pub mod node;

pub use dispatcher::LoadBalancedDispatcher;
pub use node::NodeHandle;
