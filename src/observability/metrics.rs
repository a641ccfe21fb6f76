//! Metrics collection.
//!
//! # Metrics
//! - `searchpool_dispatch_total` (counter): dispatches by operation, outcome
//! - `searchpool_attempts_total` (counter): individual attempts by node
//! - `searchpool_node_active` (gauge): 1=active, 0=quarantined
//!
//! # Design Decisions
//! - Records through the `metrics` facade; exporter wiring belongs to the
//!   embedding application
//! - Low-cardinality labels only (operation name, node name, outcome)

/// Record the outcome of a whole dispatch call.
pub fn record_dispatch(operation: &'static str, outcome: &'static str) {
    metrics::counter!(
        "searchpool_dispatch_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record one attempt against a node.
pub fn record_attempt(node: &str) {
    metrics::counter!("searchpool_attempts_total", "node" => node.to_string()).increment(1);
}

/// Record a node's liveness after a state transition.
pub fn record_node_active(node: &str, active: bool) {
    metrics::gauge!("searchpool_node_active", "node" => node.to_string())
        .set(if active { 1.0 } else { 0.0 });
}
