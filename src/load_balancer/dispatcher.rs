//! Load-balanced dispatcher.
//!
//! # Responsibilities
//! - Iterate the node pool in priority order
//! - Retry each eligible node up to its attempt budget
//! - Quarantine nodes that fail, re-admit them after the quarantine period
//! - Aggregate exhaustion into a single error carrying the last seen failure
//!
//! # Design Decisions
//! - Ordering is deterministic (stored order), so behavior is reproducible
//! - Eligibility is re-evaluated lazily at dispatch time; no background timer
//! - Transient connection errors are absorbed into node state; anything else
//!   propagates unchanged on the first occurrence
//! - Dispatch calls are never serialized against each other; concurrent
//!   callers may race on a node's state and both attempt it, which only
//!   delays convergence of the liveness tracking

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::config::loader::ConfigError;
use crate::config::schema::{DispatchConfig, PoolConfig};
use crate::config::validation::{validate_config, ValidationError};
use crate::connection::{Connection, ConnectionError, PoolError, PoolResult};
use crate::http::HttpConnection;
use crate::lifecycle::CancelToken;
use crate::load_balancer::node::NodeHandle;
use crate::observability::metrics;

/// The operation a dispatch call performs against the selected node.
enum Op<'a> {
    Post {
        path: &'a str,
        body: &'a str,
    },
    PostStream {
        path: &'a str,
        content_type: &'a str,
        content: &'a Bytes,
        query_params: &'a [(String, String)],
    },
    Get {
        path: &'a str,
        query_params: &'a [(String, String)],
    },
}

impl Op<'_> {
    fn name(&self) -> &'static str {
        match self {
            Op::Post { .. } => "post",
            Op::PostStream { .. } => "post_stream",
            Op::Get { .. } => "get",
        }
    }
}

/// Routes requests across a pool of interchangeable nodes.
///
/// Exposes the same operations as a single [`Connection`] (and implements the
/// trait), so callers cannot tell a pool from one node. Selection walks the
/// pool in stored order; a node that exhausts its attempt budget is
/// quarantined and skipped by later calls until `quarantine_period` elapses.
///
/// `max_retries` is the *total* attempts per node per call: `1` means one
/// attempt and no retry delay.
#[derive(Debug)]
pub struct LoadBalancedDispatcher {
    /// Fixed-length pool, priority order.
    nodes: Vec<NodeHandle>,
    max_retries: u32,
    retry_interval: Duration,
    quarantine_enabled: bool,
    quarantine_period: Duration,
    cancel: CancelToken,
}

impl LoadBalancedDispatcher {
    /// Build a dispatcher over an ordered pool of connections.
    ///
    /// Fails when the pool is empty or `max_retries` is zero.
    pub fn new(
        connections: Vec<Arc<dyn Connection>>,
        config: DispatchConfig,
    ) -> Result<Self, ConfigError> {
        let mut errors = Vec::new();
        if connections.is_empty() {
            errors.push(ValidationError::EmptyPool);
        }
        if config.max_retries == 0 {
            errors.push(ValidationError::ZeroRetries);
        }
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }

        Ok(Self {
            nodes: connections.into_iter().map(NodeHandle::new).collect(),
            max_retries: config.max_retries,
            retry_interval: config.retry_interval(),
            quarantine_enabled: config.quarantine_enabled,
            quarantine_period: config.quarantine_period(),
            cancel: CancelToken::disabled(),
        })
    }

    /// Build a dispatcher with one [`HttpConnection`] per configured endpoint.
    pub fn from_config(config: &PoolConfig) -> Result<Self, ConfigError> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let mut connections: Vec<Arc<dyn Connection>> =
            Vec::with_capacity(config.endpoints.len());
        for endpoint in &config.endpoints {
            let connection =
                HttpConnection::from_endpoint(endpoint, &config.http).map_err(|e| {
                    ConfigError::Validation(vec![ValidationError::InvalidEndpointUrl {
                        name: endpoint.name.clone(),
                        url: endpoint.url.clone(),
                        reason: e.to_string(),
                    }])
                })?;
            connections.push(Arc::new(connection));
        }

        Self::new(connections, config.dispatch.clone())
    }

    /// Attach an external cancellation token.
    ///
    /// A triggered token aborts the current attempt, skips remaining retries
    /// and nodes, and fails the call with [`PoolError::Cancelled`].
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// The node pool, in priority order. Read-only view for telemetry.
    pub fn nodes(&self) -> &[NodeHandle] {
        &self.nodes
    }

    /// POST a string body to a relative path.
    pub async fn post(&self, path: &str, body: &str) -> PoolResult<String> {
        self.dispatch(Op::Post { path, body }).await
    }

    /// POST a buffered byte body with an explicit content type and query parameters.
    pub async fn post_stream(
        &self,
        path: &str,
        content_type: &str,
        content: Bytes,
        query_params: &[(String, String)],
    ) -> PoolResult<String> {
        self.dispatch(Op::PostStream {
            path,
            content_type,
            content: &content,
            query_params,
        })
        .await
    }

    /// GET a relative path with query parameters.
    pub async fn get(&self, path: &str, query_params: &[(String, String)]) -> PoolResult<String> {
        self.dispatch(Op::Get { path, query_params }).await
    }

    async fn dispatch(&self, op: Op<'_>) -> PoolResult<String> {
        let operation = op.name();
        let result = self.dispatch_inner(&op, operation).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(PoolError::Cancelled) => "cancelled",
            Err(PoolError::AllNodesFailed { .. }) | Err(PoolError::NoActiveNodes) => "exhausted",
            Err(_) => "node_error",
        };
        metrics::record_dispatch(operation, outcome);

        result
    }

    async fn dispatch_inner(&self, op: &Op<'_>, operation: &'static str) -> PoolResult<String> {
        let request_id = Uuid::new_v4();
        let mut cancel = self.cancel.clone();
        let mut last_error: Option<ConnectionError> = None;

        for (index, node) in self.nodes.iter().enumerate() {
            if !self.is_eligible(node) {
                tracing::trace!(request_id = %request_id, node = index, "node quarantined, skipping");
                continue;
            }

            for attempt in 1..=self.max_retries {
                if cancel.is_cancelled() {
                    return Err(PoolError::Cancelled);
                }

                metrics::record_attempt(&index.to_string());
                let outcome = tokio::select! {
                    result = self.attempt(node.connection(), op) => result,
                    _ = cancel.cancelled() => {
                        tracing::debug!(request_id = %request_id, node = index, attempt, "cancelled mid-attempt");
                        return Err(PoolError::Cancelled);
                    }
                };

                match outcome {
                    Ok(body) => {
                        node.mark_success();
                        metrics::record_node_active(&index.to_string(), true);
                        tracing::debug!(
                            request_id = %request_id,
                            node = index,
                            attempt,
                            operation,
                            "dispatch succeeded"
                        );
                        return Ok(body);
                    }
                    Err(PoolError::Connection(error)) => {
                        node.mark_failure();
                        metrics::record_node_active(&index.to_string(), false);
                        tracing::warn!(
                            request_id = %request_id,
                            node = index,
                            attempt,
                            error = %error,
                            "attempt failed with connection error"
                        );
                        last_error = Some(error);

                        if attempt < self.max_retries {
                            self.retry_pause(&mut cancel).await?;
                        }
                    }
                    // The node responded; that is not a liveness signal.
                    Err(other) => {
                        tracing::debug!(
                            request_id = %request_id,
                            node = index,
                            attempt,
                            error = %other,
                            "non-connection error, propagating"
                        );
                        return Err(other);
                    }
                }
            }
        }

        match last_error {
            Some(last) => {
                tracing::error!(request_id = %request_id, operation, error = %last, "all nodes exhausted");
                Err(PoolError::AllNodesFailed { last })
            }
            None => {
                tracing::error!(request_id = %request_id, operation, "no eligible nodes in pool");
                Err(PoolError::NoActiveNodes)
            }
        }
    }

    /// Eligibility is evaluated fresh on every call, per node.
    fn is_eligible(&self, node: &NodeHandle) -> bool {
        if node.is_active() {
            return true;
        }
        self.quarantine_enabled && node.since_last_checked() >= self.quarantine_period
    }

    async fn retry_pause(&self, cancel: &mut CancelToken) -> PoolResult<()> {
        tokio::select! {
            _ = tokio::time::sleep(self.retry_interval) => Ok(()),
            _ = cancel.cancelled() => Err(PoolError::Cancelled),
        }
    }

    async fn attempt(&self, connection: &dyn Connection, op: &Op<'_>) -> PoolResult<String> {
        match op {
            Op::Post { path, body } => connection.post(path, body).await,
            Op::PostStream {
                path,
                content_type,
                content,
                query_params,
            } => {
                connection
                    .post_stream(path, content_type, (*content).clone(), query_params)
                    .await
            }
            Op::Get { path, query_params } => connection.get(path, query_params).await,
        }
    }
}

#[async_trait]
impl Connection for LoadBalancedDispatcher {
    async fn post(&self, path: &str, body: &str) -> PoolResult<String> {
        LoadBalancedDispatcher::post(self, path, body).await
    }

    async fn post_stream(
        &self,
        path: &str,
        content_type: &str,
        content: Bytes,
        query_params: &[(String, String)],
    ) -> PoolResult<String> {
        LoadBalancedDispatcher::post_stream(self, path, content_type, content, query_params).await
    }

    async fn get(&self, path: &str, query_params: &[(String, String)]) -> PoolResult<String> {
        LoadBalancedDispatcher::get(self, path, query_params).await
    }
}
