//! Node handle abstraction.
//!
//! # Responsibilities
//! - Wrap one connection to a backend node
//! - Track liveness state (active flag, failure/success timestamps)
//!
//! A handle is a pure state container: the only transitions are
//! `mark_success` and `mark_failure`, and only the dispatcher performs them.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::connection::Connection;

/// Sentinel for a timestamp that was never recorded.
const NEVER: u64 = u64::MAX;

/// One backend node plus its liveness state.
///
/// Timestamps are stored as millisecond offsets from the handle's creation
/// instant, so they fit in atomics and field access never tears.
pub struct NodeHandle {
    connection: Arc<dyn Connection>,
    /// `true` means eligible for selection without quarantine checks.
    active: AtomicBool,
    /// Offset of the most recent failure observation.
    last_checked_ms: AtomicU64,
    /// Offset of the most recent successful call.
    last_used_ms: AtomicU64,
    epoch: Instant,
}

impl NodeHandle {
    /// Wrap a connection. New handles start active.
    pub(crate) fn new(connection: Arc<dyn Connection>) -> Self {
        Self {
            connection,
            active: AtomicBool::new(true),
            last_checked_ms: AtomicU64::new(NEVER),
            last_used_ms: AtomicU64::new(NEVER),
            epoch: Instant::now(),
        }
    }

    /// The wrapped connection.
    pub(crate) fn connection(&self) -> &dyn Connection {
        self.connection.as_ref()
    }

    /// Whether the node is currently eligible without quarantine checks.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// When the node last failed, if it ever has.
    pub fn last_checked(&self) -> Option<Instant> {
        self.instant_at(self.last_checked_ms.load(Ordering::Acquire))
    }

    /// When the node last served a successful call, if it ever has.
    pub fn last_used(&self) -> Option<Instant> {
        self.instant_at(self.last_used_ms.load(Ordering::Acquire))
    }

    /// Elapsed time since the most recent failure observation.
    ///
    /// An inactive handle always has a recorded failure; the sentinel branch
    /// only covers handles that never failed, which are active and never
    /// consult this.
    pub(crate) fn since_last_checked(&self) -> Duration {
        match self.last_checked_ms.load(Ordering::Acquire) {
            NEVER => Duration::MAX,
            ms => self.epoch.elapsed().saturating_sub(Duration::from_millis(ms)),
        }
    }

    /// Record a successful call: the node is live again.
    pub(crate) fn mark_success(&self) {
        self.last_used_ms.store(self.elapsed_ms(), Ordering::Release);
        self.active.store(true, Ordering::Release);
    }

    /// Record a connection failure and start (or refresh) quarantine.
    pub(crate) fn mark_failure(&self) {
        // last_checked is published before the flag flips, so a reader that
        // observes an inactive node also observes its failure time.
        self.last_checked_ms.store(self.elapsed_ms(), Ordering::Release);
        self.active.store(false, Ordering::Release);
    }

    fn elapsed_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn instant_at(&self, ms: u64) -> Option<Instant> {
        match ms {
            NEVER => None,
            ms => Some(self.epoch + Duration::from_millis(ms)),
        }
    }
}

impl std::fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeHandle")
            .field("active", &self.is_active())
            .field("last_checked", &self.last_checked())
            .field("last_used", &self.last_used())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::PoolResult;
    use async_trait::async_trait;
    use bytes::Bytes;

    struct NullConnection;

    #[async_trait]
    impl Connection for NullConnection {
        async fn post(&self, _path: &str, _body: &str) -> PoolResult<String> {
            Ok(String::new())
        }

        async fn post_stream(
            &self,
            _path: &str,
            _content_type: &str,
            _content: Bytes,
            _query_params: &[(String, String)],
        ) -> PoolResult<String> {
            Ok(String::new())
        }

        async fn get(&self, _path: &str, _query_params: &[(String, String)]) -> PoolResult<String> {
            Ok(String::new())
        }
    }

    fn handle() -> NodeHandle {
        NodeHandle::new(Arc::new(NullConnection))
    }

    #[test]
    fn starts_active_with_no_history() {
        let node = handle();
        assert!(node.is_active());
        assert!(node.last_checked().is_none());
        assert!(node.last_used().is_none());
    }

    #[test]
    fn failure_deactivates_and_records_time() {
        let node = handle();
        node.mark_failure();

        assert!(!node.is_active());
        assert!(node.last_checked().is_some());
        assert!(node.since_last_checked() < Duration::from_secs(1));
    }

    #[test]
    fn success_reactivates() {
        let node = handle();
        node.mark_failure();
        node.mark_success();

        assert!(node.is_active());
        assert!(node.last_used().is_some());
        // The failure record is history, not cleared.
        assert!(node.last_checked().is_some());
    }

    #[test]
    fn never_failed_reads_as_infinitely_old() {
        let node = handle();
        assert_eq!(node.since_last_checked(), Duration::MAX);
    }
}
