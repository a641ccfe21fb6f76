//! Cancellation coordination for in-flight dispatches.

use tokio::sync::watch;

/// Coordinator for external cancellation.
///
/// Provides a watch channel that dispatch calls observe. Triggering it aborts
/// the current attempt and short-circuits remaining retries and nodes.
pub struct Cancel {
    /// Watch channel sender. The flag is level-triggered, so tokens created
    /// after the trigger still observe the cancellation.
    tx: watch::Sender<bool>,
}

impl Cancel {
    /// Create a new cancellation coordinator.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Create a token observing this coordinator.
    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }

    /// Trigger the cancellation signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }
}

impl Default for Cancel {
    fn default() -> Self {
        Self::new()
    }
}

/// A cheap, cloneable handle observing a [`Cancel`] coordinator.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// A token that never fires, for callers without a cancellation source.
    pub fn disabled() -> Self {
        let (tx, rx) = watch::channel(false);
        drop(tx);
        Self { rx }
    }

    /// Whether cancellation has been triggered.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until cancellation is triggered.
    ///
    /// Never resolves for a [`CancelToken::disabled`] token or one whose
    /// coordinator was dropped without triggering.
    pub async fn cancelled(&mut self) {
        if self.rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn trigger_is_observed_by_all_tokens() {
        let cancel = Cancel::new();
        let token_a = cancel.token();
        let mut token_b = cancel.token();

        assert!(!token_a.is_cancelled());
        cancel.trigger();
        assert!(token_a.is_cancelled());
        token_b.cancelled().await;

        // Tokens minted after the trigger see the flag too.
        assert!(cancel.token().is_cancelled());
    }

    #[tokio::test]
    async fn disabled_token_never_fires() {
        let mut token = CancelToken::disabled();
        assert!(!token.is_cancelled());

        let wait = tokio::time::timeout(Duration::from_millis(50), token.cancelled());
        assert!(wait.await.is_err(), "disabled token must never resolve");
    }
}
