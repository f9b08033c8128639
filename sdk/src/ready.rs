//! One-time provider readiness, fanned out to every interested party.
//!
//! Embed APIs typically expose readiness as a single global callback slot,
//! where registering twice silently discards the earlier registration. The
//! broker here replaces that with an explicit subscription model: readiness
//! is signaled once, and every [`ReadySignal`] obtained before or after the
//! signal observes it.

use tokio::sync::watch;

/// Fan-out point for a provider library's one-time readiness signal.
#[derive(Debug)]
pub struct ReadyBroker {
    tx: watch::Sender<bool>,
}

impl ReadyBroker {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Obtain a signal that resolves once the provider is ready.
    ///
    /// Subscribing after [`ReadyBroker::signal_ready`] yields a signal that
    /// resolves immediately.
    pub fn subscribe(&self) -> ReadySignal {
        ReadySignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Mark the provider library as ready. Idempotent.
    pub fn signal_ready(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_ready(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for ReadyBroker {
    fn default() -> Self {
        Self::new()
    }
}

/// One subscriber's view of the readiness signal.
#[derive(Debug, Clone)]
pub struct ReadySignal {
    rx: watch::Receiver<bool>,
}

impl ReadySignal {
    /// Wait until the provider library has signaled readiness.
    ///
    /// If the broker is dropped before signaling, readiness can never
    /// arrive; this future then stays pending forever, matching the
    /// indefinite wait the pipeline promises. Callers wanting an observable
    /// failure put a timeout around the wait.
    pub async fn wait(mut self) {
        if self.rx.wait_for(|ready| *ready).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn every_subscriber_observes_the_signal() {
        let broker = ReadyBroker::new();
        let a = broker.subscribe();
        let b = broker.subscribe();
        broker.signal_ready();
        a.wait().await;
        b.wait().await;
    }

    #[tokio::test]
    async fn late_subscribers_resolve_immediately() {
        let broker = ReadyBroker::new();
        broker.signal_ready();
        broker.subscribe().wait().await;
        assert!(broker.is_ready());
    }

    #[tokio::test]
    async fn signaling_twice_is_harmless() {
        let broker = ReadyBroker::new();
        broker.signal_ready();
        broker.signal_ready();
        broker.subscribe().wait().await;
    }

    #[tokio::test]
    async fn unsignaled_wait_stays_pending() {
        let broker = ReadyBroker::new();
        let signal = broker.subscribe();
        let outcome = tokio::time::timeout(Duration::from_millis(20), signal.wait()).await;
        assert!(outcome.is_err());
    }

    #[tokio::test]
    async fn dropped_broker_never_resolves() {
        let broker = ReadyBroker::new();
        let signal = broker.subscribe();
        drop(broker);
        let outcome = tokio::time::timeout(Duration::from_millis(20), signal.wait()).await;
        assert!(outcome.is_err());
    }
}
