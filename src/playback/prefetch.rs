//! Single-slot speculative cache for the next phase result
//!
//! While the spectator steps through a phase, the next phase can already be
//! requested so that the following advance returns without waiting on the
//! network. The slot holds at most one in-flight request or one unconsumed
//! result, never both, and never starts a second request.

use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};

use crate::client::GameClient;
use crate::error::ClientError;
use crate::types::PhaseResult;

type Pending = JoinHandle<Result<PhaseResult, ClientError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefetchStatus {
    Empty,
    Inflight,
    Cached,
}

#[derive(Default)]
pub struct PrefetchSlot {
    inflight: Option<Pending>,
    cached: Option<PhaseResult>,
}

impl PrefetchSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a speculative advance unless the slot is occupied.
    ///
    /// Returns whether a request was started.
    pub fn begin(&mut self, client: Arc<dyn GameClient>) -> bool {
        if self.inflight.is_some() || self.cached.is_some() {
            log::trace!("prefetch skipped, slot is {:?}", self.status());
            return false;
        }
        log::debug!("prefetching next phase");
        self.inflight = Some(tokio::spawn(async move { client.advance().await }));
        true
    }

    /// Move a finished request into the cache without waiting
    pub async fn settle(&mut self) {
        if self.inflight.as_ref().is_some_and(|h| h.is_finished()) {
            self.wait_inflight().await;
        }
    }

    /// Wait for the in-flight request, if any, then consume the cache
    pub async fn wait(&mut self) -> Option<PhaseResult> {
        self.wait_inflight().await;
        self.take()
    }

    /// Consume the cached result; an in-flight request is left alone
    pub fn take(&mut self) -> Option<PhaseResult> {
        self.cached.take()
    }

    /// Drop everything, letting an in-flight request finish first so it
    /// cannot land after whatever comes next
    pub async fn clear(&mut self) {
        self.wait_inflight().await;
        self.cached = None;
    }

    pub fn status(&self) -> PrefetchStatus {
        match (&self.inflight, &self.cached) {
            (Some(_), _) => PrefetchStatus::Inflight,
            (None, Some(_)) => PrefetchStatus::Cached,
            (None, None) => PrefetchStatus::Empty,
        }
    }

    pub fn is_inflight(&self) -> bool {
        self.inflight.is_some()
    }

    /// Resolves once the in-flight request finishes, caching a successful
    /// result and handing back a failure. Never resolves while nothing is in
    /// flight.
    ///
    /// Cancel safe: dropping the future leaves the request in the slot.
    pub async fn landed(&mut self) -> Result<(), ClientError> {
        let Some(handle) = self.inflight.as_mut() else {
            return std::future::pending().await;
        };
        let joined = handle.await;
        self.inflight = None;
        self.store(joined)
    }

    async fn wait_inflight(&mut self) {
        let Some(handle) = self.inflight.take() else {
            return;
        };
        if let Err(e) = self.store(handle.await) {
            log::warn!("Prefetch failed, next advance will fetch again: {}", e);
        }
    }

    fn store(
        &mut self,
        joined: Result<Result<PhaseResult, ClientError>, JoinError>,
    ) -> Result<(), ClientError> {
        match joined {
            Ok(Ok(result)) => {
                self.cached = Some(result);
                Ok(())
            }
            Ok(Err(e)) => Err(e),
            Err(e) => Err(ClientError::network(format!("Request task did not complete: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ScriptedGameClient;
    use crate::client::scripted::initial_snapshot;
    use std::time::Duration;

    fn result() -> PhaseResult {
        PhaseResult::new(initial_snapshot(5, 1, 1), vec![])
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_request_while_inflight() {
        let client = Arc::new(ScriptedGameClient::new().with_latency(Duration::from_secs(1)));
        client.push_result(Ok(result()));
        let mut slot = PrefetchSlot::new();

        assert!(slot.begin(client.clone()));
        assert!(!slot.begin(client.clone()));
        assert_eq!(slot.status(), PrefetchStatus::Inflight);

        let taken = slot.wait().await;

        assert_eq!(taken, Some(result()));
        assert_eq!(slot.status(), PrefetchStatus::Empty);
        assert_eq!(client.advance_calls(), 1);
    }

    #[tokio::test]
    async fn test_no_begin_while_cached() {
        let client = Arc::new(ScriptedGameClient::new());
        client.push_result(Ok(result()));
        let mut slot = PrefetchSlot::new();

        slot.begin(client.clone());
        slot.wait_inflight().await;
        assert_eq!(slot.status(), PrefetchStatus::Cached);

        assert!(!slot.begin(client.clone()));
        assert_eq!(client.advance_calls(), 1);

        assert!(slot.take().is_some());
        assert!(slot.take().is_none());
    }

    #[tokio::test]
    async fn test_failure_is_swallowed() {
        let client = Arc::new(ScriptedGameClient::new());
        client.push_result(Err(ClientError::network("connection reset")));
        let mut slot = PrefetchSlot::new();

        slot.begin(client.clone());

        assert_eq!(slot.wait().await, None);
        assert_eq!(slot.status(), PrefetchStatus::Empty);
    }

    #[tokio::test(start_paused = true)]
    async fn test_take_ignores_inflight() {
        let client = Arc::new(ScriptedGameClient::new().with_latency(Duration::from_secs(5)));
        client.push_result(Ok(result()));
        let mut slot = PrefetchSlot::new();

        slot.begin(client.clone());
        slot.settle().await;

        assert_eq!(slot.take(), None);
        assert!(slot.is_inflight());

        slot.clear().await;
        assert_eq!(slot.status(), PrefetchStatus::Empty);
        // the request still ran to completion
        assert_eq!(client.pending_results(), 0);
    }

    #[tokio::test]
    async fn test_settle_caches_finished_request() {
        let client = Arc::new(ScriptedGameClient::new());
        client.push_result(Ok(result()));
        let mut slot = PrefetchSlot::new();

        slot.begin(client.clone());
        while slot.status() == PrefetchStatus::Inflight {
            tokio::task::yield_now().await;
            slot.settle().await;
        }

        assert_eq!(slot.status(), PrefetchStatus::Cached);
        assert_eq!(slot.take(), Some(result()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_landed_waits_for_inflight_request() {
        let client = Arc::new(ScriptedGameClient::new().with_latency(Duration::from_secs(3)));
        client.push_result(Ok(result()));
        client.push_result(Err(ClientError::network("connection reset")));
        let mut slot = PrefetchSlot::new();

        // nothing in flight
        assert!(
            tokio::time::timeout(Duration::from_secs(60), slot.landed())
                .await
                .is_err()
        );

        slot.begin(client.clone());
        // dropping the wait keeps the request
        assert!(
            tokio::time::timeout(Duration::from_secs(1), slot.landed())
                .await
                .is_err()
        );
        assert!(slot.is_inflight());

        assert_eq!(slot.landed().await, Ok(()));
        assert_eq!(slot.status(), PrefetchStatus::Cached);
        assert!(slot.take().is_some());

        slot.begin(client.clone());
        assert_eq!(
            slot.landed().await,
            Err(ClientError::network("connection reset"))
        );
        assert_eq!(slot.status(), PrefetchStatus::Empty);
        assert_eq!(client.advance_calls(), 2);
    }
}
