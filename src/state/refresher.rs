use crate::state::messages::NetworkRequest;
use crate::state::ticker::Ticker;
use log::debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

/// Dashboard refresh cadence — once a minute, matching the backend's
/// leaderboard recompute interval.
pub const REFRESH_PERIOD: Duration = Duration::from_secs(60);

/// At-most-one-refresh-in-flight guard, shared between the periodic
/// schedule and the manual refresh key. `try_begin` wins exactly once
/// until the matching `finish` when the response is consumed.
#[derive(Clone, Debug, Default)]
pub struct RefreshGuard {
    in_flight: Arc<AtomicBool>,
}

impl RefreshGuard {
    pub fn try_begin(&self) -> bool {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn finish(&self) {
        self.in_flight.store(false, Ordering::Release);
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Requested,
    /// A previous refresh has not resolved yet; this one is a no-op.
    InFlight,
    /// The network worker is gone (shutdown).
    Closed,
}

/// Entry point for requesting a dashboard refresh. Both the periodic
/// refresher and the `r` key go through here so they share the guard.
#[derive(Clone)]
pub struct RefreshRequester {
    guard: RefreshGuard,
    requests: mpsc::Sender<NetworkRequest>,
}

impl RefreshRequester {
    pub fn new(guard: RefreshGuard, requests: mpsc::Sender<NetworkRequest>) -> Self {
        Self { guard, requests }
    }

    pub async fn request(&self) -> RefreshOutcome {
        if !self.guard.try_begin() {
            debug!("refresh skipped: previous fetch still in flight");
            return RefreshOutcome::InFlight;
        }
        if self
            .requests
            .send(NetworkRequest::RefreshDashboard)
            .await
            .is_err()
        {
            self.guard.finish();
            return RefreshOutcome::Closed;
        }
        RefreshOutcome::Requested
    }

    /// Called when the refresh response (success or failure) has been
    /// consumed by the UI loop.
    pub fn finish(&self) {
        self.guard.finish();
    }
}

/// Periodic dashboard refresh — every 60 seconds while the app runs.
/// The initial load is triggered separately on startup, so the first
/// interval tick is skipped by the ticker itself.
pub struct PeriodicRefresher {
    requester: RefreshRequester,
}

impl PeriodicRefresher {
    pub fn new(requester: RefreshRequester) -> Self {
        Self { requester }
    }

    pub fn spawn(self) -> Ticker {
        Ticker::spawn(REFRESH_PERIOD, move || {
            let requester = self.requester.clone();
            async move {
                let _ = requester.request().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_admits_exactly_one_until_finished() {
        let guard = RefreshGuard::default();
        assert!(guard.try_begin());
        assert!(!guard.try_begin());
        assert!(guard.is_in_flight());
        guard.finish();
        assert!(guard.try_begin());
    }

    #[test]
    fn guard_finish_is_idempotent() {
        let guard = RefreshGuard::default();
        guard.finish();
        guard.finish();
        assert!(guard.try_begin());
    }

    #[tokio::test]
    async fn second_request_is_noop_while_first_in_flight() {
        let (tx, mut rx) = mpsc::channel(4);
        let requester = RefreshRequester::new(RefreshGuard::default(), tx);

        assert_eq!(requester.request().await, RefreshOutcome::Requested);
        assert_eq!(requester.request().await, RefreshOutcome::InFlight);
        // Exactly one request went out.
        assert!(matches!(rx.try_recv(), Ok(NetworkRequest::RefreshDashboard)));
        assert!(rx.try_recv().is_err());

        requester.finish();
        assert_eq!(requester.request().await, RefreshOutcome::Requested);
    }

    #[tokio::test]
    async fn closed_channel_releases_the_guard() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let requester = RefreshRequester::new(RefreshGuard::default(), tx);
        assert_eq!(requester.request().await, RefreshOutcome::Closed);
        // The guard must not stay stuck after a failed send.
        assert!(!requester.guard.is_in_flight());
    }
}
