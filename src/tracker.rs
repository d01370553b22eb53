//! Deal lifecycle tracking.
//!
//! [`DealTracker`] converts the externally-paced deal pipeline into a single
//! awaited outcome: it polls the node's deal list on a fixed cadence,
//! translates and classifies the tracked deal's state each tick, and stops
//! at the first terminal classification, cancellation, or deadline.
//!
//! Two invariants are structural rather than convention-based:
//!
//! - At most one status query is in flight at any instant. The query is
//!   awaited inline in the loop body and the interval skips missed ticks,
//!   so a slow query delays the next one instead of overlapping it.
//! - No outcome is delivered after cancellation. The cancel signal is
//!   checked (biased) ahead of the tick, and the in-flight query itself is
//!   raced against it.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::domain::{DealHandle, DealProgress, DealStatus};
use crate::error::{Result, TrackingError};
use crate::node::StorageNode;

/// Cancellation signal for a tracking session.
///
/// Flip the watch value to `true` to cancel; dropping the sender cancels as
/// well, so an abandoned tracker can never poll unobserved.
pub type CancelSignal = watch::Receiver<bool>;

/// Create a cancel signal pair. Convenience over `watch::channel(false)`.
pub fn cancel_signal() -> (watch::Sender<bool>, CancelSignal) {
    watch::channel(false)
}

/// Polling cadence and optional overall deadline.
#[derive(Debug, Clone)]
pub struct TrackerOptions {
    pub cadence: Duration,
    /// Overall wall-clock limit, distinct from caller cancellation. `None`
    /// polls indefinitely.
    pub deadline: Option<Duration>,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            cadence: Duration::from_secs(1),
            deadline: None,
        }
    }
}

/// Polls a deal to its terminal state.
#[derive(Debug, Clone, Default)]
pub struct DealTracker {
    options: TrackerOptions,
}

impl DealTracker {
    pub fn new(options: TrackerOptions) -> Self {
        Self { options }
    }

    /// Track `handle` against `node` until it resolves.
    ///
    /// Returns the terminal status (`Active`) on success. Fails with
    /// [`TrackingError::Rejected`] carrying the terminal status when the
    /// network permanently fails the deal, [`TrackingError::Cancelled`] when
    /// `cancel` fires, [`TrackingError::TimedOut`] past the deadline, or the
    /// propagated transport error if a query fails. Transport errors are not
    /// retried here; retry policy belongs to the caller.
    ///
    /// A deal absent from the node's list is still in progress, not an
    /// error: visibility lags submission.
    pub async fn track(
        &self,
        handle: &DealHandle,
        node: &dyn StorageNode,
        mut cancel: CancelSignal,
    ) -> Result<DealStatus> {
        let mut interval = time::interval(self.options.cadence);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let deadline = self.options.deadline.map(|d| Instant::now() + d);

        debug!(handle = %handle, cadence_ms = self.options.cadence.as_millis() as u64, "Tracking deal");

        loop {
            tokio::select! {
                biased;
                _ = cancelled(&mut cancel) => {
                    info!(handle = %handle, "Deal tracking cancelled");
                    return Err(TrackingError::Cancelled.into());
                }
                _ = deadline_elapsed(deadline) => {
                    info!(handle = %handle, "Deal tracking deadline exceeded");
                    return Err(TrackingError::TimedOut.into());
                }
                _ = interval.tick() => {}
            }

            // The query itself is raced against cancellation so a late
            // response can never become an outcome after cancel.
            let deals = tokio::select! {
                biased;
                _ = cancelled(&mut cancel) => {
                    info!(handle = %handle, "Deal tracking cancelled");
                    return Err(TrackingError::Cancelled.into());
                }
                result = node.client_list_deals() => result?,
            };

            let Some(record) = deals.iter().find(|d| d.handle == *handle) else {
                debug!(handle = %handle, "Deal not yet visible in node deal list");
                continue;
            };

            let status = record.state.translate();
            match status.classify() {
                DealProgress::Success => {
                    info!(handle = %handle, status = %status, "Deal active");
                    return Ok(status);
                }
                DealProgress::Failure => {
                    info!(handle = %handle, status = %status, "Deal failed");
                    return Err(TrackingError::Rejected { status }.into());
                }
                DealProgress::InProgress => {
                    debug!(handle = %handle, status = %status, "Deal in progress");
                }
            }
        }
    }
}

/// Resolves once the cancel signal fires or its sender is dropped.
async fn cancelled(cancel: &mut CancelSignal) {
    // Err means the sender is gone: treat an abandoned tracker as cancelled.
    let _ = cancel.wait_for(|flagged| *flagged).await;
}

/// Resolves at `deadline`; pends forever when there is none.
async fn deadline_elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(at) => time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
