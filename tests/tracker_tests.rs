//! Integration tests for the deal tracking state machine.
//!
//! All tests run under paused tokio time, so cadence assertions are
//! deterministic and instant.

use std::time::Duration;

use fildeal::domain::{DealHandle, DealRecord, DealStatus};
use fildeal::error::{Error, TrackingError};
use fildeal::testkit::node::ScriptedNode;
use fildeal::tracker::{cancel_signal, DealTracker, TrackerOptions};
use tokio::time::Instant;

fn tracker_with_cadence(cadence: Duration) -> DealTracker {
    DealTracker::new(TrackerOptions {
        cadence,
        deadline: None,
    })
}

#[tokio::test(start_paused = true)]
async fn active_on_first_tick_resolves_with_one_query() {
    let node = ScriptedNode::new()
        .with_deal_responses(vec![Ok(vec![DealRecord::new("X", "StorageDealActive")])]);
    let (_cancel_tx, cancel_rx) = cancel_signal();

    let status = tracker_with_cadence(Duration::from_secs(1))
        .track(&DealHandle::from("X"), &node, cancel_rx)
        .await
        .unwrap();

    assert_eq!(status, DealStatus::Active);
    assert_eq!(node.list_deals_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn not_found_then_rejected_fails_after_four_cadenced_queries() {
    let not_found = || Ok(vec![DealRecord::new("X", 1u64)]);
    let node = ScriptedNode::new().with_deal_responses(vec![
        not_found(),
        not_found(),
        not_found(),
        Ok(vec![DealRecord::new("X", 2u64)]),
    ]);
    let (_cancel_tx, cancel_rx) = cancel_signal();
    let started = Instant::now();

    let err = tracker_with_cadence(Duration::from_secs(1))
        .track(&DealHandle::from("X"), &node, cancel_rx)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Tracking(TrackingError::Rejected {
            status: DealStatus::ProposalRejected
        })
    ));
    assert_eq!(err.to_string(), "deal failed with state: ProposalRejected");
    assert_eq!(node.list_deals_count(), 4);
    // First query fires immediately, the remaining three one cadence apart.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(3) && elapsed < Duration::from_secs(4));
}

#[tokio::test(start_paused = true)]
async fn invisible_deal_keeps_polling_until_cancelled() {
    // Fallback is an empty deal list: the handle never becomes visible.
    let node = std::sync::Arc::new(ScriptedNode::new());
    let (cancel_tx, cancel_rx) = cancel_signal();

    let tracker_node = node.clone();
    let tracking = tokio::spawn(async move {
        tracker_with_cadence(Duration::from_secs(1))
            .track(&DealHandle::from("X"), tracker_node.as_ref(), cancel_rx)
            .await
    });

    // Five ticks happen at t = 0..=4s; cancel between the fifth and sixth.
    tokio::time::sleep(Duration::from_millis(4500)).await;
    assert_eq!(node.list_deals_count(), 5);
    cancel_tx.send(true).unwrap();

    let err = tracking.await.unwrap().unwrap_err();
    assert!(matches!(err, Error::Tracking(TrackingError::Cancelled)));
    assert!(err.is_abandoned());
    // No further query after the cancel fired.
    assert_eq!(node.list_deals_count(), 5);
}

#[tokio::test(start_paused = true)]
async fn cancel_during_inflight_query_never_yields_an_outcome() {
    // The only response would classify as Success, but cancellation lands
    // while that query is still in flight.
    let node = std::sync::Arc::new(
        ScriptedNode::new()
            .with_fallback_deals(vec![DealRecord::new("X", "StorageDealActive")])
            .with_list_deals_latency(Duration::from_secs(2)),
    );
    let (cancel_tx, cancel_rx) = cancel_signal();

    let tracker_node = node.clone();
    let tracking = tokio::spawn(async move {
        tracker_with_cadence(Duration::from_secs(1))
            .track(&DealHandle::from("X"), tracker_node.as_ref(), cancel_rx)
            .await
    });

    tokio::time::sleep(Duration::from_secs(1)).await;
    cancel_tx.send(true).unwrap();

    let err = tracking.await.unwrap().unwrap_err();
    assert!(matches!(err, Error::Tracking(TrackingError::Cancelled)));
}

#[tokio::test(start_paused = true)]
async fn dropping_the_cancel_sender_stops_tracking() {
    let node = ScriptedNode::new();
    let (cancel_tx, cancel_rx) = cancel_signal();
    drop(cancel_tx);

    let err = tracker_with_cadence(Duration::from_secs(1))
        .track(&DealHandle::from("X"), &node, cancel_rx)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Tracking(TrackingError::Cancelled)));
    assert_eq!(node.list_deals_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn slow_queries_never_overlap() {
    // Queries take three cadence intervals each; ticks fired meanwhile must
    // be skipped, not queued.
    let node = ScriptedNode::new()
        .with_deal_responses(vec![
            Ok(vec![DealRecord::new("X", "StorageDealSealing")]),
            Ok(vec![DealRecord::new("X", "StorageDealActive")]),
        ])
        .with_list_deals_latency(Duration::from_secs(3));
    let (_cancel_tx, cancel_rx) = cancel_signal();

    let status = tracker_with_cadence(Duration::from_secs(1))
        .track(&DealHandle::from("X"), &node, cancel_rx)
        .await
        .unwrap();

    assert_eq!(status, DealStatus::Active);
    assert_eq!(node.list_deals_count(), 2);
    assert_eq!(node.max_in_flight(), 1);
}

#[tokio::test(start_paused = true)]
async fn deadline_yields_timed_out_distinct_from_cancelled() {
    let tracker = DealTracker::new(TrackerOptions {
        cadence: Duration::from_secs(1),
        deadline: Some(Duration::from_secs(3)),
    });
    let node = ScriptedNode::new();
    let (_cancel_tx, cancel_rx) = cancel_signal();

    let err = tracker
        .track(&DealHandle::from("X"), &node, cancel_rx)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Tracking(TrackingError::TimedOut)));
    assert!(err.is_abandoned());
    assert!(node.list_deals_count() >= 1);
}

#[tokio::test(start_paused = true)]
async fn transport_errors_propagate_without_retry() {
    let node = ScriptedNode::new()
        .with_deal_responses(vec![Err(Error::Connection("node unreachable".into()))]);
    let (_cancel_tx, cancel_rx) = cancel_signal();

    let err = tracker_with_cadence(Duration::from_secs(1))
        .track(&DealHandle::from("X"), &node, cancel_rx)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Connection(_)));
    assert_eq!(node.list_deals_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn unknown_status_from_newer_protocol_keeps_polling() {
    let node = ScriptedNode::new().with_deal_responses(vec![
        Ok(vec![DealRecord::new("X", 42u64)]),
        Ok(vec![DealRecord::new("X", "StorageDealSomethingNew")]),
        Ok(vec![DealRecord::new("X", "StorageDealActive")]),
    ]);
    let (_cancel_tx, cancel_rx) = cancel_signal();

    let status = tracker_with_cadence(Duration::from_secs(1))
        .track(&DealHandle::from("X"), &node, cancel_rx)
        .await
        .unwrap();

    assert_eq!(status, DealStatus::Active);
    assert_eq!(node.list_deals_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn other_clients_deals_are_ignored() {
    let node = ScriptedNode::new().with_deal_responses(vec![
        // A different deal is already active; ours shows up a tick later.
        Ok(vec![DealRecord::new("other", "StorageDealActive")]),
        Ok(vec![
            DealRecord::new("other", "StorageDealActive"),
            DealRecord::new("X", "StorageDealActive"),
        ]),
    ]);
    let (_cancel_tx, cancel_rx) = cancel_signal();

    let status = tracker_with_cadence(Duration::from_secs(1))
        .track(&DealHandle::from("X"), &node, cancel_rx)
        .await
        .unwrap();

    assert_eq!(status, DealStatus::Active);
    assert_eq!(node.list_deals_count(), 2);
}
