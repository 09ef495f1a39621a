//! Concurrency Tests
//!
//! Many clients sharing one loopback connection:
//! - concurrent calls on one IPID and across IPIDs stay independent
//! - per-call timeouts cut slow handlers off
//! - clients clone cheaply and keep their own bound IPID

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use common::*;
use dcom::{CallOptions, ClientConfig, DcomError};
use dcom_interfaces::coma::icatalogutils::*;
use dcom_interfaces::mqac::imsmqquery3::*;
use futures::future::join_all;
use tokio::sync::Barrier;

/// Test: many tasks validating at once all see their own outcome
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_validate_user() {
    const NUM_CLIENTS: usize = 32;

    let harness = Harness::new();
    let barrier = Arc::new(Barrier::new(NUM_CLIENTS));

    let mut handles = Vec::new();
    for client_id in 0..NUM_CLIENTS {
        let client = harness.catalog_client();
        let barrier = barrier.clone();
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            // odd clients send a wrong password
            let password = if client_id % 2 == 0 { PASSWORD } else { "wrong" };
            client
                .validate_user(ValidateUserRequest::new(PRINCIPAL, password), &CallOptions::new())
                .await
                .is_ok()
        }));
    }

    let results: Vec<bool> = join_all(handles).await.into_iter().map(|r| r.unwrap()).collect();
    let accepted = results.iter().filter(|ok| **ok).count();
    assert_eq!(accepted, NUM_CLIENTS / 2);
    for (client_id, ok) in results.iter().enumerate() {
        assert_eq!(*ok, client_id % 2 == 0, "client {client_id}");
    }
    assert_eq!(harness.conn.invocations(), NUM_CLIENTS);
    assert_eq!(harness.catalog.seen_passwords.lock().len(), NUM_CLIENTS);
}

/// Test: calls to different interfaces interleave on one connection
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_mixed_interfaces_interleave() {
    const ROUNDS: usize = 20;

    let harness = Harness::new();
    let catalog = harness.catalog_client();
    let query = harness.query_client();

    let catalog_calls = (0..ROUNDS).map(|_| {
        let catalog = catalog.clone();
        async move {
            catalog
                .get_event_classes_for_iid(GetEventClassesForIIDRequest::new(KNOWN_IID), &CallOptions::new())
                .await
                .map(|classes| classes.classes_count)
                .map_err(|err| err.source)
        }
    });
    let query_calls = (0..ROUNDS).map(|_| {
        let query = query.clone();
        async move {
            query
                .lookup_queue_v2(LookupQueueV2Request::new(QueueFilter::by_label("orders")), &CallOptions::new())
                .await
                .map(|found| found.value.map(|p| p.data.len()).unwrap_or(0) as u32)
                .map_err(|err| err.source)
        }
    });

    let (counts, lengths) = futures::join!(join_all(catalog_calls), join_all(query_calls));
    for count in counts {
        assert_eq!(count.unwrap(), 2);
    }
    for len in lengths {
        assert_eq!(len.unwrap(), ORDERS_OBJREF.len() as u32);
    }
    assert_eq!(harness.conn.invocations(), 2 * ROUNDS);
}

/// Test: a slow handler is abandoned after the call timeout
#[tokio::test]
async fn test_call_timeout() {
    let harness = Harness::with_catalog(CatalogFixture::slow(Duration::from_millis(500)));
    let client = harness.catalog_client();

    let start = Instant::now();
    let err = client
        .wait_for_end_writes(
            WaitForEndWritesRequest::new(),
            &CallOptions::new().with_timeout(Duration::from_millis(20)),
        )
        .await
        .unwrap_err();
    assert!(start.elapsed() < Duration::from_millis(500));
    match err.source {
        DcomError::Timeout { op, timeout } => {
            assert_eq!(op, "/ICatalogUtils/v0/WaitForEndWrites");
            assert_eq!(timeout, Duration::from_millis(20));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(harness.catalog.flushes.load(Ordering::SeqCst), 0);
}

/// Test: the client's default timeout applies when the call sets none
#[tokio::test]
async fn test_default_timeout_from_config() {
    let harness = Harness::with_catalog(CatalogFixture::slow(Duration::from_millis(500)));
    let client = harness
        .catalog_client()
        .with_config(ClientConfig::new().with_default_timeout(Duration::from_millis(20)))
        .with_ipid(harness.catalog_ipid);

    let err = client
        .wait_for_end_writes(WaitForEndWritesRequest::new(), &CallOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err.source, DcomError::Timeout { .. }));
}

/// Test: a generous timeout lets the slow handler finish
#[tokio::test]
async fn test_slow_handler_within_timeout() {
    let harness = Harness::with_catalog(CatalogFixture::slow(Duration::from_millis(10)));

    harness
        .catalog_client()
        .wait_for_end_writes(
            WaitForEndWritesRequest::new(),
            &CallOptions::new().with_timeout(Duration::from_secs(5)),
        )
        .await
        .unwrap();
    assert_eq!(harness.catalog.flushes.load(Ordering::SeqCst), 1);
}

/// Test: slow calls do not hold up fast ones on the same connection
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_slow_call_does_not_block_others() {
    let harness = Harness::with_catalog(CatalogFixture::slow(Duration::from_millis(200)));
    let catalog = harness.catalog_client();
    let query = harness.query_client();

    let slow = tokio::spawn(async move {
        catalog
            .wait_for_end_writes(WaitForEndWritesRequest::new(), &CallOptions::new())
            .await
            .is_ok()
    });

    let start = Instant::now();
    query
        .lookup_queue_v2(LookupQueueV2Request::new(QueueFilter::by_label("orders")), &CallOptions::new())
        .await
        .unwrap();
    assert!(start.elapsed() < Duration::from_millis(200));

    assert!(slow.await.unwrap());
}
