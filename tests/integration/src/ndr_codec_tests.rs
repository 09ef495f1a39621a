//! NDR Codec Tests
//!
//! Exercise the marshalling rules end to end through real stubs:
//! - empty strings and empty arrays travel as null pointers
//! - shared counts are derived from the first non-empty array
//! - oversized conformance is rejected before allocation
//! - both data representations survive the loopback round trip

mod common;

use bytes::Bytes;
use common::*;
use dcom::midl_ndr::{NdrContext, NdrError};
use dcom::operation::{decode_request, decode_response, encode_request, encode_response, PayloadHooks};
use dcom::{CallOptions, DcomError};
use dcom_interfaces::coma::icatalogutils::*;
use dcom_interfaces::mqac::imsmqquery3::*;

/// Test: an empty password is a null LPWSTR on the wire and reaches the
/// server as an empty string
#[tokio::test]
async fn test_empty_password_travels_as_null_pointer() {
    let harness = Harness::new();

    let mut op = ValidateUserOperation::new(ValidateUserRequest::new(PRINCIPAL, ""));
    let stub = encode_request(&mut op, NdrContext::new()).unwrap();
    assert_eq!(&stub[stub.len() - 4..], &[0, 0, 0, 0]);

    let err = harness
        .catalog_client()
        .validate_user(ValidateUserRequest::new(PRINCIPAL, ""), &CallOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.hresult(), Some(dcom::Hresult::E_ACCESSDENIED));
    assert_eq!(*harness.catalog.seen_passwords.lock(), vec![String::new()]);
}

/// Test: the class count is derived from ClassIDs and the shorter arrays are
/// nil-filled to it
#[tokio::test]
async fn test_event_class_count_derived_and_nil_filled() {
    let harness = Harness::new();

    let classes = harness
        .catalog_client()
        .get_event_classes_for_iid(GetEventClassesForIIDRequest::new(KNOWN_IID), &CallOptions::new())
        .await
        .unwrap();

    assert_eq!(classes.classes_count, 2);
    assert_eq!(classes.class_ids, vec!["{G1}", "{G2}"]);
    assert_eq!(classes.prog_ids, vec!["Catalog.Event.1", ""]);
    assert_eq!(classes.descriptions, vec!["", ""]);
}

/// Test: an IID with no event classes answers with null arrays and a zero
/// count
#[tokio::test]
async fn test_unknown_iid_returns_empty_arrays() {
    let harness = Harness::new();

    let classes = harness
        .catalog_client()
        .get_event_classes_for_iid(
            GetEventClassesForIIDRequest::new("{11111111-2222-3333-4444-555555555555}"),
            &CallOptions::new(),
        )
        .await
        .unwrap();

    assert_eq!(classes.classes_count, 0);
    assert!(classes.class_ids.is_empty());
    assert!(classes.prog_ids.is_empty());
    assert!(classes.descriptions.is_empty());
}

/// Test: an explicit nonzero count wins over the array lengths
#[test]
fn test_explicit_count_is_kept() {
    let mut op = GetEventClassesForIIDOperation::default();
    op.response = GetEventClassesForIIDResponse {
        classes_count: 3,
        class_ids: vec!["{G1}".into()],
        ..Default::default()
    };
    let stub = encode_response(&mut op, NdrContext::new()).unwrap();

    let mut decoded = GetEventClassesForIIDOperation::default();
    decode_response(&mut decoded, stub, NdrContext::new()).unwrap();
    assert_eq!(decoded.response.classes_count, 3);
    assert_eq!(decoded.response.class_ids, vec!["{G1}", "", ""]);
    assert_eq!(decoded.response.descriptions.len(), 3);
}

/// Test: a conformance word larger than the rest of the stub fails with a
/// buffer overflow naming the array
#[test]
fn test_oversized_conformance_rejected() {
    let mut data = Vec::new();
    data.extend_from_slice(&[0u8; 8]);
    data.extend_from_slice(&1000u32.to_le_bytes());
    data.extend_from_slice(&0x0002_0000u32.to_le_bytes());
    data.extend_from_slice(&1000u32.to_le_bytes());
    data.extend_from_slice(&[0u8; 16]);

    let mut op = GetEventClassesForIIDOperation::default();
    let err = decode_response(&mut op, Bytes::from(data), NdrContext::new()).unwrap_err();
    match err {
        DcomError::Ndr { source, .. } => {
            assert!(matches!(source, NdrError::BufferOverflow { size: 1000, .. }));
            assert_eq!(source.to_string(), "buffer overflow for size 1000 of array ClassIDs");
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// Test: a truncated request stub is rejected by the server side decode
#[test]
fn test_truncated_request_rejected() {
    let mut op = ValidateUserOperation::new(ValidateUserRequest::new(PRINCIPAL, PASSWORD));
    let stub = encode_request(&mut op, NdrContext::new()).unwrap();

    let mut decoded = ValidateUserOperation::default();
    let truncated = stub.slice(..stub.len() - 6);
    assert!(decode_request(&mut decoded, truncated, NdrContext::new()).is_err());
}

/// Test: trailing bytes after the last parameter are ignored
#[test]
fn test_trailing_bytes_tolerated() {
    let mut op = WaitForEndWritesOperation::new(WaitForEndWritesRequest::new());
    let stub = encode_request(&mut op, NdrContext::new()).unwrap();
    let mut padded = stub.to_vec();
    padded.extend_from_slice(&[0xAA; 4]);

    let mut decoded = WaitForEndWritesOperation::default();
    decode_request(&mut decoded, Bytes::from(padded), NdrContext::new()).unwrap();
    assert_eq!(decoded.request, op.request);
}

/// Test: a request hook sees the prepared request and its edits reach the
/// server
#[tokio::test]
async fn test_request_hook_rewrites_before_marshal() {
    let harness = Harness::new();
    let hooks = PayloadHooks::new().on_request(|op: &mut ValidateUserOperation| {
        op.request.password = PASSWORD.to_string();
        Ok(())
    });
    let op = ValidateUserOperation::new(ValidateUserRequest::new(PRINCIPAL, "wrong")).with_hooks(hooks);

    let client = harness.catalog_client();
    client.base().call_op(op, &CallOptions::new()).await.unwrap();
    assert_eq!(*harness.catalog.seen_passwords.lock(), vec![PASSWORD.to_string()]);
}

/// Test: a failing request hook aborts the call before the server runs
#[tokio::test]
async fn test_failing_hook_aborts_call() {
    let harness = Harness::new();
    let hooks = PayloadHooks::new()
        .on_request(|_: &mut WaitForEndWritesOperation| Err(DcomError::InvalidData("refused".into())));
    let op = WaitForEndWritesOperation::new(WaitForEndWritesRequest::new()).with_hooks(hooks);

    let client = harness.catalog_client();
    assert!(client.base().call_op(op, &CallOptions::new()).await.is_err());
    assert_eq!(harness.catalog.flushes.load(std::sync::atomic::Ordering::SeqCst), 0);
}

/// Test: every call works the same with big-endian data representation
#[tokio::test]
async fn test_big_endian_loopback() {
    let harness = Harness::big_endian();

    harness
        .catalog_client()
        .validate_user(ValidateUserRequest::new(PRINCIPAL, PASSWORD), &CallOptions::new())
        .await
        .unwrap();

    let classes = harness
        .catalog_client()
        .get_event_classes_for_iid(GetEventClassesForIIDRequest::new(KNOWN_IID), &CallOptions::new())
        .await
        .unwrap();
    assert_eq!(classes.classes_count, 2);
    assert_eq!(classes.class_ids, vec!["{G1}", "{G2}"]);

    let found = harness
        .query_client()
        .lookup_queue_v2(LookupQueueV2Request::new(QueueFilter::by_label("orders")), &CallOptions::new())
        .await
        .unwrap();
    assert_eq!(found.value.unwrap().data, ORDERS_OBJREF.to_vec());
}

/// Test: encoding the same response with the two data representations gives
/// equal lengths and byte-swapped counts
#[test]
fn test_data_representation_swaps_counts() {
    let response = GetEventClassesForIIDResponse {
        class_ids: vec!["{G1}".into(), "{G2}".into()],
        ..Default::default()
    };

    let mut little = GetEventClassesForIIDOperation::default();
    little.response = response.clone();
    let le = encode_response(&mut little, NdrContext::new()).unwrap();

    let mut big = GetEventClassesForIIDOperation::default();
    big.response = response;
    let be = encode_response(&mut big, NdrContext::big_endian()).unwrap();

    assert_eq!(le.len(), be.len());
    assert_eq!(&le[8..12], &2u32.to_le_bytes());
    assert_eq!(&be[8..12], &2u32.to_be_bytes());
}

/// Test: LookupQueue filters and the multicast address reach the server
#[tokio::test]
async fn test_lookup_queue_filters_roundtrip() {
    let harness = Harness::new();

    let request = LookupQueueRequest::new(QueueFilter::by_label("orders"))
        .with_multicast_address("234.1.1.1:8001", rel::EQ);
    let found = harness
        .query_client()
        .lookup_queue(request, &CallOptions::new())
        .await
        .unwrap();

    assert!(found.value.is_some());
    let multicast = harness.directory.last_multicast.lock().clone().unwrap();
    assert_eq!(multicast.as_str(), Some("234.1.1.1:8001"));
}
