//! Dispatch Tests
//!
//! Route calls through the generated server handles:
//! - opnums below an interface's own range reach the base interface
//! - handler failures become the response `Return`
//! - nonzero `Return` values surface as errors carrying the response
//! - IPID resolution happens before the transport is touched

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use common::*;
use dcom::idispatch::{GetTypeInfoCountRequest, InvokeRequest};
use dcom::iunknown::AddRefRequest;
use dcom::midl_ndr::NdrContext;
use dcom::oaut::Variant;
use dcom::operation::encode_request;
use dcom::payload::OrpcRequest;
use dcom::{CallOptions, DcomError, Hresult, Ipid};
use dcom_interfaces::coma::icatalogutils::*;
use dcom_interfaces::mqac::imsmqquery3::*;

/// Test: opnum 3 (GetTypeInfoCount) on IMSMQQuery3 reaches IDispatch
#[tokio::test]
async fn test_query3_opnum_3_reaches_dispatch() {
    let harness = Harness::new();

    let count = harness
        .query_client()
        .dispatch()
        .get_type_info_count(GetTypeInfoCountRequest::new(), &CallOptions::new())
        .await
        .unwrap();
    assert_eq!(count.value, 0);
}

/// Test: opnum 6 (Invoke) on IMSMQQuery3 reaches IDispatch
#[tokio::test]
async fn test_query3_opnum_6_reaches_dispatch() {
    let harness = Harness::new();

    let request = InvokeRequest {
        orpc_this: dcom::OrpcThis::new(),
        disp_id_member: 42,
        ..Default::default()
    };
    let response = harness
        .query_client()
        .dispatch()
        .invoke(request, &CallOptions::new())
        .await
        .unwrap();
    assert_eq!(response.var_result, Some(Variant::I4(42)));
}

/// Test: opnum 7 (LookupQueue_v2) is handled by IMSMQQuery3 itself
#[tokio::test]
async fn test_query3_opnum_7_is_own_method() {
    let harness = Harness::new();

    let found = harness
        .query_client()
        .lookup_queue_v2(LookupQueueV2Request::new(QueueFilter::by_label("orders")), &CallOptions::new())
        .await
        .unwrap();
    assert_eq!(found.value.unwrap().data, ORDERS_OBJREF.to_vec());
}

/// Test: IUnknown methods are routed for a directly derived interface too
#[tokio::test]
async fn test_catalog_add_ref_reaches_unknown() {
    let harness = Harness::new();

    // AddRef's Return is the new reference count, which is nonzero
    let err = harness
        .catalog_client()
        .unknown()
        .add_ref(AddRefRequest::new(), &CallOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.hresult(), Some(Hresult::from_code(1)));
    assert_eq!(err.response.as_ref().map(|r| r.hresult), Some(1));
    assert_eq!(harness.catalog.refs.load(Ordering::SeqCst), 1);
}

/// Test: a handler error is reported through `Return` and the client sees
/// both the response and the error
#[tokio::test]
async fn test_handler_error_sets_return() {
    let harness = Harness::new();

    let err = harness
        .catalog_client()
        .validate_user(ValidateUserRequest::new(PRINCIPAL, "wrong"), &CallOptions::new())
        .await
        .unwrap_err();

    assert!(err.source.is_hresult());
    assert_eq!(err.hresult(), Some(Hresult::E_ACCESSDENIED));
    let response = err.response.expect("response kept alongside the error");
    assert_eq!(response.hresult, Hresult::E_ACCESSDENIED.0);
}

/// Test: `Return == S_FALSE` from a successful handler still reaches the
/// caller as an error, together with the response
#[tokio::test]
async fn test_s_false_return_carries_response() {
    let harness = Harness::new();

    let err = harness
        .catalog_client()
        .validate_user(ValidateUserRequest::new(GUEST, ""), &CallOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "/ICatalogUtils/v0/ValidateUser: S_FALSE (0x00000001)");
    assert_eq!(err.hresult(), Some(Hresult::S_FALSE));
    assert_eq!(err.response.map(|r| r.hresult), Some(1));

    // the same error converts into a plain DcomError for `?`
    let err: DcomError = harness
        .catalog_client()
        .validate_user(ValidateUserRequest::new(GUEST, ""), &CallOptions::new())
        .await
        .unwrap_err()
        .into();
    assert!(matches!(err, DcomError::Hresult { op: "/ICatalogUtils/v0/ValidateUser", .. }));
}

/// Test: a failing lookup keeps the (empty) out-parameter
#[tokio::test]
async fn test_failed_lookup_keeps_response() {
    let harness = Harness::new();

    let err = harness
        .query_client()
        .lookup_queue_v2(LookupQueueV2Request::new(QueueFilter::by_label("missing")), &CallOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.hresult(), Some(Hresult::MQ_ERROR_QUEUE_NOT_FOUND));
    let (response, source) = err.into_parts();
    assert!(response.unwrap().value.is_none());
    assert!(source.to_string().contains("LookupQueue_v2"));
}

/// Test: methods a server leaves out answer E_NOTIMPL
#[tokio::test]
async fn test_unimplemented_method_returns_e_notimpl() {
    let harness = Harness::new();

    let err = harness
        .query_client()
        .get_properties(GetPropertiesRequest::new(), &CallOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.hresult(), Some(Hresult::E_NOTIMPL));
}

/// Test: an opnum the interface does not own is unavailable
#[tokio::test]
async fn test_foreign_opnum_is_unavailable() {
    let harness = Harness::new();

    // IMSMQQuery3::LookupQueue (opnum 9) sent to the ICatalogUtils IPID
    let err = harness
        .query_client()
        .lookup_queue(
            LookupQueueRequest::new(QueueFilter::by_label("orders")),
            &CallOptions::new().with_ipid(harness.catalog_ipid),
        )
        .await
        .unwrap_err();
    match err.source {
        DcomError::OperationUnavailable { interface, opnum } => {
            assert_eq!(interface, "ICatalogUtils");
            assert_eq!(opnum, 9);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.response.is_none());
}

/// Test: the raw handle answers `None` past the end of the method table
#[tokio::test]
async fn test_handle_returns_none_past_table() {
    let handle = new_query3_server_handle(Arc::new(DirectoryFixture::new()));
    let mut op = GetPropertiesOperation::new(OrpcRequest::new());
    let stub = encode_request(&mut op, NdrContext::new()).unwrap();

    assert!(handle(10, stub.clone(), NdrContext::new()).await.unwrap().is_none());
    let dispatched = handle(8, stub, NdrContext::new()).await.unwrap().unwrap();
    assert!(matches!(dispatched.error, Some(DcomError::NotImplemented)));
}

/// Test: without any IPID the call fails before reaching the transport
#[tokio::test]
async fn test_missing_ipid_never_reaches_transport() {
    let harness = Harness::new();
    let counting = Arc::new(CountingConn::new(harness.conn.clone()));
    let client = CatalogUtilsClient::new(counting.clone());

    let err = client
        .wait_for_end_writes(WaitForEndWritesRequest::new(), &CallOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err.source, DcomError::IpidMissing { .. }));
    assert_eq!(counting.calls(), 0);
    assert_eq!(harness.conn.invocations(), 0);
}

/// Test: the per-call IPID wins over the bound one
#[tokio::test]
async fn test_call_ipid_overrides_bound_ipid() {
    let harness = Harness::new();
    let counting = Arc::new(CountingConn::new(harness.conn.clone()));
    let client = CatalogUtilsClient::new(counting.clone()).with_ipid(Ipid::generate());

    client
        .wait_for_end_writes(
            WaitForEndWritesRequest::new(),
            &CallOptions::new().with_ipid(harness.catalog_ipid),
        )
        .await
        .unwrap();
    assert_eq!(counting.calls(), 1);
    assert_eq!(counting.names(), vec!["/ICatalogUtils/v0/WaitForEndWrites"]);
    assert_eq!(harness.catalog.flushes.load(Ordering::SeqCst), 1);
}

/// Test: an IPID nobody registered is reported as such
#[tokio::test]
async fn test_unregistered_ipid_not_found() {
    let harness = Harness::new();
    let stray = Ipid::generate();
    let client = harness.catalog_client().with_ipid(stray);

    let err = client
        .wait_for_end_writes(WaitForEndWritesRequest::new(), &CallOptions::new())
        .await
        .unwrap_err();
    match err.source {
        DcomError::InterfaceNotFound(ipid) => assert_eq!(ipid, stray),
        other => panic!("unexpected error: {other}"),
    }
}

/// Test: unregistering an IPID stops delivery to its server
#[tokio::test]
async fn test_unregister_stops_delivery() {
    let harness = Harness::new();
    let client = harness.catalog_client();

    client
        .wait_for_end_writes(WaitForEndWritesRequest::new(), &CallOptions::new())
        .await
        .unwrap();
    assert!(harness.conn.registry().unregister(&harness.catalog_ipid));

    let err = client
        .wait_for_end_writes(WaitForEndWritesRequest::new(), &CallOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err.source, DcomError::InterfaceNotFound(_)));
    assert_eq!(harness.catalog.flushes.load(Ordering::SeqCst), 1);
}
