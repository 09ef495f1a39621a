//! IMSMQMessage Tests
//!
//! Property getters and setters plus Send, driven through the generated
//! client against an in-memory message.

mod common;

use common::*;
use dcom::oaut::{Bstr, Variant, VARIANT_TRUE};
use dcom::payload::ValueRequest;
use dcom::{CallOptions, Hresult, InterfacePointer};
use dcom_interfaces::mqac::imsmqmessage::*;

#[tokio::test]
async fn test_label_roundtrip() {
    let harness = Harness::new();
    let client = harness.message_client();
    let opts = CallOptions::new();

    client
        .set_label(ValueRequest::new(Some(Bstr::from("invoice 42"))), &opts)
        .await
        .unwrap();
    let label = client.get_label(GetLabelRequest::new(), &opts).await.unwrap();
    assert_eq!(label.value, Some(Bstr::from("invoice 42")));
}

/// Test: a null label BSTR clears the property
#[tokio::test]
async fn test_null_label_clears() {
    let harness = Harness::new();
    *harness.message.label.lock() = Some(Bstr::from("stale"));
    let client = harness.message_client();
    let opts = CallOptions::new();

    client.set_label(ValueRequest::new(None), &opts).await.unwrap();
    assert!(harness.message.label.lock().is_none());
    let label = client.get_label(GetLabelRequest::new(), &opts).await.unwrap();
    assert!(label.value.is_none());
}

#[tokio::test]
async fn test_priority_range_enforced() {
    let harness = Harness::new();
    let client = harness.message_client();
    let opts = CallOptions::new();

    client.set_priority(ValueRequest::new(MAX_PRIORITY), &opts).await.unwrap();
    let err = client
        .set_priority(ValueRequest::new(MAX_PRIORITY + 1), &opts)
        .await
        .unwrap_err();
    assert_eq!(err.hresult(), Some(Hresult::MQ_ERROR_PROPERTY));

    let priority = client.get_priority(GetPriorityRequest::new(), &opts).await.unwrap();
    assert_eq!(priority.value, MAX_PRIORITY);
}

/// Test: a byte array body survives both data representations
#[tokio::test]
async fn test_byte_array_body() {
    for harness in [Harness::new(), Harness::big_endian()] {
        let client = harness.message_client();
        let opts = CallOptions::new();
        let body = Variant::bytes(b"<order id=\"7\"/>".to_vec());

        client.set_body(ValueRequest::new(Some(body)), &opts).await.unwrap();
        let fetched = client.get_body(GetBodyRequest::new(), &opts).await.unwrap();
        assert_eq!(
            fetched.value.as_ref().and_then(Variant::as_bytes),
            Some(&b"<order id=\"7\"/>"[..])
        );
    }
}

#[tokio::test]
async fn test_is_authenticated_is_variant_bool() {
    let harness = Harness::new();
    let flag = harness
        .message_client()
        .get_is_authenticated(GetIsAuthenticatedRequest::new(), &CallOptions::new())
        .await
        .unwrap();
    assert_eq!(flag.value, VARIANT_TRUE);
}

#[tokio::test]
async fn test_send_delivers_destination() {
    let harness = Harness::new();
    let queue = InterfacePointer::new(ORDERS_OBJREF.to_vec());
    let request = SendRequest::new(queue.clone()).with_transaction(Variant::I4(transaction::SINGLE_MESSAGE));

    harness
        .message_client()
        .send(request, &CallOptions::new())
        .await
        .unwrap();
    assert_eq!(*harness.message.sent_to.lock(), vec![Some(queue)]);
}

/// Test: Send without a destination is refused by the server
#[tokio::test]
async fn test_send_without_destination_rejected() {
    let harness = Harness::new();
    let request = SendRequest {
        orpc_this: dcom::OrpcThis::new(),
        ..Default::default()
    };

    let err = harness
        .message_client()
        .send(request, &CallOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.hresult(), Some(Hresult::E_INVALIDARG));
    assert!(harness.message.sent_to.lock().is_empty());
}

/// Test: properties the message does not implement answer E_NOTIMPL
#[tokio::test]
async fn test_unimplemented_property() {
    let harness = Harness::new();
    let err = harness
        .message_client()
        .get_sender_id(GetSenderIDRequest::new(), &CallOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.hresult(), Some(Hresult::E_NOTIMPL));
}

/// Test: inherited IDispatch methods still route on the message IPID
#[tokio::test]
async fn test_message_dispatch_base() {
    let harness = Harness::new();
    let err = harness
        .message_client()
        .dispatch()
        .get_type_info_count(dcom::idispatch::GetTypeInfoCountRequest::new(), &CallOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.hresult(), Some(Hresult::E_NOTIMPL));
}
