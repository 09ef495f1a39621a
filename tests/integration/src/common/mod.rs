//! Common test utilities and fixtures for integration tests
//!
//! Every suite drives real stub clients against fixture servers registered
//! on an in-process [`LoopbackConn`], so each call runs the full marshal,
//! dispatch and unmarshal path.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dcom::idispatch::{
    DispatchServer, GetTypeInfoCountRequest, GetTypeInfoCountResponse, InvokeRequest, InvokeResponse,
};
use dcom::iunknown::{AddRefRequest, AddRefResponse, UnknownServer};
use dcom::midl_ndr::NdrContext;
use dcom::oaut::{Bstr, Variant};
use dcom::operation::Operation;
use dcom::payload::{OrpcResponse, ValueResponse};
use dcom::{
    CallOptions, ClientConfig, Conn, DcomError, Hresult, InterfacePointer, Ipid, LoopbackConfig, LoopbackConn,
    Result, ServerRegistry,
};
use dcom_interfaces::coma::icatalogutils::*;
use dcom_interfaces::mqac::imsmqmessage::*;
use dcom_interfaces::mqac::imsmqquery3::*;
use parking_lot::Mutex;
use tracing::Level;

/// Initialize logging for tests
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Credentials the catalog fixture accepts
pub const PRINCIPAL: &str = "alice";
pub const PASSWORD: &str = "secret";

/// Principal the catalog fixture answers with `S_FALSE`
pub const GUEST: &str = "guest";

/// IID with registered event classes in the catalog fixture
pub const KNOWN_IID: &str = "{00000000-0000-0000-c000-000000000046}";

/// OBJREF bytes handed out for the `orders` queue
pub const ORDERS_OBJREF: &[u8] = b"MEOW\x01\x00\x00\x00orders";

/// ICatalogUtils fixture with a fixed credential and an event class table.
///
/// Event classes deliberately leave ProgIDs short and Descriptions empty so
/// the shared count has to be derived on the way out.
#[derive(Default)]
pub struct CatalogFixture {
    /// Delay every WaitForEndWrites by this much
    pub write_delay: Option<Duration>,
    pub refs: AtomicU32,
    pub flushes: AtomicUsize,
    pub seen_passwords: Mutex<Vec<String>>,
}

impl CatalogFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slow(write_delay: Duration) -> Self {
        Self {
            write_delay: Some(write_delay),
            ..Self::default()
        }
    }
}

#[async_trait]
impl UnknownServer for CatalogFixture {
    async fn add_ref(&self, _request: AddRefRequest) -> Result<AddRefResponse> {
        let refs = self.refs.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(AddRefResponse {
            hresult: refs,
            ..Default::default()
        })
    }
}

#[async_trait]
impl CatalogUtilsServer for CatalogFixture {
    async fn validate_user(&self, request: ValidateUserRequest) -> Result<ValidateUserResponse> {
        self.seen_passwords.lock().push(request.password.clone());
        if request.principal_name == GUEST {
            return Ok(OrpcResponse::new(Hresult::S_FALSE));
        }
        if request.principal_name == PRINCIPAL && request.password == PASSWORD {
            Ok(OrpcResponse::default())
        } else {
            Err(DcomError::Status(Hresult::E_ACCESSDENIED))
        }
    }

    async fn wait_for_end_writes(&self, _request: WaitForEndWritesRequest) -> Result<WaitForEndWritesResponse> {
        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(OrpcResponse::default())
    }

    async fn get_event_classes_for_iid(
        &self,
        request: GetEventClassesForIIDRequest,
    ) -> Result<GetEventClassesForIIDResponse> {
        if request.iid != KNOWN_IID {
            return Ok(GetEventClassesForIIDResponse::default());
        }
        Ok(GetEventClassesForIIDResponse {
            class_ids: vec!["{G1}".into(), "{G2}".into()],
            prog_ids: vec!["Catalog.Event.1".into()],
            ..Default::default()
        })
    }
}

/// IMSMQQuery3 fixture: a queue directory keyed by label, with the IDispatch
/// methods GetTypeInfoCount and Invoke answered as well.
pub struct DirectoryFixture {
    pub queues: HashMap<String, Vec<u8>>,
    pub last_multicast: Mutex<Option<Variant>>,
}

impl DirectoryFixture {
    pub fn new() -> Self {
        let mut queues = HashMap::new();
        queues.insert("orders".to_string(), ORDERS_OBJREF.to_vec());
        Self {
            queues,
            last_multicast: Mutex::new(None),
        }
    }

    fn lookup(&self, filter: &QueueFilter) -> Result<Option<InterfacePointer>> {
        let label = filter.label.as_ref().and_then(Variant::as_str).unwrap_or_default();
        self.queues
            .get(label)
            .map(|objref| Some(InterfacePointer::new(objref.clone())))
            .ok_or(DcomError::Status(Hresult::MQ_ERROR_QUEUE_NOT_FOUND))
    }
}

impl UnknownServer for DirectoryFixture {}

#[async_trait]
impl DispatchServer for DirectoryFixture {
    async fn get_type_info_count(&self, _request: GetTypeInfoCountRequest) -> Result<GetTypeInfoCountResponse> {
        Ok(ValueResponse::new(0))
    }

    async fn invoke(&self, request: InvokeRequest) -> Result<InvokeResponse> {
        Ok(InvokeResponse {
            var_result: Some(Variant::I4(request.disp_id_member)),
            ..Default::default()
        })
    }
}

#[async_trait]
impl Query3Server for DirectoryFixture {
    async fn lookup_queue_v2(&self, request: LookupQueueV2Request) -> Result<LookupQueueV2Response> {
        Ok(ValueResponse::new(self.lookup(&request.filter)?))
    }

    async fn lookup_queue(&self, request: LookupQueueRequest) -> Result<LookupQueueResponse> {
        *self.last_multicast.lock() = request.multicast_address.clone();
        Ok(ValueResponse::new(self.lookup(&request.filter)?))
    }
}

/// IMSMQMessage fixture holding a handful of properties.
#[derive(Default)]
pub struct MessageFixture {
    pub label: Mutex<Option<Bstr>>,
    pub priority: Mutex<i32>,
    pub body: Mutex<Option<Variant>>,
    pub sent_to: Mutex<Vec<Option<InterfacePointer>>>,
}

impl UnknownServer for MessageFixture {}
impl DispatchServer for MessageFixture {}

#[async_trait]
impl MessageServer for MessageFixture {
    async fn get_label(&self, _request: GetLabelRequest) -> Result<GetLabelResponse> {
        Ok(ValueResponse::new(self.label.lock().clone()))
    }

    async fn set_label(&self, request: SetLabelRequest) -> Result<SetLabelResponse> {
        *self.label.lock() = request.value;
        Ok(OrpcResponse::default())
    }

    async fn get_priority(&self, _request: GetPriorityRequest) -> Result<GetPriorityResponse> {
        Ok(ValueResponse::new(*self.priority.lock()))
    }

    async fn set_priority(&self, request: SetPriorityRequest) -> Result<SetPriorityResponse> {
        if !(0..=MAX_PRIORITY).contains(&request.value) {
            return Err(DcomError::Status(Hresult::MQ_ERROR_PROPERTY));
        }
        *self.priority.lock() = request.value;
        Ok(OrpcResponse::default())
    }

    async fn get_is_authenticated(&self, _request: GetIsAuthenticatedRequest) -> Result<GetIsAuthenticatedResponse> {
        Ok(ValueResponse::new(dcom::oaut::VARIANT_TRUE))
    }

    async fn get_body(&self, _request: GetBodyRequest) -> Result<GetBodyResponse> {
        Ok(ValueResponse::new(self.body.lock().clone()))
    }

    async fn set_body(&self, request: SetBodyRequest) -> Result<SetBodyResponse> {
        *self.body.lock() = request.value;
        Ok(OrpcResponse::default())
    }

    async fn send(&self, request: SendRequest) -> Result<SendResponse> {
        if request.destination_queue.is_none() {
            return Err(DcomError::Status(Hresult::E_INVALIDARG));
        }
        self.sent_to.lock().push(request.destination_queue);
        Ok(OrpcResponse::default())
    }
}

/// Transport wrapper that counts the calls reaching it and remembers their
/// names, then forwards to the wrapped connection.
pub struct CountingConn {
    inner: Arc<dyn Conn>,
    calls: AtomicUsize,
    names: Mutex<Vec<&'static str>>,
}

impl CountingConn {
    pub fn new(inner: Arc<dyn Conn>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            names: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.names.lock().clone()
    }
}

#[async_trait]
impl Conn for CountingConn {
    async fn invoke(&self, op: &mut dyn Operation, opts: &CallOptions) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.names.lock().push(op.op_name());
        self.inner.invoke(op, opts).await
    }
}

/// One loopback connection with every fixture registered on its own IPID.
pub struct Harness {
    pub conn: Arc<LoopbackConn>,
    pub context: NdrContext,
    pub catalog: Arc<CatalogFixture>,
    pub directory: Arc<DirectoryFixture>,
    pub message: Arc<MessageFixture>,
    pub catalog_ipid: Ipid,
    pub query_ipid: Ipid,
    pub message_ipid: Ipid,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(NdrContext::new(), CatalogFixture::new())
    }

    pub fn big_endian() -> Self {
        Self::build(NdrContext::big_endian(), CatalogFixture::new())
    }

    pub fn with_catalog(catalog: CatalogFixture) -> Self {
        Self::build(NdrContext::new(), catalog)
    }

    fn build(context: NdrContext, catalog: CatalogFixture) -> Self {
        init_logging();

        let registry = Arc::new(ServerRegistry::new());
        let conn = Arc::new(LoopbackConn::with_config(registry, LoopbackConfig { context }));

        let catalog = Arc::new(catalog);
        let directory = Arc::new(DirectoryFixture::new());
        let message = Arc::new(MessageFixture::default());

        let catalog_ipid = Ipid::generate();
        let query_ipid = Ipid::generate();
        let message_ipid = Ipid::generate();
        conn.register(
            catalog_ipid,
            CATALOG_UTILS_INFO.name,
            new_catalog_utils_server_handle(catalog.clone()),
        );
        conn.register(query_ipid, QUERY3_INFO.name, new_query3_server_handle(directory.clone()));
        conn.register(message_ipid, MESSAGE_INFO.name, new_message_server_handle(message.clone()));

        Self {
            conn,
            context,
            catalog,
            directory,
            message,
            catalog_ipid,
            query_ipid,
            message_ipid,
        }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new().with_context(self.context)
    }

    pub fn catalog_client(&self) -> CatalogUtilsClient {
        CatalogUtilsClient::new(self.conn.clone())
            .with_config(self.config())
            .with_ipid(self.catalog_ipid)
    }

    pub fn query_client(&self) -> Query3Client {
        Query3Client::new(self.conn.clone())
            .with_config(self.config())
            .with_ipid(self.query_ipid)
    }

    pub fn message_client(&self) -> MessageClient {
        MessageClient::new(self.conn.clone())
            .with_config(self.config())
            .with_ipid(self.message_ipid)
    }
}
